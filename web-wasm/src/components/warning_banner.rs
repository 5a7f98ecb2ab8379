//! 警告表示

use leptos::prelude::*;

#[component]
pub fn WarningBanner(warning: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <div
            id="warning"
            class="warning"
            style:display=move || if warning.with(Option::is_some) { "block" } else { "none" }
        >
            {move || warning.get().unwrap_or_default()}
        </div>
    }
}
