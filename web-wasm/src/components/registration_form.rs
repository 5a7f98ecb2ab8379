//! 登録フォーム
//!
//! 送信はブラウザのネイティブフォームに任せる。action は FormMode で切り替わる。

use idcard_common::endpoints::DownloadKind;
use idcard_common::{Category, FormModel};
use leptos::ev::Event;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::download_url;
use crate::app::Registration;

fn text_field(
    registration: Registration,
    label: &'static str,
    name: &'static str,
    read: fn(&FormModel) -> String,
    write: fn(&mut FormModel, String),
) -> impl IntoView {
    let form = registration.signals.form;
    view! {
        <div class="form-group">
            <label class="form-label">{label}</label>
            <input
                type="text"
                name=name
                class="form-input"
                prop:value=move || form.with(read)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    registration.edit(|f| write(f, value));
                }
            />
        </div>
    }
}

fn navigate(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("navigation to {} failed: {:?}", url, e);
        }
    }
}

#[component]
pub fn RegistrationForm(registration: Registration) -> impl IntoView {
    let form = registration.signals.form;
    let payload = registration.signals.payload;

    let on_nik_input = {
        let registration = registration.clone();
        move |ev: Event| {
            let value = event_target_value(&ev);
            registration.edit(|f| f.nik = value);
        }
    };

    let on_nik_change = {
        let registration = registration.clone();
        move |ev: Event| {
            let nik = event_target_value(&ev);
            let registration = registration.clone();
            spawn_local(async move { registration.lookup(nik).await });
        }
    };

    let on_status_change = {
        let registration = registration.clone();
        move |ev: Event| {
            let code = event_target_value(&ev);
            let registration = registration.clone();
            spawn_local(async move { registration.resolve(code).await });
        }
    };

    let download = move |kind: DownloadKind| {
        let uid = form.with_untracked(|f| f.user_id.clone());
        if !uid.is_empty() {
            navigate(&download_url(&uid, kind));
        }
    };

    view! {
        <form
            class="registration-form"
            method="post"
            action=move || form.with(|f| f.mode.action())
        >
            <input
                type="hidden"
                name="userIdInput"
                prop:value=move || form.with(|f| f.user_id.clone())
            />
            <div class="form-group">
                <span class="form-label">"ID"</span>
                <span id="userId">{move || form.with(|f| f.user_id_label.clone())}</span>
            </div>

            <div class="form-group">
                <label class="form-label">"NIK"</label>
                <input
                    type="text"
                    name="nik"
                    class="form-input"
                    prop:value=move || form.with(|f| f.nik.clone())
                    on:input=on_nik_input
                    on:change=on_nik_change
                />
            </div>

            {text_field(
                registration.clone(),
                "Nama",
                "name",
                |f| f.name.clone(),
                |f, v| f.name = v,
            )}

            <div class="form-group">
                <label class="form-label">"Status"</label>
                <select
                    name="status"
                    class="form-input"
                    prop:value=move || form.with(|f| f.status.code().to_string())
                    on:change=on_status_change
                >
                    <option value="S">{Category::Penyetor.as_str()}</option>
                    <option value="V">{Category::Vendor.as_str()}</option>
                </select>
            </div>

            {text_field(
                registration.clone(),
                "Telepon",
                "phone",
                |f| f.phone.clone(),
                |f, v| f.phone = v,
            )}
            {text_field(
                registration.clone(),
                "Alamat",
                "address",
                |f| f.address.clone(),
                |f, v| f.address = v,
            )}
            {text_field(
                registration.clone(),
                "Rating",
                "rating",
                |f| f.rating.clone(),
                |f, v| f.rating = v,
            )}
            {text_field(
                registration,
                "Catatan",
                "notes",
                |f| f.notes.clone(),
                |f, v| f.notes = v,
            )}

            <input type="hidden" name="photo" prop:value=move || payload.get() />

            <div class="button-group">
                <button type="submit" class="btn btn-primary">
                    {move || form.with(|f| f.submit_label.clone())}
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled=move || form.with(|f| f.user_id.is_empty())
                    on:click=move |_| download(DownloadKind::Card)
                >
                    "Kartu"
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled=move || form.with(|f| f.user_id.is_empty())
                    on:click=move |_| download(DownloadKind::Contract)
                >
                    "Kontrak"
                </button>
            </div>
        </form>
    }
}
