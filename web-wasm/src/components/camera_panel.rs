//! ライブ映像と撮影済み写真の切り替え

use idcard_common::CANVAS_SIZE;
use leptos::html;
use leptos::prelude::*;

use crate::app::Registration;

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

#[component]
pub fn CameraPanel(
    registration: Registration,
    video_ref: NodeRef<html::Video>,
    canvas_ref: NodeRef<html::Canvas>,
) -> impl IntoView {
    let capture = registration.signals.view;
    let on_toggle = move |_| registration.toggle();

    view! {
        <div class="camera-panel">
            <video
                node_ref=video_ref
                autoplay=true
                muted=true
                style:display=move || display(capture.with(|v| v.video_visible))
            ></video>
            <canvas
                node_ref=canvas_ref
                width=CANVAS_SIZE.width.to_string()
                height=CANVAS_SIZE.height.to_string()
                style:display=move || display(capture.with(|v| v.canvas_visible))
            ></canvas>
            <button type="button" class="btn btn-secondary" on:click=on_toggle>
                {move || capture.with(|v| v.label)}
            </button>
        </div>
    }
}
