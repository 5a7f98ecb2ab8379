//! 表計算ファイルのアップロード

use idcard_common::{submit_upload, Error, UploadFile};
use leptos::ev::SubmitEvent;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::app::Registration;

async fn read_file(file: File) -> Result<UploadFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(UploadFile {
        name: file.name(),
        bytes,
    })
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub fn UploadForm(registration: Registration) -> impl IntoView {
    let input_ref = NodeRef::<html::Input>::new();
    let backend = registration.backend();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let mut selected = Vec::new();
        if let Some(files) = input_ref.get_untracked().and_then(|input| input.files()) {
            for i in 0..files.length() {
                if let Some(file) = files.get(i) {
                    selected.push(file);
                }
            }
        }

        spawn_local(async move {
            let mut files = Vec::with_capacity(selected.len());
            for file in selected {
                match read_file(file).await {
                    Ok(file) => files.push(file),
                    Err(e) => {
                        log::error!("failed to read upload file: {:?}", e);
                        return;
                    }
                }
            }
            // 選択なし・複数選択は送信せずに知らせる
            match submit_upload(&backend, files).await {
                Ok(notice) | Err(Error::Validation(notice)) => alert(&notice),
                Err(e) => alert(&e.to_string()),
            }
        });
    };

    view! {
        <form class="upload-form" on:submit=on_submit>
            <div class="form-group">
                <label class="form-label">"Unggah Excel"</label>
                <input node_ref=input_ref type="file" name="file" accept=".xlsx,.xls" />
            </div>
            <button type="submit" class="btn btn-primary">"Unggah"</button>
        </form>
    }
}
