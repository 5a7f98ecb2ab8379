//! fetch によるバックエンド接続
//!
//! URLはページのオリジン相対。クエリ値は encodeURIComponent でエンコードする。

use idcard_common::endpoints::{self, DownloadKind};
use idcard_common::{ApiResponse, Backend, Error, Record, UploadFile, UploadReply, UploadResponse};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Request, RequestInit, RequestMode, Response};

fn transport(e: JsValue) -> Error {
    Error::Transport(format!("{:?}", e))
}

/// `path?key=value&...` を組み立てる
pub fn with_query(path: &str, query: &[(&str, String)]) -> String {
    let params: Vec<String> = query
        .iter()
        .map(|(key, value)| {
            let value: String = js_sys::encode_uri_component(value).into();
            format!("{}={}", key, value)
        })
        .collect();
    format!("{}?{}", path, params.join("&"))
}

/// ダウンロードURL（ブラウザはこのURLへ遷移する）
pub fn download_url(uid: &str, kind: DownloadKind) -> String {
    with_query(endpoints::DOWNLOAD, &endpoints::download_query(uid, kind))
}

#[derive(Clone, Copy, Default)]
pub struct FetchBackend;

impl FetchBackend {
    async fn send(&self, url: &str, opts: &RequestInit) -> Result<Response, JsValue> {
        let request = Request::new_with_str_and_init(url, opts)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        resp_value.dyn_into()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let resp = self.send(url, &opts).await.map_err(transport)?;
        let json = JsFuture::from(resp.json().map_err(transport)?)
            .await
            .map_err(transport)?;
        serde_wasm_bindgen::from_value(json).map_err(|e| Error::Transport(e.to_string()))
    }
}

impl Backend for FetchBackend {
    async fn get_record(&self, nik: &str) -> Result<ApiResponse<Record>, Error> {
        let url = with_query(endpoints::GET_RECORD, &endpoints::record_query(nik));
        self.get_json(&url).await
    }

    async fn get_identifier(&self, status_code: &str) -> Result<ApiResponse<String>, Error> {
        let url = with_query(endpoints::GET_ID, &endpoints::identifier_query(status_code));
        self.get_json(&url).await
    }

    async fn upload(&self, file: &UploadFile) -> Result<UploadReply, Error> {
        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let blob = Blob::new_with_u8_array_sequence(&parts).map_err(transport)?;

        let form = FormData::new().map_err(transport)?;
        form.append_with_blob_and_filename(endpoints::UPLOAD_FIELD, &blob, &file.name)
            .map_err(transport)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::SameOrigin);
        opts.set_body(&form);

        let resp = self
            .send(endpoints::UPLOAD_UPSERT, &opts)
            .await
            .map_err(transport)?;
        if !resp.ok() {
            return Ok(UploadReply::Refused(resp.status()));
        }

        let json = JsFuture::from(resp.json().map_err(transport)?)
            .await
            .map_err(transport)?;
        let body: UploadResponse =
            serde_wasm_bindgen::from_value(json).map_err(|e| Error::Transport(e.to_string()))?;
        Ok(UploadReply::Accepted(body))
    }
}
