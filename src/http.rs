//! reqwest によるバックエンド接続

use std::time::Duration;

use idcard_common::endpoints::{self, DownloadKind};
use idcard_common::payload::decode_data_url;
use idcard_common::{
    ApiResponse, Backend, PhotoLoader, Record, Submission, SurfaceSize, UploadFile, UploadReply,
    UploadResponse,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::imaging;

fn transport(e: reqwest::Error) -> idcard_common::Error {
    idcard_common::Error::Transport(e.to_string())
}

/// フォーム送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReply {
    /// リダイレクト・HTMLなどエラーを含まない応答
    Accepted,
    /// `{"Error": "..."}`
    Rejected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: Option<serde_json::Value>,
}

/// 送信応答の本文からエラー文字列を取り出す
pub fn parse_submit_body(body: &str) -> SubmitReply {
    let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body) else {
        return SubmitReply::Accepted;
    };
    match error {
        serde_json::Value::Null => SubmitReply::Accepted,
        serde_json::Value::String(message) if message.is_empty() => SubmitReply::Accepted,
        serde_json::Value::String(message) => SubmitReply::Rejected(message),
        // エラー値がオブジェクトのまま返ることがある
        other => SubmitReply::Rejected(other.to_string()),
    }
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/create` または `/update` にフォームを送る
    pub async fn submit_form(&self, submission: &Submission) -> Result<SubmitReply> {
        let response = self
            .client
            .post(self.url(submission.action))
            .form(&submission.fields)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server(format!("{} {}", status, body.trim())));
        }
        Ok(parse_submit_body(&body))
    }

    /// IDカード・契約書をダウンロードする
    pub async fn download(&self, uid: &str, kind: DownloadKind) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(endpoints::DOWNLOAD))
            .query(&endpoints::download_query(uid, kind))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Backend for HttpBackend {
    async fn get_record(&self, nik: &str) -> idcard_common::Result<ApiResponse<Record>> {
        self.client
            .get(self.url(endpoints::GET_RECORD))
            .query(&endpoints::record_query(nik))
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)
    }

    async fn get_identifier(
        &self,
        status_code: &str,
    ) -> idcard_common::Result<ApiResponse<String>> {
        self.client
            .get(self.url(endpoints::GET_ID))
            .query(&endpoints::identifier_query(status_code))
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)
    }

    async fn upload(&self, file: &UploadFile) -> idcard_common::Result<UploadReply> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part(endpoints::UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.url(endpoints::UPLOAD_UPSERT))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Ok(UploadReply::Refused(status.as_u16()));
        }
        let body: UploadResponse = response.json().await.map_err(transport)?;
        Ok(UploadReply::Accepted(body))
    }
}

/// 保存済み写真をHTTPで取得して描画面サイズに描く
pub struct HttpPhotoLoader {
    client: reqwest::Client,
}

impl HttpPhotoLoader {
    pub fn new(backend: &HttpBackend) -> Self {
        Self {
            client: backend.client.clone(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("data:") {
            return Ok(decode_data_url(url)?);
        }
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl PhotoLoader for HttpPhotoLoader {
    async fn load_photo(&self, url: &str, size: SurfaceSize) -> idcard_common::Result<String> {
        let media = |e: ClientError| idcard_common::Error::Media(e.to_string());
        let bytes = self.fetch(url).await.map_err(media)?;
        imaging::render_to_surface(&bytes, size).map_err(media)
    }
}
