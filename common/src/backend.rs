//! バックエンド呼び出しの境界
//!
//! ブラウザでは fetch、CLIでは reqwest で実装する。

use crate::error::Result;
use crate::types::{ApiResponse, Record, UploadResponse};
use crate::upload::UploadFile;

/// アップロードに対するサーバーの応答
#[derive(Debug, Clone)]
pub enum UploadReply {
    /// 2xx
    Accepted(UploadResponse),
    /// 2xx 以外のステータス
    Refused(u16),
}

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// `GET /get?nik=`
    async fn get_record(&self, nik: &str) -> Result<ApiResponse<Record>>;

    /// `GET /get-id?status=`
    async fn get_identifier(&self, status_code: &str) -> Result<ApiResponse<String>>;

    /// `POST /upload/upsert`（multipart `file`）
    async fn upload(&self, file: &UploadFile) -> Result<UploadReply>;
}
