//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 入力不備（リクエストは送らない）
    #[error("Validation error: {0}")]
    Validation(String),

    /// サーバーが返したエラー文字列
    #[error("{0}")]
    Domain(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// カメラ・画像読み込み・canvas taint
    #[error("Media error: {0}")]
    Media(String),

    #[error("Camera stream is not ready")]
    StreamNotReady,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
