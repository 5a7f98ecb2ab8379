use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Core(#[from] idcard_common::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Sheet(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("不完全な行があります: {0}")]
    IncompleteRows(String),

    #[error("サーバーエラー: {0}")]
    Server(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for ClientError {
    fn from(e: calamine::Error) -> Self {
        ClientError::Sheet(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ClientError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ClientError::ExcelGeneration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
