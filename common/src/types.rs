//! 登録データの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Record: バックエンドが保持する利用者レコード
//! - StatusSelection: Vendor / Penyetor の区分
//! - FormMode: 新規登録(Create) / 更新(Update)
//! - ApiResponse: `{Data, Error}` 形式のレスポンス

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Vendor を表すステータスコード
pub const VENDOR_CODE: &str = "V";

/// 画面初期表示時のステータスコード
pub const DEFAULT_STATUS_CODE: &str = "S";

/// 利用者レコード
///
/// 欠けているフィールドは空文字列になる。`Rating` は数値でも文字列でも受け付ける。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Record {
    #[serde(rename = "ID", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "NIK", deserialize_with = "lenient_string")]
    pub nik: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(deserialize_with = "lenient_string")]
    pub photo: String,
}

/// null → ""、数値・真偽値 → 文字列表現
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// 利用者区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Vendor,
    Penyetor,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vendor => "Vendor",
            Category::Penyetor => "Penyetor",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ドロップダウンで選ばれたステータス
///
/// 生のコードはそのままリクエストに使い、表示には区分名を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelection {
    code: String,
    category: Category,
}

impl StatusSelection {
    /// `"V"` だけが Vendor、それ以外はすべて Penyetor
    pub fn from_code(code: &str) -> Self {
        let category = if code == VENDOR_CODE {
            Category::Vendor
        } else {
            Category::Penyetor
        };
        Self {
            code: code.to_string(),
            category,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl Default for StatusSelection {
    fn default() -> Self {
        Self::from_code(DEFAULT_STATUS_CODE)
    }
}

/// フォームの送信先
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Update,
}

impl FormMode {
    /// フォームの action
    pub fn action(&self) -> &'static str {
        match self {
            FormMode::Create => "/create",
            FormMode::Update => "/update",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "Daftar",
            FormMode::Update => "Update",
        }
    }

    /// 送信ボタンのラベル（例: "Update Vendor"）
    pub fn submit_label(&self, category: Category) -> String {
        format!("{} {}", self.verb(), category)
    }
}

/// `/get`・`/get-id` のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "Data", default = "Option::default")]
    pub data: Option<T>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    /// 空でない `Error` は Domain エラー、`Data` が無ければ Transport エラー
    pub fn into_result(self) -> Result<T> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return Err(Error::Domain(message));
        }
        self.data
            .ok_or_else(|| Error::Transport("response carried neither Data nor Error".to_string()))
    }
}

/// `/upload/upsert` のレスポンス
///
/// 一括登録の失敗も 200 で `{"Error": ...}` が返る。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub affected: Option<u64>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl UploadResponse {
    /// 空でない `Error` があればその文言
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.is_empty())
    }
}
