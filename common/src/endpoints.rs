//! バックエンドのエンドポイント定義
//!
//! クエリはキーと値のペアで返し、エンコードは各トランスポート
//! （reqwest / fetch）に任せる。

/// NIKでレコードを取得
pub const GET_RECORD: &str = "/get";
/// ステータス別の新しいIDを取得
pub const GET_ID: &str = "/get-id";
/// 一括アップロード
pub const UPLOAD_UPSERT: &str = "/upload/upsert";
/// IDカード・契約書のダウンロード
pub const DOWNLOAD: &str = "/download";

/// multipart のフィールド名
pub const UPLOAD_FIELD: &str = "file";

pub fn record_query(nik: &str) -> [(&'static str, String); 1] {
    [("nik", nik.to_string())]
}

pub fn identifier_query(status_code: &str) -> [(&'static str, String); 1] {
    [("status", status_code.to_string())]
}

/// ダウンロード種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// IDカード画像 (PNG)
    Card,
    /// 契約書 (PDF)
    Contract,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadKind::Card => "card",
            DownloadKind::Contract => "contract",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DownloadKind::Card => "png",
            DownloadKind::Contract => "pdf",
        }
    }
}

impl std::str::FromStr for DownloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(DownloadKind::Card),
            "contract" => Ok(DownloadKind::Contract),
            other => Err(format!("unknown download type: {} (card/contract)", other)),
        }
    }
}

pub fn download_query(uid: &str, kind: DownloadKind) -> [(&'static str, String); 2] {
    [("uid", uid.to_string()), ("type", kind.as_str().to_string())]
}

/// 写真の参照から取得URLを組み立てる
///
/// 絶対URL・Data URLはそのまま。相対パスはバックスラッシュを `/` に直し、
/// `base` と `/` ひとつで結合する。
pub fn photo_url(base: &str, reference: &str) -> String {
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
    {
        return reference.to_string();
    }

    let path = reference.replace('\\', "/");
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
