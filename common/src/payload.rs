//! 画像ペイロード（Data URL）ユーティリティ

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// canvas.toDataURL と同じ形式
pub const PNG_MIME: &str = "image/png";

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/png;base64,iVBOR..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、または抽出失敗時はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url
        .split_once(',')
        .map(|(_, data)| data)
        .filter(|data| !data.is_empty())
}

/// PNGバイト列をData URLに変換
pub fn png_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(bytes))
}

/// Data URLをバイト列に戻す
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let data = extract_base64_from_data_url(data_url)
        .ok_or_else(|| Error::Validation("not a data URL".to_string()))?;
    STANDARD
        .decode(data)
        .map_err(|e| Error::Validation(format!("base64 decode: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_base64_png() {
        let data_url = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(extract_base64_from_data_url(data_url), Some("iVBORw0KGgo="));
    }

    #[test]
    fn test_extract_base64_invalid() {
        assert_eq!(extract_base64_from_data_url("not a data url"), None);
        assert_eq!(extract_base64_from_data_url(""), None);
        // canvas が空の場合の "data:,"
        assert_eq!(extract_base64_from_data_url("data:,"), None);
    }

    #[test]
    fn test_png_data_url_decodes_back() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a];
        let url = png_data_url(&bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(Error::Validation(_))
        ));
    }
}
