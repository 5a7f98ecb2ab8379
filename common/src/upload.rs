//! スプレッドシート一括アップロード
//!
//! 送信はファイル1件のみ。リトライ・分割・進捗表示はしない。

use crate::backend::{Backend, UploadReply};
use crate::error::{Error, Result};

pub const NO_FILE_NOTICE: &str = "Please select a file!";
pub const MULTIPLE_FILES_NOTICE: &str = "Please select a single file.";
pub const REFUSED_NOTICE: &str = "Failed to upload file.";
pub const TRANSPORT_NOTICE: &str = "An error occurred while uploading the file.";

/// 送信するファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// 選択されたファイルがちょうど1件であることを確認する
pub fn prepare_upload(mut files: Vec<UploadFile>) -> Result<UploadFile> {
    match files.len() {
        0 => Err(Error::Validation(NO_FILE_NOTICE.to_string())),
        1 => Ok(files.remove(0)),
        _ => Err(Error::Validation(MULTIPLE_FILES_NOTICE.to_string())),
    }
}

/// 応答から利用者向けの通知文を作る
pub fn upload_notice(result: &Result<UploadReply>) -> String {
    match result {
        Ok(UploadReply::Accepted(response)) if response.rejection().is_some() => {
            REFUSED_NOTICE.to_string()
        }
        Ok(UploadReply::Accepted(response)) => {
            format!("File uploaded successfully: {}", response.message)
        }
        Ok(UploadReply::Refused(_)) => REFUSED_NOTICE.to_string(),
        Err(_) => TRANSPORT_NOTICE.to_string(),
    }
}

/// 検証して送信し、通知文を返す
///
/// ファイル選択の不備だけが `Err`（送信しない）。
pub async fn submit_upload<B: Backend>(backend: &B, files: Vec<UploadFile>) -> Result<String> {
    let file = prepare_upload(files)?;
    log::debug!("uploading {} ({} bytes)", file.name, file.bytes.len());

    let result = backend.upload(&file).await;
    match &result {
        Ok(UploadReply::Refused(status)) => log::warn!("upload refused with status {}", status),
        Ok(UploadReply::Accepted(response)) => {
            if let Some(message) = response.rejection() {
                log::warn!("upload rejected: {}", message);
            }
        }
        Err(e) => log::error!("Error uploading file: {}", e),
    }
    Ok(upload_notice(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::types::UploadResponse;
    use futures::executor::block_on;

    fn sheet(name: &str) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            bytes: vec![0x50, 0x4b, 0x03, 0x04],
        }
    }

    #[test]
    fn test_prepare_requires_a_file() {
        let err = prepare_upload(vec![]).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == NO_FILE_NOTICE));
    }

    #[test]
    fn test_prepare_rejects_multiple_files() {
        assert!(prepare_upload(vec![sheet("a.xlsx"), sheet("b.xlsx")]).is_err());
    }

    #[test]
    fn test_prepare_single_file() {
        assert_eq!(prepare_upload(vec![sheet("a.xlsx")]).unwrap().name, "a.xlsx");
    }

    #[test]
    fn test_submit_success_notice() {
        let backend = FakeBackend::with_upload(UploadReply::Accepted(UploadResponse {
            message: "Bulk update success".to_string(),
            affected: Some(2),
            error: None,
        }));
        let notice = block_on(submit_upload(&backend, vec![sheet("users.xlsx")])).unwrap();
        assert_eq!(notice, "File uploaded successfully: Bulk update success");
        assert_eq!(backend.upload_calls.get(), 1);
    }

    #[test]
    fn test_submit_refused_notice() {
        let backend = FakeBackend::with_upload(UploadReply::Refused(400));
        let notice = block_on(submit_upload(&backend, vec![sheet("users.xlsx")])).unwrap();
        assert_eq!(notice, REFUSED_NOTICE);
    }

    /// 200 でも `Error` 付きなら失敗扱い
    #[test]
    fn test_submit_error_body_is_refused() {
        let backend = FakeBackend::with_upload(UploadReply::Accepted(UploadResponse {
            error: Some("picture decoder: bad row".to_string()),
            ..Default::default()
        }));
        let notice = block_on(submit_upload(&backend, vec![sheet("users.xlsx")])).unwrap();
        assert_eq!(notice, REFUSED_NOTICE);
    }

    #[test]
    fn test_submit_transport_notice() {
        let backend = FakeBackend::default();
        let notice = block_on(submit_upload(&backend, vec![sheet("users.xlsx")])).unwrap();
        assert_eq!(notice, TRANSPORT_NOTICE);
    }

    #[test]
    fn test_submit_without_file_sends_nothing() {
        let backend = FakeBackend::default();
        assert!(block_on(submit_upload(&backend, vec![])).is_err());
        assert_eq!(backend.upload_calls.get(), 0);
    }
}
