//! サブコマンドの処理本体
//!
//! 通信は `Backend` / `PhotoLoader` 越しに行うので、テストでは差し替えられる。

use std::path::{Path, PathBuf};

use idcard_common::endpoints::DownloadKind;
use idcard_common::capture::StreamStatus;
use idcard_common::payload::decode_data_url;
use idcard_common::{
    Backend, CaptureState, FormModel, FormSession, IdentifierOutcome, LookupOutcome, PhotoLoader,
    StatusSelection,
};

use crate::cli::RecordArgs;
use crate::error::{ClientError, Result};
use crate::still_camera::StillCamera;

/// 指定された項目だけフォームを上書きする
pub fn apply_record_args(form: &mut FormModel, args: &RecordArgs) {
    let fields = [
        (&mut form.name, &args.name),
        (&mut form.phone, &args.phone),
        (&mut form.address, &args.address),
        (&mut form.rating, &args.rating),
        (&mut form.notes, &args.notes),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
}

/// 登録フォームを組み立てる
///
/// 1. NIK検索（見つかれば更新モード、保存済み写真を読み込む）
/// 2. 見つからなければステータスで新しいIDを採番
/// 3. 写真ファイルがあれば撮影し直す
/// 4. 引数の項目で上書き
pub async fn prepare_registration<B, L>(
    backend: &B,
    loader: &L,
    camera: &StillCamera,
    photo_base: &str,
    nik: &str,
    status: &str,
    record: &RecordArgs,
) -> Result<FormSession>
where
    B: Backend,
    L: PhotoLoader,
{
    let mut session = FormSession::new(photo_base);
    {
        let form = session.lookup.form_mut();
        form.nik = nik.to_string();
        form.status = StatusSelection::from_code(status);
    }

    let outcome = session
        .lookup_by_identifier(backend, loader, camera, nik)
        .await?;

    match outcome {
        Some(LookupOutcome::Loaded { .. }) => {
            tracing::info!("existing record {}", session.lookup.form().user_id);
        }
        Some(LookupOutcome::Rejected(message)) => {
            tracing::info!("no record for nik {}: {}", nik, message);
            session.lookup.warning_mut().clear_warning();
            match session.resolve_identifier_for_status(backend, status).await? {
                IdentifierOutcome::Assigned(user_id) => tracing::info!("assigned {}", user_id),
                IdentifierOutcome::Rejected(message) => return Err(ClientError::Server(message)),
                IdentifierOutcome::Stale => {}
            }
        }
        Some(LookupOutcome::Stale) | None => {}
    }

    if camera.has_source() {
        if !session.capture.acquire_stream(camera).await {
            let reason = match session.capture.stream_status() {
                StreamStatus::Failed(reason) => reason.clone(),
                _ => "camera unavailable".to_string(),
            };
            return Err(idcard_common::Error::Media(reason).into());
        }
        if session.capture.state() == CaptureState::FrozenPhoto {
            session.capture.toggle_capture(camera)?;
        }
        session.capture.toggle_capture(camera)?;
    }

    apply_record_args(session.lookup.form_mut(), record);
    Ok(session)
}

/// 画面表示用の行
pub fn describe_form(session: &FormSession) -> Vec<String> {
    let form = session.lookup.form();
    let photo = match session.capture.payload() {
        "" => "(なし)".to_string(),
        payload => format!("{} bytes (PNG Data URL)", payload.len()),
    };
    vec![
        format!("  ID: {}", form.user_id_label),
        format!("  区分: {} ({})", form.status.category(), form.status.code()),
        format!("  NIK: {}", form.nik),
        format!("  氏名: {}", form.name),
        format!("  電話: {}", form.phone),
        format!("  住所: {}", form.address),
        format!("  評価: {}", form.rating),
        format!("  備考: {}", form.notes),
        format!("  写真: {}", photo),
        format!("  送信先: {} [{}]", form.mode.action(), form.submit_label),
    ]
}

/// 写真ペイロードをPNGファイルに保存する
pub fn save_payload(payload: &str, path: &Path) -> Result<()> {
    let bytes = decode_data_url(payload)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// ダウンロードの保存先
pub fn download_path(uid: &str, kind: DownloadKind, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", uid, kind.extension())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_record_args_only_given_fields() {
        let mut form = FormModel {
            name: "Budi".to_string(),
            phone: "0812".to_string(),
            ..Default::default()
        };
        let args = RecordArgs {
            phone: Some("0899".to_string()),
            notes: Some("baru".to_string()),
            ..Default::default()
        };

        apply_record_args(&mut form, &args);

        assert_eq!(form.name, "Budi");
        assert_eq!(form.phone, "0899");
        assert_eq!(form.notes, "baru");
    }

    #[test]
    fn test_download_path_default() {
        assert_eq!(
            download_path("V001", DownloadKind::Card, None),
            PathBuf::from("V001.png")
        );
        assert_eq!(
            download_path("V001", DownloadKind::Contract, None),
            PathBuf::from("V001.pdf")
        );
        assert_eq!(
            download_path("V001", DownloadKind::Card, Some(PathBuf::from("x.png"))),
            PathBuf::from("x.png")
        );
    }

    #[test]
    fn test_describe_fresh_form() {
        let session = FormSession::new("http://localhost:8080");
        let lines = describe_form(&session);
        assert!(lines.iter().any(|l| l.contains("/create")));
        assert!(lines.iter().any(|l| l.contains("(なし)")));
    }
}
