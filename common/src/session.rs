//! 登録フォーム1枚分のセッション
//!
//! 撮影コントローラと検索コントローラを束ね、
//! 「検索成功 → 保存済み写真の読み込み」をつなぐ。

use crate::backend::Backend;
use crate::capture::{Camera, CaptureController, PhotoLoader};
use crate::error::Result;
use crate::lookup::{IdentifierOutcome, LookupController, LookupOutcome};

/// フォーム送信内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub action: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Submission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
pub struct FormSession {
    pub lookup: LookupController,
    pub capture: CaptureController,
    photo_base: String,
}

impl FormSession {
    /// `photo_base` は写真参照を解決する基点URL
    pub fn new(photo_base: impl Into<String>) -> Self {
        Self {
            lookup: LookupController::new(),
            capture: CaptureController::new(),
            photo_base: photo_base.into(),
        }
    }

    pub fn photo_base(&self) -> &str {
        &self.photo_base
    }

    /// NIKで検索し、見つかれば保存済み写真も読み込む
    ///
    /// 空白だけのNIKでは何もせず `Ok(None)`。
    pub async fn lookup_by_identifier<B, L, C>(
        &mut self,
        backend: &B,
        loader: &L,
        camera: &C,
        nik: &str,
    ) -> Result<Option<LookupOutcome>>
    where
        B: Backend,
        L: PhotoLoader,
        C: Camera,
    {
        let Some(ticket) = self.lookup.begin_lookup(nik) else {
            return Ok(None);
        };
        let response = backend.get_record(&ticket.nik).await;
        let outcome = self.lookup.apply_lookup(&ticket, response)?;

        if let LookupOutcome::Loaded { photo } = &outcome {
            self.capture
                .load_existing_photo(loader, camera, &self.photo_base, photo)
                .await;
        }
        Ok(Some(outcome))
    }

    /// ステータスに対応する新しいIDを取得する
    pub async fn resolve_identifier_for_status<B: Backend>(
        &mut self,
        backend: &B,
        status_code: &str,
    ) -> Result<IdentifierOutcome> {
        let ticket = self.lookup.begin_identifier(status_code);
        let response = backend.get_identifier(&ticket.status_code).await;
        self.lookup.apply_identifier(&ticket, response)
    }

    /// 現在のフォーム内容を送信用フィールドに変換する
    pub fn submission(&self) -> Submission {
        let form = self.lookup.form();
        Submission {
            action: form.mode.action(),
            fields: vec![
                ("userIdInput", form.user_id.clone()),
                ("nik", form.nik.clone()),
                ("name", form.name.clone()),
                ("status", form.status.code().to_string()),
                ("phone", form.phone.clone()),
                ("address", form.address.clone()),
                ("rating", form.rating.clone()),
                ("notes", form.notes.clone()),
                ("photo", self.capture.payload().to_string()),
            ],
        }
    }
}
