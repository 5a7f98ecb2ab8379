//! NIK検索・ID採番コントローラ
//!
//! フォームの入力値は `FormModel` が正本で、画面はその写しとして描画する。
//! どちらの操作も `begin_*` で受付票を発行し、`apply_*` で応答を反映する。
//! 受付票には種類ごとに単調増加するトークンが付き、最新でない応答は捨てる。

use crate::error::{Error, Result};
use crate::types::{ApiResponse, FormMode, Record, StatusSelection};
use crate::warning::WarningSurface;

/// フォームに束縛された値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    pub nik: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub rating: String,
    pub notes: String,
    /// hidden の `userIdInput`
    pub user_id: String,
    /// 画面に表示するID
    pub user_id_label: String,
    pub status: StatusSelection,
    pub mode: FormMode,
    pub submit_label: String,
}

impl Default for FormModel {
    fn default() -> Self {
        let status = StatusSelection::default();
        let mode = FormMode::default();
        Self {
            nik: String::new(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            rating: String::new(),
            notes: String::new(),
            user_id: String::new(),
            user_id_label: String::new(),
            submit_label: mode.submit_label(status.category()),
            status,
            mode,
        }
    }
}

impl FormModel {
    /// レコードの値で束縛フィールドを上書きする（NIK入力欄はそのまま）
    fn fill_from(&mut self, record: Record) {
        self.user_id_label = record.id.clone();
        self.user_id = record.id;
        self.name = record.name;
        self.phone = record.phone;
        self.address = record.address;
        self.rating = record.rating;
        self.notes = record.notes;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub nik: String,
    token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierTicket {
    pub status_code: String,
    token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// レコードを反映した。`photo` は保存済み写真の参照
    Loaded { photo: String },
    /// サーバーがエラーを返した（警告表示済み）
    Rejected(String),
    /// より新しい検索が発行済み
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierOutcome {
    Assigned(String),
    Rejected(String),
    Stale,
}

#[derive(Debug, Default)]
pub struct LookupController {
    form: FormModel,
    warning: WarningSurface,
    lookup_token: u64,
    identifier_token: u64,
}

impl LookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    /// 利用者の入力を反映するため
    pub fn form_mut(&mut self) -> &mut FormModel {
        &mut self.form
    }

    pub fn warning(&self) -> &WarningSurface {
        &self.warning
    }

    pub fn warning_mut(&mut self) -> &mut WarningSurface {
        &mut self.warning
    }

    /// 空白だけのNIKには受付票を出さない
    pub fn begin_lookup(&mut self, nik: &str) -> Option<LookupTicket> {
        if nik.trim().is_empty() {
            return None;
        }
        self.lookup_token += 1;
        log::debug!("send nik {} (#{})", nik, self.lookup_token);
        Some(LookupTicket {
            nik: nik.to_string(),
            token: self.lookup_token,
        })
    }

    /// 検索応答を反映する
    ///
    /// 通信失敗は記録して `Err` を返し、フォームも警告も変えない。
    pub fn apply_lookup(
        &mut self,
        ticket: &LookupTicket,
        response: Result<ApiResponse<Record>>,
    ) -> Result<LookupOutcome> {
        if ticket.token != self.lookup_token {
            log::warn!("discarding stale lookup response for nik {}", ticket.nik);
            return Ok(LookupOutcome::Stale);
        }

        let record = match response.and_then(ApiResponse::into_result) {
            Ok(record) => record,
            Err(Error::Domain(message)) => {
                self.warning.show_domain_error(&message);
                return Ok(LookupOutcome::Rejected(message));
            }
            Err(e) => {
                log::error!("Error checking NIK: {}", e);
                return Err(e);
            }
        };

        log::debug!("user id: {}", record.id);
        self.warning.clear_warning();
        let photo = record.photo.clone();
        self.form.fill_from(record);
        self.form.mode = FormMode::Update;
        self.form.submit_label = FormMode::Update.submit_label(self.form.status.category());
        Ok(LookupOutcome::Loaded { photo })
    }

    /// ステータスを選び直し、ID採番の受付票を出す
    pub fn begin_identifier(&mut self, status_code: &str) -> IdentifierTicket {
        self.form.status = StatusSelection::from_code(status_code);
        self.identifier_token += 1;
        IdentifierTicket {
            status_code: status_code.to_string(),
            token: self.identifier_token,
        }
    }

    /// 採番応答を反映する
    ///
    /// 成功時は新規登録用のラベルに変えるが、FormMode は戻さない。
    pub fn apply_identifier(
        &mut self,
        ticket: &IdentifierTicket,
        response: Result<ApiResponse<String>>,
    ) -> Result<IdentifierOutcome> {
        if ticket.token != self.identifier_token {
            log::warn!("discarding stale identifier for status {}", ticket.status_code);
            return Ok(IdentifierOutcome::Stale);
        }

        let user_id = match response.and_then(ApiResponse::into_result) {
            Ok(user_id) => user_id,
            Err(Error::Domain(message)) => {
                self.warning.show_domain_error(&message);
                return Ok(IdentifierOutcome::Rejected(message));
            }
            Err(e) => {
                log::error!("Error generating user ID: {}", e);
                return Err(e);
            }
        };

        self.warning.clear_warning();
        self.form.user_id = user_id.clone();
        self.form.user_id_label = user_id.clone();
        self.form.submit_label = FormMode::Create.submit_label(self.form.status.category());
        Ok(IdentifierOutcome::Assigned(user_id))
    }
}
