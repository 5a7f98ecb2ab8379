//! メインアプリケーションコンポーネント

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use idcard_common::{
    Backend, Camera, CaptureView, FormModel, FormSession, IdentifierOutcome, LookupOutcome,
    PhotoLoader, CANVAS_SIZE, STREAM_CONSTRAINTS,
};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::FetchBackend;
use crate::components::{
    camera_panel::CameraPanel, header::Header, registration_form::RegistrationForm,
    upload_form::UploadForm, warning_banner::WarningBanner,
};
use crate::media::{BrowserCamera, ImagePhotoLoader};

/// 画面に映すセッションの写し
#[derive(Clone, Copy)]
pub struct FormSignals {
    pub form: RwSignal<FormModel>,
    pub warning: RwSignal<Option<String>>,
    pub view: RwSignal<CaptureView>,
    pub payload: RwSignal<String>,
}

/// フォームセッションとブラウザ側の入出力をまとめたハンドル
///
/// `RefCell` の借用は await をまたがない。
#[derive(Clone)]
pub struct Registration {
    session: Rc<RefCell<FormSession>>,
    camera: BrowserCamera,
    loader: ImagePhotoLoader,
    backend: FetchBackend,
    pub signals: FormSignals,
}

impl Registration {
    fn new(video: NodeRef<html::Video>, canvas: NodeRef<html::Canvas>) -> Self {
        // 写真参照はページのオリジンから解決する
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        let session = FormSession::new(origin);
        let signals = FormSignals {
            form: RwSignal::new(session.lookup.form().clone()),
            warning: RwSignal::new(None),
            view: RwSignal::new(session.capture.view()),
            payload: RwSignal::new(String::new()),
        };
        Self {
            session: Rc::new(RefCell::new(session)),
            camera: BrowserCamera::new(video, canvas),
            loader: ImagePhotoLoader,
            backend: FetchBackend,
            signals,
        }
    }

    fn sync(&self) {
        let session = self.session.borrow();
        self.signals.form.set(session.lookup.form().clone());
        self.signals
            .warning
            .set(session.lookup.warning().message().map(str::to_string));
        self.signals.view.set(session.capture.view());
        self.signals.payload.set(session.capture.payload().to_string());
    }

    /// 入力欄の編集をセッションへ書き戻す
    pub fn edit(&self, apply: impl FnOnce(&mut FormModel)) {
        apply(self.session.borrow_mut().lookup.form_mut());
        self.sync();
    }

    pub async fn acquire(&self) {
        let result = self.camera.acquire_stream(STREAM_CONSTRAINTS).await;
        self.session.borrow_mut().capture.finish_acquire(result);
        self.sync();
    }

    pub fn toggle(&self) {
        let result = self.session.borrow_mut().capture.toggle_capture(&self.camera);
        if let Err(e) = result {
            log::warn!("capture toggle ignored: {}", e);
        }
        self.sync();
    }

    /// NIKで検索し、見つかれば保存済み写真も読み込む
    pub async fn lookup(&self, nik: String) {
        let Some(ticket) = self.session.borrow_mut().lookup.begin_lookup(&nik) else {
            return;
        };
        let response = self.backend.get_record(&ticket.nik).await;
        let outcome = self.session.borrow_mut().lookup.apply_lookup(&ticket, response);
        self.sync();

        if let Ok(LookupOutcome::Loaded { photo }) = outcome {
            self.load_photo(&photo).await;
        }
    }

    async fn load_photo(&self, reference: &str) {
        let ticket = {
            let mut session = self.session.borrow_mut();
            let base = session.photo_base().to_string();
            session.capture.begin_photo_load(&base, reference)
        };
        let Some(ticket) = ticket else {
            return;
        };
        let result = self.loader.load_photo(&ticket.url, CANVAS_SIZE).await;
        self.session
            .borrow_mut()
            .capture
            .finish_photo_load(&ticket, result, &self.camera);
        self.sync();
    }

    /// ステータスに対応する新しいIDを取得する
    pub async fn resolve(&self, status_code: String) {
        let ticket = self.session.borrow_mut().lookup.begin_identifier(&status_code);
        self.sync();
        let response = self.backend.get_identifier(&ticket.status_code).await;
        let outcome = self
            .session
            .borrow_mut()
            .lookup
            .apply_identifier(&ticket, response);
        if let Ok(IdentifierOutcome::Assigned(user_id)) = &outcome {
            log::debug!("assigned user id {}", user_id);
        }
        self.sync();
    }

    pub fn backend(&self) -> FetchBackend {
        self.backend
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let video_ref = NodeRef::<html::Video>::new();
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let registration = Registration::new(video_ref, canvas_ref);

    // video がマウントされたらストリームを一度だけ要求する
    {
        let registration = registration.clone();
        let requested = Rc::new(Cell::new(false));
        Effect::new(move |_| {
            if video_ref.get().is_some() && !requested.replace(true) {
                let registration = registration.clone();
                spawn_local(async move { registration.acquire().await });
            }
        });
    }

    view! {
        <div class="container">
            <Header />
            <WarningBanner warning=registration.signals.warning />
            <CameraPanel
                registration=registration.clone()
                video_ref=video_ref
                canvas_ref=canvas_ref
            />
            <RegistrationForm registration=registration.clone() />
            <UploadForm registration=registration />
        </div>
    }
}
