//! 撮影コントローラ
//!
//! ライブ映像（LivePreview）と静止画（FrozenPhoto）の切り替えを管理し、
//! フォーム送信用のPNG Data URLを保持する。
//!
//! カメラ・canvas・画像読み込みは `Camera` / `PhotoLoader` トレイト越しに扱う。
//! コントローラ自体は I/O を持たないため、ブラウザなしでテストできる。

use crate::endpoints::photo_url;
use crate::error::{Error, Result};

/// ストリーム要求の制約
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConstraints {
    pub aspect_ratio: f64,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// カメラへの要求は 3:4, 330×440
pub const STREAM_CONSTRAINTS: StreamConstraints = StreamConstraints {
    aspect_ratio: 3.0 / 4.0,
    ideal_width: 330,
    ideal_height: 440,
};

/// 描画面のサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// canvas は 330×450（ストリームの 440 とは一致しない）
pub const CANVAS_SIZE: SurfaceSize = SurfaceSize {
    width: 330,
    height: 450,
};

/// ライブ表示中のボタンラベル
pub const LIVE_LABEL: &str = "📸 Foto";
/// 静止画表示中のボタンラベル（撮り直し）
pub const FROZEN_LABEL: &str = "🔃 Ulang";

/// カメラと描画面
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// ストリームを取得して映像要素に接続する
    async fn acquire_stream(&self, constraints: StreamConstraints) -> Result<()>;

    /// 現在の映像フレームを描画面に描き、PNG Data URLを返す
    fn paint_frame(&self, size: SurfaceSize) -> Result<String>;

    /// 受け入れた写真ペイロードを描画面に表示する
    fn show_photo(&self, payload: &str);

    fn pause(&self);

    fn resume(&self);
}

/// 保存済み写真の読み込み
///
/// 表示中の描画面には触れない。表示は受け入れ後に `Camera::show_photo` が行う。
#[allow(async_fn_in_trait)]
pub trait PhotoLoader {
    /// `url` の画像を読み込み、PNG Data URLを返す
    async fn load_photo(&self, url: &str, size: SurfaceSize) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    LivePreview,
    FrozenPhoto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreamStatus {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

/// 画面に反映する表示状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureView {
    pub video_visible: bool,
    pub canvas_visible: bool,
    pub label: &'static str,
}

/// 写真読み込みの受付票
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoTicket {
    pub url: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct CaptureController {
    state: CaptureState,
    stream: StreamStatus,
    payload: String,
    generation: u64,
}

impl CaptureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn stream_status(&self) -> &StreamStatus {
        &self.stream
    }

    /// フォームの `photo` フィールドに入る値
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn view(&self) -> CaptureView {
        match self.state {
            CaptureState::LivePreview => CaptureView {
                video_visible: true,
                canvas_visible: false,
                label: LIVE_LABEL,
            },
            CaptureState::FrozenPhoto => CaptureView {
                video_visible: false,
                canvas_visible: true,
                label: FROZEN_LABEL,
            },
        }
    }

    /// ストリームを一度だけ要求する。失敗は記録してログに出すだけ。
    pub async fn acquire_stream<C: Camera>(&mut self, camera: &C) -> bool {
        let result = camera.acquire_stream(STREAM_CONSTRAINTS).await;
        self.finish_acquire(result)
    }

    /// 共有状態を await 中に借用できない呼び出し側向け
    pub fn finish_acquire(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                log::debug!("camera stream ready");
                self.stream = StreamStatus::Ready;
                true
            }
            Err(e) => {
                log::error!("camera stream unavailable: {}", e);
                self.stream = StreamStatus::Failed(e.to_string());
                false
            }
        }
    }

    /// ライブ ⇔ 静止画 を切り替える
    ///
    /// ライブからの撮影にはストリームが必要。静止画からライブへは常に戻れる。
    pub fn toggle_capture<C: Camera>(&mut self, camera: &C) -> Result<CaptureState> {
        match self.state {
            CaptureState::LivePreview => {
                if self.stream != StreamStatus::Ready {
                    return Err(Error::StreamNotReady);
                }
                let payload = camera.paint_frame(CANVAS_SIZE)?;
                camera.pause();
                self.freeze(payload);
            }
            CaptureState::FrozenPhoto => {
                if self.stream == StreamStatus::Ready {
                    camera.resume();
                }
                self.state = CaptureState::LivePreview;
                self.payload.clear();
                self.generation += 1;
            }
        }
        Ok(self.state)
    }

    /// 保存済み写真の読み込みを開始する。参照が空なら何もしない。
    pub fn begin_photo_load(&mut self, photo_base: &str, reference: &str) -> Option<PhotoTicket> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.generation += 1;
        Some(PhotoTicket {
            url: photo_url(photo_base, reference),
            generation: self.generation,
        })
    }

    /// 読み込み結果を反映する
    ///
    /// 失敗・空の結果・古い受付票は状態を変えず false を返す。
    pub fn finish_photo_load<C: Camera>(
        &mut self,
        ticket: &PhotoTicket,
        result: Result<String>,
        camera: &C,
    ) -> bool {
        if ticket.generation != self.generation {
            log::warn!("discarding superseded photo load: {}", ticket.url);
            return false;
        }
        match result {
            Ok(payload) if !payload.is_empty() => {
                if self.state == CaptureState::LivePreview && self.stream == StreamStatus::Ready {
                    camera.pause();
                }
                camera.show_photo(&payload);
                self.freeze(payload);
                true
            }
            Ok(_) => {
                log::warn!("photo load produced an empty payload: {}", ticket.url);
                false
            }
            Err(e) => {
                log::warn!("photo load failed for {}: {}", ticket.url, e);
                false
            }
        }
    }

    /// 保存済み写真を読み込んで静止画状態にする
    pub async fn load_existing_photo<L: PhotoLoader, C: Camera>(
        &mut self,
        loader: &L,
        camera: &C,
        photo_base: &str,
        reference: &str,
    ) -> bool {
        let Some(ticket) = self.begin_photo_load(photo_base, reference) else {
            return false;
        };
        let result = loader.load_photo(&ticket.url, CANVAS_SIZE).await;
        self.finish_photo_load(&ticket, result, camera)
    }

    fn freeze(&mut self, payload: String) {
        self.state = CaptureState::FrozenPhoto;
        self.payload = payload;
        self.generation += 1;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeCamera, FakeLoader};
    use super::*;
    use futures::executor::block_on;

    fn ready_controller(camera: &FakeCamera) -> CaptureController {
        let mut controller = CaptureController::new();
        assert!(block_on(controller.acquire_stream(camera)));
        controller
    }

    #[test]
    fn test_initial_state_is_live_preview() {
        let controller = CaptureController::new();
        assert_eq!(controller.state(), CaptureState::LivePreview);
        assert_eq!(controller.payload(), "");
        assert_eq!(controller.view().label, LIVE_LABEL);
        assert!(controller.view().video_visible);
        assert!(!controller.view().canvas_visible);
    }

    #[test]
    fn test_acquire_uses_fixed_constraints() {
        let camera = FakeCamera::default();
        let controller = ready_controller(&camera);
        assert_eq!(*controller.stream_status(), StreamStatus::Ready);

        let constraints = camera.constraints.borrow().expect("制約が渡されていない");
        assert_eq!(constraints.ideal_width, 330);
        assert_eq!(constraints.ideal_height, 440);
        assert!((constraints.aspect_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_acquire_failure_is_recorded() {
        let camera = FakeCamera {
            fail_acquire: true,
            ..Default::default()
        };
        let mut controller = CaptureController::new();
        assert!(!block_on(controller.acquire_stream(&camera)));
        assert!(matches!(controller.stream_status(), StreamStatus::Failed(_)));
    }

    #[test]
    fn test_toggle_freezes_frame() {
        let camera = FakeCamera::default();
        let mut controller = ready_controller(&camera);

        let state = controller.toggle_capture(&camera).unwrap();
        assert_eq!(state, CaptureState::FrozenPhoto);
        assert!(controller.payload().starts_with("data:image/png;base64,"));
        assert!(camera.paused.get());
        assert_eq!(camera.last_size.get(), Some(CANVAS_SIZE));

        let view = controller.view();
        assert!(!view.video_visible);
        assert!(view.canvas_visible);
        assert_eq!(view.label, FROZEN_LABEL);
    }

    #[test]
    fn test_toggle_twice_restores_live_preview() {
        let camera = FakeCamera::default();
        let mut controller = ready_controller(&camera);
        let before = controller.view();

        controller.toggle_capture(&camera).unwrap();
        controller.toggle_capture(&camera).unwrap();

        assert_eq!(controller.state(), CaptureState::LivePreview);
        assert_eq!(controller.view(), before);
        assert_eq!(controller.payload(), "");
        assert!(!camera.paused.get());
    }

    #[test]
    fn test_toggle_before_stream_is_rejected() {
        let camera = FakeCamera::default();
        let mut controller = CaptureController::new();

        let result = controller.toggle_capture(&camera);
        assert!(matches!(result, Err(Error::StreamNotReady)));
        assert_eq!(controller.state(), CaptureState::LivePreview);
        assert_eq!(camera.frames.get(), 0);
    }

    #[test]
    fn test_load_existing_photo_freezes() {
        let camera = FakeCamera::default();
        let loader = FakeLoader::ok("data:image/png;base64,UEhPVE8=");
        let mut controller = ready_controller(&camera);

        let loaded = block_on(controller.load_existing_photo(
            &loader,
            &camera,
            "http://localhost:8080",
            "static/uploads/U1.png",
        ));

        assert!(loaded);
        assert_eq!(controller.state(), CaptureState::FrozenPhoto);
        assert_eq!(controller.payload(), "data:image/png;base64,UEhPVE8=");
        assert_eq!(*camera.surface.borrow(), controller.payload());
        assert!(camera.paused.get());
        assert_eq!(
            loader.urls.borrow().as_slice(),
            ["http://localhost:8080/static/uploads/U1.png"]
        );
    }

    #[test]
    fn test_load_failure_keeps_prior_state() {
        let camera = FakeCamera::default();
        let loader = FakeLoader::failing("SecurityError: The canvas has been tainted");
        let mut controller = ready_controller(&camera);
        controller.toggle_capture(&camera).unwrap();
        let payload = controller.payload().to_string();

        let loaded = block_on(controller.load_existing_photo(&loader, &camera, "", "x.png"));

        assert!(!loaded);
        assert_eq!(controller.state(), CaptureState::FrozenPhoto);
        assert_eq!(controller.payload(), payload);
        assert_eq!(*camera.surface.borrow(), payload);
    }

    #[test]
    fn test_empty_payload_is_not_accepted() {
        let camera = FakeCamera::default();
        let loader = FakeLoader::ok("");
        let mut controller = ready_controller(&camera);

        assert!(!block_on(controller.load_existing_photo(&loader, &camera, "", "x.png")));
        assert_eq!(controller.state(), CaptureState::LivePreview);
    }

    #[test]
    fn test_empty_reference_skips_load() {
        let camera = FakeCamera::default();
        let loader = FakeLoader::ok("data:image/png;base64,AA==");
        let mut controller = ready_controller(&camera);

        assert!(!block_on(controller.load_existing_photo(&loader, &camera, "", "  ")));
        assert!(loader.urls.borrow().is_empty());
    }

    #[test]
    fn test_retake_during_load_discards_result() {
        let camera = FakeCamera::default();
        let mut controller = ready_controller(&camera);

        let ticket = controller.begin_photo_load("", "old.png").unwrap();
        controller.toggle_capture(&camera).unwrap();
        let captured = controller.payload().to_string();

        let applied = controller.finish_photo_load(
            &ticket,
            Ok("data:image/png;base64,T0xE".to_string()),
            &camera,
        );
        assert!(!applied);
        assert_eq!(controller.payload(), captured);
        assert_eq!(*camera.surface.borrow(), captured);
    }

    #[test]
    fn test_newer_photo_load_wins() {
        let camera = FakeCamera::default();
        let mut controller = ready_controller(&camera);

        let first = controller.begin_photo_load("", "a.png").unwrap();
        let second = controller.begin_photo_load("", "b.png").unwrap();

        let newer = Ok("data:image/png;base64,Qg==".to_string());
        let older = Ok("data:image/png;base64,QQ==".to_string());

        assert!(controller.finish_photo_load(&second, newer, &camera));
        assert!(!controller.finish_photo_load(&first, older, &camera));
        assert_eq!(controller.payload(), "data:image/png;base64,Qg==");
        assert_eq!(*camera.surface.borrow(), controller.payload());
    }

    #[test]
    fn test_loaded_photo_then_toggle_returns_live() {
        let camera = FakeCamera::default();
        let loader = FakeLoader::ok("data:image/png;base64,AA==");
        let mut controller = ready_controller(&camera);
        block_on(controller.load_existing_photo(&loader, &camera, "", "a.png"));

        controller.toggle_capture(&camera).unwrap();
        assert_eq!(controller.state(), CaptureState::LivePreview);
        assert_eq!(controller.view().label, LIVE_LABEL);
    }
}
