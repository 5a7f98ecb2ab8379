//! 写真ファイルをカメラの代わりに使う
//!
//! `acquire_stream` でファイルを読み込み、`paint_frame` でそれを描画面に描く。

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use idcard_common::{Camera, StreamConstraints, SurfaceSize};
use image::DynamicImage;

use crate::imaging;

pub struct StillCamera {
    path: Option<PathBuf>,
    frame: RefCell<Option<DynamicImage>>,
    paused: Cell<bool>,
}

impl StillCamera {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            frame: RefCell::new(None),
            paused: Cell::new(false),
        }
    }

    pub fn has_source(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

fn media_error(message: impl std::fmt::Display) -> idcard_common::Error {
    idcard_common::Error::Media(message.to_string())
}

impl Camera for StillCamera {
    async fn acquire_stream(&self, constraints: StreamConstraints) -> idcard_common::Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| media_error("写真ファイルが指定されていません"))?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| media_error(format!("{}: {}", path.display(), e)))?;
        let image = imaging::decode(&bytes).map_err(media_error)?;

        tracing::debug!(
            "still frame {}x{} (requested {}x{})",
            image.width(),
            image.height(),
            constraints.ideal_width,
            constraints.ideal_height
        );
        *self.frame.borrow_mut() = Some(image);
        Ok(())
    }

    fn paint_frame(&self, size: SurfaceSize) -> idcard_common::Result<String> {
        let frame = self.frame.borrow();
        let image = frame
            .as_ref()
            .ok_or(idcard_common::Error::StreamNotReady)?;
        imaging::paint(image, size).map_err(media_error)
    }

    /// 端末には表示面が無い。受け入れた写真は `save_payload` で保存する
    fn show_photo(&self, payload: &str) {
        tracing::debug!("accepted stored photo ({} bytes)", payload.len());
    }

    fn pause(&self) {
        self.paused.set(true);
    }

    fn resume(&self) {
        self.paused.set(false);
    }
}
