//! getUserMedia + canvas によるカメラ

use std::cell::Cell;
use std::rc::Rc;

use idcard_common::{Camera, Error, Result, StreamConstraints, SurfaceSize, CANVAS_SIZE};
use leptos::html;
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MediaStream, MediaStreamConstraints};

use super::photo::load_image;

#[derive(Serialize)]
struct Ideal {
    ideal: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    aspect_ratio: f64,
    width: Ideal,
    height: Ideal,
}

impl From<StreamConstraints> for VideoConstraints {
    fn from(c: StreamConstraints) -> Self {
        Self {
            aspect_ratio: c.aspect_ratio,
            width: Ideal { ideal: c.ideal_width },
            height: Ideal { ideal: c.ideal_height },
        }
    }
}

fn media(e: JsValue) -> Error {
    Error::Media(format!("{:?}", e))
}

/// `<video>` と `<canvas>` の組
///
/// `painted` は描画面への書き込み回数。遅れて届いた表示要求は古ければ捨てる。
#[derive(Clone)]
pub struct BrowserCamera {
    video: NodeRef<html::Video>,
    canvas: NodeRef<html::Canvas>,
    painted: Rc<Cell<u64>>,
}

impl BrowserCamera {
    pub fn new(video: NodeRef<html::Video>, canvas: NodeRef<html::Canvas>) -> Self {
        Self {
            video,
            canvas,
            painted: Rc::new(Cell::new(0)),
        }
    }

    fn next_paint(&self) -> u64 {
        let next = self.painted.get() + 1;
        self.painted.set(next);
        next
    }
}

/// canvas を指定サイズにして 2D コンテキストを得る
pub(crate) fn prepare_surface(
    canvas: &HtmlCanvasElement,
    size: SurfaceSize,
) -> Result<CanvasRenderingContext2d> {
    canvas.set_width(size.width);
    canvas.set_height(size.height);
    canvas
        .get_context("2d")
        .map_err(media)?
        .ok_or_else(|| Error::Media("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::Media("2d context unavailable".into()))
}

impl Camera for BrowserCamera {
    async fn acquire_stream(&self, constraints: StreamConstraints) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| Error::Media("no window".into()))?;
        let devices = window.navigator().media_devices().map_err(media)?;

        let video_constraints = serde_wasm_bindgen::to_value(&VideoConstraints::from(constraints))
            .map_err(|e| Error::Media(e.to_string()))?;
        let request = MediaStreamConstraints::new();
        request.set_video(&video_constraints);

        let promise = devices
            .get_user_media_with_constraints(&request)
            .map_err(media)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(media)?
            .dyn_into()
            .map_err(media)?;

        let video = self
            .video
            .get_untracked()
            .ok_or_else(|| Error::Media("video element not mounted".into()))?;
        video.set_src_object(Some(&stream));
        let _ = video.play();
        Ok(())
    }

    fn paint_frame(&self, size: SurfaceSize) -> Result<String> {
        let video = self.video.get_untracked().ok_or(Error::StreamNotReady)?;
        let canvas = self
            .canvas
            .get_untracked()
            .ok_or_else(|| Error::Media("canvas element not mounted".into()))?;

        self.next_paint();
        let context = prepare_surface(&canvas, size)?;
        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                size.width as f64,
                size.height as f64,
            )
            .map_err(media)?;
        canvas.to_data_url_with_type("image/png").map_err(media)
    }

    fn show_photo(&self, payload: &str) {
        let Some(canvas) = self.canvas.get_untracked() else {
            log::warn!("canvas element not mounted");
            return;
        };
        let paint = self.next_paint();
        let painted = self.painted.clone();
        let payload = payload.to_string();

        spawn_local(async move {
            let image = match load_image(&payload).await {
                Ok(image) => image,
                Err(e) => {
                    log::error!("accepted photo could not be shown: {}", e);
                    return;
                }
            };
            if painted.get() != paint {
                return;
            }
            let drawn = prepare_surface(&canvas, CANVAS_SIZE).and_then(|context| {
                context
                    .draw_image_with_html_image_element_and_dw_and_dh(
                        &image,
                        0.0,
                        0.0,
                        CANVAS_SIZE.width as f64,
                        CANVAS_SIZE.height as f64,
                    )
                    .map_err(media)
            });
            if let Err(e) = drawn {
                log::error!("accepted photo could not be shown: {}", e);
            }
        });
    }

    fn pause(&self) {
        if let Some(video) = self.video.get_untracked() {
            let _ = video.pause();
        }
    }

    fn resume(&self) {
        if let Some(video) = self.video.get_untracked() {
            let _ = video.play();
        }
    }
}
