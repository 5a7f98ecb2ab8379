//! 保存済み写真を画面外の canvas に描いて data URL にする

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use idcard_common::{Error, PhotoLoader, Result, SurfaceSize};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement};

use super::camera::prepare_surface;

fn media(e: JsValue) -> Error {
    Error::Media(format!("{:?}", e))
}

/// `<img>` に読み込み、onload / onerror まで待つ
pub(crate) async fn load_image(url: &str) -> Result<HtmlImageElement> {
    let image = HtmlImageElement::new().map_err(media)?;
    // 別オリジンの写真でも canvas を汚さない
    image.set_cross_origin(Some("anonymous"));

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        })
    };
    let on_error = Closure::<dyn FnMut()>::new(move || {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    });
    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(url);

    let loaded = rx.await.unwrap_or(false);
    image.set_onload(None);
    image.set_onerror(None);
    if loaded {
        Ok(image)
    } else {
        Err(Error::Media(format!("failed to load {}", url)))
    }
}

fn offscreen_canvas() -> Result<HtmlCanvasElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Media("no document".into()))?
        .create_element("canvas")
        .map_err(media)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::Media("canvas element unavailable".into()))
}

/// 画面に出ていない canvas を使うので、失敗しても表示は変わらない
#[derive(Clone, Copy, Default)]
pub struct ImagePhotoLoader;

impl PhotoLoader for ImagePhotoLoader {
    async fn load_photo(&self, url: &str, size: SurfaceSize) -> Result<String> {
        let image = load_image(url).await?;

        let canvas = offscreen_canvas()?;
        let context = prepare_surface(&canvas, size)?;
        context
            .draw_image_with_html_image_element_and_dw_and_dh(
                &image,
                0.0,
                0.0,
                size.width as f64,
                size.height as f64,
            )
            .map_err(media)?;
        // 汚染された canvas は SecurityError になる
        canvas.to_data_url().map_err(media)
    }
}
