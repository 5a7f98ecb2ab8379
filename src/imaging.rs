//! 画像を描画面サイズのPNG Data URLにする
//!
//! ブラウザの `drawImage(img, 0, 0, w, h)` と同じく縦横比を無視して引き伸ばす。

use std::io::Cursor;

use crate::error::Result;
use idcard_common::payload::png_data_url;
use idcard_common::SurfaceSize;
use image::{imageops::FilterType, DynamicImage, ImageFormat};

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

pub fn paint(image: &DynamicImage, size: SurfaceSize) -> Result<String> {
    let resized = image.resize_exact(size.width, size.height, FilterType::Triangle);

    let mut buffer = Cursor::new(Vec::new());
    resized.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(png_data_url(buffer.get_ref()))
}

/// デコードして描画する
pub fn render_to_surface(bytes: &[u8], size: SurfaceSize) -> Result<String> {
    paint(&decode(bytes)?, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcard_common::payload::decode_data_url;
    use idcard_common::CANVAS_SIZE;
    use image::{Rgb, RgbImage};

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_render_stretches_to_canvas() {
        let data_url = render_to_surface(&sample_png(640, 480), CANVAS_SIZE).unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));

        let decoded = image::load_from_memory(&decode_data_url(&data_url).unwrap()).unwrap();
        assert_eq!(decoded.width(), 330);
        assert_eq!(decoded.height(), 450);
    }

    #[test]
    fn test_render_rejects_non_image() {
        assert!(render_to_surface(b"not an image", CANVAS_SIZE).is_err());
    }
}
