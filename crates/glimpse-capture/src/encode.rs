use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use glimpse_config::capture::CaptureConfig;
use glimpse_types::{BoundingBox, SelectionResult};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

/// Outline used for highlight boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: Rgba<u8>,
    pub thickness: u32,
}

impl From<&CaptureConfig> for HighlightStyle {
    fn from(config: &CaptureConfig) -> Self {
        let [r, g, b] = config.highlight_color;
        Self {
            color: Rgba([r, g, b, 255]),
            thickness: config.highlight_thickness,
        }
    }
}

/// Cut `crop` out of `image`; the box must lie inside the image
pub fn crop(image: &RgbaImage, crop: &BoundingBox) -> Result<RgbaImage> {
    anyhow::ensure!(
        crop.x2 <= image.width() && crop.y2 <= image.height(),
        "Crop box {:?} exceeds image {}x{}",
        crop,
        image.width(),
        image.height()
    );
    anyhow::ensure!(crop.width() > 0 && crop.height() > 0, "Crop box {:?} is empty", crop);

    Ok(
        image::imageops::crop_imm(image, crop.x1, crop.y1, crop.width(), crop.height())
            .to_image(),
    )
}

/// Outline each box inward by `style.thickness` pixels. Right and bottom
/// edges are exclusive; anything past the image is clipped.
pub fn draw_highlights(image: &mut RgbaImage, boxes: &[BoundingBox], style: HighlightStyle) {
    let (img_w, img_h) = image.dimensions();

    for b in boxes {
        let x1 = b.x1.min(img_w);
        let y1 = b.y1.min(img_h);
        let x2 = b.x2.min(img_w);
        let y2 = b.y2.min(img_h);

        for t in 0..style.thickness.max(1) {
            let (left, top) = (x1 + t, y1 + t);
            if left + t >= x2 || top + t >= y2 {
                break;
            }
            let (right, bottom) = (x2 - 1 - t, y2 - 1 - t);

            for x in left..=right {
                image.put_pixel(x, top, style.color);
                image.put_pixel(x, bottom, style.color);
            }
            for y in top..=bottom {
                image.put_pixel(left, y, style.color);
                image.put_pixel(right, y, style.color);
            }
        }
    }
}

/// JPEG bytes of `image` with alpha dropped
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut buffer = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .context("Failed to encode JPEG")?;
    Ok(buffer)
}

pub fn to_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64.encode(jpeg))
}

/// Crop the selection out of the screenshot, draw its highlight boxes onto
/// the cropped image and return it as a base64 JPEG data URL
pub fn crop_and_encode(
    screenshot: &RgbaImage,
    selection: &SelectionResult,
    quality: u8,
    style: HighlightStyle,
) -> Result<String> {
    let mut cropped = crop(screenshot, &selection.crop_box())?;
    draw_highlights(&mut cropped, selection.highlight_boxes(), style);

    let jpeg = encode_jpeg(&cropped, quality)?;
    tracing::debug!(
        "Encoded {}x{} crop with {} highlight(s): {} bytes",
        cropped.width(),
        cropped.height(),
        selection.highlight_boxes().len(),
        jpeg.len()
    );
    Ok(to_data_url(&jpeg))
}
