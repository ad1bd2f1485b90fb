//! QR rendering for payload strings.
//!
//! The generator hands over text only; these helpers turn it into a PNG or a
//! block-character string for a terminal.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use qrcode::render::unicode;
use qrcode::{Color, QrCode};

use crate::error::RenderError;

/// Pixels per QR module.
pub const MODULE_PX: u32 = 8;
/// Quiet-zone border in modules.
pub const QUIET_ZONE: u32 = 4;

pub fn to_png(text: &str, module_px: Option<u32>) -> Result<Vec<u8>, RenderError> {
    let image = to_image(text, module_px)?;
    let size = image.width();

    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(image.as_raw(), size, size, ExtendedColorType::L8)?;
    Ok(buf)
}

pub fn to_image(text: &str, module_px: Option<u32>) -> Result<GrayImage, RenderError> {
    let code = QrCode::new(text.as_bytes())?;
    let px = module_px.unwrap_or(MODULE_PX).max(1);
    let width = code.width() as u32;
    let colors = code.to_colors();
    let size = (width + QUIET_ZONE * 2) * px;

    let mut image = GrayImage::from_pixel(size, size, Luma([255u8]));
    for y in 0..width {
        for x in 0..width {
            if colors[(y * width + x) as usize] != Color::Dark {
                continue;
            }
            let left = (x + QUIET_ZONE) * px;
            let top = (y + QUIET_ZONE) * px;
            for dy in 0..px {
                for dx in 0..px {
                    image.put_pixel(left + dx, top + dy, Luma([0u8]));
                }
            }
        }
    }

    Ok(image)
}

/// Half-block rendering, two QR rows per terminal line.
pub fn to_terminal(text: &str) -> Result<String, RenderError> {
    let code = QrCode::new(text.as_bytes())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
