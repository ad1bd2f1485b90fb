use std::path::Path;

use image::DynamicImage;
use rqrr::PreparedImage;

use crate::error::ScanError;
use crate::payload::{self, ParsedPayload};

/// Decode the first QR code in `image` and parse it as a payload.
///
/// A QR code that decodes but does not hold a payload is not an error; it
/// comes back as [`ParsedPayload::Unstructured`].
pub fn read_payload(image: DynamicImage) -> Result<ParsedPayload, ScanError> {
    let content = read_text(image)?;
    let parsed = payload::parse(&content);
    if let ParsedPayload::Unstructured { reason, .. } = &parsed {
        tracing::info!(%reason, "scanned QR code is not a session payload");
    }
    Ok(parsed)
}

pub fn read_payload_from_file<P: AsRef<Path>>(path: P) -> Result<ParsedPayload, ScanError> {
    let image = image::open(path)?;
    read_payload(image)
}

pub fn read_payload_from_bytes(bytes: &[u8]) -> Result<ParsedPayload, ScanError> {
    let image = image::load_from_memory(bytes)?;
    read_payload(image)
}

fn read_text(image: DynamicImage) -> Result<String, ScanError> {
    let mut prepared = PreparedImage::prepare(image.to_luma8());
    let grids = prepared.detect_grids();
    let Some(grid) = grids.first() else {
        return Err(ScanError::NoQrCode);
    };

    let (_, content) = grid.decode().map_err(|e| ScanError::Decode(e.to_string()))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;
    use crate::payload::Payload;
    use crate::render;

    #[test]
    fn reads_back_rendered_payload() {
        let payload = Payload::new(12345, "450523");
        let png = render::to_png(&payload.encode(), None).unwrap();

        let parsed = read_payload_from_bytes(&png).unwrap();
        assert_eq!(parsed, ParsedPayload::Structured(payload));
    }

    #[test]
    fn foreign_qr_text_is_unstructured() {
        let png = render::to_png("hello attendance", None).unwrap();
        match read_payload_from_bytes(&png).unwrap() {
            ParsedPayload::Unstructured { raw, .. } => assert_eq!(raw, "hello attendance"),
            other => panic!("expected unstructured, got {other:?}"),
        }
    }

    #[test]
    fn blank_image_has_no_qr_code() {
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([255u8])));
        assert!(matches!(read_payload(blank), Err(ScanError::NoQrCode)));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(
            read_payload_from_bytes(b"definitely not an image"),
            Err(ScanError::Image(_))
        ));
    }
}
