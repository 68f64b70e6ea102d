use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tracing::debug;

use super::stamp;

pub const PICTURE_MIME: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum PictureError {
    #[error("the camera returned no frame")]
    NoFrame,
    #[error("failed to encode picture: {0}")]
    Encode(#[from] image::ImageError),
}

/// Label drawn into every picture
pub fn stamp_label(formatted: &str) -> String {
    format!("Captured: {}", formatted)
}

/// Stamp `frame` with `label` and encode it as JPEG
pub fn stamp_and_encode(mut frame: RgbImage, label: &str, quality: u8) -> Result<Vec<u8>, PictureError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(PictureError::NoFrame);
    }

    stamp::stamp(&mut frame, label);

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100)).write_image(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgb8,
    )?;

    debug!(
        "Encoded {}x{} picture: {} bytes",
        frame.width(),
        frame.height(),
        jpeg.len()
    );

    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_jpeg() {
        let frame = RgbImage::from_pixel(64, 48, image::Rgb([10, 200, 30]));
        let jpeg = stamp_and_encode(frame, "Captured: Jan 1, 2026, 00:00:00", 80).unwrap();

        // SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let result = stamp_and_encode(RgbImage::new(0, 0), "x", 80);
        assert!(matches!(result, Err(PictureError::NoFrame)));
    }
}
