use crate::error::{AppError, AppResult};
use image::ImageFormat;
use std::io::Cursor;

pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024; // 5 MB
pub const THUMBNAIL_EDGE: u32 = 75;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Validate file magic bytes match the declared content type.
fn validate_magic_bytes(data: &[u8], content_type: &str) -> bool {
    match content_type {
        "image/jpeg" => data.len() >= 3 && data[..3] == [0xFF, 0xD8, 0xFF],
        "image/png" => data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47],
        "image/gif" => data.len() >= 4 && data[..4] == [0x47, 0x49, 0x46, 0x38],
        "image/webp" => {
            data.len() >= 12
                && data[..4] == [0x52, 0x49, 0x46, 0x46]
                && data[8..12] == [0x57, 0x45, 0x42, 0x50]
        }
        _ => false,
    }
}

/// Validate an uploaded profile photo and shrink it to a 75x75 PNG thumbnail.
pub fn process_profile_photo(data: &[u8], content_type: &str) -> AppResult<Vec<u8>> {
    if data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::PayloadTooLarge);
    }

    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::Validation(format!(
            "Unsupported file type: {}. Allowed: jpeg, png, gif, webp",
            content_type
        )));
    }

    if !validate_magic_bytes(data, content_type) {
        return Err(AppError::Validation(
            "File content does not match declared content type".to_string(),
        ));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| AppError::Validation(format!("Unreadable image: {e}")))?;
    let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);

    let mut out = Cursor::new(Vec::new());
    thumb
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode thumbnail: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 30, 200]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn thumbnail_shrinks_large_image() {
        let data = sample_png(600, 400);
        let thumb = process_profile_photo(&data, "image/png").unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert!(decoded.width() <= THUMBNAIL_EDGE);
        assert!(decoded.height() <= THUMBNAIL_EDGE);
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let data = sample_png(20, 20);
        let thumb = process_profile_photo(&data, "image/png").unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 20);
    }

    #[test]
    fn rejects_unknown_content_type() {
        let data = sample_png(10, 10);
        assert!(process_profile_photo(&data, "application/pdf").is_err());
    }

    #[test]
    fn rejects_mismatched_magic_bytes() {
        let data = sample_png(10, 10);
        // PNG bytes declared as JPEG
        assert!(process_profile_photo(&data, "image/jpeg").is_err());
    }

    #[test]
    fn rejects_oversized_payload() {
        let data = vec![0u8; MAX_PHOTO_SIZE + 1];
        assert!(matches!(
            process_profile_photo(&data, "image/png"),
            Err(AppError::PayloadTooLarge)
        ));
    }
}
