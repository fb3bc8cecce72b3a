use image::RgbaImage;
use pano_imgproc::resize_rgba;

use crate::{Result, StitchError};

/// Decode an encoded image (PNG, JPEG, ...) into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| StitchError::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

/// Cap the larger dimension at `max_dimension`, preserving aspect ratio.
///
/// Images already within the cap come back unchanged. Downscaling is
/// bilinear, matching the treatment both photos of a pair receive.
pub fn normalize(image: &RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let largest = width.max(height);
    if largest <= max_dimension {
        return image.clone();
    }

    let scale = max_dimension as f64 / largest as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    resize_rgba(image, new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn small_images_pass_through_unchanged() {
        let img = RgbaImage::from_pixel(640, 480, Rgba([10, 20, 30, 255]));
        let normalized = normalize(&img, 1024);
        assert_eq!(normalized.dimensions(), (640, 480));
        assert_eq!(normalized, img);
    }

    #[test]
    fn oversized_images_are_capped_at_max_dimension() {
        let img = RgbaImage::from_pixel(2048, 1536, Rgba([0, 0, 0, 255]));
        let normalized = normalize(&img, 1024);
        assert_eq!(normalized.width(), 1024);
        assert_eq!(normalized.height(), 768);
    }

    #[test]
    fn aspect_ratio_survives_within_rounding() {
        let img = RgbaImage::from_pixel(1500, 1100, Rgba([0, 0, 0, 255]));
        let normalized = normalize(&img, 1024);
        assert_eq!(normalized.width().max(normalized.height()), 1024);

        let original_ratio = 1500.0 / 1100.0;
        let new_ratio = normalized.width() as f64 / normalized.height() as f64;
        assert!((original_ratio - new_ratio).abs() < 0.01);
    }

    #[test]
    fn tall_images_cap_the_height() {
        let img = RgbaImage::from_pixel(600, 3000, Rgba([0, 0, 0, 255]));
        let normalized = normalize(&img, 1024);
        assert_eq!(normalized.height(), 1024);
        assert_eq!(normalized.width(), 205);
    }

    #[test]
    fn png_bytes_decode_to_rgba() {
        let img = RgbaImage::from_fn(12, 9, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(bytes.get_ref()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image(&[0x00, 0x01, 0x02, 0x03]).unwrap_err();
        assert!(matches!(err, StitchError::Decode(_)));
    }
}
