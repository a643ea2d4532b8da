//! Image utility functions: decoding request bytes, encoding results, and
//! bounds-checked sub-region cropping.

use crate::core::errors::{MaskError, MaskResult};
use crate::processors::PixelRect;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Decodes request bytes into an RGB image.
///
/// # Errors
///
/// Returns `MaskError::ImageDecode` if the bytes are not a valid image in
/// any format supported by the image crate.
pub fn decode_image(bytes: &[u8]) -> MaskResult<RgbImage> {
    if bytes.is_empty() {
        return Err(MaskError::invalid_input("empty image bytes"));
    }
    let img = image::load_from_memory(bytes).map_err(MaskError::ImageDecode)?;
    Ok(dynamic_to_rgb(img))
}

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Encodes an image as PNG bytes.
///
/// # Errors
///
/// Returns `MaskError::ImageEncode` if encoding fails.
pub fn encode_png(image: &RgbImage) -> MaskResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(MaskError::ImageEncode)?;
    Ok(bytes)
}

/// Crops a sub-region from an image, clamping the rectangle to the image
/// bounds first.
///
/// Returns `None` when the clamped region covers no pixels (a degenerate
/// detection box), which callers treat as a failed candidate rather than
/// an error.
pub fn crop_sub_region(image: &RgbImage, rect: &PixelRect) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let rect = rect.clamp_to(width, height);
    if rect.is_empty() {
        return None;
    }

    let x = rect.x1.floor() as u32;
    let y = rect.y1.floor() as u32;
    let w = ((rect.x2.ceil() as u32).min(width)) - x;
    let h = ((rect.y2.ceil() as u32).min(height)) - y;
    if w == 0 || h == 0 {
        return None;
    }

    Some(image::imageops::crop_imm(image, x, y, w, h).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn decode_rejects_garbage_bytes() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(MaskError::ImageDecode(_))
        ));
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn encode_then_decode_preserves_dimensions() {
        let image = RgbImage::from_pixel(12, 7, Rgb([10, 20, 30]));
        let bytes = encode_png(&image).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(*decoded.get_pixel(0, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn crop_clamps_to_image_bounds() {
        let image = RgbImage::from_pixel(20, 10, Rgb([1, 2, 3]));
        let cropped =
            crop_sub_region(&image, &PixelRect::new(15.0, 5.0, 100.0, 100.0)).unwrap();
        assert_eq!(cropped.dimensions(), (5, 5));
    }

    #[test]
    fn crop_degenerate_region_returns_none() {
        let image = RgbImage::new(20, 10);
        assert!(crop_sub_region(&image, &PixelRect::new(30.0, 30.0, 40.0, 40.0)).is_none());
    }
}
