//! Mask geometry and application.
//!
//! A validated number's bounding box lives in the rotation candidate's
//! coordinate space. The mask plan partitions that box into twelve
//! equal-width column slices (digits read left to right), covers the first
//! eight, and maps the covered region back into the original image's
//! coordinate space through the inverse rotation. The fill is a solid
//! rectangle, so applying the same plan twice produces a pixel-identical
//! result.

use crate::core::config::{ID_NUMBER_LEN, REVEAL_SUFFIX_LEN};
use crate::domain::ValidatedNumber;
use crate::processors::rotation::RotatedFrame;
use crate::processors::PixelRect;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Fill color for masked regions.
const MASK_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// The region to obscure, in original image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskPlan {
    /// Axis-aligned region to fill, in the ORIGINAL image's coordinates.
    pub rect: PixelRect,
    /// Number of trailing digits left visible.
    pub reveal_suffix_len: usize,
}

/// Computes the mask plan for a validated number.
///
/// The masked rectangle spans the first eight of twelve digit slices; the
/// revealed slices and the masked rectangle tile the digit run exactly.
/// The rectangle is then carried back into original-image coordinates via
/// the candidate's inverse rotation and clamped to the image bounds.
///
/// The mapped region is the axis-aligned bounding box of the inverse-
/// rotated corners. At quarter turns this is exact; at oblique angles it
/// over-covers, so masking can encroach on the revealed digits but never
/// leave a masked slice exposed.
///
/// # Arguments
///
/// * `number` - The validated number (box in candidate coordinates).
/// * `frame` - The rotation candidate the number was found in.
///
/// # Returns
///
/// The mask plan in original-image coordinates.
pub fn compute_mask_plan(number: &ValidatedNumber, frame: &RotatedFrame) -> MaskPlan {
    let run = number.source_rect;
    let slice_width = run.width() / ID_NUMBER_LEN as f32;
    let masked_slices = (ID_NUMBER_LEN - REVEAL_SUFFIX_LEN) as f32;

    let masked_in_candidate = PixelRect::new(
        run.x1,
        run.y1,
        run.x1 + slice_width * masked_slices,
        run.y2,
    );

    let (orig_w, orig_h) = frame.original_size;
    let rect = frame
        .rect_to_original(&masked_in_candidate)
        .clamp_to(orig_w, orig_h);

    MaskPlan {
        rect,
        reveal_suffix_len: REVEAL_SUFFIX_LEN,
    }
}

/// Applies a mask plan to an image with an opaque solid fill.
///
/// Out-of-bounds coordinates are clamped. Masking an already-masked region
/// again produces a visually identical result.
pub fn apply_mask(image: &mut RgbImage, plan: &MaskPlan) {
    let (width, height) = image.dimensions();
    let rect = plan.rect.clamp_to(width, height);
    if rect.is_empty() {
        tracing::warn!("Mask rectangle is empty after clamping, nothing to fill");
        return;
    }

    let x_start = rect.x1.floor() as u32;
    let y_start = rect.y1.floor() as u32;
    let x_end = (rect.x2.ceil() as u32).min(width);
    let y_end = (rect.y2.ceil() as u32).min(height);

    for y in y_start..y_end {
        for x in x_start..x_end {
            image.put_pixel(x, y, MASK_FILL);
        }
    }
}
