//! Invertible image rotation with canvas expansion.
//!
//! Rotation candidates are produced by rotating the original buffer about
//! its center onto a canvas large enough that no corner is clipped. The
//! axis-aligned angles use the exact `imageops` rotations; every other
//! angle goes through an affine warp with a white border fill. Both paths
//! share one continuous forward mapping, so [`map_point_to_original`] is an
//! exact inverse and mask geometry can be carried back into the original
//! image's coordinate space.

use crate::processors::{PixelRect, Point};
use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Border fill for pixels outside the source image after rotation.
const BORDER_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// A rotated copy of the original image, together with the geometry needed
/// to map coordinates back.
#[derive(Debug, Clone)]
pub struct RotatedFrame {
    /// The rotated pixel buffer.
    pub image: RgbImage,
    /// The rotation angle applied, in degrees (counted clockwise).
    pub angle_degrees: u32,
    /// Dimensions of the original, unrotated image.
    pub original_size: (u32, u32),
}

impl RotatedFrame {
    /// Rotates `original` by `angle_degrees` about its center, expanding
    /// the canvas so that no content is clipped.
    pub fn rotate(original: &RgbImage, angle_degrees: u32) -> Self {
        let image = rotate_image(original, angle_degrees);
        Self {
            image,
            angle_degrees,
            original_size: original.dimensions(),
        }
    }

    /// Maps a point from this frame's coordinate space back to the
    /// original image's coordinate space.
    pub fn point_to_original(&self, p: Point) -> Point {
        map_point_to_original(
            p,
            self.angle_degrees,
            self.original_size,
            self.image.dimensions(),
        )
    }

    /// Maps a rectangle from this frame back to the original image as the
    /// axis-aligned bounding rectangle of its transformed corners.
    pub fn rect_to_original(&self, rect: &PixelRect) -> PixelRect {
        let corners = rect.corners().map(|c| self.point_to_original(c));
        // Four corners, never empty.
        PixelRect::bounding(&corners).unwrap_or(*rect)
    }
}

/// Rotates an image by the given angle (degrees, clockwise) about its
/// center, resizing the canvas to avoid corner clipping.
///
/// Angles that are multiples of 90° use the exact lossless rotations; all
/// other angles are warped with bilinear interpolation onto a white canvas.
pub fn rotate_image(image: &RgbImage, angle_degrees: u32) -> RgbImage {
    match angle_degrees % 360 {
        0 => image.clone(),
        90 => imageops::rotate90(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate270(image),
        angle => rotate_arbitrary(image, angle),
    }
}

/// Computes the expanded canvas size for a rotation by `theta` radians.
fn rotated_canvas_size(width: u32, height: u32, theta: f32) -> (u32, u32) {
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let w = width as f32;
    let h = height as f32;
    let new_w = (w * cos + h * sin).round().max(1.0) as u32;
    let new_h = (w * sin + h * cos).round().max(1.0) as u32;
    (new_w, new_h)
}

/// Rotates by an arbitrary angle using an affine warp onto an expanded
/// canvas, matching the continuous mapping used by [`map_point_to_original`].
fn rotate_arbitrary(image: &RgbImage, angle_degrees: u32) -> RgbImage {
    let theta = (angle_degrees as f32).to_radians();
    let (width, height) = image.dimensions();
    let (new_w, new_h) = rotated_canvas_size(width, height, theta);

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let new_center_x = new_w as f32 / 2.0;
    let new_center_y = new_h as f32 / 2.0;

    // Forward mapping: translate center to origin, rotate, translate to
    // the new canvas center.
    let projection = Projection::translate(new_center_x, new_center_y)
        * Projection::rotate(theta)
        * Projection::translate(-center_x, -center_y);

    let mut out = RgbImage::from_pixel(new_w, new_h, BORDER_FILL);
    warp_into(image, &projection, Interpolation::Bilinear, BORDER_FILL, &mut out);
    out
}

/// Maps a point from rotated-frame coordinates back to original-image
/// coordinates.
///
/// This is the exact inverse of the forward mapping applied by
/// [`rotate_image`], for any supported angle.
///
/// # Arguments
///
/// * `p` - The point in the rotated frame's coordinate space.
/// * `angle_degrees` - The rotation angle that produced the frame.
/// * `original_size` - Dimensions of the original image.
/// * `rotated_size` - Dimensions of the rotated frame.
pub fn map_point_to_original(
    p: Point,
    angle_degrees: u32,
    original_size: (u32, u32),
    rotated_size: (u32, u32),
) -> Point {
    let theta = (angle_degrees % 360) as f32;
    let theta = theta.to_radians();
    let (sin, cos) = theta.sin_cos();

    let center_x = original_size.0 as f32 / 2.0;
    let center_y = original_size.1 as f32 / 2.0;
    let rot_center_x = rotated_size.0 as f32 / 2.0;
    let rot_center_y = rotated_size.1 as f32 / 2.0;

    let dx = p.x - rot_center_x;
    let dy = p.y - rot_center_y;

    // Inverse rotation is the transpose of [[cos, -sin], [sin, cos]].
    Point::new(
        cos * dx + sin * dy + center_x,
        -sin * dx + cos * dy + center_y,
    )
}

/// Maps a point from original-image coordinates into the rotated frame.
pub fn map_point_to_rotated(
    p: Point,
    angle_degrees: u32,
    original_size: (u32, u32),
    rotated_size: (u32, u32),
) -> Point {
    let theta = (angle_degrees % 360) as f32;
    let theta = theta.to_radians();
    let (sin, cos) = theta.sin_cos();

    let center_x = original_size.0 as f32 / 2.0;
    let center_y = original_size.1 as f32 / 2.0;
    let rot_center_x = rotated_size.0 as f32 / 2.0;
    let rot_center_y = rotated_size.1 as f32 / 2.0;

    let dx = p.x - center_x;
    let dy = p.y - center_y;

    Point::new(
        cos * dx - sin * dy + rot_center_x,
        sin * dx + cos * dy + rot_center_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn axis_aligned_rotations_swap_dimensions() {
        let img = RgbImage::new(8, 4);
        assert_eq!(rotate_image(&img, 0).dimensions(), (8, 4));
        assert_eq!(rotate_image(&img, 90).dimensions(), (4, 8));
        assert_eq!(rotate_image(&img, 180).dimensions(), (8, 4));
        assert_eq!(rotate_image(&img, 270).dimensions(), (4, 8));
    }

    #[test]
    fn arbitrary_rotation_expands_canvas() {
        let img = RgbImage::new(100, 50);
        let rotated = rotate_image(&img, 45);
        let (w, h) = rotated.dimensions();
        assert!(w >= 100 && h >= 100);
    }

    #[test]
    fn quarter_turn_moves_pixel_to_expected_cell() {
        // Single red pixel at (1, 0) in a 4x2 image.
        let mut img = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));

        let rotated = rotate_image(&img, 90);
        assert_eq!(rotated.dimensions(), (2, 4));
        // rotate90 is clockwise: src (x, y) lands at (h - 1 - y, x).
        assert_eq!(*rotated.get_pixel(1, 1), Rgb([255, 0, 0]));
    }

    #[test]
    fn point_mapping_matches_imageops_quarter_turn() {
        // Pixel-center of src (1, 0) in a 4x2 image maps to the center of
        // dst (1, 1) under a clockwise quarter turn.
        let mapped = map_point_to_rotated(Point::new(1.5, 0.5), 90, (4, 2), (2, 4));
        assert!(close(mapped, Point::new(1.5, 1.5)));
    }

    #[test]
    fn map_back_inverts_map_forward() {
        for &angle in &[0, 15, 90, 135, 180, 255, 270, 345] {
            let original_size = (64, 48);
            let rotated_size =
                rotate_image(&RgbImage::new(64, 48), angle).dimensions();
            let p = Point::new(10.0, 20.0);
            let forward = map_point_to_rotated(p, angle, original_size, rotated_size);
            let back = map_point_to_original(forward, angle, original_size, rotated_size);
            assert!(close(p, back), "angle {} did not round-trip", angle);
        }
    }

    #[test]
    fn full_turn_is_identity() {
        let p = Point::new(3.0, 7.0);
        let mapped = map_point_to_original(p, 360, (10, 10), (10, 10));
        assert!(close(p, mapped));
    }
}
