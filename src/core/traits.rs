//! Capability contracts for the external detection and OCR engines.
//!
//! The pipeline treats the underlying object-detection model and OCR engine
//! as black-box capabilities with a fixed input/output contract. Production
//! implementations wrap real inference runtimes; tests inject deterministic
//! fakes, so the rotation/validation/masking logic can be unit-tested
//! without any model weights.
//!
//! Capability handles are shared read-only across concurrent pipeline
//! invocations, hence the `Send + Sync` bounds.

use crate::core::errors::MaskResult;
use crate::domain::RawDetection;
use crate::processors::PixelRect;
use image::RgbImage;
use std::fmt::Debug;

/// Object-detection capability.
pub trait DetectionCapability: Send + Sync + Debug {
    /// Runs detection on the given image.
    ///
    /// Returns the raw detections in the external model's own label
    /// vocabulary; the detector adapter normalizes them downstream.
    fn detect(&self, image: &RgbImage) -> MaskResult<Vec<RawDetection>>;
}

/// Raw text read from a sub-image by the OCR capability.
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    /// The recognized text, unnormalized.
    pub text: String,
    /// Optional per-character geometry, one rect per character of `text`,
    /// in the sub-image's coordinate space. Engines that cannot provide
    /// character geometry leave this `None`.
    pub char_boxes: Option<Vec<PixelRect>>,
}

impl OcrOutput {
    /// Creates an output with text only (no character geometry).
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            char_boxes: None,
        }
    }

    /// Returns true if per-character geometry is present and consistent
    /// with the text length.
    pub fn has_char_geometry(&self) -> bool {
        self.char_boxes
            .as_ref()
            .is_some_and(|boxes| boxes.len() == self.text.chars().count())
    }
}

/// OCR capability.
pub trait OcrCapability: Send + Sync + Debug {
    /// Reads text from a sub-image.
    fn read_text(&self, sub_image: &RgbImage) -> MaskResult<OcrOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_geometry_requires_matching_lengths() {
        let output = OcrOutput {
            text: "12".to_string(),
            char_boxes: Some(vec![PixelRect::new(0.0, 0.0, 5.0, 10.0)]),
        };
        assert!(!output.has_char_geometry());

        let output = OcrOutput {
            text: "12".to_string(),
            char_boxes: Some(vec![
                PixelRect::new(0.0, 0.0, 5.0, 10.0),
                PixelRect::new(5.0, 0.0, 10.0, 10.0),
            ]),
        };
        assert!(output.has_char_geometry());
    }

    #[test]
    fn text_only_has_no_geometry() {
        assert!(!OcrOutput::text_only("1234").has_char_geometry());
    }
}
