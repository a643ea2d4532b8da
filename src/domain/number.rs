//! Validated identity numbers and redacted display formatting.

use crate::core::config::{ID_NUMBER_LEN, REVEAL_SUFFIX_LEN};
use crate::core::traits::OcrOutput;
use crate::processors::text::find_digit_run;
use crate::processors::PixelRect;
use serde::{Deserialize, Serialize};

/// The display marker returned when no identity number was found.
pub const NOT_DETECTED: &str = "Not detected";

/// An OCR-extracted digit run that has passed format checks and is trusted
/// for masking.
///
/// Invariant: `digits` is always exactly twelve ASCII digits. A failed
/// validation is `None` at the API boundary, never a partial number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedNumber {
    /// The twelve digits in reading order.
    digits: String,
    /// Bounding box of the digit run, in the rotation candidate's
    /// coordinate space.
    pub source_rect: PixelRect,
    /// The rotation angle (degrees) of the candidate it was found in.
    pub source_angle: u32,
}

impl ValidatedNumber {
    /// Returns the digits of the number.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the trailing digits left visible after masking.
    pub fn suffix(&self) -> &str {
        &self.digits[ID_NUMBER_LEN - REVEAL_SUFFIX_LEN..]
    }

    /// Formats the number for display with the leading groups obscured,
    /// e.g. `"XXXX XXXX 9012"`.
    pub fn redacted(&self) -> String {
        format!("XXXX XXXX {}", self.suffix())
    }
}

/// Applies format rules to OCR output to decide whether it contains a
/// plausible identity number, and recovers the run's bounding box.
#[derive(Debug, Clone, Default)]
pub struct NumberValidator;

impl NumberValidator {
    /// Creates a validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates OCR output read from a sub-region of a rotation candidate.
    ///
    /// The digit run's bounding box is derived from the OCR engine's
    /// per-character geometry when available (union of the matched digit
    /// boxes, shifted back into candidate coordinates); otherwise the whole
    /// sub-region box is used.
    ///
    /// # Arguments
    ///
    /// * `ocr` - Output of the OCR capability for the sub-region.
    /// * `sub_rect` - The sub-region's rectangle in candidate coordinates.
    /// * `angle_degrees` - The candidate's rotation angle.
    ///
    /// # Returns
    ///
    /// * `Some(ValidatedNumber)` - If a run of exactly twelve digits was found.
    /// * `None` - No qualifying run; validation fails for this candidate.
    pub fn validate(
        &self,
        ocr: &OcrOutput,
        sub_rect: PixelRect,
        angle_degrees: u32,
    ) -> Option<ValidatedNumber> {
        let run = find_digit_run(&ocr.text)?;

        let source_rect = if ocr.has_char_geometry() {
            self.rect_from_char_geometry(ocr, &run.digit_offsets, sub_rect)
        } else {
            sub_rect
        };

        Some(ValidatedNumber {
            digits: run.digits,
            source_rect,
            source_angle: angle_degrees,
        })
    }

    /// Unions the character boxes of the matched digits, translated from
    /// sub-image coordinates into candidate coordinates. The translation
    /// uses the floored sub-region origin, matching where the crop actually
    /// starts for fractional detection boxes. Falls back to the full
    /// sub-region when an offset is out of range.
    fn rect_from_char_geometry(
        &self,
        ocr: &OcrOutput,
        digit_offsets: &[usize],
        sub_rect: PixelRect,
    ) -> PixelRect {
        let Some(boxes) = ocr.char_boxes.as_deref() else {
            return sub_rect;
        };

        let mut union: Option<PixelRect> = None;
        for &offset in digit_offsets {
            let Some(char_box) = boxes.get(offset) else {
                tracing::debug!(
                    "Character offset {} outside OCR geometry, using sub-region box",
                    offset
                );
                return sub_rect;
            };
            union = Some(match union {
                Some(u) => u.union(char_box),
                None => *char_box,
            });
        }

        match union {
            Some(u) => u.translate(sub_rect.x1.floor(), sub_rect.y1.floor()),
            None => sub_rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_reveals_last_four_digits() {
        let number = ValidatedNumber {
            digits: "123456789012".to_string(),
            source_rect: PixelRect::new(0.0, 0.0, 120.0, 20.0),
            source_angle: 0,
        };
        assert_eq!(number.redacted(), "XXXX XXXX 9012");
        assert_eq!(number.suffix(), "9012");
    }

    #[test]
    fn validate_rejects_text_without_run() {
        let validator = NumberValidator::new();
        let ocr = OcrOutput::text_only("name and address only");
        assert!(validator
            .validate(&ocr, PixelRect::new(0.0, 0.0, 100.0, 20.0), 0)
            .is_none());
    }

    #[test]
    fn validate_uses_sub_region_without_geometry() {
        let validator = NumberValidator::new();
        let ocr = OcrOutput::text_only("1234 5678 9012");
        let sub = PixelRect::new(10.0, 20.0, 130.0, 40.0);
        let number = validator.validate(&ocr, sub, 90).unwrap();
        assert_eq!(number.digits(), "123456789012");
        assert_eq!(number.source_rect, sub);
        assert_eq!(number.source_angle, 90);
    }

    #[test]
    fn validate_unions_char_geometry() {
        let validator = NumberValidator::new();
        // Twelve digits, one 10px-wide box per character.
        let text = "123456789012".to_string();
        let boxes: Vec<PixelRect> = (0..12)
            .map(|i| PixelRect::new(i as f32 * 10.0, 0.0, (i + 1) as f32 * 10.0, 20.0))
            .collect();
        let ocr = OcrOutput {
            text,
            char_boxes: Some(boxes),
        };
        let sub = PixelRect::new(100.0, 50.0, 220.0, 70.0);
        let number = validator.validate(&ocr, sub, 0).unwrap();
        // Union spans all twelve boxes, shifted by the sub-region origin.
        assert_eq!(number.source_rect, PixelRect::new(100.0, 50.0, 220.0, 70.0));
    }

    #[test]
    fn char_geometry_translates_by_floored_crop_origin() {
        let validator = NumberValidator::new();
        let boxes: Vec<PixelRect> = (0..12)
            .map(|i| PixelRect::new(i as f32 * 10.0, 0.0, (i + 1) as f32 * 10.0, 20.0))
            .collect();
        let ocr = OcrOutput {
            text: "123456789012".to_string(),
            char_boxes: Some(boxes),
        };
        // Fractional detection box; the crop starts at the floored origin,
        // so the boxes shift by (100, 50), not (100.7, 50.4).
        let sub = PixelRect::new(100.7, 50.4, 220.7, 70.4);
        let number = validator.validate(&ocr, sub, 0).unwrap();
        assert_eq!(number.source_rect, PixelRect::new(100.0, 50.0, 220.0, 70.0));
    }

    #[test]
    fn validate_falls_back_when_geometry_is_short() {
        let validator = NumberValidator::new();
        let ocr = OcrOutput {
            text: "ab 123456789012".to_string(),
            // Boxes cover only three of fifteen characters; the geometry is
            // inconsistent and the sub-region box is used instead.
            char_boxes: Some(vec![
                PixelRect::new(0.0, 0.0, 5.0, 10.0),
                PixelRect::new(5.0, 0.0, 10.0, 10.0),
                PixelRect::new(10.0, 0.0, 15.0, 10.0),
            ]),
        };
        let sub = PixelRect::new(0.0, 0.0, 150.0, 20.0);
        let number = validator.validate(&ocr, sub, 0).unwrap();
        assert_eq!(number.source_rect, sub);
    }
}
