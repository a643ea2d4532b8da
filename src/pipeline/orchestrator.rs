//! Rotation search across candidate angles.
//!
//! The orchestrator drives the detector adapter and number validator over a
//! sequence of candidate rotations. Fast mode tries the four axis-aligned
//! angles in a fixed order and stops at the first validated number
//! (upright-or-axis-aligned photographs dominate real traffic).
//! Comprehensive mode sweeps all 15°-spaced angles without early exit and
//! keeps the candidate with the highest detector confidence, ties broken
//! toward the angle nearest upright.
//!
//! Per-candidate work is a pure function of its own rotated buffer, so
//! comprehensive mode may evaluate candidates in parallel without changing
//! the selected winner.

use crate::core::config::ROTATION_STEP_DEGREES;
use crate::core::errors::MaskResult;
use crate::core::traits::{DetectionCapability, OcrCapability};
use crate::domain::{Detection, DetectionLabel, DetectorAdapter, NumberValidator, ValidatedNumber};
use crate::processors::rotation::RotatedFrame;
use crate::utils::crop_sub_region;
use image::RgbImage;
use rayon::prelude::*;
use std::sync::Arc;

/// The axis-aligned angles tried by fast mode, in order.
pub const FAST_ANGLES: [u32; 4] = [0, 90, 180, 270];

/// Rotation search policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Axis-aligned angles only, first hit wins.
    Fast,
    /// Full 15°-stepped sweep, best hit wins.
    Comprehensive,
}

/// A successful search outcome: the validated number, the rotation
/// candidate it came from, and the confidence of the backing detection.
#[derive(Debug)]
pub struct SearchHit {
    /// The validated identity number.
    pub number: ValidatedNumber,
    /// The rotation candidate the number was found in.
    pub frame: RotatedFrame,
    /// Confidence of the detection whose region validated.
    pub confidence: f32,
}

impl SearchHit {
    /// Absolute rotation away from upright, in degrees (0..=180).
    fn absolute_rotation(&self) -> u32 {
        let angle = self.number.source_angle % 360;
        angle.min(360 - angle)
    }
}

/// Picks the winning hit: highest confidence, ties broken by smallest
/// absolute rotation, then by smaller angle value. Total order, so the
/// result does not depend on evaluation order.
fn select_best(candidates: Vec<SearchHit>) -> Option<SearchHit> {
    candidates.into_iter().reduce(|best, hit| {
        let better = hit.confidence > best.confidence
            || (hit.confidence == best.confidence
                && (hit.absolute_rotation() < best.absolute_rotation()
                    || (hit.absolute_rotation() == best.absolute_rotation()
                        && hit.number.source_angle < best.number.source_angle)));
        if better {
            hit
        } else {
            best
        }
    })
}

/// Drives detection and validation across candidate rotation angles.
#[derive(Debug, Clone)]
pub struct RotationOrchestrator {
    detector: Arc<dyn DetectionCapability>,
    ocr: Arc<dyn OcrCapability>,
    adapter: DetectorAdapter,
    validator: NumberValidator,
}

impl RotationOrchestrator {
    /// Creates an orchestrator over the given capabilities.
    pub fn new(
        detector: Arc<dyn DetectionCapability>,
        ocr: Arc<dyn OcrCapability>,
        adapter: DetectorAdapter,
    ) -> Self {
        Self {
            detector,
            ocr,
            adapter,
            validator: NumberValidator::new(),
        }
    }

    /// Runs the rotation search.
    ///
    /// Capability failures at individual angles are absorbed and the search
    /// advances; only when no angle validates *and* every attempted angle
    /// failed with a capability error does the last error propagate.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(hit))` - A validated number was found.
    /// * `Ok(None)` - Search exhausted; a normal terminal outcome.
    /// * `Err(_)` - Every candidate angle failed fatally.
    pub fn search(
        &self,
        original: &RgbImage,
        mode: SearchMode,
        parallel: bool,
    ) -> MaskResult<Option<SearchHit>> {
        match mode {
            SearchMode::Fast => self.search_fast(original),
            SearchMode::Comprehensive => self.search_comprehensive(original, parallel),
        }
    }

    /// Fast search: fixed angle order, first validated number wins.
    fn search_fast(&self, original: &RgbImage) -> MaskResult<Option<SearchHit>> {
        let mut last_error = None;
        let mut failed_angles = 0;

        for angle in FAST_ANGLES {
            match self.evaluate_angle(original, angle) {
                Ok(Some(hit)) => {
                    tracing::debug!(
                        "Fast search: validated number at {}° (confidence {:.2})",
                        angle,
                        hit.confidence
                    );
                    return Ok(Some(hit));
                }
                Ok(None) => {
                    tracing::debug!("Fast search: no valid number at {}°", angle);
                }
                Err(error) => {
                    tracing::warn!("Fast search: capability failure at {}°: {}", angle, error);
                    failed_angles += 1;
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) if failed_angles == FAST_ANGLES.len() => Err(error),
            _ => Ok(None),
        }
    }

    /// Comprehensive search: full sweep, no early exit, best hit wins.
    fn search_comprehensive(
        &self,
        original: &RgbImage,
        parallel: bool,
    ) -> MaskResult<Option<SearchHit>> {
        let angles: Vec<u32> = (0..360).step_by(ROTATION_STEP_DEGREES as usize).collect();
        let total = angles.len();

        let outcomes: Vec<(u32, MaskResult<Option<SearchHit>>)> = if parallel {
            angles
                .into_par_iter()
                .map(|angle| (angle, self.evaluate_angle(original, angle)))
                .collect()
        } else {
            angles
                .into_iter()
                .map(|angle| (angle, self.evaluate_angle(original, angle)))
                .collect()
        };

        let mut candidates = Vec::new();
        let mut last_error = None;
        let mut failed_angles = 0;

        for (angle, outcome) in outcomes {
            match outcome {
                Ok(Some(hit)) => {
                    tracing::debug!(
                        "Comprehensive search: validated number at {}° (confidence {:.2})",
                        angle,
                        hit.confidence
                    );
                    candidates.push(hit);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        "Comprehensive search: capability failure at {}°: {}",
                        angle,
                        error
                    );
                    failed_angles += 1;
                    last_error = Some(error);
                }
            }
        }

        if let Some(best) = select_best(candidates) {
            return Ok(Some(best));
        }
        match last_error {
            Some(error) if failed_angles == total => Err(error),
            _ => Ok(None),
        }
    }

    /// Evaluates one rotation candidate: detect, then validate the text of
    /// each relevant region with the two-tier label fallback.
    ///
    /// Tier 1 trusts `NumberField` detections; tier 2 falls back to whole
    /// `Card` detections, because the detector's field-level labels are
    /// less reliable than its card-level localization.
    fn evaluate_angle(&self, original: &RgbImage, angle: u32) -> MaskResult<Option<SearchHit>> {
        let frame = RotatedFrame::rotate(original, angle);
        let raw = self.detector.detect(&frame.image)?;
        let detections = self.adapter.normalize(raw);
        if detections.is_empty() {
            return Ok(None);
        }

        for tier in [DetectionLabel::NumberField, DetectionLabel::Card] {
            for detection in detections.iter().filter(|d| d.label == tier) {
                if let Some(hit) = self.validate_region(&frame, detection)? {
                    return Ok(Some(hit));
                }
            }
        }
        Ok(None)
    }

    /// Runs OCR and number validation over one detection's region.
    fn validate_region(
        &self,
        frame: &RotatedFrame,
        detection: &Detection,
    ) -> MaskResult<Option<SearchHit>> {
        let Some(sub_image) = crop_sub_region(&frame.image, &detection.rect) else {
            tracing::debug!("Degenerate detection box at {}°, skipping", frame.angle_degrees);
            return Ok(None);
        };

        let ocr = self.ocr.read_text(&sub_image)?;
        let Some(number) = self
            .validator
            .validate(&ocr, detection.rect, frame.angle_degrees)
        else {
            return Ok(None);
        };

        Ok(Some(SearchHit {
            number,
            frame: frame.clone(),
            confidence: detection.confidence,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::PixelRect;

    fn hit(angle: u32, confidence: f32) -> SearchHit {
        use crate::core::traits::OcrOutput;

        let number = NumberValidator::new()
            .validate(
                &OcrOutput::text_only("1234 5678 9012"),
                PixelRect::new(0.0, 0.0, 120.0, 20.0),
                angle,
            )
            .unwrap();
        SearchHit {
            number,
            frame: RotatedFrame::rotate(&RgbImage::new(4, 4), angle),
            confidence,
        }
    }

    #[test]
    fn select_best_prefers_highest_confidence() {
        let best = select_best(vec![hit(90, 0.7), hit(180, 0.9), hit(0, 0.8)]).unwrap();
        assert_eq!(best.number.source_angle, 180);
    }

    #[test]
    fn select_best_breaks_ties_toward_upright() {
        // 345° is 15° from upright, closer than 90°.
        let best = select_best(vec![hit(90, 0.8), hit(345, 0.8)]).unwrap();
        assert_eq!(best.number.source_angle, 345);
    }

    #[test]
    fn select_best_breaks_remaining_ties_by_angle_value() {
        // 15° and 345° are both 15° from upright.
        let best = select_best(vec![hit(345, 0.8), hit(15, 0.8)]).unwrap();
        assert_eq!(best.number.source_angle, 15);
    }

    #[test]
    fn select_best_is_order_independent() {
        let a = select_best(vec![hit(90, 0.8), hit(15, 0.8), hit(270, 0.9)]).unwrap();
        let b = select_best(vec![hit(270, 0.9), hit(90, 0.8), hit(15, 0.8)]).unwrap();
        assert_eq!(a.number.source_angle, b.number.source_angle);
        assert_eq!(a.number.source_angle, 270);
    }

    #[test]
    fn select_best_of_empty_is_none() {
        assert!(select_best(Vec::new()).is_none());
    }

    #[test]
    fn comprehensive_sweep_covers_24_angles() {
        let angles: Vec<u32> = (0..360).step_by(ROTATION_STEP_DEGREES as usize).collect();
        assert_eq!(angles.len(), 24);
        assert_eq!(angles[0], 0);
        assert_eq!(angles[23], 345);
    }
}
