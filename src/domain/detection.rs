//! Detection normalization.
//!
//! The external detector's output format and label vocabulary are not
//! trusted: labels are frequently wrong on field-level classes, and the
//! taxonomy can change between model versions. `DetectorAdapter` is the
//! isolation boundary that converts raw detector output into the stable
//! internal shape; validation and masking never see the raw vocabulary.

use crate::processors::PixelRect;
use serde::{Deserialize, Serialize};

/// A detection as emitted by the external detector, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    /// Axis-aligned bounding box in pixel coordinates.
    pub rect: PixelRect,
    /// The detector's own label string.
    pub label: String,
    /// Confidence score in [0, 1].
    pub confidence: f32,
}

/// Internal three-way label taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionLabel {
    /// The whole identity card.
    Card,
    /// The printed number field on the card.
    NumberField,
    /// Anything else; ignored downstream.
    Other,
}

/// A normalized detection, scoped to one rotation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Axis-aligned bounding box in pixel coordinates.
    pub rect: PixelRect,
    /// Normalized label.
    pub label: DetectionLabel,
    /// Confidence score in [0, 1].
    pub confidence: f32,
}

/// Maps an external label string onto the internal taxonomy.
///
/// The mapping is deliberately permissive (case-insensitive substring
/// checks) because detector vocabularies vary across model versions.
/// Unknown labels map to [`DetectionLabel::Other`].
fn map_label(label: &str) -> DetectionLabel {
    let normalized = label.trim().to_lowercase();
    if normalized.contains("number")
        || normalized.contains("aadhaar_no")
        || normalized.contains("aadhar_no")
        || normalized.contains("id_no")
    {
        DetectionLabel::NumberField
    } else if normalized.contains("card") || normalized.contains("document") {
        DetectionLabel::Card
    } else {
        tracing::debug!("Unknown detector label '{}', mapping to Other", label);
        DetectionLabel::Other
    }
}

/// Normalizes raw detector output into the internal shape.
///
/// Filters detections below the confidence floor, maps labels, and orders
/// the result by descending confidence.
#[derive(Debug, Clone)]
pub struct DetectorAdapter {
    /// Detections with confidence below this floor are discarded.
    confidence_floor: f32,
}

impl DetectorAdapter {
    /// Creates an adapter with the given confidence floor.
    pub fn new(confidence_floor: f32) -> Self {
        Self { confidence_floor }
    }

    /// Returns the configured confidence floor.
    pub fn confidence_floor(&self) -> f32 {
        self.confidence_floor
    }

    /// Normalizes a batch of raw detections.
    pub fn normalize(&self, raw: Vec<RawDetection>) -> Vec<Detection> {
        let mut detections: Vec<Detection> = raw
            .into_iter()
            .filter(|d| d.confidence >= self.confidence_floor)
            .map(|d| Detection {
                rect: d.rect,
                label: map_label(&d.label),
                confidence: d.confidence.clamp(0.0, 1.0),
            })
            .collect();

        detections.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        detections
    }
}
