//! Pipeline controller: decode → rotation search → masking → encode.
//!
//! The controller sequences the pipeline stages, records per-stage timing,
//! and produces the terminal result. Masking is always applied to the
//! ORIGINAL, unrotated buffer, so the returned image matches the input's
//! orientation. An exhausted search is a successful termination
//! (`NoDetection`): the caller receives the original bytes untouched and a
//! "Not detected" marker; only malformed input or total capability failure
//! surfaces as an error.

use crate::core::config::PipelineConfig;
use crate::core::errors::MaskResult;
use crate::core::traits::{DetectionCapability, OcrCapability};
use crate::domain::{DetectorAdapter, NOT_DETECTED};
use crate::pipeline::orchestrator::{RotationOrchestrator, SearchMode};
use crate::pipeline::timing::{Stage, StageTimings};
use crate::processors::mask::{apply_mask, compute_mask_plan};
use crate::utils::{decode_image, encode_png};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Terminal pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    /// A number was found, masked, and the result encoded.
    Completed,
    /// The rotation search was exhausted; the original image is returned
    /// unmodified. Not an error.
    NoDetection,
}

/// The terminal artifact of one pipeline invocation.
///
/// Not retained by the pipeline after return; the surrounding service owns
/// any persistence.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Terminal status.
    pub status: PipelineStatus,
    /// The result pixel buffer (masked on `Completed`, the decoded
    /// original on `NoDetection`).
    pub image: RgbImage,
    /// Encoded result bytes: PNG on `Completed`; on `NoDetection` these
    /// are byte-identical to the request input.
    pub image_bytes: Vec<u8>,
    /// `"XXXX XXXX 1234"` on success, `"Not detected"` otherwise.
    pub redacted_number: String,
    /// Elapsed milliseconds per stage, in execution order.
    pub timings: StageTimings,
}

/// Sequences the pipeline stages over injected capabilities.
///
/// Capability handles are shared, read-only, and safe for concurrent
/// invocations; each `process` call owns all of its intermediate state.
#[derive(Debug, Clone)]
pub struct PipelineController {
    orchestrator: RotationOrchestrator,
    config: PipelineConfig,
}

impl PipelineController {
    /// Creates a controller over the given capabilities.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::ConfigError` if the configuration is invalid.
    pub fn new(
        detector: Arc<dyn DetectionCapability>,
        ocr: Arc<dyn OcrCapability>,
        config: PipelineConfig,
    ) -> MaskResult<Self> {
        config.validate()?;
        let adapter = DetectorAdapter::new(config.confidence_floor);
        Ok(Self {
            orchestrator: RotationOrchestrator::new(detector, ocr, adapter),
            config,
        })
    }

    /// Returns the controller's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline over raw request bytes.
    ///
    /// # Arguments
    ///
    /// * `image_bytes` - The uploaded image bytes.
    /// * `comprehensive` - Selects the comprehensive rotation sweep instead
    ///   of the fast axis-aligned search.
    ///
    /// # Errors
    ///
    /// * `MaskError::ImageDecode` - The bytes are not a valid image.
    /// * `MaskError::Capability` - Every candidate angle failed fatally.
    /// * `MaskError::ImageEncode` - The masked result could not be encoded.
    pub fn process(&self, image_bytes: &[u8], comprehensive: bool) -> MaskResult<PipelineResult> {
        let mut timings = StageTimings::new();

        let started = Instant::now();
        let original = decode_image(image_bytes)?;
        timings.record(Stage::Decode, started.elapsed());

        let mode = if comprehensive {
            SearchMode::Comprehensive
        } else {
            SearchMode::Fast
        };

        let started = Instant::now();
        let hit = self
            .orchestrator
            .search(&original, mode, self.config.parallel_search)?;
        timings.record(Stage::Search, started.elapsed());

        let Some(hit) = hit else {
            tracing::debug!("Rotation search exhausted, returning original image");
            return Ok(self.no_detection(original, image_bytes, timings));
        };

        let started = Instant::now();
        let plan = compute_mask_plan(&hit.number, &hit.frame);
        let mut masked = original;
        apply_mask(&mut masked, &plan);
        timings.record(Stage::Mask, started.elapsed());

        let started = Instant::now();
        let encoded = encode_png(&masked)?;
        timings.record(Stage::Encode, started.elapsed());

        let redacted = hit.number.redacted();
        tracing::debug!(
            "Pipeline completed: {} found at {}° (confidence {:.2})",
            redacted,
            hit.number.source_angle,
            hit.confidence
        );

        Ok(PipelineResult {
            status: PipelineStatus::Completed,
            image: masked,
            image_bytes: encoded,
            redacted_number: redacted,
            timings,
        })
    }

    /// Builds the no-detection terminal result: original bytes untouched.
    fn no_detection(
        &self,
        original: RgbImage,
        input_bytes: &[u8],
        timings: StageTimings,
    ) -> PipelineResult {
        PipelineResult {
            status: PipelineStatus::NoDetection,
            image: original,
            image_bytes: input_bytes.to_vec(),
            redacted_number: NOT_DETECTED.to_string(),
            timings,
        }
    }
}
