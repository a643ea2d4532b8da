//! # idmask
//!
//! A rotation-robust pipeline that locates the printed 12-digit identity
//! number on a card photographed at an arbitrary rotation, masks the
//! leading eight digits while keeping the trailing four visible for
//! verification, and returns the result with per-stage timing. A
//! self-contained time-windowed HMAC token service gates access at the
//! transport boundary.
//!
//! ## Design
//!
//! - The underlying object detector and OCR engine are injected
//!   capabilities ([`core::traits`]), never re-implemented here; tests run
//!   against deterministic fakes with no model weights.
//! - Detector labels are not trusted: a textual validator re-derives
//!   ground truth from OCR content, falling back from the number-field
//!   detection to the whole card region.
//! - Rotation is invertible: mask geometry computed in a rotated
//!   candidate's space is carried back into the original image's
//!   coordinates, and the original buffer is the only one ever masked.
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, capability contracts
//! * [`domain`] - Detections and validated identity numbers
//! * [`processors`] - Geometry, rotation, text normalization, masking
//! * [`pipeline`] - Rotation search orchestration and the controller
//! * [`auth`] - Time-windowed HMAC token service
//! * [`utils`] - Image decode/encode and cropping helpers
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use idmask::prelude::*;
//! use std::sync::Arc;
//!
//! # #[derive(Debug)] struct MyDetector;
//! # impl DetectionCapability for MyDetector {
//! #     fn detect(&self, _: &image::RgbImage) -> MaskResult<Vec<RawDetection>> { Ok(vec![]) }
//! # }
//! # #[derive(Debug)] struct MyOcr;
//! # impl OcrCapability for MyOcr {
//! #     fn read_text(&self, _: &image::RgbImage) -> MaskResult<OcrOutput> { Ok(OcrOutput::default()) }
//! # }
//! # fn main() -> MaskResult<()> {
//! let controller = PipelineController::new(
//!     Arc::new(MyDetector),
//!     Arc::new(MyOcr),
//!     PipelineConfig::default(),
//! )?;
//!
//! let bytes = std::fs::read("card.jpg")?;
//! let result = controller.process(&bytes, false)?;
//! println!("{} in\n{}", result.redacted_number, result.timings);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error handling
    pub use crate::core::errors::{MaskError, MaskResult};

    // Configuration
    pub use crate::core::config::{AuthConfig, PipelineConfig};

    // Capability contracts
    pub use crate::core::traits::{DetectionCapability, OcrCapability, OcrOutput};

    // Domain types
    pub use crate::domain::{Detection, DetectionLabel, RawDetection, ValidatedNumber};

    // Geometry
    pub use crate::processors::{PixelRect, Point};

    // Pipeline
    pub use crate::pipeline::{
        PipelineController, PipelineResult, PipelineStatus, SearchMode, Stage, StageTimings,
    };

    // Auth
    pub use crate::auth::AuthTokenService;
}
