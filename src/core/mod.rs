//! Core error handling, configuration, and capability contracts.

pub mod config;
pub mod errors;
pub mod traits;

pub use config::{AuthConfig, PipelineConfig};
pub use errors::{CapabilityKind, MaskError, MaskResult};
pub use traits::{DetectionCapability, OcrCapability, OcrOutput};
