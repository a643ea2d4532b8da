//! Error types for the masking pipeline.
//!
//! This module defines the error taxonomy for the pipeline: image decode
//! failures, external capability (detector / OCR) failures, invalid input,
//! and configuration problems. It also provides utility constructors for
//! creating these errors with appropriate context.
//!
//! Note that an exhausted rotation search is *not* an error: "no detection"
//! is a normal terminal outcome and is expressed through
//! [`PipelineStatus::NoDetection`](crate::pipeline::PipelineStatus), never
//! through `MaskError`.

use thiserror::Error;

/// The external capability that failed.
///
/// Used to identify which injected capability an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// The object-detection capability.
    Detection,
    /// The OCR capability.
    Ocr,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Detection => write!(f, "detection"),
            CapabilityKind::Ocr => write!(f, "ocr"),
        }
    }
}

/// Enum representing the errors that can occur in the masking pipeline.
#[derive(Error, Debug)]
pub enum MaskError {
    /// The request bytes are not a decodable image. Fatal for the request;
    /// no rotation search is attempted.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// An injected capability (detector or OCR engine) itself failed.
    #[error("{kind} capability failed: {context}")]
    Capability {
        /// Which capability failed.
        kind: CapabilityKind,
        /// Additional context about the failure.
        context: String,
        /// The underlying error reported by the capability.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error occurred while encoding the output image.
    #[error("image encode")]
    ImageEncode(#[source] image::ImageError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for pipeline operations.
pub type MaskResult<T> = Result<T, MaskError>;

impl MaskError {
    /// Creates a `MaskError` for a failed external capability.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which capability failed.
    /// * `context` - Additional context about the failure.
    /// * `error` - The underlying error reported by the capability.
    pub fn capability(
        kind: CapabilityKind,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Capability {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a `MaskError` for a failed detection capability call.
    pub fn detection(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::capability(CapabilityKind::Detection, context, error)
    }

    /// Creates a `MaskError` for a failed OCR capability call.
    pub fn ocr(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::capability(CapabilityKind::Ocr, context, error)
    }

    /// Creates a `MaskError` for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `MaskError` for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a `MaskError` for configuration errors with field context.
    ///
    /// # Arguments
    ///
    /// * `field` - The field where the error occurred.
    /// * `value` - The value of the field.
    /// * `reason` - The reason for the error.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Returns true if this error came from an external capability.
    pub fn is_capability(&self) -> bool {
        matches!(self, Self::Capability { .. })
    }
}

/// Implementation of From<image::ImageError> for MaskError.
///
/// Decode is by far the most common image-crate failure path in this
/// pipeline, so the blanket conversion maps to `ImageDecode`.
impl From<image::ImageError> for MaskError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}
