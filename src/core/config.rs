//! Configuration types for the pipeline and the token service.
//!
//! Configuration is passed as explicit objects injected at construction,
//! not read from ambient global state, so both the pipeline controller and
//! the token service stay independently testable.

use crate::core::errors::{MaskError, MaskResult};
use serde::{Deserialize, Serialize};

/// The default confidence floor below which detections are discarded.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.6;

/// Angle step for the comprehensive rotation sweep, in degrees.
pub const ROTATION_STEP_DEGREES: u32 = 15;

/// The number of trailing digits left visible after masking.
pub const REVEAL_SUFFIX_LEN: usize = 4;

/// The number of digits in a valid identity number.
pub const ID_NUMBER_LEN: usize = 12;

/// Default token validity window, in seconds (5 minutes).
pub const DEFAULT_TOKEN_VALIDITY_SECS: u64 = 300;

/// Configuration for the masking pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Detections with confidence below this floor are discarded.
    pub confidence_floor: f32,
    /// Whether comprehensive-mode candidates are evaluated in parallel.
    /// Selection is deterministic either way.
    pub parallel_search: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            parallel_search: true,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If all fields are within their valid ranges.
    /// * `Err(MaskError::ConfigError)` - Describing the offending field.
    pub fn validate(&self) -> MaskResult<()> {
        if !self.confidence_floor.is_finite() {
            return Err(MaskError::config_error_with_context(
                "confidence_floor",
                &self.confidence_floor.to_string(),
                "must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(MaskError::config_error_with_context(
                "confidence_floor",
                &self.confidence_floor.to_string(),
                "must be in range [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Configuration for the auth token service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used for HMAC signing. Never logged.
    pub secret: String,
    /// Token validity window in seconds.
    pub validity_secs: u64,
}

impl AuthConfig {
    /// Creates a config with the default validity window.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            validity_secs: DEFAULT_TOKEN_VALIDITY_SECS,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> MaskResult<()> {
        if self.secret.is_empty() {
            return Err(MaskError::config_error("auth secret must not be empty"));
        }
        if self.validity_secs == 0 {
            return Err(MaskError::config_error_with_context(
                "validity_secs",
                "0",
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn confidence_floor_out_of_range_is_rejected() {
        let config = PipelineConfig {
            confidence_floor: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            confidence_floor: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        let config = AuthConfig {
            secret: String::new(),
            validity_secs: 300,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_validity_is_rejected() {
        let config = AuthConfig {
            secret: "s".to_string(),
            validity_secs: 0,
        };
        assert!(config.validate().is_err());
    }
}
