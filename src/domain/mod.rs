//! Domain types for detections and validated identity numbers.

pub mod detection;
pub mod number;

pub use detection::{Detection, DetectionLabel, DetectorAdapter, RawDetection};
pub use number::{NumberValidator, ValidatedNumber, NOT_DETECTED};
