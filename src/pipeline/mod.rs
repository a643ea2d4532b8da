//! Pipeline controller, rotation search orchestration, and stage timing.

pub mod controller;
pub mod orchestrator;
pub mod timing;

pub use controller::{PipelineController, PipelineResult, PipelineStatus};
pub use orchestrator::{RotationOrchestrator, SearchHit, SearchMode, FAST_ANGLES};
pub use timing::{Stage, StageTimings};
