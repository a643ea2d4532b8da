//! Per-stage timing records for pipeline runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Named pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Decoding the request bytes into a pixel buffer.
    Decode,
    /// Rotation search including detection and validation.
    Search,
    /// Mask geometry computation and fill application.
    Mask,
    /// Encoding the result image.
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decode => write!(f, "decode"),
            Stage::Search => write!(f, "search"),
            Stage::Mask => write!(f, "mask"),
            Stage::Encode => write!(f, "encode"),
        }
    }
}

/// An ordered record of elapsed milliseconds per pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    records: Vec<(Stage, f64)>,
}

impl StageTimings {
    /// Creates an empty timing record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the elapsed time for a stage.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.records.push((stage, elapsed.as_secs_f64() * 1000.0));
    }

    /// Returns the elapsed milliseconds for a stage, if recorded.
    pub fn get(&self, stage: Stage) -> Option<f64> {
        self.records
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, ms)| *ms)
    }

    /// Returns the recorded stages in execution order.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        self.records.iter().copied()
    }

    /// Returns the total elapsed milliseconds across all stages.
    pub fn total_ms(&self) -> f64 {
        self.records.iter().map(|(_, ms)| ms).sum()
    }
}

impl fmt::Display for StageTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, ms) in &self.records {
            writeln!(f, "  {}: {:.2} ms", stage, ms)?;
        }
        write!(f, "  total: {:.2} ms", self.total_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_preserve_order() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Decode, Duration::from_millis(5));
        timings.record(Stage::Search, Duration::from_millis(120));
        timings.record(Stage::Mask, Duration::from_millis(3));

        let stages: Vec<Stage> = timings.stages().map(|(s, _)| s).collect();
        assert_eq!(stages, vec![Stage::Decode, Stage::Search, Stage::Mask]);
        assert!(timings.get(Stage::Search).unwrap() >= 120.0);
        assert!(timings.get(Stage::Encode).is_none());
    }

    #[test]
    fn total_sums_all_stages() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Decode, Duration::from_millis(10));
        timings.record(Stage::Encode, Duration::from_millis(20));
        assert!((timings.total_ms() - 30.0).abs() < 1.0);
    }

    #[test]
    fn serializes_to_json_and_back() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Decode, Duration::from_millis(4));
        timings.record(Stage::Search, Duration::from_millis(250));

        let json = serde_json::to_string(&timings).unwrap();
        let back: StageTimings = serde_json::from_str(&json).unwrap();
        let stages: Vec<Stage> = back.stages().map(|(s, _)| s).collect();
        assert_eq!(stages, vec![Stage::Decode, Stage::Search]);
        assert!((back.total_ms() - timings.total_ms()).abs() < 1e-9);
    }

    #[test]
    fn display_lists_stages_and_total() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Decode, Duration::from_millis(1));
        let text = timings.to_string();
        assert!(text.contains("decode"));
        assert!(text.contains("total"));
    }
}
