//! Error types for mission validation and bounded conflict checks.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Mission construction failures. A `Mission` cannot exist in either state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionError {
    #[error("mission must have at least one waypoint")]
    EmptyPath,
    #[error("mission end time {end} must be after start time {start}")]
    InvalidTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Reasons a bounded check stopped before visiting every reference mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("conflict check cancelled before reference mission {reference_index}")]
    Cancelled { reference_index: usize },
    #[error("conflict check deadline exceeded before reference mission {reference_index}")]
    DeadlineExceeded { reference_index: usize },
}
