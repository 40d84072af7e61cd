pub mod conflict;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod limits;
pub mod models;
pub mod rules;

pub use conflict::{check_segment_pair, segment_times_overlap, DeconflictionEngine, SegmentConflict};
pub use error::{EngineError, MissionError};
pub use geometry::{closest_approach, SegmentApproach, EPSILON};
pub use interpolation::{conflict_time, interpolate_datetime};
pub use limits::{CancelToken, CheckLimits};
pub use models::{ConflictRecord, ConflictResult, Coordinates, Mission, Segment, Waypoint};
pub use rules::{SafetyRules, DEFAULT_MIN_SAFE_DISTANCE};
