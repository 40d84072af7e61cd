//! Core data models for mission deconfliction.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MissionError;
use crate::geometry;

/// A point along a mission path with optional altitude and time tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Altitude; a waypoint without one is planar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Create a planar, untimed waypoint.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            time: None,
        }
    }

    /// Set the altitude.
    pub fn with_altitude(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Set the time tag.
    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn planar(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Position with altitude, if this waypoint has one.
    pub fn spatial(&self) -> Option<[f64; 3]> {
        self.z.map(|z| [self.x, self.y, z])
    }

    /// Coordinates as a 2-vector, or a 3-vector when altitude is requested and present.
    pub fn coordinates(&self, include_z: bool) -> Coordinates {
        match self.spatial() {
            Some(point) if include_z => Coordinates::Spatial(point),
            _ => Coordinates::Planar(self.planar()),
        }
    }

    /// Euclidean distance to another waypoint.
    ///
    /// Altitude only counts when requested and both waypoints carry it.
    pub fn distance_to(&self, other: &Waypoint, include_z: bool) -> f64 {
        match (self.spatial(), other.spatial()) {
            (Some(a), Some(b)) if include_z => geometry::distance(&a, &b),
            _ => geometry::distance(&self.planar(), &other.planar()),
        }
    }
}

/// Waypoint position in the plane or in space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coordinates {
    Planar([f64; 2]),
    Spatial([f64; 3]),
}

impl Coordinates {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Coordinates::Planar(point) => point.as_slice(),
            Coordinates::Spatial(point) => point.as_slice(),
        }
    }
}

/// Straight leg between two consecutive waypoints of a mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub start: &'a Waypoint,
    pub end: &'a Waypoint,
}

impl<'a> Segment<'a> {
    pub fn new(start: &'a Waypoint, end: &'a Waypoint) -> Self {
        Self { start, end }
    }

    /// Endpoints with altitude, when both carry it.
    pub fn spatial_endpoints(&self) -> Option<([f64; 3], [f64; 3])> {
        Some((self.start.spatial()?, self.end.spatial()?))
    }

    pub fn planar_endpoints(&self) -> ([f64; 2], [f64; 2]) {
        (self.start.planar(), self.end.planar())
    }

    /// Start and end times, when both are known.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start.time?, self.end.time?))
    }
}

/// A single vehicle's planned path plus its flight window.
///
/// Only obtainable through [`Mission::new`] (deserialization routes through it too),
/// so every mission has at least one waypoint, a strictly positive window and
/// a time on every waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionDraft")]
pub struct Mission {
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    drone_id: String,
}

#[derive(Deserialize)]
struct MissionDraft {
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    drone_id: String,
}

impl TryFrom<MissionDraft> for Mission {
    type Error = MissionError;

    fn try_from(draft: MissionDraft) -> Result<Self, Self::Error> {
        Mission::new(
            draft.waypoints,
            draft.start_time,
            draft.end_time,
            draft.drone_id,
        )
    }
}

impl Mission {
    /// Validate and build a mission.
    ///
    /// When any waypoint lacks a time, every waypoint is re-timed by spreading
    /// the window evenly across the waypoint indices.
    pub fn new(
        mut waypoints: Vec<Waypoint>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        drone_id: impl Into<String>,
    ) -> Result<Self, MissionError> {
        if waypoints.is_empty() {
            return Err(MissionError::EmptyPath);
        }
        if start_time >= end_time {
            return Err(MissionError::InvalidTimeWindow {
                start: start_time,
                end: end_time,
            });
        }

        if waypoints.iter().any(|wp| wp.time.is_none()) {
            assign_waypoint_times(&mut waypoints, start_time, end_time);
        }

        Ok(Self {
            waypoints,
            start_time,
            end_time,
            drone_id: drone_id.into(),
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn drone_id(&self) -> &str {
        &self.drone_id
    }

    /// True only when every waypoint carries altitude.
    pub fn is_3d(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.z.is_some())
    }

    /// Consecutive waypoint pairs, in path order.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> + Clone + '_ {
        self.waypoints
            .windows(2)
            .map(|pair| Segment::new(&pair[0], &pair[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Half-open overlap of the two flight windows.
    pub fn overlaps_in_time(&self, other: &Mission) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

fn assign_waypoint_times(waypoints: &mut [Waypoint], start: DateTime<Utc>, end: DateTime<Utc>) {
    let last = waypoints.len().saturating_sub(1);
    let intervals = last.max(1);
    let total = end - start;

    for (index, waypoint) in waypoints.iter_mut().enumerate() {
        let time = if index > 0 && index == last {
            end
        } else {
            start + scale_duration(total, index, intervals)
        };
        waypoint.time = Some(time);
    }
}

/// `total * numerator / denominator` at microsecond precision.
fn scale_duration(total: Duration, numerator: usize, denominator: usize) -> Duration {
    let (units, to_duration): (i64, fn(i64) -> Duration) = match total.num_microseconds() {
        Some(us) => (us, Duration::microseconds),
        None => (total.num_milliseconds(), Duration::milliseconds),
    };
    let scaled = i128::from(units) * numerator as i128 / denominator as i128;
    to_duration(scaled as i64)
}

/// A single separation violation between the candidate and a reference mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Planar position of the closest point on the candidate's segment
    pub location: (f64, f64),
    pub time: DateTime<Utc>,
    pub conflicting_drone_id: String,
    pub actual_distance: f64,
    pub min_safe_distance: f64,
}

/// Outcome of checking one candidate mission.
///
/// Records keep discovery order. The result is clear exactly when it holds no records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictResult {
    conflicts: Vec<ConflictRecord>,
}

impl ConflictResult {
    pub fn from_records(conflicts: Vec<ConflictRecord>) -> Self {
        Self { conflicts }
    }

    /// Append a record, returning the extended result.
    pub fn with_conflict(mut self, record: ConflictRecord) -> Self {
        self.conflicts.push(record);
        self
    }

    pub fn is_clear(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn first(&self) -> Option<&ConflictRecord> {
        self.conflicts.first()
    }

    /// Distinct conflicting drone ids in first-seen order.
    pub fn conflicting_drone_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for record in &self.conflicts {
            if !ids.contains(&record.conflicting_drone_id.as_str()) {
                ids.push(&record.conflicting_drone_id);
            }
        }
        ids
    }
}

impl fmt::Display for ConflictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.first() else {
            return write!(f, "Mission is clear to fly - no conflicts detected.");
        };

        write!(
            f,
            "CONFLICT DETECTED: {} conflict(s) with {} drone(s). First conflict at {} with drone {}.",
            self.len(),
            self.conflicting_drone_ids().len(),
            first.time,
            first.conflicting_drone_id
        )
    }
}
