//! Strategic conflict detection for planned missions.
//!
//! Compares every segment of a candidate mission against every segment of
//! each reference mission sharing its airspace, after cheap mission- and
//! segment-level time filters.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::convert::Infallible;
use tracing::{debug, info, trace};

use crate::error::EngineError;
use crate::geometry::{closest_approach, planar};
use crate::interpolation::conflict_time;
use crate::limits::CheckLimits;
use crate::models::{ConflictRecord, ConflictResult, Mission, Segment};
use crate::rules::SafetyRules;

/// Separation violation between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentConflict {
    /// Planar closest point on the first segment
    pub location: (f64, f64),
    pub time: DateTime<Utc>,
    pub distance: f64,
}

/// Whether two segments can be airborne at the same time.
///
/// Pairs missing any of their four times are assumed to overlap.
pub fn segment_times_overlap(a: Segment<'_>, b: Segment<'_>) -> bool {
    match (a.time_span(), b.time_span()) {
        (Some((start_a, end_a)), Some((start_b, end_b))) => start_a < end_b && start_b < end_a,
        _ => true,
    }
}

/// Check one segment pair against the separation threshold.
///
/// Altitude is compared only when all four endpoints carry it.
pub fn check_segment_pair(
    a: Segment<'_>,
    b: Segment<'_>,
    min_safe_distance: f64,
) -> Option<SegmentConflict> {
    if !segment_times_overlap(a, b) {
        return None;
    }

    let (distance, point_a, point_b) = match (a.spatial_endpoints(), b.spatial_endpoints()) {
        (Some((p1, p2)), Some((p3, p4))) => {
            let approach = closest_approach(&p1, &p2, &p3, &p4);
            (
                approach.distance,
                planar(&approach.point_a),
                planar(&approach.point_b),
            )
        }
        _ => {
            let ((p1, p2), (p3, p4)) = (a.planar_endpoints(), b.planar_endpoints());
            let approach = closest_approach(&p1, &p2, &p3, &p4);
            (approach.distance, approach.point_a, approach.point_b)
        }
    };

    if distance >= min_safe_distance {
        return None;
    }

    Some(SegmentConflict {
        location: (point_a[0], point_a[1]),
        time: conflict_time(a, b, &point_a, &point_b),
        distance,
    })
}

/// Checks candidate missions against a fixed set of reference missions.
#[derive(Debug, Clone)]
pub struct DeconflictionEngine {
    references: Vec<Mission>,
    rules: SafetyRules,
}

impl DeconflictionEngine {
    /// Create an engine with default rules and the given threshold.
    pub fn new(references: Vec<Mission>, min_safe_distance: f64) -> Self {
        Self::with_rules(references, SafetyRules::with_min_safe_distance(min_safe_distance))
    }

    pub fn with_rules(references: Vec<Mission>, rules: SafetyRules) -> Self {
        Self { references, rules }
    }

    pub fn references(&self) -> &[Mission] {
        &self.references
    }

    pub fn rules(&self) -> &SafetyRules {
        &self.rules
    }

    pub fn min_safe_distance(&self) -> f64 {
        self.rules.min_safe_distance
    }

    /// Check a candidate mission against every reference mission.
    ///
    /// Records come back in reference order, then candidate segment, then
    /// reference segment. Missions flown by the candidate's own drone are skipped.
    pub fn check_mission(&self, mission: &Mission) -> ConflictResult {
        let records = self.collect_records(|_, reference| {
            Ok::<_, Infallible>(self.conflicts_against(mission, reference))
        });
        match records {
            Ok(records) => self.finish(mission, records),
            Err(never) => match never {},
        }
    }

    /// Like [`check_mission`](Self::check_mission), stopping early when a
    /// deadline passes or the cancel token fires.
    pub fn check_mission_with(
        &self,
        mission: &Mission,
        limits: &CheckLimits,
    ) -> Result<ConflictResult, EngineError> {
        let records = self.collect_records(|index, reference| {
            limits.check(index)?;
            Ok(self.conflicts_against(mission, reference))
        })?;
        Ok(self.finish(mission, records))
    }

    fn collect_records<E, F>(&self, per_reference: F) -> Result<Vec<ConflictRecord>, E>
    where
        E: Send,
        F: Fn(usize, &Mission) -> Result<Vec<ConflictRecord>, E> + Sync,
    {
        let batches: Vec<Vec<ConflictRecord>> = if self.rules.parallel {
            self.references
                .par_iter()
                .enumerate()
                .map(|(index, reference)| per_reference(index, reference))
                .collect::<Result<_, E>>()?
        } else {
            self.references
                .iter()
                .enumerate()
                .map(|(index, reference)| per_reference(index, reference))
                .collect::<Result<_, E>>()?
        };
        Ok(batches.into_iter().flatten().collect())
    }

    fn conflicts_against(&self, mission: &Mission, reference: &Mission) -> Vec<ConflictRecord> {
        if reference.drone_id() == mission.drone_id() {
            debug!(drone_id = %reference.drone_id(), "Skipping mission flown by the same drone");
            return Vec::new();
        }
        if !mission.overlaps_in_time(reference) {
            debug!(
                drone_id = %reference.drone_id(),
                "Skipping mission with disjoint time window"
            );
            return Vec::new();
        }

        let min_safe_distance = self.rules.min_safe_distance;
        let reference_segments: Vec<Segment<'_>> = reference.segments().collect();
        let mut records = Vec::new();

        for (i, own) in mission.segments().enumerate() {
            for (j, other) in reference_segments.iter().enumerate() {
                let Some(hit) = check_segment_pair(own, *other, min_safe_distance) else {
                    continue;
                };
                trace!(
                    drone_id = %reference.drone_id(),
                    candidate_segment = i,
                    reference_segment = j,
                    distance = hit.distance,
                    "Separation violation"
                );
                records.push(ConflictRecord {
                    location: hit.location,
                    time: hit.time,
                    conflicting_drone_id: reference.drone_id().to_string(),
                    actual_distance: hit.distance,
                    min_safe_distance,
                });
            }
        }

        records
    }

    fn finish(&self, mission: &Mission, records: Vec<ConflictRecord>) -> ConflictResult {
        let result = ConflictResult::from_records(records);
        info!(
            drone_id = %mission.drone_id(),
            references = self.references.len(),
            conflicts = result.len(),
            clear = result.is_clear(),
            "Mission check complete"
        );
        result
    }
}
