//! Conflict time estimation along timed segments.

use chrono::{DateTime, Duration, Utc};

use crate::geometry::projection_ratio;
use crate::models::Segment;

/// Estimate when a conflict between two segments happens.
///
/// Each closest point is projected back onto its own segment (in the plane),
/// the segment's time span is interpolated by that ratio, and the earlier of
/// the two times wins: the moment the first vehicle reaches the conflict.
///
/// Without a full set of times the earlier known start time is used, with
/// "now" standing in for a missing one.
pub fn conflict_time(
    a: Segment<'_>,
    b: Segment<'_>,
    point_a: &[f64; 2],
    point_b: &[f64; 2],
) -> DateTime<Utc> {
    let (Some((start_a, end_a)), Some((start_b, end_b))) = (a.time_span(), b.time_span()) else {
        tracing::warn!("Segment pair lacks timing; falling back to earliest start time");
        let now = Utc::now();
        return a
            .start
            .time
            .unwrap_or(now)
            .min(b.start.time.unwrap_or(now));
    };

    let (a_start, a_end) = a.planar_endpoints();
    let (b_start, b_end) = b.planar_endpoints();
    let ratio_a = projection_ratio(&a_start, &a_end, point_a);
    let ratio_b = projection_ratio(&b_start, &b_end, point_b);

    interpolate_datetime(start_a, end_a, ratio_a).min(interpolate_datetime(start_b, end_b, ratio_b))
}

/// Linear interpolation between two instants, at microsecond precision.
pub fn interpolate_datetime(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ratio: f64,
) -> DateTime<Utc> {
    let span = end - start;
    let span_us = span
        .num_microseconds()
        .map(|us| us as f64)
        .unwrap_or_else(|| span.num_milliseconds() as f64 * 1_000.0);
    start + Duration::microseconds((span_us * ratio).round() as i64)
}
