//! End-to-end mission checks through the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deconflict_core::{
    CancelToken, CheckLimits, DeconflictionEngine, EngineError, Mission, MissionError,
    SafetyRules, Waypoint,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn minutes(m: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(m)
}

fn mission(drone_id: &str, waypoints: Vec<Waypoint>, start_min: i64, end_min: i64) -> Mission {
    Mission::new(waypoints, minutes(start_min), minutes(end_min), drone_id).unwrap()
}

fn low_track() -> Mission {
    mission(
        "low",
        vec![
            Waypoint::new(0.0, 0.0).with_altitude(0.0).at(minutes(0)),
            Waypoint::new(100.0, 0.0).with_altitude(0.0).at(minutes(5)),
        ],
        0,
        5,
    )
}

fn crossing_at(altitude: f64, drone_id: &str) -> Mission {
    mission(
        drone_id,
        vec![
            Waypoint::new(50.0, 0.0).with_altitude(altitude).at(minutes(2)),
            Waypoint::new(50.0, 100.0).with_altitude(altitude).at(minutes(3)),
        ],
        2,
        3,
    )
}

#[test]
fn altitude_gap_above_threshold_is_clear() {
    let engine = DeconflictionEngine::new(vec![low_track()], 20.0);
    let result = engine.check_mission(&crossing_at(100.0, "high"));
    assert!(result.is_clear());
}

#[test]
fn altitude_gap_below_threshold_conflicts() {
    let engine = DeconflictionEngine::new(vec![low_track()], 20.0);
    let result = engine.check_mission(&crossing_at(15.0, "conflict"));
    assert!(!result.is_clear());

    let conflict = result.first().unwrap();
    assert_eq!(conflict.conflicting_drone_id, "low");
    assert!((conflict.actual_distance - 15.0).abs() < 1e-9);
    assert_eq!(conflict.location, (50.0, 0.0));
}

#[test]
fn planar_reference_ignores_candidate_altitude() {
    let flat = mission(
        "flat",
        vec![Waypoint::new(0.0, 0.0), Waypoint::new(100.0, 0.0)],
        0,
        5,
    );
    let engine = DeconflictionEngine::new(vec![flat], 20.0);
    assert!(!engine.check_mission(&crossing_at(100.0, "high")).is_clear());
}

#[test]
fn self_exclusion_holds_for_any_geometry() {
    let references = vec![low_track(), crossing_at(0.0, "other")];
    let engine = DeconflictionEngine::new(references, 1_000.0);

    let same_drone = mission(
        "low",
        vec![
            Waypoint::new(0.0, 0.0).with_altitude(0.0),
            Waypoint::new(100.0, 0.0).with_altitude(0.0),
        ],
        0,
        5,
    );
    let result = engine.check_mission(&same_drone);
    assert_eq!(result.conflicting_drone_ids(), vec!["other"]);
}

#[test]
fn disjoint_windows_never_conflict() {
    let engine = DeconflictionEngine::new(
        vec![mission(
            "drone1",
            vec![Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 100.0)],
            0,
            5,
        )],
        50.0,
    );
    let later = mission(
        "drone2",
        vec![Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 100.0)],
        20,
        25,
    );
    assert!(engine.check_mission(&later).is_clear());
}

#[test]
fn default_threshold_is_fifty() {
    let engine = DeconflictionEngine::with_rules(vec![low_track()], SafetyRules::default());
    assert_eq!(engine.min_safe_distance(), 50.0);

    // 40 above the low track: inside 50
    let result = engine.check_mission(&crossing_at(40.0, "near"));
    assert!(!result.is_clear());
    assert_eq!(result.first().unwrap().min_safe_distance, 50.0);
}

#[test]
fn mission_json_is_validated_on_load() {
    let json = r#"{
        "waypoints": [{"x": 0.0, "y": 0.0}, {"x": 10.0, "y": 0.0}, {"x": 20.0, "y": 0.0}],
        "start_time": "2025-06-01T09:00:00Z",
        "end_time": "2025-06-01T09:10:00Z",
        "drone_id": "json"
    }"#;
    let loaded: Mission = serde_json::from_str(json).unwrap();
    assert_eq!(loaded.drone_id(), "json");
    assert_eq!(loaded.waypoints()[1].time, Some(minutes(5)));

    let inverted = r#"{
        "waypoints": [{"x": 0.0, "y": 0.0}],
        "start_time": "2025-06-01T09:10:00Z",
        "end_time": "2025-06-01T09:00:00Z",
        "drone_id": "json"
    }"#;
    let err = serde_json::from_str::<Mission>(inverted).unwrap_err();
    assert!(err.to_string().contains("must be after start time"));

    let empty = r#"{
        "waypoints": [],
        "start_time": "2025-06-01T09:00:00Z",
        "end_time": "2025-06-01T09:10:00Z",
        "drone_id": "json"
    }"#;
    assert!(serde_json::from_str::<Mission>(empty).is_err());
}

#[test]
fn construction_errors_are_typed() {
    assert_eq!(
        Mission::new(Vec::new(), minutes(0), minutes(1), "x").unwrap_err(),
        MissionError::EmptyPath
    );
    assert_eq!(
        Mission::new(vec![Waypoint::new(0.0, 0.0)], minutes(1), minutes(1), "x").unwrap_err(),
        MissionError::InvalidTimeWindow {
            start: minutes(1),
            end: minutes(1),
        }
    );
}

#[test]
fn expired_deadline_stops_before_first_reference() {
    let engine = DeconflictionEngine::new(vec![low_track()], 20.0);
    let limits = CheckLimits::none().with_deadline(std::time::Instant::now());
    let err = engine
        .check_mission_with(&crossing_at(15.0, "conflict"), &limits)
        .unwrap_err();
    assert_eq!(err, EngineError::DeadlineExceeded { reference_index: 0 });
}

#[test]
fn cancellation_is_reported_from_parallel_checks() {
    let rules = SafetyRules {
        min_safe_distance: 20.0,
        parallel: true,
    };
    let engine = DeconflictionEngine::with_rules(vec![low_track(), low_track()], rules);
    let token = CancelToken::new();
    token.cancel();

    let result = engine.check_mission_with(
        &crossing_at(15.0, "conflict"),
        &CheckLimits::none().with_cancel_token(token),
    );
    assert!(matches!(result, Err(EngineError::Cancelled { .. })));
}

#[test]
fn result_serializes_records_in_order() {
    let engine = DeconflictionEngine::new(vec![low_track()], 20.0);
    let result = engine.check_mission(&crossing_at(15.0, "conflict"));

    let value = serde_json::to_value(&result).unwrap();
    let conflicts = value["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["conflicting_drone_id"], "low");
    assert_eq!(conflicts[0]["min_safe_distance"], 20.0);
}
