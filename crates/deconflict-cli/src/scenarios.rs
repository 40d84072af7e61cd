//! Pre-defined airspace scenarios for demonstrating mission checks.

use chrono::{DateTime, Duration, Utc};
use deconflict_core::{Mission, MissionError, Waypoint};

/// A candidate mission and the reference traffic it is checked against.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub number: u8,
    pub name: String,
    pub description: String,
    pub candidate: Mission,
    pub references: Vec<Mission>,
}

fn timed(x: f64, y: f64, start: DateTime<Utc>, minutes: i64) -> Waypoint {
    Waypoint::new(x, y).at(start + Duration::minutes(minutes))
}

fn window(start: DateTime<Utc>, from_min: i64, to_min: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        start + Duration::minutes(from_min),
        start + Duration::minutes(to_min),
    )
}

/// Build the four reference flights sharing the airspace.
///
/// - drone1: horizontal pass along y=100
/// - drone2: diagonal climb from the origin
/// - drone3: vertical pass along x=300
/// - drone4: zig-zag between y=250 and y=300
pub fn simulated_flights(start: DateTime<Utc>) -> Result<Vec<Mission>, MissionError> {
    let (s1, e1) = window(start, 0, 4);
    let flight1 = Mission::new(
        vec![
            timed(0.0, 100.0, start, 0),
            timed(200.0, 100.0, start, 2),
            timed(400.0, 100.0, start, 4),
        ],
        s1,
        e1,
        "drone1",
    )?;

    let (s2, e2) = window(start, 1, 5);
    let flight2 = Mission::new(
        vec![
            timed(0.0, 0.0, start, 1),
            timed(200.0, 200.0, start, 3),
            timed(400.0, 400.0, start, 5),
        ],
        s2,
        e2,
        "drone2",
    )?;

    let (s3, e3) = window(start, 2, 6);
    let flight3 = Mission::new(
        vec![
            timed(300.0, 0.0, start, 2),
            timed(300.0, 200.0, start, 4),
            timed(300.0, 400.0, start, 6),
        ],
        s3,
        e3,
        "drone3",
    )?;

    let (s4, e4) = window(start, 3, 7);
    let flight4 = Mission::new(
        vec![
            timed(100.0, 300.0, start, 3),
            timed(150.0, 250.0, start, 4),
            timed(200.0, 300.0, start, 5),
            timed(250.0, 250.0, start, 6),
            timed(300.0, 300.0, start, 7),
        ],
        s4,
        e4,
        "drone4",
    )?;

    Ok(vec![flight1, flight2, flight3, flight4])
}

/// Scenario 1: a northern arc away from most traffic.
///
/// The arc ends at (400, 400) one minute after drone2 finishes its climb
/// there, so the only conflict is that shared final waypoint.
pub fn northern_arc(start: DateTime<Utc>) -> Result<Scenario, MissionError> {
    let (s, e) = window(start, 0, 6);
    let candidate = Mission::new(
        vec![
            timed(100.0, 400.0, start, 0),
            timed(200.0, 500.0, start, 2),
            timed(300.0, 500.0, start, 4),
            timed(400.0, 400.0, start, 6),
        ],
        s,
        e,
        "primary",
    )?;

    Ok(Scenario {
        number: 1,
        name: "northern-arc".to_string(),
        description: "Northern arc ending on drone2's final waypoint".to_string(),
        candidate,
        references: simulated_flights(start)?,
    })
}

/// Scenario 2: a dog-leg through the middle of the airspace.
pub fn with_conflict(start: DateTime<Utc>) -> Result<Scenario, MissionError> {
    let (s, e) = window(start, 1, 5);
    let candidate = Mission::new(
        vec![
            timed(0.0, 250.0, start, 1),
            timed(150.0, 150.0, start, 3),
            timed(350.0, 250.0, start, 5),
        ],
        s,
        e,
        "primary",
    )?;

    Ok(Scenario {
        number: 2,
        name: "with-conflict".to_string(),
        description: "Mission with conflicts".to_string(),
        candidate,
        references: simulated_flights(start)?,
    })
}

/// Scenario 3: the dog-leg of scenario 2 flown at 150 over ground-level traffic.
pub fn altitude_separation(start: DateTime<Utc>) -> Result<Scenario, MissionError> {
    let (s, e) = window(start, 1, 5);
    let candidate = Mission::new(
        vec![
            timed(0.0, 250.0, start, 1).with_altitude(150.0),
            timed(150.0, 150.0, start, 3).with_altitude(150.0),
            timed(350.0, 250.0, start, 5).with_altitude(150.0),
        ],
        s,
        e,
        "primary",
    )?;

    let references = simulated_flights(start)?
        .into_iter()
        .map(|flight| lift_to(&flight, 0.0))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario {
        number: 3,
        name: "altitude-separation".to_string(),
        description: "Altitude-based separation".to_string(),
        candidate,
        references,
    })
}

/// Copy a mission with every waypoint placed at `altitude`.
fn lift_to(mission: &Mission, altitude: f64) -> Result<Mission, MissionError> {
    let waypoints = mission
        .waypoints()
        .iter()
        .map(|wp| wp.with_altitude(altitude))
        .collect();
    Mission::new(
        waypoints,
        mission.start_time(),
        mission.end_time(),
        mission.drone_id(),
    )
}

/// Look up a scenario by number.
pub fn by_number(number: u8, start: DateTime<Utc>) -> Option<Result<Scenario, MissionError>> {
    match number {
        1 => Some(northern_arc(start)),
        2 => Some(with_conflict(start)),
        3 => Some(altitude_separation(start)),
        _ => None,
    }
}

/// All scenarios in order.
pub fn all(start: DateTime<Utc>) -> Result<Vec<Scenario>, MissionError> {
    Ok(vec![
        northern_arc(start)?,
        with_conflict(start)?,
        altitude_separation(start)?,
    ])
}
