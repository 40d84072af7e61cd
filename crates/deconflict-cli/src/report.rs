//! Text and JSON rendering of scenario results.

use deconflict_core::{ConflictResult, Mission};
use serde::Serialize;
use std::fmt;

use crate::scenarios::Scenario;

/// Everything a downstream renderer needs to draw one checked scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport<'a> {
    pub scenario: u8,
    pub name: &'a str,
    pub min_safe_distance: f64,
    pub candidate: &'a Mission,
    pub references: &'a [Mission],
    pub result: &'a ConflictResult,
}

impl<'a> ScenarioReport<'a> {
    pub fn new(scenario: &'a Scenario, min_safe_distance: f64, result: &'a ConflictResult) -> Self {
        Self {
            scenario: scenario.number,
            name: &scenario.name,
            min_safe_distance,
            candidate: &scenario.candidate,
            references: &scenario.references,
            result,
        }
    }
}

/// Human-readable summary followed by one block per conflict.
pub fn render_text(scenario: &Scenario, result: &ConflictResult) -> String {
    TextReport { scenario, result }.to_string()
}

struct TextReport<'a> {
    scenario: &'a Scenario,
    result: &'a ConflictResult,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { scenario, result } = self;
        writeln!(
            f,
            "=== Scenario {}: {} ===",
            scenario.number, scenario.description
        )?;
        writeln!(f, "{result}")?;

        if !result.is_clear() {
            writeln!(f, "Found {} conflicts:", result.len())?;
            for (i, conflict) in result.conflicts().iter().enumerate() {
                writeln!(f, "  Conflict {}:", i + 1)?;
                writeln!(
                    f,
                    "    Location: ({:.1}, {:.1})",
                    conflict.location.0, conflict.location.1
                )?;
                writeln!(f, "    Time: {}", conflict.time)?;
                writeln!(f, "    With drone: {}", conflict.conflicting_drone_id)?;
                writeln!(
                    f,
                    "    Distance: {:.1}m (minimum safe: {}m)",
                    conflict.actual_distance, conflict.min_safe_distance
                )?;
            }
        }

        if scenario.candidate.is_3d() {
            writeln!(
                f,
                "Note: candidate flies with altitude; separation is checked in 3D where references carry altitude"
            )?;
        }

        Ok(())
    }
}

pub fn render_json(reports: &[ScenarioReport<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
