//! Deconfliction CLI - scenario runner for the mission checker.
//!
//! This crate provides:
//! - scenarios: the reference traffic and candidate missions of the demo airspace
//! - report: text and JSON rendering of check results
//! - deconflict: binary that checks the scenarios and prints the reports

pub mod report;
pub mod scenarios;

pub use report::{render_json, render_text, ScenarioReport};
pub use scenarios::Scenario;
