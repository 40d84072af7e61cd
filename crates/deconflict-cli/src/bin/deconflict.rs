//! Mission deconfliction scenarios.
//!
//! Checks the built-in candidate missions against the shared reference
//! traffic and prints a report per scenario. Logs go to stderr.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin deconflict -- --scenario 2 --format json

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use deconflict_cli::{render_json, render_text, scenarios, Scenario, ScenarioReport};
use deconflict_core::{CheckLimits, ConflictResult, DeconflictionEngine, SafetyRules};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Strategic deconfliction for drone missions")]
struct Args {
    /// Scenario to run (1, 2 or 3); all scenarios when omitted
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    scenario: Option<u8>,

    /// Minimum safe distance (overrides DECONFLICT_MIN_SAFE_DISTANCE)
    #[arg(long)]
    min_safe_distance: Option<f64>,

    /// Compare reference missions in parallel
    #[arg(long)]
    parallel: bool,

    /// Abort a check that runs longer than this
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deconflict_cli=info,deconflict_core=info")),
        )
        .init();

    let args = Args::parse();

    let mut rules = SafetyRules::from_env();
    if let Some(distance) = args.min_safe_distance {
        if !distance.is_finite() || distance < 0.0 {
            bail!("--min-safe-distance must be a non-negative number, got {distance}");
        }
        rules.min_safe_distance = distance;
    }
    rules.parallel |= args.parallel;

    let start = Utc::now();
    let selected: Vec<Scenario> = match args.scenario {
        Some(number) => match scenarios::by_number(number, start) {
            Some(scenario) => vec![scenario?],
            None => bail!("unknown scenario {number}"),
        },
        None => scenarios::all(start)?,
    };

    tracing::info!(
        scenarios = selected.len(),
        min_safe_distance = rules.min_safe_distance,
        parallel = rules.parallel,
        "Running deconfliction scenarios"
    );

    let mut results: Vec<ConflictResult> = Vec::with_capacity(selected.len());
    for scenario in &selected {
        let engine = DeconflictionEngine::with_rules(scenario.references.clone(), rules.clone());
        let limits = match args.timeout_ms {
            Some(ms) => CheckLimits::none().with_timeout(Duration::from_millis(ms)),
            None => CheckLimits::none(),
        };
        let result = engine.check_mission_with(&scenario.candidate, &limits)?;
        results.push(result);
    }

    match args.format {
        OutputFormat::Text => {
            for (scenario, result) in selected.iter().zip(&results) {
                println!("{}", render_text(scenario, result));
            }
        }
        OutputFormat::Json => {
            let reports: Vec<ScenarioReport<'_>> = selected
                .iter()
                .zip(&results)
                .map(|(scenario, result)| {
                    ScenarioReport::new(scenario, rules.min_safe_distance, result)
                })
                .collect();
            println!("{}", render_json(&reports)?);
        }
    }

    Ok(())
}
