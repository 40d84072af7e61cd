//! Safety rules and thresholds for mission checks.

use serde::{Deserialize, Serialize};
use std::env;

/// Default minimum separation, in waypoint coordinate units.
pub const DEFAULT_MIN_SAFE_DISTANCE: f64 = 50.0;

/// Configuration for safety rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyRules {
    /// Minimum separation between any two vehicles
    #[serde(default = "default_min_safe_distance")]
    pub min_safe_distance: f64,
    /// Compare reference missions on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_min_safe_distance() -> f64 {
    DEFAULT_MIN_SAFE_DISTANCE
}

impl Default for SafetyRules {
    fn default() -> Self {
        Self {
            min_safe_distance: DEFAULT_MIN_SAFE_DISTANCE,
            parallel: false,
        }
    }
}

impl SafetyRules {
    pub fn with_min_safe_distance(min_safe_distance: f64) -> Self {
        Self {
            min_safe_distance,
            ..Self::default()
        }
    }

    /// Defaults overlaid with `DECONFLICT_MIN_SAFE_DISTANCE` and `DECONFLICT_PARALLEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            min_safe_distance: lookup("DECONFLICT_MIN_SAFE_DISTANCE")
                .and_then(|s| s.parse().ok())
                .filter(|d: &f64| d.is_finite() && *d >= 0.0)
                .unwrap_or(defaults.min_safe_distance),
            parallel: lookup("DECONFLICT_PARALLEL")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.parallel),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
