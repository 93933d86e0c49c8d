// crates/types/src/competency.rs
//! Per-mode competency configuration: the skill dimensions each radar shows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Mode;

fn default_target() -> f64 {
    5.0
}

fn default_metric_target() -> f64 {
    5.0
}

fn default_higher_is_better() -> bool {
    true
}

/// One scored skill dimension within a mode's configuration.
///
/// Two calibrations live here. `target` is the score target on the 0–5
/// radar scale (typically 5) that gap analysis compares against.
/// `metric_floor`/`metric_target` calibrate the underlying raw metric: a
/// raw value at the floor maps to score 0, at the metric target to score 5.
/// `higher_is_better = false` inverts the raw scale (e.g., ticket
/// resolution time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competency {
    pub id: String,
    pub label: String,
    #[serde(default = "default_target")]
    pub target: f64,
    #[serde(default, alias = "floor")]
    pub metric_floor: f64,
    #[serde(default = "default_metric_target")]
    pub metric_target: f64,
    #[serde(default = "default_higher_is_better")]
    pub higher_is_better: bool,
}

/// Configuration problems caught at session setup, before any scoring runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("competency list for {mode} is empty")]
    Empty { mode: Mode },

    #[error("competency {id:?} has non-finite calibration (floor {floor}, target {target})")]
    NonFiniteBounds { id: String, floor: f64, target: f64 },

    #[error("competency {id:?} has duplicate id")]
    DuplicateId { id: String },
}

/// Validate an ordered competency list for one mode.
///
/// Scoring itself tolerates degenerate data (zero spans, missing signals);
/// this check only rejects configurations that are unambiguously broken.
pub fn validate_config(mode: Mode, config: &[Competency]) -> Result<(), ConfigError> {
    if config.is_empty() {
        return Err(ConfigError::Empty { mode });
    }
    let mut seen = std::collections::HashSet::new();
    for c in config {
        if !c.metric_floor.is_finite() || !c.metric_target.is_finite() || !c.target.is_finite() {
            return Err(ConfigError::NonFiniteBounds {
                id: c.id.clone(),
                floor: c.metric_floor,
                target: c.metric_target,
            });
        }
        if !seen.insert(c.id.as_str()) {
            return Err(ConfigError::DuplicateId { id: c.id.clone() });
        }
    }
    Ok(())
}
