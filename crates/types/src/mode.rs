// crates/types/src/mode.rs
//! The organizational function under analysis.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// One of the three org functions the dashboard analyzes.
///
/// Each mode carries its own competency configuration, raw signal mapping,
/// KPI presentation range, and ROI driver block. Adding a fourth mode is a
/// compile-time-checked extension: every dispatch over `Mode` is an
/// exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
pub enum Mode {
    Sales,
    #[serde(rename = "CS")]
    Cs,
    Production,
}

impl Mode {
    /// The `org_unit` literal this mode matches in the HR roster.
    pub fn org_unit_name(&self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Cs => "CS",
            Self::Production => "Production",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.org_unit_name()
    }

    pub const ALL: [Mode; 3] = [Mode::Sales, Mode::Cs, Mode::Production];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown mode string at the API boundary.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mode: {input:?} (expected Sales, CS, or Production)")]
pub struct ParseModeError {
    pub input: String,
}

impl std::str::FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Sales" => Ok(Self::Sales),
            "CS" => Ok(Self::Cs),
            "Production" => Ok(Self::Production),
            other => Err(ParseModeError {
                input: other.to_string(),
            }),
        }
    }
}
