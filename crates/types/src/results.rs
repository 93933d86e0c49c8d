// crates/types/src/results.rs
//! Derived outputs the dashboard renders. Recomputed on every query,
//! never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Mode;

/// One row of the gap table: how far a competency sits below its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct GapEntry {
    pub id: String,
    pub label: String,
    pub actual: f64,
    pub target: f64,
    /// `target - actual`, rounded to two decimals. Negative means over-target.
    pub gap: f64,
}

/// Estimated statistical influence of one competency on the mode's KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct InfluenceScore {
    pub index: usize,
    pub label: String,
    /// Pearson coefficient in [-1, 1] against the synthetic KPI series.
    pub raw_corr: f64,
    /// `|raw_corr|` clamped to [0, 1], scaled to 0–5, one decimal.
    #[serde(rename = "score0to5")]
    pub score_0_to_5: f64,
}

/// A catalog item ranked by how much cohort usage it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ContentDriver {
    pub content_id: String,
    pub skill_id: String,
    pub expected_skill_lift: f64,
    pub used: u32,
    /// `used × expected_skill_lift`, rounded to two decimals.
    pub driver: f64,
}

/// A catalog item proposed against a specific gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ContentSuggestion {
    pub content_id: String,
    pub skill_id: String,
    pub tag: Option<String>,
    pub expected_skill_lift: f64,
    /// How many cohort consumption events already hit this item.
    pub used: u32,
    /// `max(0, gap) × (1 − min(1, used/5)) × (0.5 + lift)` — saturated
    /// content ranks itself out.
    pub priority: f64,
}

/// Content picks for one surfaced gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct GapContentPicks {
    pub skill: String,
    pub gap: f64,
    pub items: Vec<ContentSuggestion>,
}

/// One ranked remediation recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub label: String,
    pub gap: f64,
    pub influence: f64,
    /// `influence × max(0, gap)` — ranking key.
    pub priority: f64,
    pub title: String,
    pub expected_skill_lift: f64,
    pub est_cost: f64,
    /// `round₂(expected_skill_lift × influence / 5)`.
    pub expected_kpi_lift: f64,
    /// Matched catalog assets, when the caller supplied catalog + LRS data.
    #[serde(default)]
    pub assets: Vec<ContentSuggestion>,
}

/// Annualized financial projection for the selected cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct RoiResult {
    pub total_kpi_lift: f64,
    #[ts(type = "number")]
    pub upside_annual: i64,
    #[ts(type = "number")]
    pub coi_annual: i64,
    #[ts(type = "number")]
    pub net_annual: i64,
    #[ts(type = "number")]
    pub program_cost: i64,
    /// Clamped to [0.5, 36], one decimal.
    pub payback_months: f64,
    #[ts(type = "number")]
    pub roi_percent: i64,
}

/// Everything one dashboard query needs, assembled by `build_report`.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub mode: Mode,
    pub cohort_ids: Vec<String>,
    pub competency_ids: Vec<String>,
    pub labels: Vec<String>,
    pub targets: Vec<f64>,
    /// Cohort-mean competency scores, aligned with `competency_ids`.
    pub actual: Vec<f64>,
    pub gaps: Vec<GapEntry>,
    pub influence: Vec<InfluenceScore>,
    /// skill id → 0–5 training-leverage score.
    #[ts(type = "Record<string, number>")]
    pub leverage: BTreeMap<String, f64>,
    /// Per-competency content coverage overlay, 0–5, aligned with
    /// `competency_ids`.
    pub coverage: Vec<f64>,
    pub content_drivers: Vec<ContentDriver>,
    pub recommendations: Vec<Recommendation>,
    pub roi: RoiResult,
}
