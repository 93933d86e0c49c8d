// crates/types/src/signals.rs
//! Raw behavioral/operational extracts, one collection per upstream system.
//!
//! Field names follow the upstream JSON exports; aliases cover the spellings
//! seen across tenants. Every metric field is `Option` — missing data is
//! resolved to neutral defaults inside the scorer, never here.

use serde::Deserialize;
use serde_json::Value;

/// Per-rep conversation analytics (call recording platform export).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallStats {
    #[serde(alias = "rep_id", alias = "user_id")]
    pub person_id: String,
    /// Questions asked per minute of talk time, pre-aggregated upstream.
    #[serde(default)]
    pub question_rate: Option<f64>,
    /// Rep share of total talk time, 0..1. Balanced conversations sit near 0.5.
    #[serde(default, alias = "talk_time_ratio")]
    pub talk_ratio: Option<f64>,
    #[serde(default, alias = "objection_rate")]
    pub objections_per_call: Option<f64>,
    /// Share of calls that ended with an agreed next step, 0..1.
    #[serde(default)]
    pub next_step_rate: Option<f64>,
}

/// One open or closed opportunity from the CRM.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealRecord {
    #[serde(alias = "owner_id")]
    pub person_id: String,
    #[serde(default, alias = "account")]
    pub account_id: Option<String>,
}

/// One content view/share event from the content system.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentUsageEvent {
    #[serde(alias = "user_id")]
    pub person_id: String,
    #[serde(default, alias = "contentId", alias = "id")]
    pub content_id: Option<String>,
}

/// One course enrollment from the learning management system.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingRecord {
    #[serde(alias = "learner_id", alias = "user_id")]
    pub person_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// One graded assessment result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentRecord {
    #[serde(alias = "learner_id", alias = "user_id")]
    pub person_id: String,
    /// Score on the assessment's own scale; calibrated via competency bounds.
    #[serde(default)]
    pub score: Option<f64>,
}

/// One support/incident ticket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketRecord {
    #[serde(alias = "assignee_id", alias = "owner_id")]
    pub person_id: String,
    /// Upstream severity string: "high" / "sev1" / "critical" mark the
    /// high-severity bucket; anything else is routine.
    #[serde(default, alias = "priority")]
    pub severity: Option<String>,
    #[serde(default, alias = "resolution_time_min", alias = "ttr_minutes")]
    pub resolution_minutes: Option<f64>,
}

impl TicketRecord {
    /// Whether this ticket counts toward the high-severity bucket.
    pub fn is_high_severity(&self) -> bool {
        matches!(
            self.severity.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("high") | Some("critical") | Some("sev1") | Some("p1")
        )
    }
}

/// One snapshot of every raw collection the pipeline reads.
///
/// Collection keys accept both our canonical names and the upstream file
/// names (`gong`, `support`, `content_catalog`, `lrs`/`lms_lrs`). Catalog and
/// learning-record rows stay raw [`Value`]s: their schemas vary per tenant
/// and are normalized through one accessor table in the core.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    #[serde(alias = "gong")]
    pub calls: Vec<CallStats>,
    #[serde(alias = "crm")]
    pub deals: Vec<DealRecord>,
    #[serde(alias = "cms")]
    pub content_usage: Vec<ContentUsageEvent>,
    #[serde(alias = "lms")]
    pub training: Vec<TrainingRecord>,
    pub assessments: Vec<AssessmentRecord>,
    #[serde(alias = "support")]
    pub tickets: Vec<TicketRecord>,
    #[serde(alias = "content_catalog")]
    pub catalog: Vec<Value>,
    #[serde(alias = "lrs", alias = "lms_lrs")]
    pub learning_events: Vec<Value>,
}
