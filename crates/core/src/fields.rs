// crates/core/src/fields.rs
//! Schema-tolerant field access for catalog and learning-record rows.
//!
//! Catalog and LRS exports vary per tenant: the same concept shows up under
//! several field names and sometimes as scalar-instead-of-array. Each
//! concept gets one ordered candidate list here, tried in priority order, so
//! the tolerance policy lives in exactly one place.
//!
//! Candidate tables:
//! - content id: `content_id`, `contentId`, `id`, `content`
//! - tag-like:   `metrics`, `tags`, `labels`, `related_metric`
//! - competency: `competencies`, `competency`
//! - person id:  `person_id`, `user_id`, `learner_id`
//! - event tag:  `content_tag`, `tag`
//! - consumption: status `completed`/`passed`, OR progress ≥ 1, OR minutes > 0

use serde_json::Value;
use tracing::warn;

use crate::normalize::neutral;
use skillradar_types::Mode;

/// Lowercased, trimmed string form of a scalar value.
fn lc(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_ascii_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A field that may be a scalar or an array, flattened to lowercase strings.
fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(lc).collect(),
        Some(other) => lc(other).into_iter().collect(),
    }
}

fn first_string(row: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|key| {
        row.get(key).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

fn first_number(row: &Value, candidates: &[&str]) -> Option<f64> {
    candidates.iter().find_map(|key| {
        row.get(key).and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    })
}

/// Content id of a catalog or LRS row.
pub fn content_id_of(row: &Value) -> Option<String> {
    first_string(row, &["content_id", "contentId", "id", "content"])
}

/// Person id of an LRS row.
pub fn person_id_of(row: &Value) -> Option<String> {
    first_string(row, &["person_id", "user_id", "learner_id"])
}

/// The metric tag an LRS event was logged under.
pub fn event_tag_of(row: &Value) -> Option<String> {
    first_string(row, &["content_tag", "tag"]).map(|s| s.trim().to_ascii_lowercase())
}

/// Tag-like values of a catalog row (metric ids, labels).
pub fn tags_of(row: &Value) -> Vec<String> {
    let mut out = Vec::new();
    for key in ["metrics", "tags", "labels"] {
        out.extend(string_list(row.get(key)));
    }
    out.extend(string_list(row.get("related_metric")));
    out
}

/// Competency names a catalog row claims to build.
pub fn competencies_of(row: &Value) -> Vec<String> {
    let mut out = string_list(row.get("competencies"));
    out.extend(string_list(row.get("competency")));
    out
}

/// Whether an LRS row counts as consumed.
///
/// Consumed iff status is completed/passed, OR progress reached 1, OR any
/// positive duration was logged. A bare `completion: true` flag maps to the
/// completed status.
pub fn is_consumed(row: &Value) -> bool {
    let status = first_string(row, &["status", "state"])
        .map(|s| s.trim().to_ascii_lowercase())
        .or_else(|| match row.get("completion") {
            Some(Value::Bool(true)) => Some("completed".to_string()),
            _ => None,
        });
    if matches!(status.as_deref(), Some("completed") | Some("passed")) {
        return true;
    }
    let progress = first_number(row, &["progress", "completion"]).unwrap_or(0.0);
    if progress >= 1.0 {
        return true;
    }
    let minutes = first_number(row, &["minutes", "duration_min", "duration"]).unwrap_or(0.0);
    minutes > 0.0
}

/// Lenient spellings of a metric id: the id itself, `_rate`/`_days`
/// suffixes stripped, plus a fixed alias map for known renames.
pub fn metric_aliases(metric_id: &str) -> Vec<String> {
    let id = metric_id.trim().to_ascii_lowercase();
    let mut aliases = vec![id.clone()];
    if let Some(stripped) = id.strip_suffix("_rate") {
        aliases.push(stripped.to_string());
    }
    if let Some(stripped) = id.strip_suffix("_days") {
        aliases.push(stripped.to_string());
    }
    let mapped = match id.as_str() {
        "demo_accuracy_rate" => Some("demo_accuracy"),
        "customer_sentiment_score" => Some("sentiment"),
        "sales_stage_velocity" => Some("stage_velocity_days"),
        _ => None,
    };
    if let Some(m) = mapped {
        aliases.push(m.to_string());
    }
    aliases.dedup();
    aliases
}

/// A catalog row normalized through the accessor tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub content_id: String,
    pub mode: Option<Mode>,
    pub skill_id: String,
    /// Primary metric tag, when the row carries one.
    pub tag: Option<String>,
    pub tags: Vec<String>,
    pub competencies: Vec<String>,
    pub expected_skill_lift: f64,
}

impl CatalogItem {
    /// Normalize a raw catalog row. Rows with no usable content id are
    /// dropped (logged, not raised).
    pub fn from_value(row: &Value) -> Option<Self> {
        let Some(content_id) = content_id_of(row) else {
            warn!("catalog row without content id skipped");
            return None;
        };
        let mode = first_string(row, &["mode", "org_unit"]).and_then(|s| s.parse().ok());
        let skill_id = first_string(row, &["skill_id", "competency_id", "skill"])
            .unwrap_or_default()
            .to_ascii_lowercase();
        let tag = event_tag_of(row).or_else(|| {
            string_list(row.get("related_metric")).into_iter().next()
        });
        Some(Self {
            content_id,
            mode,
            skill_id,
            tag,
            tags: tags_of(row),
            competencies: competencies_of(row),
            expected_skill_lift: first_number(
                row,
                &["expected_skill_lift", "expectedSkillLift", "lift"],
            )
            .unwrap_or(neutral::EXPECTED_LIFT),
        })
    }
}

/// Normalized catalog entries belonging to `mode`.
pub fn catalog_for_mode(mode: Mode, rows: &[Value]) -> Vec<CatalogItem> {
    rows.iter()
        .filter_map(CatalogItem::from_value)
        .filter(|item| item.mode == Some(mode))
        .collect()
}

/// Content ids related to one competency metric.
///
/// Progressive fallback: exact tag↔metric-alias match first; then rows that
/// name the competency and carry no tags at all (no collision possible);
/// finally, if nothing matched, any row naming the competency.
pub fn related_content_for_metric(
    catalog: &[CatalogItem],
    metric_id: &str,
    competency: &str,
) -> Vec<String> {
    let aliases = metric_aliases(metric_id);
    let comp = competency.trim().to_ascii_lowercase();

    let mut ids: Vec<String> = Vec::new();
    for item in catalog {
        if item.tags.iter().any(|t| aliases.iter().any(|a| a == t)) {
            ids.push(item.content_id.clone());
        } else if item.competencies.contains(&comp) && item.tags.is_empty() {
            ids.push(item.content_id.clone());
        }
    }
    if ids.is_empty() {
        for item in catalog {
            if item.competencies.contains(&comp) {
                ids.push(item.content_id.clone());
            }
        }
    }
    ids.dedup();
    ids
}
