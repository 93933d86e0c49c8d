// crates/core/src/leverage.rs
//! Training leverage: how much content consumption plausibly explains
//! competency attainment, plus content drivers and per-gap suggestions.
//!
//! Consumption events match catalog entries by metric tag first, content id
//! second (see `fields` for the tolerance tables). Only consumed events
//! count — an abandoned course is not leverage.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use skillradar_types::{Competency, ContentDriver, ContentSuggestion, DataSnapshot, GapContentPicks, GapEntry, Mode};
use tracing::debug;

use crate::fields::{self, CatalogItem};
use crate::normalize::{round1, round2};

/// Soft cap on touches per skill: five consumed items saturate utilization.
const UTILIZATION_CAP: f64 = 5.0;
/// Concave exponent boosting low-usage visibility on the radar overlay.
const UTILIZATION_EXPONENT: f64 = 0.6;
/// Presentation clamp for cohort leverage scores.
const LEVERAGE_FLOOR: f64 = 0.8;
const LEVERAGE_CEILING: f64 = 4.0;

fn event_matches_item(item: &CatalogItem, event: &Value) -> bool {
    if let (Some(tag), Some(event_tag)) = (item.tag.as_deref(), fields::event_tag_of(event)) {
        if tag == event_tag {
            return true;
        }
    }
    match fields::content_id_of(event) {
        Some(cid) => cid == item.content_id,
        None => false,
    }
}

/// Consumed events by `person_id`, resolved to catalog items.
fn consumed_items<'a>(
    catalog: &'a [CatalogItem],
    person_id: &str,
    events: &[Value],
) -> Vec<&'a CatalogItem> {
    events
        .iter()
        .filter(|e| fields::person_id_of(e).as_deref() == Some(person_id))
        .filter(|e| fields::is_consumed(e))
        .filter_map(|e| catalog.iter().find(|item| event_matches_item(item, e)))
        .collect()
}

/// Per-skill utilization in [0, 1] for one person.
///
/// Consumed matches per skill, divided by the soft cap of
/// [`UTILIZATION_CAP`] touches. Every catalog skill gets a key, so callers
/// see explicit zeros instead of missing entries.
pub fn utilization_for_person(
    mode: Mode,
    person_id: &str,
    snap: &DataSnapshot,
) -> BTreeMap<String, f64> {
    let catalog = fields::catalog_for_mode(mode, &snap.catalog);
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for item in consumed_items(&catalog, person_id, &snap.learning_events) {
        *counts.entry(item.skill_id.as_str()).or_insert(0) += 1;
    }
    catalog
        .iter()
        .map(|item| {
            let cnt = counts.get(item.skill_id.as_str()).copied().unwrap_or(0);
            let util = (f64::from(cnt) / UTILIZATION_CAP).clamp(0.0, 1.0);
            (item.skill_id.clone(), util)
        })
        .collect()
}

/// Per-skill 0–5 leverage for a cohort.
///
/// Mean utilization is raised to [`UTILIZATION_EXPONENT`] so small usage
/// still shows, multiplied by a factor from the strongest available
/// content's expected lift (`0.7 + lift × 0.9`), scaled to 5, clamped into
/// the visible [`LEVERAGE_FLOOR`]–[`LEVERAGE_CEILING`] band, one decimal.
/// Skills with zero cohort usage land on the floor — nonzero by design so
/// the overlay never vanishes.
pub fn leverage_for_cohort(
    mode: Mode,
    cohort_ids: &[String],
    snap: &DataSnapshot,
) -> BTreeMap<String, f64> {
    let catalog = fields::catalog_for_mode(mode, &snap.catalog);
    let mut skills: Vec<&str> = catalog.iter().map(|c| c.skill_id.as_str()).collect();
    skills.sort_unstable();
    skills.dedup();

    let per_person: Vec<BTreeMap<String, f64>> = cohort_ids
        .iter()
        .map(|pid| utilization_for_person(mode, pid, snap))
        .collect();

    let mut out = BTreeMap::new();
    for skill in skills {
        let util_avg = if per_person.is_empty() {
            0.0
        } else {
            per_person
                .iter()
                .map(|u| u.get(skill).copied().unwrap_or(0.0))
                .sum::<f64>()
                / per_person.len() as f64
        };
        let best_lift = catalog
            .iter()
            .filter(|c| c.skill_id == skill)
            .map(|c| c.expected_skill_lift)
            .fold(f64::NEG_INFINITY, f64::max);
        let best_lift = if best_lift.is_finite() { best_lift } else { 0.2 };

        let util_scaled = util_avg.powf(UTILIZATION_EXPONENT);
        let lift_scaled = 0.7 + best_lift * 0.9;
        let score = (util_scaled * lift_scaled * 5.0).clamp(LEVERAGE_FLOOR, LEVERAGE_CEILING);
        out.insert(skill.to_string(), round1(score));
    }
    debug!(mode = %mode, skills = out.len(), cohort = cohort_ids.len(), "cohort leverage computed");
    out
}

fn cohort_consumed_events<'a>(cohort_ids: &[String], events: &'a [Value]) -> Vec<&'a Value> {
    let members: HashSet<&str> = cohort_ids.iter().map(String::as_str).collect();
    events
        .iter()
        .filter(|e| {
            fields::person_id_of(e)
                .as_deref()
                .is_some_and(|pid| members.contains(pid))
        })
        .filter(|e| fields::is_consumed(e))
        .collect()
}

fn usage_count(item: &CatalogItem, events: &[&Value]) -> u32 {
    events.iter().filter(|e| event_matches_item(item, e)).count() as u32
}

/// Top catalog items for the cohort, ranked by `uses × expected lift`.
pub fn top_content_drivers(
    mode: Mode,
    cohort_ids: &[String],
    snap: &DataSnapshot,
    top_n: usize,
) -> Vec<ContentDriver> {
    let catalog = fields::catalog_for_mode(mode, &snap.catalog);
    let events = cohort_consumed_events(cohort_ids, &snap.learning_events);
    let mut drivers: Vec<ContentDriver> = catalog
        .iter()
        .map(|item| {
            let used = usage_count(item, &events);
            ContentDriver {
                content_id: item.content_id.clone(),
                skill_id: item.skill_id.clone(),
                expected_skill_lift: item.expected_skill_lift,
                used,
                driver: round2(f64::from(used) * item.expected_skill_lift),
            }
        })
        .collect();
    drivers.sort_by(|a, b| b.driver.partial_cmp(&a.driver).unwrap_or(std::cmp::Ordering::Equal));
    drivers.truncate(top_n);
    drivers
}

/// For the top three gaps, propose the best not-yet-saturated catalog items.
///
/// `priority = max(0, gap) × (1 − min(1, uses/5)) × (0.5 + lift)` — content
/// the cohort has already worn out ranks itself out regardless of lift.
pub fn recommend_content_for_gaps(
    mode: Mode,
    gaps: &[GapEntry],
    cohort_ids: &[String],
    snap: &DataSnapshot,
    per_gap: usize,
) -> Vec<GapContentPicks> {
    let catalog = fields::catalog_for_mode(mode, &snap.catalog);
    let events = cohort_consumed_events(cohort_ids, &snap.learning_events);

    gaps.iter()
        .take(3)
        .map(|g| {
            let mut items: Vec<ContentSuggestion> = catalog
                .iter()
                .filter(|item| item.skill_id == g.id)
                .map(|item| {
                    let used = usage_count(item, &events);
                    let saturation = 1.0 - (f64::from(used) / UTILIZATION_CAP).min(1.0);
                    ContentSuggestion {
                        content_id: item.content_id.clone(),
                        skill_id: item.skill_id.clone(),
                        tag: item.tag.clone(),
                        expected_skill_lift: item.expected_skill_lift,
                        used,
                        priority: g.gap.max(0.0) * saturation * (0.5 + item.expected_skill_lift),
                    }
                })
                .collect();
            items.sort_by(|a, b| {
                b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal)
            });
            items.truncate(per_gap);
            GapContentPicks {
                skill: g.label.clone(),
                gap: g.gap,
                items,
            }
        })
        .collect()
}

/// Per-competency content-coverage overlay, 0–5, aligned with `config`.
///
/// For each competency: the related content set (tag match with metric-id
/// leniency, then competency fallback), each member's consumed share of it,
/// averaged over the cohort and scaled to 5. No related content means 0 —
/// there is nothing to cover.
pub fn coverage_for_cohort(
    mode: Mode,
    config: &[Competency],
    cohort_ids: &[String],
    snap: &DataSnapshot,
) -> Vec<f64> {
    let catalog = fields::catalog_for_mode(mode, &snap.catalog);

    // consumed content-id set per cohort member
    let mut consumed: HashMap<&str, HashSet<String>> = HashMap::new();
    let members: HashSet<&str> = cohort_ids.iter().map(String::as_str).collect();
    for e in &snap.learning_events {
        let Some(pid) = fields::person_id_of(e) else { continue };
        let Some(member) = members.get(pid.as_str()).copied() else { continue };
        if !fields::is_consumed(e) {
            continue;
        }
        let Some(cid) = fields::content_id_of(e).or_else(|| {
            // tag-only events resolve through the catalog
            fields::event_tag_of(e).and_then(|tag| {
                catalog
                    .iter()
                    .find(|item| item.tag.as_deref() == Some(tag.as_str()))
                    .map(|item| item.content_id.clone())
            })
        }) else {
            continue;
        };
        consumed.entry(member).or_default().insert(cid);
    }

    config
        .iter()
        .map(|c| {
            let related = fields::related_content_for_metric(&catalog, &c.id, &c.label);
            if related.is_empty() || cohort_ids.is_empty() {
                return 0.0;
            }
            let denom = related.len() as f64;
            let cohort_pct = cohort_ids
                .iter()
                .map(|pid| {
                    consumed
                        .get(pid.as_str())
                        .map(|set| related.iter().filter(|cid| set.contains(*cid)).count() as f64 / denom)
                        .unwrap_or(0.0)
                })
                .sum::<f64>()
                / cohort_ids.len() as f64;
            (cohort_pct * 5.0).clamp(0.0, 5.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot() -> DataSnapshot {
        let mut snap = DataSnapshot::default();
        snap.catalog = vec![
            json!({"content_id":"c-disc-1","mode":"Sales","skill_id":"discovery","tag":"question_rate","tags":["question_rate"],"expected_skill_lift":0.25}),
            json!({"content_id":"c-disc-2","mode":"Sales","skill_id":"discovery","tag":"talk_ratio","tags":["talk_ratio"],"expected_skill_lift":0.18}),
            json!({"content_id":"c-demo-1","mode":"Sales","skill_id":"demo","tag":"demo_accuracy_rate","tags":["demo_accuracy_rate"],"expected_skill_lift":0.30}),
            json!({"content_id":"c-cs-1","mode":"CS","skill_id":"triage","tag":"resolution","tags":["resolution"],"expected_skill_lift":0.22}),
        ];
        snap
    }

    fn event(pid: &str, tag: &str) -> Value {
        json!({"person_id": pid, "content_tag": tag, "status": "completed"})
    }

    #[test]
    fn test_utilization_counts_consumed_matches() {
        let mut snap = snapshot();
        snap.learning_events = vec![
            event("p-1", "question_rate"),
            event("p-1", "question_rate"),
            event("p-1", "talk_ratio"),
            json!({"person_id":"p-1","content_tag":"question_rate","status":"in_progress","progress":0.2}),
        ];
        let util = utilization_for_person(Mode::Sales, "p-1", &snap);
        assert_eq!(util.get("discovery"), Some(&0.6)); // 3 consumed / cap 5
        assert_eq!(util.get("demo"), Some(&0.0));
    }

    #[test]
    fn test_utilization_matches_by_content_id_fallback() {
        let mut snap = snapshot();
        snap.learning_events = vec![json!({"person_id":"p-1","content_id":"c-demo-1","minutes":30})];
        let util = utilization_for_person(Mode::Sales, "p-1", &snap);
        assert_eq!(util.get("demo"), Some(&0.2));
    }

    #[test]
    fn test_utilization_caps_at_one() {
        let mut snap = snapshot();
        snap.learning_events = (0..12).map(|_| event("p-1", "question_rate")).collect();
        let util = utilization_for_person(Mode::Sales, "p-1", &snap);
        assert_eq!(util.get("discovery"), Some(&1.0));
    }

    #[test]
    fn test_leverage_stays_in_clamp_band() {
        let mut snap = snapshot();
        // saturate discovery, leave demo untouched
        snap.learning_events = (0..40).map(|_| event("p-1", "question_rate")).collect();
        let lev = leverage_for_cohort(Mode::Sales, &["p-1".to_string()], &snap);
        for (skill, score) in &lev {
            assert!(
                (LEVERAGE_FLOOR..=LEVERAGE_CEILING).contains(score),
                "{skill} score {score} outside clamp band"
            );
        }
        // zero-usage skill sits on the floor, not at zero
        assert_eq!(lev.get("demo"), Some(&LEVERAGE_FLOOR));
        assert!(lev.get("discovery").unwrap() > &LEVERAGE_FLOOR);
    }

    #[test]
    fn test_leverage_empty_cohort_lands_on_floor() {
        let snap = snapshot();
        let lev = leverage_for_cohort(Mode::Sales, &[], &snap);
        assert!(!lev.is_empty());
        assert!(lev.values().all(|s| *s == LEVERAGE_FLOOR));
    }

    #[test]
    fn test_leverage_saturated_usage_hits_ceiling_at_most() {
        let mut snap = snapshot();
        snap.catalog.push(json!({"content_id":"c-disc-3","mode":"Sales","skill_id":"discovery","tag":"question_rate","expected_skill_lift":0.95}));
        snap.learning_events = (0..100).map(|_| event("p-1", "question_rate")).collect();
        let lev = leverage_for_cohort(Mode::Sales, &["p-1".to_string()], &snap);
        // util 1.0, lift 0.95 -> raw 0.7+0.855 = 1.555 * 5 = 7.8, clamped
        assert_eq!(lev.get("discovery"), Some(&LEVERAGE_CEILING));
    }

    #[test]
    fn test_top_content_drivers_ranked() {
        let mut snap = snapshot();
        snap.learning_events = vec![
            event("p-1", "question_rate"),
            event("p-1", "question_rate"),
            event("p-2", "demo_accuracy_rate"),
        ];
        let ids = vec!["p-1".to_string(), "p-2".to_string()];
        let drivers = top_content_drivers(Mode::Sales, &ids, &snap, 5);
        assert_eq!(drivers[0].content_id, "c-disc-1"); // 2 × 0.25 = 0.5
        assert_eq!(drivers[0].driver, 0.5);
        assert_eq!(drivers[1].content_id, "c-demo-1"); // 1 × 0.30 = 0.3
        assert_eq!(drivers.len(), 4);
    }

    #[test]
    fn test_top_content_drivers_ignores_other_cohorts() {
        let mut snap = snapshot();
        snap.learning_events = vec![event("stranger", "question_rate")];
        let drivers = top_content_drivers(Mode::Sales, &["p-1".to_string()], &snap, 2);
        assert!(drivers.iter().all(|d| d.used == 0));
    }

    #[test]
    fn test_recommend_content_penalizes_saturated() {
        let mut snap = snapshot();
        // c-disc-1 consumed 5 times -> fully saturated
        snap.learning_events = (0..5).map(|_| event("p-1", "question_rate")).collect();
        let gaps = vec![GapEntry {
            id: "discovery".into(),
            label: "Discovery".into(),
            actual: 2.0,
            target: 5.0,
            gap: 3.0,
        }];
        let picks = recommend_content_for_gaps(Mode::Sales, &gaps, &["p-1".to_string()], &snap, 2);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].skill, "Discovery");
        // fresh item wins over the saturated one despite lower lift
        assert_eq!(picks[0].items[0].content_id, "c-disc-2");
        assert_eq!(picks[0].items[1].priority, 0.0);
    }

    #[test]
    fn test_recommend_content_negative_gap_zero_priority() {
        let snap = snapshot();
        let gaps = vec![GapEntry {
            id: "discovery".into(),
            label: "Discovery".into(),
            actual: 5.0,
            target: 4.0,
            gap: -1.0,
        }];
        let picks = recommend_content_for_gaps(Mode::Sales, &gaps, &[], &snap, 2);
        assert!(picks[0].items.iter().all(|i| i.priority == 0.0));
    }

    #[test]
    fn test_recommend_content_takes_top_three_gaps() {
        let snap = snapshot();
        let gap = |id: &str| GapEntry {
            id: id.into(),
            label: id.into(),
            actual: 1.0,
            target: 5.0,
            gap: 4.0,
        };
        let gaps = vec![gap("discovery"), gap("demo"), gap("multi"), gap("nextstep")];
        let picks = recommend_content_for_gaps(Mode::Sales, &gaps, &[], &snap, 2);
        assert_eq!(picks.len(), 3);
    }

    #[test]
    fn test_coverage_full_consumption_scores_five() {
        let mut snap = snapshot();
        snap.learning_events = vec![
            json!({"person_id":"p-1","content_id":"c-disc-1","status":"completed"}),
            json!({"person_id":"p-1","content_id":"c-disc-2","status":"completed"}),
        ];
        let config = vec![Competency {
            id: "question_rate".into(),
            label: "Discovery".into(),
            target: 5.0,
            metric_floor: 0.0,
            metric_target: 5.0,
            higher_is_better: true,
        }];
        let cov = coverage_for_cohort(Mode::Sales, &config, &["p-1".to_string()], &snap);
        // related set is {c-disc-1}; p-1 consumed it -> full coverage
        assert_eq!(cov, vec![5.0]);
    }

    #[test]
    fn test_coverage_zero_without_related_content() {
        let snap = snapshot();
        let config = vec![Competency {
            id: "unheard_of_metric".into(),
            label: "Mystery".into(),
            target: 5.0,
            metric_floor: 0.0,
            metric_target: 5.0,
            higher_is_better: true,
        }];
        let cov = coverage_for_cohort(Mode::Sales, &config, &["p-1".to_string()], &snap);
        assert_eq!(cov, vec![0.0]);
    }
}
