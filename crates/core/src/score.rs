// crates/core/src/score.rs
//! Per-person and per-cohort competency scoring.
//!
//! Each mode has a fixed mapping from raw behavioral signals to its
//! competency ids. Raw values are calibrated through each competency's
//! floor/target bounds via [`normalize`]; missing signals resolve to the
//! neutral defaults table, and a competency id with no mapping contributes
//! the documented default rather than failing the vector.

use skillradar_types::{Competency, DataSnapshot, Mode};
use tracing::debug;

use crate::normalize::{avg_or, neutral, normalize, sanitize_vector};

/// 0–5 score vector for one person, aligned with `config` order.
pub fn score_for_person(
    mode: Mode,
    config: &[Competency],
    person_id: &str,
    snap: &DataSnapshot,
) -> Vec<f64> {
    let mut scores: Vec<f64> = config
        .iter()
        .map(|c| score_competency(mode, c, person_id, snap))
        .collect();
    sanitize_vector(&mut scores);
    scores
}

/// Element-wise mean of the member vectors.
///
/// An empty cohort returns the placeholder vector (0.2 per element) so the
/// radar still renders a visible shape instead of erroring or collapsing
/// to the origin.
pub fn score_for_cohort(
    mode: Mode,
    config: &[Competency],
    cohort_ids: &[String],
    snap: &DataSnapshot,
) -> Vec<f64> {
    if cohort_ids.is_empty() {
        debug!(mode = %mode, "empty cohort, returning placeholder vector");
        return vec![neutral::SCORE_PLACEHOLDER; config.len()];
    }
    let mut sums = vec![0.0f64; config.len()];
    for pid in cohort_ids {
        let person = score_for_person(mode, config, pid, snap);
        for (sum, s) in sums.iter_mut().zip(person) {
            *sum += s;
        }
    }
    let n = cohort_ids.len() as f64;
    let mut means: Vec<f64> = sums.into_iter().map(|s| s / n).collect();
    sanitize_vector(&mut means);
    means
}

fn score_competency(mode: Mode, c: &Competency, person_id: &str, snap: &DataSnapshot) -> f64 {
    match mode {
        Mode::Sales => score_sales(c, person_id, snap),
        Mode::Cs => score_cs(c, person_id, snap),
        Mode::Production => score_production(c, person_id, snap),
    }
}

/// Midpoint of the calibration interval — the "no signal, no judgement"
/// value for rates where zero would read as a verdict.
fn midpoint(c: &Competency) -> f64 {
    (c.metric_floor + c.metric_target) / 2.0
}

fn score_sales(c: &Competency, person_id: &str, snap: &DataSnapshot) -> f64 {
    let calls = || snap.calls.iter().filter(move |r| r.person_id == person_id);
    match c.id.as_str() {
        // Question quality and talk balance weighted equally. A rep who
        // monologues scores low on balance no matter how good the questions.
        "discovery" => {
            let q_rate = {
                let vals: Vec<f64> = calls().filter_map(|r| r.question_rate).collect();
                if vals.is_empty() {
                    None
                } else {
                    Some(avg_or(vals, 0.0))
                }
            };
            let question_score = normalize(q_rate, c.metric_floor, c.metric_target, c.higher_is_better);
            let talk = avg_or(calls().filter_map(|r| r.talk_ratio), neutral::TALK_RATIO);
            let balance = (1.0 - 2.0 * (talk - 0.5).abs()).clamp(0.0, 1.0);
            (question_score + balance * 5.0) / 2.0
        }
        "objections" => {
            let freq = avg_or(calls().filter_map(|r| r.objections_per_call), midpoint(c));
            normalize(Some(freq), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "multi" => {
            let mut accounts: Vec<&str> = snap
                .deals
                .iter()
                .filter(|d| d.person_id == person_id)
                .filter_map(|d| d.account_id.as_deref())
                .collect();
            accounts.sort_unstable();
            accounts.dedup();
            normalize(Some(accounts.len() as f64), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "demo" => {
            let uses = snap
                .content_usage
                .iter()
                .filter(|e| e.person_id == person_id)
                .count();
            normalize(Some(uses as f64), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "nextstep" => {
            let rate = avg_or(calls().filter_map(|r| r.next_step_rate), 0.0);
            normalize(Some(rate), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        other => unmapped(other),
    }
}

fn score_cs(c: &Competency, person_id: &str, snap: &DataSnapshot) -> f64 {
    match c.id.as_str() {
        "onboarding" => {
            let completed = snap
                .training
                .iter()
                .filter(|t| t.person_id == person_id)
                .filter(|t| {
                    matches!(
                        t.status.as_deref().map(str::to_ascii_lowercase).as_deref(),
                        Some("completed") | Some("passed")
                    )
                })
                .count();
            normalize(Some(completed as f64), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "activation" => {
            let score = avg_or(
                snap.assessments
                    .iter()
                    .filter(|a| a.person_id == person_id)
                    .filter_map(|a| a.score),
                midpoint(c),
            );
            normalize(Some(score), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "triage" => {
            let minutes = avg_or(
                snap.tickets
                    .iter()
                    .filter(|t| t.person_id == person_id)
                    .filter_map(|t| t.resolution_minutes),
                neutral::TICKET_RESOLUTION_MIN,
            );
            normalize(Some(minutes), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        // No QBR or renewal instrumentation is wired up; fixed placeholders
        // keep the radar dimensions populated.
        "qbr" => neutral::QBR_CADENCE,
        "renewal" => neutral::RENEWAL_CADENCE,
        other => unmapped(other),
    }
}

fn score_production(c: &Competency, person_id: &str, snap: &DataSnapshot) -> f64 {
    let high_sev = || {
        snap.tickets
            .iter()
            .filter(move |t| t.person_id == person_id && t.is_high_severity())
    };
    match c.id.as_str() {
        // Deploy-frequency and review-SLA feeds are not instrumented.
        "flow" => neutral::DEPLOY_FLOW,
        "review" => neutral::REVIEW_SLA,
        "reliable" => {
            let count = high_sev().count();
            normalize(Some(count as f64), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "recovery" => {
            let mttr = avg_or(
                high_sev().filter_map(|t| t.resolution_minutes),
                neutral::MTTR_MIN,
            );
            normalize(Some(mttr), c.metric_floor, c.metric_target, c.higher_is_better)
        }
        "eff" => neutral::WIP_EFFICIENCY,
        other => unmapped(other),
    }
}

fn unmapped(id: &str) -> f64 {
    debug!("no scoring rule for competency {id:?}, using default contribution");
    neutral::UNMAPPED_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skillradar_types::{CallStats, DealRecord, TicketRecord, TrainingRecord};

    fn comp(id: &str, floor: f64, target: f64, higher: bool) -> Competency {
        Competency {
            id: id.to_string(),
            label: id.to_string(),
            target: 5.0,
            metric_floor: floor,
            metric_target: target,
            higher_is_better: higher,
        }
    }

    fn call(pid: &str, q: f64, talk: f64) -> CallStats {
        CallStats {
            person_id: pid.to_string(),
            question_rate: Some(q),
            talk_ratio: Some(talk),
            objections_per_call: None,
            next_step_rate: None,
        }
    }

    #[test]
    fn test_discovery_blends_questions_and_balance() {
        let mut snap = DataSnapshot::default();
        snap.calls.push(call("p-1", 1.0, 0.5)); // perfect on both axes
        let config = vec![comp("discovery", 0.0, 1.0, true)];
        let v = score_for_person(Mode::Sales, &config, "p-1", &snap);
        assert_eq!(v, vec![5.0]);
    }

    #[test]
    fn test_discovery_penalizes_monologues() {
        let mut snap = DataSnapshot::default();
        snap.calls.push(call("p-1", 1.0, 1.0)); // great questions, zero balance
        let config = vec![comp("discovery", 0.0, 1.0, true)];
        let v = score_for_person(Mode::Sales, &config, "p-1", &snap);
        assert_eq!(v, vec![2.5]);
    }

    #[test]
    fn test_discovery_no_calls_uses_neutral_talk_balance() {
        let snap = DataSnapshot::default();
        let config = vec![comp("discovery", 0.0, 1.0, true)];
        // question component 0 (no data), balance component neutral -> 2.5
        let v = score_for_person(Mode::Sales, &config, "p-1", &snap);
        assert_eq!(v, vec![2.5]);
    }

    #[test]
    fn test_objections_inverse_direction_from_config() {
        let mut snap = DataSnapshot::default();
        snap.calls.push(CallStats {
            person_id: "p-1".into(),
            objections_per_call: Some(4.0),
            ..Default::default()
        });
        let config = vec![comp("objections", 0.0, 4.0, false)];
        let v = score_for_person(Mode::Sales, &config, "p-1", &snap);
        assert_eq!(v, vec![0.0]); // max objection frequency, worst score

        let config_mid = vec![comp("objections", 0.0, 4.0, false)];
        let none = score_for_person(Mode::Sales, &config_mid, "p-2", &snap);
        assert_eq!(none, vec![2.5]); // no calls -> midpoint default -> neutral
    }

    #[test]
    fn test_multi_counts_distinct_accounts() {
        let mut snap = DataSnapshot::default();
        for acct in ["a-1", "a-2", "a-1"] {
            snap.deals.push(DealRecord {
                person_id: "p-1".into(),
                account_id: Some(acct.into()),
            });
        }
        let config = vec![comp("multi", 0.0, 4.0, true)];
        let v = score_for_person(Mode::Sales, &config, "p-1", &snap);
        assert_eq!(v, vec![2.5]); // 2 distinct of target 4
    }

    #[test]
    fn test_cs_triage_inverse_resolution_time() {
        let mut snap = DataSnapshot::default();
        snap.tickets.push(TicketRecord {
            person_id: "p-1".into(),
            severity: None,
            resolution_minutes: Some(0.0),
        });
        let config = vec![comp("triage", 0.0, 1200.0, false)];
        let v = score_for_person(Mode::Cs, &config, "p-1", &snap);
        assert_eq!(v, vec![5.0]); // instant resolution

        // no tickets: documented 600-minute default, halfway down the scale
        let v2 = score_for_person(Mode::Cs, &config, "p-2", &snap);
        assert_eq!(v2, vec![2.5]);
    }

    #[test]
    fn test_cs_onboarding_counts_completed_only() {
        let mut snap = DataSnapshot::default();
        for status in ["completed", "in_progress", "Passed"] {
            snap.training.push(TrainingRecord {
                person_id: "p-1".into(),
                status: Some(status.into()),
            });
        }
        let config = vec![comp("onboarding", 0.0, 4.0, true)];
        let v = score_for_person(Mode::Cs, &config, "p-1", &snap);
        assert_eq!(v, vec![2.5]); // 2 completed of target 4
    }

    #[test]
    fn test_cs_placeholders_fixed() {
        let snap = DataSnapshot::default();
        let config = vec![comp("qbr", 0.0, 5.0, true), comp("renewal", 0.0, 5.0, true)];
        let v = score_for_person(Mode::Cs, &config, "p-1", &snap);
        assert_eq!(v, vec![neutral::QBR_CADENCE, neutral::RENEWAL_CADENCE]);
    }

    #[test]
    fn test_production_reliability_and_recovery() {
        let mut snap = DataSnapshot::default();
        snap.tickets.push(TicketRecord {
            person_id: "p-1".into(),
            severity: Some("high".into()),
            resolution_minutes: Some(120.0),
        });
        snap.tickets.push(TicketRecord {
            person_id: "p-1".into(),
            severity: Some("low".into()),
            resolution_minutes: Some(2000.0),
        });
        let config = vec![
            comp("reliable", 0.0, 4.0, false),
            comp("recovery", 0.0, 1200.0, false),
        ];
        let v = score_for_person(Mode::Production, &config, "p-1", &snap);
        assert_eq!(v[0], 5.0 - 1.0 / 4.0 * 5.0); // one high-sev ticket
        assert_eq!(v[1], 4.5); // 120 of 1200 minutes, inverted
    }

    #[test]
    fn test_unmapped_competency_gets_default() {
        let snap = DataSnapshot::default();
        let config = vec![comp("charisma", 0.0, 5.0, true)];
        for mode in Mode::ALL {
            let v = score_for_person(mode, &config, "p-1", &snap);
            assert_eq!(v, vec![neutral::UNMAPPED_SCORE]);
        }
    }

    #[test]
    fn test_cohort_is_elementwise_mean() {
        let mut snap = DataSnapshot::default();
        snap.deals.push(DealRecord {
            person_id: "p-1".into(),
            account_id: Some("a-1".into()),
        });
        snap.deals.push(DealRecord {
            person_id: "p-2".into(),
            account_id: Some("a-1".into()),
        });
        snap.deals.push(DealRecord {
            person_id: "p-2".into(),
            account_id: Some("a-2".into()),
        });
        let config = vec![comp("multi", 0.0, 4.0, true)];
        let ids = vec!["p-1".to_string(), "p-2".to_string()];

        let cohort = score_for_cohort(Mode::Sales, &config, &ids, &snap);
        let mean = (score_for_person(Mode::Sales, &config, "p-1", &snap)[0]
            + score_for_person(Mode::Sales, &config, "p-2", &snap)[0])
            / 2.0;
        assert_eq!(cohort, vec![mean]);
    }

    #[test]
    fn test_empty_cohort_placeholder() {
        let snap = DataSnapshot::default();
        let config = vec![comp("discovery", 0.0, 1.0, true), comp("demo", 0.0, 5.0, true)];
        let v = score_for_cohort(Mode::Sales, &config, &[], &snap);
        assert_eq!(v, vec![neutral::SCORE_PLACEHOLDER; 2]);
    }

    #[test]
    fn test_vector_alignment_with_config_order() {
        let snap = DataSnapshot::default();
        let config = vec![
            comp("flow", 0.0, 5.0, true),
            comp("review", 0.0, 5.0, true),
            comp("eff", 0.0, 5.0, true),
        ];
        let v = score_for_person(Mode::Production, &config, "p-1", &snap);
        assert_eq!(
            v,
            vec![neutral::DEPLOY_FLOW, neutral::REVIEW_SLA, neutral::WIP_EFFICIENCY]
        );
    }
}
