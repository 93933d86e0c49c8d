// crates/core/src/reco.rs
//! Remediation recommendations: gap size × KPI influence, with a canned
//! playbook entry per mode/competency.

use skillradar_types::{GapEntry, InfluenceScore, Mode, Recommendation};

use crate::normalize::round2;

/// How many recommendations surface per query.
const TOP_N: usize = 3;

/// A canned remediation play, keyed by mode + competency id.
struct CannedAction {
    mode: Mode,
    competency: &'static str,
    title: &'static str,
    expected_skill_lift: f64,
    est_cost: f64,
}

/// The remediation playbook. Lifts and costs are demo-calibrated per play.
static CANNED: &[CannedAction] = &[
    // Sales
    CannedAction { mode: Mode::Sales, competency: "discovery", title: "Discovery Micro-Tour", expected_skill_lift: 0.8, est_cost: 1500.0 },
    CannedAction { mode: Mode::Sales, competency: "objections", title: "Objection Playbook Drill", expected_skill_lift: 0.7, est_cost: 1200.0 },
    CannedAction { mode: Mode::Sales, competency: "multi", title: "Multithreading Workflow", expected_skill_lift: 0.6, est_cost: 900.0 },
    CannedAction { mode: Mode::Sales, competency: "demo", title: "Demo Coverage Checklist", expected_skill_lift: 0.6, est_cost: 800.0 },
    CannedAction { mode: Mode::Sales, competency: "nextstep", title: "Next-Step Script & CTA", expected_skill_lift: 0.5, est_cost: 600.0 },
    // CS
    CannedAction { mode: Mode::Cs, competency: "onboarding", title: "Onboarding Runbook", expected_skill_lift: 0.7, est_cost: 1000.0 },
    CannedAction { mode: Mode::Cs, competency: "activation", title: "Feature Activation Coach", expected_skill_lift: 0.6, est_cost: 900.0 },
    CannedAction { mode: Mode::Cs, competency: "triage", title: "Triage Macros", expected_skill_lift: 0.5, est_cost: 700.0 },
    CannedAction { mode: Mode::Cs, competency: "qbr", title: "QBR Cadence Pack", expected_skill_lift: 0.5, est_cost: 700.0 },
    CannedAction { mode: Mode::Cs, competency: "renewal", title: "Renewal Forecast Kit", expected_skill_lift: 0.6, est_cost: 900.0 },
    // Production
    CannedAction { mode: Mode::Production, competency: "flow", title: "Smaller PRs Policy", expected_skill_lift: 0.6, est_cost: 800.0 },
    CannedAction { mode: Mode::Production, competency: "review", title: "Review-SLA Bot", expected_skill_lift: 0.7, est_cost: 1000.0 },
    CannedAction { mode: Mode::Production, competency: "reliable", title: "Pre-merge Checklist", expected_skill_lift: 0.6, est_cost: 900.0 },
    CannedAction { mode: Mode::Production, competency: "recovery", title: "Incident Drill & Runbooks", expected_skill_lift: 0.8, est_cost: 1200.0 },
    CannedAction { mode: Mode::Production, competency: "eff", title: "WIP Limits Coaching", expected_skill_lift: 0.5, est_cost: 700.0 },
];

/// Fallback play when no canned mapping exists for a competency.
const GENERIC: CannedAction = CannedAction {
    mode: Mode::Sales, // unused for the fallback
    competency: "",
    title: "Coaching Intervention",
    expected_skill_lift: 0.5,
    est_cost: 800.0,
};

fn canned_for(mode: Mode, competency_id: &str) -> &'static CannedAction {
    CANNED
        .iter()
        .find(|c| c.mode == mode && c.competency == competency_id)
        .unwrap_or(&GENERIC)
}

/// Rank remediation actions: `priority = influence × max(0, gap)`, top 3.
///
/// `expectedKpiLift = round₂(skillLift × influence / 5)` — a competency no
/// one believes moves the KPI gets no projected lift however large its gap.
/// A gap with no influence entry counts influence 0 and sinks to the bottom.
pub fn rank_recommendations(
    mode: Mode,
    gaps: &[GapEntry],
    influence: &[InfluenceScore],
) -> Vec<Recommendation> {
    let mut rows: Vec<Recommendation> = gaps
        .iter()
        .map(|g| {
            let inf = influence
                .iter()
                .find(|i| i.label == g.label)
                .map(|i| i.score_0_to_5)
                .unwrap_or(0.0);
            let canned = canned_for(mode, &g.id);
            Recommendation {
                id: g.id.clone(),
                label: g.label.clone(),
                gap: g.gap,
                influence: inf,
                priority: inf * g.gap.max(0.0),
                title: canned.title.to_string(),
                expected_skill_lift: canned.expected_skill_lift,
                est_cost: canned.est_cost,
                expected_kpi_lift: round2(canned.expected_skill_lift * (inf / 5.0)),
                assets: Vec::new(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(TOP_N);
    rows
}
