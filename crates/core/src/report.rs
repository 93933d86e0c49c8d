// crates/core/src/report.rs
//! One-call assembly of everything a dashboard query renders.
//!
//! Pure composition over the pipeline modules: cohort → scores → gaps →
//! influence → leverage/coverage → recommendations → ROI. Callers own the
//! session state (seed, overrides) and pass it in; calling twice with the
//! same inputs returns the same report.

use skillradar_types::{
    AnalysisReport, AssumptionOverrides, CohortSpec, Competency, DataSnapshot, Mode, Person,
};
use tracing::debug;

use crate::{cohort, gaps, influence, leverage, reco, roi, score};

/// Default synthetic sample size for the influence estimate.
pub const DEFAULT_SAMPLE_SIZE: usize = 60;
/// How many top content drivers a report carries.
const DRIVER_COUNT: usize = 5;
/// Catalog suggestions attached per surfaced recommendation.
const ASSETS_PER_RECO: usize = 2;

/// Inputs for one dashboard query. Everything is borrowed; the caller owns
/// the session state and the data snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ReportParams<'a> {
    pub mode: Mode,
    pub cohort: &'a CohortSpec,
    pub config: &'a [Competency],
    pub roster: &'a [Person],
    pub snapshot: &'a DataSnapshot,
    /// Seed for the synthetic influence cohort.
    pub seed: u32,
    /// Synthetic sample size; [`DEFAULT_SAMPLE_SIZE`] is the usual choice.
    pub sample_size: usize,
    pub overrides: &'a AssumptionOverrides,
}

/// Run the full pipeline for one (mode, cohort, snapshot) query.
pub fn build_report(params: ReportParams<'_>) -> AnalysisReport {
    let ReportParams {
        mode,
        cohort: spec,
        config,
        roster,
        snapshot,
        seed,
        sample_size,
        overrides,
    } = params;

    let cohort_ids = cohort::select_cohort(roster, mode, spec);
    let actual = score::score_for_cohort(mode, config, &cohort_ids, snapshot);
    let gap_list = gaps::compute_gaps(&actual, config);

    let labels: Vec<String> = config.iter().map(|c| c.label.clone()).collect();
    let sample = influence::generate_cohort_sample(mode, config.len(), seed, sample_size);
    let influence_list = influence::influence_scores(&labels, &sample);

    let lev = leverage::leverage_for_cohort(mode, &cohort_ids, snapshot);
    let coverage = leverage::coverage_for_cohort(mode, config, &cohort_ids, snapshot);
    let drivers = leverage::top_content_drivers(mode, &cohort_ids, snapshot, DRIVER_COUNT);

    let mut recommendations = reco::rank_recommendations(mode, &gap_list, &influence_list);
    let picks = leverage::recommend_content_for_gaps(
        mode,
        &gap_list,
        &cohort_ids,
        snapshot,
        ASSETS_PER_RECO,
    );
    for r in &mut recommendations {
        if let Some(p) = picks.iter().find(|p| p.skill == r.label) {
            r.assets = p.items.clone();
        }
    }

    let roi_result = roi::compute_roi(mode, &recommendations, cohort_ids.len(), overrides);

    debug!(
        mode = %mode,
        cohort = cohort_ids.len(),
        gaps = gap_list.len(),
        recos = recommendations.len(),
        "report assembled"
    );

    AnalysisReport {
        mode,
        cohort_ids,
        competency_ids: config.iter().map(|c| c.id.clone()).collect(),
        labels,
        targets: config.iter().map(|c| c.target).collect(),
        actual,
        gaps: gap_list,
        influence: influence_list,
        leverage: lev,
        coverage,
        content_drivers: drivers,
        recommendations,
        roi: roi_result,
    }
}
