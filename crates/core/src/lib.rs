// crates/core/src/lib.rs
//! Competency analytics pipeline: cohort selection, 0–5 scoring, gap
//! analysis, synthetic-sample influence estimation, training leverage, and
//! ROI/COI projection.
//!
//! Every public function is pure and synchronous: same inputs, same output,
//! no shared state. Session state (seed, assumption overrides) belongs to
//! the caller and is passed in explicitly. Degenerate data — missing
//! fields, empty cohorts, unmapped competencies, zero-span calibrations —
//! resolves to documented defaults instead of errors; only boundary
//! parsing/validation returns `Result`.

pub mod cohort;
pub mod fields;
pub mod gaps;
pub mod influence;
pub mod leverage;
pub mod normalize;
pub mod prng;
pub mod reco;
pub mod report;
pub mod roi;
pub mod score;

pub use cohort::{regions_for_mode, select_cohort, spec_from_parts};
pub use gaps::compute_gaps;
pub use influence::{generate_cohort_sample, influence_scores, pearson, SampleMember};
pub use leverage::{
    coverage_for_cohort, leverage_for_cohort, recommend_content_for_gaps, top_content_drivers,
    utilization_for_person,
};
pub use normalize::normalize;
pub use prng::{seeded_scores, Mulberry32};
pub use reco::rank_recommendations;
pub use report::{build_report, ReportParams, DEFAULT_SAMPLE_SIZE};
pub use roi::compute_roi;
pub use score::{score_for_cohort, score_for_person};
