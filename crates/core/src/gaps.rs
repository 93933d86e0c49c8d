// crates/core/src/gaps.rs
//! Actual-vs-target comparison: the ranked gap list.

use skillradar_types::{Competency, GapEntry};

use crate::normalize::round2;

/// Gap entries for `actual` against the configured targets, sorted by gap
/// descending. Ties keep configuration order (the sort is stable).
///
/// Pure: no side effects, inputs untouched. Vectors shorter than the config
/// are treated as missing trailing scores of 0.
pub fn compute_gaps(actual: &[f64], config: &[Competency]) -> Vec<GapEntry> {
    let mut entries: Vec<GapEntry> = config
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let a = actual.get(i).copied().unwrap_or(0.0);
            GapEntry {
                id: c.id.clone(),
                label: c.label.clone(),
                actual: a,
                target: c.target,
                gap: round2(c.target - a),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.gap.partial_cmp(&a.gap).unwrap_or(std::cmp::Ordering::Equal));
    entries
}
