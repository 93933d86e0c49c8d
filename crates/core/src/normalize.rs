// crates/core/src/normalize.rs
//! Scalar mapping of raw metric values onto the 0–5 competency scale,
//! plus the shared numeric conventions of the pipeline: neutral defaults
//! per raw signal, rounding, and non-finite sanitization.

/// Neutral fallbacks applied when a raw signal is absent or non-numeric.
///
/// Centralized so "what does missing data mean" is answered once, not
/// re-decided at each call site. Missing data resolves to these values and
/// scoring proceeds; it never errors.
pub mod neutral {
    /// Rep share of talk time when no calls are on file. 0.5 is a balanced
    /// conversation, i.e. neither credit nor penalty.
    pub const TALK_RATIO: f64 = 0.5;
    /// Ticket resolution when no tickets are on file (minutes).
    pub const TICKET_RESOLUTION_MIN: f64 = 600.0;
    /// Mean time to restore when no incident data exists (minutes).
    pub const MTTR_MIN: f64 = 600.0;
    /// Contribution for a competency id no scoring rule maps.
    pub const UNMAPPED_SCORE: f64 = 3.0;
    /// Replacement for non-finite score elements, and the per-element value
    /// of the empty-cohort placeholder vector. Small but nonzero so radars
    /// always render a visible shape.
    pub const SCORE_PLACEHOLDER: f64 = 0.2;
    /// Expected skill lift for catalog rows that omit it.
    pub const EXPECTED_LIFT: f64 = 0.2;

    // Fixed placeholder scores for dimensions without instrumented signals.
    pub const QBR_CADENCE: f64 = 3.2;
    pub const RENEWAL_CADENCE: f64 = 3.4;
    pub const DEPLOY_FLOW: f64 = 3.6;
    pub const REVIEW_SLA: f64 = 3.3;
    pub const WIP_EFFICIENCY: f64 = 3.0;
}

/// Map a raw value onto [0, 5] against a `floor..target` calibration.
///
/// Missing/NaN input scores 0. The value is clamped into the interval,
/// scaled linearly, and inverted when `higher_is_better` is false. A zero
/// span (floor == target) is treated as span 1 rather than dividing by zero.
pub fn normalize(value: Option<f64>, floor: f64, target: f64, higher_is_better: bool) -> f64 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return 0.0;
    };
    let clamped = v.clamp(floor.min(target), floor.max(target));
    let span = target - floor;
    let span = if span == 0.0 { 1.0 } else { span };
    let score = ((clamped - floor) / span * 5.0).clamp(0.0, 5.0);
    if higher_is_better {
        score
    } else {
        5.0 - score
    }
}

/// Mean over the finite values of `values`, or `default` when none remain.
pub fn avg_or(values: impl IntoIterator<Item = f64>, default: f64) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 {
        default
    } else {
        sum / n as f64
    }
}

/// Replace non-finite elements with the documented placeholder.
///
/// A data error and a genuinely near-zero score both end up visually small;
/// the pipeline deliberately keeps that numeric behavior (see DESIGN.md).
pub fn sanitize_vector(scores: &mut [f64]) {
    for s in scores.iter_mut() {
        if !s.is_finite() {
            *s = neutral::SCORE_PLACEHOLDER;
        }
    }
}

/// Round to one decimal, the grain of displayed 0–5 scores.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimals, the grain of gaps and lift fractions.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
