// crates/core/src/roi.rs
//! Cohort-aware ROI/COI model with per-function cost drivers.
//!
//! All figures are annualized. Upside and cost-of-inaction formulas branch
//! per mode; program cost comes from recommendation costs when present,
//! else the fixed + per-user model. Degenerate inputs (zero cohort, no
//! recommendations) flow through the documented clamps and produce finite
//! zeros, never NaN.

use skillradar_types::{AssumptionOverrides, Mode, Recommendation, RoiAssumptions, RoiResult};
use tracing::debug;

use crate::normalize::round2;

fn round_money(v: f64) -> i64 {
    if v.is_finite() {
        v.round() as i64
    } else {
        0
    }
}

/// Annualized upside for the cohort at `total_kpi_lift`.
fn upside_annual(mode: Mode, total_kpi_lift: f64, cohort_size: f64, a: &RoiAssumptions) -> f64 {
    match mode {
        Mode::Sales => {
            let baseline_vol = a.sales.deals_per_rep_per_year
                * a.sales.avg_deal_size
                * cohort_size
                * a.gross_margin;
            total_kpi_lift * baseline_vol
        }
        Mode::Cs => {
            // revenue lens: NRR/GRR uplift on the managed ARR base
            let baseline_arr =
                a.cs.accounts_per_csm * a.cs.arr_per_account * cohort_size * a.gross_margin;
            let arr_upside = total_kpi_lift * baseline_arr;

            // efficiency lens: each +1.0 lift trims 20% of days-open cost,
            // capped at the full ticket cost
            let yearly_tickets = a.cs.tickets_per_person_per_month * 12.0 * cohort_size;
            let ticket_cost = yearly_tickets * a.cs.avg_days_open * a.cs.cost_per_ticket_open_day;
            let ticket_savings = ticket_cost * (0.20 * total_kpi_lift).min(1.0);

            arr_upside + ticket_savings
        }
        Mode::Production => {
            // cycle-time savings in engineer-days
            let days_saved = total_kpi_lift * a.prod.days_saved_per_lift;
            let flow_savings = days_saved * a.prod.eng_cost_per_day;

            // downtime avoidance over the preventable slice
            let preventable = a.prod.downtime_hours_annual * a.prod.preventable_share;
            let avoided_hours =
                preventable * (a.prod.downtime_avoidance_factor * total_kpi_lift).min(1.0);
            let downtime_savings = avoided_hours * a.prod.cost_per_hour_downtime;

            flow_savings + downtime_savings
        }
    }
}

/// Annualized cost of inaction: training waste common to all modes, a
/// mode-specific operational drag, and the delay cost of sitting on the
/// upside for a quarter.
fn coi_annual(mode: Mode, upside: f64, cohort_size: f64, a: &RoiAssumptions) -> f64 {
    let training_waste = cohort_size
        * a.training_hours_per_person
        * a.fully_loaded_hourly
        * a.non_applicable_training_pct;

    let function_drag = match mode {
        Mode::Sales => 0.0, // Sales inaction cost sits in the delay term
        Mode::Cs => {
            let yearly_tickets = a.cs.tickets_per_person_per_month * 12.0 * cohort_size;
            yearly_tickets * a.cs.avg_days_open * a.cs.cost_per_ticket_open_day
        }
        Mode::Production => {
            a.prod.downtime_hours_annual * a.prod.cost_per_hour_downtime * a.prod.downtime_drag_share
        }
    };

    let delay = upside * a.delay_factor;
    training_waste + function_drag + delay
}

/// Full ROI/COI projection for a cohort and its ranked recommendations.
pub fn compute_roi(
    mode: Mode,
    recos: &[Recommendation],
    cohort_size: usize,
    overrides: &AssumptionOverrides,
) -> RoiResult {
    let a = RoiAssumptions::merged(overrides);
    let team = cohort_size as f64;

    let total_kpi_lift = round2(
        recos
            .iter()
            .map(|r| r.expected_kpi_lift)
            .filter(|v| v.is_finite())
            .sum(),
    );

    let upside = upside_annual(mode, total_kpi_lift, team, &a);
    let coi = coi_annual(mode, upside, team, &a);

    let recos_cost: f64 = recos.iter().map(|r| r.est_cost).filter(|v| v.is_finite()).sum();
    let program_cost = if recos_cost > 0.0 {
        recos_cost
    } else {
        a.program_cost_fixed + a.program_cost_per_user * team
    };

    let monthly_upside = upside / 12.0;
    let payback_months = if program_cost > 0.0 {
        let monthly = if monthly_upside == 0.0 { 1.0 } else { monthly_upside };
        (program_cost / monthly).clamp(0.5, 36.0)
    } else {
        0.5
    };

    let roi_percent = {
        let denom = if program_cost == 0.0 { 1.0 } else { program_cost };
        ((upside - program_cost) / denom) * 100.0
    };

    let result = RoiResult {
        total_kpi_lift,
        upside_annual: round_money(upside),
        coi_annual: round_money(coi),
        net_annual: round_money(upside - coi),
        program_cost: round_money(program_cost),
        payback_months: (payback_months * 10.0).round() / 10.0,
        roi_percent: round_money(roi_percent),
    };
    debug!(mode = %mode, cohort_size, ?result, "roi computed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reco(kpi_lift: f64, cost: f64) -> Recommendation {
        Recommendation {
            id: "discovery".into(),
            label: "Discovery".into(),
            gap: 2.0,
            influence: 4.0,
            priority: 8.0,
            title: "Discovery Micro-Tour".into(),
            expected_skill_lift: 0.8,
            est_cost: cost,
            expected_kpi_lift: kpi_lift,
            assets: Vec::new(),
        }
    }

    fn no_overrides() -> AssumptionOverrides {
        AssumptionOverrides::default()
    }

    #[test]
    fn test_zero_cohort_no_recos_is_finite_and_zero() {
        for mode in Mode::ALL {
            let r = compute_roi(mode, &[], 0, &no_overrides());
            assert_eq!(r.total_kpi_lift, 0.0, "{mode}");
            assert_eq!(r.upside_annual, 0, "{mode}");
            // program cost falls back to the fixed component alone
            assert_eq!(r.program_cost, 2000, "{mode}");
            assert!(r.payback_months >= 0.5 && r.payback_months <= 36.0);
        }
    }

    #[test]
    fn test_sales_upside_formula() {
        // lift 0.5 × 20 deals × $50k × 10 reps × 0.70 margin = $3.5M
        let r = compute_roi(Mode::Sales, &[reco(0.5, 0.0)], 10, &no_overrides());
        assert_eq!(r.upside_annual, 3_500_000);
    }

    #[test]
    fn test_cs_upside_matches_hand_computation() {
        // ARR uplift: 25 × 20_000 × 10 × 0.70 × 0.5       = 1_750_000
        // ticket cost: 120 × 12 × 10 × 2.5 × 25            =   900_000
        // ticket savings: 900_000 × min(1, 0.20 × 0.5)     =    90_000
        let r = compute_roi(Mode::Cs, &[reco(0.5, 0.0)], 10, &no_overrides());
        assert_eq!(r.upside_annual, 1_840_000);
    }

    #[test]
    fn test_production_upside_formula() {
        // flow: 0.5 × 40 days × $800                        = 16_000
        // downtime: 8h × 0.30 × min(1, 0.50 × 0.5) × 300k  = 180_000
        let r = compute_roi(Mode::Production, &[reco(0.5, 0.0)], 4, &no_overrides());
        assert_eq!(r.upside_annual, 196_000);
    }

    #[test]
    fn test_cs_ticket_savings_capped_at_full_cost() {
        // lift 8.0 would imply 160% of ticket cost; cap holds it at 100%
        let r = compute_roi(Mode::Cs, &[reco(8.0, 0.0)], 1, &no_overrides());
        let arr_upside: f64 = 25.0 * 20_000.0 * 0.70 * 8.0;
        let ticket_cost: f64 = 120.0 * 12.0 * 2.5 * 25.0;
        assert_eq!(r.upside_annual, (arr_upside + ticket_cost).round() as i64);
    }

    #[test]
    fn test_coi_includes_mode_drag() {
        // Sales: training waste + delay only
        let sales = compute_roi(Mode::Sales, &[reco(0.5, 0.0)], 10, &no_overrides());
        let waste: f64 = 10.0 * 24.0 * 90.0 * 0.35;
        let delay: f64 = 3_500_000.0 * 0.25;
        assert_eq!(sales.coi_annual, (waste + delay).round() as i64);

        // Production: adds the fixed drag slice of downtime cost
        let prod = compute_roi(Mode::Production, &[], 0, &no_overrides());
        let drag: f64 = 8.0 * 300_000.0 * 0.10;
        assert_eq!(prod.coi_annual, drag.round() as i64);
    }

    #[test]
    fn test_program_cost_prefers_reco_costs() {
        let r = compute_roi(Mode::Sales, &[reco(0.1, 1500.0), reco(0.1, 900.0)], 10, &no_overrides());
        assert_eq!(r.program_cost, 2400);

        // zero-cost recommendations fall back to fixed + per-user
        let r2 = compute_roi(Mode::Sales, &[reco(0.1, 0.0)], 10, &no_overrides());
        assert_eq!(r2.program_cost, 2000 + 720 * 10);
    }

    #[test]
    fn test_payback_clamped() {
        // huge program cost, tiny upside -> clamps at 36 months
        let expensive = AssumptionOverrides {
            program_cost_fixed: Some(10_000_000.0),
            ..Default::default()
        };
        let r = compute_roi(Mode::Sales, &[reco(0.01, 0.0)], 1, &expensive);
        assert_eq!(r.payback_months, 36.0);

        // tiny cost, big upside -> clamps at half a month
        let cheap = AssumptionOverrides {
            program_cost_fixed: Some(1.0),
            program_cost_per_user: Some(0.0),
            ..Default::default()
        };
        let r2 = compute_roi(Mode::Sales, &[reco(1.0, 0.0)], 10, &cheap);
        assert_eq!(r2.payback_months, 0.5);
    }

    #[test]
    fn test_roi_percent() {
        // upside 3.5M, program cost 9.2k -> ((3.5M - 9.2k) / 9.2k) × 100
        let r = compute_roi(Mode::Sales, &[reco(0.5, 0.0)], 10, &no_overrides());
        let cost: f64 = 2000.0 + 720.0 * 10.0;
        let expected = ((3_500_000.0 - cost) / cost * 100.0).round() as i64;
        assert_eq!(r.roi_percent, expected);
    }

    #[test]
    fn test_overrides_flow_through() {
        let o = AssumptionOverrides {
            sales: Some(skillradar_types::SalesOverrides {
                avg_deal_size: Some(100_000.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let r = compute_roi(Mode::Sales, &[reco(0.5, 0.0)], 10, &o);
        assert_eq!(r.upside_annual, 7_000_000);
    }

    #[test]
    fn test_net_annual_is_upside_minus_coi() {
        let r = compute_roi(Mode::Cs, &[reco(0.5, 0.0)], 10, &no_overrides());
        assert_eq!(r.net_annual, r.upside_annual - r.coi_annual);
    }

    #[test]
    fn test_all_outputs_finite_for_extreme_inputs() {
        let zeroed = AssumptionOverrides {
            program_cost_fixed: Some(0.0),
            program_cost_per_user: Some(0.0),
            ..Default::default()
        };
        let r = compute_roi(Mode::Production, &[], 0, &zeroed);
        assert!(r.payback_months.is_finite());
        assert_eq!(r.payback_months, 0.5); // zero-cost program pays back immediately
        assert_eq!(r.roi_percent, 0);
        assert_eq!(r.program_cost, 0);
    }
}
