// crates/types/src/assumptions.rs
//! Financial assumptions behind the ROI/COI model.
//!
//! Defaults are conservative and easy to defend on an exec call; every
//! driver is overridable per session. Overrides deep-merge onto the
//! defaults: an omitted field keeps its default, a present field wins.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// General + per-mode cost drivers, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct RoiAssumptions {
    /// $/hour per person, salary + benefits.
    pub fully_loaded_hourly: f64,
    /// Share of training time that doesn't apply to the job.
    pub non_applicable_training_pct: f64,
    /// Hours/year per person.
    pub training_hours_per_person: f64,
    /// Contribution margin on revenue impact.
    pub gross_margin: f64,
    /// Share of annual upside lost by waiting one quarter.
    pub delay_factor: f64,
    /// $ fixed (setup / content / orchestration).
    pub program_cost_fixed: f64,
    /// $/user/year (license + ops).
    pub program_cost_per_user: f64,
    pub sales: SalesAssumptions,
    pub cs: CsAssumptions,
    pub prod: ProdAssumptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct SalesAssumptions {
    pub avg_deal_size: f64,
    pub deals_per_rep_per_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct CsAssumptions {
    pub tickets_per_person_per_month: f64,
    pub avg_days_open: f64,
    /// $ per ticket per open day.
    pub cost_per_ticket_open_day: f64,
    pub accounts_per_csm: f64,
    pub arr_per_account: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ProdAssumptions {
    /// $ per engineer-day saved.
    pub eng_cost_per_day: f64,
    pub cost_per_hour_downtime: f64,
    /// Baseline annual downtime hours.
    pub downtime_hours_annual: f64,
    /// Fraction of downtime we can realistically influence.
    pub preventable_share: f64,
    /// Team-days saved per +1.0 total skill lift.
    pub days_saved_per_lift: f64,
    /// Share of preventable downtime avoided at +1.0 lift.
    pub downtime_avoidance_factor: f64,
    /// Slice of annual downtime cost counted as ongoing operational drag in
    /// the cost of inaction. A round-number placeholder, not derived from a
    /// benchmark; kept overridable like every other driver.
    pub downtime_drag_share: f64,
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        Self {
            fully_loaded_hourly: 90.0,
            non_applicable_training_pct: 0.35,
            training_hours_per_person: 24.0,
            gross_margin: 0.70,
            delay_factor: 0.25,
            program_cost_fixed: 2000.0,
            program_cost_per_user: 60.0 * 12.0,
            sales: SalesAssumptions {
                avg_deal_size: 50_000.0,
                deals_per_rep_per_year: 20.0,
            },
            cs: CsAssumptions {
                tickets_per_person_per_month: 120.0,
                avg_days_open: 2.5,
                cost_per_ticket_open_day: 25.0,
                accounts_per_csm: 25.0,
                arr_per_account: 20_000.0,
            },
            prod: ProdAssumptions {
                eng_cost_per_day: 800.0,
                cost_per_hour_downtime: 300_000.0,
                downtime_hours_annual: 8.0,
                preventable_share: 0.30,
                days_saved_per_lift: 40.0,
                downtime_avoidance_factor: 0.50,
                downtime_drag_share: 0.10,
            },
        }
    }
}

/// Session-scoped overrides. Every field optional; nested blocks merge
/// field-by-field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumptionOverrides {
    pub fully_loaded_hourly: Option<f64>,
    pub non_applicable_training_pct: Option<f64>,
    pub training_hours_per_person: Option<f64>,
    pub gross_margin: Option<f64>,
    pub delay_factor: Option<f64>,
    pub program_cost_fixed: Option<f64>,
    pub program_cost_per_user: Option<f64>,
    pub sales: Option<SalesOverrides>,
    pub cs: Option<CsOverrides>,
    pub prod: Option<ProdOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesOverrides {
    pub avg_deal_size: Option<f64>,
    pub deals_per_rep_per_year: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsOverrides {
    pub tickets_per_person_per_month: Option<f64>,
    pub avg_days_open: Option<f64>,
    pub cost_per_ticket_open_day: Option<f64>,
    pub accounts_per_csm: Option<f64>,
    pub arr_per_account: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProdOverrides {
    pub eng_cost_per_day: Option<f64>,
    pub cost_per_hour_downtime: Option<f64>,
    pub downtime_hours_annual: Option<f64>,
    pub preventable_share: Option<f64>,
    pub days_saved_per_lift: Option<f64>,
    pub downtime_avoidance_factor: Option<f64>,
    pub downtime_drag_share: Option<f64>,
}

fn take(target: &mut f64, source: Option<f64>) {
    if let Some(v) = source {
        *target = v;
    }
}

impl RoiAssumptions {
    /// Defaults with `overrides` deep-merged on top.
    pub fn merged(overrides: &AssumptionOverrides) -> Self {
        let mut a = Self::default();
        a.apply(overrides);
        a
    }

    pub fn apply(&mut self, o: &AssumptionOverrides) {
        take(&mut self.fully_loaded_hourly, o.fully_loaded_hourly);
        take(&mut self.non_applicable_training_pct, o.non_applicable_training_pct);
        take(&mut self.training_hours_per_person, o.training_hours_per_person);
        take(&mut self.gross_margin, o.gross_margin);
        take(&mut self.delay_factor, o.delay_factor);
        take(&mut self.program_cost_fixed, o.program_cost_fixed);
        take(&mut self.program_cost_per_user, o.program_cost_per_user);
        if let Some(s) = &o.sales {
            take(&mut self.sales.avg_deal_size, s.avg_deal_size);
            take(&mut self.sales.deals_per_rep_per_year, s.deals_per_rep_per_year);
        }
        if let Some(c) = &o.cs {
            take(&mut self.cs.tickets_per_person_per_month, c.tickets_per_person_per_month);
            take(&mut self.cs.avg_days_open, c.avg_days_open);
            take(&mut self.cs.cost_per_ticket_open_day, c.cost_per_ticket_open_day);
            take(&mut self.cs.accounts_per_csm, c.accounts_per_csm);
            take(&mut self.cs.arr_per_account, c.arr_per_account);
        }
        if let Some(p) = &o.prod {
            take(&mut self.prod.eng_cost_per_day, p.eng_cost_per_day);
            take(&mut self.prod.cost_per_hour_downtime, p.cost_per_hour_downtime);
            take(&mut self.prod.downtime_hours_annual, p.downtime_hours_annual);
            take(&mut self.prod.preventable_share, p.preventable_share);
            take(&mut self.prod.days_saved_per_lift, p.days_saved_per_lift);
            take(&mut self.prod.downtime_avoidance_factor, p.downtime_avoidance_factor);
            take(&mut self.prod.downtime_drag_share, p.downtime_drag_share);
        }
    }
}
