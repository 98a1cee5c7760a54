//! Monthly rollups and derived rates over the synthetic KPI set.
//!
//! Rates guard their denominator: a month with zero visits yields
//! `DashboardError::RateUndefined`, never a NaN that leaks into
//! display.

use crate::{
    error::{DashboardError, DashboardResult},
    kpi::SyntheticKpiRecord,
    month::month_key,
    types::MonthKey,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-month sums of the synthetic KPI columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiMonthlyRollup {
    pub month: MonthKey,
    pub visits: u64,
    pub no_shows: u64,
    pub tms: u64,
    pub denials: u64,
    pub billed: f64,
    pub net_payment: f64,
    pub ar_0_30: f64,
    pub ar_31_60: f64,
    pub ar_61_90: f64,
    pub ar_90_plus: f64,
}

impl KpiMonthlyRollup {
    pub fn zero(month: MonthKey) -> Self {
        Self {
            month,
            visits: 0,
            no_shows: 0,
            tms: 0,
            denials: 0,
            billed: 0.0,
            net_payment: 0.0,
            ar_0_30: 0.0,
            ar_31_60: 0.0,
            ar_61_90: 0.0,
            ar_90_plus: 0.0,
        }
    }

    pub fn no_show_rate(&self) -> DashboardResult<f64> {
        self.per_visit(self.no_shows, "no-show rate")
    }

    pub fn denial_rate(&self) -> DashboardResult<f64> {
        self.per_visit(self.denials, "denial rate")
    }

    pub fn tms_rate(&self) -> DashboardResult<f64> {
        self.per_visit(self.tms, "TMS rate")
    }

    /// Net payment per completed visit for the month.
    pub fn avg_revenue_per_visit(&self) -> DashboardResult<f64> {
        let completed = self.visits - self.no_shows;
        if completed == 0 {
            return Err(DashboardError::RateUndefined {
                metric: "revenue per visit",
            });
        }
        Ok(self.net_payment / completed as f64)
    }

    fn per_visit(&self, numerator: u64, metric: &'static str) -> DashboardResult<f64> {
        if self.visits == 0 {
            return Err(DashboardError::RateUndefined { metric });
        }
        Ok(numerator as f64 / self.visits as f64)
    }
}

/// Group synthetic records by month key and sum every column.
/// Output is sorted by month, ascending.
pub fn monthly_rollup(records: &[SyntheticKpiRecord]) -> Vec<KpiMonthlyRollup> {
    let mut months: BTreeMap<MonthKey, KpiMonthlyRollup> = BTreeMap::new();

    for record in records {
        let key = month_key(record.date);
        let entry = months
            .entry(key.clone())
            .or_insert_with(|| KpiMonthlyRollup::zero(key));
        entry.visits += record.visits;
        entry.no_shows += record.no_shows;
        entry.tms += record.tms;
        entry.denials += record.denials;
        entry.billed += record.billed;
        entry.net_payment += record.net_payment;
        entry.ar_0_30 += record.ar_0_30;
        entry.ar_31_60 += record.ar_31_60;
        entry.ar_61_90 += record.ar_61_90;
        entry.ar_90_plus += record.ar_90_plus;
    }

    months.into_values().collect()
}

/// One month of the stacked A/R-aging series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArAgingRow {
    pub month: MonthKey,
    pub ar_0_30: f64,
    pub ar_31_60: f64,
    pub ar_61_90: f64,
    pub ar_90_plus: f64,
}

impl ArAgingRow {
    pub fn from_rollup(rollup: &KpiMonthlyRollup) -> Self {
        Self {
            month: rollup.month.clone(),
            ar_0_30: rollup.ar_0_30,
            ar_31_60: rollup.ar_31_60,
            ar_61_90: rollup.ar_61_90,
            ar_90_plus: rollup.ar_90_plus,
        }
    }
}
