//! The dashboard session — the explicit context object every report
//! call goes through.
//!
//! RULES:
//!   - One session per operator. Hosts must never share a session or
//!     its cache across users.
//!   - Reports recompute from the in-memory dataset on every call;
//!     the only retained state is the keyed synthetic KPI cache.
//!   - All randomness flows from the session's master seed.

use crate::{
    aggregate::{
        aggregate, sort_rows, top_n_by, AggregateRow, Dimension, FilterParams, Metric,
        SortDirection,
    },
    compare::{self, ExecutiveSummary, ProviderComparison},
    config::KpiProfile,
    dataset::BillingDataset,
    error::{DashboardError, DashboardResult},
    kpi::{generate, KpiWindow, SyntheticKpiRecord},
    rates::{monthly_rollup, ArAgingRow},
    types::{MonthKey, ProviderId},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use uuid::Uuid;

/// One month of the billed / net payment trend. Feeds both the line
/// chart and the stacked bar presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenuePoint {
    pub month: MonthKey,
    pub billed_amount: f64,
    pub net_payment: f64,
}

/// Latest-month operational scalars plus the full aging series.
/// Undefined rates surface as `None`; the presentation layer renders
/// those as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub month: MonthKey,
    pub visits: u64,
    pub tms_pct: Option<f64>,
    pub no_show_rate: Option<f64>,
    pub denial_rate: Option<f64>,
    pub aging: Vec<ArAgingRow>,
}

pub struct DashboardSession {
    session_id: Uuid,
    dataset: BillingDataset,
    profile: KpiProfile,
    master_seed: u64,
    kpi_cache: HashMap<KpiWindow, Vec<SyntheticKpiRecord>>,
}

impl DashboardSession {
    pub fn new(dataset: BillingDataset, master_seed: u64) -> Self {
        Self::with_profile(dataset, master_seed, KpiProfile::default())
    }

    pub fn with_profile(dataset: BillingDataset, master_seed: u64, profile: KpiProfile) -> Self {
        let session_id = Uuid::new_v4();
        log::info!(
            "session {session_id}: opened with {} rows, seed {master_seed}",
            dataset.len()
        );
        Self {
            session_id,
            dataset,
            profile,
            master_seed,
            kpi_cache: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn dataset(&self) -> &BillingDataset {
        &self.dataset
    }

    /// Swap in a fresh dataset. Cached synthetic series are dropped:
    /// they were seeded by the old provider set.
    pub fn replace_dataset(&mut self, dataset: BillingDataset) {
        log::info!(
            "session {}: dataset replaced ({} rows)",
            self.session_id,
            dataset.len()
        );
        self.dataset = dataset;
        self.kpi_cache.clear();
    }

    pub fn clear_kpi_cache(&mut self) {
        self.kpi_cache.clear();
    }

    /// Selected-month totals with deltas against the preceding month
    /// that has data.
    pub fn executive_summary(&self, month: &str) -> DashboardResult<ExecutiveSummary> {
        compare::month_summary(&self.dataset, month)
    }

    /// Per-provider totals over the filtered records, sorted by the
    /// operator's chosen metric and direction.
    pub fn provider_productivity(
        &self,
        params: &FilterParams,
        metric: Metric,
        direction: SortDirection,
    ) -> Vec<AggregateRow> {
        let mut rows = aggregate(
            self.dataset.records().iter().filter(|r| params.matches(r)),
            Dimension::Provider,
        );
        if rows.is_empty() {
            log::warn!("session {}: filter matched no records", self.session_id);
        }
        sort_rows(&mut rows, metric, direction);
        rows
    }

    /// Whole-dataset CPT totals, top `n` by units.
    pub fn top_cpts(&self, n: usize) -> Vec<AggregateRow> {
        let rows = aggregate(self.dataset.records().iter(), Dimension::Cpt);
        top_n_by(rows, Metric::Units, n)
    }

    /// Month-keyed billed / net payment series, ascending by month.
    pub fn monthly_revenue(&self) -> Vec<MonthlyRevenuePoint> {
        let mut rows = aggregate(self.dataset.records().iter(), Dimension::Month);
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows.into_iter()
            .map(|row| MonthlyRevenuePoint {
                month: row.key,
                billed_amount: row.billed_amount,
                net_payment: row.net_payment,
            })
            .collect()
    }

    /// Side-by-side totals for exactly two providers; `None` until
    /// the selection has exactly two.
    pub fn compare_providers(&self, selection: &[ProviderId]) -> Option<ProviderComparison> {
        compare::compare_providers(&self.dataset, selection)
    }

    /// The synthetic series for a window — generated on first use,
    /// cached after. Repeated calls with the same window return the
    /// same records without re-randomizing.
    pub fn synthetic_kpis(
        &mut self,
        start_date: NaiveDate,
        num_days: u32,
    ) -> DashboardResult<&[SyntheticKpiRecord]> {
        match self.kpi_cache.entry((start_date, num_days)) {
            Entry::Occupied(hit) => Ok(hit.into_mut()),
            Entry::Vacant(slot) => {
                let providers = self.dataset.providers();
                let series = generate(
                    start_date,
                    num_days,
                    &providers,
                    &self.profile,
                    self.master_seed,
                )?;
                log::info!(
                    "session {}: generated {} synthetic KPI rows ({start_date} x {num_days} days)",
                    self.session_id,
                    series.len()
                );
                Ok(slot.insert(series))
            }
        }
    }

    /// Latest-month operational scalars plus the aging-by-month
    /// series for the stacked chart.
    pub fn operational_kpis(
        &mut self,
        start_date: NaiveDate,
        num_days: u32,
    ) -> DashboardResult<KpiReport> {
        let records = self.synthetic_kpis(start_date, num_days)?;
        let rollups = monthly_rollup(records);
        let aging = rollups.iter().map(ArAgingRow::from_rollup).collect();

        let latest = rollups
            .last()
            .ok_or_else(|| DashboardError::SyntheticParams {
                detail: "generation window produced no months".to_string(),
            })?;

        Ok(KpiReport {
            month: latest.month.clone(),
            visits: latest.visits,
            tms_pct: latest.tms_rate().ok().map(|rate| rate * 100.0),
            no_show_rate: latest.no_show_rate().ok(),
            denial_rate: latest.denial_rate().ok(),
            aging,
        })
    }
}
