//! Synthetic operational KPI generation.
//!
//! The uploaded dataset carries billing only. Visit-level operations
//! (no-shows, TMS counts, denials, A/R aging) are fabricated per
//! (day, provider) pair from parametric distributions so the
//! operational views stay populated. Shape is deterministic — every
//! pair gets a record — and a fixed seed reproduces identical values.
//!
//! Invariants every record upholds:
//!   - no_shows + completed == visits
//!   - the four A/R buckets sum exactly to billed - net_payment

use crate::{
    config::KpiProfile,
    error::{DashboardError, DashboardResult},
    rng::KpiRng,
    types::ProviderId,
};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// One fabricated provider-day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticKpiRecord {
    pub date: NaiveDate,
    pub provider: ProviderId,
    pub visits: u64,
    pub no_shows: u64,
    pub completed: u64,
    pub tms: u64,
    pub billed: f64,
    pub net_payment: f64,
    pub denials: u64,
    pub ar_0_30: f64,
    pub ar_31_60: f64,
    pub ar_61_90: f64,
    pub ar_90_plus: f64,
    pub avg_rev_per_visit: f64,
}

/// Cache key for a generated series. The provider set is fixed per
/// session, so the window alone identifies a series.
pub type KpiWindow = (NaiveDate, u32);

/// Fabricate one record per (date, provider) pair: dates ascending
/// from `start_date`, providers in the order given.
pub fn generate(
    start_date: NaiveDate,
    num_days: u32,
    providers: &[ProviderId],
    profile: &KpiProfile,
    master_seed: u64,
) -> DashboardResult<Vec<SyntheticKpiRecord>> {
    profile.validate()?;
    if num_days == 0 {
        return Err(DashboardError::SyntheticParams {
            detail: "num_days must be at least 1".to_string(),
        });
    }

    // One stream per generation window: regenerating a window always
    // replays the same draws under the same master seed.
    let stream = (start_date.num_days_from_ce() as u64) ^ u64::from(num_days).rotate_left(32);
    let mut rng = KpiRng::new(master_seed, stream);

    let mut out = Vec::with_capacity(num_days as usize * providers.len());
    for offset in 0..num_days {
        let date = start_date
            .checked_add_days(Days::new(u64::from(offset)))
            .ok_or_else(|| DashboardError::SyntheticParams {
                detail: format!("window extends past supported dates: {start_date} + {offset}d"),
            })?;
        for provider in providers {
            out.push(generate_record(date, provider, profile, &mut rng)?);
        }
    }
    Ok(out)
}

fn generate_record(
    date: NaiveDate,
    provider: &str,
    profile: &KpiProfile,
    rng: &mut KpiRng,
) -> DashboardResult<SyntheticKpiRecord> {
    let visits = rng.poisson(profile.visits_mean)?;
    let no_shows = rng.binomial(visits, profile.no_show_probability)?;
    let completed = visits - no_shows;
    let tms = rng.binomial(completed, profile.tms_probability)?;

    // The rate draw is clamped at zero: a negative per-visit rate
    // would bill negative amounts, which the record model forbids.
    let rate = rng
        .normal(profile.rate_per_visit_mean, profile.rate_per_visit_std)?
        .max(0.0);
    let billed = round_cents(completed as f64 * rate);

    let collection_rate = rng.uniform(profile.collection_rate_min, profile.collection_rate_max);
    let net_payment = round_cents(billed * collection_rate);
    let denials = rng.binomial(completed, profile.denial_probability)?;

    let shares = rng.dirichlet(&profile.aging_alpha)?;
    let (ar_0_30, ar_31_60, ar_61_90, ar_90_plus) =
        split_outstanding(billed - net_payment, &shares);

    let avg_rev_per_visit = if completed > 0 {
        net_payment / completed as f64
    } else {
        0.0
    };

    Ok(SyntheticKpiRecord {
        date,
        provider: provider.to_string(),
        visits,
        no_shows,
        completed,
        tms,
        billed,
        net_payment,
        denials,
        ar_0_30,
        ar_31_60,
        ar_61_90,
        ar_90_plus,
        avg_rev_per_visit,
    })
}

/// Allocate the outstanding total across the four aging buckets.
///
/// Works in integer cents: the first three buckets floor their share,
/// the last takes the remainder. The buckets therefore sum exactly to
/// the outstanding total and are individually non-negative.
fn split_outstanding(outstanding: f64, shares: &[f64]) -> (f64, f64, f64, f64) {
    let total_cents = (outstanding * 100.0).round() as i64;
    let bucket = |share: f64| (total_cents as f64 * share).floor() as i64;

    let c0 = bucket(shares[0]);
    let c1 = bucket(shares[1]);
    let c2 = bucket(shares[2]);
    let c3 = total_cents - c0 - c1 - c2;

    (
        c0 as f64 / 100.0,
        c1 as f64 / 100.0,
        c2 as f64 / 100.0,
        c3 as f64 / 100.0,
    )
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
