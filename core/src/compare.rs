//! Comparative metrics — period-over-period deltas and two-provider
//! side-by-side totals.

use crate::{
    aggregate::{aggregate, AggregateRow, Dimension},
    dataset::BillingDataset,
    error::{DashboardError, DashboardResult},
    month::month_key,
    types::{MonthKey, ProviderId},
};
use serde::Serialize;

/// Selected-month totals with signed deltas against the baseline
/// month. The baseline is the latest month strictly earlier than the
/// selected one among months present in the data — not necessarily
/// calendar-adjacent. With no earlier month the baseline is zero, so
/// every delta equals the current total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub month: MonthKey,
    pub units: u64,
    pub billed_amount: f64,
    pub net_payment: f64,
    pub units_delta: i64,
    pub billed_delta: f64,
    pub net_delta: f64,
}

pub fn month_summary(dataset: &BillingDataset, month: &str) -> DashboardResult<ExecutiveSummary> {
    let months = dataset.months();
    if !months.iter().any(|m| m == month) {
        return Err(DashboardError::UnknownMonth {
            month: month.to_string(),
        });
    }

    let (units, billed_amount, net_payment) = month_totals(dataset, month);
    let (base_units, base_billed, base_net) = months
        .iter()
        .rev()
        .find(|m| m.as_str() < month)
        .map(|m| month_totals(dataset, m))
        .unwrap_or((0, 0.0, 0.0));

    Ok(ExecutiveSummary {
        month: month.to_string(),
        units,
        billed_amount,
        net_payment,
        units_delta: units as i64 - base_units as i64,
        billed_delta: billed_amount - base_billed,
        net_delta: net_payment - base_net,
    })
}

fn month_totals(dataset: &BillingDataset, month: &str) -> (u64, f64, f64) {
    dataset
        .records()
        .iter()
        .filter(|r| month_key(r.date) == month)
        .fold((0u64, 0.0f64, 0.0f64), |acc, r| {
            (
                acc.0 + r.units,
                acc.1 + r.billed_amount,
                acc.2 + r.net_payment,
            )
        })
}

/// Two providers side by side, rows in selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderComparison {
    pub rows: Vec<AggregateRow>,
}

/// Overall aggregate totals for exactly two providers.
///
/// Any other selection count returns `None`: the comparison is
/// pending until the operator picks exactly two. A selected provider
/// with no records gets a zero row, so the result always has two.
pub fn compare_providers(
    dataset: &BillingDataset,
    selection: &[ProviderId],
) -> Option<ProviderComparison> {
    if selection.len() != 2 {
        return None;
    }

    let mut aggregated = aggregate(
        dataset
            .records()
            .iter()
            .filter(|r| selection.contains(&r.provider)),
        Dimension::Provider,
    );

    let rows = selection
        .iter()
        .map(|provider| {
            aggregated
                .iter()
                .position(|row| &row.key == provider)
                .map(|i| aggregated.swap_remove(i))
                .unwrap_or_else(|| AggregateRow::zero(provider.clone()))
        })
        .collect();

    Some(ProviderComparison { rows })
}
