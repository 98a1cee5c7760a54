//! Grouping and reduction over billing records.
//!
//! Result rows come out in first-encounter order of the grouping key.
//! That order is the documented tie-break: every sort in this module
//! is stable, so rows with equal metric values keep it.

use crate::{
    dataset::{BillingDataset, BillingRecord},
    month::month_key,
    types::ProviderId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Grouping key for an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Provider,
    Cpt,
    Month,
}

/// Summed column a caller may sort or rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Units,
    BilledAmount,
    NetPayment,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Units => "Units",
            Self::BilledAmount => "Billed Amount",
            Self::NetPayment => "Net Payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One output row of a grouping pass: the dimension value plus summed
/// numeric columns. Ephemeral — recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub units: u64,
    pub billed_amount: f64,
    pub net_payment: f64,
}

impl AggregateRow {
    pub fn zero(key: String) -> Self {
        Self {
            key,
            units: 0,
            billed_amount: 0.0,
            net_payment: 0.0,
        }
    }
}

/// Date-range and provider restriction applied before grouping.
/// An empty provider selection or an empty range yields zero rows
/// downstream — that is a valid state, not an error.
#[derive(Debug, Clone)]
pub struct FilterParams {
    pub providers: Vec<ProviderId>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl FilterParams {
    /// The dashboard's default selection: every provider, full range.
    pub fn covering(dataset: &BillingDataset) -> Self {
        let (from, to) = dataset.date_range();
        Self {
            providers: dataset.providers(),
            from,
            to,
        }
    }

    /// Both range ends are inclusive.
    pub fn matches(&self, record: &BillingRecord) -> bool {
        record.date >= self.from
            && record.date <= self.to
            && self.providers.iter().any(|p| *p == record.provider)
    }
}

/// Group records by a dimension and sum the numeric columns.
pub fn aggregate<'a, I>(records: I, dimension: Dimension) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a BillingRecord>,
{
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (u64, f64, f64)> = HashMap::new();

    for record in records {
        let key = match dimension {
            Dimension::Provider => record.provider.clone(),
            Dimension::Cpt => record.cpt.clone(),
            Dimension::Month => month_key(record.date),
        };
        let entry = sums.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0, 0.0, 0.0)
        });
        entry.0 += record.units;
        entry.1 += record.billed_amount;
        entry.2 += record.net_payment;
    }

    order
        .into_iter()
        .map(|key| {
            let (units, billed_amount, net_payment) =
                sums.remove(&key).unwrap_or((0, 0.0, 0.0));
            AggregateRow {
                key,
                units,
                billed_amount,
                net_payment,
            }
        })
        .collect()
}

/// Stable sort by one metric; equal values keep first-encounter order.
pub fn sort_rows(rows: &mut [AggregateRow], metric: Metric, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match metric {
            Metric::Units => a.units.cmp(&b.units),
            Metric::BilledAmount => a.billed_amount.total_cmp(&b.billed_amount),
            Metric::NetPayment => a.net_payment.total_cmp(&b.net_payment),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Top `n` rows by a metric, descending. Ties resolve to the row whose
/// key was encountered first in the input.
pub fn top_n_by(mut rows: Vec<AggregateRow>, metric: Metric, n: usize) -> Vec<AggregateRow> {
    sort_rows(&mut rows, metric, SortDirection::Descending);
    rows.truncate(n);
    rows
}
