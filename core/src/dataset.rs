//! Dataset loading and schema validation.
//!
//! RULE: either the whole file loads or nothing does. A missing
//! required column, an unparseable date, or an unparseable number
//! rejects the upload with a single message. No partial datasets.

use crate::{
    error::{DashboardError, DashboardResult},
    month::month_key,
    types::{CptCode, MonthKey, ProviderId},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Header names the upload must carry, exactly as written
/// (case-sensitive).
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Units",
    "Billed Amount",
    "Net Payment",
    "Date",
    "Provider",
    "CPT",
];

const COL_UNITS: usize = 0;
const COL_BILLED: usize = 1;
const COL_NET: usize = 2;
const COL_DATE: usize = 3;
const COL_PROVIDER: usize = 4;
const COL_CPT: usize = 5;

/// One billing transaction as uploaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRecord {
    pub date: NaiveDate,
    pub provider: ProviderId,
    pub cpt: CptCode,
    pub units: u64,
    pub billed_amount: f64,
    pub net_payment: f64,
}

/// The validated in-memory dataset. Immutable once loaded; every
/// report recomputes from `records()`.
#[derive(Debug, Clone)]
pub struct BillingDataset {
    records: Vec<BillingRecord>,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl BillingDataset {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Parse and validate a record-oriented CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> DashboardResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        // Header check first: collect ALL missing columns so the
        // operator sees the complete list in one message.
        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing: Vec<String> = Vec::new();
        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            match headers.iter().position(|h| h == *name) {
                Some(index) => indices[slot] = index,
                None => missing.push((*name).to_string()),
            }
        }
        if !missing.is_empty() {
            missing.sort();
            return Err(DashboardError::MissingColumns { columns: missing });
        }

        let mut records = Vec::new();
        for (i, result) in csv_reader.records().enumerate() {
            let row = i + 1; // 1-based data row, header excluded
            let record = result?;
            let field = |slot: usize| record.get(indices[slot]).unwrap_or("").trim();

            let date = parse_date(field(COL_DATE), row)?;
            let units = parse_count(field(COL_UNITS), "Units", row)?;
            let billed_amount = parse_money(field(COL_BILLED), "Billed Amount", row)?;
            let net_payment = parse_money(field(COL_NET), "Net Payment", row)?;

            records.push(BillingRecord {
                date,
                provider: field(COL_PROVIDER).to_string(),
                // CPT stays a string so downstream treatment is
                // categorical, never a numeric axis.
                cpt: field(COL_CPT).to_string(),
                units,
                billed_amount,
                net_payment,
            });
        }

        Self::from_records(records)
    }

    /// Wrap pre-parsed records. Rejects an empty set: every report
    /// assumes at least one month and one provider exist.
    pub fn from_records(records: Vec<BillingRecord>) -> DashboardResult<Self> {
        let mut dates = records.iter().map(|r| r.date);
        let Some(first) = dates.next() else {
            return Err(DashboardError::EmptyDataset);
        };
        let (first_date, last_date) = dates.fold((first, first), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

        log::info!("loaded {} billing rows", records.len());

        Ok(Self {
            records,
            first_date,
            last_date,
        })
    }

    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct month keys present in the data, sorted ascending.
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> =
            self.records.iter().map(|r| month_key(r.date)).collect();
        months.sort();
        months.dedup();
        months
    }

    /// Distinct providers in first-encounter order.
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = Vec::new();
        for record in &self.records {
            if !providers.contains(&record.provider) {
                providers.push(record.provider.clone());
            }
        }
        providers
    }

    /// Earliest and latest record dates — the default filter range.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_date, self.last_date)
    }
}

fn parse_date(raw: &str, row: usize) -> DashboardResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|_| DashboardError::DateParse {
            row,
            value: raw.to_string(),
        })
}

fn parse_count(raw: &str, column: &'static str, row: usize) -> DashboardResult<u64> {
    raw.parse::<u64>().map_err(|_| DashboardError::NumberParse {
        row,
        column,
        value: raw.to_string(),
    })
}

fn parse_money(raw: &str, column: &'static str, row: usize) -> DashboardResult<f64> {
    raw.parse::<f64>().map_err(|_| DashboardError::NumberParse {
        row,
        column,
        value: raw.to_string(),
    })
}
