//! clinic-core — analytics engine behind the clinic billing dashboard.
//!
//! The core consumes a tabular billing dataset plus operator-selected
//! filter parameters and produces derived tables and series: monthly
//! summaries with deltas, per-provider and per-CPT aggregates, revenue
//! trends, side-by-side provider comparisons, and a synthetic
//! operational KPI set. It renders nothing — a UI layer (or the
//! `report-runner` binary in `tools/`) drives it and owns presentation.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod kpi;
pub mod month;
pub mod rates;
pub mod rng;
pub mod session;
pub mod types;
