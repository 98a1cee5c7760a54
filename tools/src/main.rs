//! report-runner: headless report driver for the clinic dashboard core.
//!
//! Usage:
//!   report-runner --data billing.csv
//!   report-runner --data billing.csv --month 2024-02 --compare "Dr A,Dr B"
//!   report-runner --data billing.csv --seed 7 --kpi-days 90 --json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clinic_core::{
    aggregate::{AggregateRow, FilterParams, Metric, SortDirection},
    compare::{ExecutiveSummary, ProviderComparison},
    dataset::BillingDataset,
    session::{DashboardSession, KpiReport, MonthlyRevenuePoint},
};
use std::env;

#[derive(serde::Serialize)]
struct FullReport {
    executive_summary: ExecutiveSummary,
    provider_productivity: Vec<AggregateRow>,
    top_cpts: Vec<AggregateRow>,
    monthly_revenue: Vec<MonthlyRevenuePoint>,
    provider_comparison: Option<ProviderComparison>,
    operational_kpis: KpiReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data = str_arg(&args, "--data")
        .context("--data <csv> is required")?
        .to_string();
    let seed = parse_arg(&args, "--seed", 42u64);
    let kpi_days = parse_arg(&args, "--kpi-days", 365u32);
    let kpi_start = str_arg(&args, "--kpi-start").unwrap_or("2024-01-01");
    let kpi_start = NaiveDate::parse_from_str(kpi_start, "%Y-%m-%d")
        .with_context(|| format!("--kpi-start '{kpi_start}' is not a YYYY-MM-DD date"))?;
    let json = args.iter().any(|a| a == "--json");
    let ascending = args.iter().any(|a| a == "--ascending");
    let sort_metric = match str_arg(&args, "--sort").unwrap_or("units") {
        "billed" => Metric::BilledAmount,
        "net" => Metric::NetPayment,
        _ => Metric::Units,
    };
    let compare: Option<Vec<String>> = str_arg(&args, "--compare")
        .map(|raw| raw.split(',').map(|p| p.trim().to_string()).collect());

    let dataset = BillingDataset::from_csv_path(&data)
        .with_context(|| format!("failed to load {data}"))?;
    let months = dataset.months();
    let month = str_arg(&args, "--month")
        .map(str::to_string)
        .or_else(|| months.last().cloned())
        .context("dataset has no months")?;

    let mut session = DashboardSession::new(dataset, seed);
    log::info!("reporting on month {month} (session {})", session.session_id());

    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    let filter = FilterParams::covering(session.dataset());

    let report = FullReport {
        executive_summary: session.executive_summary(&month)?,
        provider_productivity: session.provider_productivity(&filter, sort_metric, direction),
        top_cpts: session.top_cpts(10),
        monthly_revenue: session.monthly_revenue(),
        provider_comparison: compare
            .as_deref()
            .and_then(|selection| session.compare_providers(selection)),
        operational_kpis: session.operational_kpis(kpi_start, kpi_days)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, sort_metric, compare.is_some());
    }
    Ok(())
}

fn print_report(report: &FullReport, sort_metric: Metric, compare_requested: bool) {
    let summary = &report.executive_summary;
    println!("Executive Summary ({})", summary.month);
    println!(
        "  units:       {:>10}  ({:+})",
        summary.units, summary.units_delta
    );
    println!(
        "  billed:      ${:>12.2}  ({:+.2})",
        summary.billed_amount, summary.billed_delta
    );
    println!(
        "  net payment: ${:>12.2}  ({:+.2})",
        summary.net_payment, summary.net_delta
    );

    println!("\nProvider Productivity (sorted by {})", sort_metric.label());
    for row in &report.provider_productivity {
        println!(
            "  {:<24} units {:>7}  billed ${:>12.2}  net ${:>12.2}",
            row.key, row.units, row.billed_amount, row.net_payment
        );
    }

    println!("\nTop CPT Codes by Units");
    for row in &report.top_cpts {
        println!(
            "  {:<10} units {:>7}  billed ${:>12.2}  net ${:>12.2}",
            row.key, row.units, row.billed_amount, row.net_payment
        );
    }

    println!("\nMonthly Revenue Trend");
    for point in &report.monthly_revenue {
        println!(
            "  {}  billed ${:>12.2}  net ${:>12.2}",
            point.month, point.billed_amount, point.net_payment
        );
    }

    println!("\nProvider Comparison");
    match &report.provider_comparison {
        Some(comparison) => {
            for row in &comparison.rows {
                println!(
                    "  {:<24} units {:>7}  billed ${:>12.2}  net ${:>12.2}",
                    row.key, row.units, row.billed_amount, row.net_payment
                );
            }
        }
        None if compare_requested => {
            println!("  select exactly two providers to compare");
        }
        None => println!("  (pass --compare \"Provider A,Provider B\")"),
    }

    let kpis = &report.operational_kpis;
    println!("\nOperational KPIs ({})", kpis.month);
    println!("  visits:       {}", kpis.visits);
    println!("  TMS %:        {}", fmt_pct(kpis.tms_pct));
    println!("  no-show rate: {}", fmt_rate(kpis.no_show_rate));
    println!("  denial rate:  {}", fmt_rate(kpis.denial_rate));
    println!("\n  A/R Aging by Month");
    for row in &kpis.aging {
        println!(
            "  {}  0-30 ${:>12.2}  31-60 ${:>11.2}  61-90 ${:>11.2}  90+ ${:>11.2}",
            row.month, row.ar_0_30, row.ar_31_60, row.ar_61_90, row.ar_90_plus
        );
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}%"))
}

fn fmt_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1}%", v * 100.0))
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    str_arg(args, flag)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
