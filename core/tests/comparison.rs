//! Comparative metrics tests — period-over-period deltas and the
//! exactly-two-provider precondition.

use clinic_core::dataset::BillingDataset;
use clinic_core::error::DashboardError;
use clinic_core::session::DashboardSession;

const TWO_MONTH_CSV: &str = "\
Date,Provider,CPT,Units,Billed Amount,Net Payment
2024-01-05,A,90837,1,100,80
2024-02-10,A,90837,2,200,150
";

fn session(csv: &str) -> DashboardSession {
    let dataset = BillingDataset::from_csv_reader(csv.as_bytes()).expect("test csv loads");
    DashboardSession::new(dataset, 42)
}

#[test]
fn selected_month_totals_and_deltas() {
    let session = session(TWO_MONTH_CSV);
    let summary = session.executive_summary("2024-02").unwrap();

    assert_eq!(summary.units, 2);
    assert_eq!(summary.billed_amount, 200.0);
    assert_eq!(summary.net_payment, 150.0);
    assert_eq!(summary.units_delta, 1);
    assert_eq!(summary.billed_delta, 100.0);
    assert_eq!(summary.net_delta, 70.0);
}

#[test]
fn earliest_month_baselines_to_zero() {
    let session = session(TWO_MONTH_CSV);
    let summary = session.executive_summary("2024-01").unwrap();

    assert_eq!(summary.units_delta, summary.units as i64);
    assert_eq!(summary.billed_delta, summary.billed_amount);
    assert_eq!(summary.net_delta, summary.net_payment);
}

#[test]
fn baseline_skips_missing_calendar_months() {
    // No February: March must compare against January, not an
    // empty adjacent month.
    let csv = "\
Date,Provider,CPT,Units,Billed Amount,Net Payment
2024-01-05,A,90837,4,400,320
2024-03-10,A,90837,6,600,450
";
    let summary = session(csv).executive_summary("2024-03").unwrap();

    assert_eq!(summary.units_delta, 2);
    assert_eq!(summary.billed_delta, 200.0);
    assert_eq!(summary.net_delta, 130.0);
}

#[test]
fn unknown_month_is_an_error() {
    let err = session(TWO_MONTH_CSV)
        .executive_summary("2024-07")
        .unwrap_err();
    assert!(
        matches!(err, DashboardError::UnknownMonth { .. }),
        "expected UnknownMonth, got {err}"
    );
}

const THREE_PROVIDER_CSV: &str = "\
Date,Provider,CPT,Units,Billed Amount,Net Payment
2024-01-05,A,90837,1,100,80
2024-01-06,B,90834,2,240,190
2024-01-07,C,90791,3,450,300
2024-02-08,A,90837,4,400,310
";

#[test]
fn comparison_requires_exactly_two_providers() {
    let session = session(THREE_PROVIDER_CSV);

    assert!(session.compare_providers(&[]).is_none());
    assert!(session.compare_providers(&["A".to_string()]).is_none());
    assert!(session
        .compare_providers(&["A".to_string(), "B".to_string(), "C".to_string()])
        .is_none());
}

#[test]
fn two_provider_comparison_is_side_by_side() {
    let session = session(THREE_PROVIDER_CSV);
    let comparison = session
        .compare_providers(&["B".to_string(), "A".to_string()])
        .expect("two providers selected");

    assert_eq!(comparison.rows.len(), 2);

    // Rows follow selection order.
    assert_eq!(comparison.rows[0].key, "B");
    assert_eq!(comparison.rows[0].units, 2);
    assert_eq!(comparison.rows[0].billed_amount, 240.0);

    assert_eq!(comparison.rows[1].key, "A");
    assert_eq!(comparison.rows[1].units, 5);
    assert_eq!(comparison.rows[1].billed_amount, 500.0);
    assert_eq!(comparison.rows[1].net_payment, 390.0);
}

#[test]
fn monthly_revenue_series_is_sorted_by_month() {
    let session = session(THREE_PROVIDER_CSV);
    let series = session.monthly_revenue();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].month, "2024-01");
    assert_eq!(series[0].billed_amount, 790.0);
    assert_eq!(series[0].net_payment, 570.0);
    assert_eq!(series[1].month, "2024-02");
    assert_eq!(series[1].billed_amount, 400.0);
}
