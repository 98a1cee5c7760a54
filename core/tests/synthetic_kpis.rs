//! Synthetic KPI generator tests.
//!
//! Values are random, so assertions are structural (invariants that
//! hold for every record), reproducibility under a fixed seed, or
//! distributional (means within generous bounds).

use chrono::NaiveDate;
use clinic_core::config::KpiProfile;
use clinic_core::dataset::BillingDataset;
use clinic_core::kpi::generate;
use clinic_core::session::DashboardSession;

const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

fn providers() -> Vec<String> {
    vec!["Dr A".to_string(), "Dr B".to_string()]
}

#[test]
fn one_record_per_date_provider_pair() {
    let series = generate(date("2024-01-01"), 10, &providers(), &KpiProfile::default(), SEED)
        .expect("generation succeeds");

    assert_eq!(series.len(), 20);
    assert_eq!(series[0].date, date("2024-01-01"));
    assert_eq!(series[0].provider, "Dr A");
    assert_eq!(series[1].provider, "Dr B");
    assert_eq!(series[2].date, date("2024-01-02"));
    assert_eq!(series[19].date, date("2024-01-10"));
}

#[test]
fn every_record_upholds_the_count_and_aging_invariants() {
    let series = generate(date("2024-01-01"), 90, &providers(), &KpiProfile::default(), SEED)
        .expect("generation succeeds");

    for record in &series {
        assert_eq!(
            record.no_shows + record.completed,
            record.visits,
            "no_shows + completed must equal visits"
        );
        assert!(record.tms <= record.completed, "TMS is a completed subset");
        assert!(record.denials <= record.completed);
        assert!(record.billed >= 0.0, "billed rate is clamped at zero");

        let outstanding = record.billed - record.net_payment;
        let bucket_sum =
            record.ar_0_30 + record.ar_31_60 + record.ar_61_90 + record.ar_90_plus;
        assert!(
            (bucket_sum - outstanding).abs() < 0.01,
            "aging buckets sum to {bucket_sum}, outstanding is {outstanding}"
        );
        for bucket in [
            record.ar_0_30,
            record.ar_31_60,
            record.ar_61_90,
            record.ar_90_plus,
        ] {
            assert!(bucket >= 0.0, "aging bucket went negative: {bucket}");
        }

        if record.completed > 0 {
            let expected = record.net_payment / record.completed as f64;
            assert!((record.avg_rev_per_visit - expected).abs() < 1e-9);
        } else {
            assert_eq!(record.avg_rev_per_visit, 0.0);
        }
    }
}

#[test]
fn same_seed_reproduces_the_series() {
    let profile = KpiProfile::default();
    let a = generate(date("2024-01-01"), 30, &providers(), &profile, SEED).unwrap();
    let b = generate(date("2024-01-01"), 30, &providers(), &profile, SEED).unwrap();
    assert_eq!(a, b, "a fixed seed must reproduce identical values");
}

#[test]
fn different_seeds_diverge() {
    let profile = KpiProfile::default();
    let a = generate(date("2024-01-01"), 30, &providers(), &profile, 42).unwrap();
    let b = generate(date("2024-01-01"), 30, &providers(), &profile, 99).unwrap();
    assert_ne!(a, b, "the seed is not being used");
}

#[test]
fn visit_counts_match_the_configured_mean() {
    let series = generate(date("2024-01-01"), 365, &providers(), &KpiProfile::default(), SEED)
        .expect("generation succeeds");

    let n = series.len() as f64;
    let mean_visits = series.iter().map(|r| r.visits as f64).sum::<f64>() / n;
    assert!(
        (11.0..=13.0).contains(&mean_visits),
        "mean visits {mean_visits} strayed from Poisson mean 12"
    );

    let total_visits: u64 = series.iter().map(|r| r.visits).sum();
    let total_no_shows: u64 = series.iter().map(|r| r.no_shows).sum();
    let no_show_share = total_no_shows as f64 / total_visits as f64;
    assert!(
        (0.07..=0.13).contains(&no_show_share),
        "no-show share {no_show_share} strayed from 0.10"
    );
}

#[test]
fn zero_day_window_is_rejected() {
    let result = generate(date("2024-01-01"), 0, &providers(), &KpiProfile::default(), SEED);
    assert!(result.is_err(), "an empty window has nothing to generate");
}

#[test]
fn session_cache_returns_the_same_series() {
    let csv = "\
Date,Provider,CPT,Units,Billed Amount,Net Payment
2024-01-05,Dr A,90837,1,100,80
2024-01-06,Dr B,90834,2,240,190
";
    let dataset = BillingDataset::from_csv_reader(csv.as_bytes()).unwrap();
    let mut session = DashboardSession::new(dataset, SEED);

    let first = session.synthetic_kpis(date("2024-01-01"), 60).unwrap().to_vec();
    let second = session.synthetic_kpis(date("2024-01-01"), 60).unwrap().to_vec();
    assert_eq!(first, second, "repeated windows must not re-randomize");

    let report_a = session.operational_kpis(date("2024-01-01"), 60).unwrap();
    let report_b = session.operational_kpis(date("2024-01-01"), 60).unwrap();
    assert_eq!(report_a, report_b);
}

#[test]
fn operational_report_covers_the_window_months() {
    let csv = "\
Date,Provider,CPT,Units,Billed Amount,Net Payment
2024-01-05,Dr A,90837,1,100,80
";
    let dataset = BillingDataset::from_csv_reader(csv.as_bytes()).unwrap();
    let mut session = DashboardSession::new(dataset, SEED);

    let report = session.operational_kpis(date("2024-01-01"), 90).unwrap();

    // 90 days from Jan 1 span January through March.
    assert_eq!(report.aging.len(), 3);
    assert_eq!(report.month, "2024-03", "scalars describe the latest month");
    assert!(report.visits > 0, "a quarter of provider-days sees visits");
    assert!(report.tms_pct.is_some());
    assert!(report.no_show_rate.is_some());
    assert!(report.denial_rate.is_some());
}
