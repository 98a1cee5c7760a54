//! Synthetic KPI generation profile.
//!
//! Carries every distribution parameter the generator samples from.
//! `Default` holds the dashboard's shipped constants; a host may load
//! an alternate profile from JSON and it is validated before any
//! sampling happens.

use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiProfile {
    /// Mean of the Poisson visit count per provider-day.
    pub visits_mean: f64,
    /// Per-visit no-show probability.
    pub no_show_probability: f64,
    /// Share of completed visits counted as TMS.
    pub tms_probability: f64,
    /// Normal mean of the billed rate per completed visit.
    pub rate_per_visit_mean: f64,
    /// Normal standard deviation of the billed rate.
    pub rate_per_visit_std: f64,
    /// Collection rate is uniform over [min, max).
    pub collection_rate_min: f64,
    pub collection_rate_max: f64,
    /// Per-completed-visit denial probability.
    pub denial_probability: f64,
    /// Dirichlet concentration for the four A/R aging buckets
    /// (0-30, 31-60, 61-90, 90+). The default front-loads most
    /// outstanding A/R into the 0-30 bucket.
    pub aging_alpha: [f64; 4],
}

impl Default for KpiProfile {
    fn default() -> Self {
        Self {
            visits_mean: 12.0,
            no_show_probability: 0.10,
            tms_probability: 0.25,
            rate_per_visit_mean: 200.0,
            rate_per_visit_std: 50.0,
            collection_rate_min: 0.70,
            collection_rate_max: 0.95,
            denial_probability: 0.10,
            aging_alpha: [2.0, 1.0, 0.5, 0.3],
        }
    }
}

impl KpiProfile {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> DashboardResult<Self> {
        let profile: KpiProfile =
            serde_json::from_str(raw).map_err(|e| DashboardError::SyntheticParams {
                detail: e.to_string(),
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject parameters the distributions cannot accept.
    pub fn validate(&self) -> DashboardResult<()> {
        let invalid = |detail: String| Err(DashboardError::SyntheticParams { detail });

        for (name, p) in [
            ("no_show_probability", self.no_show_probability),
            ("tms_probability", self.tms_probability),
            ("denial_probability", self.denial_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if self.visits_mean <= 0.0 {
            return invalid(format!("visits_mean must be positive, got {}", self.visits_mean));
        }
        if self.rate_per_visit_std < 0.0 {
            return invalid(format!(
                "rate_per_visit_std must be non-negative, got {}",
                self.rate_per_visit_std
            ));
        }
        if self.collection_rate_min >= self.collection_rate_max {
            return invalid(format!(
                "collection rate range is empty: [{}, {})",
                self.collection_rate_min, self.collection_rate_max
            ));
        }
        if self.aging_alpha.iter().any(|a| *a <= 0.0) {
            return invalid(format!(
                "aging_alpha entries must be positive, got {:?}",
                self.aging_alpha
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        KpiProfile::default().validate().expect("default profile");
    }

    #[test]
    fn profile_json_overrides_merge_onto_defaults() {
        let profile = KpiProfile::from_json_str(r#"{"visits_mean": 20.0}"#).unwrap();
        assert_eq!(profile.visits_mean, 20.0);
        assert_eq!(profile.no_show_probability, 0.10);
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let result = KpiProfile::from_json_str(r#"{"no_show_probability": 1.5}"#);
        assert!(result.is_err(), "probability above 1 must not validate");
    }

    #[test]
    fn empty_collection_range_is_rejected() {
        let result = KpiProfile::from_json_str(
            r#"{"collection_rate_min": 0.9, "collection_rate_max": 0.9}"#,
        );
        assert!(result.is_err(), "empty uniform range must not validate");
    }
}
