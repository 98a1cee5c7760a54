//! Deterministic random number generation for the synthetic KPI set.
//!
//! RULE: nothing in the core may call a platform RNG. All randomness
//! flows through KpiRng streams derived from the session's master
//! seed, so a fixed seed reproduces an identical synthetic series.
//!
//! Each generation window gets its own stream, seeded from
//! (master_seed XOR stream_index). Regenerating one window never
//! disturbs another window's draws.

use crate::error::{DashboardError, DashboardResult};
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Dirichlet, Distribution, Normal, Poisson};
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG stream.
pub struct KpiRng {
    inner: Pcg64Mcg,
}

impl KpiRng {
    /// Derive a stream from the master seed and a stable stream index.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Poisson-distributed count with the given mean.
    pub fn poisson(&mut self, mean: f64) -> DashboardResult<u64> {
        let dist = Poisson::new(mean).map_err(|e| DashboardError::SyntheticParams {
            detail: format!("poisson(mean={mean}): {e}"),
        })?;
        Ok(dist.sample(&mut self.inner) as u64)
    }

    /// Successes out of `n` trials, each with probability `p`.
    pub fn binomial(&mut self, n: u64, p: f64) -> DashboardResult<u64> {
        let dist = Binomial::new(n, p).map_err(|e| DashboardError::SyntheticParams {
            detail: format!("binomial(n={n}, p={p}): {e}"),
        })?;
        Ok(dist.sample(&mut self.inner))
    }

    /// Normal draw with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> DashboardResult<f64> {
        let dist = Normal::new(mean, std_dev).map_err(|e| DashboardError::SyntheticParams {
            detail: format!("normal(mean={mean}, std_dev={std_dev}): {e}"),
        })?;
        Ok(dist.sample(&mut self.inner))
    }

    /// Uniform draw in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.inner.gen_range(low..high)
    }

    /// Proportions over `alpha.len()` categories, summing to 1.0.
    pub fn dirichlet(&mut self, alpha: &[f64]) -> DashboardResult<Vec<f64>> {
        let dist = Dirichlet::new(alpha).map_err(|e| DashboardError::SyntheticParams {
            detail: format!("dirichlet(alpha={alpha:?}): {e}"),
        })?;
        Ok(dist.sample(&mut self.inner))
    }
}
