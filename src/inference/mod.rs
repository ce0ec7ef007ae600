//! Proposal configuration and per-chain random streams.

use faer::Mat;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::debug;

use crate::matrix_ops::LinalgError;
use crate::sampling::{cholesky_lower, diagonal_covariance};

/// Errors for proposal and multi-chain configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InferenceError {
    #[error("proposal sigma must be finite and positive")]
    InvalidSigma,
    #[error("multi-chain workflows require at least {min} chains; found {found}")]
    InvalidChainCount { min: usize, found: usize },
    #[error("multi-chain seed stride must be positive")]
    InvalidSeedStride,
}

/// Isotropic normal-drift settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposalConfig {
    /// Per-component standard deviation of the alpha random walk.
    pub sigma: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            sigma: 0.05,
            seed: 42,
        }
    }
}

impl ProposalConfig {
    /// # Errors
    ///
    /// Returns `InferenceError::InvalidSigma` unless `sigma` is finite and positive.
    pub fn validate(self) -> Result<(), InferenceError> {
        if self.sigma.is_finite() && self.sigma > 0.0 {
            Ok(())
        } else {
            Err(InferenceError::InvalidSigma)
        }
    }

    /// `sigma^2 * I` for an alpha vector of length `dim`.
    #[must_use]
    pub fn covariance(self, dim: usize) -> Mat<f64> {
        diagonal_covariance(dim, self.sigma)
    }

    /// Covariance and its lower Cholesky factor.
    ///
    /// # Errors
    ///
    /// Returns `LinalgError::NotPositiveDefinite` when `sigma` is zero or not finite.
    pub fn covariance_with_factor(self, dim: usize) -> Result<(Mat<f64>, Mat<f64>), LinalgError> {
        let covar = self.covariance(dim);
        let chol = cholesky_lower(&covar)?;
        Ok((covar, chol))
    }

    #[must_use]
    pub fn rng(self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

/// Independent-chain layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiChainOptions {
    pub chains: usize,
    /// Chain `i` is seeded with `seed + i * seed_stride`.
    pub seed_stride: u64,
}

impl Default for MultiChainOptions {
    fn default() -> Self {
        Self {
            chains: 4,
            seed_stride: 7,
        }
    }
}

impl MultiChainOptions {
    /// # Errors
    ///
    /// Returns `InferenceError` for zero chains or a zero seed stride.
    pub const fn validate(self) -> Result<(), InferenceError> {
        if self.chains == 0 {
            return Err(InferenceError::InvalidChainCount {
                min: 1,
                found: self.chains,
            });
        }
        if self.seed_stride == 0 {
            return Err(InferenceError::InvalidSeedStride);
        }
        Ok(())
    }
}

/// One seeded generator per chain; chain 0 reproduces the single-chain stream.
///
/// # Errors
///
/// Returns `InferenceError` if `options` is invalid.
pub fn chain_rngs(seed: u64, options: MultiChainOptions) -> Result<Vec<StdRng>, InferenceError> {
    options.validate()?;
    debug!(
        chains = options.chains,
        seed,
        seed_stride = options.seed_stride,
        "seeding chain streams"
    );
    Ok((0..options.chains)
        .map(|chain| {
            let offset = u64::try_from(chain)
                .unwrap_or(u64::MAX)
                .wrapping_mul(options.seed_stride);
            StdRng::seed_from_u64(seed.wrapping_add(offset))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngExt;

    #[test]
    fn config_validation_rejects_non_positive_sigma() {
        let config = ProposalConfig {
            sigma: 0.0,
            ..ProposalConfig::default()
        };
        assert_eq!(config.validate(), Err(InferenceError::InvalidSigma));
        let config = ProposalConfig {
            sigma: f64::NAN,
            ..ProposalConfig::default()
        };
        assert_eq!(config.validate(), Err(InferenceError::InvalidSigma));
        assert!(ProposalConfig::default().validate().is_ok());
    }

    #[test]
    fn covariance_factor_is_sigma_on_diagonal() {
        let (covar, chol) = ProposalConfig::default()
            .covariance_with_factor(3)
            .expect("positive sigma");
        assert_eq!(covar.nrows(), 3);
        assert!((chol[(2, 2)] - 0.05).abs() < 1.0e-15);
        assert!(chol[(1, 0)].abs() < f64::EPSILON);
    }

    #[test]
    fn multi_chain_validation() {
        let zero = MultiChainOptions {
            chains: 0,
            ..MultiChainOptions::default()
        };
        assert_eq!(
            zero.validate(),
            Err(InferenceError::InvalidChainCount { min: 1, found: 0 })
        );
        let no_stride = MultiChainOptions {
            seed_stride: 0,
            ..MultiChainOptions::default()
        };
        assert!(chain_rngs(1, no_stride).is_err());
    }

    #[test]
    fn first_chain_matches_single_chain_seed() {
        let config = ProposalConfig::default();
        let mut single = config.rng();
        let mut chains =
            chain_rngs(config.seed, MultiChainOptions::default()).expect("valid options");
        assert_eq!(chains.len(), 4);
        let a: f64 = single.random();
        let b: f64 = chains[0].random();
        let c: f64 = chains[1].random();
        assert_eq!(a.to_bits(), b.to_bits());
        assert_ne!(a.to_bits(), c.to_bits());
    }
}
