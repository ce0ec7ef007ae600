//! Bijections between the open probability simplex and unconstrained space.
//!
//! A psi vector of `k` isoform proportions is represented during sampling by
//! an alpha vector of `k - 1` unconstrained reals. Random walks happen in
//! alpha space and every proposal is mapped back to a valid psi.

use crate::math_utils::{logit_inv_scalar, logit_scalar};

use super::types::ProposalError;

const SIMPLEX_SUM_TOLERANCE: f64 = 1.0e-8;

/// Mapping between psi (length `k`) and alpha (length `k - 1`).
pub trait PsiReparameterization {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Write the psi vector for `alpha` into `psi` (`alpha.len() + 1` entries).
    ///
    /// # Errors
    ///
    /// Returns `ProposalError` for empty or non-finite alpha, or a wrongly
    /// sized buffer.
    fn to_psi_into(&self, alpha: &[f64], psi: &mut [f64]) -> Result<(), ProposalError>;

    /// Inverse of [`PsiReparameterization::to_psi_into`].
    ///
    /// # Errors
    ///
    /// Returns `ProposalError::InvalidPsi` unless `psi` is an interior point
    /// of the simplex with at least two entries.
    fn to_alpha(&self, psi: &[f64]) -> Result<Vec<f64>, ProposalError>;

    /// # Errors
    ///
    /// See [`PsiReparameterization::to_psi_into`].
    fn to_psi(&self, alpha: &[f64]) -> Result<Vec<f64>, ProposalError> {
        let mut psi = vec![0.0; alpha.len() + 1];
        self.to_psi_into(alpha, &mut psi)?;
        Ok(psi)
    }
}

/// Additive log-ratio transform against the last isoform.
///
/// `psi_i = e^{alpha_i} / (1 + sum_j e^{alpha_j})` for `i < k - 1` and
/// `psi_{k-1} = 1 / (1 + sum_j e^{alpha_j})`. With two isoforms this is the
/// inverse logit of the single alpha and its complement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditiveLogRatio;

impl PsiReparameterization for AdditiveLogRatio {
    fn name(&self) -> &'static str {
        "additive-log-ratio"
    }

    fn to_psi_into(&self, alpha: &[f64], psi: &mut [f64]) -> Result<(), ProposalError> {
        check_alpha(alpha, psi)?;
        // shift by the largest exponent, counting the implicit zero for the last isoform
        let shift = alpha.iter().copied().fold(0.0_f64, f64::max);
        let (head, last) = psi.split_at_mut(alpha.len());
        let mut total = (-shift).exp();
        for (slot, value) in head.iter_mut().zip(alpha) {
            *slot = (value - shift).exp();
            total += *slot;
        }
        last[0] = (-shift).exp() / total;
        for slot in head {
            *slot /= total;
        }
        Ok(())
    }

    fn to_alpha(&self, psi: &[f64]) -> Result<Vec<f64>, ProposalError> {
        check_psi(psi)?;
        let reference = psi[psi.len() - 1];
        Ok(psi[..psi.len() - 1]
            .iter()
            .map(|value| (value / reference).ln())
            .collect())
    }
}

/// Logistic stick-breaking transform.
///
/// Isoform `i` takes the fraction `logit_inv(alpha_i)` of whatever mass the
/// earlier isoforms left; the last isoform takes the remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickBreaking;

impl PsiReparameterization for StickBreaking {
    fn name(&self) -> &'static str {
        "stick-breaking"
    }

    fn to_psi_into(&self, alpha: &[f64], psi: &mut [f64]) -> Result<(), ProposalError> {
        check_alpha(alpha, psi)?;
        let mut remaining = 1.0;
        for (slot, value) in psi.iter_mut().zip(alpha) {
            *slot = remaining * logit_inv_scalar(*value);
            remaining -= *slot;
        }
        psi[alpha.len()] = remaining;
        Ok(())
    }

    fn to_alpha(&self, psi: &[f64]) -> Result<Vec<f64>, ProposalError> {
        check_psi(psi)?;
        let mut remaining = 1.0;
        let mut alpha = Vec::with_capacity(psi.len() - 1);
        for value in &psi[..psi.len() - 1] {
            alpha.push(logit_scalar(value / remaining));
            remaining -= value;
        }
        Ok(alpha)
    }
}

fn check_alpha(alpha: &[f64], psi: &[f64]) -> Result<(), ProposalError> {
    if alpha.is_empty() {
        return Err(ProposalError::EmptyAlpha);
    }
    if psi.len() != alpha.len() + 1 {
        return Err(ProposalError::PsiLength {
            expected: alpha.len() + 1,
            found: psi.len(),
        });
    }
    if alpha.iter().any(|value| !value.is_finite()) {
        return Err(ProposalError::NonFiniteAlpha);
    }
    Ok(())
}

fn check_psi(psi: &[f64]) -> Result<(), ProposalError> {
    let interior = psi.len() >= 2 && psi.iter().all(|value| value.is_finite() && *value > 0.0);
    if !interior || (psi.iter().sum::<f64>() - 1.0).abs() > SIMPLEX_SUM_TOLERANCE {
        return Err(ProposalError::InvalidPsi);
    }
    Ok(())
}
