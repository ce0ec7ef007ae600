//! Normal-drift proposals over alpha with psi mapped back onto the simplex.

use faer::Mat;
use rand::Rng;
use tracing::{debug, trace};

use crate::matrix_ops::{LinalgError, shape};
use crate::sampling::sample_multivar_normal_into;
use crate::utils::usize_to_f64;

use super::reparam::{AdditiveLogRatio, PsiReparameterization};
use super::types::{NormDriftDraw, ProposalError};

/// Symmetric Gaussian random-walk proposal in alpha space.
///
/// Holds the psi/alpha transform and scratch buffers for the noise and the
/// candidate pair, so repeated calls on one chain do not allocate beyond the
/// returned draw (or not at all through [`NormDriftProposal::propose_into`]).
#[derive(Debug, Clone)]
pub struct NormDriftProposal<P = AdditiveLogRatio> {
    reparam: P,
    noise: Vec<f64>,
    alpha: Vec<f64>,
    psi: Vec<f64>,
}

impl Default for NormDriftProposal<AdditiveLogRatio> {
    fn default() -> Self {
        Self::new(AdditiveLogRatio)
    }
}

impl<P: PsiReparameterization> NormDriftProposal<P> {
    #[must_use]
    pub fn new(reparam: P) -> Self {
        debug!(reparameterization = reparam.name(), "normal-drift proposal ready");
        Self {
            reparam,
            noise: Vec::new(),
            alpha: Vec::new(),
            psi: Vec::new(),
        }
    }

    #[must_use]
    pub const fn reparameterization(&self) -> &P {
        &self.reparam
    }

    /// Draw `alpha' ~ N(current_alpha, L L^T)` and map it to psi.
    ///
    /// `covar` must be the covariance that `chol` factors; only its shape is
    /// checked, the draw is driven by `chol`.
    ///
    /// # Errors
    ///
    /// Returns `ProposalError` if `current_alpha` is empty or if `covar` or
    /// `chol` is not `(k - 1) x (k - 1)`.
    pub fn propose<R: Rng + ?Sized>(
        &mut self,
        current_alpha: &[f64],
        covar: &Mat<f64>,
        chol: &Mat<f64>,
        rng: &mut R,
    ) -> Result<NormDriftDraw, ProposalError> {
        let mut draw = NormDriftDraw::default();
        self.propose_into(current_alpha, covar, chol, rng, &mut draw)?;
        Ok(draw)
    }

    /// Like [`NormDriftProposal::propose`], reusing the buffers in `draw`.
    ///
    /// `draw` is only written once both halves of the pair are ready; on error
    /// it keeps the previous proposal.
    ///
    /// # Errors
    ///
    /// See [`NormDriftProposal::propose`]. Also returns
    /// `ProposalError::NonFiniteAlpha` if the drawn alpha overflows.
    pub fn propose_into<R: Rng + ?Sized>(
        &mut self,
        current_alpha: &[f64],
        covar: &Mat<f64>,
        chol: &Mat<f64>,
        rng: &mut R,
        draw: &mut NormDriftDraw,
    ) -> Result<(), ProposalError> {
        let dim = current_alpha.len();
        if dim == 0 {
            return Err(ProposalError::EmptyAlpha);
        }
        check_square(covar, dim)?;
        check_square(chol, dim)?;

        self.noise.resize(dim, 0.0);
        self.alpha.resize(dim, 0.0);
        self.psi.resize(dim + 1, 0.0);

        sample_multivar_normal_into(current_alpha, chol, rng, &mut self.noise, &mut self.alpha)?;
        self.reparam.to_psi_into(&self.alpha, &mut self.psi)?;
        draw.alpha.clone_from(&self.alpha);
        draw.psi.clone_from(&self.psi);
        trace!(alpha = ?draw.alpha, psi = ?draw.psi, "proposed");
        Ok(())
    }

    /// Log density of proposing `to` from `from` under the factor `chol`.
    ///
    /// The walk is symmetric, so this equals the density of the reverse move
    /// and cancels out of a Metropolis-Hastings ratio.
    ///
    /// # Errors
    ///
    /// Returns `ProposalError` on mismatched lengths or if `chol` has a
    /// non-positive diagonal entry.
    pub fn log_density(
        &self,
        from: &[f64],
        to: &[f64],
        chol: &Mat<f64>,
    ) -> Result<f64, ProposalError> {
        let dim = from.len();
        if dim == 0 {
            return Err(ProposalError::EmptyAlpha);
        }
        check_square(chol, dim)?;
        if to.len() != dim {
            return Err(LinalgError::DimensionMismatch {
                op: "log_density",
                left: (dim, 1),
                right: (to.len(), 1),
            }
            .into());
        }

        // forward substitution: chol * y = to - from
        let mut solved = vec![0.0; dim];
        let mut log_det = 0.0;
        for row in 0..dim {
            let pivot = chol[(row, row)];
            if pivot <= 0.0 || !pivot.is_finite() {
                return Err(LinalgError::NotPositiveDefinite { pivot: row }.into());
            }
            let mut residual = to[row] - from[row];
            for col in 0..row {
                residual -= chol[(row, col)] * solved[col];
            }
            solved[row] = residual / pivot;
            log_det += pivot.ln();
        }
        let quadratic = solved.iter().map(|value| value * value).sum::<f64>();
        Ok(-0.5 * usize_to_f64(dim).mul_add(std::f64::consts::TAU.ln(), quadratic) - log_det)
    }
}

/// Draw a new `(psi, alpha)` pair by normal drift from `current_alpha`.
///
/// Uses the additive log-ratio transform. The returned psi has
/// `current_alpha.len() + 1` non-negative entries summing to one; accepting
/// or rejecting it is up to the caller.
///
/// # Errors
///
/// Returns `ProposalError` if the alpha vector is empty or the covariance
/// and Cholesky factor are not `(k - 1) x (k - 1)`.
pub fn propose_norm_drift_psi_alpha<R: Rng + ?Sized>(
    current_alpha: &[f64],
    covar: &Mat<f64>,
    chol: &Mat<f64>,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>), ProposalError> {
    let mut proposal = NormDriftProposal {
        reparam: AdditiveLogRatio,
        noise: Vec::with_capacity(current_alpha.len()),
        alpha: Vec::with_capacity(current_alpha.len()),
        psi: Vec::with_capacity(current_alpha.len() + 1),
    };
    proposal
        .propose(current_alpha, covar, chol, rng)
        .map(NormDriftDraw::into_parts)
}

fn check_square(matrix: &Mat<f64>, dim: usize) -> Result<(), ProposalError> {
    if shape(matrix) == (dim, dim) {
        Ok(())
    } else {
        Err(ProposalError::CovarianceShape {
            expected: dim,
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        })
    }
}
