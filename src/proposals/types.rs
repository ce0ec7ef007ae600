//! Error and result types for proposal generation.

use thiserror::Error;

use crate::matrix_ops::LinalgError;

/// Errors returned while drawing or transforming proposals.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProposalError {
    #[error(transparent)]
    Linalg(#[from] LinalgError),
    #[error("alpha vector must have at least one component")]
    EmptyAlpha,
    #[error("alpha vector contains non-finite values")]
    NonFiniteAlpha,
    #[error("covariance and Cholesky factor must be {expected}x{expected}; found {rows}x{cols}")]
    CovarianceShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("psi buffer has length {found}; expected {expected}")]
    PsiLength { expected: usize, found: usize },
    #[error("psi must have at least two strictly positive entries summing to one")]
    InvalidPsi,
}

/// One normal-drift proposal in both parameterizations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormDriftDraw {
    /// Proposed isoform proportions, length `k`.
    pub psi: Vec<f64>,
    /// Proposed unconstrained state, length `k - 1`.
    pub alpha: Vec<f64>,
}

impl NormDriftDraw {
    /// Number of isoforms `k`.
    #[must_use]
    pub fn num_isoforms(&self) -> usize {
        self.psi.len()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.psi, self.alpha)
    }
}
