#![forbid(unsafe_code)]

//! # `psi_proposals`
//!
//! Proposal machinery for MCMC estimation of RNA isoform abundances.
//!
//! Isoform proportions (psi, on the simplex) are sampled through an
//! unconstrained reparameterization (alpha). Each step draws a correlated
//! Gaussian perturbation of alpha from a caller-supplied Cholesky factor and
//! maps it back to psi. The likelihood model and the accept/reject step live
//! with the caller.
//!
//! ```
//! use psi_proposals::{ProposalConfig, propose_norm_drift_psi_alpha};
//!
//! let config = ProposalConfig::default();
//! let (covar, chol) = config.covariance_with_factor(2).unwrap();
//! let mut rng = config.rng();
//! let (psi, alpha) = propose_norm_drift_psi_alpha(&[0.8, 0.99], &covar, &chol, &mut rng).unwrap();
//! assert_eq!(psi.len(), 3);
//! assert_eq!(alpha.len(), 2);
//! ```

pub mod inference;
pub mod math_utils;
pub mod matrix_ops;
pub mod proposals;
pub mod reference;
pub mod sampling;
pub mod utils;

pub use inference::{InferenceError, MultiChainOptions, ProposalConfig, chain_rngs};
pub use math_utils::{logit, logit_inv};
pub use matrix_ops::{
    LinalgError, mat_plus_mat, mat_times_col_vect, mat_times_mat, mat_trans,
};
pub use proposals::{
    AdditiveLogRatio, NormDriftDraw, NormDriftProposal, ProposalError, PsiReparameterization,
    StickBreaking, propose_norm_drift_psi_alpha,
};
pub use sampling::{
    cholesky_lower, diagonal_covariance, sample_multivar_normal, sample_standard_normal,
};
