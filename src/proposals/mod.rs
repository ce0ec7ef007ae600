//! Normal-drift proposals for isoform proportions.
//!
//! The chain state is an unconstrained alpha vector of length `k - 1`. Each
//! proposal perturbs alpha with correlated Gaussian noise and maps the result
//! onto the `k`-isoform simplex through a [`PsiReparameterization`].
//! Accept/reject decisions belong to the caller.

pub mod engine;
pub mod reparam;
pub mod types;

pub use engine::{NormDriftProposal, propose_norm_drift_psi_alpha};
pub use reparam::{AdditiveLogRatio, PsiReparameterization, StickBreaking};
pub use types::{NormDriftDraw, ProposalError};
