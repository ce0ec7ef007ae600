//! # Sampling
//!
//! Standard-normal and multivariate-normal draws plus the Cholesky
//! factorization used to build their covariance factor.
//!
//! The generator is always passed in by the caller; nothing here owns
//! random state, so independent chains only need independent generators.

use faer::Mat;
use rand::{Rng, RngExt};
use tracing::warn;

use crate::matrix_ops::{LinalgError, mat_times_col_vect_into, shape};

/// Box–Muller standard-normal draw.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = (1.0_f64 - rng.random::<f64>()).max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    (-2.0_f64 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Draw from `N(mu, L * L^T)` as `mu + L * z` with `z` standard normal.
///
/// # Errors
///
/// Returns `LinalgError::NotSquare` if `chol` is not square, or
/// `LinalgError::DimensionMismatch` if `mu.len()` differs from its order.
pub fn sample_multivar_normal<R: Rng + ?Sized>(
    mu: &[f64],
    chol: &Mat<f64>,
    rng: &mut R,
) -> Result<Vec<f64>, LinalgError> {
    let mut noise = vec![0.0; mu.len()];
    let mut out = vec![0.0; mu.len()];
    sample_multivar_normal_into(mu, chol, rng, &mut noise, &mut out)?;
    Ok(out)
}

/// Buffer-reusing form of [`sample_multivar_normal`].
///
/// `noise` receives the standard-normal vector `z`; `out` receives the draw.
/// Both must have length `mu.len()`.
///
/// # Errors
///
/// Same as [`sample_multivar_normal`], plus `LinalgError::BufferShape` for
/// wrongly sized buffers.
pub fn sample_multivar_normal_into<R: Rng + ?Sized>(
    mu: &[f64],
    chol: &Mat<f64>,
    rng: &mut R,
    noise: &mut [f64],
    out: &mut [f64],
) -> Result<(), LinalgError> {
    if chol.nrows() != chol.ncols() {
        return Err(LinalgError::NotSquare {
            rows: chol.nrows(),
            cols: chol.ncols(),
        });
    }
    if mu.len() != chol.nrows() {
        return Err(LinalgError::DimensionMismatch {
            op: "sample_multivar_normal",
            left: shape(chol),
            right: (mu.len(), 1),
        });
    }
    if noise.len() != mu.len() {
        return Err(LinalgError::BufferShape {
            expected: (mu.len(), 1),
            found: (noise.len(), 1),
        });
    }
    for slot in noise.iter_mut() {
        *slot = sample_standard_normal(rng);
    }
    mat_times_col_vect_into(chol, noise, out)?;
    for (slot, mean) in out.iter_mut().zip(mu) {
        *slot += mean;
    }
    Ok(())
}

/// Lower-triangular `L` with `L * L^T == matrix`.
///
/// # Errors
///
/// Returns `LinalgError::NotSquare` for non-square input and
/// `LinalgError::NotPositiveDefinite` when a pivot is not strictly positive.
pub fn cholesky_lower(matrix: &Mat<f64>) -> Result<Mat<f64>, LinalgError> {
    let dim = matrix.ncols();
    if matrix.nrows() != dim {
        return Err(LinalgError::NotSquare {
            rows: matrix.nrows(),
            cols: dim,
        });
    }
    let mut lower = Mat::<f64>::zeros(dim, dim);
    for row in 0..dim {
        for col in 0..=row {
            let mut sum = matrix[(row, col)];
            for k in 0..col {
                sum -= lower[(row, k)] * lower[(col, k)];
            }
            if row == col {
                if sum <= 0.0 || !sum.is_finite() {
                    warn!(pivot = row, value = sum, "covariance is not positive definite");
                    return Err(LinalgError::NotPositiveDefinite { pivot: row });
                }
                lower[(row, col)] = sum.sqrt();
            } else {
                lower[(row, col)] = sum / lower[(col, col)];
            }
        }
    }
    Ok(lower)
}

/// `sigma^2 * I` of order `dim`.
#[must_use]
pub fn diagonal_covariance(dim: usize, sigma: f64) -> Mat<f64> {
    let variance = sigma * sigma;
    Mat::from_fn(dim, dim, |row, col| if row == col { variance } else { 0.0 })
}
