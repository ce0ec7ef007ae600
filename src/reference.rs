//! Reference implementations for verification.
//!
//! Plain nested-`Vec` versions of every numeric primitive in the crate,
//! written without `faer` or shared helpers. Normal noise comes from the
//! Marsaglia polar method rather than the crate's Box–Muller sampler, so
//! the two samplers only agree if both are right. Property tests compare the
//! optimized routines against these: exactly for the deterministic
//! primitives, and by sample means for the randomized ones.
//!
//! These functions assert on malformed input instead of returning errors.

use faer::Mat;
use rand::{Rng, RngExt};

pub type Rows = Vec<Vec<f64>>;

#[must_use]
pub fn to_rows(matrix: &Mat<f64>) -> Rows {
    (0..matrix.nrows())
        .map(|i| (0..matrix.ncols()).map(|j| matrix[(i, j)]).collect())
        .collect()
}

/// # Panics
///
/// Panics if the rows are ragged.
#[must_use]
pub fn from_rows(rows: &[Vec<f64>]) -> Mat<f64> {
    let ncols = rows.first().map_or(0, Vec::len);
    assert!(rows.iter().all(|row| row.len() == ncols), "ragged rows");
    Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j])
}

#[must_use]
pub fn transpose(a: &[Vec<f64>]) -> Rows {
    let ncols = a.first().map_or(0, Vec::len);
    (0..ncols)
        .map(|j| a.iter().map(|row| row[j]).collect())
        .collect()
}

/// # Panics
///
/// Panics if the shapes differ.
#[must_use]
pub fn add(a: &[Vec<f64>], b: &[Vec<f64>]) -> Rows {
    assert_eq!(a.len(), b.len(), "row counts differ");
    a.iter()
        .zip(b)
        .map(|(left, right)| {
            assert_eq!(left.len(), right.len(), "column counts differ");
            left.iter().zip(right).map(|(x, y)| x + y).collect()
        })
        .collect()
}

/// # Panics
///
/// Panics on an inner-dimension mismatch.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn multiply(a: &[Vec<f64>], b: &[Vec<f64>]) -> Rows {
    let ncols = b.first().map_or(0, Vec::len);
    a.iter()
        .map(|row| {
            assert_eq!(row.len(), b.len(), "inner dimensions differ");
            (0..ncols)
                .map(|j| {
                    let mut sum = 0.0;
                    for (m, value) in row.iter().enumerate() {
                        sum += value * b[m][j];
                    }
                    sum
                })
                .collect()
        })
        .collect()
}

/// # Panics
///
/// Panics if `v.len()` differs from the row length of `a`.
#[must_use]
pub fn multiply_column(a: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let column: Rows = v.iter().map(|value| vec![*value]).collect();
    multiply(a, &column).into_iter().map(|row| row[0]).collect()
}

#[must_use]
pub fn logit(x: &[f64]) -> Vec<f64> {
    x.iter().map(|p| (p / (1.0 - p)).ln()).collect()
}

#[must_use]
pub fn logit_inv(x: &[f64]) -> Vec<f64> {
    x.iter().map(|value| 1.0 / (1.0 + (-value).exp())).collect()
}

/// Cholesky factor by the textbook recurrence.
///
/// # Panics
///
/// Panics if `sigma` is not positive definite.
#[must_use]
pub fn cholesky(sigma: &[Vec<f64>]) -> Rows {
    let n = sigma.len();
    let mut lower = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| lower[i][k] * lower[j][k]).sum();
            if i == j {
                let pivot = sigma[i][i] - partial;
                assert!(pivot > 0.0, "covariance is not positive definite");
                lower[i][j] = pivot.sqrt();
            } else {
                lower[i][j] = (sigma[i][j] - partial) / lower[j][j];
            }
        }
    }
    lower
}

/// Standard-normal draw by the Marsaglia polar method.
#[allow(clippy::suboptimal_flops)]
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u = 2.0 * rng.random::<f64>() - 1.0;
        let v = 2.0 * rng.random::<f64>() - 1.0;
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// `mu + L z` from a covariance given as rows.
#[must_use]
pub fn multivariate_normal<R: Rng + ?Sized>(mu: &[f64], sigma: &[Vec<f64>], rng: &mut R) -> Vec<f64> {
    let lower = cholesky(sigma);
    let z: Vec<f64> = mu.iter().map(|_| standard_normal(rng)).collect();
    multiply_column(&lower, &z)
        .into_iter()
        .zip(mu)
        .map(|(offset, mean)| mean + offset)
        .collect()
}

/// Normal-drift proposal from the covariance alone, psi by the unshifted
/// additive log-ratio formula.
#[must_use]
pub fn propose_norm_drift_psi_alpha<R: Rng + ?Sized>(
    alpha: &[f64],
    sigma: &[Vec<f64>],
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    let new_alpha = multivariate_normal(alpha, sigma, rng);
    let weights: Vec<f64> = new_alpha.iter().map(|value| value.exp()).collect();
    let denominator = 1.0 + weights.iter().sum::<f64>();
    let mut psi: Vec<f64> = weights.iter().map(|w| w / denominator).collect();
    psi.push(1.0 / denominator);
    (psi, new_alpha)
}
