//! Element-wise logit and inverse-logit transforms.
//!
//! Both use the textbook formulas so that outputs are bit-identical to a
//! reference array implementation. Boundary inputs are not errors:
//! `logit(0) == -inf`, `logit(1) == +inf`, and `logit_inv` saturates to
//! exactly `0` or `1` for large `|x|` without producing `NaN`.

use crate::matrix_ops::LinalgError;

/// `ln(p / (1 - p))`.
#[must_use]
pub fn logit_scalar(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// `1 / (1 + e^-x)`.
#[must_use]
pub fn logit_inv_scalar(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[must_use]
pub fn logit(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(logit_scalar).collect()
}

#[must_use]
pub fn logit_inv(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(logit_inv_scalar).collect()
}

/// # Errors
///
/// Returns `LinalgError::BufferShape` if `out.len() != values.len()`.
pub fn logit_into(values: &[f64], out: &mut [f64]) -> Result<(), LinalgError> {
    map_into(values, out, logit_scalar)
}

/// # Errors
///
/// Returns `LinalgError::BufferShape` if `out.len() != values.len()`.
pub fn logit_inv_into(values: &[f64], out: &mut [f64]) -> Result<(), LinalgError> {
    map_into(values, out, logit_inv_scalar)
}

fn map_into(values: &[f64], out: &mut [f64], f: impl Fn(f64) -> f64) -> Result<(), LinalgError> {
    if out.len() != values.len() {
        return Err(LinalgError::BufferShape {
            expected: (values.len(), 1),
            found: (out.len(), 1),
        });
    }
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = f(*value);
    }
    Ok(())
}
