//! # Utilities
//!
//! Summary statistics and tolerance comparisons over sampled vectors.

/// Converts a count to `f64`, saturating above `u32::MAX`.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Component-wise mean of equally sized samples.
///
/// # Panics
///
/// Panics if `samples` is empty.
#[must_use]
pub fn mean_vector(samples: &[Vec<f64>]) -> Vec<f64> {
    assert!(
        !samples.is_empty(),
        "mean_vector requires at least one sample"
    );
    let mut mean = vec![0.0; samples[0].len()];
    for sample in samples {
        for (slot, value) in mean.iter_mut().zip(sample) {
            *slot += value;
        }
    }
    let n = usize_to_f64(samples.len());
    for slot in &mut mean {
        *slot /= n;
    }
    mean
}

#[must_use]
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// `|a - b| <= error`.
#[must_use]
pub fn approx_eq(a: f64, b: f64, error: f64) -> bool {
    (a - b).abs() <= error
}

/// Equal lengths and every pair within `error`.
#[must_use]
pub fn approx_eq_arrays(a: &[f64], b: &[f64], error: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y, error))
}

/// Whether `psi` is non-negative, finite, and sums to one within `tolerance`.
#[must_use]
pub fn is_valid_simplex(psi: &[f64], tolerance: f64) -> bool {
    !psi.is_empty()
        && psi.iter().all(|value| value.is_finite() && *value >= 0.0)
        && (psi.iter().sum::<f64>() - 1.0).abs() <= tolerance
}
