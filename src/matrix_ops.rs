//! # Matrix operations
//!
//! Dense transpose, addition, and products over `faer` matrices.
//!
//! Every product sums its terms left to right in index order with plain
//! multiply-then-add, so results are reproducible bit for bit against any
//! reference that accumulates in the same order. faer's own kernels are not
//! used here because they are free to reorder or fuse the accumulation.
//!
//! Each operation comes in an allocating form and an `_into` form that
//! writes into a caller-owned buffer for use inside sampling loops.
//!
//! # Examples
//!
//! ```
//! use faer::Mat;
//! use psi_proposals::matrix_ops::{mat_times_col_vect, mat_trans};
//!
//! let a = Mat::from_fn(2, 3, |i, j| if i == j { 1.0 } else { 0.0 });
//! assert_eq!(mat_trans(&a).nrows(), 3);
//!
//! let product = mat_times_col_vect(&a, &[4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(product, vec![4.0, 5.0]);
//! ```

use faer::Mat;
use thiserror::Error;

/// `(rows, cols)` of a matrix.
pub type Shape = (usize, usize);

/// Errors raised by the dense linear-algebra primitives.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    #[error("{op}: operand shapes {left:?} and {right:?} are not conformant")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },
    #[error("output buffer has shape {found:?}; expected {expected:?}")]
    BufferShape { expected: Shape, found: Shape },
    #[error("matrix must be square; found {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("matrix is not positive definite (failed at pivot {pivot})")]
    NotPositiveDefinite { pivot: usize },
}

#[must_use]
pub fn shape(matrix: &Mat<f64>) -> Shape {
    (matrix.nrows(), matrix.ncols())
}

/// View a slice as an `n x 1` column matrix.
#[must_use]
pub fn column_from_slice(values: &[f64]) -> Mat<f64> {
    Mat::from_fn(values.len(), 1, |row, _| values[row])
}

/// Flatten the first column of `column` into a vector.
#[must_use]
pub fn column_to_vec(column: &Mat<f64>) -> Vec<f64> {
    if column.ncols() == 0 {
        return Vec::new();
    }
    (0..column.nrows()).map(|row| column[(row, 0)]).collect()
}

/// Transpose `a` into a new `cols x rows` matrix.
#[must_use]
pub fn mat_trans(a: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(a.ncols(), a.nrows(), |i, j| a[(j, i)])
}

/// Transpose `a` into `out`, which must be `cols x rows`.
///
/// # Errors
///
/// Returns `LinalgError::BufferShape` if `out` has the wrong shape.
pub fn mat_trans_into(a: &Mat<f64>, out: &mut Mat<f64>) -> Result<(), LinalgError> {
    check_buffer(out, (a.ncols(), a.nrows()))?;
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            out[(j, i)] = a[(i, j)];
        }
    }
    Ok(())
}

/// Element-wise sum of two equally shaped matrices.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` if the shapes differ.
pub fn mat_plus_mat(a: &Mat<f64>, b: &Mat<f64>) -> Result<Mat<f64>, LinalgError> {
    let mut out = Mat::<f64>::zeros(a.nrows(), a.ncols());
    mat_plus_mat_into(a, b, &mut out)?;
    Ok(out)
}

/// Element-wise sum written into `out`.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` if `a` and `b` differ in shape,
/// or `LinalgError::BufferShape` if `out` does not match them.
pub fn mat_plus_mat_into(
    a: &Mat<f64>,
    b: &Mat<f64>,
    out: &mut Mat<f64>,
) -> Result<(), LinalgError> {
    if shape(a) != shape(b) {
        return Err(LinalgError::DimensionMismatch {
            op: "mat_plus_mat",
            left: shape(a),
            right: shape(b),
        });
    }
    check_buffer(out, shape(a))?;
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            out[(i, j)] = a[(i, j)] + b[(i, j)];
        }
    }
    Ok(())
}

/// Matrix product `a * b`.
///
/// `b` may be a single column; that case runs through the same loop as the
/// general product.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` if `a.ncols() != b.nrows()`.
pub fn mat_times_mat(a: &Mat<f64>, b: &Mat<f64>) -> Result<Mat<f64>, LinalgError> {
    let mut out = Mat::<f64>::zeros(a.nrows(), b.ncols());
    mat_times_mat_into(a, b, &mut out)?;
    Ok(out)
}

/// Matrix product `a * b` written into `out`.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` on an inner-dimension mismatch,
/// or `LinalgError::BufferShape` if `out` is not `a.nrows() x b.ncols()`.
#[allow(clippy::suboptimal_flops)]
pub fn mat_times_mat_into(
    a: &Mat<f64>,
    b: &Mat<f64>,
    out: &mut Mat<f64>,
) -> Result<(), LinalgError> {
    if a.ncols() != b.nrows() {
        return Err(LinalgError::DimensionMismatch {
            op: "mat_times_mat",
            left: shape(a),
            right: shape(b),
        });
    }
    check_buffer(out, (a.nrows(), b.ncols()))?;
    for i in 0..a.nrows() {
        for j in 0..b.ncols() {
            // no mul_add: fused rounding would break parity with the reference
            let mut sum = 0.0;
            for m in 0..a.ncols() {
                sum += a[(i, m)] * b[(m, j)];
            }
            out[(i, j)] = sum;
        }
    }
    Ok(())
}

/// Product of `a` with `v` read as a column vector.
///
/// Gives the same values as `mat_times_mat(a, &column_from_slice(v))`
/// flattened, without building the intermediate column.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` if `v.len() != a.ncols()`.
pub fn mat_times_col_vect(a: &Mat<f64>, v: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let mut out = vec![0.0; a.nrows()];
    mat_times_col_vect_into(a, v, &mut out)?;
    Ok(out)
}

/// Product of `a` with the column `v`, written into `out`.
///
/// # Errors
///
/// Returns `LinalgError::DimensionMismatch` if `v.len() != a.ncols()`, or
/// `LinalgError::BufferShape` if `out.len() != a.nrows()`.
#[allow(clippy::suboptimal_flops)]
pub fn mat_times_col_vect_into(
    a: &Mat<f64>,
    v: &[f64],
    out: &mut [f64],
) -> Result<(), LinalgError> {
    if v.len() != a.ncols() {
        return Err(LinalgError::DimensionMismatch {
            op: "mat_times_col_vect",
            left: shape(a),
            right: (v.len(), 1),
        });
    }
    if out.len() != a.nrows() {
        return Err(LinalgError::BufferShape {
            expected: (a.nrows(), 1),
            found: (out.len(), 1),
        });
    }
    for (i, slot) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (j, value) in v.iter().enumerate() {
            sum += a[(i, j)] * value;
        }
        *slot = sum;
    }
    Ok(())
}

fn check_buffer(out: &Mat<f64>, expected: Shape) -> Result<(), LinalgError> {
    if shape(out) == expected {
        Ok(())
    } else {
        Err(LinalgError::BufferShape {
            expected,
            found: shape(out),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[f64]]) -> Mat<f64> {
        Mat::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j])
    }

    fn entries(matrix: &Mat<f64>) -> Vec<Vec<f64>> {
        (0..matrix.nrows())
            .map(|i| (0..matrix.ncols()).map(|j| matrix[(i, j)]).collect())
            .collect()
    }

    #[test]
    fn transpose_swaps_indices() {
        let a = from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let t = mat_trans(&a);
        assert_eq!(shape(&t), (2, 3));
        assert_eq!(entries(&t), vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]]);
        assert_eq!(entries(&mat_trans(&t)), entries(&a));
    }

    #[test]
    fn transpose_into_rejects_wrong_buffer() {
        let a = Mat::<f64>::zeros(2, 5);
        let mut out = Mat::<f64>::zeros(2, 5);
        let err = mat_trans_into(&a, &mut out).expect_err("shape should be checked");
        assert_eq!(
            err,
            LinalgError::BufferShape {
                expected: (5, 2),
                found: (2, 5)
            }
        );
    }

    #[test]
    fn addition_requires_equal_shapes() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(3, 2);
        let err = mat_plus_mat(&a, &b).expect_err("shapes differ");
        assert!(matches!(
            err,
            LinalgError::DimensionMismatch {
                op: "mat_plus_mat",
                ..
            }
        ));
    }

    #[test]
    fn product_matches_hand_computation() {
        let a = from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = from_rows(&[&[10.0, 20.0], &[40.0, 50.0], &[0.0, 1.0]]);
        let c = mat_times_mat(&a, &b).expect("conformant");
        assert_eq!(entries(&c), vec![vec![90.0, 123.0], vec![240.0, 336.0]]);
    }

    #[test]
    fn product_rejects_inner_mismatch() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(2, 3);
        assert!(mat_times_mat(&a, &b).is_err());
    }

    #[test]
    fn column_vector_product_matches_general_product() {
        let a = from_rows(&[&[0.1, 0.7, 1.3], &[2.2, -0.4, 0.9], &[1.1, 0.05, -3.3]]);
        let v = [0.7, -1.3, 2.9];
        let flat = mat_times_col_vect(&a, &v).expect("conformant");
        let general = mat_times_mat(&a, &column_from_slice(&v)).expect("conformant");
        assert_eq!(flat, column_to_vec(&general));
    }

    #[test]
    fn column_vector_product_checks_lengths() {
        let a = Mat::<f64>::zeros(2, 3);
        assert!(mat_times_col_vect(&a, &[1.0, 2.0]).is_err());
        let mut out = [0.0; 3];
        let err = mat_times_col_vect_into(&a, &[1.0, 2.0, 3.0], &mut out)
            .expect_err("output length is wrong");
        assert!(matches!(err, LinalgError::BufferShape { .. }));
    }

    #[test]
    fn error_messages_name_the_operation() {
        let err = LinalgError::DimensionMismatch {
            op: "mat_times_mat",
            left: (2, 3),
            right: (2, 3),
        };
        assert_eq!(
            err.to_string(),
            "mat_times_mat: operand shapes (2, 3) and (2, 3) are not conformant"
        );
    }
}
