//! Dense linear solve for the small systems assembled by every model.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Relative pivot threshold below which a matrix counts as singular.
///
/// A pivot smaller than `SINGULAR_PIVOT_RTOL * max|pivot|` carries no
/// significant digits for the systems solved here (a few dozen unknowns).
pub const SINGULAR_PIVOT_RTOL: f64 = 1e-12;

/// Solve `A·x = b` by LU decomposition with partial pivoting.
///
/// Each row of `A` and `b` is scaled by its largest coefficient before
/// factoring, so the pivot test compares like with like when one equation
/// carries a stiff coupling and another a weak link. Returns [`SolverError::SingularSystem`] when `A` is singular or too close to
/// singular for the result to mean anything; the caller decides what to do
/// about it.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(SolverError::DimensionMismatch {
            what: format!("coefficient matrix is {}x{}, expected square", n, a.ncols()),
        });
    }
    if b.len() != n {
        return Err(SolverError::DimensionMismatch {
            what: format!("right-hand side has length {}, expected {}", b.len(), n),
        });
    }
    if n == 0 {
        return Ok(DVector::zeros(0));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(SolverError::NonPhysical {
            what: "non-finite entry in linear system".to_string(),
        });
    }

    let mut scaled = a.clone();
    let mut rhs = b.clone();
    for i in 0..n {
        let scale = scaled.row(i).amax();
        if scale == 0.0 {
            return Err(SolverError::SingularSystem { dim: n });
        }
        scaled.row_mut(i).scale_mut(1.0 / scale);
        rhs[i] /= scale;
    }

    let lu = scaled.lu();

    let pivots = lu.u().diagonal().map(f64::abs);
    let max_pivot = pivots.max();
    let min_pivot = pivots.min();
    if max_pivot == 0.0 || min_pivot <= SINGULAR_PIVOT_RTOL * max_pivot {
        return Err(SolverError::SingularSystem { dim: n });
    }

    let x = lu.solve(&rhs).ok_or(SolverError::SingularSystem { dim: n })?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::SingularSystem { dim: n });
    }
    Ok(x)
}

/// Row-slice convenience wrapper around [`solve_linear_system`].
pub fn solve_dense(rows: &[Vec<f64>], b: &[f64]) -> SolverResult<Vec<f64>> {
    let n = rows.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n {
            return Err(SolverError::DimensionMismatch {
                what: format!("row {} has length {}, expected {}", i, row.len(), n),
            });
        }
    }
    let a = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
    let x = solve_linear_system(&a, &DVector::from_column_slice(b))?;
    Ok(x.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        // 2x + y = 5, x + 3y = 10  ->  x = 1, y = 3
        let x = solve_dense(&[vec![2.0, 1.0], vec![1.0, 3.0]], &[5.0, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn needs_pivoting() {
        // Zero in the leading position.
        let x = solve_dense(&[vec![0.0, 1.0], vec![1.0, 0.0]], &[4.0, 7.0]).unwrap();
        assert_eq!(x, vec![7.0, 4.0]);
    }

    #[test]
    fn singular_matrix_is_reported() {
        let err = solve_dense(&[vec![1.0, 2.0], vec![2.0, 4.0]], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, SolverError::SingularSystem { dim: 2 });
    }

    #[test]
    fn near_singular_matrix_is_reported() {
        let err =
            solve_dense(&[vec![1.0, 1.0], vec![1.0, 1.0 + 1e-15]], &[2.0, 2.0]).unwrap_err();
        assert!(matches!(err, SolverError::SingularSystem { .. }));
    }

    #[test]
    fn badly_scaled_rows_still_solve() {
        // Same system as `solves_small_system`, first row multiplied by 1e14.
        let x = solve_dense(&[vec![2e14, 1e14], vec![1.0, 3.0]], &[5e14, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_matrix_is_singular() {
        let a = DMatrix::zeros(3, 3);
        let b = DVector::from_element(3, 1.0);
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(SolverError::SingularSystem { dim: 3 })
        ));
    }

    #[test]
    fn dimension_checks() {
        let a = DMatrix::<f64>::zeros(2, 3);
        let b = DVector::zeros(2);
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(SolverError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            solve_dense(&[vec![1.0]], &[1.0, 2.0]),
            Err(SolverError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn empty_system() {
        let x = solve_dense(&[], &[]).unwrap();
        assert!(x.is_empty());
    }
}
