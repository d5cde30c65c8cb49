//! Dense linear solves.

use ndarray::{Array1, Array2, s};

use crate::MathError;

/// Pivots smaller than this are treated as zero.
const SINGULAR_PIVOT: f64 = 1e-14;

/// Solve a linear system Ax = b using Gaussian elimination with partial pivoting.
///
/// # Errors
/// Returns error if the matrix is not square, dimensions mismatch, or the
/// matrix is singular.
pub fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }

    // Augmented matrix [A | b]
    let mut aug = Array2::zeros((n, n + 1));
    aug.slice_mut(s![.., ..n]).assign(a);
    aug.slice_mut(s![.., n]).assign(b);

    // Scale the singularity threshold to the matrix so tiny return
    // covariances are not mistaken for singular systems.
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(f64::MIN_POSITIVE);

    for col in 0..n {
        let (pivot_row, pivot_val) = (col..n)
            .map(|row| (row, aug[[row, col]].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if pivot_val < SINGULAR_PIVOT * scale {
            return Err(MathError::LinearAlgebra(
                "matrix is singular or nearly singular".to_string(),
            ));
        }

        if pivot_row != col {
            for j in 0..=n {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    // Back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }

    Ok(x)
}

/// Least squares with weights constrained to sum to one (no bounds).
///
/// Solves the KKT system
///
/// ```text
/// | X'X  1 | | w |   | X'y |
/// | 1'   0 | | m | = |  1  |
/// ```
///
/// # Errors
/// Returns error if dimensions mismatch or the system is singular.
pub fn equality_constrained_lsq(
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<Array1<f64>, MathError> {
    let n = y.len();
    let k = x.ncols();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if k == 0 || n == 0 {
        return Err(MathError::EmptyData);
    }

    let mut kkt = Array2::zeros((k + 1, k + 1));
    kkt.slice_mut(s![..k, ..k]).assign(&x.t().dot(x));
    kkt.slice_mut(s![..k, k]).fill(1.0);
    kkt.slice_mut(s![k, ..k]).fill(1.0);

    let mut rhs = Array1::zeros(k + 1);
    rhs.slice_mut(s![..k]).assign(&x.t().dot(y));
    rhs[k] = 1.0;

    let solution = solve_linear_system(&kkt, &rhs)?;
    Ok(solution.slice(s![..k]).to_owned())
}
