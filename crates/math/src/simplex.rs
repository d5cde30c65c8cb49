//! Least squares over the probability simplex.
//!
//! Minimizes `||X w - y||^2` subject to `0 <= w_k <= 1` and `sum(w) = 1`.
//! The upper bound is implied by the other two constraints, so the feasible
//! set is exactly the probability simplex and the projection onto it is
//! available in closed form.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{MathError, equality_constrained_lsq};

/// Weights at or below this value are treated as outside the support when polishing.
const SUPPORT_THRESHOLD: f64 = 1e-10;

/// Configuration for the simplex least squares solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of projected-gradient iterations.
    pub max_iterations: usize,
    /// Stop when the objective changes by less than this, relative to its size.
    pub tolerance: f64,
    /// Stop when no weight moves by more than this in one iteration.
    pub step_tolerance: f64,
    /// Re-solve exactly on the detected support after the iterations.
    pub polish: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_iterations: 20_000, tolerance: 1e-20, step_tolerance: 1e-14, polish: true }
    }
}

impl SolverConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `MathError::InvalidConfig` if any limit is not positive.
    pub fn validate(&self) -> Result<(), MathError> {
        if self.max_iterations == 0 {
            return Err(MathError::InvalidConfig("max_iterations must be positive".to_string()));
        }
        if !(self.tolerance >= 0.0 && self.step_tolerance >= 0.0) {
            return Err(MathError::InvalidConfig("tolerances must be non-negative".to_string()));
        }
        Ok(())
    }
}

/// Result of a simplex-constrained least squares fit.
#[derive(Debug, Clone)]
pub struct SimplexLsqResult {
    /// Fitted weights, non-negative and summing to one.
    pub weights: Array1<f64>,
    /// Residuals `y - X w`.
    pub residuals: Array1<f64>,
    /// Sum of squared residuals.
    pub sse: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether a stopping criterion was met before the iteration limit.
    pub converged: bool,
}

/// Euclidean projection of `v` onto the probability simplex.
#[must_use]
pub fn project_to_simplex(v: &Array1<f64>) -> Array1<f64> {
    if v.is_empty() {
        return v.clone();
    }

    let mut sorted: Vec<f64> = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (j, &u) in sorted.iter().enumerate() {
        cumulative += u;
        let candidate = (cumulative - 1.0) / (j as f64 + 1.0);
        if u - candidate > 0.0 {
            theta = candidate;
        }
    }

    v.mapv(|x| (x - theta).max(0.0))
}

/// Sum of squared residuals from the normal-equation terms.
fn objective(gram: &Array2<f64>, xty: &Array1<f64>, yty: f64, w: &Array1<f64>) -> f64 {
    w.dot(&gram.dot(w)) - 2.0 * w.dot(xty) + yty
}

/// Minimize `||X w - y||^2` over non-negative weights summing to one.
///
/// Uses accelerated projected gradient descent with adaptive restart, seeded
/// from `initial` (projected onto the simplex first). When `polish` is
/// enabled, the weights are re-solved exactly on their support and the exact
/// solution replaces the iterate if it is feasible and no worse.
///
/// # Arguments
/// * `x` - Benchmark returns (n_obs x n_factors)
/// * `y` - Fund returns (n_obs,)
/// * `initial` - Starting weights (n_factors,)
/// * `config` - Solver configuration
///
/// # Errors
/// Returns error if dimensions mismatch, the inputs are empty or contain
/// non-finite values, or the configuration is invalid.
pub fn simplex_least_squares(
    x: &Array2<f64>,
    y: &Array1<f64>,
    initial: &Array1<f64>,
    config: &SolverConfig,
) -> Result<SimplexLsqResult, MathError> {
    config.validate()?;

    let n = y.len();
    let k = x.ncols();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if initial.len() != k {
        return Err(MathError::DimensionMismatch { expected: k, actual: initial.len() });
    }
    if n == 0 || k == 0 {
        return Err(MathError::EmptyData);
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite returns".to_string()));
    }

    let gram = x.t().dot(x);
    let xty = x.t().dot(y);
    let yty = y.dot(y);

    let mut w = project_to_simplex(initial);
    // The trace bounds the largest eigenvalue of the Gram matrix from above
    // and is zero only when every benchmark return is zero.
    let lipschitz = 2.0 * gram.diag().sum();

    let mut iterations = 0;
    let mut converged = lipschitz == 0.0 || k == 1;

    if !converged {
        let step = 1.0 / (lipschitz * (1.0 + 1e-9));
        let mut z = w.clone();
        let mut t = 1.0_f64;
        let mut prev_obj = objective(&gram, &xty, yty, &w);

        while iterations < config.max_iterations {
            iterations += 1;

            let grad = (gram.dot(&z) - &xty) * 2.0;
            let w_next = project_to_simplex(&(&z - &(grad * step)));
            let obj_next = objective(&gram, &xty, yty, &w_next);

            // Momentum overshot: restart from the last accepted iterate.
            if obj_next > prev_obj && t > 1.0 {
                z.assign(&w);
                t = 1.0;
                continue;
            }

            let t_next = (1.0 + (1.0 + 4.0 * t * t).sqrt()) / 2.0;
            let moved = (&w_next - &w).iter().fold(0.0_f64, |m, d| m.max(d.abs()));
            z = &w_next + &((&w_next - &w) * ((t - 1.0) / t_next));

            let change = (prev_obj - obj_next).abs();
            w = w_next;
            t = t_next;

            if change <= config.tolerance * prev_obj.abs().max(f64::MIN_POSITIVE)
                || moved <= config.step_tolerance
            {
                converged = true;
                break;
            }
            prev_obj = obj_next;
        }
    }

    if config.polish {
        w = polish(x, y, &gram, &xty, yty, w);
    }

    if !converged {
        warn!(iterations, "simplex least squares hit the iteration limit");
    }

    let residuals = y - &x.dot(&w);
    let sse = residuals.dot(&residuals);
    debug!(iterations, converged, sse, "simplex least squares finished");

    Ok(SimplexLsqResult { weights: w, residuals, sse, iterations, converged })
}

/// Exact solve restricted to the support of `w`, kept only if feasible and no worse.
fn polish(
    x: &Array2<f64>,
    y: &Array1<f64>,
    gram: &Array2<f64>,
    xty: &Array1<f64>,
    yty: f64,
    w: Array1<f64>,
) -> Array1<f64> {
    let support: Vec<usize> = (0..w.len()).filter(|&i| w[i] > SUPPORT_THRESHOLD).collect();
    if support.is_empty() {
        return w;
    }

    let sub = x.select(ndarray::Axis(1), &support);
    let Ok(sub_weights) = equality_constrained_lsq(&sub, y) else {
        return w;
    };
    if sub_weights.iter().any(|&v| !v.is_finite() || v < -SUPPORT_THRESHOLD) {
        return w;
    }

    let mut candidate = Array1::zeros(w.len());
    for (&i, &v) in support.iter().zip(sub_weights.iter()) {
        candidate[i] = v.max(0.0);
    }
    let total = candidate.sum();
    if total <= 0.0 {
        return w;
    }
    candidate /= total;

    let current = objective(gram, xty, yty, &w);
    let polished = objective(gram, xty, yty, &candidate);
    if polished <= current + 1e-15 * current.abs().max(1.0) { candidate } else { w }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    fn benchmark_matrix() -> Array2<f64> {
        array![
            [0.010, 0.002, -0.004],
            [-0.020, 0.001, 0.006],
            [0.015, -0.003, 0.002],
            [0.005, 0.004, -0.010],
            [-0.007, 0.000, 0.011],
            [0.012, -0.002, 0.003],
            [0.003, 0.003, -0.006],
        ]
    }

    fn first_factor_seed(k: usize) -> Array1<f64> {
        let mut seed = Array1::zeros(k);
        seed[0] = 1.0;
        seed
    }

    #[rstest]
    #[case(array![0.5, 0.5], array![0.5, 0.5])]
    #[case(array![2.0, 0.0], array![1.0, 0.0])]
    #[case(array![-1.0, 0.3, 0.2], array![0.0, 0.55, 0.45])]
    fn projection_onto_simplex(#[case] v: Array1<f64>, #[case] expected: Array1<f64>) {
        let p = project_to_simplex(&v);
        for (a, b) in p.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_factor_is_fully_weighted() {
        let x = array![[0.01], [0.02], [-0.01]];
        let y = array![0.03, -0.01, 0.00];
        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(1), &SolverConfig::default()).unwrap();
        assert_eq!(result.weights[0], 1.0);
        assert!(result.converged);
    }

    #[test]
    fn recovers_interior_mix() {
        let x = benchmark_matrix();
        let truth = array![0.5, 0.3, 0.2];
        let y = x.dot(&truth);
        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(3), &SolverConfig::default()).unwrap();
        for (a, b) in result.weights.iter().zip(truth.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-8);
        }
        assert!(result.sse < 1e-18);
    }

    #[test]
    fn clamps_to_boundary_when_unconstrained_optimum_is_infeasible() {
        let x = benchmark_matrix();
        // Leveraged exposure to the first factor: the best feasible fit is all-in.
        let y = x.column(0).mapv(|v| v * 1.5);
        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(3), &SolverConfig::default()).unwrap();
        assert!(result.weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
        assert_relative_eq!(result.weights.sum(), 1.0, epsilon = 1e-9);
        assert!(result.weights[0] > 0.9);
    }

    /// Returns that cancel row by row, plus an unrelated series orthogonal to them.
    fn offsetting_pair() -> (Array1<f64>, Array1<f64>) {
        let a = array![0.010, -0.020, 0.015, 0.005, -0.007, 0.012];
        let b = array![0.020, 0.010, 0.000, -0.006, 0.000, 0.0025];
        (a, b)
    }

    #[test]
    fn offsetting_columns_reach_the_optimum() {
        let (a, _) = offsetting_pair();
        let mut x = Array2::zeros((a.len(), 2));
        x.column_mut(0).assign(&a);
        x.column_mut(1).assign(&(-&a));
        let y = &a * 0.2;

        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(2), &SolverConfig::default()).unwrap();
        assert!(result.converged);
        assert!(result.iterations > 0);
        assert_relative_eq!(result.weights[0], 0.6, epsilon = 1e-8);
        assert_relative_eq!(result.weights[1], 0.4, epsilon = 1e-8);
        assert!(result.sse < 1e-18);
    }

    #[test]
    fn offsetting_columns_with_third_factor() {
        let (a, b) = offsetting_pair();
        assert_relative_eq!(a.dot(&b), 0.0, epsilon = 1e-15);
        let mut x = Array2::zeros((a.len(), 3));
        x.column_mut(0).assign(&a);
        x.column_mut(1).assign(&(-&a));
        x.column_mut(2).assign(&b);
        let truth = array![0.45, 0.25, 0.3];
        let y = x.dot(&truth);

        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(3), &SolverConfig::default()).unwrap();
        assert!(result.converged);
        for (w, t) in result.weights.iter().zip(truth.iter()) {
            assert_relative_eq!(*w, *t, epsilon = 1e-8);
        }
        assert!(result.sse < 1e-18);
    }

    #[test]
    fn zero_factor_matrix_keeps_seed() {
        let x = Array2::zeros((4, 2));
        let y = array![0.01, 0.02, 0.0, -0.01];
        let result =
            simplex_least_squares(&x, &y, &first_factor_seed(2), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.weights.sum(), 1.0, epsilon = 1e-12);
        assert!(result.weights.iter().all(|&w| w >= 0.0));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let x = benchmark_matrix();
        let y = array![0.01, 0.02];
        assert!(
            simplex_least_squares(&x, &y, &first_factor_seed(3), &SolverConfig::default()).is_err()
        );
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let x = array![[0.01, f64::NAN], [0.02, 0.01]];
        let y = array![0.01, 0.02];
        let err = simplex_least_squares(&x, &y, &first_factor_seed(2), &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, MathError::NumericalInstability(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SolverConfig { max_iterations: 0, ..SolverConfig::default() };
        assert!(config.validate().is_err());
    }
}
