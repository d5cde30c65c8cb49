//! Descriptive statistics over return vectors.
//!
//! Variances and covariances use the population convention (divide by `n`).

use ndarray::{ArrayBase, Data, Ix1};

use crate::MathError;

/// Arithmetic mean, 0 for an empty vector.
#[must_use]
pub fn mean<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    x.mean().unwrap_or(0.0)
}

/// Population variance, 0 for an empty vector.
#[must_use]
pub fn variance<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let m = mean(x);
    x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / x.len() as f64
}

/// Population standard deviation.
#[must_use]
pub fn std_dev<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    variance(x).sqrt()
}

/// Population covariance of two equal-length vectors.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if the lengths differ.
pub fn covariance<S, T>(x: &ArrayBase<S, Ix1>, y: &ArrayBase<T, Ix1>) -> Result<f64, MathError>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    if x.len() != y.len() {
        return Err(MathError::DimensionMismatch { expected: x.len(), actual: y.len() });
    }
    if x.is_empty() {
        return Ok(0.0);
    }
    let (mx, my) = (mean(x), mean(y));
    let sum: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(sum / x.len() as f64)
}

/// Pearson correlation, `None` when either vector has zero variance.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if the lengths differ.
pub fn correlation<S, T>(
    x: &ArrayBase<S, Ix1>,
    y: &ArrayBase<T, Ix1>,
) -> Result<Option<f64>, MathError>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    let cov = covariance(x, y)?;
    let denom = (variance(x) * variance(y)).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(None);
    }
    Ok(Some((cov / denom).clamp(-1.0, 1.0)))
}

/// Compounded return `prod(1 + r) - 1`, 0 for an empty vector.
#[must_use]
pub fn compound<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    x.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Geometric mean return `prod(1 + r)^(1/n) - 1`, 0 for an empty vector.
#[must_use]
pub fn geometric_mean<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    (1.0 + compound(x)).powf(1.0 / x.len() as f64) - 1.0
}
