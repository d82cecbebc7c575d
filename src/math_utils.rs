//! Numerical helpers shared by the estimators.

use crate::errors::{FractalAnalysisError, FractalResult};
use statrs::statistics::Statistics;

/// Total ordering for f64 values, NaN sorts last.
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match a.partial_cmp(b) {
        Some(ord) => ord,
        None => match (a.is_nan(), b.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            _ => std::cmp::Ordering::Less,
        },
    }
}

/// Numerical tolerances used across the crate.
pub mod constants {
    /// Smallest argument accepted by [`super::float_ops::safe_ln`]
    pub const MIN_LOG_VALUE: f64 = 0.0;

    /// Predictor spread below this makes a regression ill-posed
    pub const MIN_VARIANCE: f64 = 1e-14;
}

/// Guarded floating point operations
pub mod float_ops {
    use super::constants::MIN_LOG_VALUE;

    /// Natural log for strictly positive finite values only
    pub fn safe_ln(x: f64) -> Option<f64> {
        if x > MIN_LOG_VALUE && x.is_finite() {
            Some(x.ln())
        } else {
            None
        }
    }
}

/// Builds the integrated profile: cumulative sum of deviations from the mean.
///
/// The output has the same length as the input. An empty input yields an
/// empty profile.
pub fn integrate_series(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }

    let mean = data.mean();
    data.iter()
        .scan(0.0, |cumsum, &value| {
            *cumsum += value - mean;
            Some(*cumsum)
        })
        .collect()
}

/// Result of a simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Fitted slope
    pub slope: f64,
    /// Fitted intercept
    pub intercept: f64,
    /// Coefficient of determination, 1.0 when y has no spread
    pub r_squared: f64,
}

/// Ordinary least squares fit of `y` on `x` with an intercept.
///
/// Data is centered before the sums are formed to avoid cancellation when x
/// values are large relative to their spread. Two points are enough; fewer, or
/// a constant predictor, is an error.
///
/// # Example
/// ```rust
/// use fractal_signal::math_utils::linear_regression;
///
/// let fit = linear_regression(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// ```
pub fn linear_regression(x: &[f64], y: &[f64]) -> FractalResult<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return Err(FractalAnalysisError::InsufficientData {
            required: 2,
            actual: x.len().min(y.len()),
        });
    }

    if !x.iter().chain(y).all(|v| v.is_finite()) {
        return Err(FractalAnalysisError::numerical(
            "Non-finite values in regression data",
            "linear_regression",
        ));
    }

    let mean_x = x.mean();
    let mean_y = y.mean();

    let (sxy, sxx, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (xi, yi)| {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });

    if sxx < constants::MIN_VARIANCE {
        return Err(FractalAnalysisError::numerical(
            "Predictor variable has zero variance (constant values)",
            "linear_regression",
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let rss: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let residual = yi - (intercept + slope * xi);
            residual * residual
        })
        .sum();
    let r_squared = if syy > 0.0 { 1.0 - rss / syy } else { 1.0 };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Minimum and maximum of a slice, `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Bias-corrected sample skewness (adjusted Fisher-Pearson, G1).
///
/// Returns 0 for fewer than three values or zero sample variance.
pub fn sample_skewness(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return 0.0;
    }

    let mean = data.mean();
    let std_dev = data.std_dev();
    if !std_dev.is_finite() || std_dev == 0.0 {
        return 0.0;
    }

    let n = n as f64;
    let sum_cubed: f64 = data.iter().map(|x| ((x - mean) / std_dev).powi(3)).sum();
    n / ((n - 1.0) * (n - 2.0)) * sum_cubed
}
