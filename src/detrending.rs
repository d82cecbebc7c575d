//! Polynomial detrending for fixed-length segments.
//!
//! The fitter solves the least-squares normal equations `XᵀX β = Xᵀy` for a
//! Vandermonde design matrix with a Cholesky factorization. x values are mapped
//! onto [-1, 1] first, which keeps `XᵀX` well conditioned for the segment
//! lengths used by MF-DFA; the fitted values do not depend on this mapping.

use crate::errors::{FractalAnalysisError, FractalResult};
use nalgebra::{DMatrix, DVector};

/// Default detrending degree (quadratic).
pub const DEFAULT_DETREND_DEGREE: usize = 2;

/// Highest polynomial degree accepted by the fitter.
pub const MAX_DETREND_DEGREE: usize = 5;

/// Fit a polynomial of `degree` to `(x, y)` by least squares and return the
/// fitted value at every x.
///
/// # Errors
/// - `InsufficientData` when `x` and `y` differ in length or are empty
/// - `InvalidParameter` when `degree` exceeds [`MAX_DETREND_DEGREE`]
/// - `NumericalError` when the design matrix is singular, which includes every
///   segment of length ≤ `degree`
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> FractalResult<Vec<f64>> {
    let n = y.len();
    if x.len() != n || n == 0 {
        return Err(FractalAnalysisError::InsufficientData {
            required: degree + 1,
            actual: x.len().min(n),
        });
    }
    if degree > MAX_DETREND_DEGREE {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: "detrend_degree".to_string(),
            value: degree as f64,
            constraint: format!("<= {}", MAX_DETREND_DEGREE),
        });
    }
    if n <= degree {
        return Err(FractalAnalysisError::numerical(
            format!(
                "Singular design matrix: segment of length {} cannot determine a degree {} polynomial",
                n, degree
            ),
            "fit_polynomial",
        ));
    }

    let (x_min, x_max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let center = (x_max + x_min) / 2.0;
    let half_range = (x_max - x_min) / 2.0;
    let scale = if half_range > 0.0 { half_range } else { 1.0 };

    let design = DMatrix::from_fn(n, degree + 1, |i, j| ((x[i] - center) / scale).powi(j as i32));
    let response = DVector::from_column_slice(y);

    let normal_matrix = design.transpose() * &design;
    let rhs = design.transpose() * &response;

    let cholesky = normal_matrix.cholesky().ok_or_else(|| {
        FractalAnalysisError::numerical(
            format!("Singular design matrix for degree {} fit over {} points", degree, n),
            "fit_polynomial",
        )
    })?;
    let coefficients = cholesky.solve(&rhs);

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(FractalAnalysisError::numerical(
            "Non-finite polynomial coefficients",
            "fit_polynomial",
        ));
    }

    Ok((&design * coefficients).iter().copied().collect())
}

/// Mean squared residual of a segment after degree-`degree` detrending.
///
/// The segment is indexed by `0..len` on the x axis. This is the per-segment
/// F² used by MF-DFA (no square root).
pub fn detrended_mean_square(segment: &[f64], degree: usize) -> FractalResult<f64> {
    let x: Vec<f64> = (0..segment.len()).map(|i| i as f64).collect();
    let fitted = fit_polynomial(&x, segment, degree)?;

    let sum_squared: f64 = segment
        .iter()
        .zip(&fitted)
        .map(|(y, f)| (y - f) * (y - f))
        .sum();
    Ok(sum_squared / segment.len() as f64)
}

/// Residual RMS of a segment after degree-`degree` detrending.
pub fn residual_rms(segment: &[f64], degree: usize) -> FractalResult<f64> {
    detrended_mean_square(segment, degree).map(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_quadratic_is_fitted_exactly() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 - 3.0 * v + 0.25 * v * v).collect();
        let fitted = fit_polynomial(&x, &y, 2).unwrap();
        for (f, expected) in fitted.iter().zip(&y) {
            assert_approx_eq!(f, expected, 1e-8);
        }
        assert!(detrended_mean_square(&y, 2).unwrap() < 1e-16);
    }

    #[test]
    fn test_linear_fit_of_parabola_leaves_residual() {
        let y: Vec<f64> = (0..10).map(|i| (i as f64).powi(2)).collect();
        assert!(residual_rms(&y, 1).unwrap() > 1.0);
        assert!(residual_rms(&y, 2).unwrap() < 1e-8);
    }

    #[test]
    fn test_degree_zero_is_mean_removal() {
        let y = vec![1.0, 3.0, 5.0, 7.0];
        // mean 4, deviations -3,-1,1,3 => mean square 5
        assert_approx_eq!(detrended_mean_square(&y, 0).unwrap(), 5.0);
    }

    #[test]
    fn test_short_segment_is_singular() {
        let result = detrended_mean_square(&[1.0, 2.0], 2);
        assert!(matches!(result, Err(FractalAnalysisError::NumericalError { .. })));
    }

    #[test]
    fn test_constant_x_is_singular() {
        let result = fit_polynomial(&[3.0, 3.0, 3.0, 3.0], &[1.0, 2.0, 3.0, 4.0], 1);
        assert!(matches!(result, Err(FractalAnalysisError::NumericalError { .. })));
    }

    #[test]
    fn test_mismatched_lengths() {
        let result = fit_polynomial(&[0.0, 1.0], &[1.0, 2.0, 3.0], 1);
        assert!(matches!(result, Err(FractalAnalysisError::InsufficientData { .. })));
    }

    #[test]
    fn test_degree_too_high() {
        let y: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let result = detrended_mean_square(&y, MAX_DETREND_DEGREE + 1);
        assert!(matches!(result, Err(FractalAnalysisError::InvalidParameter { .. })));
    }
}
