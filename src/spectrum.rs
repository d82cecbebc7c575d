//! Multifractal singularity spectrum from generalized Hurst exponents.
//!
//! τ(q) = q·h(q) − 1, α(q) = dτ/dq by finite differences (central inside,
//! one-sided at both ends), and f(α) = q·α − τ (Legendre transform).

use crate::errors::{FractalAnalysisError, FractalResult};
use crate::math_utils::float_total_cmp;
use crate::mfdfa::GeneralizedHurst;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One point of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectrumPoint {
    /// Moment order
    pub q: f64,
    /// Mass exponent τ(q)
    pub tau: f64,
    /// Singularity strength α(q)
    pub alpha: f64,
    /// Singularity dimension f(α(q))
    pub f_alpha: f64,
}

/// Spectrum points ordered by ascending q.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultifractalSpectrum {
    /// Points, ascending in q
    pub points: Vec<SpectrumPoint>,
}

impl MultifractalSpectrum {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Moment orders, ascending.
    pub fn q_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.q).collect()
    }

    /// τ(q) values.
    pub fn tau(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tau).collect()
    }

    /// α(q) values.
    pub fn alpha(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.alpha).collect()
    }

    /// f(α) values.
    pub fn f_alpha(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.f_alpha).collect()
    }
}

/// Build the singularity spectrum from h(q) records in any order.
///
/// # Errors
/// - `InsufficientData` for fewer than two records
/// - `InvalidParameter` for repeated or non-finite q
pub fn calculate_multifractal_spectrum(
    generalized_hurst: &[GeneralizedHurst],
) -> FractalResult<MultifractalSpectrum> {
    if generalized_hurst.len() < 2 {
        return Err(FractalAnalysisError::InsufficientData {
            required: 2,
            actual: generalized_hurst.len(),
        });
    }

    let mut sorted: Vec<(f64, f64)> = generalized_hurst.iter().map(|gh| (gh.q, gh.h)).collect();
    sorted.sort_by(|a, b| float_total_cmp(&a.0, &b.0));

    if let Some(&(q, _)) = sorted.iter().find(|(q, _)| !q.is_finite()) {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: "q".to_string(),
            value: q,
            constraint: "finite".to_string(),
        });
    }
    if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: "q".to_string(),
            value: pair[0].0,
            constraint: "distinct moment orders".to_string(),
        });
    }

    let q: Vec<f64> = sorted.iter().map(|&(q, _)| q).collect();
    let tau: Vec<f64> = sorted.iter().map(|&(q, h)| q * h - 1.0).collect();
    let alpha = tau_derivative(&q, &tau);

    let points = q
        .iter()
        .zip(&tau)
        .zip(&alpha)
        .map(|((&q, &tau), &alpha)| SpectrumPoint {
            q,
            tau,
            alpha,
            f_alpha: q * alpha - tau,
        })
        .collect();

    Ok(MultifractalSpectrum { points })
}

// dτ/dq; q strictly increasing, len >= 2
fn tau_derivative(q: &[f64], tau: &[f64]) -> Vec<f64> {
    let last = q.len() - 1;
    (0..=last)
        .map(|i| {
            let (lo, hi) = match i {
                0 => (0, 1),
                i if i == last => (last - 1, last),
                i => (i - 1, i + 1),
            };
            (tau[hi] - tau[lo]) / (q[hi] - q[lo])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn records(pairs: &[(f64, f64)]) -> Vec<GeneralizedHurst> {
        pairs
            .iter()
            .map(|&(q, h)| GeneralizedHurst { q, h, r_squared: 1.0 })
            .collect()
    }

    #[test]
    fn test_monofractal_spectrum_collapses() {
        // Constant h => τ linear => α = h everywhere, f(α) = 1
        let hq = records(&[(-2.0, 0.7), (-1.0, 0.7), (0.0, 0.7), (1.0, 0.7), (2.0, 0.7)]);
        let spectrum = calculate_multifractal_spectrum(&hq).unwrap();
        for point in &spectrum.points {
            assert_approx_eq!(point.alpha, 0.7, 1e-12);
            assert_approx_eq!(point.f_alpha, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_sorted_by_q_and_central_difference() {
        let hq = records(&[(1.0, 0.6), (-1.0, 0.8), (0.0, 0.7)]);
        let spectrum = calculate_multifractal_spectrum(&hq).unwrap();
        assert_eq!(spectrum.q_values(), vec![-1.0, 0.0, 1.0]);
        // τ = [-1.8, -1.0, -0.4]
        assert_approx_eq!(spectrum.points[0].tau, -1.8);
        assert_approx_eq!(spectrum.points[0].alpha, 0.8);
        assert_approx_eq!(spectrum.points[1].alpha, 0.7);
        assert_approx_eq!(spectrum.points[2].alpha, 0.6);
    }

    #[test]
    fn test_non_uniform_spacing() {
        let hq = records(&[(-1.0, 0.5), (0.5, 0.5), (3.0, 0.5)]);
        let spectrum = calculate_multifractal_spectrum(&hq).unwrap();
        for point in &spectrum.points {
            assert_approx_eq!(point.alpha, 0.5, 1e-12);
        }
    }

    #[test]
    fn test_two_points_share_slope() {
        let hq = records(&[(1.0, 0.6), (3.0, 0.4)]);
        let spectrum = calculate_multifractal_spectrum(&hq).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_approx_eq!(spectrum.points[0].alpha, spectrum.points[1].alpha);
    }

    #[test]
    fn test_too_few_points() {
        let result = calculate_multifractal_spectrum(&records(&[(2.0, 0.5)]));
        assert!(matches!(
            result,
            Err(FractalAnalysisError::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_duplicate_q() {
        let result =
            calculate_multifractal_spectrum(&records(&[(2.0, 0.5), (2.0, 0.6), (3.0, 0.4)]));
        assert!(matches!(result, Err(FractalAnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_legendre_identity_on_random_maps() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        for _ in 0..200 {
            let len = rng.gen_range(2..15);
            let mut q = -5.0;
            let pairs: Vec<(f64, f64)> = (0..len)
                .map(|_| {
                    q += rng.gen_range(0.1..2.0);
                    (q, rng.gen_range(-1.0..2.0))
                })
                .collect();
            let spectrum = calculate_multifractal_spectrum(&records(&pairs)).unwrap();
            for p in &spectrum.points {
                let expected = p.q * p.alpha - p.tau;
                assert!((p.f_alpha - expected).abs() <= 1e-12 * (1.0 + expected.abs()));
            }
        }
    }
}
