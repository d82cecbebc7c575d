//! Fractal Dimension Indicator (FDI).
//!
//! Reduces a singularity spectrum to three shape descriptors and one weighted
//! scalar:
//!
//! - **width**: `max α − min α`
//! - **asymmetry**: bias-corrected sample skewness of f(α)
//! - **curvature**: mean of `|τ''| / (1 + τ'²)^1.5` over interior q
//!
//! `FDI = 0.4·width + 0.3·|asymmetry| + 0.3·curvature`.

use crate::errors::{FractalAnalysisError, FractalResult};
use crate::math_utils::{min_max, sample_skewness};
use crate::spectrum::MultifractalSpectrum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights of (width, |asymmetry|, curvature) in the composite indicator.
pub const FDI_WEIGHTS: (f64, f64, f64) = (0.4, 0.3, 0.3);

/// Shape descriptors of one spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FdiTriple {
    /// Spectrum width in α
    pub width: f64,
    /// Skewness of f(α)
    pub asymmetry: f64,
    /// Mean curvature of τ(q)
    pub curvature: f64,
}

impl FdiTriple {
    /// Weighted composite of the three descriptors.
    pub fn composite(&self) -> f64 {
        let (w_width, w_asym, w_curv) = FDI_WEIGHTS;
        w_width * self.width + w_asym * self.asymmetry.abs() + w_curv * self.curvature
    }
}

/// Descriptors plus composite indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fdi {
    /// Shape descriptors
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub triple: FdiTriple,
    /// Composite indicator
    pub value: f64,
}

impl From<FdiTriple> for Fdi {
    fn from(triple: FdiTriple) -> Self {
        Self {
            triple,
            value: triple.composite(),
        }
    }
}

/// Descriptors min-max normalized across a sequence, plus their composite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedFdi {
    /// Normalized descriptors, each in [0, 1]
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub triple: FdiTriple,
    /// Composite of the normalized descriptors
    pub value: f64,
}

/// Compute the FDI of a spectrum.
///
/// An empty spectrum yields all-zero descriptors.
pub fn calculate_fdi(spectrum: &MultifractalSpectrum) -> Fdi {
    let alpha = spectrum.alpha();
    let width = min_max(&alpha).map_or(0.0, |(lo, hi)| hi - lo);
    let asymmetry = sample_skewness(&spectrum.f_alpha());
    let curvature = tau_curvature(&spectrum.q_values(), &spectrum.tau());

    Fdi::from(FdiTriple {
        width,
        asymmetry,
        curvature,
    })
}

/// Mean discrete curvature `|τ''| / (1 + τ'²)^1.5` over interior points.
///
/// Derivatives are central differences on a possibly non-uniform q grid.
/// Points with a zero or non-finite denominator are skipped; fewer than three
/// points, or no usable point, gives 0.
pub fn tau_curvature(q: &[f64], tau: &[f64]) -> f64 {
    if q.len() < 3 || q.len() != tau.len() {
        return 0.0;
    }

    let values: Vec<f64> = (1..q.len() - 1)
        .filter_map(|i| {
            let h_left = q[i] - q[i - 1];
            let h_right = q[i + 1] - q[i];
            let span = q[i + 1] - q[i - 1];

            let first = (tau[i + 1] - tau[i - 1]) / span;
            let second =
                2.0 * ((tau[i + 1] - tau[i]) / h_right - (tau[i] - tau[i - 1]) / h_left) / span;

            let denominator = (1.0 + first * first).powf(1.5);
            if denominator == 0.0 || !denominator.is_finite() {
                return None;
            }
            let kappa = second.abs() / denominator;
            kappa.is_finite().then_some(kappa)
        })
        .collect();

    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Min-max normalize each descriptor independently across `series`.
///
/// A descriptor with no spread normalizes to 0 for every entry.
///
/// # Errors
/// `EmptyInput` for an empty sequence.
pub fn normalize_fdi_series(series: &[FdiTriple]) -> FractalResult<Vec<NormalizedFdi>> {
    if series.is_empty() {
        return Err(FractalAnalysisError::empty("FDI normalization"));
    }

    let width = normalize(&series.iter().map(|t| t.width).collect::<Vec<_>>());
    let asymmetry = normalize(&series.iter().map(|t| t.asymmetry).collect::<Vec<_>>());
    let curvature = normalize(&series.iter().map(|t| t.curvature).collect::<Vec<_>>());

    Ok(width
        .into_iter()
        .zip(asymmetry)
        .zip(curvature)
        .map(|((width, asymmetry), curvature)| {
            let triple = FdiTriple {
                width,
                asymmetry,
                curvature,
            };
            NormalizedFdi {
                triple,
                value: triple.composite(),
            }
        })
        .collect())
}

fn normalize(values: &[f64]) -> Vec<f64> {
    match min_max(values) {
        Some((lo, hi)) if hi > lo => values.iter().map(|v| (v - lo) / (hi - lo)).collect(),
        _ => vec![0.0; values.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mfdfa::GeneralizedHurst;
    use crate::spectrum::calculate_multifractal_spectrum;
    use assert_approx_eq::assert_approx_eq;

    fn spectrum_from(pairs: &[(f64, f64)]) -> MultifractalSpectrum {
        let hq: Vec<GeneralizedHurst> = pairs
            .iter()
            .map(|&(q, h)| GeneralizedHurst { q, h, r_squared: 1.0 })
            .collect();
        calculate_multifractal_spectrum(&hq).unwrap()
    }

    #[test]
    fn test_monofractal_fdi_is_zero() {
        let spectrum =
            spectrum_from(&[(-2.0, 0.5), (-1.0, 0.5), (0.0, 0.5), (1.0, 0.5), (2.0, 0.5)]);
        let fdi = calculate_fdi(&spectrum);
        assert_approx_eq!(fdi.triple.width, 0.0, 1e-12);
        // f(α) is constant 1 => zero variance => asymmetry 0
        assert_approx_eq!(fdi.triple.asymmetry, 0.0, 1e-9);
        // τ is linear => τ'' = 0
        assert_approx_eq!(fdi.triple.curvature, 0.0, 1e-12);
        assert_approx_eq!(fdi.value, 0.0, 1e-9);
    }

    #[test]
    fn test_width_and_composite() {
        let spectrum =
            spectrum_from(&[(-2.0, 0.9), (-1.0, 0.8), (0.0, 0.7), (1.0, 0.6), (2.0, 0.5)]);
        let fdi = calculate_fdi(&spectrum);
        let alpha = spectrum.alpha();
        let (lo, hi) = min_max(&alpha).unwrap();
        assert_approx_eq!(fdi.triple.width, hi - lo);
        assert!(fdi.triple.width > 0.0);
        let expected = 0.4 * fdi.triple.width
            + 0.3 * fdi.triple.asymmetry.abs()
            + 0.3 * fdi.triple.curvature;
        assert_approx_eq!(fdi.value, expected);
    }

    #[test]
    fn test_curvature_of_parabola() {
        // τ = q² at q = -1, 0, 1: τ' = 0, τ'' = 2 at the interior point
        assert_approx_eq!(tau_curvature(&[-1.0, 0.0, 1.0], &[1.0, 0.0, 1.0]), 2.0);
    }

    #[test]
    fn test_curvature_non_uniform_grid() {
        // τ = q² on a non-uniform grid still has τ'' = 2, τ' = 2q
        let q = [0.0, 1.0, 3.0];
        let tau: Vec<f64> = q.iter().map(|v| v * v).collect();
        // interior q = 1: central τ' = (9 - 0) / 3 = 3
        let expected = 2.0 / (1.0f64 + 9.0).powf(1.5);
        assert_approx_eq!(tau_curvature(&q, &tau), expected, 1e-12);
    }

    #[test]
    fn test_curvature_short_input() {
        assert_eq!(tau_curvature(&[0.0, 1.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_normalize_series() {
        let series = vec![
            FdiTriple {
                width: 1.0,
                asymmetry: -1.0,
                curvature: 5.0,
            },
            FdiTriple {
                width: 3.0,
                asymmetry: 1.0,
                curvature: 5.0,
            },
            FdiTriple {
                width: 2.0,
                asymmetry: 0.0,
                curvature: 5.0,
            },
        ];
        let normalized = normalize_fdi_series(&series).unwrap();
        assert_eq!(normalized.len(), 3);
        assert_approx_eq!(normalized[0].triple.width, 0.0);
        assert_approx_eq!(normalized[1].triple.width, 1.0);
        assert_approx_eq!(normalized[2].triple.width, 0.5);
        assert_approx_eq!(normalized[2].triple.asymmetry, 0.5);
        // No spread in curvature
        assert!(normalized.iter().all(|n| n.triple.curvature == 0.0));
        assert_approx_eq!(normalized[1].value, 0.4 * 1.0 + 0.3 * 1.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let series = vec![
            FdiTriple {
                width: 0.0,
                asymmetry: 1.0,
                curvature: 0.25,
            },
            FdiTriple {
                width: 1.0,
                asymmetry: 0.0,
                curvature: 1.0,
            },
            FdiTriple {
                width: 0.3,
                asymmetry: 0.6,
                curvature: 0.0,
            },
        ];
        let once = normalize_fdi_series(&series).unwrap();
        let triples: Vec<FdiTriple> = once.iter().map(|n| n.triple).collect();
        assert_eq!(triples, series);
        let twice = normalize_fdi_series(&triples).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_single_entry_is_zero() {
        let normalized = normalize_fdi_series(&[FdiTriple {
            width: 2.0,
            asymmetry: 0.5,
            curvature: 1.0,
        }])
        .unwrap();
        assert_eq!(normalized[0], NormalizedFdi::default());
    }

    #[test]
    fn test_normalize_empty() {
        assert!(matches!(
            normalize_fdi_series(&[]),
            Err(FractalAnalysisError::EmptyInput { .. })
        ));
    }
}
