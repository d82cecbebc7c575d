//! Multifractal Detrended Fluctuation Analysis (MF-DFA).
//!
//! For every scale s on the ladder the integrated profile is cut into
//! `floor(N/s)` segments from the start and another `floor(N/s)` from the end,
//! so the tail is covered when N is not a multiple of s. Each segment is
//! detrended with a polynomial and contributes its mean squared residual
//! F²(ν, s). The q-th order fluctuation function is
//!
//! - `F_q(s) = (mean(F²^(q/2)))^(1/q)` for q ≠ 0
//! - `F_0(s) = exp(0.5 · mean(ln F²))` over segments with F² > 0
//!
//! and h(q) is the OLS slope of ln F_q(s) against ln s.
//!
//! Failures are absorbed as locally as possible: a segment whose fit is
//! singular is dropped, a scale without usable segments (or with a non-finite
//! F_q for some q) is dropped, and only fewer than two surviving scales fail the
//! call. Every q is regressed over the same surviving scales.

use crate::config::{AnalysisConfig, ScaleLadder};
use crate::detrending::{detrended_mean_square, residual_rms, MAX_DETREND_DEGREE};
use crate::errors::{validate_all_finite, validate_data_length, FractalAnalysisError, FractalResult};
use crate::math_utils::{float_ops, integrate_series, linear_regression};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fewest scales that make the log-log regression well posed.
pub const MIN_REGRESSION_SCALES: usize = 2;

/// Generalized Hurst exponent h(q) for one moment order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneralizedHurst {
    /// Moment order
    pub q: f64,
    /// Slope of ln F_q(s) against ln s
    pub h: f64,
    /// Goodness of the log-log fit
    pub r_squared: f64,
}

/// ln F_q(s) over the retained scales for one moment order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FluctuationFunction {
    /// Moment order
    pub q: f64,
    /// ln F_q(s), aligned with [`MfdfaResult::log_scales`]
    pub log_fluctuations: Vec<f64>,
}

/// Output of an MF-DFA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MfdfaResult {
    /// Scales that survived filtering, ascending
    pub scales: Vec<usize>,
    /// ln s for each retained scale
    pub log_scales: Vec<f64>,
    /// Fluctuation functions in the caller's q order
    pub fluctuations: Vec<FluctuationFunction>,
    /// h(q) in the caller's q order
    pub generalized_hurst: Vec<GeneralizedHurst>,
}

impl MfdfaResult {
    /// h(q) for a moment order, matched exactly.
    pub fn hurst_at(&self, q: f64) -> Option<f64> {
        self.generalized_hurst
            .iter()
            .find(|gh| gh.q == q)
            .map(|gh| gh.h)
    }
}

/// Run MF-DFA with the moment orders, ladder and degree from `config`.
pub fn perform_mfdfa_with_config(
    series: &[f64],
    config: &AnalysisConfig,
) -> FractalResult<MfdfaResult> {
    perform_mfdfa(series, &config.q_values, &config.scales, config.detrend_degree)
}

/// Estimate h(q) for every q in `q_values`.
///
/// # Errors
/// - `EmptyInput` / `InsufficientData` for series shorter than 2
/// - `InvalidParameter` for an empty q set, non-finite q, a bad ladder or a
///   degree above [`MAX_DETREND_DEGREE`]
/// - `InsufficientScales` when fewer than two scales survive
pub fn perform_mfdfa(
    series: &[f64],
    q_values: &[f64],
    ladder: &ScaleLadder,
    degree: usize,
) -> FractalResult<MfdfaResult> {
    validate_mfdfa_inputs(series, q_values, ladder, degree)?;

    let n = series.len();
    let profile = integrate_series(series);

    let mut scales = Vec::new();
    let mut log_scales = Vec::new();
    let mut log_fq: Vec<Vec<f64>> = vec![Vec::new(); q_values.len()];

    for scale in ladder.usable_scales(n) {
        let squared = segment_fluctuations(&profile, scale, degree);
        if squared.is_empty() {
            log::debug!("MF-DFA: scale {} has no usable segments, skipping", scale);
            continue;
        }

        match scale_log_fluctuations(&squared, q_values) {
            Some(logs) => {
                scales.push(scale);
                log_scales.push((scale as f64).ln());
                for (column, value) in log_fq.iter_mut().zip(logs) {
                    column.push(value);
                }
            }
            None => {
                log::debug!(
                    "MF-DFA: scale {} gives a non-finite fluctuation for some q, skipping",
                    scale
                );
            }
        }
    }

    if scales.len() < MIN_REGRESSION_SCALES {
        return Err(FractalAnalysisError::InsufficientScales {
            required: MIN_REGRESSION_SCALES,
            actual: scales.len(),
        });
    }

    let mut generalized_hurst = Vec::with_capacity(q_values.len());
    let mut fluctuations = Vec::with_capacity(q_values.len());
    for (&q, log_fluctuations) in q_values.iter().zip(log_fq) {
        let fit = linear_regression(&log_scales, &log_fluctuations)?;
        generalized_hurst.push(GeneralizedHurst {
            q,
            h: fit.slope,
            r_squared: fit.r_squared,
        });
        fluctuations.push(FluctuationFunction { q, log_fluctuations });
    }

    Ok(MfdfaResult {
        scales,
        log_scales,
        fluctuations,
        generalized_hurst,
    })
}

fn validate_mfdfa_inputs(
    series: &[f64],
    q_values: &[f64],
    ladder: &ScaleLadder,
    degree: usize,
) -> FractalResult<()> {
    validate_data_length(series, 2, "MF-DFA")?;
    validate_all_finite(series, "MF-DFA input")?;
    ladder.validate()?;

    if q_values.is_empty() {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: "q_values.len".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    validate_all_finite(q_values, "q_values")?;

    if degree > MAX_DETREND_DEGREE {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: "detrend_degree".to_string(),
            value: degree as f64,
            constraint: format!("<= {}", MAX_DETREND_DEGREE),
        });
    }
    Ok(())
}

/// F²(ν, s) for the forward and backward segments of `profile` at `scale`.
///
/// Segments whose polynomial fit fails are left out, so the result may be
/// shorter than `2 · floor(N/s)`, or empty.
pub fn segment_fluctuations(profile: &[f64], scale: usize, degree: usize) -> Vec<f64> {
    let n = profile.len();
    if scale == 0 {
        return Vec::new();
    }
    let num_segments = n / scale;

    let forward = (0..num_segments).map(|i| i * scale);
    let backward = (0..num_segments).map(|i| n - (i + 1) * scale);

    forward
        .chain(backward)
        .filter_map(|start| {
            let segment = &profile[start..start + scale];
            match detrended_mean_square(segment, degree) {
                Ok(f2) if f2.is_finite() => Some(f2),
                Ok(f2) => {
                    log::trace!("MF-DFA: non-finite F² {} at offset {}", f2, start);
                    None
                }
                Err(e) => {
                    log::trace!("MF-DFA: segment at offset {} skipped: {}", start, e);
                    None
                }
            }
        })
        .collect()
}

/// ln F_q(s) for every q at one scale, or `None` when any q gives a
/// non-finite or non-positive F_q. The scale is then dropped for all q.
fn scale_log_fluctuations(squared: &[f64], q_values: &[f64]) -> Option<Vec<f64>> {
    q_values
        .iter()
        .map(|&q| fluctuation_function(squared, q).and_then(float_ops::safe_ln))
        .collect()
}

/// q-th order fluctuation function from per-segment squared fluctuations.
///
/// Returns `None` when the moment cannot be formed (no segments, or for q = 0
/// no segment with positive F²).
pub fn fluctuation_function(squared: &[f64], q: f64) -> Option<f64> {
    if squared.is_empty() {
        return None;
    }

    if q == 0.0 {
        let logs: Vec<f64> = squared.iter().filter(|&&f2| f2 > 0.0).map(|f2| f2.ln()).collect();
        if logs.is_empty() {
            return None;
        }
        let mean_log = logs.iter().sum::<f64>() / logs.len() as f64;
        return Some((0.5 * mean_log).exp());
    }

    let mean_moment = squared.iter().map(|f2| f2.powf(q / 2.0)).sum::<f64>() / squared.len() as f64;
    let fq = mean_moment.powf(1.0 / q);
    fq.is_finite().then_some(fq)
}

/// Classic single-exponent DFA result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DfaResult {
    /// ln s for each retained scale
    pub log_scales: Vec<f64>,
    /// ln F(s), F(s) being the mean segment RMS
    pub log_fluctuations: Vec<f64>,
    /// DFA scaling exponent
    pub alpha: f64,
    /// Goodness of the log-log fit
    pub r_squared: f64,
}

/// Detrended fluctuation analysis with forward segments only.
///
/// F(s) is the mean of the per-segment residual RMS. Scale filtering and
/// failure rules match [`perform_mfdfa`].
pub fn perform_dfa(
    series: &[f64],
    ladder: &ScaleLadder,
    degree: usize,
) -> FractalResult<DfaResult> {
    validate_mfdfa_inputs(series, &[2.0], ladder, degree)?;

    let n = series.len();
    let profile = integrate_series(series);

    let mut log_scales = Vec::new();
    let mut log_fluctuations = Vec::new();

    for scale in ladder.usable_scales(n) {
        let rms: Vec<f64> = (0..n / scale)
            .filter_map(|i| residual_rms(&profile[i * scale..(i + 1) * scale], degree).ok())
            .collect();
        if rms.is_empty() {
            log::debug!("DFA: scale {} has no usable segments, skipping", scale);
            continue;
        }

        let mean_rms = rms.iter().sum::<f64>() / rms.len() as f64;
        if let Some(log_f) = float_ops::safe_ln(mean_rms) {
            log_scales.push((scale as f64).ln());
            log_fluctuations.push(log_f);
        }
    }

    if log_scales.len() < MIN_REGRESSION_SCALES {
        return Err(FractalAnalysisError::InsufficientScales {
            required: MIN_REGRESSION_SCALES,
            actual: log_scales.len(),
        });
    }

    let fit = linear_regression(&log_scales, &log_fluctuations)?;
    Ok(DfaResult {
        log_scales,
        log_fluctuations,
        alpha: fit.slope,
        r_squared: fit.r_squared,
    })
}
