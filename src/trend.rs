//! Trend and momentum indicators: simple moving averages, the trend factor
//! and Wilder's RSI.
//!
//! These are independent of the fractal machinery and only meet it in
//! [`crate::signal`]. Their failures are preconditions on the requested
//! periods, so they propagate to the caller unchanged.

use crate::errors::{FractalAnalysisError, FractalResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RSI above which momentum is labelled a strong uptrend.
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI below which momentum is labelled a strong downtrend.
pub const RSI_OVERSOLD: f64 = 30.0;
/// Open band `(40, 60)` labelled flat.
pub const RSI_FLAT_BAND: (f64, f64) = (40.0, 60.0);

/// Coarse momentum label derived from an RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RsiRegime {
    /// RSI > 70
    StrongUptrend,
    /// RSI < 30
    StrongDowntrend,
    /// 40 < RSI < 60
    Flat,
    /// Anything else
    Neutral,
}

impl RsiRegime {
    /// Label an RSI value.
    pub fn classify(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            Self::StrongUptrend
        } else if rsi < RSI_OVERSOLD {
            Self::StrongDowntrend
        } else if rsi > RSI_FLAT_BAND.0 && rsi < RSI_FLAT_BAND.1 {
            Self::Flat
        } else {
            Self::Neutral
        }
    }
}

fn check_period(period: usize, name: &str) -> FractalResult<()> {
    if period == 0 {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    Ok(())
}

/// Simple moving average sliding one step at a time.
///
/// Returns `len - period + 1` values; value `i` is the mean of
/// `series[i..i + period]`.
///
/// # Errors
/// - `InvalidParameter` for a zero period
/// - `InsufficientData` when the series is shorter than the period
pub fn simple_moving_average(period: usize, series: &[f64]) -> FractalResult<Vec<f64>> {
    check_period(period, "sma_period")?;
    if series.len() < period {
        return Err(FractalAnalysisError::InsufficientData {
            required: period,
            actual: series.len(),
        });
    }

    let p = period as f64;
    let mut sum: f64 = series[..period].iter().sum();
    let mut averages = Vec::with_capacity(series.len() - period + 1);
    averages.push(sum / p);
    for i in period..series.len() {
        sum += series[i] - series[i - period];
        averages.push(sum / p);
    }
    Ok(averages)
}

/// Relative distance of the latest short average from the latest long one:
/// `(short − long) / long`.
///
/// # Errors
/// - `EmptyInput` if either sequence is empty
/// - `NumericalError` if the latest long average is zero
pub fn trend_factor(short_sma: &[f64], long_sma: &[f64]) -> FractalResult<f64> {
    let (Some(&short), Some(&long)) = (short_sma.last(), long_sma.last()) else {
        return Err(FractalAnalysisError::empty("trend factor"));
    };
    if long == 0.0 {
        return Err(FractalAnalysisError::numerical(
            "latest long moving average is zero",
            "trend_factor",
        ));
    }
    Ok((short - long) / long)
}

/// Wilder's relative strength index.
///
/// Average gain and loss are seeded with the plain mean of the first `period`
/// changes, then rolled forward as `avg = (avg·(period−1) + change)/period`.
/// Output `k` is the RSI after change `period + k`, so there are
/// `len - period` values.
///
/// # Errors
/// - `InvalidParameter` for a zero period
/// - `InsufficientData` when `len < period + 1`
pub fn relative_strength_index(period: usize, series: &[f64]) -> FractalResult<Vec<f64>> {
    check_period(period, "rsi_period")?;
    if series.len() < period + 1 {
        return Err(FractalAnalysisError::InsufficientData {
            required: period + 1,
            actual: series.len(),
        });
    }

    let changes: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let (mut avg_gain, mut avg_loss) = changes[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &c| (g + c.max(0.0), l + (-c).max(0.0)));
    avg_gain /= p;
    avg_loss /= p;

    let mut values = Vec::with_capacity(changes.len() - period + 1);
    values.push(rsi_from_averages(avg_gain, avg_loss));
    for &change in &changes[period..] {
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }
    Ok(values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            50.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
