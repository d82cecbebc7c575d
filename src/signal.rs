//! Signal composer: trend/momentum indicators and the fractal pipeline merged
//! into one immutable [`Signal`].
//!
//! ```text
//! prices ─┬─ SMA(short), SMA(long) ─ trend factor
//!         ├─ RSI ─ regime
//!         ├─ R/S Hurst
//!         └─ MF-DFA ─ spectrum ─ FDI
//! ```

use crate::config::AnalysisConfig;
use crate::errors::{validate_price_series, FractalResult};
use crate::fdi::{calculate_fdi, Fdi, NormalizedFdi};
use crate::hurst::estimate_hurst_rescaled_range;
use crate::mfdfa::{perform_mfdfa_with_config, MfdfaResult};
use crate::spectrum::{calculate_multifractal_spectrum, MultifractalSpectrum};
use crate::trend::{relative_strength_index, simple_moving_average, trend_factor, RsiRegime};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Composite trading signal for one price series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signal {
    /// Number of prices analysed
    pub sample_count: usize,
    /// Short simple moving average
    pub short_sma: Vec<f64>,
    /// Long simple moving average
    pub long_sma: Vec<f64>,
    /// `(short − long) / long` on the latest averages
    pub trend_factor: f64,
    /// Wilder RSI sequence
    pub rsi: Vec<f64>,
    /// Label of the latest RSI value
    pub rsi_regime: RsiRegime,
    /// Rescaled-range Hurst exponent of the whole series
    pub hurst: f64,
    /// MF-DFA fluctuation functions and h(q)
    pub mfdfa: MfdfaResult,
    /// Singularity spectrum
    pub spectrum: MultifractalSpectrum,
    /// Fractal dimension indicator
    pub fdi: Fdi,
    /// Cross-window normalized FDI; `None` for a single series
    pub normalized_fdi: Option<NormalizedFdi>,
}

/// Build the full signal for `prices`.
///
/// # Errors
/// - `InvalidParameter` for a bad config or a non-positive/non-finite price
/// - `EmptyInput` for an empty series
/// - `InsufficientData` when the series is shorter than an SMA or RSI period
/// - `InsufficientScales` / `NumericalError` from the MF-DFA stage
pub fn compose_signal(prices: &[f64], config: &AnalysisConfig) -> FractalResult<Signal> {
    config.validate()?;
    validate_price_series(prices)?;

    let short_sma = simple_moving_average(config.short_sma_period, prices)?;
    let long_sma = simple_moving_average(config.long_sma_period, prices)?;
    let trend_factor = trend_factor(&short_sma, &long_sma)?;

    let rsi = relative_strength_index(config.rsi_period, prices)?;
    let latest_rsi = rsi.last().copied().unwrap_or(50.0);
    let rsi_regime = RsiRegime::classify(latest_rsi);

    let hurst = estimate_hurst_rescaled_range(prices);
    let mfdfa = perform_mfdfa_with_config(prices, config)?;
    let spectrum = calculate_multifractal_spectrum(&mfdfa.generalized_hurst)?;
    let fdi = calculate_fdi(&spectrum);

    log::debug!(
        "signal: n={} trend={:.4} rsi={:.2} hurst={:.4} fdi={:.4} scales={}",
        prices.len(),
        trend_factor,
        latest_rsi,
        hurst,
        fdi.value,
        mfdfa.scales.len()
    );

    Ok(Signal {
        sample_count: prices.len(),
        short_sma,
        long_sma,
        trend_factor,
        rsi,
        rsi_regime,
        hurst,
        mfdfa,
        spectrum,
        fdi,
        normalized_fdi: None,
    })
}
