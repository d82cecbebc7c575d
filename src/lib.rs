//! # Fractal Trading Signals
//!
//! Multifractal scaling analysis combined with classic trend and momentum
//! indicators for closing-price series.
//!
//! The engine estimates generalized Hurst exponents h(q) with Multifractal
//! Detrended Fluctuation Analysis (MF-DFA), turns them into a singularity
//! spectrum, summarises the spectrum's shape as a Fractal Dimension Indicator
//! (FDI) and re-applies the pipeline over sliding windows to get time-indexed
//! FDI and Hurst series.
//!
//! ## Key Features
//!
//! - **MF-DFA**: forward and backward segments, polynomial detrending, a
//!   log-domain q = 0 moment, and classic DFA
//! - **Singularity spectrum**: τ(q), α(q), f(α) by discrete Legendre transform
//! - **FDI**: width, asymmetry and curvature of the spectrum plus a weighted
//!   composite, with cross-window min-max normalization
//! - **Trend/momentum**: SMA, trend factor, Wilder RSI and an RSI regime label
//! - **Sliding windows**: optional rayon parallelism (`parallel` feature) and
//!   cooperative cancellation between windows
//! - **Service seams**: `PriceSource`/`SignalSink` traits with in-memory and
//!   JSON-lines implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use fractal_signal::{compose_signal, sliding_window_analysis, AnalysisConfig};
//! use fractal_signal::generators::{generate_price_path, GeneratorConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let prices = generate_price_path(
//!         &GeneratorConfig { length: 400, seed: Some(42) },
//!         100.0,
//!         0.0002,
//!         0.01,
//!     )?;
//!
//!     let config = AnalysisConfig::default();
//!     let signal = compose_signal(&prices, &config)?;
//!     println!(
//!         "trend {:.4}, H = {:.3}, FDI = {:.3} ({:?})",
//!         signal.trend_factor, signal.hurst, signal.fdi.value, signal.rsi_regime
//!     );
//!
//!     let windows = sliding_window_analysis(&prices, &config)?;
//!     assert_eq!(windows.len(), prices.len() - config.window_size + 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade (skipped segments and scales at
//! `trace`/`debug`, cancellations at `warn`, service runs at `info`) and never
//! installs a logger itself.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod math_utils;

// Analysis pipeline
pub mod detrending;
pub mod fdi;
pub mod hurst;
pub mod mfdfa;
pub mod signal;
pub mod spectrum;
pub mod trend;
pub mod window;

// Utilities and collaborators
pub mod generators;
pub mod price_fractals;
pub mod service;

// Re-exports for convenience - main public API
pub use config::{default_q_values, AnalysisConfig, ScaleLadder};
pub use errors::{FractalAnalysisError, FractalResult};

pub use fdi::{calculate_fdi, normalize_fdi_series, Fdi, FdiTriple, NormalizedFdi, FDI_WEIGHTS};
pub use hurst::estimate_hurst_rescaled_range;
pub use mfdfa::{
    perform_dfa, perform_mfdfa, perform_mfdfa_with_config, DfaResult, FluctuationFunction,
    GeneralizedHurst, MfdfaResult,
};
pub use signal::{compose_signal, Signal};
pub use spectrum::{calculate_multifractal_spectrum, MultifractalSpectrum, SpectrumPoint};
pub use trend::{relative_strength_index, simple_moving_average, trend_factor, RsiRegime};
pub use window::{
    sliding_window_analysis, sliding_window_analysis_with_cancel, SlidingWindowResult,
    WindowPoint,
};

pub use price_fractals::{box_counting_dimension, find_fractals, PriceFractals};
#[cfg(feature = "serde")]
pub use service::JsonSink;
pub use service::{
    AnalysisRequest, AnalysisService, InMemoryPriceSource, MemorySink, PriceSource, SignalReport,
    SignalSink, TimeRange,
};
