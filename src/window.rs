//! Sliding-window analysis.
//!
//! The full single-series pipeline runs on every contiguous window
//! `series[i..i + W]`, `i` in `0..=N−W`, keeping each window's FDI and R/S
//! Hurst exponent. The FDI descriptors are then min-max normalized across all
//! windows. A failing window fails the whole call and reports its offset; no
//! window is ever skipped, so entry `k` always belongs to offset `k`.
//!
//! Cancellation is observed only between windows. With the `parallel`
//! feature windows are evaluated on the rayon pool and gathered back in
//! offset order, which yields the same result as the sequential loop.

use crate::config::AnalysisConfig;
use crate::errors::{FractalAnalysisError, FractalResult};
use crate::fdi::{normalize_fdi_series, Fdi, FdiTriple, NormalizedFdi};
use crate::signal::compose_signal;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowPoint {
    /// Start offset of the window in the input series
    pub offset: usize,
    /// FDI of the window
    pub fdi: Fdi,
    /// R/S Hurst exponent of the window
    pub hurst: f64,
}

/// Per-window results plus the cross-window normalized FDI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlidingWindowResult {
    /// Window size used
    pub window_size: usize,
    /// One entry per start offset, ascending
    pub windows: Vec<WindowPoint>,
    /// Normalized FDI aligned with `windows`
    pub normalized: Vec<NormalizedFdi>,
}

impl SlidingWindowResult {
    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True when there are no windows.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// FDI values in offset order.
    pub fn fdi_series(&self) -> Vec<Fdi> {
        self.windows.iter().map(|w| w.fdi).collect()
    }

    /// Hurst exponents in offset order.
    pub fn hurst_series(&self) -> Vec<f64> {
        self.windows.iter().map(|w| w.hurst).collect()
    }
}

/// Run the windowed analysis with `config.window_size`.
///
/// # Errors
/// - `InvalidParameter` for a bad config
/// - `WindowTooLarge` when the series is shorter than the window
/// - `WindowFailed` wrapping the first failing window's error
pub fn sliding_window_analysis(
    series: &[f64],
    config: &AnalysisConfig,
) -> FractalResult<SlidingWindowResult> {
    let never = AtomicBool::new(false);
    sliding_window_analysis_with_cancel(series, config, &never)
}

/// Same as [`sliding_window_analysis`], stopping with `Cancelled` once
/// `cancel` is observed set between two windows.
pub fn sliding_window_analysis_with_cancel(
    series: &[f64],
    config: &AnalysisConfig,
    cancel: &AtomicBool,
) -> FractalResult<SlidingWindowResult> {
    config.validate()?;

    let window = config.window_size;
    if series.len() < window {
        return Err(FractalAnalysisError::WindowTooLarge {
            window,
            length: series.len(),
        });
    }
    let count = series.len() - window + 1;
    log::debug!("sliding window: {} windows of size {}", count, window);

    let windows = evaluate_windows(series, config, count, cancel)?;

    let triples: Vec<FdiTriple> = windows.iter().map(|w| w.fdi.triple).collect();
    let normalized = normalize_fdi_series(&triples)?;

    Ok(SlidingWindowResult {
        window_size: window,
        windows,
        normalized,
    })
}

fn evaluate_window(
    series: &[f64],
    config: &AnalysisConfig,
    offset: usize,
) -> FractalResult<WindowPoint> {
    let slice = &series[offset..offset + config.window_size];
    compose_signal(slice, config)
        .map(|signal| WindowPoint {
            offset,
            fdi: signal.fdi,
            hurst: signal.hurst,
        })
        .map_err(|e| FractalAnalysisError::WindowFailed {
            offset,
            source: Box::new(e),
        })
}

#[cfg(not(feature = "parallel"))]
fn evaluate_windows(
    series: &[f64],
    config: &AnalysisConfig,
    count: usize,
    cancel: &AtomicBool,
) -> FractalResult<Vec<WindowPoint>> {
    let mut points = Vec::with_capacity(count);
    for offset in 0..count {
        if cancel.load(Ordering::Relaxed) {
            log::warn!("sliding window cancelled after {} of {} windows", offset, count);
            return Err(FractalAnalysisError::Cancelled { completed: offset });
        }
        points.push(evaluate_window(series, config, offset)?);
    }
    Ok(points)
}

#[cfg(feature = "parallel")]
fn evaluate_windows(
    series: &[f64],
    config: &AnalysisConfig,
    count: usize,
    cancel: &AtomicBool,
) -> FractalResult<Vec<WindowPoint>> {
    // None marks a window skipped after cancellation
    let slots: Vec<Option<FractalResult<WindowPoint>>> = (0..count)
        .into_par_iter()
        .map(|offset| {
            if cancel.load(Ordering::Relaxed) {
                None
            } else {
                Some(evaluate_window(series, config, offset))
            }
        })
        .collect();

    let mut points = Vec::with_capacity(count);
    let mut skipped = false;
    for slot in slots {
        match slot {
            Some(Ok(point)) => points.push(point),
            Some(Err(e)) => return Err(e),
            None => skipped = true,
        }
    }
    if skipped {
        log::warn!("sliding window cancelled after {} of {} windows", points.len(), count);
        return Err(FractalAnalysisError::Cancelled {
            completed: points.len(),
        });
    }
    Ok(points)
}
