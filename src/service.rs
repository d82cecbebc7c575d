//! Collaborator seams around the analytics core.
//!
//! A [`PriceSource`] supplies chronological closing prices for an opaque
//! instrument key over a time range; a [`SignalSink`] consumes finished
//! reports. [`AnalysisService`] wires them together:
//! fetch → compose → sliding window → publish.
//!
//! # Example
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use fractal_signal::config::AnalysisConfig;
//! use fractal_signal::service::{
//!     AnalysisRequest, AnalysisService, InMemoryPriceSource, MemorySink, TimeRange,
//! };
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let mut source = InMemoryPriceSource::new();
//! let candles = (0..150).map(|i| {
//!     let price = 100.0 + (i as f64 * 0.3).sin() + i as f64 * 0.05;
//!     (start + Duration::hours(i), price)
//! });
//! source.add_candles("BBG000B9XRY4", candles);
//!
//! let config = AnalysisConfig::default()
//!     .with_sma_periods(10, 30)
//!     .with_window_size(120);
//! let request = AnalysisRequest {
//!     instrument_id: "BBG000B9XRY4".to_string(),
//!     range: TimeRange::new(start, start + Duration::hours(150)).unwrap(),
//!     config,
//! };
//!
//! let mut service = AnalysisService::new(source, MemorySink::default());
//! let report = service.run(&request).unwrap();
//! assert_eq!(report.signal.sample_count, 150);
//! assert_eq!(report.window.len(), 150 - 120 + 1);
//! assert_eq!(service.sink().reports().len(), 1);
//! ```

use crate::config::AnalysisConfig;
use crate::errors::{FractalAnalysisError, FractalResult};
use crate::signal::{compose_signal, Signal};
use crate::window::{sliding_window_analysis, SlidingWindowResult};
use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "serde")]
use std::io::Write;
#[cfg(feature = "serde")]
use std::sync::Arc;

/// Half-open time interval `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeRange {
    /// Inclusive start
    pub from: DateTime<Utc>,
    /// Exclusive end
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range, rejecting `to < from`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> FractalResult<Self> {
        if to < from {
            return Err(FractalAnalysisError::InvalidParameter {
                parameter: "range.to".to_string(),
                value: to.timestamp() as f64,
                constraint: format!(">= range.from ({})", from),
            });
        }
        Ok(Self { from, to })
    }

    /// True when `at` falls inside the range.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at < self.to
    }
}

/// Supplier of closing prices.
pub trait PriceSource {
    /// Closing prices for `instrument_id` inside `range`, oldest first.
    ///
    /// Unknown instruments report `InstrumentNotFound`.
    fn closing_prices(&self, instrument_id: &str, range: &TimeRange) -> FractalResult<Vec<f64>>;
}

/// Consumer of finished reports.
pub trait SignalSink {
    /// Hand one report to the consumer.
    fn publish(&mut self, report: &SignalReport) -> FractalResult<()>;
}

/// Price source backed by in-memory candles keyed by instrument.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    candles: BTreeMap<String, Vec<(DateTime<Utc>, f64)>>,
}

impl InMemoryPriceSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `(timestamp, close)` candles for an instrument.
    ///
    /// Candles are kept sorted by timestamp; returns true if the instrument
    /// was new.
    pub fn add_candles(
        &mut self,
        instrument_id: &str,
        candles: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
    ) -> bool {
        let is_new = !self.candles.contains_key(instrument_id);
        let entry = self.candles.entry(instrument_id.to_string()).or_default();
        entry.extend(candles);
        entry.sort_by_key(|&(at, _)| at);
        is_new
    }

    /// Instruments currently held.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.candles.keys().map(String::as_str)
    }
}

impl PriceSource for InMemoryPriceSource {
    fn closing_prices(&self, instrument_id: &str, range: &TimeRange) -> FractalResult<Vec<f64>> {
        let candles = self.candles.get(instrument_id).ok_or_else(|| {
            FractalAnalysisError::InstrumentNotFound {
                instrument_id: instrument_id.to_string(),
            }
        })?;
        Ok(candles
            .iter()
            .filter(|(at, _)| range.contains(*at))
            .map(|&(_, close)| close)
            .collect())
    }
}

/// One analysis job.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisRequest {
    /// Opaque instrument key, passed through untouched
    pub instrument_id: String,
    /// Time range of the closing prices
    pub range: TimeRange,
    /// Analysis parameters
    pub config: AnalysisConfig,
}

/// Everything produced for one request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalReport {
    /// Instrument the report belongs to
    pub instrument_id: String,
    /// Whole-series signal
    pub signal: Signal,
    /// Sliding-window FDI/Hurst series
    pub window: SlidingWindowResult,
}

/// Fetch → compose → window → publish.
#[derive(Debug)]
pub struct AnalysisService<P, S> {
    source: P,
    sink: S,
}

impl<P: PriceSource, S: SignalSink> AnalysisService<P, S> {
    /// Create a service from a source and a sink.
    pub fn new(source: P, sink: S) -> Self {
        Self { source, sink }
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the service, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one request and publish its report.
    ///
    /// Errors from fetching, composing or windowing abort before anything is
    /// published.
    pub fn run(&mut self, request: &AnalysisRequest) -> FractalResult<SignalReport> {
        let prices = self
            .source
            .closing_prices(&request.instrument_id, &request.range)?;
        log::info!(
            "analysing {}: {} closes from {} to {}",
            request.instrument_id,
            prices.len(),
            request.range.from,
            request.range.to
        );

        let signal = compose_signal(&prices, &request.config)?;
        let window = sliding_window_analysis(&prices, &request.config)?;

        let report = SignalReport {
            instrument_id: request.instrument_id.clone(),
            signal,
            window,
        };
        self.sink.publish(&report)?;
        Ok(report)
    }
}

/// Sink that keeps every published report.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Vec<SignalReport>,
}

impl MemorySink {
    /// Reports published so far, oldest first.
    pub fn reports(&self) -> &[SignalReport] {
        &self.reports
    }
}

impl SignalSink for MemorySink {
    fn publish(&mut self, report: &SignalReport) -> FractalResult<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Sink writing each report as one JSON document per line.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

#[cfg(feature = "serde")]
impl<W: Write> JsonSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(feature = "serde")]
impl<W: Write> SignalSink for JsonSink<W> {
    fn publish(&mut self, report: &SignalReport) -> FractalResult<()> {
        serde_json::to_writer(&mut self.writer, report).map_err(|e| {
            if e.is_io() {
                FractalAnalysisError::IoError {
                    operation: format!("write report for {}", report.instrument_id),
                    source: Some(Arc::new(std::io::Error::from(e))),
                }
            } else {
                FractalAnalysisError::SerializationError {
                    format: format!("JSON: {}", e),
                }
            }
        })?;
        writeln!(self.writer)
            .and_then(|_| self.writer.flush())
            .map_err(|e| FractalAnalysisError::IoError {
                operation: format!("write report for {}", report.instrument_id),
                source: Some(Arc::new(e)),
            })
    }
}
