//! # Analysis Configuration
//!
//! Every analysis call takes an immutable [`AnalysisConfig`]. Periods, moment
//! orders and the scale ladder vary per request, so nothing here is stored in a
//! long-lived analyzer.

use crate::detrending::{DEFAULT_DETREND_DEGREE, MAX_DETREND_DEGREE};
use crate::errors::{FractalAnalysisError, FractalResult};
use crate::math_utils::float_total_cmp;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arithmetic ladder of MF-DFA segment sizes, `min..=max` by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleLadder {
    /// Smallest segment size
    pub min: usize,
    /// Largest segment size (inclusive)
    pub max: usize,
    /// Increment between consecutive sizes
    pub step: usize,
}

impl Default for ScaleLadder {
    fn default() -> Self {
        Self {
            min: 10,
            max: 100,
            step: 10,
        }
    }
}

impl ScaleLadder {
    /// Create a ladder, validating it.
    pub fn new(min: usize, max: usize, step: usize) -> FractalResult<Self> {
        let ladder = Self { min, max, step };
        ladder.validate()?;
        Ok(ladder)
    }

    /// Check `1 <= min <= max` and `step >= 1`.
    pub fn validate(&self) -> FractalResult<()> {
        if self.min == 0 {
            return Err(invalid("scale_min", self.min as f64, ">= 1"));
        }
        if self.step == 0 {
            return Err(invalid("scale_step", self.step as f64, ">= 1"));
        }
        if self.max < self.min {
            return Err(invalid(
                "scale_max",
                self.max as f64,
                &format!(">= scale_min ({})", self.min),
            ));
        }
        Ok(())
    }

    /// Every scale on the ladder, ascending.
    pub fn scales(&self) -> impl Iterator<Item = usize> {
        (self.min..=self.max).step_by(self.step.max(1))
    }

    /// Scales leaving at least two whole segments in a series of length `n`.
    pub fn usable_scales(&self, n: usize) -> Vec<usize> {
        self.scales().filter(|&s| n / s >= 2).collect()
    }
}

/// Immutable parameters for one analysis request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Moment orders q for MF-DFA
    pub q_values: Vec<f64>,
    /// MF-DFA scale ladder
    pub scales: ScaleLadder,
    /// Polynomial degree used to detrend each segment
    pub detrend_degree: usize,
    /// Short simple moving average period
    pub short_sma_period: usize,
    /// Long simple moving average period
    pub long_sma_period: usize,
    /// Wilder RSI period
    pub rsi_period: usize,
    /// Sliding window size for the windowed analysis
    pub window_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            q_values: default_q_values(),
            scales: ScaleLadder::default(),
            detrend_degree: DEFAULT_DETREND_DEGREE,
            short_sma_period: 50,
            long_sma_period: 100,
            rsi_period: 14,
            window_size: 100,
        }
    }
}

/// The symmetric integer moment orders -5..=5.
pub fn default_q_values() -> Vec<f64> {
    (-5..=5).map(f64::from).collect()
}

impl AnalysisConfig {
    /// Replace the moment orders.
    pub fn with_q_values(mut self, q_values: Vec<f64>) -> Self {
        self.q_values = q_values;
        self
    }

    /// Replace the scale ladder.
    pub fn with_scales(mut self, scales: ScaleLadder) -> Self {
        self.scales = scales;
        self
    }

    /// Replace the detrending degree.
    pub fn with_detrend_degree(mut self, degree: usize) -> Self {
        self.detrend_degree = degree;
        self
    }

    /// Replace the short and long SMA periods.
    pub fn with_sma_periods(mut self, short: usize, long: usize) -> Self {
        self.short_sma_period = short;
        self.long_sma_period = long;
        self
    }

    /// Replace the RSI period.
    pub fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = period;
        self
    }

    /// Replace the sliding window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Validate every parameter.
    ///
    /// q values must be finite and distinct, with at least two of them so a
    /// spectrum can be differenced. Periods and the window must be non-zero.
    pub fn validate(&self) -> FractalResult<()> {
        if self.q_values.len() < 2 {
            return Err(invalid(
                "q_values.len",
                self.q_values.len() as f64,
                ">= 2 distinct moment orders",
            ));
        }
        if let Some(&q) = self.q_values.iter().find(|q| !q.is_finite()) {
            return Err(invalid("q", q, "finite"));
        }
        let mut sorted = self.q_values.clone();
        sorted.sort_by(float_total_cmp);
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(invalid("q", pair[0], "distinct moment orders"));
        }

        self.scales.validate()?;

        if self.detrend_degree > MAX_DETREND_DEGREE {
            return Err(invalid(
                "detrend_degree",
                self.detrend_degree as f64,
                &format!("<= {}", MAX_DETREND_DEGREE),
            ));
        }
        for (name, period) in [
            ("short_sma_period", self.short_sma_period),
            ("long_sma_period", self.long_sma_period),
            ("rsi_period", self.rsi_period),
        ] {
            if period == 0 {
                return Err(invalid(name, 0.0, ">= 1"));
            }
        }
        if self.window_size < 2 {
            return Err(invalid("window_size", self.window_size as f64, ">= 2"));
        }
        Ok(())
    }
}

fn invalid(parameter: &str, value: f64, constraint: &str) -> FractalAnalysisError {
    FractalAnalysisError::InvalidParameter {
        parameter: parameter.to_string(),
        value,
        constraint: constraint.to_string(),
    }
}
