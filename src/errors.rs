//! Error types and validation functions for fractal signal analysis.
//!
//! Every fallible operation in the crate returns [`FractalResult`]. Errors that
//! happen inside a single MF-DFA segment or scale are absorbed by the engine;
//! everything else surfaces here.

use std::sync::Arc;
use thiserror::Error;

/// Error types for fractal signal operations.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum FractalAnalysisError {
    /// The input series has no values at all.
    #[error("Empty input: {context} requires at least one value")]
    EmptyInput {
        /// What was being computed
        context: String,
    },

    /// Insufficient data for the requested period, window or estimator.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Too few usable scales remained for the log-log regression.
    #[error("Insufficient scales: need at least {required} usable scales, got {actual}")]
    InsufficientScales {
        /// Minimum number of scales for the regression
        required: usize,
        /// Scales that survived filtering
        actual: usize,
    },

    /// Invalid parameter value for analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Numerical computation error (singular fit, unguarded division by zero).
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Sliding window larger than the series.
    #[error("Window too large: window size {window} exceeds series length {length}")]
    WindowTooLarge {
        /// Requested window size
        window: usize,
        /// Length of the series
        length: usize,
    },

    /// A single window of the sliding analysis failed.
    #[error("Window starting at offset {offset} failed: {source}")]
    WindowFailed {
        /// Start offset of the failing window
        offset: usize,
        /// Underlying failure
        #[source]
        source: Box<FractalAnalysisError>,
    },

    /// The caller cancelled a sliding-window run between windows.
    #[error("Sliding window analysis cancelled after {completed} windows")]
    Cancelled {
        /// Windows completed before cancellation was observed
        completed: usize,
    },

    /// The price source has no data for an instrument.
    #[error("Instrument not found: {instrument_id}")]
    InstrumentNotFound {
        /// Opaque instrument key
        instrument_id: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization failed: {format}")]
    SerializationError {
        /// Format that failed (JSON, ...)
        format: String,
    },

    /// I/O operation error.
    #[error("I/O operation failed: {operation}")]
    IoError {
        /// I/O operation that failed
        operation: String,
        /// Underlying error if available
        #[source]
        source: Option<Arc<std::io::Error>>,
    },
}

impl FractalAnalysisError {
    pub(crate) fn numerical(reason: impl Into<String>, operation: &str) -> Self {
        Self::NumericalError {
            reason: reason.into(),
            operation: Some(operation.to_string()),
        }
    }

    pub(crate) fn empty(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }
}

/// Result type for fractal signal operations.
pub type FractalResult<T> = Result<T, FractalAnalysisError>;

/// Validates that data has sufficient length for analysis.
///
/// Empty data reports [`FractalAnalysisError::EmptyInput`] so callers can tell a
/// missing series apart from a short one.
///
/// # Example
/// ```rust
/// use fractal_signal::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "test").is_ok());
/// assert!(validate_data_length(&data, 5, "test").is_err());
/// ```
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    operation: &str,
) -> FractalResult<()> {
    if data.is_empty() && min_required > 0 {
        return Err(FractalAnalysisError::empty(operation));
    }

    if data.len() < min_required {
        Err(FractalAnalysisError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (inclusive).
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> FractalResult<()> {
    if value.is_nan() || value < min || value > max {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        });
    }
    Ok(())
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, reporting its index.
///
/// # Example
/// ```rust
/// use fractal_signal::errors::validate_all_finite;
///
/// assert!(validate_all_finite(&[1.0, 2.0, 3.0], "prices").is_ok());
/// assert!(validate_all_finite(&[1.0, f64::NAN, 3.0], "prices").is_err());
/// ```
pub fn validate_all_finite(data: &[f64], name: &str) -> FractalResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(FractalAnalysisError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
            operation: None,
        });
    }

    Ok(())
}

/// Validates a closing-price series: non-empty, finite and strictly positive.
pub fn validate_price_series(prices: &[f64]) -> FractalResult<()> {
    if prices.is_empty() {
        return Err(FractalAnalysisError::empty("price series"));
    }
    validate_all_finite(prices, "price series")?;

    if let Some((i, &price)) = prices.iter().enumerate().find(|(_, &p)| p <= 0.0) {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: format!("prices[{}]", i),
            value: price,
            constraint: "> 0".to_string(),
        });
    }
    Ok(())
}
