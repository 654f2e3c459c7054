//! Error types for gauge configuration and the window host.

use thiserror::Error;

/// Result type alias using [`GaugeError`].
pub type Result<T> = std::result::Result<T, GaugeError>;

/// Errors surfaced by the gauge.
///
/// Configuration errors are returned from [`crate::Gauge::new`] so a bad
/// setup fails at construction instead of producing garbled frames.
#[derive(Error, Debug)]
pub enum GaugeError {
    /// The value range is empty or inverted.
    #[error("invalid range: min {min} must be below max {max}")]
    InvalidRange {
        /// Configured minimum.
        min: i64,
        /// Configured maximum.
        max: i64,
    },

    /// Label spacing must be positive.
    #[error("invalid tick interval: {0} (must be > 0)")]
    InvalidTickInterval(i64),

    /// A layout length or size is not usable.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Font data was rejected.
    #[error("font error: {0}")]
    Font(String),

    /// Window creation or event loop failure.
    #[error("window error: {0}")]
    Window(String),

    /// Pixel surface failure.
    #[error("surface error: {0}")]
    Surface(String),
}

impl From<winit::error::EventLoopError> for GaugeError {
    fn from(err: winit::error::EventLoopError) -> Self {
        GaugeError::Window(err.to_string())
    }
}

impl From<winit::error::OsError> for GaugeError {
    fn from(err: winit::error::OsError) -> Self {
        GaugeError::Window(err.to_string())
    }
}

impl From<pixels::Error> for GaugeError {
    fn from(err: pixels::Error) -> Self {
        GaugeError::Surface(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = GaugeError::InvalidRange { min: 10, max: 10 };
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("invalid range"));
    }

    #[test]
    fn test_tick_interval_display() {
        let err = GaugeError::InvalidTickInterval(-5);
        assert!(err.to_string().contains("-5"));
    }
}
