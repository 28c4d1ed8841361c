//! Sensor Error Types

use thiserror::Error;

/// Errors raised while building sensors or ingesting readings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// Window must hold at least one reading
    #[error("Invalid window size {0}: must be at least 1")]
    InvalidWindowSize(usize),

    /// Calibration offset is NaN or infinite
    #[error("Calibration offset {0} is not finite")]
    NonFiniteCalibration(f64),

    /// Reading is NaN or infinite, before or after calibration
    #[error("Reading {value} is not finite with calibration offset {offset}")]
    NonFiniteReading { value: f64, offset: f64 },

    /// Threshold is NaN or infinite
    #[error("Threshold {field} = {value} is not finite")]
    NonFiniteThreshold { field: &'static str, value: f64 },
}
