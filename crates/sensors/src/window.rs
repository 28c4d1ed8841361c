//! Calibrated Sliding Window

use crate::error::SensorError;
use std::collections::VecDeque;

/// Default number of readings kept per sensor
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Fixed-capacity FIFO of calibrated readings, oldest first
#[derive(Debug, Clone)]
pub struct SensorWindow {
    /// Stored readings (calibration already applied)
    readings: VecDeque<f64>,
    /// Maximum number of readings kept
    capacity: usize,
    /// Bias added to every raw reading before storage
    calibration_offset: f64,
}

impl SensorWindow {
    /// Create a new window with the given capacity and calibration offset
    pub fn new(capacity: usize, calibration_offset: f64) -> Result<Self, SensorError> {
        if capacity == 0 {
            return Err(SensorError::InvalidWindowSize(capacity));
        }
        if !calibration_offset.is_finite() {
            return Err(SensorError::NonFiniteCalibration(calibration_offset));
        }
        Ok(Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
            calibration_offset,
        })
    }

    /// Push a raw reading, returning the calibrated value that was stored.
    ///
    /// The oldest reading is evicted once the window is full. A reading that
    /// is non-finite before or after calibration is rejected and leaves the
    /// window untouched.
    pub fn push(&mut self, value: f64) -> Result<f64, SensorError> {
        let calibrated = value + self.calibration_offset;
        if !calibrated.is_finite() {
            return Err(SensorError::NonFiniteReading {
                value,
                offset: self.calibration_offset,
            });
        }
        if self.readings.len() >= self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(calibrated);
        Ok(calibrated)
    }

    /// Arithmetic mean of the stored readings, 0.0 when empty.
    ///
    /// The sum is carried with a compensation term and divided with its
    /// remainder, so the result is rounded close to once (`[0.3, 0.2, 0.1]`
    /// averages to exactly `0.2`). Large readings never overflow the mean.
    pub fn average(&self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        let n = self.readings.len() as f64;

        let (sum, compensation) = compensated_sum(self.readings.iter().copied());
        if sum.is_finite() {
            let quotient = sum / n;
            let remainder = (-quotient).mul_add(n, sum);
            return quotient + (remainder + compensation) / n;
        }

        // Sum overflowed: scale each term first, bounded by the largest reading
        let (scaled, compensation) = compensated_sum(self.readings.iter().map(|v| v / n));
        scaled + compensation
    }

    /// Number of readings currently stored
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if no reading has been stored yet
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Check if the next push will evict a reading
    pub fn is_full(&self) -> bool {
        self.readings.len() == self.capacity
    }

    /// Maximum number of readings kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }

    /// Stored readings, oldest first
    pub fn readings(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().copied()
    }

    /// Most recent stored reading
    pub fn latest(&self) -> Option<f64> {
        self.readings.back().copied()
    }
}

/// Neumaier summation, returning the rounded sum and its lost low-order part
fn compensated_sum(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    (sum, compensation)
}

impl Default for SensorWindow {
    fn default() -> Self {
        Self {
            readings: VecDeque::with_capacity(DEFAULT_WINDOW_SIZE),
            capacity: DEFAULT_WINDOW_SIZE,
            calibration_offset: 0.0,
        }
    }
}
