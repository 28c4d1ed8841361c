//! Sensors and Shared Sensor Handles

use crate::error::SensorError;
use crate::rules::{AlertRule, SeismicRule, SensorKind, TemperatureRule, VibrationRule, VolcanicRule};
use crate::window::{SensorWindow, DEFAULT_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// A monitored sensor: identifier, calibrated window and alert rule
#[derive(Debug, Clone)]
pub struct Sensor {
    id: String,
    window: SensorWindow,
    kind: SensorKind,
}

impl Sensor {
    /// Create a sensor with the default window (5 readings, no calibration)
    pub fn new(id: impl Into<String>, kind: impl Into<SensorKind>) -> Result<Self, SensorError> {
        let kind = kind.into();
        kind.validate()?;
        Ok(Self {
            id: id.into(),
            window: SensorWindow::default(),
            kind,
        })
    }

    /// Temperature sensor alerting at `average >= threshold`
    pub fn temperature(id: impl Into<String>, threshold: f64) -> Result<Self, SensorError> {
        Self::new(id, TemperatureRule { threshold })
    }

    /// Vibration sensor alerting at `|average| >= rms_threshold`
    pub fn vibration(id: impl Into<String>, rms_threshold: f64) -> Result<Self, SensorError> {
        Self::new(id, VibrationRule { rms_threshold })
    }

    /// Seismic sensor alerting at `average >= magnitude_threshold`
    pub fn seismic(id: impl Into<String>, magnitude_threshold: f64) -> Result<Self, SensorError> {
        Self::new(id, SeismicRule { magnitude_threshold })
    }

    /// Volcanic sensor alerting when the average crosses either threshold
    pub fn volcanic(
        id: impl Into<String>,
        temperature_threshold: f64,
        gas_threshold: f64,
    ) -> Result<Self, SensorError> {
        Self::new(
            id,
            VolcanicRule {
                temperature_threshold,
                gas_threshold,
            },
        )
    }

    /// Replace the window with an empty one of the given size
    pub fn with_window_size(mut self, window_size: usize) -> Result<Self, SensorError> {
        self.window = SensorWindow::new(window_size, self.window.calibration_offset())?;
        Ok(self)
    }

    /// Replace the window with an empty one using the given calibration offset
    pub fn with_calibration(mut self, offset: f64) -> Result<Self, SensorError> {
        self.window = SensorWindow::new(self.window.capacity(), offset)?;
        Ok(self)
    }

    /// Ingest a raw reading; returns the calibrated value stored
    pub fn record(&mut self, value: f64) -> Result<f64, SensorError> {
        let stored = self.window.push(value).inspect_err(|error| {
            warn!(sensor = %self.id, value, %error, "Rejected reading");
        })?;
        debug!(
            sensor = %self.id,
            raw = value,
            stored,
            len = self.window.len(),
            "Reading recorded"
        );
        Ok(stored)
    }

    /// Mean of the current window, 0.0 when empty
    pub fn average(&self) -> f64 {
        self.window.average()
    }

    /// Evaluate the kind's alert rule against the current average
    pub fn is_in_alert(&self) -> bool {
        self.kind.is_in_alert(self.average())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &SensorKind {
        &self.kind
    }

    pub fn window(&self) -> &SensorWindow {
        &self.window
    }
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

/// Declarative sensor description, as found in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Sensor identifier
    pub id: String,
    /// Number of readings averaged (default: 5)
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Offset added to every raw reading (default: 0.0)
    #[serde(default)]
    pub calibration: f64,
    /// Kind and thresholds
    #[serde(flatten)]
    pub kind: SensorKind,
}

impl SensorSpec {
    /// Build the described sensor
    pub fn build(&self) -> Result<Sensor, SensorError> {
        Sensor::new(self.id.clone(), self.kind)?
            .with_window_size(self.window_size)?
            .with_calibration(self.calibration)
    }
}

/// Cloneable handle to one live sensor.
///
/// Clones share the same instance, so readings recorded through one handle
/// are seen by every holder. Each read-side call observes a consistent
/// snapshot of the window.
#[derive(Debug, Clone)]
pub struct SharedSensor {
    id: Arc<str>,
    inner: Arc<RwLock<Sensor>>,
}

impl SharedSensor {
    pub fn new(sensor: Sensor) -> Self {
        Self {
            id: Arc::from(sensor.id()),
            inner: Arc::new(RwLock::new(sensor)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ingest a raw reading under the write lock
    pub fn record(&self, value: f64) -> Result<f64, SensorError> {
        // A panic in another holder cannot leave the window half-updated
        let mut sensor = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        sensor.record(value)
    }

    /// Run `f` against a consistent snapshot of the sensor
    pub fn read<R>(&self, f: impl FnOnce(&Sensor) -> R) -> R {
        let sensor = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&sensor)
    }

    pub fn average(&self) -> f64 {
        self.read(Sensor::average)
    }

    pub fn is_in_alert(&self) -> bool {
        self.read(Sensor::is_in_alert)
    }

    /// Whether both handles point at the same sensor instance
    pub fn ptr_eq(&self, other: &SharedSensor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Sensor> for SharedSensor {
    fn from(sensor: Sensor) -> Self {
        Self::new(sensor)
    }
}
