//! Sensor Monitoring Core
//!
//! Provides calibrated sliding-window sensors and the alert rules for each
//! sensor kind (temperature, vibration, seismic, volcanic).

mod error;
mod rules;
mod sensor;
mod window;

pub use error::SensorError;
pub use rules::{AlertRule, SeismicRule, SensorKind, TemperatureRule, VibrationRule, VolcanicRule};
pub use sensor::{Sensor, SensorSpec, SharedSensor};
pub use window::{SensorWindow, DEFAULT_WINDOW_SIZE};
