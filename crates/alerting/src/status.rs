//! Shared Sensor Evaluation
//!
//! Both the alert manager and the emergency panel go through [`evaluate`],
//! so their view of a sensor's state cannot drift apart.

use sensors::{AlertRule, Sensor, SharedSensor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert state of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Alert,
}

impl AlertLevel {
    /// Status label used in alert text
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "NORMAL",
            AlertLevel::Alert => "ALERTA",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of one sensor's evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub sensor_id: String,
    pub average: f64,
    pub level: AlertLevel,
}

impl SensorStatus {
    pub fn is_alert(&self) -> bool {
        self.level == AlertLevel::Alert
    }

    /// Message fanned out by the alert manager
    pub fn alert_message(&self) -> String {
        format!(
            "ALERTA: Sensor {} en umbral (avg={:.2})",
            self.sensor_id, self.average
        )
    }

    /// Message sent by the emergency panel
    pub fn panel_message(&self) -> String {
        format!("ALERTA: {} en estado {}", self.sensor_id, self.level)
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor {}: {} (avg={:.2})",
            self.sensor_id, self.level, self.average
        )
    }
}

/// Evaluate a sensor's alert rule against its current average
pub fn evaluate(sensor: &Sensor) -> SensorStatus {
    // Average computed once so level and reported value agree
    let average = sensor.average();
    let level = if sensor.kind().is_in_alert(average) {
        AlertLevel::Alert
    } else {
        AlertLevel::Normal
    };
    SensorStatus {
        sensor_id: sensor.id().to_string(),
        average,
        level,
    }
}

/// Evaluate a shared sensor under a single read snapshot
pub(crate) fn evaluate_shared(sensor: &SharedSensor) -> SensorStatus {
    sensor.read(evaluate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_alert() {
        let mut sensor = Sensor::temperature("T-1", 80.0).unwrap();
        sensor.record(85.0).unwrap();
        sensor.record(90.0).unwrap();

        let status = evaluate(&sensor);
        assert_eq!(status.level, AlertLevel::Alert);
        assert_eq!(status.average, 87.5);
        assert_eq!(
            status.alert_message(),
            "ALERTA: Sensor T-1 en umbral (avg=87.50)"
        );
        assert_eq!(status.panel_message(), "ALERTA: T-1 en estado ALERTA");
        assert_eq!(status.to_string(), "Sensor T-1: ALERTA (avg=87.50)");
    }

    #[test]
    fn test_evaluate_normal() {
        let mut sensor = Sensor::vibration("V-1", 2.5).unwrap();
        sensor.record(1.0).unwrap();

        let status = evaluate(&sensor);
        assert!(!status.is_alert());
        assert_eq!(status.to_string(), "Sensor V-1: NORMAL (avg=1.00)");
    }

    #[test]
    fn test_evaluate_matches_sensor_predicate() {
        let mut sensor = Sensor::volcanic("VOL-1", 900.0, 50.0).unwrap();
        for v in [10.0, 40.0, 120.0] {
            sensor.record(v).unwrap();
            assert_eq!(evaluate(&sensor).is_alert(), sensor.is_in_alert());
            assert_eq!(
                evaluate(&sensor).is_alert(),
                sensor.kind().is_in_alert(sensor.average())
            );
        }
    }
}
