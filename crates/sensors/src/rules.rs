//! Alert Rules per Sensor Kind
//!
//! Every rule is a predicate over a sensor's current window average.
//! Thresholds are inclusive: an average exactly at the threshold alerts.

use crate::error::SensorError;
use serde::{Deserialize, Serialize};

/// Alert predicate over a sensor's window average
pub trait AlertRule {
    /// Whether the given average puts the sensor in alert
    fn is_in_alert(&self, average: f64) -> bool;

    /// Short name of the sensor kind
    fn name(&self) -> &'static str;
}

/// Temperature alert (default threshold: 80.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRule {
    pub threshold: f64,
}

impl Default for TemperatureRule {
    fn default() -> Self {
        Self { threshold: 80.0 }
    }
}

impl AlertRule for TemperatureRule {
    fn is_in_alert(&self, average: f64) -> bool {
        average >= self.threshold
    }

    fn name(&self) -> &'static str {
        "temperature"
    }
}

/// Vibration alert (default RMS threshold: 2.5)
///
/// The "RMS" here is the absolute value of the window mean, not a true
/// root-mean-square of the readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibrationRule {
    pub rms_threshold: f64,
}

impl Default for VibrationRule {
    fn default() -> Self {
        Self { rms_threshold: 2.5 }
    }
}

impl AlertRule for VibrationRule {
    fn is_in_alert(&self, average: f64) -> bool {
        average.abs() >= self.rms_threshold
    }

    fn name(&self) -> &'static str {
        "vibration"
    }
}

/// Seismic alert (default magnitude threshold: 5.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicRule {
    pub magnitude_threshold: f64,
}

impl Default for SeismicRule {
    fn default() -> Self {
        Self {
            magnitude_threshold: 5.0,
        }
    }
}

impl AlertRule for SeismicRule {
    fn is_in_alert(&self, average: f64) -> bool {
        average >= self.magnitude_threshold
    }

    fn name(&self) -> &'static str {
        "seismic"
    }
}

/// Volcanic alert (defaults: temperature 900.0, gas 50.0)
///
/// Both thresholds are compared against the same window average; crossing
/// either one alerts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolcanicRule {
    pub temperature_threshold: f64,
    pub gas_threshold: f64,
}

impl Default for VolcanicRule {
    fn default() -> Self {
        Self {
            temperature_threshold: 900.0,
            gas_threshold: 50.0,
        }
    }
}

impl AlertRule for VolcanicRule {
    fn is_in_alert(&self, average: f64) -> bool {
        average >= self.temperature_threshold || average >= self.gas_threshold
    }

    fn name(&self) -> &'static str {
        "volcanic"
    }
}

/// Sensor kind with its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SensorKind {
    Temperature(TemperatureRule),
    Vibration(VibrationRule),
    Seismic(SeismicRule),
    Volcanic(VolcanicRule),
}

impl SensorKind {
    /// Reject NaN or infinite thresholds
    pub fn validate(&self) -> Result<(), SensorError> {
        let thresholds: Vec<(&'static str, f64)> = match self {
            SensorKind::Temperature(r) => vec![("threshold", r.threshold)],
            SensorKind::Vibration(r) => vec![("rms_threshold", r.rms_threshold)],
            SensorKind::Seismic(r) => vec![("magnitude_threshold", r.magnitude_threshold)],
            SensorKind::Volcanic(r) => vec![
                ("temperature_threshold", r.temperature_threshold),
                ("gas_threshold", r.gas_threshold),
            ],
        };

        for (field, value) in thresholds {
            if !value.is_finite() {
                return Err(SensorError::NonFiniteThreshold { field, value });
            }
        }
        Ok(())
    }

    fn rule(&self) -> &dyn AlertRule {
        match self {
            SensorKind::Temperature(r) => r,
            SensorKind::Vibration(r) => r,
            SensorKind::Seismic(r) => r,
            SensorKind::Volcanic(r) => r,
        }
    }
}

impl AlertRule for SensorKind {
    fn is_in_alert(&self, average: f64) -> bool {
        self.rule().is_in_alert(average)
    }

    fn name(&self) -> &'static str {
        self.rule().name()
    }
}

impl From<TemperatureRule> for SensorKind {
    fn from(rule: TemperatureRule) -> Self {
        SensorKind::Temperature(rule)
    }
}

impl From<VibrationRule> for SensorKind {
    fn from(rule: VibrationRule) -> Self {
        SensorKind::Vibration(rule)
    }
}

impl From<SeismicRule> for SensorKind {
    fn from(rule: SeismicRule) -> Self {
        SensorKind::Seismic(rule)
    }
}

impl From<VolcanicRule> for SensorKind {
    fn from(rule: VolcanicRule) -> Self {
        SensorKind::Volcanic(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_inclusive() {
        let rule = TemperatureRule { threshold: 80.0 };
        assert!(rule.is_in_alert(80.0));
        assert!(rule.is_in_alert(95.5));
        assert!(!rule.is_in_alert(79.99));
    }

    #[test]
    fn test_vibration_uses_absolute_mean() {
        let rule = VibrationRule::default();
        assert!(rule.is_in_alert(2.5));
        assert!(rule.is_in_alert(-3.0));
        assert!(!rule.is_in_alert(-2.0));
        assert!(!rule.is_in_alert(0.0));
    }

    #[test]
    fn test_seismic() {
        let rule = SeismicRule::default();
        assert!(!rule.is_in_alert(4.9));
        assert!(rule.is_in_alert(5.0));
    }

    #[test]
    fn test_volcanic_either_threshold() {
        let rule = VolcanicRule {
            temperature_threshold: 900.0,
            gas_threshold: 1000.0,
        };
        assert!(rule.is_in_alert(910.0));
        assert!(rule.is_in_alert(950.0));
        assert!(!rule.is_in_alert(899.0));

        // Low gas threshold alerts on the same average
        let rule = VolcanicRule::default();
        assert!(rule.is_in_alert(50.0));
        assert!(!rule.is_in_alert(49.0));
    }

    #[test]
    fn test_kind_delegates() {
        let kind = SensorKind::from(SeismicRule {
            magnitude_threshold: 6.0,
        });
        assert_eq!(kind.name(), "seismic");
        assert!(kind.is_in_alert(6.0));
        assert!(!kind.is_in_alert(5.9));
    }

    #[test]
    fn test_validate_thresholds() {
        assert!(SensorKind::from(TemperatureRule::default()).validate().is_ok());

        let kind = SensorKind::from(VolcanicRule {
            temperature_threshold: 900.0,
            gas_threshold: f64::NAN,
        });
        assert!(matches!(
            kind.validate(),
            Err(SensorError::NonFiniteThreshold { field: "gas_threshold", .. })
        ));
    }

    #[test]
    fn test_kind_deserializes_tagged() {
        let kind: SensorKind =
            serde_json::from_str(r#"{"kind":"vibration","rms_threshold":1.5}"#).unwrap();
        assert_eq!(kind, SensorKind::Vibration(VibrationRule { rms_threshold: 1.5 }));
    }
}
