//! Monitor configuration

use crate::MonitorError;
use notify::ChannelConfig;
use sensors::{SensorKind, SensorSpec, TemperatureRule, DEFAULT_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Prefix for environment overrides, e.g. `SENSOR_MONITOR__RECORD_HISTORY=false`
pub const ENV_PREFIX: &str = "SENSOR_MONITOR";

/// Emergency panel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// The panel's single notification channel
    #[serde(default)]
    pub channel: ChannelConfig,

    /// IDs of the sensors shown on the panel
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Monitoring session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sensors watched by the alert manager
    pub sensors: Vec<SensorSpec>,

    /// Channels the alert manager fans out to
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,

    #[serde(default)]
    pub panel: PanelConfig,

    /// Append an event per alerting sensor on every tick
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

fn default_record_history() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensors: vec![SensorSpec {
                id: "sensor-1".to_string(),
                window_size: DEFAULT_WINDOW_SIZE,
                calibration: 0.0,
                kind: SensorKind::Temperature(TemperatureRule::default()),
            }],
            channels: vec![ChannelConfig::default()],
            panel: PanelConfig {
                channel: ChannelConfig::default(),
                indicators: vec!["sensor-1".to_string()],
            },
            record_history: true,
        }
    }
}

impl MonitorConfig {
    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, MonitorError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from TOML text
    pub fn from_toml(text: &str) -> Result<Self, MonitorError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-references between sensors and the panel
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.sensors.is_empty() {
            return Err(MonitorError::Config("at least one sensor is required".to_string()));
        }

        let mut ids = HashSet::new();
        for spec in &self.sensors {
            if !ids.insert(spec.id.as_str()) {
                return Err(MonitorError::Config(format!("duplicate sensor id {}", spec.id)));
            }
        }

        if let Some(missing) = self
            .panel
            .indicators
            .iter()
            .find(|id| !ids.contains(id.as_str()))
        {
            return Err(MonitorError::Config(format!(
                "panel indicator {} is not a configured sensor",
                missing
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensors::VolcanicRule;

    const SAMPLE: &str = r#"
record_history = false

[[sensors]]
id = "T-1"
kind = "temperature"
threshold = 75.0
window_size = 3
calibration = 1.0

[[sensors]]
id = "VOL-1"
kind = "volcanic"
temperature_threshold = 900.0
gas_threshold = 50.0

[[channels]]
type = "email"
to = "ops@example.com"

[[channels]]
type = "webhook"
url = "https://hooks.example.com/alerts"

[panel]
indicators = ["VOL-1"]

[panel.channel]
type = "sms"
phone = "+525500000000"
"#;

    #[test]
    fn test_parse_sample() {
        let config = MonitorConfig::from_toml(SAMPLE).unwrap();

        assert!(!config.record_history);
        assert_eq!(config.sensors.len(), 2);
        assert_eq!(config.sensors[0].window_size, 3);
        assert_eq!(config.sensors[0].calibration, 1.0);
        assert_eq!(config.sensors[1].window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(
            config.sensors[1].kind,
            SensorKind::Volcanic(VolcanicRule::default())
        );
        assert_eq!(config.channels.len(), 2);
        assert_eq!(
            config.panel.channel,
            ChannelConfig::Sms {
                phone: "+525500000000".to_string()
            }
        );
    }

    #[test]
    fn test_default_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_indicator_rejected() {
        let mut config = MonitorConfig::default();
        config.panel.indicators.push("ghost".to_string());
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_duplicate_sensor_rejected() {
        let mut config = MonitorConfig::default();
        let copy = config.sensors[0].clone();
        config.sensors.push(copy);
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_empty_sensors_rejected() {
        let config = MonitorConfig {
            sensors: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));
    }
}
