//! Monitoring Session

use crate::settings::MonitorConfig;
use crate::MonitorError;
use alerting::{AlertManager, AlertReport, EmergencyPanel, PanelReport};
use history::EventHistory;
use notify::Outbox;
use sensors::SharedSensor;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one evaluation tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub alerts: AlertReport,
    pub panel: PanelReport,
    /// Events appended to the history during this tick
    pub recorded: usize,
}

/// A configured set of sensors, alert manager, panel and history
#[derive(Debug)]
pub struct Session {
    sensors: Vec<SharedSensor>,
    manager: Arc<AlertManager>,
    panel: EmergencyPanel,
    history: EventHistory,
    record_history: bool,
}

impl Session {
    /// Build every component described by `config`, delivering through `outbox`
    pub fn from_config(config: &MonitorConfig, outbox: Arc<dyn Outbox>) -> Result<Self, MonitorError> {
        config.validate()?;

        let sensors = config
            .sensors
            .iter()
            .map(|spec| spec.build().map(SharedSensor::new))
            .collect::<Result<Vec<_>, _>>()?;

        let channels = config
            .channels
            .iter()
            .map(|c| c.build(outbox.clone()))
            .collect();
        let manager = Arc::new(AlertManager::new(sensors.clone(), channels));

        let mut panel = EmergencyPanel::new(manager.clone(), config.panel.channel.build(outbox), Vec::new());
        for id in &config.panel.indicators {
            let sensor = find(&sensors, id).ok_or_else(|| MonitorError::UnknownSensor(id.clone()))?;
            panel.add_indicator(sensor.clone());
        }

        info!(
            sensors = sensors.len(),
            channels = config.channels.len(),
            indicators = config.panel.indicators.len(),
            "Monitoring session ready"
        );

        Ok(Self {
            sensors,
            manager,
            panel,
            history: EventHistory::new(),
            record_history: config.record_history,
        })
    }

    /// Feed a raw reading to the sensor with the given ID
    pub fn ingest(&self, sensor_id: &str, value: f64) -> Result<f64, MonitorError> {
        let sensor = self
            .sensor(sensor_id)
            .ok_or_else(|| MonitorError::UnknownSensor(sensor_id.to_string()))?;
        Ok(sensor.record(value)?)
    }

    /// Run the alert manager, refresh the panel and log alerting sensors
    pub fn tick(&mut self) -> TickReport {
        let alerts = self.manager.evaluate_and_notify();
        let panel = self.panel.refresh();

        let mut recorded = 0;
        if self.record_history {
            for status in alerts.alerts() {
                if let Some(sensor) = find(&self.sensors, &status.sensor_id) {
                    self.history.add_event(sensor, status.alert_message());
                    recorded += 1;
                }
            }
        }
        debug!(recorded, history = self.history.len(), "Tick complete");

        TickReport {
            alerts,
            panel,
            recorded,
        }
    }

    pub fn sensor(&self, id: &str) -> Option<&SharedSensor> {
        find(&self.sensors, id)
    }

    pub fn sensors(&self) -> &[SharedSensor] {
        &self.sensors
    }

    pub fn manager(&self) -> &Arc<AlertManager> {
        &self.manager
    }

    pub fn panel(&self) -> &EmergencyPanel {
        &self.panel
    }

    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    /// Mutable access for callers recording their own events
    pub fn history_mut(&mut self) -> &mut EventHistory {
        &mut self.history
    }
}

fn find<'a>(sensors: &'a [SharedSensor], id: &str) -> Option<&'a SharedSensor> {
    sensors.iter().find(|s| s.id() == id)
}
