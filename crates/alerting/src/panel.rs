//! Emergency Panel
//!
//! Shows the status of a list of indicator sensors and notifies through a
//! single channel of its own. Indicators may be the very same sensors the
//! alert manager watches.

use crate::manager::{deliver, AlertManager, DeliveryFailure};
use crate::status::{evaluate_shared, SensorStatus};
use notify::NotificationChannel;
use sensors::SharedSensor;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// One rendered panel line
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    pub status: SensorStatus,
    /// Whether a status message went out for this sensor
    pub notified: bool,
}

impl fmt::Display for PanelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PANEL] {}", self.status)
    }
}

/// Outcome of one panel refresh
#[derive(Debug, Clone, Default)]
pub struct PanelReport {
    /// One entry per indicator, in order
    pub entries: Vec<PanelEntry>,
    pub failures: Vec<DeliveryFailure>,
}

impl PanelReport {
    /// Entries whose sensor is in alert
    pub fn alerts(&self) -> impl Iterator<Item = &PanelEntry> {
        self.entries.iter().filter(|e| e.status.is_alert())
    }
}

pub struct EmergencyPanel {
    /// Held for callers; refresh never goes through it
    manager: Arc<AlertManager>,
    channel: Arc<dyn NotificationChannel>,
    indicators: Vec<SharedSensor>,
}

impl EmergencyPanel {
    pub fn new(
        manager: Arc<AlertManager>,
        channel: Arc<dyn NotificationChannel>,
        indicators: Vec<SharedSensor>,
    ) -> Self {
        Self {
            manager,
            channel,
            indicators,
        }
    }

    pub fn add_indicator(&mut self, sensor: SharedSensor) {
        self.indicators.push(sensor);
    }

    pub fn manager(&self) -> &Arc<AlertManager> {
        &self.manager
    }

    pub fn channel(&self) -> &Arc<dyn NotificationChannel> {
        &self.channel
    }

    pub fn indicators(&self) -> &[SharedSensor] {
        &self.indicators
    }

    /// Evaluate every indicator, report its status and send a status
    /// message through the panel channel for each one in alert.
    pub fn refresh(&self) -> PanelReport {
        let mut report = PanelReport::default();

        for sensor in &self.indicators {
            let status = evaluate_shared(sensor);
            info!(
                sensor = %status.sensor_id,
                status = %status.level,
                average = status.average,
                "Panel indicator"
            );

            let notified = status.is_alert()
                && deliver(
                    self.channel.as_ref(),
                    &status.sensor_id,
                    &status.panel_message(),
                    &mut report.failures,
                );

            report.entries.push(PanelEntry { status, notified });
        }

        report
    }
}

impl fmt::Debug for EmergencyPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmergencyPanel")
            .field("manager", &self.manager)
            .field("channel", &(self.channel.kind(), self.channel.destination()))
            .field(
                "indicators",
                &self.indicators.iter().map(SharedSensor::id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
