//! Alert Manager Implementation

use crate::status::{evaluate_shared, SensorStatus};
use notify::{ChannelKind, DeliveryError, NotificationChannel};
use sensors::SharedSensor;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A channel delivery that failed during fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
    pub sensor_id: String,
    pub channel: ChannelKind,
    pub destination: String,
    pub error: DeliveryError,
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct AlertReport {
    /// Status of every sensor, in registration order
    pub statuses: Vec<SensorStatus>,
    /// Number of successful channel sends
    pub delivered: usize,
    /// Sends that failed; fan-out continued past each of them
    pub failures: Vec<DeliveryFailure>,
}

impl AlertReport {
    /// Statuses of the sensors that were in alert
    pub fn alerts(&self) -> impl Iterator<Item = &SensorStatus> {
        self.statuses.iter().filter(|s| s.is_alert())
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered
    }

    /// True when no delivery failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Send `message` through `channel`, recording a failure instead of aborting
pub(crate) fn deliver(
    channel: &dyn NotificationChannel,
    sensor_id: &str,
    message: &str,
    failures: &mut Vec<DeliveryFailure>,
) -> bool {
    match channel.send(message) {
        Ok(()) => true,
        Err(error) => {
            warn!(
                sensor = sensor_id,
                channel = %channel.kind(),
                destination = channel.destination(),
                %error,
                "Alert delivery failed"
            );
            failures.push(DeliveryFailure {
                sensor_id: sensor_id.to_string(),
                channel: channel.kind(),
                destination: channel.destination().to_string(),
                error,
            });
            false
        }
    }
}

/// Evaluates a set of sensors and fans alerts out to every channel
#[derive(Default)]
pub struct AlertManager {
    /// Sensors in registration order
    sensors: Vec<SharedSensor>,
    /// Channels in registration order
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl AlertManager {
    /// Create a new alert manager
    pub fn new(sensors: Vec<SharedSensor>, channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        info!(
            sensors = sensors.len(),
            channels = channels.len(),
            "Creating alert manager"
        );
        Self { sensors, channels }
    }

    pub fn add_sensor(&mut self, sensor: SharedSensor) {
        self.sensors.push(sensor);
    }

    pub fn add_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        self.channels.push(channel);
    }

    pub fn sensors(&self) -> &[SharedSensor] {
        &self.sensors
    }

    pub fn channels(&self) -> &[Arc<dyn NotificationChannel>] {
        &self.channels
    }

    /// Evaluate every sensor and notify all channels for each one in alert.
    ///
    /// Sends happen sensor-then-channel in registration order. A failing
    /// channel is recorded in the report and the fan-out carries on.
    pub fn evaluate_and_notify(&self) -> AlertReport {
        let mut report = AlertReport::default();

        for sensor in &self.sensors {
            let status = evaluate_shared(sensor);

            if status.is_alert() {
                let message = status.alert_message();
                info!(sensor = %status.sensor_id, average = status.average, "Sensor in alert");

                for channel in &self.channels {
                    if deliver(channel.as_ref(), &status.sensor_id, &message, &mut report.failures) {
                        report.delivered += 1;
                    }
                }
            } else {
                debug!(sensor = %status.sensor_id, average = status.average, "Sensor normal");
            }

            report.statuses.push(status);
        }

        report
    }
}

impl fmt::Debug for AlertManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertManager")
            .field("sensors", &self.sensors.iter().map(SharedSensor::id).collect::<Vec<_>>())
            .field(
                "channels",
                &self
                    .channels
                    .iter()
                    .map(|c| (c.kind(), c.destination()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
