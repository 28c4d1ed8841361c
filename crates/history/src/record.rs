//! Event Records and History

use crate::HistoryError;
use chrono::{DateTime, Utc};
use sensors::SharedSensor;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// One immutable event, tied to the live sensor it concerns
#[derive(Debug, Clone)]
pub struct EventRecord {
    id: Uuid,
    sensor: SharedSensor,
    message: String,
    timestamp: DateTime<Utc>,
}

impl EventRecord {
    fn new(sensor: SharedSensor, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sensor,
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle to the sensor, sharing its current (not historical) state
    pub fn sensor(&self) -> &SharedSensor {
        &self.sensor
    }

    pub fn sensor_id(&self) -> &str {
        self.sensor.id()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Time the record was appended
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Serializable snapshot for external persistence or display
    pub fn entry(&self) -> EventEntry {
        EventEntry {
            id: self.id,
            sensor_id: self.sensor_id().to_string(),
            message: self.message.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Plain-data form of an [`EventRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: Uuid,
    pub sensor_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only sequence of event records
#[derive(Debug, Default)]
pub struct EventHistory {
    records: Vec<EventRecord>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time
    pub fn add_event(&mut self, sensor: &SharedSensor, message: impl Into<String>) -> &EventRecord {
        let record = EventRecord::new(sensor.clone(), message.into());
        debug!(
            id = %record.id,
            sensor = record.sensor_id(),
            total = self.records.len() + 1,
            "Event recorded"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    /// Snapshots of every record, in insertion order
    pub fn entries(&self) -> Vec<EventEntry> {
        self.records.iter().map(EventRecord::entry).collect()
    }

    /// Export the log as a JSON array
    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(&self.entries())?)
    }
}

impl<'a> IntoIterator for &'a EventHistory {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sensors::Sensor;

    fn sensor(id: &str) -> SharedSensor {
        SharedSensor::new(Sensor::temperature(id, 80.0).unwrap())
    }

    #[test]
    fn test_append_keeps_order() {
        let a = sensor("T-1");
        let b = sensor("T-2");
        let mut history = EventHistory::new();
        assert!(history.is_empty());

        history.add_event(&a, "first");
        history.add_event(&b, "second");
        history.add_event(&a, "third");

        let messages: Vec<&str> = history.iter().map(EventRecord::message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(history.len(), 3);

        let ids: Vec<&str> = (&history).into_iter().map(EventRecord::sensor_id).collect();
        assert_eq!(ids, vec!["T-1", "T-2", "T-1"]);
    }

    #[test]
    fn test_prior_records_untouched() {
        let a = sensor("T-1");
        let mut history = EventHistory::new();
        let first = history.add_event(&a, "first").entry();

        history.add_event(&a, "second");
        assert_eq!(history.entries()[0], first);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let a = sensor("T-1");
        let mut history = EventHistory::new();
        for i in 0..10 {
            history.add_event(&a, format!("event {}", i));
        }

        let stamps: Vec<_> = history.iter().map(EventRecord::timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_record_shares_live_sensor() {
        let a = sensor("T-1");
        let mut history = EventHistory::new();
        history.add_event(&a, "registered");

        a.record(90.0).unwrap();
        let record = history.iter().next().unwrap();
        assert!(record.sensor().ptr_eq(&a));
        assert_eq!(record.sensor().average(), 90.0);
    }

    #[test]
    fn test_to_json() {
        let a = sensor("T-1");
        let mut history = EventHistory::new();
        history.add_event(&a, "ALERTA: Sensor T-1 en umbral (avg=90.00)");

        let json = history.to_json().unwrap();
        let parsed: Vec<EventEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history.entries());
        assert_eq!(parsed[0].sensor_id, "T-1");
    }

    proptest! {
        #[test]
        fn prop_n_appends_yield_n_records(messages in prop::collection::vec("[a-z ]{0,12}", 0..40)) {
            let a = sensor("T-1");
            let mut history = EventHistory::new();
            for m in &messages {
                history.add_event(&a, m.clone());
            }
            prop_assert_eq!(history.len(), messages.len());
            let logged: Vec<String> = history.iter().map(|r| r.message().to_string()).collect();
            prop_assert_eq!(logged, messages);
        }
    }
}
