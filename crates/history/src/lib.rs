//! Event History
//!
//! Append-only log of sensor events. Nothing records into it automatically;
//! callers append the events they care about.

mod record;

pub use record::{EventEntry, EventHistory, EventRecord};

use thiserror::Error;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
