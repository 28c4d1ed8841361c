//! Sensor Monitor
//!
//! Wires sensors, the alert manager, the emergency panel and the event
//! history into one monitoring session built from configuration.

mod replay;
mod session;
pub mod settings;

pub use settings::{MonitorConfig, PanelConfig};
pub use replay::{parse_line, ReplaySummary};
pub use session::{Session, TickReport};

use history::HistoryError;
use sensors::SensorError;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging (`RUST_LOG` overrides the default `info` level)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
