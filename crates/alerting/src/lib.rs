//! Alerting System
//!
//! Evaluates sensors against their alert rules and fans alert messages out
//! to notification channels. The emergency panel renders per-sensor status
//! and notifies through its own single channel.

mod manager;
mod panel;
mod status;

pub use manager::{AlertManager, AlertReport, DeliveryFailure};
pub use panel::{EmergencyPanel, PanelEntry, PanelReport};
pub use status::{evaluate, AlertLevel, SensorStatus};
