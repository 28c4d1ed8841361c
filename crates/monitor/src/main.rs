//! Sensor Monitor - Main Entry Point
//!
//! Usage: `sensor-monitor <config.toml> <readings.txt>`

use monitor::{init_logging, MonitorConfig, Session};
use notify::LogOutbox;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let (config_path, readings_path) = match (args.next(), args.next()) {
        (Some(config), Some(readings)) => (PathBuf::from(config), PathBuf::from(readings)),
        _ => {
            eprintln!("usage: sensor-monitor <config.toml> <readings.txt>");
            std::process::exit(2);
        }
    };

    info!("=== Sensor Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let config = MonitorConfig::load(&config_path)?;
    let mut session = Session::from_config(&config, Arc::new(LogOutbox))?;

    let readings = BufReader::new(File::open(&readings_path)?);
    let summary = session.replay(readings)?;
    info!(
        readings = summary.readings,
        skipped = summary.skipped,
        alerts = summary.alerts,
        "Replay finished"
    );

    println!("{}", session.history().to_json()?);
    Ok(())
}
