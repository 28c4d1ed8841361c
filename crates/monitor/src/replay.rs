//! Reading Replay
//!
//! Feeds `<sensor_id> <value>` lines into a session, ticking after every
//! accepted reading. Blank lines and `#` comments are ignored.

use crate::session::Session;
use crate::MonitorError;
use std::io::BufRead;
use tracing::warn;

/// Counters for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Readings accepted by a sensor
    pub readings: usize,
    /// Malformed lines and rejected readings
    pub skipped: usize,
    /// Sensor alerts raised across all ticks
    pub alerts: usize,
}

/// Parse one replay line into `(sensor_id, value)`.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<(&str, f64)>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let (id, raw) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(raw), None) => (id, raw),
        _ => return Err(format!("expected `<sensor_id> <value>`, got `{}`", line)),
    };
    let value = raw
        .parse::<f64>()
        .map_err(|e| format!("invalid reading `{}`: {}", raw, e))?;

    Ok(Some((id, value)))
}

impl Session {
    /// Replay readings from `reader`; malformed lines are logged and skipped
    pub fn replay(&mut self, reader: impl BufRead) -> Result<ReplaySummary, MonitorError> {
        let mut summary = ReplaySummary::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;

            let (id, value) = match parse_line(&line) {
                Ok(Some(reading)) => reading,
                Ok(None) => continue,
                Err(reason) => {
                    warn!(line = number, %reason, "Skipping malformed line");
                    summary.skipped += 1;
                    continue;
                }
            };

            if let Err(error) = self.ingest(id, value) {
                warn!(line = number, %error, "Skipping rejected reading");
                summary.skipped += 1;
                continue;
            }
            summary.readings += 1;
            summary.alerts += self.tick().alerts.alerts().count();
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("T-1 80.5"), Ok(Some(("T-1", 80.5))));
        assert_eq!(parse_line("  S-1\t-3  "), Ok(Some(("S-1", -3.0))));
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("# header"), Ok(None));
        assert!(parse_line("T-1").is_err());
        assert!(parse_line("T-1 hot").is_err());
        assert!(parse_line("T-1 1.0 extra").is_err());
    }
}
