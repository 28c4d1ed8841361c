//! Environment overrides on top of the configuration file.
//!
//! Kept in its own test binary so the process environment it sets does not
//! leak into other tests.

use monitor::settings::ENV_PREFIX;
use monitor::MonitorConfig;
use std::io::Write;

const CONFIG: &str = r#"
record_history = true

[[sensors]]
id = "T-1"
kind = "temperature"
threshold = 80.0
"#;

#[test]
fn test_env_overrides_record_history() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    assert!(MonitorConfig::load(file.path()).unwrap().record_history);

    std::env::set_var(format!("{}__RECORD_HISTORY", ENV_PREFIX), "false");
    let config = MonitorConfig::load(file.path()).unwrap();
    std::env::remove_var(format!("{}__RECORD_HISTORY", ENV_PREFIX));

    assert!(!config.record_history);
    assert_eq!(config.sensors.len(), 1);
    assert_eq!(config.sensors[0].id, "T-1");
}
