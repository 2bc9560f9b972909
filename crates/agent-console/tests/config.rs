//! Configuration loading from files and the environment

use std::io::Write;

use agent_console::config::ConsoleConfig;
use agent_console::ConsoleError;
use serial_test::serial;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
[notifications]
countdown_secs = 20
generation_interval_secs = 5
"#,
    );

    // SAFETY: `#[serial]` keeps every env-touching test in this binary on one thread
    unsafe { std::env::set_var("AGENT_CONSOLE__NOTIFICATIONS__COUNTDOWN_SECS", "12") };
    let loaded = ConsoleConfig::load(Some(file.path()));
    unsafe { std::env::remove_var("AGENT_CONSOLE__NOTIFICATIONS__COUNTDOWN_SECS") };

    let config = loaded.expect("config should load");
    assert_eq!(config.notifications.countdown_secs, 12);
    assert_eq!(config.notifications.generation_interval_secs, 5);
    assert_eq!(config.notifications.tick_interval_ms, 1000);
    assert_eq!(config.notifications.templates.len(), 4);
}

#[test]
#[serial]
fn test_defaults_without_file() {
    let config = ConsoleConfig::load(None).expect("defaults should load");
    assert_eq!(config.notifications.countdown_secs, 30);
    assert_eq!(config.call_panel.connect_delay_ms, 3000);
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_invalid_file_values_are_rejected() {
    let file = write_config(
        r#"
[notifications]
tick_interval_ms = 0
"#,
    );
    assert!(matches!(
        ConsoleConfig::load(Some(file.path())),
        Err(ConsoleError::Configuration { .. })
    ));
}
