//! Configuration for the agent console
//!
//! All settings have working defaults. [`ConsoleConfig::load`] layers an
//! optional TOML/JSON/YAML file and `AGENT_CONSOLE__*` environment variables
//! on top of them, e.g. `AGENT_CONSOLE__NOTIFICATIONS__COUNTDOWN_SECS=45`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{ConsoleError, Result};
use crate::logging::{parse_log_level, LoggingConfig};
use crate::notification::TransferRequest;

/// Seconds a transfer notification waits for the agent before it expires
pub const DEFAULT_COUNTDOWN_SECS: u32 = 30;

/// Countdown tick period
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Period of the simulated request feed
pub const DEFAULT_GENERATION_INTERVAL_SECS: u64 = 10;

/// Broadcast capacity for notification events
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Top-level console configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub notifications: NotificationConfig,
    pub call_panel: CallPanelConfig,
    pub logging: LogSettings,
}

/// Transfer notification lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Countdown given to each new notification, in seconds
    pub countdown_secs: u32,
    /// Countdown tick period in milliseconds
    pub tick_interval_ms: u64,
    /// Period of the simulated request feed in seconds
    pub generation_interval_secs: u64,
    /// Templates the simulated feed picks from
    pub templates: Vec<TransferRequest>,
    /// Ring the terminal bell on arrival
    pub alert_enabled: bool,
    /// Broadcast capacity for lifecycle events
    pub event_capacity: usize,
    /// Grace period for scheduler shutdown in milliseconds
    pub shutdown_timeout_ms: u64,
}

impl NotificationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn generation_interval(&self) -> Duration {
        Duration::from_secs(self.generation_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            generation_interval_secs: DEFAULT_GENERATION_INTERVAL_SECS,
            templates: default_templates(),
            alert_enabled: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            shutdown_timeout_ms: 2000,
        }
    }
}

/// Templates used when no others are configured
pub fn default_templates() -> Vec<TransferRequest> {
    vec![
        TransferRequest::new(
            "Agent Li",
            "Zhang Xiaoming",
            "Customer asks about an appointment refund; needs the billing team",
        ),
        TransferRequest::new(
            "Agent Wang",
            "Li Xiaohong",
            "System error reported; requires technical support",
        ),
        TransferRequest::new(
            "Agent Zhao",
            "Wang Xiaohua",
            "VIP customer requesting a senior agent",
        ),
        TransferRequest::new(
            "Agent Chen",
            "Liu Xiaomei",
            "Complaint escalation after repeated rescheduling",
        ),
    ]
}

/// Outbound call panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallPanelConfig {
    /// Delay between dialing and the call being connected, in milliseconds
    pub connect_delay_ms: u64,
    /// How long a shake lasts, in milliseconds
    pub shake_duration_ms: u64,
    /// Initial panel position
    pub origin_x: i32,
    pub origin_y: i32,
}

impl CallPanelConfig {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn shake_duration(&self) -> Duration {
        Duration::from_millis(self.shake_duration_ms)
    }
}

impl Default for CallPanelConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: 3000,
            shake_duration_ms: 600,
            origin_x: 100,
            origin_y: 100,
        }
    }
}

/// Logging settings as they appear in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub file_info: bool,
}

impl LogSettings {
    /// Convert into the logging subsystem's configuration
    pub fn to_logging_config(&self) -> Result<LoggingConfig> {
        let level: Level = parse_log_level(&self.level)?;
        let mut config = LoggingConfig::new(level, "agent-console");
        if self.json {
            config = config.with_json();
        }
        if self.file_info {
            config = config.with_file_info();
        }
        Ok(config)
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
        }
    }
}

impl ConsoleConfig {
    /// Load defaults, an optional file and environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let config: ConsoleConfig = builder
            .add_source(
                config::Environment::with_prefix("AGENT_CONSOLE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        let n = &self.notifications;
        if n.countdown_secs == 0 {
            return Err(ConsoleError::config("countdown_secs must be greater than zero"));
        }
        if n.tick_interval_ms == 0 {
            return Err(ConsoleError::config("tick_interval_ms must be greater than zero"));
        }
        if n.generation_interval_secs == 0 {
            return Err(ConsoleError::config(
                "generation_interval_secs must be greater than zero",
            ));
        }
        if n.templates.is_empty() {
            return Err(ConsoleError::config("at least one transfer template is required"));
        }
        if n.event_capacity == 0 {
            return Err(ConsoleError::config("event_capacity must be greater than zero"));
        }
        parse_log_level(&self.logging.level)?;
        Ok(())
    }
}
