//! Agent presence
//!
//! The status selector in the console header writes the agent's presence;
//! the notification generator reads it to decide whether new transfer
//! requests are shown. Presence is a `watch` channel so readers always see
//! the latest value without polling a lock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::error::{ConsoleError, Result};

/// Agent's self-reported availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    /// Ready for work; transfer requests are shown
    #[default]
    Online,
    /// Signed off
    Offline,
    /// Short break
    Break,
}

impl PresenceStatus {
    /// Only an online agent receives new transfer requests
    pub fn accepts_transfers(&self) -> bool {
        matches!(self, PresenceStatus::Online)
    }

    /// Label shown next to the status indicator
    pub fn label(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "Online",
            PresenceStatus::Offline => "Offline",
            PresenceStatus::Break => "On break",
        }
    }

    /// Indicator dot colour
    pub fn color(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "#52c41a",
            PresenceStatus::Offline => "#ff4d4f",
            PresenceStatus::Break => "#faad14",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Offline => "offline",
            PresenceStatus::Break => "break",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenceStatus {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(PresenceStatus::Online),
            "offline" => Ok(PresenceStatus::Offline),
            "break" => Ok(PresenceStatus::Break),
            other => Err(ConsoleError::config(format!(
                "Unknown presence status: {}",
                other
            ))),
        }
    }
}

/// Writer side of the presence channel
pub struct PresenceHandle {
    sender: watch::Sender<PresenceStatus>,
}

impl PresenceHandle {
    pub fn new(initial: PresenceStatus) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Change presence; pending notifications are left alone
    pub fn set(&self, status: PresenceStatus) {
        let previous = self.sender.send_replace(status);
        if previous != status {
            info!("👤 Presence changed: {} -> {}", previous, status);
        }
    }

    pub fn current(&self) -> PresenceStatus {
        *self.sender.borrow()
    }

    /// Reader handed to the notification generator
    pub fn subscribe(&self) -> watch::Receiver<PresenceStatus> {
        self.sender.subscribe()
    }
}

impl Default for PresenceHandle {
    fn default() -> Self {
        Self::new(PresenceStatus::Online)
    }
}
