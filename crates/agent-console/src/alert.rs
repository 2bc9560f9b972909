//! Audible alert played when a transfer request arrives
//!
//! Alerts are best-effort. [`play_best_effort`] logs a failure and moves on;
//! nothing about the notification lifecycle depends on the alert.

use std::io::Write;

use thiserror::Error;
use tracing::{debug, warn};

use crate::notification::TransferNotification;

/// Errors raised while playing an alert
#[derive(Debug, Error)]
pub enum AlertError {
    /// The output device could not be written
    #[error("Alert output error: {0}")]
    Io(#[from] std::io::Error),

    /// No audio output is available
    #[error("Alert device unavailable: {message}")]
    Unavailable { message: String },
}

/// Something that can make a sound
pub trait AudioAlert: Send + Sync {
    fn play(&self, notification: &TransferNotification) -> Result<(), AlertError>;
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AudioAlert for TerminalBell {
    fn play(&self, _notification: &TransferNotification) -> Result<(), AlertError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AudioAlert for SilentAlert {
    fn play(&self, _notification: &TransferNotification) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Play an alert, swallowing and logging any failure
pub fn play_best_effort(alert: &dyn AudioAlert, notification: &TransferNotification) {
    match alert.play(notification) {
        Ok(()) => debug!("🔔 Alert played for notification {}", notification.id),
        Err(e) => warn!(
            "Failed to play alert for notification {}: {}",
            notification.id, e
        ),
    }
}
