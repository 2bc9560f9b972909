//! Floating outbound-call panel
//!
//! Pure state: the panel never starts timers. Time-dependent transitions
//! (connecting a dialed call, ending a shake) are evaluated against the
//! `Instant` the caller passes in, so nothing can keep firing after the
//! panel is gone.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::CallPanelConfig;
use crate::error::{ConsoleError, Result};
use crate::events::PanelSignal;

/// Screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Direction of a historical call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Outbound,
    Inbound,
}

/// Outcome of a historical call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Completed,
    Missed,
    Busy,
}

/// Entry in the call history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub call_time: String,
    /// Talk time in seconds, `None` when the call never connected
    pub duration_secs: Option<u64>,
    pub direction: CallDirection,
    pub outcome: CallOutcome,
}

/// The party on the other end of the current call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentCall {
    pub name: Option<String>,
    pub phone: String,
}

/// Call state of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Calling { dialed_at: Instant },
    Connected { connected_at: Instant },
}

/// State of the outbound-call panel
pub struct CallPanel {
    config: CallPanelConfig,
    visible: bool,
    minimized: bool,
    position: Point,
    /// Pointer offset inside the title bar while dragging
    drag_offset: Option<Point>,
    /// Digits typed into the dial pad
    dial_input: String,
    search: String,
    call_state: CallState,
    current_call: Option<CurrentCall>,
    history: Vec<CallRecord>,
    shaking_until: Option<Instant>,
}

impl CallPanel {
    pub fn new(config: CallPanelConfig) -> Self {
        let position = Point::new(config.origin_x, config.origin_y);
        Self {
            config,
            visible: false,
            minimized: false,
            position,
            drag_offset: None,
            dial_input: String::new(),
            search: String::new(),
            call_state: CallState::Idle,
            current_call: None,
            history: Vec::new(),
            shaking_until: None,
        }
    }

    pub fn with_history(mut self, history: Vec<CallRecord>) -> Self {
        self.history = history;
        self
    }

    pub fn open(&mut self) {
        if !self.visible {
            info!("📞 Outbound call panel opened");
        }
        self.visible = true;
    }

    /// Hide the panel; an active call keeps running
    pub fn close(&mut self) {
        self.visible = false;
        self.drag_offset = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_minimized(&mut self) -> bool {
        self.minimized = !self.minimized;
        self.minimized
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Start dragging from a pointer position
    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag_offset = Some(Point::new(
            pointer.x - self.position.x,
            pointer.y - self.position.y,
        ));
    }

    /// Move with the pointer; ignored unless a drag is in progress
    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(offset) = self.drag_offset {
            self.position = Point::new(pointer.x - offset.x, pointer.y - offset.y);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_offset = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn set_dial_input(&mut self, digits: impl Into<String>) {
        self.dial_input = digits.into();
    }

    pub fn dial_input(&self) -> &str {
        &self.dial_input
    }

    /// Place a call
    pub fn dial(&mut self, phone: &str, name: Option<&str>, now: Instant) -> Result<()> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(ConsoleError::invalid_state("cannot dial an empty number"));
        }
        if self.call_state != CallState::Idle {
            return Err(ConsoleError::invalid_state("a call is already in progress"));
        }

        info!("📞 Dialing {}", phone);
        self.current_call = Some(CurrentCall {
            name: name.map(str::to_string),
            phone: phone.to_string(),
        });
        self.call_state = CallState::Calling { dialed_at: now };
        self.dial_input.clear();
        Ok(())
    }

    /// Redial a history entry
    pub fn call_back(&mut self, record_id: &str, now: Instant) -> Result<()> {
        let record = self
            .history
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| ConsoleError::invalid_state(format!("no call record {}", record_id)))?;
        self.dial(&record.phone, Some(&record.name), now)
    }

    /// Advance time-dependent state
    pub fn poll(&mut self, now: Instant) -> CallState {
        if let CallState::Calling { dialed_at } = self.call_state {
            if now.saturating_duration_since(dialed_at) >= self.config.connect_delay() {
                let connected_at = dialed_at + self.config.connect_delay();
                self.call_state = CallState::Connected { connected_at };
                debug!("Call connected");
            }
        }
        if matches!(self.shaking_until, Some(until) if now >= until) {
            self.shaking_until = None;
        }
        self.call_state
    }

    pub fn call_state(&self) -> CallState {
        self.call_state
    }

    pub fn current_call(&self) -> Option<&CurrentCall> {
        self.current_call.as_ref()
    }

    /// Whole seconds since the call connected
    pub fn call_duration(&self, now: Instant) -> Duration {
        match self.call_state {
            CallState::Connected { connected_at } => {
                Duration::from_secs(now.saturating_duration_since(connected_at).as_secs())
            }
            _ => Duration::ZERO,
        }
    }

    /// End the current call, returning its talk time
    pub fn hang_up(&mut self, now: Instant) -> Duration {
        let duration = self.call_duration(now);
        if let Some(call) = self.current_call.take() {
            info!("📴 Hung up {} after {}", call.phone, format_duration(duration));
        }
        self.call_state = CallState::Idle;
        duration
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// History entries whose name or phone contains the search text
    pub fn filtered_history(&self) -> Vec<&CallRecord> {
        self.history
            .iter()
            .filter(|r| r.name.contains(&self.search) || r.phone.contains(&self.search))
            .collect()
    }

    /// React to a signal from another widget
    pub fn apply_signal(&mut self, signal: PanelSignal, now: Instant) {
        match signal {
            PanelSignal::Shake => {
                debug!("Call panel shaking");
                self.shaking_until = Some(now + self.config.shake_duration());
            }
        }
    }

    pub fn is_shaking(&self, now: Instant) -> bool {
        matches!(self.shaking_until, Some(until) if now < until)
    }
}

/// Render a duration as `MM:SS`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
