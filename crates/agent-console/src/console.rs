//! # Agent Console
//!
//! The owning context for everything an agent sees: presence, the transfer
//! notification presenter and its scheduler, the conversation board, the
//! ticket triage board and the outbound call panel.
//!
//! The console constructs the scheduler and hands it the presenter's store,
//! so the timers live exactly as long as the console. Dropping the console
//! cancels them.
//!
//! ```rust,no_run
//! use agent_console::prelude::*;
//!
//! # async fn example() -> agent_console::Result<()> {
//! let mut console = AgentConsoleBuilder::new()
//!     .with_config(ConsoleConfig::default())
//!     .with_alert(std::sync::Arc::new(SilentAlert))
//!     .build()?;
//!
//! console.start()?;
//! console.set_presence(PresenceStatus::Break);
//! // ... later
//! console.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::info;

use crate::alert::{AudioAlert, SilentAlert, TerminalBell};
use crate::call_panel::CallPanel;
use crate::config::ConsoleConfig;
use crate::conversation::{Conversation, ConversationBoard, ConversationStatus};
use crate::error::Result;
use crate::events::{EventEmitter, EventIterator, PanelSignal, PanelSignalBus};
use crate::notification::{
    NotificationId, SimulatedSource, TransferNotification, TransferRequestSource,
};
use crate::presence::{PresenceHandle, PresenceStatus};
use crate::presenter::{NotificationPresenter, PanelView};
use crate::scheduler::NotificationScheduler;
use crate::ticket::TicketBoard;

/// Builder for [`AgentConsole`]
pub struct AgentConsoleBuilder {
    config: ConsoleConfig,
    agent_name: String,
    source: Option<Box<dyn TransferRequestSource>>,
    alert: Option<Arc<dyn AudioAlert>>,
    presence: PresenceStatus,
    conversations: Vec<Conversation>,
}

impl AgentConsoleBuilder {
    pub fn new() -> Self {
        Self {
            config: ConsoleConfig::default(),
            agent_name: "Agent".to_string(),
            source: None,
            alert: None,
            presence: PresenceStatus::Online,
            conversations: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }

    /// Name used as the author of ticket replies
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Request feed; defaults to a [`SimulatedSource`] over the configured templates
    pub fn with_source(mut self, source: Box<dyn TransferRequestSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Arrival alert; defaults to the terminal bell when alerts are enabled
    pub fn with_alert(mut self, alert: Arc<dyn AudioAlert>) -> Self {
        self.alert = Some(alert);
        self
    }

    pub fn with_presence(mut self, presence: PresenceStatus) -> Self {
        self.presence = presence;
        self
    }

    pub fn with_conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = conversations;
        self
    }

    pub fn build(self) -> Result<AgentConsole> {
        self.config.validate()?;
        let notifications = &self.config.notifications;

        let events = EventEmitter::new(notifications.event_capacity);
        let presence = PresenceHandle::new(self.presence);
        let presenter = NotificationPresenter::new(notifications.countdown_secs, events.clone());

        let source = self.source.unwrap_or_else(|| {
            Box::new(SimulatedSource::new(
                notifications.templates.clone(),
                notifications.generation_interval(),
            ))
        });
        let alert = self.alert.unwrap_or_else(|| {
            if notifications.alert_enabled {
                Arc::new(TerminalBell)
            } else {
                Arc::new(SilentAlert)
            }
        });

        let scheduler = NotificationScheduler::new(
            notifications,
            presenter.store(),
            presence.subscribe(),
            events,
            alert,
            source,
        );

        let signals = PanelSignalBus::default();
        let signal_rx = signals.subscribe();

        Ok(AgentConsole {
            presence,
            presenter,
            scheduler,
            conversations: ConversationBoard::new(self.conversations),
            tickets: TicketBoard::new(self.agent_name),
            call_panel: CallPanel::new(self.config.call_panel.clone()),
            signals,
            signal_rx,
            config: self.config,
        })
    }
}

impl Default for AgentConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the console for display or export
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub presence: PresenceStatus,
    pub notification_panel: Option<PanelView>,
    pub pending_notifications: usize,
    pub waiting_conversations: usize,
    pub serving_conversations: usize,
    pub completed_conversations: usize,
    pub tickets: usize,
    pub call_panel_open: bool,
}

/// Everything one agent works with
pub struct AgentConsole {
    config: ConsoleConfig,
    presence: PresenceHandle,
    presenter: NotificationPresenter,
    scheduler: NotificationScheduler,
    conversations: ConversationBoard,
    tickets: TicketBoard,
    call_panel: CallPanel,
    signals: PanelSignalBus,
    /// The call panel's subscription to the signal bus
    signal_rx: broadcast::Receiver<PanelSignal>,
}

impl AgentConsole {
    pub fn builder() -> AgentConsoleBuilder {
        AgentConsoleBuilder::new()
    }

    /// Start the notification timers
    pub fn start(&mut self) -> Result<()> {
        self.scheduler.start()?;
        info!("✅ Agent console started (presence: {})", self.presence.current());
        Ok(())
    }

    /// Cancel the notification timers
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Cancel the notification timers and wait for them to exit
    pub async fn shutdown(&mut self) {
        self.scheduler.shutdown().await;
        info!("✅ Agent console shut down");
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Whether the request source ran dry; countdowns keep ticking regardless
    pub fn generator_finished(&self) -> bool {
        self.scheduler.generator_finished()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Change presence; pending notifications are kept
    pub fn set_presence(&self, status: PresenceStatus) {
        self.presence.set(status);
    }

    pub fn presence(&self) -> PresenceStatus {
        self.presence.current()
    }

    pub fn presenter(&self) -> &NotificationPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut NotificationPresenter {
        &mut self.presenter
    }

    pub fn accept_transfer(&self, id: &NotificationId) -> Option<TransferNotification> {
        self.presenter.accept(id)
    }

    pub fn reject_transfer(&self, id: &NotificationId) -> Option<TransferNotification> {
        self.presenter.reject(id)
    }

    pub fn dismiss_all_transfers(&self) -> usize {
        self.presenter.dismiss_all()
    }

    /// Subscribe to notification lifecycle events
    pub fn events(&self) -> EventIterator {
        self.presenter.events().iter()
    }

    pub fn conversations(&self) -> &ConversationBoard {
        &self.conversations
    }

    pub fn conversations_mut(&mut self) -> &mut ConversationBoard {
        &mut self.conversations
    }

    pub fn tickets(&self) -> &TicketBoard {
        &self.tickets
    }

    pub fn tickets_mut(&mut self) -> &mut TicketBoard {
        &mut self.tickets
    }

    pub fn call_panel(&self) -> &CallPanel {
        &self.call_panel
    }

    pub fn call_panel_mut(&mut self) -> &mut CallPanel {
        &mut self.call_panel
    }

    pub fn panel_signals(&self) -> &PanelSignalBus {
        &self.signals
    }

    /// The header's outbound-call button
    ///
    /// Opens the call panel, or shakes it when it is already open.
    pub fn press_outbound_button(&mut self, now: Instant) {
        if self.call_panel.is_visible() {
            self.signals.publish(PanelSignal::Shake);
        } else {
            self.call_panel.open();
        }
        self.deliver_panel_signals(now);
    }

    /// Hand queued bus signals to the call panel
    pub fn deliver_panel_signals(&mut self, now: Instant) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.call_panel.apply_signal(signal, now);
        }
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            presence: self.presence.current(),
            notification_panel: self.presenter.view(),
            pending_notifications: self.presenter.pending_count(),
            waiting_conversations: self.conversations.by_status(ConversationStatus::Waiting).len(),
            serving_conversations: self.conversations.by_status(ConversationStatus::Serving).len(),
            completed_conversations: self
                .conversations
                .by_status(ConversationStatus::Completed)
                .len(),
            tickets: self.tickets.len(),
            call_panel_open: self.call_panel.is_visible(),
        }
    }

    /// Pretty-printed JSON of [`snapshot`](Self::snapshot)
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{ChannelSource, TransferRequest};
    use std::time::Duration;

    fn console() -> AgentConsole {
        let (_sender, source) = ChannelSource::new(1);
        AgentConsoleBuilder::new()
            .with_source(Box::new(source))
            .with_alert(Arc::new(SilentAlert))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = ConsoleConfig::default();
        config.notifications.tick_interval_ms = 0;
        assert!(AgentConsoleBuilder::new().with_config(config).build().is_err());
    }

    #[tokio::test]
    async fn test_outbound_button_opens_then_shakes() {
        let mut console = console();
        let now = Instant::now();

        console.press_outbound_button(now);
        assert!(console.call_panel().is_visible());
        assert!(!console.call_panel().is_shaking(now));

        console.press_outbound_button(now);
        assert!(console.call_panel().is_visible());
        assert!(console.call_panel().is_shaking(now + Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_presence_change_keeps_pending() {
        let console = console();
        console.presenter().push(TransferNotification::from_request(TransferRequest::new(
            "Agent Li", "Zhou Jie", "Refund",
        )));
        console.set_presence(PresenceStatus::Offline);

        let snapshot = console.snapshot();
        assert_eq!(snapshot.presence, PresenceStatus::Offline);
        assert_eq!(snapshot.pending_notifications, 1);
        assert!(snapshot.notification_panel.is_some());

        let json: serde_json::Value = serde_json::from_str(&console.snapshot_json().unwrap()).unwrap();
        assert_eq!(json["presence"], "offline");
        assert_eq!(json["notification_panel"]["mode"], "collapsed");
    }

    #[tokio::test]
    async fn test_drop_releases_running_scheduler() {
        let mut console = console();
        console.start().unwrap();
        assert!(console.is_running());
        drop(console);
    }
}
