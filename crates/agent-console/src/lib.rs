//! # Agent Console
//!
//! State layer of a customer-service agent console. The centrepiece is the
//! transfer notification lifecycle: colleagues ask the agent to take over a
//! customer, each request shows up as a card with a 30 second countdown, and
//! the agent accepts it, rejects it, dismisses everything, or lets it expire.
//!
//! Around that lifecycle sit the other console widgets:
//!
//! - **presence**: online / offline / break; only an online agent receives
//!   new transfer requests
//! - **conversations**: the waiting / serving / completed chat board
//! - **tickets**: appointment ticket triage with a communication timeline
//! - **call panel**: the floating outbound-call panel, shaken through a
//!   signal bus when it is summoned twice
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_console::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> agent_console::Result<()> {
//!     let mut console = AgentConsole::builder().build()?;
//!     let mut events = console.events();
//!     console.start()?;
//!
//!     while let Some(event) = events.next().await {
//!         if let NotificationEvent::Arrived(notification) = event {
//!             console.accept_transfer(&notification.id);
//!             break;
//!         }
//!     }
//!
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//!     console.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod call_panel;
pub mod config;
pub mod console;
pub mod conversation;
pub mod error;
pub mod events;
pub mod logging;
pub mod notification;
pub mod presence;
pub mod presenter;
pub mod scheduler;
pub mod ticket;

pub use config::ConsoleConfig;
pub use console::{AgentConsole, AgentConsoleBuilder, ConsoleSnapshot};
pub use error::{ConsoleError, Result};
pub use events::{EventEmitter, EventIterator, NotificationEvent, PanelSignal, PanelSignalBus};
pub use notification::{
    NotificationId, NotificationStore, Resolution, TransferNotification, TransferRequest,
    TransferRequestSource,
};
pub use presence::PresenceStatus;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types
pub mod prelude {
    pub use crate::alert::{AudioAlert, SilentAlert, TerminalBell};
    pub use crate::call_panel::{CallPanel, CallState, Point};
    pub use crate::config::{CallPanelConfig, ConsoleConfig, NotificationConfig};
    pub use crate::console::{AgentConsole, AgentConsoleBuilder, ConsoleSnapshot};
    pub use crate::conversation::{Conversation, ConversationBoard, ConversationStatus};
    pub use crate::error::{ConsoleError, Result};
    pub use crate::events::{NotificationEvent, PanelSignal};
    pub use crate::notification::{
        ChannelSource, NotificationId, Resolution, SimulatedSource, TransferNotification,
        TransferRequest, TransferRequestSource,
    };
    pub use crate::presence::{PresenceHandle, PresenceStatus};
    pub use crate::presenter::{NotificationPresenter, PanelView};
    pub use crate::ticket::{TicketBoard, TicketFilter, TicketStatus};
}
