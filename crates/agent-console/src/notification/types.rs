//! Transfer notification data types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a transfer notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request from another agent to hand over a conversation
///
/// This is the payload a [`TransferRequestSource`](super::TransferRequestSource)
/// produces. It only becomes a [`TransferNotification`] once the generator
/// accepts it into the pending set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Display name of the requesting agent
    pub from_agent: String,
    /// Display name of the customer being transferred
    pub customer_name: String,
    /// Free-text justification
    pub reason: String,
}

impl TransferRequest {
    pub fn new(
        from_agent: impl Into<String>,
        customer_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            from_agent: from_agent.into(),
            customer_name: customer_name.into(),
            reason: reason.into(),
        }
    }
}

/// A pending conversation-transfer request shown to the agent
///
/// Notifications are created once and removed once; nothing mutates them
/// in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferNotification {
    /// Identifier assigned at creation
    pub id: NotificationId,
    /// Display name of the requesting agent
    pub from_agent: String,
    /// Display name of the customer being transferred
    pub customer_name: String,
    /// Free-text justification
    pub reason: String,
    /// When the notification entered the pending set
    pub received_at: DateTime<Utc>,
}

impl TransferNotification {
    /// Build a notification from a request with a fresh id and the current time
    pub fn from_request(request: TransferRequest) -> Self {
        Self {
            id: NotificationId::new(),
            from_agent: request.from_agent,
            customer_name: request.customer_name,
            reason: request.reason,
            received_at: Utc::now(),
        }
    }
}

/// How a notification left the pending set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Operator accepted the transfer
    Accepted,
    /// Operator rejected the transfer
    Rejected,
    /// Countdown reached zero without operator action
    Expired,
    /// Cleared by a dismiss-all
    Dismissed,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Accepted => "accepted",
            Resolution::Rejected => "rejected",
            Resolution::Expired => "expired",
            Resolution::Dismissed => "dismissed",
        };
        f.write_str(s)
    }
}
