//! Error types for the agent console

use thiserror::Error;

/// Result type for agent console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Errors that can occur in the agent console
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation not valid in the current state
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Conversation not found on the board
    #[error("Conversation not found: {conversation_id}")]
    ConversationNotFound { conversation_id: String },

    /// Ticket not found on the triage board
    #[error("Ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: String },

    /// Configuration source could not be read or deserialized
    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    /// Snapshot serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a conversation-not-found error
    pub fn conversation_not_found(conversation_id: impl Into<String>) -> Self {
        Self::ConversationNotFound {
            conversation_id: conversation_id.into(),
        }
    }

    /// Create a ticket-not-found error
    pub fn ticket_not_found(ticket_id: impl Into<String>) -> Self {
        Self::TicketNotFound {
            ticket_id: ticket_id.into(),
        }
    }
}
