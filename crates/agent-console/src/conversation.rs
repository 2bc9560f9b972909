//! Conversation board
//!
//! The left-hand list of the chat workspace: conversations grouped into
//! waiting, serving and completed tabs, plus the message history of each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ConsoleError, Result};

/// Which tab a conversation sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Waiting,
    Serving,
    Completed,
}

/// Highlight level of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPriority {
    #[default]
    Normal,
    Warning,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Customer,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub kind: MessageKind,
    pub content: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            sender,
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub customer_name: String,
    pub last_message: String,
    /// Seconds the customer has been waiting
    pub wait_secs: u64,
    pub unread: u32,
    pub status: ConversationStatus,
    pub priority: ConversationPriority,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            last_message: String::new(),
            wait_secs: 0,
            unread: 0,
            status: ConversationStatus::Waiting,
            priority: ConversationPriority::Normal,
            messages: Vec::new(),
        }
    }

    /// Record a customer message
    pub fn receive(&mut self, kind: MessageKind, content: impl Into<String>) {
        let message = ChatMessage::new(kind, content, Sender::Customer);
        self.last_message = message.content.clone();
        self.unread += 1;
        self.messages.push(message);
    }
}

/// All conversations of the current agent
#[derive(Debug, Default, Serialize)]
pub struct ConversationBoard {
    conversations: Vec<Conversation>,
    selected: Option<String>,
}

impl ConversationBoard {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            selected: None,
        }
    }

    pub fn add(&mut self, conversation: Conversation) {
        self.conversations.push(conversation);
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ConsoleError::conversation_not_found(id))
    }

    /// Conversations in one tab
    pub fn by_status(&self, status: ConversationStatus) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|c| c.status == status)
            .collect()
    }

    /// Open a conversation in the chat panel, marking it read
    pub fn select(&mut self, id: &str) -> Result<&Conversation> {
        let conversation = self.get_mut(id)?;
        conversation.unread = 0;
        self.selected = Some(id.to_string());
        self.get(id).ok_or_else(|| ConsoleError::conversation_not_found(id))
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Send an agent message; blank text is ignored
    pub fn send_message(&mut self, id: &str, text: &str) -> Result<Option<ChatMessage>> {
        let conversation = self.get_mut(id)?;
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank message for conversation {}", id);
            return Ok(None);
        }

        let message = ChatMessage::new(MessageKind::Text, text, Sender::Agent);
        conversation.last_message = message.content.clone();
        conversation.messages.push(message.clone());
        info!("💬 Sent message to {}", conversation.customer_name);
        Ok(Some(message))
    }

    /// Start serving a waiting conversation
    pub fn accept(&mut self, id: &str) -> Result<()> {
        let conversation = self.get_mut(id)?;
        if conversation.status != ConversationStatus::Waiting {
            return Err(ConsoleError::invalid_state(format!(
                "conversation {} is not waiting",
                id
            )));
        }
        conversation.status = ConversationStatus::Serving;
        info!("🎧 Serving {}", conversation.customer_name);
        Ok(())
    }

    /// Close a conversation
    pub fn end_session(&mut self, id: &str) -> Result<()> {
        let conversation = self.get_mut(id)?;
        conversation.status = ConversationStatus::Completed;
        info!("🏁 Session with {} ended", conversation.customer_name);
        Ok(())
    }

    /// Hand a conversation to another agent, removing it from this board
    pub fn transfer(&mut self, id: &str, target_agent: &str) -> Result<Conversation> {
        let position = self
            .conversations
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ConsoleError::conversation_not_found(id))?;
        let conversation = self.conversations.remove(position);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!(
            "🔀 Transferred {} to {}",
            conversation.customer_name, target_agent
        );
        Ok(conversation)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

/// Render a wait time as `MM:SS`
pub fn format_wait_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> ConversationBoard {
        let mut waiting = Conversation::new("1", "Zhang Xiaoming");
        waiting.wait_secs = 180;
        waiting.receive(MessageKind::Text, "I have a question about my workflow");
        waiting.receive(MessageKind::Code, "fn main() {}");

        let mut serving = Conversation::new("2", "Li Xiaohong");
        serving.status = ConversationStatus::Serving;
        serving.priority = ConversationPriority::Warning;

        ConversationBoard::new(vec![waiting, serving])
    }

    #[test]
    fn test_tabs_group_by_status() {
        let board = board();
        assert_eq!(board.by_status(ConversationStatus::Waiting).len(), 1);
        assert_eq!(board.by_status(ConversationStatus::Serving).len(), 1);
        assert!(board.by_status(ConversationStatus::Completed).is_empty());
    }

    #[test]
    fn test_select_clears_unread() {
        let mut board = board();
        assert_eq!(board.get("1").unwrap().unread, 2);
        board.select("1").unwrap();
        assert_eq!(board.selected().unwrap().unread, 0);
        assert!(board.select("missing").is_err());
    }

    #[test]
    fn test_send_message_trims_and_ignores_blank() {
        let mut board = board();
        assert!(board.send_message("1", "   ").unwrap().is_none());

        let sent = board.send_message("1", "  Hello, how can I help?  ").unwrap().unwrap();
        assert_eq!(sent.content, "Hello, how can I help?");
        assert_eq!(sent.sender, Sender::Agent);
        assert_eq!(board.get("1").unwrap().last_message, "Hello, how can I help?");
        assert_eq!(board.get("1").unwrap().messages.len(), 3);
    }

    #[test]
    fn test_accept_end_and_transfer() {
        let mut board = board();
        board.accept("1").unwrap();
        assert!(board.accept("1").is_err());
        board.end_session("1").unwrap();
        assert_eq!(board.by_status(ConversationStatus::Completed).len(), 1);

        board.select("2").unwrap();
        let moved = board.transfer("2", "Agent Wang").unwrap();
        assert_eq!(moved.customer_name, "Li Xiaohong");
        assert!(board.selected().is_none());
        assert_eq!(board.len(), 1);
        assert!(matches!(
            board.transfer("2", "Agent Wang"),
            Err(ConsoleError::ConversationNotFound { .. })
        ));
    }

    #[test]
    fn test_format_wait_time() {
        assert_eq!(format_wait_time(180), "03:00");
        assert_eq!(format_wait_time(61), "01:01");
    }
}
