//! Appointment ticket triage board
//!
//! Tickets with a filterable list and a per-ticket communication log. Status
//! and assignment changes append a system entry to the log so the timeline
//! shows who changed what.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    Open,
    Pending,
    Resolved,
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub submitter: Submitter,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationKind {
    PublicReply,
    InternalNote,
    StatusChange,
    AssignmentChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    Agent,
    Customer,
    System,
}

/// One entry of a ticket's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Communication {
    pub id: String,
    pub kind: CommunicationKind,
    pub content: String,
    pub author: String,
    pub role: AuthorRole,
    pub timestamp: DateTime<Utc>,
}

impl Communication {
    fn new(
        kind: CommunicationKind,
        content: impl Into<String>,
        author: impl Into<String>,
        role: AuthorRole,
    ) -> Self {
        Self {
            id: format!("comm-{}", Uuid::new_v4()),
            kind,
            content: content.into(),
            author: author.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    fn system(kind: CommunicationKind, content: impl Into<String>) -> Self {
        Self::new(kind, content, "System", AuthorRole::System)
    }
}

/// Ticket list filter; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub search: String,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

impl TicketFilter {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Case-insensitive match on title or submitter name, plus the enum filters
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = ticket.title.to_lowercase().contains(&needle)
            || ticket.submitter.name.to_lowercase().contains(&needle);
        let matches_status = self.status.map_or(true, |s| ticket.status == s);
        let matches_priority = self.priority.map_or(true, |p| ticket.priority == p);
        matches_search && matches_status && matches_priority
    }
}

/// Tickets and their communication logs
#[derive(Debug, Default)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
    communications: HashMap<String, Vec<Communication>>,
    /// Name recorded as the author of agent replies
    agent_name: String,
}

impl TicketBoard {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            tickets: Vec::new(),
            communications: HashMap::new(),
            agent_name: agent_name.into(),
        }
    }

    pub fn add(&mut self, ticket: Ticket) {
        self.communications.entry(ticket.id.clone()).or_default();
        self.tickets.push(ticket);
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Ticket> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ConsoleError::ticket_not_found(id))
    }

    pub fn filtered(&self, filter: &TicketFilter) -> Vec<&Ticket> {
        self.tickets.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn communications(&self, id: &str) -> &[Communication] {
        self.communications
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Add a public reply or internal note; blank content is ignored
    pub fn reply(
        &mut self,
        id: &str,
        kind: CommunicationKind,
        content: &str,
    ) -> Result<Option<Communication>> {
        self.get_mut(id)?;
        if !matches!(kind, CommunicationKind::PublicReply | CommunicationKind::InternalNote) {
            return Err(ConsoleError::invalid_state(
                "replies must be public replies or internal notes",
            ));
        }
        let content = content.trim();
        if content.is_empty() {
            debug!("Ignoring blank reply on ticket {}", id);
            return Ok(None);
        }

        let entry = Communication::new(kind, content, self.agent_name.clone(), AuthorRole::Agent);
        self.push_communication(id, entry.clone());
        info!("📝 {:?} added to ticket {}", kind, id);
        Ok(Some(entry))
    }

    /// Move a ticket to a new status and log the change
    pub fn change_status(&mut self, id: &str, status: TicketStatus) -> Result<Communication> {
        let ticket = self.get_mut(id)?;
        let previous = ticket.status;
        ticket.status = status;
        ticket.updated_at = Utc::now();

        let entry = Communication::system(
            CommunicationKind::StatusChange,
            format!("status changed from \"{}\" to \"{}\"", previous, status),
        );
        self.push_communication(id, entry.clone());
        info!("🎫 Ticket {} status {} -> {}", id, previous, status);
        Ok(entry)
    }

    /// Assign a ticket to an agent and log the change
    pub fn assign(&mut self, id: &str, assignee: &str) -> Result<Communication> {
        let ticket = self.get_mut(id)?;
        let previous = ticket.assignee.replace(assignee.to_string());
        ticket.updated_at = Utc::now();

        let content = match previous {
            Some(previous) => format!("assignee changed from \"{}\" to \"{}\"", previous, assignee),
            None => format!("assigned to \"{}\"", assignee),
        };
        let entry = Communication::system(CommunicationKind::AssignmentChange, content);
        self.push_communication(id, entry.clone());
        Ok(entry)
    }

    fn push_communication(&mut self, id: &str, entry: Communication) {
        self.communications
            .entry(id.to_string())
            .or_default()
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: &str, title: &str, submitter: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: id.to_string(),
            title: title.to_string(),
            submitter: Submitter {
                name: submitter.to_string(),
                email: format!("{}@example.com", id.to_lowercase()),
                phone: "138****0000".to_string(),
            },
            status,
            priority,
            category: "appointments".to_string(),
            tags: vec![],
            description: String::new(),
            assignee: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn board() -> TicketBoard {
        let mut board = TicketBoard::new("Agent Wang");
        board.add(ticket("TK-001", "Appointment login problem", "Zhang San", TicketStatus::Open, TicketPriority::High));
        board.add(ticket("TK-002", "Reschedule request", "Li Si", TicketStatus::Pending, TicketPriority::Medium));
        board.add(ticket("TK-003", "Payment failed", "Wang Wu", TicketStatus::New, TicketPriority::Urgent));
        board
    }

    #[test]
    fn test_filter_combines_search_status_priority() {
        let board = board();
        assert_eq!(board.filtered(&TicketFilter::default()).len(), 3);
        assert_eq!(board.filtered(&TicketFilter::default().search("LOGIN")).len(), 1);
        assert_eq!(board.filtered(&TicketFilter::default().search("li si"))[0].id, "TK-002");
        assert_eq!(
            board
                .filtered(&TicketFilter::default().status(TicketStatus::New).priority(TicketPriority::Urgent))
                .len(),
            1
        );
        assert!(board
            .filtered(&TicketFilter::default().search("payment").status(TicketStatus::Open))
            .is_empty());
    }

    #[test]
    fn test_status_change_is_logged() {
        let mut board = board();
        let entry = board.change_status("TK-001", TicketStatus::Resolved).unwrap();

        assert_eq!(board.get("TK-001").unwrap().status, TicketStatus::Resolved);
        assert_eq!(entry.kind, CommunicationKind::StatusChange);
        assert_eq!(entry.role, AuthorRole::System);
        assert_eq!(entry.content, "status changed from \"open\" to \"resolved\"");
        assert_eq!(board.communications("TK-001").len(), 1);
    }

    #[test]
    fn test_reply_and_note() {
        let mut board = board();
        assert!(board.reply("TK-002", CommunicationKind::PublicReply, "  ").unwrap().is_none());
        board.reply("TK-002", CommunicationKind::PublicReply, "We moved you to Friday").unwrap();
        board.reply("TK-002", CommunicationKind::InternalNote, "Check with the clinic").unwrap();
        assert!(board.reply("TK-002", CommunicationKind::StatusChange, "nope").is_err());

        let log = board.communications("TK-002");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].author, "Agent Wang");
        assert_eq!(log[1].kind, CommunicationKind::InternalNote);
    }

    #[test]
    fn test_assign_and_unknown_ticket() {
        let mut board = board();
        let first = board.assign("TK-003", "Agent Wang").unwrap();
        assert_eq!(first.content, "assigned to \"Agent Wang\"");
        let second = board.assign("TK-003", "Agent Li").unwrap();
        assert_eq!(second.content, "assignee changed from \"Agent Wang\" to \"Agent Li\"");

        assert!(matches!(
            board.change_status("TK-999", TicketStatus::Closed),
            Err(ConsoleError::TicketNotFound { .. })
        ));
        assert!(board.communications("TK-999").is_empty());
    }
}
