//! Ticket commands - requests to create or mutate a ticket

use super::types::{Attachment, Category, CommentType, Priority, TicketAction};
use crate::models::Actor;
use serde::{Deserialize, Serialize};

/// Ticket command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCommand {
    /// Unique command ID
    pub command_id: String,
    /// Server timestamp (Unix milliseconds); stamped on every ledger entry
    /// the command produces
    pub timestamp: i64,
    /// Acting user
    pub operator: Actor,
    pub payload: TicketCommandPayload,
}

impl TicketCommand {
    pub fn new(operator: Actor, payload: TicketCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            timestamp: crate::util::now_millis(),
            operator,
            payload,
        }
    }

    /// Target ticket, `None` for creation commands
    pub fn ticket_id(&self) -> Option<&str> {
        self.payload.ticket_id()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCommandPayload {
    // ========== Creation ==========
    CreateTicket {
        title: String,
        description: String,
        category: Category,
        #[serde(default)]
        priority: Option<Priority>,
        school_name: String,
        /// Optional photo, recorded as the first ledger entry
        #[serde(default)]
        attachment: Option<Attachment>,
    },

    /// Student submission: a report plus an auto-created ticket
    SubmitStudentReport {
        title: String,
        description: String,
        school_name: String,
        photo: Attachment,
    },

    // ========== Ledger ==========
    AddComment {
        ticket_id: String,
        comment_type: CommentType,
        #[serde(default)]
        message: String,
        #[serde(default)]
        attachment: Option<Attachment>,
    },

    // ========== Status ==========
    /// Escalate / Approve / Reject
    ChangeStatus {
        ticket_id: String,
        action: TicketAction,
        /// Captured signature, base64 or data URL
        signature: String,
        #[serde(default)]
        note: Option<String>,
    },

    // ========== Attachments ==========
    AddMitra {
        ticket_id: String,
        name: String,
    },

    RemoveMitra {
        ticket_id: String,
        index: usize,
    },

    SetStudentReports {
        ticket_id: String,
        report_ids: Vec<String>,
    },

    SetPriority {
        ticket_id: String,
        priority: Priority,
    },
}

impl TicketCommandPayload {
    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            TicketCommandPayload::CreateTicket { .. }
            | TicketCommandPayload::SubmitStudentReport { .. } => None,
            TicketCommandPayload::AddComment { ticket_id, .. }
            | TicketCommandPayload::ChangeStatus { ticket_id, .. }
            | TicketCommandPayload::AddMitra { ticket_id, .. }
            | TicketCommandPayload::RemoveMitra { ticket_id, .. }
            | TicketCommandPayload::SetStudentReports { ticket_id, .. }
            | TicketCommandPayload::SetPriority { ticket_id, .. } => Some(ticket_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TicketCommandPayload::CreateTicket { .. } => "CREATE_TICKET",
            TicketCommandPayload::SubmitStudentReport { .. } => "SUBMIT_STUDENT_REPORT",
            TicketCommandPayload::AddComment { .. } => "ADD_COMMENT",
            TicketCommandPayload::ChangeStatus { .. } => "CHANGE_STATUS",
            TicketCommandPayload::AddMitra { .. } => "ADD_MITRA",
            TicketCommandPayload::RemoveMitra { .. } => "REMOVE_MITRA",
            TicketCommandPayload::SetStudentReports { .. } => "SET_STUDENT_REPORTS",
            TicketCommandPayload::SetPriority { .. } => "SET_PRIORITY",
        }
    }
}
