//! Ticket events - facts produced by command handlers and applied to the
//! ticket snapshot

use super::ledger::NewComment;
use super::snapshot::StudentReportRef;
use super::types::{Category, Priority, TicketAction, TicketStatus};
use crate::models::Role;
use serde::{Deserialize, Serialize};

/// Ticket event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketEvent {
    pub event_id: String,
    pub ticket_id: String,
    /// Command timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    pub command_id: String,
    pub event_type: TicketEventType,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketEventType {
    TicketCreated,
    CommentAdded,
    StatusChanged,
    MitraAssigned,
    MitraRemoved,
    StudentReportsReplaced,
    PriorityChanged,
}

impl std::fmt::Display for TicketEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketEventType::TicketCreated => write!(f, "TICKET_CREATED"),
            TicketEventType::CommentAdded => write!(f, "COMMENT_ADDED"),
            TicketEventType::StatusChanged => write!(f, "STATUS_CHANGED"),
            TicketEventType::MitraAssigned => write!(f, "MITRA_ASSIGNED"),
            TicketEventType::MitraRemoved => write!(f, "MITRA_REMOVED"),
            TicketEventType::StudentReportsReplaced => write!(f, "STUDENT_REPORTS_REPLACED"),
            TicketEventType::PriorityChanged => write!(f, "PRIORITY_CHANGED"),
        }
    }
}

/// Event payload variants. Every mutation after creation carries the ledger
/// entry recording it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    TicketCreated {
        title: String,
        description: String,
        category: Category,
        priority: Priority,
        school_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        school_id: Option<String>,
        reporter_id: String,
        reporter_role: Role,
        #[serde(default)]
        student_reports: Vec<StudentReportRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_comment: Option<NewComment>,
    },

    CommentAdded {
        comment: NewComment,
    },

    StatusChanged {
        from: TicketStatus,
        to: TicketStatus,
        action: TicketAction,
        comment: NewComment,
    },

    MitraAssigned {
        name: String,
        comment: NewComment,
    },

    MitraRemoved {
        index: usize,
        name: String,
        comment: NewComment,
    },

    StudentReportsReplaced {
        reports: Vec<StudentReportRef>,
        comment: NewComment,
    },

    PriorityChanged {
        from: Priority,
        to: Priority,
        comment: NewComment,
    },
}

impl TicketEvent {
    pub fn new(
        ticket_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        timestamp: i64,
        event_type: TicketEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            ticket_id,
            timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }
}
