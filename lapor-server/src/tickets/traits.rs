//! Command handler and event applier contracts
//!
//! Commands are turned into events by [`CommandHandler`]s; events are folded
//! into the ticket snapshot by [`EventApplier`]s. Handlers never mutate the
//! ticket, appliers never fail on valid input and never do I/O.

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use shared::models::Actor;
use shared::ticket::{
    Attachment, AuthorRole, CommentType, EventPayload, NewComment, Ticket, TicketEvent,
    TicketEventType,
};

use super::error::{TicketError, TicketResult};

/// Author id and display name of system-generated ledger entries
pub const SYSTEM_AUTHOR_ID: &str = "system";
pub const SYSTEM_AUTHOR_NAME: &str = "Sistem";

/// Read-only view handed to a command handler
pub struct CommandContext<'a> {
    ticket: Option<&'a Ticket>,
}

impl<'a> CommandContext<'a> {
    pub fn new(ticket: Option<&'a Ticket>) -> Self {
        Self { ticket }
    }

    /// Context for creation commands
    pub fn empty() -> Self {
        Self { ticket: None }
    }

    /// The ticket this command targets
    pub fn load_ticket(&self, ticket_id: &str) -> TicketResult<&'a Ticket> {
        match self.ticket {
            Some(ticket) if ticket.id == ticket_id => Ok(ticket),
            _ => Err(TicketError::ticket_not_found(ticket_id)),
        }
    }
}

/// Who issued the command and when
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor: Actor,
    pub timestamp: i64,
}

impl CommandMetadata {
    /// Ledger entry authored by the acting user
    pub fn comment(
        &self,
        comment_type: CommentType,
        message: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> NewComment {
        NewComment {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: self.actor.user_id.clone(),
            author: self.actor.full_name.clone(),
            role: self.actor.role.into(),
            time: self.timestamp,
            message: message.into(),
            comment_type,
            attachment,
        }
    }

    /// Text entry written by the system on the actor's behalf
    pub fn system_comment(&self, message: impl Into<String>) -> NewComment {
        NewComment {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: SYSTEM_AUTHOR_ID.to_string(),
            author: SYSTEM_AUTHOR_NAME.to_string(),
            role: AuthorRole::System,
            time: self.timestamp,
            message: message.into(),
            comment_type: CommentType::Text,
            attachment: None,
        }
    }

    pub fn event(
        &self,
        ticket_id: &str,
        event_type: TicketEventType,
        payload: EventPayload,
    ) -> TicketEvent {
        TicketEvent::new(
            ticket_id.to_string(),
            self.actor.user_id.clone(),
            self.actor.full_name.clone(),
            self.command_id.clone(),
            self.timestamp,
            event_type,
            payload,
        )
    }
}

/// Validates a command against the current ticket and produces events
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>>;
}

/// Folds one event into the ticket snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()>;
}
