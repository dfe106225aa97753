//! AddComment command handler
//!
//! Appends a contribution (text, image or standalone signature) to the
//! ledger. Action entries are produced by status transitions only.

use async_trait::async_trait;
use shared::ticket::{Attachment, CommentType, EventPayload, Ledger, TicketEvent, TicketEventType};

use crate::tickets::capability;
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::signature::check_signature;
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_attachment, validate_text};

#[derive(Debug, Clone)]
pub struct AddCommentAction {
    pub ticket_id: String,
    pub comment_type: CommentType,
    pub message: String,
    pub attachment: Option<Attachment>,
}

#[async_trait]
impl CommandHandler for AddCommentAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        let role = metadata.actor.role;

        if !capability::can_contribute(role, ticket.status) {
            return Err(TicketError::Forbidden(format!(
                "role {} cannot comment on a {} ticket",
                role, ticket.status
            )));
        }

        if self.comment_type.is_action() {
            return Err(TicketError::MalformedComment(format!(
                "{} entries are produced by status transitions only",
                self.comment_type.as_str()
            )));
        }

        validate_text(&self.message, "message", MAX_MESSAGE_LEN)?;
        if let Some(attachment) = &self.attachment {
            validate_attachment(attachment)?;
        }

        // Standalone signatures pass the same gate as status changes
        let attachment = match self.attachment.clone().filter(|a| !a.is_empty()) {
            Some(a) if self.comment_type == CommentType::Signature => Some(check_signature(a)?),
            other => other,
        };

        let comment = metadata.comment(self.comment_type, self.message.trim(), attachment);
        Ledger::validate(&comment)?;

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::CommentAdded,
            EventPayload::CommentAdded { comment },
        )])
    }
}
