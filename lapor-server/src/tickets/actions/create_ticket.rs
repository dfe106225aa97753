//! CreateTicket command handler
//!
//! A school opens a regular ticket. The ticket starts `pending`; an optional
//! photo becomes the first ledger entry.

use async_trait::async_trait;
use shared::ticket::{
    Attachment, AttachmentKind, Category, CommentType, EventPayload, Ledger, Priority,
    TicketEvent, TicketEventType,
};

use crate::tickets::capability;
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_SCHOOL_NAME_LEN, validate_attachment,
    validate_required_text,
};

#[derive(Debug, Clone)]
pub struct CreateTicketAction {
    /// Pre-generated by TicketManager
    pub ticket_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Option<Priority>,
    pub school_name: String,
    pub attachment: Option<Attachment>,
}

#[async_trait]
impl CommandHandler for CreateTicketAction {
    async fn execute(
        &self,
        _ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let actor = &metadata.actor;
        if !capability::can_create_ticket(actor.role) {
            return Err(TicketError::Forbidden(format!(
                "role {} cannot open tickets",
                actor.role
            )));
        }
        // An unbound school could never read its own ticket back
        let school_id = actor.school_id.clone().ok_or_else(|| {
            TicketError::Forbidden("school account is not linked to a school".into())
        })?;

        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&self.description, "description", MAX_MESSAGE_LEN)?;
        validate_required_text(&self.school_name, "school_name", MAX_SCHOOL_NAME_LEN)?;

        // Student submissions go through SubmitStudentReport
        if self.category == Category::LaporanSiswa {
            return Err(TicketError::Validation(
                "category Laporan Siswa is reserved for student reports".into(),
            ));
        }

        let initial_comment = match self.attachment.as_ref().filter(|a| !a.is_empty()) {
            Some(photo) => {
                validate_attachment(photo)?;
                if photo.kind != AttachmentKind::Image {
                    return Err(TicketError::InvalidAttachment(
                        "ticket attachment must be an image".into(),
                    ));
                }
                let comment = metadata.comment(CommentType::Image, "", Some(photo.clone()));
                Ledger::validate(&comment)?;
                Some(comment)
            }
            None => None,
        };

        let event = metadata.event(
            &self.ticket_id,
            TicketEventType::TicketCreated,
            EventPayload::TicketCreated {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                category: self.category,
                priority: self.priority.unwrap_or_default(),
                school_name: self.school_name.trim().to_string(),
                school_id: Some(school_id),
                reporter_id: actor.user_id.clone(),
                reporter_role: actor.role,
                student_reports: Vec::new(),
                initial_comment,
            },
        );

        Ok(vec![event])
    }
}
