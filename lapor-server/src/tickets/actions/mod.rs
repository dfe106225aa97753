//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use async_trait::async_trait;

use crate::tickets::capability;
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use shared::ticket::{Ticket, TicketCommand, TicketCommandPayload, TicketEvent};

mod add_comment;
mod assign_mitra;
mod change_status;
mod create_ticket;
mod set_priority;
mod set_student_reports;
mod submit_student_report;

pub use add_comment::AddCommentAction;
pub use assign_mitra::{AddMitraAction, RemoveMitraAction};
pub use change_status::ChangeStatusAction;
pub use create_ticket::CreateTicketAction;
pub use set_priority::SetPriorityAction;
pub use set_student_reports::SetStudentReportsAction;
pub use submit_student_report::SubmitStudentReportAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    CreateTicket(CreateTicketAction),
    SubmitStudentReport(SubmitStudentReportAction),
    AddComment(AddCommentAction),
    ChangeStatus(ChangeStatusAction),
    AddMitra(AddMitraAction),
    RemoveMitra(RemoveMitraAction),
    SetStudentReports(SetStudentReportsAction),
    SetPriority(SetPriorityAction),
}

#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        match self {
            CommandAction::CreateTicket(action) => action.execute(ctx, metadata).await,
            CommandAction::SubmitStudentReport(action) => action.execute(ctx, metadata).await,
            CommandAction::AddComment(action) => action.execute(ctx, metadata).await,
            CommandAction::ChangeStatus(action) => action.execute(ctx, metadata).await,
            CommandAction::AddMitra(action) => action.execute(ctx, metadata).await,
            CommandAction::RemoveMitra(action) => action.execute(ctx, metadata).await,
            CommandAction::SetStudentReports(action) => action.execute(ctx, metadata).await,
            CommandAction::SetPriority(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert TicketCommand to CommandAction
///
/// This is the ONLY place with a match on TicketCommandPayload. Creation
/// commands need pre-generated ids and lookup commands need directory data,
/// so both are built by `TicketManager` and refused here.
impl TryFrom<&TicketCommand> for CommandAction {
    type Error = TicketError;

    fn try_from(cmd: &TicketCommand) -> TicketResult<Self> {
        let action = match &cmd.payload {
            TicketCommandPayload::CreateTicket { .. }
            | TicketCommandPayload::SubmitStudentReport { .. }
            | TicketCommandPayload::AddMitra { .. }
            | TicketCommandPayload::SetStudentReports { .. } => {
                return Err(TicketError::Validation(format!(
                    "{} must be built by the ticket manager",
                    cmd.payload.name()
                )));
            }
            TicketCommandPayload::AddComment {
                ticket_id,
                comment_type,
                message,
                attachment,
            } => CommandAction::AddComment(AddCommentAction {
                ticket_id: ticket_id.clone(),
                comment_type: *comment_type,
                message: message.clone(),
                attachment: attachment.clone(),
            }),
            TicketCommandPayload::ChangeStatus {
                ticket_id,
                action,
                signature,
                note,
            } => CommandAction::ChangeStatus(ChangeStatusAction {
                ticket_id: ticket_id.clone(),
                action: *action,
                signature: signature.clone(),
                note: note.clone(),
            }),
            TicketCommandPayload::RemoveMitra { ticket_id, index } => {
                CommandAction::RemoveMitra(RemoveMitraAction {
                    ticket_id: ticket_id.clone(),
                    index: *index,
                })
            }
            TicketCommandPayload::SetPriority {
                ticket_id,
                priority,
            } => CommandAction::SetPriority(SetPriorityAction {
                ticket_id: ticket_id.clone(),
                priority: *priority,
            }),
        };
        Ok(action)
    }
}

/// Mitra, report and priority changes share one guard
pub(crate) fn ensure_can_manage(
    ticket: &Ticket,
    metadata: &CommandMetadata,
    what: &str,
) -> TicketResult<()> {
    let role = metadata.actor.role;
    if capability::can_manage(role, ticket.status) {
        Ok(())
    } else {
        Err(TicketError::Forbidden(format!(
            "role {} cannot {} a {} ticket",
            role, what, ticket.status
        )))
    }
}

/// "Name (Role)" as written into system ledger entries
pub(crate) fn actor_tag(metadata: &CommandMetadata) -> String {
    format!(
        "{} ({})",
        metadata.actor.full_name,
        metadata.actor.role.label()
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;
    use shared::ticket::{Category, CommentType};

    #[test]
    fn test_plain_commands_convert() {
        let cmd = TicketCommand::new(
            fixtures::actor(Role::Sekolah),
            TicketCommandPayload::AddComment {
                ticket_id: "t-1".into(),
                comment_type: CommentType::Text,
                message: "halo".into(),
                attachment: None,
            },
        );
        assert!(matches!(
            CommandAction::try_from(&cmd),
            Ok(CommandAction::AddComment(_))
        ));
    }

    #[test]
    fn test_manager_built_commands_are_refused() {
        let create = TicketCommand::new(
            fixtures::actor(Role::Sekolah),
            TicketCommandPayload::CreateTicket {
                title: "Nasi basi".into(),
                description: String::new(),
                category: Category::KualitasMakanan,
                priority: None,
                school_name: "SDN 1 Bandung".into(),
                attachment: None,
            },
        );
        assert!(matches!(
            CommandAction::try_from(&create),
            Err(TicketError::Validation(_))
        ));

        let link = TicketCommand::new(
            fixtures::actor(Role::Daerah),
            TicketCommandPayload::SetStudentReports {
                ticket_id: "t-1".into(),
                report_ids: vec!["r-1".into()],
            },
        );
        assert!(CommandAction::try_from(&link).is_err());
    }
}
