//! ChangeStatus command handler (Escalate / Approve / Reject)
//!
//! The transition guard runs first, then the signature gate. The resulting
//! action entry carries the verified signature.

use async_trait::async_trait;
use shared::ticket::{EventPayload, Ledger, TicketAction, TicketEvent, TicketEventType};

use crate::tickets::error::TicketResult;
use crate::tickets::signature::verify_signature;
use crate::tickets::state_machine::check_transition;
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_optional_text};

#[derive(Debug, Clone)]
pub struct ChangeStatusAction {
    pub ticket_id: String,
    pub action: TicketAction,
    pub signature: String,
    pub note: Option<String>,
}

/// Ledger message used when the actor leaves no note
fn default_message(action: TicketAction) -> &'static str {
    match action {
        TicketAction::Escalate => "Laporan dieskalasi ke pusat",
        TicketAction::Approve => "Laporan disetujui dan dinyatakan selesai",
        TicketAction::Reject => "Laporan ditolak",
    }
}

#[async_trait]
impl CommandHandler for ChangeStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        let from = ticket.status;
        let to = check_transition(metadata.actor.role, from, self.action)?;

        let signature = verify_signature(&self.signature)?;

        validate_optional_text(&self.note, "note", MAX_MESSAGE_LEN)?;
        let message = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(default_message(self.action));

        let comment = metadata.comment(self.action.comment_type(), message, Some(signature));
        Ledger::validate(&comment)?;

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::StatusChanged,
            EventPayload::StatusChanged {
                from,
                to,
                action: self.action,
                comment,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::actions::fixtures::{metadata, ticket_with_status};
    use crate::tickets::error::TicketError;
    use crate::tickets::signature::tests::signature_data_url;
    use shared::models::Role;
    use shared::ticket::{AttachmentKind, CommentType, TicketStatus};

    fn change(action: TicketAction, signature: String) -> ChangeStatusAction {
        ChangeStatusAction {
            ticket_id: "t-1".into(),
            action,
            signature,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_daerah_approves_with_signature() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let events = change(TicketAction::Approve, signature_data_url())
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();

        match &events[0].payload {
            EventPayload::StatusChanged {
                from,
                to,
                comment,
                ..
            } => {
                assert_eq!(*from, TicketStatus::Pending);
                assert_eq!(*to, TicketStatus::Resolved);
                assert_eq!(comment.comment_type, CommentType::Approval);
                assert_eq!(comment.message, "Laporan disetujui dan dinyatakan selesai");
                let att = comment.attachment.as_ref().unwrap();
                assert_eq!(att.kind, AttachmentKind::Signature);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_note_replaces_default_message() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let mut action = change(TicketAction::Escalate, signature_data_url());
        action.note = Some("Butuh audit dapur pusat".into());
        let events = action
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();
        match &events[0].payload {
            EventPayload::StatusChanged { comment, .. } => {
                assert_eq!(comment.message, "Butuh audit dapur pusat");
                assert_eq!(comment.comment_type, CommentType::Escalation);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_signature() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let err = change(TicketAction::Reject, String::new())
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap_err();
        assert!(matches!(err, TicketError::MissingSignature(_)));
    }

    #[tokio::test]
    async fn test_guard_runs_before_signature_gate() {
        // Terminal ticket with no signature reports the transition problem
        let ticket = ticket_with_status(TicketStatus::Resolved);
        let err = change(TicketAction::Reject, String::new())
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap_err();
        assert!(matches!(err, TicketError::InvalidTransition { .. }));

        let ticket = ticket_with_status(TicketStatus::Escalated);
        let err = change(TicketAction::Escalate, String::new())
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap_err();
        assert_eq!(err, TicketError::AlreadyInState(TicketStatus::Escalated));
    }

    #[tokio::test]
    async fn test_non_acting_roles_forbidden() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        for role in [Role::Sekolah, Role::Mitra, Role::Murid, Role::Pusat] {
            let err = change(TicketAction::Approve, signature_data_url())
                .execute(&mut CommandContext::new(Some(&ticket)), &metadata(role))
                .await
                .unwrap_err();
            assert!(matches!(err, TicketError::Forbidden(_)), "{role}");
        }
    }
}
