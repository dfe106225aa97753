//! AddMitra / RemoveMitra command handlers
//!
//! The assigned-partner list is an insertion-ordered set. Adding a name that
//! is already assigned changes nothing and writes nothing.

use async_trait::async_trait;
use shared::models::Partner;
use shared::ticket::{EventPayload, TicketEvent, TicketEventType};

use super::{actor_tag, ensure_can_manage};
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Debug, Clone)]
pub struct AddMitraAction {
    pub ticket_id: String,
    pub name: String,
    /// Partner directory snapshot (injected by TicketManager)
    pub partners: Vec<Partner>,
}

#[async_trait]
impl CommandHandler for AddMitraAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        ensure_can_manage(ticket, metadata, "assign partners to")?;

        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        let name = self.name.trim();

        let partner = self
            .partners
            .iter()
            .find(|p| p.full_name == name)
            .ok_or_else(|| TicketError::partner_not_found(name))?;

        if ticket.has_mitra(&partner.full_name) {
            return Ok(vec![]);
        }

        let comment = metadata.system_comment(format!(
            "{} menugaskan mitra {}",
            actor_tag(metadata),
            partner.full_name
        ));

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::MitraAssigned,
            EventPayload::MitraAssigned {
                name: partner.full_name.clone(),
                comment,
            },
        )])
    }
}

#[derive(Debug, Clone)]
pub struct RemoveMitraAction {
    pub ticket_id: String,
    pub index: usize,
}

#[async_trait]
impl CommandHandler for RemoveMitraAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        ensure_can_manage(ticket, metadata, "remove partners from")?;

        let name = ticket
            .assigned_mitra
            .get(self.index)
            .ok_or(TicketError::IndexOutOfRange {
                index: self.index,
                len: ticket.assigned_mitra.len(),
            })?;

        let comment = metadata.system_comment(format!(
            "{} menghapus mitra {}",
            actor_tag(metadata),
            name
        ));

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::MitraRemoved,
            EventPayload::MitraRemoved {
                index: self.index,
                name: name.clone(),
                comment,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::actions::fixtures::{metadata, partners, ticket_with_status};
    use shared::models::Role;
    use shared::ticket::{AuthorRole, TicketStatus};

    fn add(name: &str) -> AddMitraAction {
        AddMitraAction {
            ticket_id: "t-1".into(),
            name: name.into(),
            partners: partners(),
        }
    }

    #[tokio::test]
    async fn test_add_known_partner() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let events = add(" CV Mitra Sejahtera ")
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();

        match &events[0].payload {
            EventPayload::MitraAssigned { name, comment } => {
                assert_eq!(name, "CV Mitra Sejahtera");
                assert_eq!(comment.role, AuthorRole::System);
                assert!(comment.message.contains("menugaskan mitra CV Mitra Sejahtera"));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_duplicate_is_noop() {
        let mut ticket = ticket_with_status(TicketStatus::Pending);
        ticket.assigned_mitra.push("CV Mitra Sejahtera".into());
        let events = add("CV Mitra Sejahtera")
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_partner() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let err = add("PT Tidak Ada")
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap_err();
        assert_eq!(err, TicketError::partner_not_found("PT Tidak Ada"));
    }

    #[tokio::test]
    async fn test_manage_rights() {
        let pending = ticket_with_status(TicketStatus::Pending);
        for role in [Role::Sekolah, Role::Mitra, Role::Murid, Role::Pusat] {
            let err = add("CV Mitra Sejahtera")
                .execute(&mut CommandContext::new(Some(&pending)), &metadata(role))
                .await
                .unwrap_err();
            assert!(matches!(err, TicketError::Forbidden(_)), "{role}");
        }

        let escalated = ticket_with_status(TicketStatus::Escalated);
        assert!(
            add("CV Mitra Sejahtera")
                .execute(&mut CommandContext::new(Some(&escalated)), &metadata(Role::Pusat))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_remove_by_index() {
        let mut ticket = ticket_with_status(TicketStatus::Pending);
        ticket.assigned_mitra = vec!["CV Mitra Sejahtera".into(), "UD Sumber Pangan".into()];

        let events = RemoveMitraAction {
            ticket_id: "t-1".into(),
            index: 1,
        }
        .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
        .await
        .unwrap();
        match &events[0].payload {
            EventPayload::MitraRemoved { index, name, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(name, "UD Sumber Pangan");
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let err = RemoveMitraAction {
            ticket_id: "t-1".into(),
            index: 2,
        }
        .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
        .await
        .unwrap_err();
        assert_eq!(err, TicketError::IndexOutOfRange { index: 2, len: 2 });
    }
}
