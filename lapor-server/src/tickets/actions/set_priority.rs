//! SetPriority command handler

use async_trait::async_trait;
use shared::ticket::{EventPayload, Priority, TicketEvent, TicketEventType};

use super::{actor_tag, ensure_can_manage};
use crate::tickets::error::TicketResult;
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};

#[derive(Debug, Clone)]
pub struct SetPriorityAction {
    pub ticket_id: String,
    pub priority: Priority,
}

#[async_trait]
impl CommandHandler for SetPriorityAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        ensure_can_manage(ticket, metadata, "change the priority of")?;

        if ticket.priority == self.priority {
            return Ok(vec![]);
        }

        let comment = metadata.system_comment(format!(
            "{} mengubah prioritas dari {} menjadi {}",
            actor_tag(metadata),
            ticket.priority.label(),
            self.priority.label()
        ));

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::PriorityChanged,
            EventPayload::PriorityChanged {
                from: ticket.priority,
                to: self.priority,
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
    use shared::models::Role;
    use shared::ticket::TicketStatus;

    fn set(priority: Priority) -> SetPriorityAction {
        SetPriorityAction {
            ticket_id: "t-1".into(),
            priority,
        }
    }

    #[tokio::test]
    async fn test_change_priority() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let events = set(Priority::Critical)
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();
        match &events[0].payload {
            EventPayload::PriorityChanged { from, to, comment } => {
                assert_eq!(*from, Priority::Medium);
                assert_eq!(*to, Priority::Critical);
                assert!(comment.message.contains("dari Sedang menjadi Kritis"));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_priority_is_noop() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let events = set(Priority::Medium)
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Daerah))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_sekolah_cannot_change_priority() {
        let ticket = ticket_with_status(TicketStatus::Pending);
        let err = set(Priority::High)
            .execute(&mut CommandContext::new(Some(&ticket)), &metadata(Role::Sekolah))
            .await
            .unwrap_err();
        assert!(matches!(err, TicketError::Forbidden(_)));
    }
}
