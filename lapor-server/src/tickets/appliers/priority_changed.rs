//! PriorityChanged event applier

use crate::tickets::error::TicketResult;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct PriorityChangedApplier;

impl EventApplier for PriorityChangedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::PriorityChanged { to, comment, .. } = &event.payload {
            ticket.comments.append(comment.clone())?;
            ticket.priority = *to;
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::appliers::fixtures::{created_ticket, event, text};
    use shared::ticket::{Priority, TicketEventType};

    #[test]
    fn test_sets_priority() {
        let mut ticket = created_ticket();
        let e = event(
            TicketEventType::PriorityChanged,
            EventPayload::PriorityChanged {
                from: Priority::Medium,
                to: Priority::High,
                comment: text("c-1", "mengubah prioritas"),
            },
        );
        PriorityChangedApplier.apply(&mut ticket, &e).unwrap();
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.updated, e.timestamp);
    }
}
