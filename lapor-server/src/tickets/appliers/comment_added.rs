//! CommentAdded event applier

use crate::tickets::error::TicketResult;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct CommentAddedApplier;

impl EventApplier for CommentAddedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::CommentAdded { comment } = &event.payload {
            ticket.comments.append(comment.clone())?;
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::appliers::fixtures::{created_ticket, event, text};
    use crate::tickets::error::TicketError;
    use shared::ticket::{GENESIS_HASH, TicketEventType};

    #[test]
    fn test_appends_in_order() {
        let mut ticket = created_ticket();
        for (id, msg) in [("c-1", "pertama"), ("c-2", "kedua")] {
            let e = event(
                TicketEventType::CommentAdded,
                EventPayload::CommentAdded {
                    comment: text(id, msg),
                },
            );
            CommentAddedApplier.apply(&mut ticket, &e).unwrap();
        }

        let entries = ticket.comments.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 1);
        assert_eq!(entries[0].prev_hash, GENESIS_HASH);
        assert_eq!(entries[1].prev_hash, entries[0].hash);
        assert_eq!(entries[1].message, "kedua");
    }

    #[test]
    fn test_malformed_entry_leaves_ledger_untouched() {
        let mut ticket = created_ticket();
        let e = event(
            TicketEventType::CommentAdded,
            EventPayload::CommentAdded {
                comment: text("c-1", "  "),
            },
        );
        let err = CommentAddedApplier.apply(&mut ticket, &e).unwrap_err();
        assert!(matches!(err, TicketError::MalformedComment(_)));
        assert!(ticket.comments.is_empty());
    }
}
