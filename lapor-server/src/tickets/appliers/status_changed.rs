//! StatusChanged event applier
//!
//! Writes the action entry and the new status together; if the entry is
//! refused the status stays where it was.

use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::state_machine::is_valid_edge;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct StatusChangedApplier;

impl EventApplier for StatusChangedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::StatusChanged {
            from, to, comment, ..
        } = &event.payload
        {
            if ticket.status != *from || !is_valid_edge(*from, *to) {
                return Err(TicketError::InvalidTransition {
                    from: ticket.status,
                    to: *to,
                });
            }

            ticket.comments.append(comment.clone())?;
            ticket.status = *to;
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}
