//! MitraAssigned event applier

use crate::tickets::error::TicketResult;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct MitraAssignedApplier;

impl EventApplier for MitraAssignedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::MitraAssigned { name, comment } = &event.payload {
            // Set semantics
            if ticket.has_mitra(name) {
                return Ok(());
            }
            ticket.comments.append(comment.clone())?;
            ticket.assigned_mitra.push(name.clone());
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}
