//! MitraRemoved event applier

use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct MitraRemovedApplier;

impl EventApplier for MitraRemovedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::MitraRemoved {
            index,
            name,
            comment,
        } = &event.payload
        {
            let len = ticket.assigned_mitra.len();
            if ticket.assigned_mitra.get(*index) != Some(name) {
                return Err(TicketError::IndexOutOfRange { index: *index, len });
            }
            ticket.comments.append(comment.clone())?;
            ticket.assigned_mitra.remove(*index);
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}
