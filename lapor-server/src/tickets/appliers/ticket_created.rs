//! TicketCreated event applier
//!
//! Fills in a fresh snapshot. The optional initial entry (photo) becomes
//! ledger entry #1.

use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent, TicketStatus};

pub struct TicketCreatedApplier;

impl EventApplier for TicketCreatedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::TicketCreated {
            title,
            description,
            category,
            priority,
            school_name,
            school_id,
            reporter_id,
            reporter_role,
            student_reports,
            initial_comment,
        } = &event.payload
        {
            if !ticket.comments.is_empty() || ticket.created != 0 {
                return Err(TicketError::Conflict(ticket.id.clone()));
            }

            ticket.id = event.ticket_id.clone();
            ticket.title = title.clone();
            ticket.description = description.clone();
            ticket.category = *category;
            ticket.priority = *priority;
            ticket.status = TicketStatus::Pending;
            ticket.school_name = school_name.clone();
            ticket.school_id = school_id.clone();
            ticket.reporter_id = reporter_id.clone();
            ticket.reporter_role = *reporter_role;
            ticket.student_reports = student_reports.clone();

            if let Some(comment) = initial_comment {
                ticket.comments.append(comment.clone())?;
            }

            ticket.created = event.timestamp;
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}
