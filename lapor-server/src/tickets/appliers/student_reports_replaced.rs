//! StudentReportsReplaced event applier

use crate::tickets::error::TicketResult;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

pub struct StudentReportsReplacedApplier;

impl EventApplier for StudentReportsReplacedApplier {
    fn apply(&self, ticket: &mut Ticket, event: &TicketEvent) -> TicketResult<()> {
        if let EventPayload::StudentReportsReplaced { reports, comment } = &event.payload {
            ticket.comments.append(comment.clone())?;
            ticket.student_reports = reports.clone();
            ticket.updated = event.timestamp;
        }
        Ok(())
    }
}
