//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use crate::tickets::error::TicketResult;
use crate::tickets::traits::EventApplier;
use shared::ticket::{EventPayload, Ticket, TicketEvent};

mod comment_added;
mod mitra_assigned;
mod mitra_removed;
mod priority_changed;
mod status_changed;
mod student_reports_replaced;
mod ticket_created;

pub use comment_added::CommentAddedApplier;
pub use mitra_assigned::MitraAssignedApplier;
pub use mitra_removed::MitraRemovedApplier;
pub use priority_changed::PriorityChangedApplier;
pub use status_changed::StatusChangedApplier;
pub use student_reports_replaced::StudentReportsReplacedApplier;
pub use ticket_created::TicketCreatedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    TicketCreated(TicketCreatedApplier),
    CommentAdded(CommentAddedApplier),
    StatusChanged(StatusChangedApplier),
    MitraAssigned(MitraAssignedApplier),
    MitraRemoved(MitraRemovedApplier),
    StudentReportsReplaced(StudentReportsReplacedApplier),
    PriorityChanged(PriorityChangedApplier),
}

/// Convert TicketEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&TicketEvent> for EventAction {
    fn from(event: &TicketEvent) -> Self {
        match &event.payload {
            EventPayload::TicketCreated { .. } => EventAction::TicketCreated(TicketCreatedApplier),
            EventPayload::CommentAdded { .. } => EventAction::CommentAdded(CommentAddedApplier),
            EventPayload::StatusChanged { .. } => EventAction::StatusChanged(StatusChangedApplier),
            EventPayload::MitraAssigned { .. } => EventAction::MitraAssigned(MitraAssignedApplier),
            EventPayload::MitraRemoved { .. } => EventAction::MitraRemoved(MitraRemovedApplier),
            EventPayload::StudentReportsReplaced { .. } => {
                EventAction::StudentReportsReplaced(StudentReportsReplacedApplier)
            }
            EventPayload::PriorityChanged { .. } => {
                EventAction::PriorityChanged(PriorityChangedApplier)
            }
        }
    }
}

/// Fold a batch of events into a ticket, stopping at the first failure
pub fn apply_all(ticket: &mut Ticket, events: &[TicketEvent]) -> TicketResult<()> {
    for event in events {
        let applier: EventAction = event.into();
        applier.apply(ticket, event)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared::models::Role;
    use shared::ticket::{
        Category, CommentType, EventPayload, NewComment, Priority, Ticket, TicketEvent,
        TicketEventType,
    };

    use super::apply_all;

    pub fn event(event_type: TicketEventType, payload: EventPayload) -> TicketEvent {
        TicketEvent::new(
            "t-1".into(),
            "u-daerah".into(),
            "Pengguna Dinas Daerah".into(),
            "cmd-1".into(),
            1_700_000_000_000,
            event_type,
            payload,
        )
    }

    pub fn text(id: &str, message: &str) -> NewComment {
        NewComment {
            id: id.into(),
            author_id: "u-daerah".into(),
            author: "Pengguna Dinas Daerah".into(),
            role: Role::Daerah.into(),
            time: 1_700_000_000_000,
            message: message.into(),
            comment_type: CommentType::Text,
            attachment: None,
        }
    }

    /// Ticket as produced by a TicketCreated event
    pub fn created_ticket() -> Ticket {
        let mut ticket = Ticket::new("t-1".into());
        let created = event(
            TicketEventType::TicketCreated,
            EventPayload::TicketCreated {
                title: "Nasi basi".into(),
                description: "Porsi makan siang berbau asam".into(),
                category: Category::KualitasMakanan,
                priority: Priority::Medium,
                school_name: "SDN 1 Bandung".into(),
                school_id: Some("sch-1".into()),
                reporter_id: "u-sekolah".into(),
                reporter_role: Role::Sekolah,
                student_reports: Vec::new(),
                initial_comment: None,
            },
        );
        apply_all(&mut ticket, &[created]).unwrap();
        ticket
    }
}
