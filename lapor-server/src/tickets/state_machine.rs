//! Ticket state machine
//!
//! ```text
//! pending ──escalate──▶ escalated
//!    │                     │
//!    ├──approve──▶ resolved ◀──approve──┤
//!    └──reject───▶ rejected ◀──reject───┘
//! ```
//!
//! `resolved` and `rejected` are terminal.

use shared::models::Role;
use shared::ticket::{TicketAction, TicketStatus};

use super::capability;
use super::error::{TicketError, TicketResult};

/// Whether `from → to` is an edge of the lifecycle graph
pub fn is_valid_edge(from: TicketStatus, to: TicketStatus) -> bool {
    matches!(
        (from, to),
        (TicketStatus::Pending, TicketStatus::Escalated)
            | (TicketStatus::Pending, TicketStatus::Resolved)
            | (TicketStatus::Pending, TicketStatus::Rejected)
            | (TicketStatus::Escalated, TicketStatus::Resolved)
            | (TicketStatus::Escalated, TicketStatus::Rejected)
    )
}

/// Check that `role` may apply `action` to a ticket at `current` and return
/// the target status.
///
/// Guards run in order: acting role, terminal source, already in target,
/// capability matrix. The signature is checked separately by the caller.
pub fn check_transition(
    role: Role,
    current: TicketStatus,
    action: TicketAction,
) -> TicketResult<TicketStatus> {
    let target = action.target_status();

    if !capability::is_acting_role(role) {
        return Err(TicketError::Forbidden(format!(
            "role {} cannot {} tickets",
            role, action
        )));
    }

    if current.is_terminal() {
        return Err(TicketError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    if current == target {
        return Err(TicketError::AlreadyInState(current));
    }

    if !capability::allows(role, current, action) {
        return Err(TicketError::Forbidden(format!(
            "role {} cannot {} a {} ticket",
            role, action, current
        )));
    }

    // Unreachable while the matrix and the graph agree
    if !is_valid_edge(current, target) {
        return Err(TicketError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    Ok(target)
}
