//! Capability matrix
//!
//! Pure functions of (role, status). Every mutating command consults these
//! before touching a ticket.
//!
//! | role    | contribute            | act                                    | manage          |
//! |---------|-----------------------|----------------------------------------|-----------------|
//! | sekolah | always                | -                                      | -               |
//! | mitra   | always                | -                                      | -               |
//! | murid   | never                 | -                                      | -               |
//! | daerah  | always                | escalate (pending), approve/reject (non-terminal) | non-terminal |
//! | pusat   | escalated only        | approve/reject (escalated)             | escalated       |

use serde::Serialize;
use shared::models::Role;
use shared::ticket::{TicketAction, TicketStatus};

/// Whether `role` may add ledger entries at `status`
pub fn can_contribute(role: Role, status: TicketStatus) -> bool {
    match role {
        Role::Sekolah | Role::Daerah | Role::Mitra => true,
        Role::Murid => false,
        // Monitoring mode until the region escalates
        Role::Pusat => status == TicketStatus::Escalated,
    }
}

/// Actions `role` may take at `status`
pub fn can_act(role: Role, status: TicketStatus) -> Vec<TicketAction> {
    TicketAction::ALL
        .into_iter()
        .filter(|action| allows(role, status, *action))
        .collect()
}

/// Whether `role` may take `action` at `status`
pub fn allows(role: Role, status: TicketStatus, action: TicketAction) -> bool {
    if status.is_terminal() {
        return false;
    }
    match (role, action) {
        (Role::Daerah, TicketAction::Escalate) => status == TicketStatus::Pending,
        (Role::Daerah, TicketAction::Approve | TicketAction::Reject) => true,
        (Role::Pusat, TicketAction::Approve | TicketAction::Reject) => {
            status == TicketStatus::Escalated
        }
        _ => false,
    }
}

/// Roles that can ever change a ticket's status
pub fn is_acting_role(role: Role) -> bool {
    matches!(role, Role::Daerah | Role::Pusat)
}

/// Whether `role` may assign partners, link student reports or change priority
pub fn can_manage(role: Role, status: TicketStatus) -> bool {
    if status.is_terminal() {
        return false;
    }
    match role {
        Role::Daerah => true,
        Role::Pusat => status == TicketStatus::Escalated,
        _ => false,
    }
}

/// Whether `role` may open a regular ticket
pub fn can_create_ticket(role: Role) -> bool {
    role == Role::Sekolah
}

/// Whether `role` may submit a student report
pub fn can_submit_student_report(role: Role) -> bool {
    role == Role::Murid
}

/// Everything one role may do on one ticket, for clients rendering controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub role: Role,
    pub status: TicketStatus,
    pub can_contribute: bool,
    pub actions: Vec<TicketAction>,
    pub can_manage: bool,
}

impl Capabilities {
    pub fn resolve(role: Role, status: TicketStatus) -> Self {
        Self {
            role,
            status,
            can_contribute: can_contribute(role, status),
            actions: can_act(role, status),
            can_manage: can_manage(role, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [TicketStatus; 4] = [
        TicketStatus::Pending,
        TicketStatus::Escalated,
        TicketStatus::Resolved,
        TicketStatus::Rejected,
    ];

    #[test]
    fn test_pusat_monitoring_mode() {
        assert!(!can_contribute(Role::Pusat, TicketStatus::Pending));
        assert!(can_contribute(Role::Pusat, TicketStatus::Escalated));
        assert!(!can_contribute(Role::Pusat, TicketStatus::Resolved));
    }

    #[test]
    fn test_contribution_is_status_independent_for_other_roles() {
        for status in STATUSES {
            assert!(can_contribute(Role::Sekolah, status));
            assert!(can_contribute(Role::Daerah, status));
            assert!(can_contribute(Role::Mitra, status));
            assert!(!can_contribute(Role::Murid, status));
        }
    }

    #[test]
    fn test_daerah_actions() {
        assert_eq!(
            can_act(Role::Daerah, TicketStatus::Pending),
            vec![TicketAction::Escalate, TicketAction::Approve, TicketAction::Reject]
        );
        assert_eq!(
            can_act(Role::Daerah, TicketStatus::Escalated),
            vec![TicketAction::Approve, TicketAction::Reject]
        );
        assert!(can_act(Role::Daerah, TicketStatus::Resolved).is_empty());
    }

    #[test]
    fn test_pusat_actions() {
        assert!(can_act(Role::Pusat, TicketStatus::Pending).is_empty());
        assert_eq!(
            can_act(Role::Pusat, TicketStatus::Escalated),
            vec![TicketAction::Approve, TicketAction::Reject]
        );
    }

    #[test]
    fn test_non_acting_roles_never_act() {
        for role in [Role::Sekolah, Role::Mitra, Role::Murid] {
            assert!(!is_acting_role(role));
            for status in STATUSES {
                assert!(can_act(role, status).is_empty());
                assert!(!can_manage(role, status));
            }
        }
    }

    #[test]
    fn test_manage_rights() {
        assert!(can_manage(Role::Daerah, TicketStatus::Pending));
        assert!(can_manage(Role::Daerah, TicketStatus::Escalated));
        assert!(!can_manage(Role::Daerah, TicketStatus::Rejected));
        assert!(!can_manage(Role::Pusat, TicketStatus::Pending));
        assert!(can_manage(Role::Pusat, TicketStatus::Escalated));
    }

    #[test]
    fn test_creation_rights() {
        assert!(can_create_ticket(Role::Sekolah));
        assert!(!can_create_ticket(Role::Murid));
        assert!(can_submit_student_report(Role::Murid));
        assert!(!can_submit_student_report(Role::Sekolah));
    }

    #[test]
    fn test_capabilities_summary() {
        let caps = Capabilities::resolve(Role::Pusat, TicketStatus::Pending);
        assert!(!caps.can_contribute);
        assert!(caps.actions.is_empty());
        assert!(!caps.can_manage);
    }
}
