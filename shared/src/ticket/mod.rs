//! Ticket Module
//!
//! Types for the incident-ticket lifecycle:
//! - Commands: requests to create or mutate a ticket
//! - Events: facts produced by command handlers
//! - Snapshot: the persisted ticket, including its comment ledger

pub mod command;
pub mod event;
pub mod ledger;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{TicketCommand, TicketCommandPayload};
pub use event::{EventPayload, TicketEvent, TicketEventType};
pub use ledger::{
    Comment, GENESIS_HASH, Ledger, LedgerBreak, LedgerBreakKind, LedgerError, LedgerVerification,
    NewComment,
};
pub use snapshot::{StudentReportRef, Ticket, TicketFilter, TicketScope};
pub use types::*;
