//! Incident-ticket lifecycle
//!
//! - `capability` / `state_machine`: pure role and status rules
//! - `signature`: signature gate for status changes
//! - `actions`: command handlers (validate, produce events)
//! - `appliers`: event appliers (fold events into the snapshot)
//! - `advisory`: role-specific guidance text
//! - `manager`: composition root against the stores

pub mod traits;

pub mod actions;
pub mod advisory;
pub mod appliers;
pub mod capability;
pub mod error;
pub mod manager;
pub mod signature;
pub mod state_machine;

pub use capability::Capabilities;
pub use error::{Resource, TicketError, TicketResult};
pub use manager::{DEFAULT_STORE_TIMEOUT, MAX_COMMIT_ATTEMPTS, TicketManager};
