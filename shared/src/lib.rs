//! Shared types for Lapor
//!
//! Types used by the server and its clients: unified error codes, models,
//! and the ticket command/event/snapshot types.

pub mod error;
pub mod models;
pub mod ticket;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
