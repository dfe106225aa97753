//! Data models
//!
//! Shared between lapor-server and frontend (via API).

pub mod advice;
pub mod partner;
pub mod role;
pub mod student_report;

// Re-exports
pub use advice::*;
pub use partner::*;
pub use role::*;
pub use student_report::*;
