//! Collaborator contracts: ticket store, student-report store and partner
//! directory.
//!
//! The ticket core only talks to these traits. [`RedbStore`] implements all
//! three on one embedded database.

mod redb_store;

pub use redb_store::RedbStore;

use async_trait::async_trait;
use shared::models::{Partner, StudentReport};
use shared::ticket::{Ticket, TicketFilter};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored version moved since the ticket was read
    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    Conflict { id: String, expected: u64, actual: u64 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ticket persistence
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<Ticket>>;

    /// Persist `ticket` if the stored version still equals
    /// `expected_version` (0 = ticket must not exist yet).
    async fn save(&self, ticket: &Ticket, expected_version: u64) -> StoreResult<()>;

    /// Tickets matching `filter`, newest first
    async fn list(&self, filter: &TicketFilter) -> StoreResult<Vec<Ticket>>;
}

/// Student-report persistence
#[async_trait]
pub trait StudentReportStore: Send + Sync {
    async fn list_by_school(&self, school_id: &str) -> StoreResult<Vec<StudentReport>>;

    async fn get(&self, id: &str) -> StoreResult<Option<StudentReport>>;

    async fn insert(&self, report: &StudentReport) -> StoreResult<()>;
}

/// Partner (mitra) directory
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Partner>>;
}
