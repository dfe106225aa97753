//! redb-backed implementation of the collaborator stores
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `tickets` | ticket id | JSON `Ticket` (ledger included) |
//! | `student_reports` | report id | JSON `StudentReport` |
//! | `partners` | partner id | JSON `Partner` |
//!
//! The version check and the write in [`TicketStore::save`] run inside one
//! write transaction; redb serializes write transactions, so two saves
//! against the same version cannot both succeed.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Partner, StudentReport};
use shared::ticket::{Ticket, TicketFilter};
use std::path::Path;
use std::sync::Arc;

use super::{PartnerDirectory, StoreError, StoreResult, StudentReportStore, TicketStore};

const TICKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tickets");

const STUDENT_REPORTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("student_reports");

const PARTNERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("partners");

#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// In-memory database for tests and ephemeral runs
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(STUDENT_REPORTS_TABLE)?;
            let _ = write_txn.open_table(PARTNERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert or replace directory entries
    pub fn upsert_partners(&self, partners: &[Partner]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PARTNERS_TABLE)?;
            for partner in partners {
                let bytes = serde_json::to_vec(partner)?;
                table.insert(partner.id.as_str(), bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn read_one<T: serde::de::DeserializeOwned>(
        &self,
        def: TableDefinition<&str, &[u8]>,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn read_all<T: serde::de::DeserializeOwned>(
        &self,
        def: TableDefinition<&str, &[u8]>,
    ) -> StoreResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }

    /// Run a synchronous redb operation on the blocking pool so the
    /// caller's timeout can fire while it waits on the write lock.
    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&RedbStore) -> StoreResult<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| StoreError::Unavailable(format!("Task join failed: {e}")))?
    }

    fn insert_report(&self, report: &StudentReport) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STUDENT_REPORTS_TABLE)?;
            let bytes = serde_json::to_vec(report)?;
            table.insert(report.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn save_ticket(&self, ticket: &Ticket, expected_version: u64) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TICKETS_TABLE)?;
            let actual = match table.get(ticket.id.as_str())? {
                Some(value) => serde_json::from_slice::<Ticket>(value.value())?.version,
                None => 0,
            };
            if actual != expected_version {
                // Dropping the transaction aborts it
                return Err(StoreError::Conflict {
                    id: ticket.id.clone(),
                    expected: expected_version,
                    actual,
                });
            }

            let bytes = serde_json::to_vec(ticket)?;
            table.insert(ticket.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl TicketStore for RedbStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Ticket>> {
        let id = id.to_string();
        self.blocking(move |store| store.read_one(TICKETS_TABLE, &id))
            .await
    }

    async fn save(&self, ticket: &Ticket, expected_version: u64) -> StoreResult<()> {
        let ticket = ticket.clone();
        self.blocking(move |store| store.save_ticket(&ticket, expected_version))
            .await
    }

    async fn list(&self, filter: &TicketFilter) -> StoreResult<Vec<Ticket>> {
        let filter = filter.clone();
        self.blocking(move |store| {
            let mut tickets: Vec<Ticket> = store
                .read_all(TICKETS_TABLE)?
                .into_iter()
                .filter(|t| filter.matches(t))
                .collect();
            tickets.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
            Ok(tickets)
        })
        .await
    }
}

#[async_trait]
impl StudentReportStore for RedbStore {
    async fn list_by_school(&self, school_id: &str) -> StoreResult<Vec<StudentReport>> {
        let school_id = school_id.to_string();
        self.blocking(move |store| {
            let mut reports: Vec<StudentReport> = store
                .read_all(STUDENT_REPORTS_TABLE)?
                .into_iter()
                .filter(|r: &StudentReport| r.school_id == school_id)
                .collect();
            reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(reports)
        })
        .await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<StudentReport>> {
        let id = id.to_string();
        self.blocking(move |store| store.read_one(STUDENT_REPORTS_TABLE, &id))
            .await
    }

    async fn insert(&self, report: &StudentReport) -> StoreResult<()> {
        let report = report.clone();
        self.blocking(move |store| store.insert_report(&report))
            .await
    }
}

#[async_trait]
impl PartnerDirectory for RedbStore {
    async fn list(&self) -> StoreResult<Vec<Partner>> {
        self.blocking(|store| {
            let mut partners: Vec<Partner> = store.read_all(PARTNERS_TABLE)?;
            partners.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            Ok(partners)
        })
        .await
    }
}
