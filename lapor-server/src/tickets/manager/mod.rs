//! TicketManager - command processing against the collaborator stores
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Load target ticket (NotFound / not visible → NotFound)
//!     ├─ 2. Build action, injecting directory and report lookups
//!     │     (report links are authorized before any lookup)
//!     ├─ 3. Execute action → events (guards run here)
//!     ├─ 4. Apply events to a copy of the ticket via EventApplier
//!     ├─ 5. Bump version, insert new student report (if any)
//!     ├─ 6. Save with expected version
//!     └─ 7. On Conflict: start over from 1 (max MAX_COMMIT_ATTEMPTS)
//! ```
//!
//! Every store call is bounded by `store_timeout`; a timeout surfaces as
//! `StoreUnavailable` and is not retried here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::models::{Actor, Advice, Partner, Role, StudentReport};
use shared::ticket::{
    Attachment, Category, CommentType, LedgerVerification, Priority, Ticket, TicketAction,
    TicketCommand, TicketCommandPayload, TicketFilter, TicketScope,
};
use shared::util::new_id;

use super::actions::{
    AddMitraAction, CommandAction, CreateTicketAction, SetStudentReportsAction,
    SubmitStudentReportAction,
};
use super::advisory;
use super::appliers::apply_all;
use super::capability::Capabilities;
use super::error::{TicketError, TicketResult};
use super::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::store::{PartnerDirectory, RedbStore, StoreResult, StudentReportStore, TicketStore};

/// Attempts per command before a version conflict is surfaced
pub const MAX_COMMIT_ATTEMPTS: usize = 3;

/// Store call bound when none is configured
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone)]
pub struct TicketManager {
    tickets: Arc<dyn TicketStore>,
    reports: Arc<dyn StudentReportStore>,
    partners: Arc<dyn PartnerDirectory>,
    store_timeout: Duration,
}

impl std::fmt::Debug for TicketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketManager")
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl TicketManager {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        reports: Arc<dyn StudentReportStore>,
        partners: Arc<dyn PartnerDirectory>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            reports,
            partners,
            store_timeout,
        }
    }

    /// All three collaborators backed by one redb database
    pub fn with_store(store: RedbStore, store_timeout: Duration) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, store_timeout)
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> TicketResult<T> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(TicketError::from),
            Err(_) => Err(TicketError::StoreUnavailable(format!(
                "{op} timed out after {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }

    // ========== Commands ==========

    /// Run a command to completion and return the canonical ticket
    pub async fn execute_command(&self, cmd: TicketCommand) -> TicketResult<Ticket> {
        let mut attempt = 1;
        loop {
            match self.try_execute(&cmd).await {
                Err(TicketError::Conflict(id)) if attempt < MAX_COMMIT_ATTEMPTS => {
                    tracing::warn!(
                        command_id = %cmd.command_id,
                        ticket_id = %id,
                        attempt,
                        "Version conflict, retrying command"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_execute(&self, cmd: &TicketCommand) -> TicketResult<Ticket> {
        tracing::debug!(
            command_id = %cmd.command_id,
            command = cmd.payload.name(),
            user_id = %cmd.operator.user_id,
            "Processing command"
        );

        let current = match cmd.ticket_id() {
            Some(id) => Some(self.load_visible(&cmd.operator, id).await?),
            None => None,
        };

        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            actor: cmd.operator.clone(),
            timestamp: cmd.timestamp,
        };

        let action = self.build_action(cmd, current.as_ref(), &metadata).await?;
        let mut ctx = CommandContext::new(current.as_ref());
        let events = action.execute(&mut ctx, &metadata).await?;

        if events.is_empty() {
            // Idempotent no-op: nothing to write
            return current.ok_or_else(|| {
                TicketError::Validation(format!("{} produced no change", cmd.payload.name()))
            });
        }

        let mut ticket = match &current {
            Some(ticket) => ticket.clone(),
            None => Ticket::new(events[0].ticket_id.clone()),
        };
        let expected_version = ticket.version;

        apply_all(&mut ticket, &events)?;
        ticket.version = expected_version + 1;
        ticket.updated = metadata.timestamp;

        if let CommandAction::SubmitStudentReport(submit) = &action {
            let report = submit.report(&metadata)?;
            self.bounded("insert student report", self.reports.insert(&report))
                .await?;
        }

        self.bounded("save ticket", self.tickets.save(&ticket, expected_version))
            .await?;

        tracing::debug!(
            command_id = %cmd.command_id,
            ticket_id = %ticket.id,
            version = ticket.version,
            events = events.len(),
            "Command committed"
        );

        Ok(ticket)
    }

    /// Turn a command into its action. Creation commands get fresh ids and
    /// lookup commands get their directory data.
    async fn build_action(
        &self,
        cmd: &TicketCommand,
        current: Option<&Ticket>,
        metadata: &CommandMetadata,
    ) -> TicketResult<CommandAction> {
        let action = match &cmd.payload {
            TicketCommandPayload::CreateTicket {
                title,
                description,
                category,
                priority,
                school_name,
                attachment,
            } => CommandAction::CreateTicket(CreateTicketAction {
                ticket_id: new_id(),
                title: title.clone(),
                description: description.clone(),
                category: *category,
                priority: *priority,
                school_name: school_name.clone(),
                attachment: attachment.clone(),
            }),
            TicketCommandPayload::SubmitStudentReport {
                title,
                description,
                school_name,
                photo,
            } => CommandAction::SubmitStudentReport(SubmitStudentReportAction {
                ticket_id: new_id(),
                report_id: new_id(),
                title: title.clone(),
                description: description.clone(),
                school_name: school_name.clone(),
                photo: photo.clone(),
            }),
            TicketCommandPayload::AddMitra { ticket_id, name } => {
                let partners = self
                    .bounded("list partners", self.partners.list())
                    .await?;
                CommandAction::AddMitra(AddMitraAction {
                    ticket_id: ticket_id.clone(),
                    name: name.clone(),
                    partners,
                })
            }
            TicketCommandPayload::SetStudentReports {
                ticket_id,
                report_ids,
            } => {
                // Refuse before touching the report store
                let ticket = current.ok_or_else(|| TicketError::ticket_not_found(ticket_id))?;
                let ids = SetStudentReportsAction::authorize(ticket, metadata, report_ids)?;

                let mut reports = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(report) = self
                        .bounded("get student report", self.reports.get(id))
                        .await?
                    {
                        reports.push(report);
                    }
                }
                CommandAction::SetStudentReports(SetStudentReportsAction {
                    ticket_id: ticket_id.clone(),
                    report_ids: report_ids.clone(),
                    reports,
                })
            }
            _ => CommandAction::try_from(cmd)?,
        };
        Ok(action)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_ticket(
        &self,
        actor: &Actor,
        title: String,
        description: String,
        category: Category,
        priority: Option<Priority>,
        school_name: String,
        attachment: Option<Attachment>,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::CreateTicket {
                title,
                description,
                category,
                priority,
                school_name,
                attachment,
            },
        )
        .await
    }

    pub async fn submit_student_report(
        &self,
        actor: &Actor,
        title: String,
        description: String,
        school_name: String,
        photo: Attachment,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::SubmitStudentReport {
                title,
                description,
                school_name,
                photo,
            },
        )
        .await
    }

    pub async fn add_comment(
        &self,
        actor: &Actor,
        ticket_id: &str,
        comment_type: CommentType,
        message: String,
        attachment: Option<Attachment>,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::AddComment {
                ticket_id: ticket_id.to_string(),
                comment_type,
                message,
                attachment,
            },
        )
        .await
    }

    pub async fn change_status(
        &self,
        actor: &Actor,
        ticket_id: &str,
        action: TicketAction,
        signature: String,
        note: Option<String>,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::ChangeStatus {
                ticket_id: ticket_id.to_string(),
                action,
                signature,
                note,
            },
        )
        .await
    }

    pub async fn escalate(
        &self,
        actor: &Actor,
        ticket_id: &str,
        signature: String,
        note: Option<String>,
    ) -> TicketResult<Ticket> {
        self.change_status(actor, ticket_id, TicketAction::Escalate, signature, note)
            .await
    }

    pub async fn approve(
        &self,
        actor: &Actor,
        ticket_id: &str,
        signature: String,
        note: Option<String>,
    ) -> TicketResult<Ticket> {
        self.change_status(actor, ticket_id, TicketAction::Approve, signature, note)
            .await
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        ticket_id: &str,
        signature: String,
        note: Option<String>,
    ) -> TicketResult<Ticket> {
        self.change_status(actor, ticket_id, TicketAction::Reject, signature, note)
            .await
    }

    pub async fn add_mitra(&self, actor: &Actor, ticket_id: &str, name: String) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::AddMitra {
                ticket_id: ticket_id.to_string(),
                name,
            },
        )
        .await
    }

    pub async fn remove_mitra(
        &self,
        actor: &Actor,
        ticket_id: &str,
        index: usize,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::RemoveMitra {
                ticket_id: ticket_id.to_string(),
                index,
            },
        )
        .await
    }

    pub async fn set_student_reports(
        &self,
        actor: &Actor,
        ticket_id: &str,
        report_ids: Vec<String>,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::SetStudentReports {
                ticket_id: ticket_id.to_string(),
                report_ids,
            },
        )
        .await
    }

    pub async fn set_priority(
        &self,
        actor: &Actor,
        ticket_id: &str,
        priority: Priority,
    ) -> TicketResult<Ticket> {
        self.run(
            actor,
            TicketCommandPayload::SetPriority {
                ticket_id: ticket_id.to_string(),
                priority,
            },
        )
        .await
    }

    async fn run(&self, actor: &Actor, payload: TicketCommandPayload) -> TicketResult<Ticket> {
        self.execute_command(TicketCommand::new(actor.clone(), payload))
            .await
    }

    // ========== Queries ==========

    /// Listing scope for an actor: schools see their own tickets, students
    /// what they reported, partners what they are assigned to.
    pub fn scope_for(actor: &Actor) -> TicketResult<TicketScope> {
        match actor.role {
            Role::Sekolah => actor
                .school_id
                .clone()
                .map(TicketScope::School)
                .ok_or_else(|| {
                    TicketError::Forbidden("school account is not linked to a school".into())
                }),
            Role::Murid => Ok(TicketScope::Reporter(actor.user_id.clone())),
            Role::Mitra => Ok(TicketScope::Mitra(actor.full_name.clone())),
            Role::Daerah | Role::Pusat => Ok(TicketScope::All),
        }
    }

    async fn load_visible(&self, actor: &Actor, ticket_id: &str) -> TicketResult<Ticket> {
        let ticket = self
            .bounded("get ticket", self.tickets.get(ticket_id))
            .await?
            .ok_or_else(|| TicketError::ticket_not_found(ticket_id))?;

        let visible = TicketFilter {
            scope: Self::scope_for(actor)?,
            ..Default::default()
        }
        .matches(&ticket);

        // Tickets outside the actor's scope do not exist for them
        if visible {
            Ok(ticket)
        } else {
            Err(TicketError::ticket_not_found(ticket_id))
        }
    }

    pub async fn get_ticket(&self, actor: &Actor, ticket_id: &str) -> TicketResult<Ticket> {
        self.load_visible(actor, ticket_id).await
    }

    /// Tickets matching `filter` within the actor's scope, newest first
    pub async fn list_tickets(
        &self,
        actor: &Actor,
        mut filter: TicketFilter,
    ) -> TicketResult<Vec<Ticket>> {
        filter.scope = Self::scope_for(actor)?;
        self.bounded("list tickets", self.tickets.list(&filter))
            .await
    }

    pub async fn get_advice(&self, actor: &Actor, ticket_id: &str) -> TicketResult<Advice> {
        let ticket = self.load_visible(actor, ticket_id).await?;
        Ok(advisory::advise(actor.role, &ticket))
    }

    pub async fn get_capabilities(
        &self,
        actor: &Actor,
        ticket_id: &str,
    ) -> TicketResult<Capabilities> {
        let ticket = self.load_visible(actor, ticket_id).await?;
        Ok(Capabilities::resolve(actor.role, ticket.status))
    }

    pub async fn verify_ledger(
        &self,
        actor: &Actor,
        ticket_id: &str,
    ) -> TicketResult<LedgerVerification> {
        let ticket = self.load_visible(actor, ticket_id).await?;
        let verification = ticket.comments.verify();
        if !verification.chain_intact {
            tracing::warn!(
                ticket_id = %ticket.id,
                breaks = verification.breaks.len(),
                "Ledger chain broken"
            );
        }
        Ok(verification)
    }

    /// Student reports of one school, newest first. Schools see their own;
    /// regional and central staff name the school they are looking at.
    pub async fn list_student_reports(
        &self,
        actor: &Actor,
        school_id: Option<&str>,
    ) -> TicketResult<Vec<StudentReport>> {
        let school_id = match actor.role {
            Role::Sekolah => actor.school_id.as_deref().ok_or_else(|| {
                TicketError::Forbidden("school account is not linked to a school".into())
            })?,
            Role::Daerah | Role::Pusat => school_id
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| TicketError::Validation("school_id is required".into()))?,
            Role::Mitra | Role::Murid => {
                return Err(TicketError::Forbidden(format!(
                    "role {} cannot browse student reports",
                    actor.role
                )));
            }
        };
        self.bounded(
            "list student reports",
            self.reports.list_by_school(school_id),
        )
        .await
    }

    pub async fn list_partners(&self) -> TicketResult<Vec<Partner>> {
        self.bounded("list partners", self.partners.list()).await
    }
}

#[cfg(test)]
mod tests;
