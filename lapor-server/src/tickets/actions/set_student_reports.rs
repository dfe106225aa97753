//! SetStudentReports command handler
//!
//! Replaces the whole set of linked student reports. Every id is resolved
//! again from the student-report store; an empty list clears the links.

use async_trait::async_trait;
use shared::models::StudentReport;
use shared::ticket::{EventPayload, StudentReportRef, Ticket, TicketEvent, TicketEventType};

use super::{actor_tag, ensure_can_manage};
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::MAX_LINKED_REPORTS;

#[derive(Debug, Clone)]
pub struct SetStudentReportsAction {
    pub ticket_id: String,
    pub report_ids: Vec<String>,
    /// Reports found for `report_ids` (injected by TicketManager)
    pub reports: Vec<StudentReport>,
}

impl SetStudentReportsAction {
    /// Requested ids in order, duplicates dropped
    pub fn unique_ids(ids: &[String]) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        ids.iter()
            .map(|id| id.trim())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Role and size checks; both need nothing from the report store
    pub fn authorize<'a>(
        ticket: &Ticket,
        metadata: &CommandMetadata,
        report_ids: &'a [String],
    ) -> TicketResult<Vec<&'a str>> {
        ensure_can_manage(ticket, metadata, "link student reports to")?;

        let ids = Self::unique_ids(report_ids);
        if ids.len() > MAX_LINKED_REPORTS {
            return Err(TicketError::Validation(format!(
                "too many linked reports ({}, max {})",
                ids.len(),
                MAX_LINKED_REPORTS
            )));
        }
        Ok(ids)
    }
}

#[async_trait]
impl CommandHandler for SetStudentReportsAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let ticket = ctx.load_ticket(&self.ticket_id)?;
        let ids = Self::authorize(ticket, metadata, &self.report_ids)?;

        let mut refs = Vec::with_capacity(ids.len());
        for id in ids {
            // Reports of another school are treated as unknown
            let report = self
                .reports
                .iter()
                .find(|r| r.id == id)
                .filter(|r| {
                    ticket
                        .school_id
                        .as_deref()
                        .is_none_or(|school| school == r.school_id)
                })
                .ok_or_else(|| TicketError::report_not_found(id))?;
            refs.push(StudentReportRef::from(report));
        }

        let message = if refs.is_empty() {
            format!("{} menghapus semua tautan laporan siswa", actor_tag(metadata))
        } else {
            format!(
                "{} memperbarui tautan laporan siswa ({} laporan)",
                actor_tag(metadata),
                refs.len()
            )
        };

        Ok(vec![metadata.event(
            &ticket.id,
            TicketEventType::StudentReportsReplaced,
            EventPayload::StudentReportsReplaced {
                reports: refs,
                comment: metadata.system_comment(message),
            },
        )])
    }
}
