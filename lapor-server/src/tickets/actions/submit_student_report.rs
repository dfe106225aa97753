//! SubmitStudentReport command handler
//!
//! A student submits a photo report. The report is stored in the
//! student-report store and a `Laporan Siswa` ticket linked to it is opened
//! for the student's school.

use async_trait::async_trait;
use shared::models::StudentReport;
use shared::ticket::{
    Attachment, AttachmentKind, Category, CommentType, EventPayload, Ledger, Priority,
    StudentReportRef, TicketEvent, TicketEventType,
};

use crate::tickets::capability;
use crate::tickets::error::{TicketError, TicketResult};
use crate::tickets::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_SCHOOL_NAME_LEN, validate_attachment, validate_text,
    validate_required_text,
};

#[derive(Debug, Clone)]
pub struct SubmitStudentReportAction {
    /// Pre-generated by TicketManager
    pub ticket_id: String,
    /// Pre-generated by TicketManager
    pub report_id: String,
    pub title: String,
    pub description: String,
    pub school_name: String,
    pub photo: Attachment,
}

impl SubmitStudentReportAction {
    /// The report record this submission creates
    pub fn report(&self, metadata: &CommandMetadata) -> TicketResult<StudentReport> {
        let school_id = metadata.actor.school_id.clone().ok_or_else(|| {
            TicketError::Forbidden("student account is not linked to a school".into())
        })?;

        Ok(StudentReport {
            id: self.report_id.clone(),
            reporter_id: metadata.actor.user_id.clone(),
            reporter_name: metadata.actor.full_name.clone(),
            school_id,
            title: self.title.trim().to_string(),
            summary: self.description.trim().to_string(),
            created_at: metadata.timestamp,
            image: Some(self.photo.clone()),
        })
    }
}

#[async_trait]
impl CommandHandler for SubmitStudentReportAction {
    async fn execute(
        &self,
        _ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> TicketResult<Vec<TicketEvent>> {
        let actor = &metadata.actor;
        if !capability::can_submit_student_report(actor.role) {
            return Err(TicketError::Forbidden(format!(
                "role {} cannot submit student reports",
                actor.role
            )));
        }

        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        validate_text(&self.description, "description", MAX_MESSAGE_LEN)?;
        validate_required_text(&self.school_name, "school_name", MAX_SCHOOL_NAME_LEN)?;

        if self.photo.is_empty() {
            return Err(TicketError::InvalidAttachment(
                "a photo is required for student reports".into(),
            ));
        }
        if self.photo.kind != AttachmentKind::Image {
            return Err(TicketError::InvalidAttachment(
                "student report photo must be an image".into(),
            ));
        }
        validate_attachment(&self.photo)?;

        let report = self.report(metadata)?;

        let photo_entry = metadata.comment(
            CommentType::Image,
            report.summary.clone(),
            Some(self.photo.clone()),
        );
        Ledger::validate(&photo_entry)?;

        let description = if report.summary.is_empty() {
            report.title.clone()
        } else {
            report.summary.clone()
        };

        let event = metadata.event(
            &self.ticket_id,
            TicketEventType::TicketCreated,
            EventPayload::TicketCreated {
                title: report.title.clone(),
                description,
                category: Category::LaporanSiswa,
                priority: Priority::default(),
                school_name: self.school_name.trim().to_string(),
                school_id: Some(report.school_id.clone()),
                reporter_id: actor.user_id.clone(),
                reporter_role: actor.role,
                student_reports: vec![StudentReportRef::from(&report)],
                initial_comment: Some(photo_entry),
            },
        );

        Ok(vec![event])
    }
}
