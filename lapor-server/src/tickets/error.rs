//! Ticket error type
//!
//! Every kind is surfaced to the caller verbatim; only
//! [`TicketError::StoreUnavailable`] and [`TicketError::Conflict`] are worth
//! retrying.

use shared::error::{AppError, ErrorCode};
use shared::ticket::{AttachmentError, LedgerError, TicketStatus};
use thiserror::Error;

use crate::store::StoreError;

/// What a `NotFound` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Ticket,
    StudentReport,
    Partner,
}

impl Resource {
    fn label(&self) -> &'static str {
        match self {
            Resource::Ticket => "Ticket",
            Resource::StudentReport => "Student report",
            Resource::Partner => "Partner",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Resource::Ticket => ErrorCode::TicketNotFound,
            Resource::StudentReport => ErrorCode::StudentReportNotFound,
            Resource::Partner => ErrorCode::PartnerNotFound,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("{} not found: {id}", .resource.label())]
    NotFound { resource: Resource, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot move ticket from {from} to {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    #[error("Ticket is already {0}")]
    AlreadyInState(TicketStatus),

    #[error("A signature is required: {0}")]
    MissingSignature(String),

    #[error("Malformed comment: {0}")]
    MalformedComment(String),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Ticket {0} was modified concurrently")]
    Conflict(String),

    #[error("Ticket store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Attachment is {size} bytes, limit is {max}")]
    AttachmentTooLarge { size: usize, max: usize },

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type TicketResult<T> = Result<T, TicketError>;

impl TicketError {
    pub fn ticket_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: Resource::Ticket,
            id: id.into(),
        }
    }

    pub fn report_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: Resource::StudentReport,
            id: id.into(),
        }
    }

    pub fn partner_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: Resource::Partner,
            id: name.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TicketError::NotFound { resource, .. } => resource.code(),
            TicketError::Forbidden(_) => ErrorCode::PermissionDenied,
            TicketError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            TicketError::AlreadyInState(_) => ErrorCode::AlreadyInState,
            TicketError::MissingSignature(_) => ErrorCode::MissingSignature,
            TicketError::MalformedComment(_) => ErrorCode::MalformedComment,
            TicketError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            TicketError::Conflict(_) => ErrorCode::TicketConflict,
            TicketError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            TicketError::AttachmentTooLarge { .. } => ErrorCode::AttachmentTooLarge,
            TicketError::InvalidAttachment(_) => ErrorCode::InvalidAttachment,
            TicketError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

impl From<LedgerError> for TicketError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Malformed(msg) => TicketError::MalformedComment(msg),
        }
    }
}

impl From<AttachmentError> for TicketError {
    fn from(err: AttachmentError) -> Self {
        TicketError::InvalidAttachment(err.to_string())
    }
}

impl From<StoreError> for TicketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id, .. } => TicketError::Conflict(id),
            other => TicketError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            TicketError::NotFound { id, .. } => app.with_detail("id", id),
            TicketError::InvalidTransition { from, to } => app
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            TicketError::AlreadyInState(status) => app.with_detail("status", status.as_str()),
            TicketError::IndexOutOfRange { index, len } => {
                app.with_detail("index", index).with_detail("len", len)
            }
            TicketError::AttachmentTooLarge { size, max } => {
                app.with_detail("size", size).with_detail("max", max)
            }
            TicketError::StoreUnavailable(_) | TicketError::Conflict(_) => {
                app.with_detail("retryable", true)
            }
            _ => app,
        }
    }
}
