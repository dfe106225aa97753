//! Unified error codes for the Lapor service
//!
//! Error codes are shared between the server and its clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Directory errors (student reports, partners)
//! - 4xxx: Ticket errors
//! - 5xxx: Ledger / attachment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Request fields are missing, empty, too long or not parseable
    ValidationFailed = 2,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Role may not perform this action at the ticket's current status
    PermissionDenied = 2001,

    // ==================== 3xxx: Directory ====================
    /// Student report not found
    StudentReportNotFound = 3001,
    /// Partner (mitra) not found in the directory
    PartnerNotFound = 3002,

    // ==================== 4xxx: Ticket ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Transition not allowed from the current status
    InvalidTransition = 4002,
    /// Ticket is already in the requested status
    AlreadyInState = 4003,
    /// Ticket was modified concurrently
    TicketConflict = 4004,
    /// Index outside the assigned partner list
    IndexOutOfRange = 4005,

    // ==================== 5xxx: Ledger ====================
    /// Status change without a usable signature
    MissingSignature = 5001,
    /// Ledger entry violates the type/attachment pairing
    MalformedComment = 5002,
    /// Attachment exceeds the size limit
    AttachmentTooLarge = 5003,
    /// Attachment payload could not be decoded
    InvalidAttachment = 5004,

    // ==================== 9xxx: System ====================
    /// Ticket store failed or timed out
    StoreUnavailable = 9003,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether a caller may retry the same request unchanged
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StoreUnavailable | ErrorCode::TicketConflict)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Directory
            ErrorCode::StudentReportNotFound => "Student report not found",
            ErrorCode::PartnerNotFound => "Partner not found",

            // Ticket
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::InvalidTransition => "Status transition is not allowed",
            ErrorCode::AlreadyInState => "Ticket is already in the requested status",
            ErrorCode::TicketConflict => "Ticket was modified concurrently",
            ErrorCode::IndexOutOfRange => "Index is out of range",

            // Ledger
            ErrorCode::MissingSignature => "A signature is required",
            ErrorCode::MalformedComment => "Comment is malformed",
            ErrorCode::AttachmentTooLarge => "Attachment is too large",
            ErrorCode::InvalidAttachment => "Attachment could not be decoded",

            // System
            ErrorCode::StoreUnavailable => "Ticket store is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Directory
            3001 => Ok(ErrorCode::StudentReportNotFound),
            3002 => Ok(ErrorCode::PartnerNotFound),

            // Ticket
            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::AlreadyInState),
            4004 => Ok(ErrorCode::TicketConflict),
            4005 => Ok(ErrorCode::IndexOutOfRange),

            // Ledger
            5001 => Ok(ErrorCode::MissingSignature),
            5002 => Ok(ErrorCode::MalformedComment),
            5003 => Ok(ErrorCode::AttachmentTooLarge),
            5004 => Ok(ErrorCode::InvalidAttachment),

            // System
            9003 => Ok(ErrorCode::StoreUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
