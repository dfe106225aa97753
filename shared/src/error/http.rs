//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::TicketNotFound
            | Self::StudentReportNotFound
            | Self::PartnerNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::InvalidTransition
            | Self::AlreadyInState
            | Self::TicketConflict => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 413 Payload Too Large
            Self::AttachmentTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 422 Unprocessable Entity
            Self::MissingSignature
            | Self::MalformedComment
            | Self::InvalidAttachment
            | Self::IndexOutOfRange => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 400 Bad Request
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
        }
    }
}
