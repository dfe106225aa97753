//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! ticket actions before anything reaches the ledger.

use shared::ticket::Attachment;

use crate::tickets::{TicketError, TicketResult};

// ── Text length limits ──────────────────────────────────────────────

/// Ticket titles, partner names
pub const MAX_NAME_LEN: usize = 200;

/// School names
pub const MAX_SCHOOL_NAME_LEN: usize = 200;

/// Ticket descriptions, comment messages, transition notes
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Student-report links per ticket
pub const MAX_LINKED_REPORTS: usize = 100;

/// Decoded attachment payload (photos, signatures)
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// JSON request body: one base64 attachment plus the surrounding fields
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_ATTACHMENT_BYTES.div_ceil(3) * 4 + 256 * 1024;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> TicketResult<()> {
    if value.trim().is_empty() {
        return Err(TicketError::Validation(format!("{field} must not be empty")));
    }
    validate_text(value, field, max_len)
}

/// Validate that a possibly empty string is within the length limit.
pub fn validate_text(value: &str, field: &str, max_len: usize) -> TicketResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(TicketError::Validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> TicketResult<()> {
    if let Some(v) = value {
        validate_text(v, field, max_len)?;
    }
    Ok(())
}

/// Validate an attachment's size.
pub fn validate_attachment(attachment: &Attachment) -> TicketResult<()> {
    if attachment.len() > MAX_ATTACHMENT_BYTES {
        return Err(TicketError::AttachmentTooLarge {
            size: attachment.len(),
            max: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ticket::AttachmentKind;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Nasi basi", "title", MAX_NAME_LEN).is_ok());
        assert!(matches!(
            validate_required_text("  ", "title", MAX_NAME_LEN),
            Err(TicketError::Validation(_))
        ));
        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let s = "é".repeat(10);
        assert!(validate_text(&s, "note", 10).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", 5).is_ok());
        assert!(validate_optional_text(&Some("123456".into()), "note", 5).is_err());
    }

    #[test]
    fn test_request_body_fits_encoded_attachment() {
        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0u8; MAX_ATTACHMENT_BYTES]);
        let body = format!(r#"{{"message":"","attachment":"data:image/png;base64,{encoded}"}}"#);
        assert!(body.len() < MAX_REQUEST_BODY_BYTES);
    }

    #[test]
    fn test_attachment_limit() {
        let small = Attachment::new(AttachmentKind::Image, None, vec![0; 16]);
        assert!(validate_attachment(&small).is_ok());
        let big = Attachment::new(AttachmentKind::Image, None, vec![0; MAX_ATTACHMENT_BYTES + 1]);
        assert!(matches!(
            validate_attachment(&big),
            Err(TicketError::AttachmentTooLarge { .. })
        ));
    }
}
