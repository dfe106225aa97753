//! Shared enums and value types for the ticket lifecycle

use crate::models::Role;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Status
// ============================================================================

/// Ticket status
///
/// `Pending` is the sole initial state; `Resolved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Pending,
    Escalated,
    Resolved,
    Rejected,
}

impl TicketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Rejected)
    }

    /// Indonesian label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "Menunggu",
            TicketStatus::Escalated => "Dieskalasi",
            TicketStatus::Resolved => "Selesai",
            TicketStatus::Rejected => "Ditolak",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Escalated => "escalated",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-changing actions. Each requires a signature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Escalate,
    Approve,
    Reject,
}

impl TicketAction {
    pub const ALL: [TicketAction; 3] = [
        TicketAction::Escalate,
        TicketAction::Approve,
        TicketAction::Reject,
    ];

    pub fn target_status(&self) -> TicketStatus {
        match self {
            TicketAction::Escalate => TicketStatus::Escalated,
            TicketAction::Approve => TicketStatus::Resolved,
            TicketAction::Reject => TicketStatus::Rejected,
        }
    }

    /// Ledger entry type produced by this action
    pub fn comment_type(&self) -> CommentType {
        match self {
            TicketAction::Escalate => CommentType::Escalation,
            TicketAction::Approve => CommentType::Approval,
            TicketAction::Reject => CommentType::Rejection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketAction::Escalate => "escalate",
            TicketAction::Approve => "approve",
            TicketAction::Reject => "reject",
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Category / Priority
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Kualitas Makanan")]
    KualitasMakanan,
    #[serde(rename = "Operasional")]
    Operasional,
    #[serde(rename = "Logistik")]
    Logistik,
    #[serde(rename = "Kebersihan")]
    Kebersihan,
    #[serde(rename = "Lainnya")]
    Lainnya,
    /// Auto-assigned to tickets created from a student submission
    #[serde(rename = "Laporan Siswa")]
    LaporanSiswa,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::KualitasMakanan => "Kualitas Makanan",
            Category::Operasional => "Operasional",
            Category::Logistik => "Logistik",
            Category::Kebersihan => "Kebersihan",
            Category::Lainnya => "Lainnya",
            Category::LaporanSiswa => "Laporan Siswa",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Rendah",
            Priority::Medium => "Sedang",
            Priority::High => "Tinggi",
            Priority::Critical => "Kritis",
        }
    }
}

// ============================================================================
// Comment ledger types
// ============================================================================

/// Ledger entry type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    Text,
    Image,
    Signature,
    StatusChange,
    Escalation,
    Rejection,
    Approval,
}

impl CommentType {
    /// Action entries record a status change and always carry a signature
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            CommentType::StatusChange
                | CommentType::Escalation
                | CommentType::Rejection
                | CommentType::Approval
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentType::Text => "text",
            CommentType::Image => "image",
            CommentType::Signature => "signature",
            CommentType::StatusChange => "status_change",
            CommentType::Escalation => "escalation",
            CommentType::Rejection => "rejection",
            CommentType::Approval => "approval",
        }
    }
}

/// Role recorded on a ledger entry. `System` marks entries the service
/// writes on behalf of an actor (mitra/report/priority changes).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    Pusat,
    Daerah,
    Sekolah,
    Mitra,
    Murid,
    System,
}

impl AuthorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorRole::Pusat => "pusat",
            AuthorRole::Daerah => "daerah",
            AuthorRole::Sekolah => "sekolah",
            AuthorRole::Mitra => "mitra",
            AuthorRole::Murid => "murid",
            AuthorRole::System => "system",
        }
    }
}

impl From<Role> for AuthorRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Pusat => AuthorRole::Pusat,
            Role::Daerah => AuthorRole::Daerah,
            Role::Sekolah => AuthorRole::Sekolah,
            Role::Mitra => AuthorRole::Mitra,
            Role::Murid => AuthorRole::Murid,
        }
    }
}

// ============================================================================
// Attachments
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("attachment is empty")]
    Empty,
    #[error("attachment is not valid base64: {0}")]
    InvalidEncoding(String),
}

/// Binary artifact attached to a ledger entry or student report.
///
/// Serialized with the bytes base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, mime_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            kind,
            mime_type,
            data,
        }
    }

    /// Decode a base64 payload or a `data:<mime>;base64,<payload>` URL.
    pub fn decode(kind: AttachmentKind, encoded: &str) -> Result<Self, AttachmentError> {
        let encoded = encoded.trim();
        let (mime_type, payload) = match encoded.strip_prefix("data:") {
            Some(rest) => match rest.split_once(',') {
                Some((header, payload)) => {
                    let mime = header.trim_end_matches(";base64");
                    let mime = (!mime.is_empty()).then(|| mime.to_string());
                    (mime, payload.trim())
                }
                None => return Err(AttachmentError::InvalidEncoding("missing ','".into())),
            },
            None => (None, encoded),
        };

        if payload.is_empty() {
            return Err(AttachmentError::Empty);
        }

        let data = STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| AttachmentError::InvalidEncoding(e.to_string()))?;
        if data.is_empty() {
            return Err(AttachmentError::Empty);
        }

        Ok(Self::new(kind, mime_type, data))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// SHA-256 of the payload, hex-encoded
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
