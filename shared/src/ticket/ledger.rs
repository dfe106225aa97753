//! Comment ledger - append-only, hash-chained log of ticket contributions
//!
//! Entries can only enter through [`Ledger::append`], which validates the
//! type/attachment pairing and links each entry to its predecessor with a
//! SHA-256 hash. Nothing here edits, reorders or removes an entry.

use super::types::{Attachment, AttachmentKind, AuthorRole, CommentType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// prev_hash of the first entry
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("malformed comment: {0}")]
    Malformed(String),
}

/// Entry as submitted, before it is sequenced and chained
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewComment {
    pub id: String,
    pub author_id: String,
    /// Display name
    pub author: String,
    pub role: AuthorRole,
    pub time: i64,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub comment_type: CommentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// Ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// 1-based position in the ledger
    pub seq: u64,
    pub id: String,
    pub author_id: String,
    pub author: String,
    pub role: AuthorRole,
    pub time: i64,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub comment_type: CommentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub prev_hash: String,
    pub hash: String,
}

impl Comment {
    /// Whether this entry carries a non-empty signature artifact
    pub fn is_signed(&self) -> bool {
        self.attachment
            .as_ref()
            .is_some_and(|a| a.kind == AttachmentKind::Signature && !a.is_empty())
    }

    fn expected_hash(&self) -> String {
        compute_comment_hash(
            &self.prev_hash,
            self.seq,
            &self.id,
            &self.author_id,
            &self.author,
            self.role,
            self.time,
            self.comment_type,
            &self.message,
            self.attachment.as_ref(),
        )
    }
}

/// Chain verification result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<LedgerBreak>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerBreakKind {
    /// Entry does not sit where its seq says it does
    SequenceMismatch,
    /// prev_hash does not match the previous entry's hash
    PrevHashMismatch,
    /// Stored hash does not match the entry contents
    HashMismatch,
    /// Action entry without a signature attachment
    UnsignedAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerBreak {
    pub seq: u64,
    pub comment_id: String,
    pub kind: LedgerBreakKind,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<Comment>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the type/attachment pairing of an entry without appending it.
    pub fn validate(entry: &NewComment) -> Result<(), LedgerError> {
        let attachment = entry.attachment.as_ref().filter(|a| !a.is_empty());

        if entry.comment_type.is_action() || entry.comment_type == CommentType::Signature {
            return match attachment {
                Some(a) if a.kind == AttachmentKind::Signature => Ok(()),
                Some(_) => Err(LedgerError::Malformed(format!(
                    "{} entry must carry a signature, not an image",
                    entry.comment_type.as_str()
                ))),
                None => Err(LedgerError::Malformed(format!(
                    "{} entry requires a signature attachment",
                    entry.comment_type.as_str()
                ))),
            };
        }

        match entry.comment_type {
            CommentType::Image => match attachment {
                Some(a) if a.kind == AttachmentKind::Image => Ok(()),
                _ => Err(LedgerError::Malformed(
                    "image entry requires an image attachment".into(),
                )),
            },
            CommentType::Text => {
                if let Some(a) = attachment {
                    if a.kind != AttachmentKind::Image {
                        return Err(LedgerError::Malformed(
                            "text entry may only attach an image".into(),
                        ));
                    }
                    return Ok(());
                }
                if entry.message.trim().is_empty() {
                    return Err(LedgerError::Malformed(
                        "text entry requires a message or an image".into(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Validate and append an entry at the tail of the ledger.
    pub fn append(&mut self, entry: NewComment) -> Result<&Comment, LedgerError> {
        Self::validate(&entry)?;

        let seq = self.entries.len() as u64 + 1;
        let prev_hash = self.head_hash().to_string();
        let hash = compute_comment_hash(
            &prev_hash,
            seq,
            &entry.id,
            &entry.author_id,
            &entry.author,
            entry.role,
            entry.time,
            entry.comment_type,
            &entry.message,
            entry.attachment.as_ref(),
        );

        self.entries.push(Comment {
            seq,
            id: entry.id,
            author_id: entry.author_id,
            author: entry.author,
            role: entry.role,
            time: entry.time,
            message: entry.message,
            comment_type: entry.comment_type,
            attachment: entry.attachment,
            prev_hash,
            hash,
        });

        // Just pushed
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[Comment] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Comment> {
        self.entries.last()
    }

    /// Hash of the most recent entry, or the genesis hash
    pub fn head_hash(&self) -> &str {
        self.entries
            .last()
            .map(|c| c.hash.as_str())
            .unwrap_or(GENESIS_HASH)
    }

    /// Recompute the chain and report every break.
    pub fn verify(&self) -> LedgerVerification {
        let mut breaks = Vec::new();
        let mut expected_prev = GENESIS_HASH.to_string();

        for (idx, comment) in self.entries.iter().enumerate() {
            let expected_seq = idx as u64 + 1;
            if comment.seq != expected_seq {
                breaks.push(LedgerBreak {
                    seq: comment.seq,
                    comment_id: comment.id.clone(),
                    kind: LedgerBreakKind::SequenceMismatch,
                    expected: expected_seq.to_string(),
                    actual: comment.seq.to_string(),
                });
            }

            if comment.prev_hash != expected_prev {
                breaks.push(LedgerBreak {
                    seq: comment.seq,
                    comment_id: comment.id.clone(),
                    kind: LedgerBreakKind::PrevHashMismatch,
                    expected: expected_prev.clone(),
                    actual: comment.prev_hash.clone(),
                });
            }

            let recomputed = comment.expected_hash();
            if recomputed != comment.hash {
                breaks.push(LedgerBreak {
                    seq: comment.seq,
                    comment_id: comment.id.clone(),
                    kind: LedgerBreakKind::HashMismatch,
                    expected: recomputed,
                    actual: comment.hash.clone(),
                });
            }

            if comment.comment_type.is_action() && !comment.is_signed() {
                breaks.push(LedgerBreak {
                    seq: comment.seq,
                    comment_id: comment.id.clone(),
                    kind: LedgerBreakKind::UnsignedAction,
                    expected: "signature".to_string(),
                    actual: "none".to_string(),
                });
            }

            expected_prev = comment.hash.clone();
        }

        LedgerVerification {
            total_entries: self.entries.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Hash of one ledger entry.
///
/// Layout: prev_hash, seq and time as little-endian bytes, then each
/// variable-length field followed by `\x00`. The attachment contributes its
/// kind and payload digest; `\x00` alone marks no attachment.
#[allow(clippy::too_many_arguments)]
pub fn compute_comment_hash(
    prev_hash: &str,
    seq: u64,
    id: &str,
    author_id: &str,
    author: &str,
    role: AuthorRole,
    time: i64,
    comment_type: CommentType,
    message: &str,
    attachment: Option<&Attachment>,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(seq.to_le_bytes());
    hasher.update(time.to_le_bytes());

    for field in [
        id,
        author_id,
        author,
        role.as_str(),
        comment_type.as_str(),
        message,
    ] {
        hasher.update(field.as_bytes());
        hasher.update(b"\x00");
    }

    match attachment {
        Some(a) => {
            hasher.update(b"\x01");
            hasher.update(match a.kind {
                AttachmentKind::Image => b"image".as_slice(),
                AttachmentKind::Signature => b"signature".as_slice(),
            });
            hasher.update(b"\x00");
            hasher.update(a.digest().as_bytes());
            hasher.update(b"\x00");
        }
        None => hasher.update(b"\x00"),
    }

    hex::encode(hasher.finalize())
}
