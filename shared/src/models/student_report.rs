//! Student report model

use crate::ticket::Attachment;
use serde::{Deserialize, Serialize};

/// Report submitted by a student (murid)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentReport {
    pub id: String,
    pub reporter_id: String,
    pub reporter_name: String,
    pub school_id: String,
    pub title: String,
    pub summary: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Attachment>,
}
