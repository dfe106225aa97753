//! Advisory output

use serde::{Deserialize, Serialize};

/// Role-specific guidance derived from ticket state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advice {
    pub summary: String,
    pub insights: Vec<String>,
    pub guidance: String,
    pub next_steps: Vec<String>,
    pub draft_reply: String,
    pub status_advice: String,
}
