//! Ticket snapshot - the persisted state of one ticket

use super::ledger::Ledger;
use super::types::{Attachment, Category, Priority, TicketStatus};
use crate::models::{Role, StudentReport};
use serde::{Deserialize, Serialize};

/// Reference to a student report linked to a ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentReportRef {
    pub id: String,
    pub student_name: String,
    pub summary: String,
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl From<&StudentReport> for StudentReportRef {
    fn from(report: &StudentReport) -> Self {
        Self {
            id: report.id.clone(),
            student_name: report.reporter_name.clone(),
            summary: if report.summary.is_empty() {
                report.title.clone()
            } else {
                report.summary.clone()
            },
            time: report.created_at,
            attachment: report.image.clone(),
        }
    }
}

/// Ticket snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: TicketStatus,
    pub school_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    pub reporter_id: String,
    pub reporter_role: Role,
    /// Assigned partner names, insertion ordered, no duplicates
    #[serde(default)]
    pub assigned_mitra: Vec<String>,
    #[serde(default)]
    pub student_reports: Vec<StudentReportRef>,
    #[serde(default)]
    pub comments: Ledger,
    pub created: i64,
    pub updated: i64,
    /// Bumped on every persisted change; used for optimistic concurrency
    #[serde(default)]
    pub version: u64,
}

impl Ticket {
    /// Empty ticket awaiting its creation event
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            category: Category::Lainnya,
            priority: Priority::default(),
            status: TicketStatus::Pending,
            school_name: String::new(),
            school_id: None,
            reporter_id: String::new(),
            reporter_role: Role::Sekolah,
            assigned_mitra: Vec::new(),
            student_reports: Vec::new(),
            comments: Ledger::new(),
            created: 0,
            updated: 0,
            version: 0,
        }
    }

    pub fn has_mitra(&self, name: &str) -> bool {
        self.assigned_mitra.iter().any(|m| m == name)
    }
}

/// Visibility scope for ticket listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TicketScope {
    #[default]
    All,
    /// Tickets of one school
    School(String),
    /// Tickets opened by one user
    Reporter(String),
    /// Tickets a partner is assigned to
    Mitra(String),
}

/// Listing filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TicketFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Case-insensitive match on title, description and school name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub scope: TicketScope,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|s| s != ticket.status)
            || self.category.is_some_and(|c| c != ticket.category)
            || self.priority.is_some_and(|p| p != ticket.priority)
        {
            return false;
        }

        let in_scope = match &self.scope {
            TicketScope::All => true,
            TicketScope::School(id) => ticket.school_id.as_deref() == Some(id.as_str()),
            TicketScope::Reporter(id) => ticket.reporter_id == *id,
            TicketScope::Mitra(name) => ticket.has_mitra(name),
        };
        if !in_scope {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [&ticket.title, &ticket.description, &ticket.school_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}
