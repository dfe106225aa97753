//! Directory API Module
//!
//! Read-only lookups the ticket screens need: a school's student reports
//! (for linking) and the partner directory (for assignment).

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/student-reports", get(handler::list_student_reports))
        .route("/api/partners", get(handler::list_partners))
}
