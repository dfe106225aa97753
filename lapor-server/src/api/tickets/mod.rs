//! Ticket API Module
//!
//! Every route requires a bearer token. Tickets outside the caller's
//! visibility scope answer 404, same as missing ones. Request bodies may
//! exceed axum's 2 MB default so that a full-size attachment fits.

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;
use crate::utils::validation::MAX_REQUEST_BODY_BYTES;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/student-report", post(handler::submit_student_report))
        .route("/{id}", get(handler::get_by_id))
        // Read models
        .route("/{id}/capabilities", get(handler::capabilities))
        .route("/{id}/advice", get(handler::advice))
        .route("/{id}/ledger/verify", get(handler::verify_ledger))
        // Ledger
        .route("/{id}/comments", post(handler::add_comment))
        // Status changes (signature required)
        .route("/{id}/escalate", post(handler::escalate))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        // Administrative attributes
        .route("/{id}/mitra", post(handler::add_mitra))
        .route("/{id}/mitra/{index}", delete(handler::remove_mitra))
        .route("/{id}/student-reports", put(handler::set_student_reports))
        .route("/{id}/priority", put(handler::set_priority))
        // Base64 attachments up to MAX_ATTACHMENT_BYTES
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
}
