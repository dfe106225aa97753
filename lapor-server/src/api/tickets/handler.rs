//! Ticket API Handlers
//!
//! Thin adapters: decode the body, hand the acting user and the payload to
//! the [`TicketManager`](crate::tickets::TicketManager), return the new
//! snapshot.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::Advice;
use shared::ticket::{
    Attachment, AttachmentKind, Category, CommentType, LedgerVerification, Priority, Ticket,
    TicketAction, TicketFilter, TicketStatus,
};

use crate::api::ApiJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::tickets::{Capabilities, TicketError};
use crate::utils::AppResult;

/// Query params for listing tickets
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<TicketStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub school_name: String,
    /// Base64 or data URL
    #[serde(default)]
    pub attachment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentReportRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub school_name: String,
    /// Base64 or data URL
    pub photo: String,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default = "default_comment_type")]
    pub comment_type: CommentType,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attachment: Option<String>,
}

fn default_comment_type() -> CommentType {
    CommentType::Text
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    /// Captured signature, base64 or data URL
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMitraRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStudentReportsRequest {
    pub report_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPriorityRequest {
    pub priority: Priority,
}

/// Optional attachment; blank strings count as absent
fn decode_optional(
    kind: AttachmentKind,
    encoded: Option<String>,
) -> Result<Option<Attachment>, TicketError> {
    match encoded {
        Some(s) if !s.trim().is_empty() => Ok(Some(Attachment::decode(kind, &s)?)),
        _ => Ok(None),
    }
}

/// Required photo; a blank string is passed on empty so the action reports it
fn decode_photo(encoded: &str) -> Result<Attachment, TicketError> {
    if encoded.trim().is_empty() {
        return Ok(Attachment::new(AttachmentKind::Image, None, Vec::new()));
    }
    Ok(Attachment::decode(AttachmentKind::Image, encoded)?)
}

/// List tickets visible to the caller, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let filter = TicketFilter {
        status: query.status,
        category: query.category,
        priority: query.priority,
        search: query.search,
        ..Default::default()
    };
    let tickets = state.manager().list_tickets(user.actor(), filter).await?;
    Ok(Json(tickets))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreateTicketRequest>,
) -> AppResult<Json<Ticket>> {
    let attachment = decode_optional(AttachmentKind::Image, req.attachment)?;
    let ticket = state
        .manager()
        .create_ticket(
            user.actor(),
            req.title,
            req.description,
            req.category,
            req.priority,
            req.school_name,
            attachment,
        )
        .await?;
    Ok(Json(ticket))
}

pub async fn submit_student_report(
    State(state): State<ServerState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<StudentReportRequest>,
) -> AppResult<Json<Ticket>> {
    let photo = decode_photo(&req.photo)?;
    let ticket = state
        .manager()
        .submit_student_report(
            user.actor(),
            req.title,
            req.description,
            req.school_name,
            photo,
        )
        .await?;
    Ok(Json(ticket))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.manager().get_ticket(user.actor(), &id).await?;
    Ok(Json(ticket))
}

pub async fn capabilities(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Capabilities>> {
    let caps = state.manager().get_capabilities(user.actor(), &id).await?;
    Ok(Json(caps))
}

pub async fn advice(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Advice>> {
    let advice = state.manager().get_advice(user.actor(), &id).await?;
    Ok(Json(advice))
}

pub async fn verify_ledger(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LedgerVerification>> {
    let verification = state.manager().verify_ledger(user.actor(), &id).await?;
    Ok(Json(verification))
}

pub async fn add_comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddCommentRequest>,
) -> AppResult<Json<Ticket>> {
    let kind = match req.comment_type {
        CommentType::Signature => AttachmentKind::Signature,
        _ => AttachmentKind::Image,
    };
    let attachment = decode_optional(kind, req.attachment)?;
    let ticket = state
        .manager()
        .add_comment(user.actor(), &id, req.comment_type, req.message, attachment)
        .await?;
    Ok(Json(ticket))
}

async fn change_status(
    state: &ServerState,
    user: &CurrentUser,
    id: &str,
    action: TicketAction,
    req: StatusChangeRequest,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .manager()
        .change_status(user.actor(), id, action, req.signature, req.note)
        .await?;
    Ok(Json(ticket))
}

pub async fn escalate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusChangeRequest>,
) -> AppResult<Json<Ticket>> {
    change_status(&state, &user, &id, TicketAction::Escalate, req).await
}

pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusChangeRequest>,
) -> AppResult<Json<Ticket>> {
    change_status(&state, &user, &id, TicketAction::Approve, req).await
}

pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusChangeRequest>,
) -> AppResult<Json<Ticket>> {
    change_status(&state, &user, &id, TicketAction::Reject, req).await
}

pub async fn add_mitra(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddMitraRequest>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.manager().add_mitra(user.actor(), &id, req.name).await?;
    Ok(Json(ticket))
}

pub async fn remove_mitra(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, index)): Path<(String, usize)>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .manager()
        .remove_mitra(user.actor(), &id, index)
        .await?;
    Ok(Json(ticket))
}

pub async fn set_student_reports(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SetStudentReportsRequest>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .manager()
        .set_student_reports(user.actor(), &id, req.report_ids)
        .await?;
    Ok(Json(ticket))
}

pub async fn set_priority(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SetPriorityRequest>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .manager()
        .set_priority(user.actor(), &id, req.priority)
        .await?;
    Ok(Json(ticket))
}
