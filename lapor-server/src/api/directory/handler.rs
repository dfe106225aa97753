//! Directory API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{Partner, StudentReport};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct StudentReportQuery {
    /// Required for daerah/pusat; schools always get their own
    pub school_id: Option<String>,
}

pub async fn list_student_reports(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<StudentReportQuery>,
) -> AppResult<Json<Vec<StudentReport>>> {
    let reports = state
        .manager()
        .list_student_reports(user.actor(), query.school_id.as_deref())
        .await?;
    Ok(Json(reports))
}

/// Any authenticated user may read the partner directory
pub async fn list_partners(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Partner>>> {
    let partners = state.manager().list_partners().await?;
    Ok(Json(partners))
}
