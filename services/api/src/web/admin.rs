//! services/api/src/web/admin.rs
//!
//! Admin endpoints: user role management, account removal, posting
//! moderation and the activity feed.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use recruit_core::domain::{Capability, Role};
use recruit_core::workflow::{postings, WorkflowError};

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope, log_activity};

#[derive(Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ModeratePostingRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// PUT /admin/users/{id}/role - Change an account's role
pub async fn update_user_role_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Moderate)?;
    let role = Role::from_str(&req.role)
        .map_err(|_| ApiError::Workflow(WorkflowError::InvalidStatus(req.role.clone())))?;
    let account = state.db.update_account_role(id, role).await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "changed account role").await;
    Ok(envelope(account))
}

/// DELETE /admin/users/{id} - Remove an account and everything under it
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Moderate)?;
    if id == user.account_id {
        return Err(ApiError::Validation(
            "an admin cannot delete their own account".to_string(),
        ));
    }
    state.db.delete_account(id).await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "deleted account").await;
    Ok(envelope(serde_json::json!({ "deleted": id })))
}

/// PUT /admin/jobs/{id}/status - Posting moderation
pub async fn moderate_posting_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ModeratePostingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Moderate)?;
    let posting = postings::admin_set_status(state.db.as_ref(), id, &req.status).await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "moderated posting status").await;
    Ok(envelope(posting))
}

/// GET /admin/activity - Most recent activity entries
pub async fn activity_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Moderate)?;
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let entries = state.db.list_activity(limit).await?;
    Ok(envelope(entries))
}
