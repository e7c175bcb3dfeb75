//! services/api/src/web/applications.rs
//!
//! The application workflow endpoints: apply, status changes by the
//! posting's company (or an admin), withdrawal by the student, and the
//! per-role listings.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use recruit_core::domain::{ApplicationStatus, Capability};
use recruit_core::workflow::{applications, WorkflowError};

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope, log_activity};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ApplyRequest {
    pub cv_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateApplicationRequest {
    pub status: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /applications/jobs/{job_id}/apply - Apply to a posting
#[utoipa::path(
    post,
    path = "/applications/jobs/{job_id}/apply",
    tag = "applications",
    params(("job_id" = Uuid, Path, description = "Posting id")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application created"),
        (status = 400, description = "Posting not active, or CV problem"),
        (status = 409, description = "Already applied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn apply_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let application =
        applications::apply(state.db.as_ref(), user.account_id, job_id, req.cv_id, req.notes)
            .await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "applied to posting").await;
    Ok((StatusCode::CREATED, envelope(application)))
}

/// GET /applications - The calling student's applications, newest first
#[utoipa::path(
    get,
    path = "/applications",
    tag = "applications",
    responses((status = 200, description = "Applications with posting summaries")),
    security(("bearer_auth" = []))
)]
pub async fn my_applications_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let views = applications::list_mine(state.db.as_ref(), user.account_id).await?;
    Ok(envelope(views))
}

/// PUT /applications/{id} - Set an application's status
///
/// Open to the posting's owning company and to admins; the workflow layer
/// enforces ownership.
pub async fn update_application_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ReviewApplications)?;
    let status = ApplicationStatus::from_str(&req.status)
        .map_err(|_| WorkflowError::InvalidStatus(req.status.clone()))
        .map_err(ApiError::Workflow)?;
    let application =
        applications::update_status(state.db.as_ref(), user.account_id, user.role, id, status)
            .await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "updated application status").await;
    Ok(envelope(application))
}

/// DELETE /applications/{id} - Withdraw a still-pending application
pub async fn withdraw_application_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    applications::withdraw(state.db.as_ref(), user.account_id, id).await?;
    Ok(envelope(serde_json::json!({ "withdrawn": id })))
}

/// GET /applications/admin/all - Every application in the system
pub async fn all_applications_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ListAllApplications)?;
    let all = applications::list_all(state.db.as_ref()).await?;
    Ok(envelope(all))
}
