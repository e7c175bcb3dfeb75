//! services/api/src/web/recruitments.rs
//!
//! Direct recruitment endpoints. These routes sit outside the auth
//! middleware: callers identify themselves through ids in the body or
//! query string, matching the product's observed surface.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use recruit_core::domain::{RecruitmentFilter, RecruitmentStatus};
use recruit_core::workflow::{recruitments, WorkflowError};

use crate::error::ApiError;
use crate::web::{envelope, log_activity};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateRecruitmentRequest {
    pub company_profile_id: Uuid,
    pub student_profile_id: Uuid,
    pub recruiter_account_id: Option<Uuid>,
    pub message: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateRecruitmentStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Query filters for the listing; all optional, combined with AND.
#[derive(Deserialize)]
pub struct RecruitmentListQuery {
    pub company_profile_id: Option<Uuid>,
    pub student_profile_id: Option<Uuid>,
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /direct-recruitments - A company reaches out to a student
pub async fn create_recruitment_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecruitmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recruitment = recruitments::create(
        state.db.as_ref(),
        req.company_profile_id,
        req.student_profile_id,
        req.recruiter_account_id,
        req.message,
        req.notes,
    )
    .await?;
    log_activity(state.db.as_ref(), recruitment.recruiter_account_id, "created direct recruitment").await;
    Ok((StatusCode::CREATED, envelope(recruitment)))
}

/// GET /direct-recruitments - Filtered listing, newest first
pub async fn list_recruitments_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecruitmentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query
        .status
        .map(|raw| {
            RecruitmentStatus::from_str(&raw).map_err(|_| WorkflowError::InvalidStatus(raw))
        })
        .transpose()
        .map_err(ApiError::Workflow)?;
    let filter = RecruitmentFilter {
        company_profile_id: query.company_profile_id,
        student_profile_id: query.student_profile_id,
        status,
        recruiter_account_id: query.user_id,
    };
    let recruitments = recruitments::list(state.db.as_ref(), filter).await?;
    Ok(envelope(recruitments))
}

/// PUT /direct-recruitments/{id}/status - Move a recruitment along
pub async fn update_recruitment_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecruitmentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = RecruitmentStatus::from_str(&req.status)
        .map_err(|_| WorkflowError::InvalidStatus(req.status.clone()))
        .map_err(ApiError::Workflow)?;
    let recruitment =
        recruitments::update_status(state.db.as_ref(), id, status, req.notes).await?;
    Ok(envelope(recruitment))
}

/// DELETE /direct-recruitments/{id} - Soft delete: status becomes WITHDRAWN
pub async fn withdraw_recruitment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recruitment = recruitments::withdraw(state.db.as_ref(), id).await?;
    log_activity(state.db.as_ref(), recruitment.recruiter_account_id, "withdrew direct recruitment").await;
    Ok(envelope(recruitment))
}
