//! services/api/src/web/interviews.rs
//!
//! Interview scheduling endpoints.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use recruit_core::domain::{Capability, InterviewStatus, InterviewType, InterviewUpdate};
use recruit_core::workflow::{interviews, WorkflowError};

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ScheduleInterviewRequest {
    pub application_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    /// "online" or "offline".
    pub interview_type: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateInterviewRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CompleteInterviewRequest {
    pub feedback: Option<String>,
    pub rating: Option<i32>,
}

fn parse_type(raw: &str) -> Result<InterviewType, ApiError> {
    InterviewType::from_str(raw)
        .map_err(|_| ApiError::Workflow(WorkflowError::InvalidStatus(raw.to_string())))
}

fn parse_status(raw: &str) -> Result<InterviewStatus, ApiError> {
    InterviewStatus::from_str(raw)
        .map_err(|_| ApiError::Workflow(WorkflowError::InvalidStatus(raw.to_string())))
}

fn validate_rating(rating: Option<i32>) -> Result<(), ApiError> {
    if let Some(r) = rating {
        if !(1..=5).contains(&r) {
            return Err(ApiError::Validation("rating must be 1 to 5".to_string()));
        }
    }
    Ok(())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /interviews - Schedule an interview for an application
pub async fn schedule_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ScheduleInterviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ScheduleInterviews)?;
    let interview = interviews::schedule(
        state.db.as_ref(),
        req.application_id,
        req.scheduled_at,
        parse_type(&req.interview_type)?,
        req.location,
        req.notes,
    )
    .await?;
    Ok((StatusCode::CREATED, envelope(interview)))
}

/// GET /interviews/upcoming - Scheduled interviews from now on, role-scoped
pub async fn upcoming_interviews_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let interviews = interviews::list_upcoming(state.db.as_ref(), user.account_id, user.role).await?;
    Ok(envelope(interviews))
}

/// GET /interviews/{id}
pub async fn get_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let interview = state.db.get_interview(id).await?;
    Ok(envelope(interview))
}

/// PUT /interviews/{id} - Free-form partial update
pub async fn update_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInterviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ScheduleInterviews)?;
    validate_rating(req.rating)?;
    let update = InterviewUpdate {
        scheduled_at: req.scheduled_at,
        interview_type: req.interview_type.as_deref().map(parse_type).transpose()?,
        location: req.location,
        notes: req.notes,
        feedback: req.feedback,
        rating: req.rating,
        status: req.status.as_deref().map(parse_status).transpose()?,
    };
    let interview = interviews::update(state.db.as_ref(), id, update).await?;
    Ok(envelope(interview))
}

/// DELETE /interviews/{id} - Cancel (the row stays, status CANCELLED)
pub async fn cancel_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ScheduleInterviews)?;
    let interview = interviews::cancel(state.db.as_ref(), id).await?;
    Ok(envelope(interview))
}

/// POST /interviews/{id}/complete - Mark done, with optional feedback
pub async fn complete_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteInterviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ScheduleInterviews)?;
    validate_rating(req.rating)?;
    let interview = interviews::complete(state.db.as_ref(), id, req.feedback, req.rating).await?;
    Ok(envelope(interview))
}
