//! services/api/src/web/postings.rs
//!
//! Job posting endpoints: public browsing, company CRUD over its own
//! postings, and the owning company's applicant list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use recruit_core::domain::{Capability, PostingStatus, PostingUpdate};
use recruit_core::workflow::postings::{self, PostingFields};

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope, log_activity};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl CreateJobRequest {
    fn into_fields(self) -> Result<PostingFields, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("description is required".to_string()));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(ApiError::Validation(
                    "salary_min must not exceed salary_max".to_string(),
                ));
            }
        }
        Ok(PostingFields {
            title: self.title.trim().to_string(),
            description: self.description,
            requirements: self.requirements,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            employment_type: self.employment_type,
            deadline: self.deadline,
        })
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /jobs - Public browse of active postings
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses((status = 200, description = "Active postings, newest first"))
)]
pub async fn list_jobs_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let postings = state
        .db
        .list_postings_by_status(PostingStatus::Active)
        .await?;
    Ok(envelope(postings))
}

/// GET /jobs/{id} - Public posting detail
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Posting id")),
    responses(
        (status = 200, description = "The posting"),
        (status = 404, description = "No such posting")
    )
)]
pub async fn get_job_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let posting = state.db.get_posting(id).await?;
    Ok(envelope(posting))
}

/// POST /jobs - Create a posting owned by the caller's company
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Posting created"),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Caller is not a company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ManagePostings)?;
    let posting = postings::create(state.db.as_ref(), user.account_id, req.into_fields()?).await?;
    log_activity(state.db.as_ref(), Some(user.account_id), "created job posting").await;
    Ok((StatusCode::CREATED, envelope(posting)))
}

/// GET /jobs/my - The caller's own postings
pub async fn my_jobs_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ManagePostings)?;
    let postings = postings::list_mine(state.db.as_ref(), user.account_id).await?;
    Ok(envelope(postings))
}

/// PUT /jobs/{id} - Partial update of an owned posting
pub async fn update_job_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ManagePostings)?;
    if let (Some(min), Some(max)) = (req.salary_min, req.salary_max) {
        if min > max {
            return Err(ApiError::Validation(
                "salary_min must not exceed salary_max".to_string(),
            ));
        }
    }
    let update = PostingUpdate {
        title: req.title,
        description: req.description,
        requirements: req.requirements,
        location: req.location,
        salary_min: req.salary_min,
        salary_max: req.salary_max,
        employment_type: req.employment_type,
        deadline: req.deadline,
    };
    let posting = postings::update(state.db.as_ref(), user.account_id, id, update).await?;
    Ok(envelope(posting))
}

/// DELETE /jobs/{id} - Delete an owned posting
pub async fn delete_job_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ManagePostings)?;
    postings::delete(state.db.as_ref(), user.account_id, id).await?;
    Ok(envelope(serde_json::json!({ "deleted": id })))
}

/// GET /jobs/{id}/applications - Applicants of an owned posting
pub async fn job_applications_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::ManagePostings)?;
    let applicants = postings::list_applicants(state.db.as_ref(), user.account_id, id).await?;
    Ok(envelope(applicants))
}
