//! services/api/src/web/ancillary.rs
//!
//! The smaller CRUD surfaces: bookmarks, notifications, company reviews,
//! portfolios, direct messages and per-account settings.

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

use recruit_core::domain::Capability;
use recruit_core::workflow::WorkflowError;

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateBookmarkRequest {
    pub job_posting_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub company_profile_id: Uuid,
    pub application_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePortfolioRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_account_id: Uuid,
    pub body: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    pub key: String,
    pub value: String,
}

//=========================================================================================
// Bookmarks
//=========================================================================================

/// POST /bookmarks - Bookmark a posting
pub async fn create_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    state.db.get_posting(req.job_posting_id).await?;
    let bookmark = state
        .db
        .create_bookmark(profile.id, req.job_posting_id)
        .await?;
    Ok((StatusCode::CREATED, envelope(bookmark)))
}

/// GET /bookmarks
pub async fn list_bookmarks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let bookmarks = state.db.list_bookmarks(profile.id).await?;
    Ok(envelope(bookmarks))
}

/// DELETE /bookmarks/{id}
pub async fn delete_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let owned = state
        .db
        .list_bookmarks(profile.id)
        .await?
        .iter()
        .any(|b| b.id == id);
    if !owned {
        return Err(ApiError::Workflow(WorkflowError::NotFound("bookmark")));
    }
    state.db.delete_bookmark(id).await?;
    Ok(envelope(serde_json::json!({ "deleted": id })))
}

//=========================================================================================
// Notifications
//=========================================================================================

/// GET /notifications
pub async fn list_notifications_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state.db.list_notifications(user.account_id).await?;
    Ok(envelope(notifications))
}

/// PUT /notifications/{id}/read
pub async fn mark_notification_read_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let owned = state
        .db
        .list_notifications(user.account_id)
        .await?
        .iter()
        .any(|n| n.id == id);
    if !owned {
        return Err(ApiError::Workflow(WorkflowError::NotFound("notification")));
    }
    let notification = state.db.mark_notification_read(id).await?;
    Ok(envelope(notification))
}

//=========================================================================================
// Reviews
//=========================================================================================

/// POST /reviews - A student reviews a company
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    if !(1..=5).contains(&req.rating) {
        return Err(ApiError::Validation("rating must be 1 to 5".to_string()));
    }
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    state.db.get_company_profile(req.company_profile_id).await?;
    let review = state
        .db
        .create_review(
            profile.id,
            req.company_profile_id,
            req.application_id,
            req.rating,
            req.comment,
        )
        .await?;
    Ok((StatusCode::CREATED, envelope(review)))
}

/// GET /companies/{id}/reviews - Public review listing for a company
pub async fn company_reviews_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.get_company_profile(id).await?;
    let reviews = state.db.list_reviews_for_company(id).await?;
    Ok(envelope(reviews))
}

//=========================================================================================
// Portfolios
//=========================================================================================

/// POST /portfolios
pub async fn create_portfolio_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreatePortfolioRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let portfolio = state
        .db
        .create_portfolio(profile.id, req.title.trim(), req.description, req.url)
        .await?;
    Ok((StatusCode::CREATED, envelope(portfolio)))
}

/// GET /portfolios
pub async fn list_portfolios_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let portfolios = state.db.list_portfolios(profile.id).await?;
    Ok(envelope(portfolios))
}

/// DELETE /portfolios/{id}
pub async fn delete_portfolio_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let owned = state
        .db
        .list_portfolios(profile.id)
        .await?
        .iter()
        .any(|p| p.id == id);
    if !owned {
        return Err(ApiError::Workflow(WorkflowError::NotFound("portfolio")));
    }
    state.db.delete_portfolio(id).await?;
    Ok(envelope(serde_json::json!({ "deleted": id })))
}

//=========================================================================================
// Messages
//=========================================================================================

/// POST /messages - Send a direct message
pub async fn send_message_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.trim().is_empty() {
        return Err(ApiError::Validation("message body is required".to_string()));
    }
    state.db.get_account(req.receiver_account_id).await?;
    let message = state
        .db
        .create_message(user.account_id, req.receiver_account_id, req.body.trim())
        .await?;
    Ok((StatusCode::CREATED, envelope(message)))
}

/// GET /messages/{peer} - The conversation with one other account
pub async fn conversation_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(peer): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state.db.list_conversation(user.account_id, peer).await?;
    Ok(envelope(messages))
}

//=========================================================================================
// Settings
//=========================================================================================

/// GET /settings
pub async fn list_settings_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = state.db.list_settings(user.account_id).await?;
    Ok(envelope(settings))
}

/// PUT /settings - Upsert one key/value pair
pub async fn upsert_setting_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.key.trim().is_empty() {
        return Err(ApiError::Validation("key is required".to_string()));
    }
    let setting = state
        .db
        .upsert_setting(user.account_id, req.key.trim(), &req.value)
        .await?;
    Ok(envelope(setting))
}
