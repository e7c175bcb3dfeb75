//! services/api/src/web/files.rs
//!
//! CV upload, listing, deletion and download. Uploads land under the
//! configured upload directory with a fresh UUID filename; the original
//! name is kept in the database and used for the download header.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use recruit_core::domain::Capability;
use recruit_core::workflow::WorkflowError;

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::{authorize, envelope};

/// Content type by file extension. Anything unrecognized downloads as a
/// plain byte stream.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = original_name.rsplit('.').next()?;
    if ext == original_name || ext.is_empty() || ext.len() > 8 {
        return None;
    }
    if ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub download: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /cvs - Multipart upload of a CV file
pub async fn upload_cv_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;

    // First field named "file" wins.
    let mut stored: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("file field must carry a filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;
        stored = Some((original_name, data.to_vec()));
        break;
    }
    let (original_name, data) =
        stored.ok_or_else(|| ApiError::Validation("a 'file' field is required".to_string()))?;
    if data.is_empty() {
        return Err(ApiError::Validation("uploaded file is empty".to_string()));
    }

    let stored_name = match sanitized_extension(&original_name) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    };
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let path = state.config.upload_dir.join(&stored_name);
    tokio::fs::write(&path, &data).await?;

    let cv = state
        .db
        .create_cv(profile.id, &path.to_string_lossy(), &original_name)
        .await?;
    Ok((StatusCode::CREATED, envelope(cv)))
}

/// GET /cvs - The caller's uploaded CVs, newest first
pub async fn list_cvs_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let cvs = state.db.list_cvs(profile.id).await?;
    Ok(envelope(cvs))
}

/// DELETE /cvs/{id} - Remove a CV the caller owns
pub async fn delete_cv_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&user, Capability::Apply)?;
    let profile = state
        .db
        .get_student_profile_by_account(user.account_id)
        .await?;
    let cv = state.db.get_cv(id).await?;
    if cv.student_profile_id != profile.id {
        return Err(ApiError::Workflow(WorkflowError::Forbidden));
    }

    state.db.delete_cv(id).await?;
    // The row is gone; a missing disk file is not worth failing over.
    if let Err(e) = tokio::fs::remove_file(PathBuf::from(&cv.file_path)).await {
        tracing::warn!("failed to remove cv file {}: {e}", cv.file_path);
    }
    Ok(envelope(serde_json::json!({ "deleted": id })))
}

/// GET /cvs/{id}/file - Serve a CV inline, or as an attachment with ?download=true
pub async fn download_cv_handler(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let cv = state.db.get_cv(id).await?;
    let bytes = tokio::fs::read(&cv.file_path).await?;

    let disposition = if query.download {
        format!("attachment; filename=\"{}\"", cv.original_name)
    } else {
        format!("inline; filename=\"{}\"", cv.original_name)
    };
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&cv.original_name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_mapping_by_extension() {
        assert_eq!(content_type_for("cv.pdf"), "application/pdf");
        assert_eq!(content_type_for("CV.PDF"), "application/pdf");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(
            content_type_for("resume.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(content_type_for("noext"), "application/octet-stream");
        assert_eq!(content_type_for("weird.xyz"), "application/octet-stream");
    }

    #[test]
    fn extension_sanitizing() {
        assert_eq!(sanitized_extension("cv.pdf").as_deref(), Some("pdf"));
        assert_eq!(sanitized_extension("a.b.DocX").as_deref(), Some("docx"));
        assert_eq!(sanitized_extension("noext"), None);
        assert_eq!(sanitized_extension("trailingdot."), None);
        assert_eq!(sanitized_extension("evil.p/df"), None);
    }
}
