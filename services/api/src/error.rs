//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its
//! translation to the `{success, error}` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::ConfigError;
use recruit_core::ports::PortError;
use recruit_core::workflow::WorkflowError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Missing, malformed or expired bearer token, or a token whose account
    /// no longer exists.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Wrong role for the attempted operation.
    #[error("Access denied")]
    Forbidden,

    /// A request body that parsed but failed field validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A business-rule or ownership failure from the workflow layer.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// An error that propagated up from the persistence port outside any
    /// workflow operation.
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// An error from the underlying database library.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A standard Input/Output error (socket binding, file storage).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

fn port_error_response(err: &PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        PortError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        PortError::Unexpected(detail) => {
            tracing::error!("storage failure: {detail}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}

impl ApiError {
    /// Maps the error to the HTTP status and the caller-visible message of
    /// the response envelope. Internal detail never leaks past this point.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Workflow(err) => match err {
                WorkflowError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                WorkflowError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                WorkflowError::AlreadyApplied | WorkflowError::AlreadyRecruited => {
                    (StatusCode::CONFLICT, err.to_string())
                }
                WorkflowError::ProfileNotFound(_)
                | WorkflowError::PostingNotActive
                | WorkflowError::CvNotOwned
                | WorkflowError::NotPending
                | WorkflowError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                WorkflowError::Port(port_err) => port_error_response(port_err),
            },
            ApiError::Port(err) => port_error_response(err),
            ApiError::Database(e) => {
                tracing::error!("database failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                tracing::error!("internal failure: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = Json(json!({
            "success": false,
            "error": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_errors_map_to_expected_statuses() {
        let cases = [
            (WorkflowError::NotFound("posting"), StatusCode::NOT_FOUND),
            (WorkflowError::Forbidden, StatusCode::FORBIDDEN),
            (WorkflowError::AlreadyApplied, StatusCode::CONFLICT),
            (WorkflowError::AlreadyRecruited, StatusCode::CONFLICT),
            (WorkflowError::PostingNotActive, StatusCode::BAD_REQUEST),
            (WorkflowError::CvNotOwned, StatusCode::BAD_REQUEST),
            (WorkflowError::NotPending, StatusCode::BAD_REQUEST),
            (
                WorkflowError::InvalidStatus("BOGUS".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = ApiError::Workflow(err).status_and_message();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn unexpected_detail_does_not_leak() {
        let err = ApiError::Port(PortError::Unexpected("connection string with secret".into()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
