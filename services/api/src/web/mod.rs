//! services/api/src/web/mod.rs
//!
//! The HTTP surface: handlers, middleware, token handling and shared state.

pub mod admin;
pub mod ancillary;
pub mod applications;
pub mod auth;
pub mod files;
pub mod interviews;
pub mod middleware;
pub mod postings;
pub mod recruitments;
pub mod state;
pub mod token;

pub use middleware::require_auth;

use axum::Json;
use serde::Serialize;
use serde_json::json;
use utoipa::OpenApi;

use recruit_core::domain::Capability;
use recruit_core::ports::DatabaseService;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AuthUser;

/// Wraps a payload in the success envelope all endpoints share.
pub fn envelope<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Central role check. Ownership checks live in the workflow layer;
/// this only answers "may this role perform this category of action".
pub fn authorize(user: &AuthUser, capability: Capability) -> Result<(), ApiError> {
    if user.role.can(capability) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Best-effort activity logging. The request must not fail because the
/// audit row could not be written.
pub async fn log_activity(db: &dyn DatabaseService, account_id: Option<Uuid>, action: &str) {
    if let Err(e) = db.log_activity(account_id, action).await {
        tracing::warn!("failed to record activity '{action}': {e}");
    }
}

/// The OpenAPI documentation served under /swagger-ui.
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_student_handler,
        auth::register_company_handler,
        auth::login_handler,
        auth::me_handler,
        postings::list_jobs_handler,
        postings::get_job_handler,
        postings::create_job_handler,
        applications::apply_handler,
        applications::my_applications_handler,
    ),
    components(schemas(
        auth::RegisterStudentRequest,
        auth::RegisterCompanyRequest,
        auth::LoginRequest,
        postings::CreateJobRequest,
        applications::ApplyRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "jobs", description = "Job posting lifecycle"),
        (name = "applications", description = "Application workflow")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub(crate) struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_core::domain::Role;
    use uuid::Uuid;

    #[test]
    fn envelope_wraps_data_under_success() {
        let Json(value) = envelope(serde_json::json!({ "id": 7 }));
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], 7);
    }

    #[test]
    fn authorize_follows_the_capability_matrix() {
        let student = AuthUser {
            account_id: Uuid::new_v4(),
            email: "s@example.edu".to_string(),
            role: Role::Student,
        };
        assert!(authorize(&student, Capability::Apply).is_ok());
        assert!(matches!(
            authorize(&student, Capability::ManagePostings),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            authorize(&student, Capability::ReviewApplications),
            Err(ApiError::Forbidden)
        ));

        let reviewer = AuthUser {
            account_id: Uuid::new_v4(),
            email: "hr@acme.example".to_string(),
            role: Role::Company,
        };
        assert!(authorize(&reviewer, Capability::ReviewApplications).is_ok());
    }
}
