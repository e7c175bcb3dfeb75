//! services/api/src/web/auth.rs
//!
//! Registration, login and caller identity endpoints. Registration creates
//! the account and its profile in one step; both registration and login
//! return a bearer token.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use recruit_core::domain::{NewCompanyProfile, NewStudentProfile, Role};
use recruit_core::ports::PortError;

use crate::error::ApiError;
use crate::web::{envelope, log_activity};
use crate::web::state::{AppState, AuthUser};
use crate::web::token;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterStudentRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub major: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterCompanyRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub industry_type: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

fn required(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!("failed to hash password: {e:?}");
            ApiError::Internal("failed to hash password".to_string())
        })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register/student - Create a student account with its profile
#[utoipa::path(
    post,
    path = "/auth/register/student",
    tag = "auth",
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Account created, token returned"),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_student_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&req.email, &req.password)?;
    required(&req.full_name, "full_name")?;
    required(&req.major, "major")?;

    let password_hash = hash_password(&req.password)?;
    let profile = NewStudentProfile {
        full_name: req.full_name.trim().to_string(),
        major: req.major.trim().to_string(),
        phone: req.phone,
        skills: req.skills,
    };

    let (account, profile) = state
        .db
        .create_student_account(req.email.trim(), &password_hash, profile)
        .await?;
    log_activity(state.db.as_ref(), Some(account.id), "student registered").await;
    info!(account_id = %account.id, "student account created");

    let token = token::issue(&state.config.jwt_secret, account.id, &account.email, account.role)?;
    Ok((
        StatusCode::CREATED,
        envelope(json!({ "token": token, "account": account, "profile": profile })),
    ))
}

/// POST /auth/register/company - Create a company account with its profile
#[utoipa::path(
    post,
    path = "/auth/register/company",
    tag = "auth",
    request_body = RegisterCompanyRequest,
    responses(
        (status = 201, description = "Account created, token returned"),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_company_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&req.email, &req.password)?;
    required(&req.company_name, "company_name")?;
    required(&req.industry_type, "industry_type")?;

    let password_hash = hash_password(&req.password)?;
    let profile = NewCompanyProfile {
        company_name: req.company_name.trim().to_string(),
        industry_type: req.industry_type.trim().to_string(),
        phone: req.phone,
        address: req.address,
    };

    let (account, profile) = state
        .db
        .create_company_account(req.email.trim(), &password_hash, profile)
        .await?;
    log_activity(state.db.as_ref(), Some(account.id), "company registered").await;
    info!(account_id = %account.id, "company account created");

    let token = token::issue(&state.config.jwt_secret, account.id, &account.email, account.role)?;
    Ok((
        StatusCode::CREATED,
        envelope(json!({ "token": token, "account": account, "profile": profile })),
    ))
}

/// POST /auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token returned"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown email and wrong password produce the same response shape.
    let invalid = || ApiError::Unauthenticated("Invalid email or password".to_string());

    let creds = state
        .db
        .get_account_by_email(req.email.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => invalid(),
            other => ApiError::Port(other),
        })?;

    let parsed_hash = PasswordHash::new(&creds.password_hash).map_err(|e| {
        error!("failed to parse stored password hash: {e:?}");
        ApiError::Internal("authentication error".to_string())
    })?;
    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid());
    }

    log_activity(state.db.as_ref(), Some(creds.account_id), "logged in").await;

    let token = token::issue(&state.config.jwt_secret, creds.account_id, &creds.email, creds.role)?;
    Ok(envelope(json!({
        "token": token,
        "account_id": creds.account_id,
        "email": creds.email,
        "role": creds.role,
    })))
}

/// GET /auth/me - The authenticated caller's account and profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Caller identity"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.db.get_account(user.account_id).await?;
    let profile = match user.role {
        Role::Student => {
            profile_json(state.db.get_student_profile_by_account(user.account_id).await)?
        }
        Role::Company => {
            profile_json(state.db.get_company_profile_by_account(user.account_id).await)?
        }
        Role::Admin => None,
    };
    Ok(envelope(json!({ "account": account, "profile": profile })))
}

/// A caller without a profile row gets `null`; any other lookup failure
/// is a real storage error and must surface, not be masked as missing.
fn profile_json<T: serde::Serialize>(
    lookup: Result<T, PortError>,
) -> Result<Option<serde_json::Value>, ApiError> {
    match lookup {
        Ok(profile) => Ok(Some(json!(profile))),
        Err(PortError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApiError::Port(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_renders_as_null() {
        let lookup: Result<serde_json::Value, PortError> =
            Err(PortError::NotFound("student profile".to_string()));
        assert_eq!(profile_json(lookup).unwrap(), None);
    }

    #[test]
    fn present_profile_is_serialized() {
        let lookup: Result<_, PortError> = Ok(json!({ "full_name": "Siti Rahma" }));
        let rendered = profile_json(lookup).unwrap();
        assert_eq!(rendered, Some(json!({ "full_name": "Siti Rahma" })));
    }

    #[test]
    fn storage_failures_propagate_instead_of_masking() {
        let lookup: Result<serde_json::Value, PortError> =
            Err(PortError::Unexpected("connection reset".to_string()));
        assert!(matches!(
            profile_json(lookup),
            Err(ApiError::Port(PortError::Unexpected(_)))
        ));
    }
}
