//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use recruit_core::ports::PortError;

use crate::error::ApiError;
use crate::web::state::{AppState, AuthUser};
use crate::web::token;

/// Middleware that validates the bearer token and resolves the caller.
///
/// The account is re-read from the database so a deleted account's still
/// unexpired token stops working. On success an [`AuthUser`] lands in the
/// request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract and parse the Authorization header
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("missing authorization header".to_string()))?;
    let raw_token = token::bearer(header_value)?;

    // 2. Verify signature and expiry
    let claims = token::verify(&state.config.jwt_secret, raw_token)?;

    // 3. Re-resolve the account; a deleted account gets 401, not 404
    let account = state.db.get_account(claims.sub).await.map_err(|e| match e {
        PortError::NotFound(_) => ApiError::Unauthenticated("account no longer exists".to_string()),
        other => ApiError::Port(other),
    })?;

    // 4. Insert the caller into request extensions
    req.extensions_mut().insert(AuthUser {
        account_id: account.id,
        email: account.email,
        role: account.role,
    });

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
