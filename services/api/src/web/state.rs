//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use recruit_core::domain::Role;
use recruit_core::ports::DatabaseService;
use std::sync::Arc;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
}

/// The authenticated caller, resolved by the auth middleware and inserted
/// into request extensions. The role comes from the database at request
/// time, not from the token, so a role change takes effect immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}
