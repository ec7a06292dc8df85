use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::auth::handlers::{auth_callback, auth_status, auth_url, logout};
use crate::features::auth::services::AuthService;

/// Create routes for the auth feature
pub fn routes(auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/url", get(auth_url))
        .route("/api/auth/callback", get(auth_callback))
        .route("/api/auth/status", get(auth_status))
        .route("/api/auth/logout", post(logout))
        .with_state(auth_service)
}
