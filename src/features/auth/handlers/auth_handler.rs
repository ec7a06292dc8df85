use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::dtos::{
    AuthCallbackQuery, AuthCallbackResponse, AuthStatusResponse, AuthUrlResponse, LogoutResponse,
};
use crate::features::auth::services::AuthService;
use crate::shared::constants::SESSION_TOKEN_HEADER;

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// Get the Google consent-screen URL
#[utoipa::path(
    get,
    path = "/api/auth/url",
    tag = "auth",
    responses(
        (status = 200, description = "Authorization URL", body = AuthUrlResponse),
        (status = 500, description = "OAuth client not configured")
    )
)]
pub async fn auth_url(
    State(service): State<Arc<AuthService>>,
) -> Result<Json<AuthUrlResponse>, AppError> {
    let url = service.authorization_url()?;
    Ok(Json(AuthUrlResponse { url }))
}

/// OAuth callback: exchange the authorization code for credentials
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = "auth",
    params(AuthCallbackQuery),
    responses(
        (status = 200, description = "Code exchanged, session created", body = AuthCallbackResponse),
        (status = 400, description = "Missing code or consent denied"),
        (status = 500, description = "Token exchange failed")
    )
)]
pub async fn auth_callback(
    State(service): State<Arc<AuthService>>,
    Query(query): Query<AuthCallbackQuery>,
) -> Result<Json<AuthCallbackResponse>, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::BadRequest(format!(
            "Authorization was not granted: {}",
            error
        )));
    }

    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let outcome = service.handle_callback(&code).await?;

    Ok(Json(AuthCallbackResponse {
        success: true,
        session_token: outcome.session_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// Whether the caller holds valid credentials
#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication status", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Json<AuthStatusResponse> {
    let is_authenticated = service.is_authenticated(session_token(&headers)).await;
    Json(AuthStatusResponse { is_authenticated })
}

/// Drop the caller's session credentials
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse)
    )
)]
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Json<LogoutResponse> {
    let removed = service.logout(session_token(&headers)).await;
    Json(LogoutResponse { success: removed })
}
