use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Authorization URL for the Google consent screen
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// Query parameters Google sends to the callback
#[derive(Debug, Deserialize, IntoParams)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    /// Set instead of `code` when the operator denied consent
    pub error: Option<String>,
}

/// Result of the code exchange. The session token authorizes later
/// saves via the `x-session-token` header; the refresh token, when
/// Google returns one, can be copied into the refresh-token
/// configuration shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthCallbackResponse {
    pub success: bool,
    pub session_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStatusResponse {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}
