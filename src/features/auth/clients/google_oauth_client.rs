//! Google OAuth2 client for the session-scoped auth variant
//!
//! Builds the consent URL and exchanges/refreshes authorization codes
//! at the token endpoint.

use serde::Deserialize;

use crate::core::error::{AppError, Result};

/// Scopes needed by the save pipeline: Drive (folders, upload) and
/// Sheets (metadata, append).
pub const GOOGLE_API_SCOPES: &str =
    "https://www.googleapis.com/auth/drive https://www.googleapis.com/auth/spreadsheets";

const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Response from the Google token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

pub struct GoogleOAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    http: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        token_url: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            token_url,
            http: reqwest::Client::new(),
        }
    }

    /// Consent-screen URL. `access_type=offline` with `prompt=consent`
    /// makes Google return a refresh token on exchange.
    pub fn authorization_url(&self) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZATION_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_API_SCOPES),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AppError::Auth(format!("Failed to build authorization URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Mint a fresh access token from a stored refresh token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))
    }
}
