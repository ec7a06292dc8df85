//! Access-token providers
//!
//! Three credential shapes produce "a valid authorized handle" for the
//! Drive and Sheets clients. Which one runs is a startup-time
//! configuration decision; the save pipeline only sees the trait.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::config::{RefreshTokenConfig, ServiceAccountConfig};
use crate::core::error::{AppError, Result};
use crate::features::auth::clients::{GoogleOAuthClient, GOOGLE_API_SCOPES};
use crate::features::auth::services::session_store::{SessionCredentials, SessionStore};

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A bearer token valid for the Drive and Sheets scopes.
    /// `session_token` is only consulted by the session-scoped variant.
    async fn access_token(&self, session_token: Option<&str>) -> Result<String>;
}

/// Cached access token with expiration tracking
struct TokenCache {
    access_token: String,
    expires_in: Duration,
    fetched_at: Instant,
}

impl TokenCache {
    /// Refresh this many seconds before expiration
    const REFRESH_MARGIN: Duration = Duration::from_secs(60);

    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() + Self::REFRESH_MARGIN < self.expires_in
    }
}

#[derive(Debug, Deserialize)]
struct GrantResponse {
    access_token: String,
    expires_in: u64,
}

// ---------------------------------------------------------------------------
// Service-account variant (signed JWT grant)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

pub struct ServiceAccountProvider {
    config: ServiceAccountConfig,
    token_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<TokenCache>>,
}

impl ServiceAccountProvider {
    const ASSERTION_LIFETIME_SECS: u64 = 3600;

    pub fn new(config: ServiceAccountConfig, token_url: String) -> Self {
        Self {
            config,
            token_url,
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    fn signed_assertion(&self) -> Result<String> {
        let iat = chrono::Utc::now().timestamp() as u64;
        let claims = ServiceAccountClaims {
            iss: &self.config.client_email,
            scope: GOOGLE_API_SCOPES,
            aud: &self.token_url,
            iat,
            exp: iat + Self::ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes())
            .map_err(|e| AppError::Auth(format!("Invalid service account private key: {}", e)))?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AppError::Auth(format!("Failed to sign service account JWT: {}", e)))
    }

    async fn fetch_token(&self) -> Result<String> {
        let assertion = self.signed_assertion()?;

        tracing::debug!("Fetching service account token from {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
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

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        tracing::info!(
            "Fetched service account token, expires in {} seconds",
            grant.expires_in
        );

        let mut cache = self.cache.write().await;
        *cache = Some(TokenCache {
            access_token: grant.access_token.clone(),
            expires_in: Duration::from_secs(grant.expires_in),
            fetched_at: Instant::now(),
        });

        Ok(grant.access_token)
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountProvider {
    async fn access_token(&self, _session_token: Option<&str>) -> Result<String> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.is_fresh() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }
}

// ---------------------------------------------------------------------------
// Long-lived refresh-token variant
// ---------------------------------------------------------------------------

pub struct RefreshTokenProvider {
    config: RefreshTokenConfig,
    token_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<TokenCache>>,
}

impl RefreshTokenProvider {
    pub fn new(config: RefreshTokenConfig, token_url: String) -> Self {
        Self {
            config,
            token_url,
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    async fn fetch_token(&self) -> Result<String> {
        tracing::debug!("Refreshing access token from {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
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

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        let mut cache = self.cache.write().await;
        *cache = Some(TokenCache {
            access_token: grant.access_token.clone(),
            expires_in: Duration::from_secs(grant.expires_in),
            fetched_at: Instant::now(),
        });

        Ok(grant.access_token)
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshTokenProvider {
    async fn access_token(&self, _session_token: Option<&str>) -> Result<String> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.is_fresh() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }
}

// ---------------------------------------------------------------------------
// Session-scoped variant
// ---------------------------------------------------------------------------

pub struct SessionTokenProvider {
    sessions: Arc<SessionStore>,
    oauth: Arc<GoogleOAuthClient>,
}

impl SessionTokenProvider {
    pub fn new(sessions: Arc<SessionStore>, oauth: Arc<GoogleOAuthClient>) -> Self {
        Self { sessions, oauth }
    }
}

#[async_trait]
impl AccessTokenProvider for SessionTokenProvider {
    async fn access_token(&self, session_token: Option<&str>) -> Result<String> {
        let session_token = session_token.ok_or_else(|| {
            AppError::Auth("Not signed in: no session token provided".to_string())
        })?;

        let credentials = self
            .sessions
            .get(session_token)
            .await
            .ok_or_else(|| AppError::Auth("Not signed in: unknown session token".to_string()))?;

        if !credentials.is_expired() {
            return Ok(credentials.access_token);
        }

        // Expired: refresh in place when possible, otherwise the
        // operator has to sign in again.
        let refresh_token = credentials
            .refresh_token
            .clone()
            .ok_or_else(|| AppError::Auth("Session expired: sign in again".to_string()))?;

        let refreshed = self.oauth.refresh_access_token(&refresh_token).await?;

        let updated = SessionCredentials {
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token.or(Some(refresh_token)),
            expires_at: Instant::now() + Duration::from_secs(refreshed.expires_in),
        };
        self.sessions.update(session_token, updated).await;

        Ok(refreshed.access_token)
    }
}
