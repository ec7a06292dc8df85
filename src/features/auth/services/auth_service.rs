use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::AuthMode;
use crate::core::error::{AppError, Result};
use crate::features::auth::clients::GoogleOAuthClient;
use crate::features::auth::services::session_store::{SessionCredentials, SessionStore};

/// Outcome of an authorization-code exchange. The refresh token is
/// echoed so an operator can copy it into the refresh-token
/// configuration shape.
pub struct CallbackOutcome {
    pub session_token: String,
    pub refresh_token: Option<String>,
}

/// Coordinates the OAuth endpoints with the session store.
pub struct AuthService {
    mode: AuthMode,
    oauth: Option<Arc<GoogleOAuthClient>>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(
        mode: AuthMode,
        oauth: Option<Arc<GoogleOAuthClient>>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            mode,
            oauth,
            sessions,
        }
    }

    fn oauth(&self) -> Result<&GoogleOAuthClient> {
        self.oauth.as_deref().ok_or_else(|| {
            AppError::Config(
                "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET are required for the OAuth flow"
                    .to_string(),
            )
        })
    }

    pub fn authorization_url(&self) -> Result<String> {
        self.oauth()?.authorization_url()
    }

    pub async fn handle_callback(&self, code: &str) -> Result<CallbackOutcome> {
        let tokens = self.oauth()?.exchange_code(code).await?;

        let refresh_token = tokens.refresh_token.clone();
        let session_token = self
            .sessions
            .create(SessionCredentials {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires_at: Instant::now() + Duration::from_secs(tokens.expires_in),
            })
            .await;

        tracing::info!("Authorization code exchanged, session created");

        Ok(CallbackOutcome {
            session_token,
            refresh_token,
        })
    }

    /// Static credential shapes are authenticated by configuration;
    /// only the session variant depends on the caller's token.
    pub async fn is_authenticated(&self, session_token: Option<&str>) -> bool {
        match self.mode {
            AuthMode::ServiceAccount | AuthMode::RefreshToken => true,
            AuthMode::OauthSession => match session_token {
                Some(token) => self
                    .sessions
                    .get(token)
                    .await
                    .is_some_and(|c| !c.is_expired() || c.refresh_token.is_some()),
                None => false,
            },
        }
    }

    pub async fn logout(&self, session_token: Option<&str>) -> bool {
        match session_token {
            Some(token) => self.sessions.remove(token).await,
            None => false,
        }
    }
}
