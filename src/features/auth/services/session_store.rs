//! In-process session store for the session-scoped auth variant
//!
//! Keyed by a request-correlated token carried in the
//! `x-session-token` header. Never an ambient global: the store is
//! constructed once at startup and injected where needed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

/// Tokens held for one signed-in operator.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Instant,
}

impl SessionCredentials {
    /// Margin applied so a token is refreshed before it actually lapses
    /// mid-pipeline.
    pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

    pub fn is_expired(&self) -> bool {
        Instant::now() + Self::EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionCredentials>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store credentials under a fresh session token and return it.
    /// Sessions that can never be used again (expired, no refresh
    /// token) are swept here so the map stays bounded in a long-lived
    /// process.
    pub async fn create(&self, credentials: SessionCredentials) -> String {
        let token = Uuid::now_v7().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, c| !c.is_expired() || c.refresh_token.is_some());
        sessions.insert(token.clone(), credentials);
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionCredentials> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Replace the credentials for an existing session (after refresh).
    pub async fn update(&self, token: &str, credentials: SessionCredentials) {
        self.sessions
            .write()
            .await
            .insert(token.to_string(), credentials);
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(expires_in: Duration) -> SessionCredentials {
        SessionCredentials {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: Instant::now() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_create_get_remove_roundtrip() {
        let store = SessionStore::new();
        let token = store.create(credentials(Duration::from_secs(3600))).await;

        let found = store.get(&token).await.unwrap();
        assert_eq!(found.access_token, "token");

        assert!(store.remove(&token).await);
        assert!(store.get(&token).await.is_none());
        assert!(!store.remove(&token).await);
    }

    #[tokio::test]
    async fn test_create_sweeps_unrefreshable_expired_sessions() {
        let store = SessionStore::new();

        // Already inside the expiry margin, nothing to refresh with
        let dead = store.create(credentials(Duration::from_secs(1))).await;
        // Expired but still refreshable
        let refreshable = store
            .create(SessionCredentials {
                refresh_token: Some("refresh".to_string()),
                ..credentials(Duration::from_secs(1))
            })
            .await;

        let live = store.create(credentials(Duration::from_secs(3600))).await;

        assert!(store.get(&dead).await.is_none());
        assert!(store.get(&refreshable).await.is_some());
        assert!(store.get(&live).await.is_some());
    }

    #[test]
    fn test_expiry_applies_refresh_margin() {
        // Nominally valid for 30s, but inside the 60s margin.
        assert!(credentials(Duration::from_secs(30)).is_expired());
        assert!(!credentials(Duration::from_secs(3600)).is_expired());
    }
}
