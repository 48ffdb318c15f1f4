use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tokio::sync::RwLock;
use tracing::info;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Session {
    student_id: i64,
    expires_at: DateTime<Utc>,
}

/// Bearer-token sessions with a fixed lifetime. Tokens are never rotated or
/// extended; they die at expiry or on logout, and all of them die on restart.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<SessionRegistryInner>,
}

struct SessionRegistryInner {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(SessionRegistryInner {
                ttl,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Issue a fresh token for `student_id`.
    pub async fn create(&self, student_id: i64) -> String {
        self.create_at(student_id, Utc::now()).await
    }

    /// Resolve a token to its student. Expired entries are evicted on sight.
    pub async fn validate(&self, token: &str) -> Option<i64> {
        self.validate_at(token, Utc::now()).await
    }

    /// Returns whether the token was live.
    pub async fn revoke(&self, token: &str) -> bool {
        self.inner.sessions.write().await.remove(token).is_some()
    }

    /// Drop every session that has expired by `now`. Returns how many went.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    async fn create_at(&self, student_id: i64, now: DateTime<Utc>) -> String {
        let token = generate_token();
        let session = Session {
            student_id,
            expires_at: now + self.inner.ttl,
        };
        self.inner
            .sessions
            .write()
            .await
            .insert(token.clone(), session);
        token
    }

    async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<i64> {
        {
            let sessions = self.inner.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if session.expires_at > now => return Some(session.student_id),
                Some(_) => {}
            }
        }

        let mut sessions = self.inner.sessions.write().await;
        if let Some(session) = sessions.get(token) {
            if session.expires_at <= now {
                sessions.remove(token);
            }
        }
        None
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Background task that drops expired sessions every `interval_secs`.
pub async fn run_purge_loop(sessions: SessionRegistry, interval_secs: u64) {
    let mut interval = tokio::time::interval(StdDuration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let count = sessions.purge_expired(Utc::now()).await;
        if count > 0 {
            info!("Session purge: dropped {} expired sessions", count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_resolves_until_expiry() {
        let registry = SessionRegistry::new(Duration::hours(24));
        let issued = Utc::now();
        let token = registry.create_at(7, issued).await;

        assert_eq!(registry.validate_at(&token, issued).await, Some(7));
        assert_eq!(
            registry.validate_at(&token, issued + Duration::hours(23)).await,
            Some(7)
        );
        assert_eq!(
            registry.validate_at(&token, issued + Duration::hours(24)).await,
            None
        );
        // Evicted, so even an earlier clock no longer finds it.
        assert_eq!(registry.validate_at(&token, issued).await, None);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn revoked_and_unknown_tokens_look_the_same() {
        let registry = SessionRegistry::new(Duration::hours(24));
        let token = registry.create(3).await;

        assert!(registry.revoke(&token).await);
        assert!(!registry.revoke(&token).await);
        assert_eq!(registry.validate(&token).await, None);
        assert_eq!(registry.validate("never-issued").await, None);
    }

    #[tokio::test]
    async fn tokens_are_unique_and_opaque() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let a = registry.create(1).await;
        let b = registry.create(1).await;

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn purge_only_removes_expired() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let now = Utc::now();
        registry.create_at(1, now - Duration::hours(2)).await;
        let live = registry.create_at(2, now).await;

        assert_eq!(registry.purge_expired(now).await, 1);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.validate_at(&live, now).await, Some(2));
    }
}
