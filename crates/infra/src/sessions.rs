//! Session registry standing in for the host's identity provider.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use gatehouse_auth::{Session, SessionProvider};
use gatehouse_core::UserId;

use crate::store::{InMemoryKvStore, KvStore};

#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn KvStore<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn KvStore<String, Session>>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Arc::new(InMemoryKvStore::<String, Session>::new()), ttl)
    }

    /// Log `user` in and return the opaque session token.
    pub fn start(&self, user_id: UserId, now: DateTime<Utc>) -> String {
        let token = Uuid::now_v7().simple().to_string();
        self.store.upsert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        tracing::debug!(user = %user_id, "session started");
        token
    }

    pub fn end(&self, token: &str) -> bool {
        self.store.remove(&token.to_string()).is_some()
    }

    /// Drop sessions that expired before `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) {
        self.store.retain(&|_, session| session.expires_at > now);
    }
}

impl SessionProvider for SessionRegistry {
    fn session(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = self.store.get(&token.to_string())?;
        if session.expires_at <= now {
            self.store.remove(&token.to_string());
            return None;
        }
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_session_resolves_until_expiry() {
        let now = Utc::now();
        let sessions = SessionRegistry::in_memory(Duration::minutes(30));
        let user = UserId::new();
        let token = sessions.start(user, now);

        let session = sessions.session(&token, now + Duration::minutes(29)).unwrap();
        assert_eq!(session.user_id, user);

        assert!(sessions.session(&token, now + Duration::minutes(30)).is_none());
        // Expired sessions are evicted on lookup.
        assert!(sessions.session(&token, now).is_none());
    }

    #[test]
    fn unknown_and_ended_tokens_do_not_resolve() {
        let now = Utc::now();
        let sessions = SessionRegistry::in_memory(Duration::minutes(30));
        assert!(sessions.session("nope", now).is_none());

        let token = sessions.start(UserId::new(), now);
        assert!(sessions.end(&token));
        assert!(!sessions.end(&token));
        assert!(sessions.session(&token, now).is_none());
    }

    #[test]
    fn purge_drops_only_expired_sessions() {
        let now = Utc::now();
        let sessions = SessionRegistry::in_memory(Duration::minutes(10));
        let old = sessions.start(UserId::new(), now - Duration::minutes(20));
        let fresh = sessions.start(UserId::new(), now);

        sessions.purge_expired(now);

        assert!(sessions.session(&old, now - Duration::minutes(15)).is_none());
        assert!(sessions.session(&fresh, now).is_some());
    }
}
