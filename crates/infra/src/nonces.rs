//! Anti-forgery tokens for admin form submissions.
//!
//! A nonce is bound to an action and a user and stays valid for its lifetime;
//! it is not consumed by verification, matching how the host treats form
//! nonces.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use gatehouse_auth::NonceVerifier;
use gatehouse_core::UserId;

use crate::store::{InMemoryKvStore, KvStore};

/// Default nonce lifetime (one day).
pub fn default_lifetime() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceRecord {
    pub action: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NonceRegistry {
    store: Arc<dyn KvStore<String, NonceRecord>>,
    lifetime: Duration,
}

impl NonceRegistry {
    pub fn new(store: Arc<dyn KvStore<String, NonceRecord>>, lifetime: Duration) -> Self {
        Self { store, lifetime }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKvStore::<String, NonceRecord>::new()), default_lifetime())
    }

    pub fn issue(&self, action: &str, user_id: UserId, now: DateTime<Utc>) -> String {
        self.store.retain(&|_, record| record.expires_at > now);

        let token = Uuid::now_v7().simple().to_string();
        self.store.upsert(
            token.clone(),
            NonceRecord {
                action: action.to_string(),
                user_id,
                expires_at: now + self.lifetime,
            },
        );
        token
    }
}

impl NonceVerifier for NonceRegistry {
    fn verify(&self, token: &str, action: &str, user: UserId, now: DateTime<Utc>) -> bool {
        self.store
            .get(&token.to_string())
            .is_some_and(|r| r.action == action && r.user_id == user && r.expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_bound_to_action_and_user() {
        let now = Utc::now();
        let nonces = NonceRegistry::in_memory();
        let user = UserId::new();
        let token = nonces.issue("save_force_login", user, now);

        assert!(nonces.verify(&token, "save_force_login", user, now));
        assert!(nonces.verify(&token, "save_force_login", user, now), "reusable within lifetime");
        assert!(!nonces.verify(&token, "other_action", user, now));
        assert!(!nonces.verify(&token, "save_force_login", UserId::new(), now));
        assert!(!nonces.verify("forged", "save_force_login", user, now));
    }

    #[test]
    fn nonce_expires() {
        let now = Utc::now();
        let nonces = NonceRegistry::in_memory();
        let user = UserId::new();
        let token = nonces.issue("save_force_login", user, now);

        assert!(!nonces.verify(&token, "save_force_login", user, now + Duration::hours(25)));
    }
}
