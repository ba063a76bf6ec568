//! Collaborators the gate consumes.
//!
//! The gate owns none of this state. The host (or `gatehouse-infra` in dev and
//! tests) supplies implementations.

use chrono::{DateTime, Utc};

use gatehouse_core::{GateResult, ResourceId, ResourceStatus, UserId};

use crate::settings::{Settings, StoredSettings};

/// Configuration store holding the settings object.
pub trait SettingsStore: Send + Sync {
    /// Read and sanitize the current settings.
    fn load(&self) -> GateResult<Settings>;

    /// Replace the stored settings.
    fn save(&self, settings: StoredSettings) -> GateResult<()>;

    /// Write `settings` only when nothing is stored yet. Returns whether a
    /// write happened.
    fn add_if_absent(&self, settings: StoredSettings) -> GateResult<bool>;
}

/// Resource metadata provider.
pub trait ResourceDirectory: Send + Sync {
    /// `None` when the resource does not exist.
    fn status(&self, id: ResourceId) -> Option<ResourceStatus>;

    /// Absolute URL of the resource, `None` when it does not exist.
    fn permalink(&self, id: ResourceId) -> Option<String>;
}

/// Pages owned by the commerce extension.
pub trait CommercePages: Send + Sync {
    /// The commerce "my account" page, if one is configured.
    fn account_page_id(&self) -> Option<ResourceId>;
}

/// An authenticated session as seen by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Session / identity provider.
pub trait SessionProvider: Send + Sync {
    /// Resolve a session token. Unknown or expired tokens yield `None`.
    fn session(&self, token: &str, now: DateTime<Utc>) -> Option<Session>;
}

/// Per-resource "force login" flag store.
pub trait ForceLoginFlags: Send + Sync {
    /// Unset flags read as `false`.
    fn get_flag(&self, id: ResourceId) -> bool;

    fn set_flag(&self, id: ResourceId, value: bool);
}

/// Anti-forgery token verification for the flag write path.
pub trait NonceVerifier: Send + Sync {
    fn verify(&self, token: &str, action: &str, user: UserId, now: DateTime<Utc>) -> bool;
}

/// Edit permission check for the flag write path.
pub trait EditPermissions: Send + Sync {
    fn can_edit(&self, user: UserId, resource: ResourceId) -> bool;
}
