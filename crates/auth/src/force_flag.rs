//! Write path for the per-resource "force login" flag.
//!
//! Mutations are anti-forgery protected and permission checked. Failed
//! checks are not errors: the write is skipped and the caller gets
//! [`FlagWriteOutcome::Denied`] to map onto a silent response.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gatehouse_core::{ResourceId, UserId};

use crate::ports::{EditPermissions, ForceLoginFlags, NonceVerifier};
use crate::settings::YesNo;

/// Nonce action the flag form is bound to.
pub const SAVE_FLAG_ACTION: &str = "save_force_login";

/// A submitted flag edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagUpdate {
    pub resource_id: ResourceId,
    pub user_id: UserId,
    pub nonce: Option<String>,
    /// Raw checkbox value; only `"yes"` sets the flag.
    pub value: Option<String>,
    /// Background autosaves never touch the flag.
    pub autosave: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum FlagWriteOutcome {
    Saved(bool),
    Denied(DenialKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    MissingNonce,
    InvalidNonce,
    Autosave,
    Forbidden,
}

/// Persist a flag edit if and only if every guard passes.
pub fn save_force_login_flag(
    update: &FlagUpdate,
    nonces: &dyn NonceVerifier,
    permissions: &dyn EditPermissions,
    flags: &dyn ForceLoginFlags,
    now: DateTime<Utc>,
) -> FlagWriteOutcome {
    let Some(nonce) = update.nonce.as_deref().filter(|n| !n.is_empty()) else {
        return deny(update, DenialKind::MissingNonce);
    };

    if !nonces.verify(nonce, SAVE_FLAG_ACTION, update.user_id, now) {
        return deny(update, DenialKind::InvalidNonce);
    }

    if update.autosave {
        return deny(update, DenialKind::Autosave);
    }

    if !permissions.can_edit(update.user_id, update.resource_id) {
        return deny(update, DenialKind::Forbidden);
    }

    let value = YesNo::from_submitted(update.value.as_deref()).as_bool();
    flags.set_flag(update.resource_id, value);
    tracing::info!(resource = %update.resource_id, user = %update.user_id, value, "force-login flag saved");

    FlagWriteOutcome::Saved(value)
}

fn deny(update: &FlagUpdate, kind: DenialKind) -> FlagWriteOutcome {
    tracing::debug!(resource = %update.resource_id, user = %update.user_id, ?kind, "force-login flag write skipped");
    FlagWriteOutcome::Denied(kind)
}
