//! Admin-side guards: who may edit settings and per-resource flags.
//!
//! The gate itself never authorizes writes; these helpers sit between the
//! admin handlers and the stores.

use axum::response::Response;
use chrono::Utc;

use gatehouse_auth::{FlagUpdate, FlagWriteOutcome, save_force_login_flag};
use gatehouse_core::{ResourceId, UserId};

use crate::app::dto::ForceLoginForm;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// The logged-in user, or `401`.
pub fn require_user(session: &SessionContext) -> Result<UserId, Response> {
    session.user_id().ok_or_else(errors::unauthenticated)
}

/// A logged-in user with site-wide edit rights, or `401`/`403`.
pub fn require_editor(services: &AppServices, session: &SessionContext) -> Result<UserId, Response> {
    let user = require_user(session)?;
    if !services.editors.is_editor(user) {
        tracing::debug!(%user, "admin access denied");
        return Err(errors::forbidden());
    }
    Ok(user)
}

/// Run a submitted editor form through the flag write guards.
pub fn submit_force_login_flag(
    services: &AppServices,
    user_id: UserId,
    resource_id: ResourceId,
    form: ForceLoginForm,
) -> FlagWriteOutcome {
    let update = FlagUpdate {
        resource_id,
        user_id,
        autosave: form.is_autosave(),
        nonce: form.nonce,
        value: form.force_login,
    };

    save_force_login_flag(&update, &services.nonces, &services.editors, &services.meta, Utc::now())
}
