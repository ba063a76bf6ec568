//! Admin-area endpoints: settings screen, the per-resource force-login box
//! and the background AJAX handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use gatehouse_auth::{SAVE_FLAG_ACTION, SettingsStore, sanitize_settings};
use gatehouse_core::ResourceId;

use crate::app::dto::{DashboardResponse, FlagResponse, ForceLoginForm, NonceResponse, SettingsResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub async fn dashboard(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    match authz::require_user(&session) {
        Ok(user_id) => Json(DashboardResponse {
            user_id,
            can_edit: services.editors.is_editor(user_id),
        })
        .into_response(),
        Err(resp) => resp,
    }
}

/// Background admin calls; reachable without a session.
pub async fn ajax(
    Extension(session): Extension<SessionContext>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "action": params.get("action"),
        "authenticated": session.is_authenticated(),
    }))
}

pub async fn get_settings(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(resp) = authz::require_editor(&services, &session) {
        return resp;
    }
    match services.options.stored_settings() {
        Ok(settings) => Json(SettingsResponse { settings }).into_response(),
        Err(e) => errors::gate_error_to_response(e),
    }
}

/// Settings form submission. Unchecked boxes are simply absent from the
/// form and persist as `"no"`.
pub async fn save_settings(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response {
    let user = match authz::require_editor(&services, &session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let settings = sanitize_settings(&submitted);
    if let Err(e) = services.options.save(settings.clone()) {
        return errors::gate_error_to_response(e);
    }
    tracing::info!(%user, login_page_id = settings.login_page_id, "gate settings saved");

    Json(SettingsResponse { settings }).into_response()
}

pub async fn issue_nonce(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(raw_id): Path<String>,
) -> Response {
    let user = match authz::require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let resource_id = match known_resource(&services, &raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let nonce = services.nonces.issue(SAVE_FLAG_ACTION, user, Utc::now());
    Json(NonceResponse {
        resource_id,
        action: SAVE_FLAG_ACTION,
        nonce,
    })
    .into_response()
}

/// The editor save path. Failed guards are reported in the outcome, not as
/// an error status.
pub async fn save_force_login(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(raw_id): Path<String>,
    Form(form): Form<ForceLoginForm>,
) -> Response {
    let user = match authz::require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let resource_id = match known_resource(&services, &raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let outcome = authz::submit_force_login_flag(&services, user, resource_id, form);
    Json(FlagResponse { resource_id, outcome }).into_response()
}

fn known_resource(services: &AppServices, raw: &str) -> Result<ResourceId, Response> {
    let id: ResourceId = raw
        .parse()
        .map_err(|_| errors::json_error(axum::http::StatusCode::BAD_REQUEST, "invalid_id", "resource id must be a positive integer"))?;
    if services.content.get(id).is_none() {
        return Err(errors::not_found());
    }
    Ok(id)
}
