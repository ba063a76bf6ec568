use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use gatehouse_auth::{LoginUrlRequest, Settings, UrlRewriter, login_url::with_redirect_to};

use crate::app::dto::{LoginEndpointQuery, LoginUrlQuery, LoginUrlResponse};
use crate::app::errors;
use crate::app::routes::{LOGIN_ENDPOINT, settings_for};
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::SESSION_COOKIE;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Login link filter: what a login link should point at for this visitor.
pub async fn login_url(
    State(services): State<Arc<AppServices>>,
    settings: Option<Extension<Settings>>,
    Query(query): Query<LoginUrlQuery>,
) -> Json<LoginUrlResponse> {
    let login_url = rewrite_login_link(
        &services,
        settings_for(&services, settings),
        query.redirect_to.as_deref(),
        query.force_reauth(),
        query.current_view(),
    );
    Json(LoginUrlResponse { login_url })
}

/// Build the host's default login link and pass it through the rewriter.
/// Unreadable settings leave the default link in place.
pub(crate) fn rewrite_login_link(
    services: &AppServices,
    settings: Option<Settings>,
    return_path: Option<&str>,
    force_reauth: bool,
    current_view: Option<gatehouse_core::ResourceId>,
) -> String {
    let endpoint = services.content.url_for(LOGIN_ENDPOINT);
    let mut request = match return_path.filter(|p| !p.is_empty()) {
        Some(path) => LoginUrlRequest::new(with_redirect_to(&endpoint, path)).returning_to(path),
        None => LoginUrlRequest::new(endpoint),
    };
    request.force_reauth = force_reauth;

    match settings {
        Some(settings) => services.gate(&settings).rewrite_login_url(&request, current_view),
        None => request.requested_url,
    }
}

/// The host login endpoint. Only logout is handled here; logging in and
/// password recovery belong to the identity provider.
pub async fn login_endpoint(
    State(services): State<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<LoginEndpointQuery>,
) -> Response {
    let action = query.action.as_deref().unwrap_or("login");
    if action != "logout" {
        return Json(json!({ "action": action, "authenticated": session.is_authenticated() })).into_response();
    }

    if let Some(token) = session.token() {
        services.sessions.end(token);
        tracing::info!(user = ?session.user_id(), "logged out");
    }

    let target = query
        .redirect_to
        .filter(|target| target.starts_with('/'))
        .map(|path| services.content.url_for(&path))
        .unwrap_or_else(|| services.content.url_for("/"));

    let mut response = errors::found(&target);
    let expired = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly");
    if let Ok(value) = HeaderValue::from_str(&expired) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
