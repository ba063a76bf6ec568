//! Request pipeline: session lookup, the early endpoint check, view
//! resolution and the late view check.

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use gatehouse_auth::{
    Decision, RawRequest, RequestInterceptor, SessionProvider, Settings, ViewClassification,
    ViewContext,
};
use gatehouse_core::ResourceId;
use gatehouse_infra::{ContentDirectory, ContentItem, ContentKind};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{ResolvedView, SessionContext};

pub const SESSION_COOKIE: &str = "gatehouse_session";

/// Upper bound on a login form body read by the early check.
const FORM_BODY_LIMIT: usize = 64 * 1024;

pub async fn session_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = extract_token(req.headers())
        .and_then(|token| {
            services
                .sessions
                .session(token, Utc::now())
                .map(|session| SessionContext::authenticated(token, session))
        })
        .unwrap_or_else(SessionContext::anonymous);

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Early check on the raw path, before any routing. Loads the settings the
/// rest of the request sees.
pub async fn raw_endpoint_gate(State(services): State<Arc<AppServices>>, req: Request, next: Next) -> Response {
    let authenticated = is_authenticated(&req);
    let (mut req, form) = if !authenticated && carries_login_form(&services, &req) {
        match buffer_form(req).await {
            Ok(buffered) => buffered,
            Err(response) => return response,
        }
    } else {
        (req, Vec::new())
    };
    let raw = raw_request(req.uri(), form, authenticated);

    let Some(settings) = services.settings() else {
        return next.run(req).await;
    };
    req.extensions_mut().insert(settings);
    let decision = services.gate(&settings).on_raw_request(&raw);

    match decision {
        Decision::RedirectTo(target) => errors::found(&target),
        Decision::Allow(_) => next.run(req).await,
    }
}

/// Anonymous form posts to a gated endpoint; their body may carry the
/// return path.
fn carries_login_form(services: &AppServices, req: &Request) -> bool {
    let path = req.uri().path();
    req.method() == Method::POST
        && (services.endpoints.is_login(path) || services.endpoints.is_admin(path))
        && req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// Read the form body and hand back an equivalent request for the handler.
async fn buffer_form(req: Request) -> Result<(Request, Vec<(String, String)>), Response> {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, FORM_BODY_LIMIT).await.map_err(|err| {
        tracing::warn!(error = %err, path = %parts.uri.path(), "login form body rejected");
        errors::json_error(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", "form body too large")
    })?;
    let form = url::form_urlencoded::parse(&bytes).into_owned().collect();
    Ok((Request::from_parts(parts, Body::from(bytes)), form))
}

/// Classify the path against site content and attach a [`ResolvedView`].
/// Paths that match no content pass through without one.
pub async fn resolve_view(State(services): State<Arc<AppServices>>, mut req: Request, next: Next) -> Response {
    let current_url = current_url(&services.content, req.uri());
    if let Some(view) = resolve_path(&services.content, req.uri().path(), current_url) {
        tracing::debug!(path = %req.uri().path(), resource = ?view.resource_id(), "view resolved");
        req.extensions_mut().insert(view);
    }
    next.run(req).await
}

/// Late check, once the answering content is known.
pub async fn resolved_view_gate(State(services): State<Arc<AppServices>>, req: Request, next: Next) -> Response {
    let Some(view) = req.extensions().get::<ResolvedView>() else {
        return next.run(req).await;
    };

    let mut context =
        ViewContext::new(view.current_url.clone(), is_authenticated(&req)).classified(view.classification);
    if let Some(id) = view.resource_id() {
        context = context.resource(id);
    }

    let Some(settings) = request_settings(&services, &req) else {
        return next.run(req).await;
    };
    let decision = services.gate(&settings).on_resolved_view(&context);

    match decision {
        Decision::RedirectTo(target) => errors::found(&target),
        Decision::Allow(_) => next.run(req).await,
    }
}

/// Settings loaded by the early check, or a fresh read when it did not run.
pub fn request_settings(services: &AppServices, req: &Request) -> Option<Settings> {
    req.extensions()
        .get::<Settings>()
        .copied()
        .or_else(|| services.settings())
}

fn is_authenticated(req: &Request) -> bool {
    req.extensions()
        .get::<SessionContext>()
        .is_some_and(SessionContext::is_authenticated)
}

/// Session token from the session cookie, else a bearer token.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value.trim())
        });

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)?
                .to_str()
                .ok()?
                .strip_prefix("Bearer ")
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

/// Raw request from the URI and any posted form pairs. Posted values come
/// first so they win over the query string.
pub fn raw_request(uri: &Uri, form: Vec<(String, String)>, authenticated: bool) -> RawRequest {
    let query = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect::<Vec<_>>())
        .unwrap_or_default();

    form.into_iter()
        .chain(query)
        .fold(RawRequest::new(uri.path(), authenticated), |raw, (k, v)| raw.with_query(k, v))
}

/// Absolute URL of the request, query string included.
pub fn current_url(content: &ContentDirectory, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    content.url_for(path_and_query)
}

/// Map a request path onto site content.
///
/// The account and checkout pages own their sub-paths (`/my-account/orders/`,
/// `/checkout/order-received/12/`); other nested paths resolve to nothing.
pub fn resolve_path(content: &ContentDirectory, path: &str, current_url: String) -> Option<ResolvedView> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let commerce = content.commerce();

    let view = |item: Option<ContentItem>, classification: ViewClassification, category: Option<String>| ResolvedView {
        current_url: current_url.clone(),
        item,
        classification,
        category,
    };

    match segments.as_slice() {
        [] => {
            let home = content.find(ContentKind::Page, "home").cloned();
            let classification = ViewClassification {
                singular: home.is_some(),
                ..Default::default()
            };
            Some(view(home, classification, None))
        }
        ["product", slug] => {
            let product = content.find(ContentKind::Product, slug)?.clone();
            let classification = ViewClassification {
                product: true,
                singular: true,
                ..Default::default()
            };
            Some(view(Some(product), classification, None))
        }
        ["product-category", slug] => {
            if !content.has_category(slug) {
                return None;
            }
            let classification = ViewClassification {
                product_taxonomy: true,
                ..Default::default()
            };
            Some(view(None, classification, Some(slug.to_string())))
        }
        [slug, rest @ ..] => {
            let item = content.find_top_level(slug)?.clone();
            let is = |assigned: Option<ResourceId>| assigned == Some(item.id);

            let account_page = is(commerce.account);
            let checkout = is(commerce.checkout);
            if !rest.is_empty() && !account_page && !checkout {
                return None;
            }

            let shop = is(commerce.shop);
            let classification = ViewClassification {
                account_page,
                checkout,
                shop,
                singular: !shop,
                ..Default::default()
            };
            Some(view(Some(item), classification, None))
        }
    }
}
