//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: in-memory stores behind the gate's ports
//! - `routes/`: handlers, one file per area (system, admin, site content)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error and redirect responses

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Layer order per request: session lookup, the early endpoint check, then
/// routing. Requests no route claims are site content: they go through view
/// resolution and the late view check before rendering.
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let site = Router::new().fallback(routes::site::render_view).layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(services.clone(), middleware::resolve_view))
            .layer(from_fn_with_state(services.clone(), middleware::resolved_view_gate)),
    );

    Router::new()
        .merge(routes::router())
        .merge(site)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(services.clone(), middleware::session_middleware))
                .layer(from_fn_with_state(services.clone(), middleware::raw_endpoint_gate)),
        )
        .with_state(services)
}
