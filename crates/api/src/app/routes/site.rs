use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use gatehouse_auth::Settings;

use crate::app::dto::view_to_dto;
use crate::app::errors;
use crate::app::routes::{settings_for, system::rewrite_login_link};
use crate::app::services::AppServices;
use crate::context::ResolvedView;

/// Render whatever view resolution attached; `404` when nothing matched.
pub async fn render_view(
    State(services): State<Arc<AppServices>>,
    settings: Option<Extension<Settings>>,
    view: Option<Extension<ResolvedView>>,
) -> Response {
    let Some(Extension(view)) = view else {
        return errors::not_found();
    };

    let login_url = rewrite_login_link(
        &services,
        settings_for(&services, settings),
        Some(&view.current_url),
        false,
        view.resource_id(),
    );
    Json(view_to_dto(&view, login_url)).into_response()
}
