use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{any, get, post},
};

use gatehouse_auth::Settings;

use crate::app::services::AppServices;

pub mod admin;
pub mod site;
pub mod system;

/// Host login endpoint path, relative to the site root.
pub const LOGIN_ENDPOINT: &str = "/wp-login.php";

/// Every routed endpoint; site content is served by the fallback in
/// [`site`].
pub fn router() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/login-url", get(system::login_url))
        .route(LOGIN_ENDPOINT, get(system::login_endpoint).post(system::login_endpoint))
        .route("/wp-admin", get(admin::dashboard))
        .route("/wp-admin/", get(admin::dashboard))
        .route("/wp-admin/admin-ajax.php", any(admin::ajax))
        .route("/wp-admin/settings", get(admin::get_settings).post(admin::save_settings))
        .route("/wp-admin/nonce/:resource_id", get(admin::issue_nonce))
        .route("/wp-admin/resources/:resource_id/force-login", post(admin::save_force_login))
}

/// Settings attached by the early check; re-read if it stood aside.
pub(crate) fn settings_for(services: &AppServices, attached: Option<Extension<Settings>>) -> Option<Settings> {
    attached.map(|Extension(settings)| settings).or_else(|| services.settings())
}
