//! Access decision engine.
//!
//! Two checks run at two points of the host's request lifecycle:
//! - [`check_raw_endpoint`] before routing, against the raw path (login and
//!   admin endpoints);
//! - [`check_resolved_view`] after the host resolved which resource answers
//!   the request (flagged pages, account page, commerce views).
//!
//! Both are pure over their inputs. A `RedirectTo` is terminal for the
//! request; the engine itself never performs IO beyond reading its ports.

use gatehouse_core::ResourceId;

use crate::context::{RawRequest, ViewContext};
use crate::decision::{AllowReason, Decision, Restriction};
use crate::login_url::{
    LoginUrlRequest, REDIRECT_TO_PARAM, effective_login_url, published_login_page, resolve_login_url,
    with_redirect_to,
};
use crate::ports::{CommercePages, ForceLoginFlags, ResourceDirectory};
use crate::settings::Settings;

/// Actions on the login endpoint that must keep working for anonymous
/// visitors (logout and password recovery).
pub const EXEMPT_ACTIONS: [&str; 5] = ["logout", "lostpassword", "rp", "resetpass", "postpass"];

/// Path fragments identifying the host's login and admin endpoints.
///
/// Matching is by substring of the request path, so installs living under a
/// sub-directory (`/blog/wp-admin/`) are covered too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPatterns {
    pub login: String,
    pub admin: String,
    pub ajax: String,
}

impl Default for EndpointPatterns {
    fn default() -> Self {
        Self {
            login: "/wp-login.php".to_string(),
            admin: "/wp-admin".to_string(),
            ajax: "/admin-ajax.php".to_string(),
        }
    }
}

impl EndpointPatterns {
    pub fn is_login(&self, path: &str) -> bool {
        path.contains(self.login.as_str())
    }

    pub fn is_admin(&self, path: &str) -> bool {
        path.contains(self.admin.as_str())
    }

    pub fn is_ajax(&self, path: &str) -> bool {
        path.contains(self.ajax.as_str())
    }
}

/// Capability invoked by the host's request pipeline at its two extension
/// points.
pub trait RequestInterceptor {
    /// Early hook, before routing.
    fn on_raw_request(&self, request: &RawRequest) -> Decision;

    /// Late hook, once the resource answering the request is known.
    fn on_resolved_view(&self, view: &ViewContext) -> Decision;
}

/// Capability invoked wherever the host renders a login link.
pub trait UrlRewriter {
    fn rewrite_login_url(&self, request: &LoginUrlRequest, current_view: Option<ResourceId>) -> String;
}

/// The gate for a single request: settings read once, plus its ports.
#[derive(Clone, Copy)]
pub struct Gate<'a> {
    pub settings: &'a Settings,
    pub endpoints: &'a EndpointPatterns,
    pub directory: &'a dyn ResourceDirectory,
    pub commerce: &'a dyn CommercePages,
    pub flags: &'a dyn ForceLoginFlags,
}

impl RequestInterceptor for Gate<'_> {
    fn on_raw_request(&self, request: &RawRequest) -> Decision {
        check_raw_endpoint(request, self.settings, self.endpoints, self.directory, self.commerce)
    }

    fn on_resolved_view(&self, view: &ViewContext) -> Decision {
        check_resolved_view(view, self.settings, self.directory, self.commerce, self.flags)
    }
}

impl UrlRewriter for Gate<'_> {
    fn rewrite_login_url(&self, request: &LoginUrlRequest, current_view: Option<ResourceId>) -> String {
        resolve_login_url(request, current_view, self.settings, self.directory, self.commerce)
    }
}

/// Check A: anonymous access to the login endpoint or the admin area.
pub fn check_raw_endpoint(
    request: &RawRequest,
    settings: &Settings,
    endpoints: &EndpointPatterns,
    directory: &dyn ResourceDirectory,
    commerce: &dyn CommercePages,
) -> Decision {
    if request.authenticated {
        return Decision::Allow(AllowReason::Authenticated);
    }

    let path = request.path.as_str();
    if !endpoints.is_login(path) && !endpoints.is_admin(path) {
        return Decision::Allow(AllowReason::NotApplicable);
    }

    if endpoints.is_ajax(path) {
        return Decision::Allow(AllowReason::AjaxEndpoint);
    }

    let action = request.action();
    if EXEMPT_ACTIONS.contains(&action) {
        tracing::debug!(path, action, "exempt action on login endpoint");
        return Decision::Allow(AllowReason::ExemptAction);
    }

    let Some(login_url) = effective_login_url(settings, directory, commerce) else {
        tracing::warn!(path, "no login destination resolvable; allowing endpoint access");
        return Decision::Allow(AllowReason::UnresolvableDestination);
    };

    let target = match request.param(REDIRECT_TO_PARAM) {
        Some(return_path) => with_redirect_to(&login_url, return_path),
        None => login_url,
    };

    tracing::info!(path, target = %target, "redirecting anonymous endpoint access to login page");
    Decision::RedirectTo(target)
}

/// Check B: restricted views once the resource is resolved.
pub fn check_resolved_view(
    view: &ViewContext,
    settings: &Settings,
    directory: &dyn ResourceDirectory,
    commerce: &dyn CommercePages,
    flags: &dyn ForceLoginFlags,
) -> Decision {
    if view.authenticated {
        return Decision::Allow(AllowReason::Authenticated);
    }

    let account_page = commerce.account_page_id();
    let login_page = published_login_page(settings, directory);
    if is_login_view(view, login_page) {
        return Decision::Allow(AllowReason::LoginPage);
    }

    let Some(restriction) = restriction_for(view, settings, login_page, account_page, flags) else {
        return Decision::Allow(AllowReason::Unrestricted);
    };

    let Some(login_url) = effective_login_url(settings, directory, commerce) else {
        tracing::warn!(
            url = %view.current_url,
            %restriction,
            "restricted view but no login destination resolvable; allowing"
        );
        return Decision::Allow(AllowReason::UnresolvableDestination);
    };

    let target = with_redirect_to(&login_url, &view.current_url);
    tracing::info!(url = %view.current_url, %restriction, target = %target, "login required");
    Decision::RedirectTo(target)
}

/// The login destination must never redirect to itself. An explicit page
/// that is not published is no destination; the account page stands in.
fn is_login_view(view: &ViewContext, login_page: Option<ResourceId>) -> bool {
    match login_page {
        Some(page) => view.is_resource(page),
        None => view.classification.account_page,
    }
}

/// First matching restriction rule, in evaluation order.
fn restriction_for(
    view: &ViewContext,
    settings: &Settings,
    login_page: Option<ResourceId>,
    account_page: Option<ResourceId>,
    flags: &dyn ForceLoginFlags,
) -> Option<Restriction> {
    let class = &view.classification;

    let custom_login_elsewhere = login_page.is_some_and(|page| Some(page) != account_page);
    if custom_login_elsewhere && class.account_page {
        return Some(Restriction::AccountPage);
    }

    if class.singular && view.resource_id.is_some_and(|id| flags.get_flag(id)) {
        return Some(Restriction::ForcedResource);
    }

    if settings.force_checkout_login && class.checkout {
        return Some(Restriction::Checkout);
    }

    if settings.force_shop_login && (class.shop || class.product_taxonomy) {
        return Some(Restriction::Shop);
    }

    if settings.force_product_login && class.product {
        return Some(Restriction::Product);
    }

    None
}
