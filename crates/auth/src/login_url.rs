//! Login destination resolution.
//!
//! Two entry points share the same inputs:
//! - [`effective_login_url`] picks the redirect target for the gate checks;
//! - [`resolve_login_url`] rewrites any login link the host renders.

use url::{Url, form_urlencoded};

use gatehouse_core::ResourceId;

use crate::ports::{CommercePages, ResourceDirectory};
use crate::settings::Settings;

/// Query parameter carrying the return path.
pub const REDIRECT_TO_PARAM: &str = "redirect_to";

/// Where a redirect decision should send the visitor.
///
/// The explicit page wins when it exists and is published; otherwise the
/// commerce account page; otherwise `None`, which callers treat as "fail open".
pub fn effective_login_url(
    settings: &Settings,
    directory: &dyn ResourceDirectory,
    commerce: &dyn CommercePages,
) -> Option<String> {
    let explicit = published_login_page(settings, directory)
        .and_then(|id| directory.permalink(id))
        .filter(|url| !url.is_empty());

    explicit.or_else(|| {
        commerce
            .account_page_id()
            .and_then(|id| directory.permalink(id))
            .filter(|url| !url.is_empty())
    })
}

/// A request to render a login link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginUrlRequest {
    /// The login URL the host would have used.
    pub requested_url: String,
    /// Where to send the visitor after logging in.
    pub return_path: Option<String>,
    /// Accepted from the host but not carried into the rewritten URL.
    pub force_reauth: bool,
}

impl LoginUrlRequest {
    pub fn new(requested_url: impl Into<String>) -> Self {
        Self {
            requested_url: requested_url.into(),
            ..Default::default()
        }
    }

    pub fn returning_to(mut self, path: impl Into<String>) -> Self {
        self.return_path = Some(path.into());
        self
    }
}

/// Rewrite a host login URL so it points at the configured login page.
///
/// Returns `requested_url` untouched when no login page can be determined,
/// when that page is not published, or when the visitor is already on it.
pub fn resolve_login_url(
    request: &LoginUrlRequest,
    current_view: Option<ResourceId>,
    settings: &Settings,
    directory: &dyn ResourceDirectory,
    commerce: &dyn CommercePages,
) -> String {
    let Some(page) = settings.login_page_id.or_else(|| commerce.account_page_id()) else {
        return request.requested_url.clone();
    };

    if !is_published(directory, page) || current_view == Some(page) {
        return request.requested_url.clone();
    }

    let Some(permalink) = directory.permalink(page).filter(|url| !url.is_empty()) else {
        return request.requested_url.clone();
    };

    match request.return_path.as_deref().filter(|p| !p.is_empty()) {
        Some(return_path) => with_redirect_to(&permalink, return_path),
        None => permalink,
    }
}

/// Set `redirect_to` on `base`, replacing any existing value.
pub fn with_redirect_to(base: &str, return_path: &str) -> String {
    let Ok(mut url) = Url::parse(base) else {
        let encoded: String = form_urlencoded::byte_serialize(return_path.as_bytes()).collect();
        let sep = if base.contains('?') { '&' } else { '?' };
        return format!("{base}{sep}{REDIRECT_TO_PARAM}={encoded}");
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != REDIRECT_TO_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        query.append_pair(REDIRECT_TO_PARAM, return_path);
    }

    url.to_string()
}

/// The explicit login page, if configured and published.
pub fn published_login_page(settings: &Settings, directory: &dyn ResourceDirectory) -> Option<ResourceId> {
    settings.login_page_id.filter(|id| is_published(directory, *id))
}

fn is_published(directory: &dyn ResourceDirectory, id: ResourceId) -> bool {
    directory.status(id).is_some_and(|s| s.is_published())
}
