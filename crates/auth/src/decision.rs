use serde::Serialize;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    /// Let the request continue unmodified.
    Allow(AllowReason),
    /// Terminate the request with a redirect to this absolute URL.
    RedirectTo(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::RedirectTo(url) => Some(url),
            Decision::Allow(_) => None,
        }
    }
}

/// Why a request was allowed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    Authenticated,
    /// The check does not apply to this request.
    NotApplicable,
    /// Background admin AJAX endpoint.
    AjaxEndpoint,
    /// Logout / password-recovery action.
    ExemptAction,
    /// The request is for the login destination itself.
    LoginPage,
    /// No restriction rule matched.
    Unrestricted,
    /// Restricted, but no login destination could be resolved (fail open).
    UnresolvableDestination,
}

/// Which rule restricted a resolved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Restriction {
    /// Commerce account page while a separate custom login page is configured.
    AccountPage,
    /// Per-resource force-login flag.
    ForcedResource,
    Checkout,
    Shop,
    Product,
}

impl core::fmt::Display for Restriction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Restriction::AccountPage => "account_page",
            Restriction::ForcedResource => "forced_resource",
            Restriction::Checkout => "checkout",
            Restriction::Shop => "shop",
            Restriction::Product => "product",
        };
        f.write_str(s)
    }
}
