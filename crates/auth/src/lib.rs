//! `gatehouse-auth`: the "must be authenticated" gate.
//!
//! Decides whether a request must log in first and where to send it, and
//! rewrites login links to the configured destination. Decoupled from HTTP
//! and storage: the host supplies request context and port implementations.

pub mod context;
pub mod decision;
pub mod engine;
pub mod force_flag;
pub mod login_url;
pub mod ports;
pub mod settings;

#[cfg(test)]
mod testing;

pub use context::{RawRequest, ViewClassification, ViewContext};
pub use decision::{AllowReason, Decision, Restriction};
pub use engine::{
    EXEMPT_ACTIONS, EndpointPatterns, Gate, RequestInterceptor, UrlRewriter, check_raw_endpoint,
    check_resolved_view,
};
pub use force_flag::{DenialKind, FlagUpdate, FlagWriteOutcome, SAVE_FLAG_ACTION, save_force_login_flag};
pub use login_url::{
    LoginUrlRequest, REDIRECT_TO_PARAM, effective_login_url, published_login_page, resolve_login_url,
};
pub use ports::{
    CommercePages, EditPermissions, ForceLoginFlags, NonceVerifier, ResourceDirectory, Session,
    SessionProvider, SettingsStore,
};
pub use settings::{Settings, StoredSettings, YesNo, sanitize_settings};
