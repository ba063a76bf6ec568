//! Per-request inputs to the gate.
//!
//! Both values are built once by the host adapter and never mutated.

use gatehouse_core::ResourceId;

/// Input to the early, pre-routing check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRequest {
    /// Request path, without scheme, host or query.
    pub path: String,
    /// Decoded parameters in request order: posted form pairs, then the
    /// query string.
    pub query: Vec<(String, String)>,
    pub authenticated: bool,
}

impl RawRequest {
    pub fn new(path: impl Into<String>, authenticated: bool) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            authenticated,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// First value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `action` parameter, defaulting to `login` like the host's login
    /// endpoint does.
    pub fn action(&self) -> &str {
        self.param("action").unwrap_or("login")
    }
}

/// Classification of the resolved view, supplied by the host / commerce
/// extension and treated as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewClassification {
    pub account_page: bool,
    pub checkout: bool,
    pub shop: bool,
    pub product_taxonomy: bool,
    pub product: bool,
    /// A single content item (page, post, product) rather than an archive.
    pub singular: bool,
}

/// Input to the late, post-resolution check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    /// Absolute URL of the current request, used as the return path.
    pub current_url: String,
    pub resource_id: Option<ResourceId>,
    pub classification: ViewClassification,
    pub authenticated: bool,
}

impl ViewContext {
    pub fn new(current_url: impl Into<String>, authenticated: bool) -> Self {
        Self {
            current_url: current_url.into(),
            resource_id: None,
            classification: ViewClassification::default(),
            authenticated,
        }
    }

    pub fn resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn classified(mut self, classification: ViewClassification) -> Self {
        self.classification = classification;
        self
    }

    /// Whether the resolved view is exactly `id`.
    pub fn is_resource(&self, id: ResourceId) -> bool {
        self.resource_id == Some(id)
    }
}
