use gatehouse_auth::{Session, ViewClassification};
use gatehouse_core::{ResourceId, UserId};
use gatehouse_infra::ContentItem;

/// Session context for a request; anonymous when no valid session was
/// presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
    token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, session: Session) -> Self {
        Self {
            session: Some(session),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.session.as_ref().map(|s| s.user_id)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// The content answering a request, as classified by view resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    /// Absolute URL of the request including its query string.
    pub current_url: String,
    /// The single item shown, or the page backing an archive (e.g. shop).
    pub item: Option<ContentItem>,
    pub classification: ViewClassification,
    /// Product category slug for taxonomy archives.
    pub category: Option<String>,
}

impl ResolvedView {
    pub fn resource_id(&self) -> Option<ResourceId> {
        self.item.as_ref().map(|item| item.id)
    }
}
