use serde::{Deserialize, Serialize};

use gatehouse_auth::{FlagWriteOutcome, StoredSettings, ViewClassification};
use gatehouse_core::{ResourceId, ResourceStatus, UserId};
use gatehouse_infra::ContentKind;

use crate::context::ResolvedView;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct LoginUrlQuery {
    pub redirect_to: Option<String>,
    /// `"1"` / `"true"` ask for re-authentication.
    pub reauth: Option<String>,
    /// Resource the link is rendered on, if any.
    pub current: Option<String>,
}

impl LoginUrlQuery {
    pub fn force_reauth(&self) -> bool {
        matches!(self.reauth.as_deref(), Some("1" | "true"))
    }

    pub fn current_view(&self) -> Option<ResourceId> {
        self.current.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// The per-resource editor form.
#[derive(Debug, Default, Deserialize)]
pub struct ForceLoginForm {
    #[serde(default)]
    pub nonce: Option<String>,
    /// Checkbox: present as `"yes"` when ticked.
    #[serde(default)]
    pub force_login: Option<String>,
    #[serde(default)]
    pub autosave: Option<String>,
}

impl ForceLoginForm {
    pub fn is_autosave(&self) -> bool {
        matches!(self.autosave.as_deref(), Some("1" | "true" | "yes"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginEndpointQuery {
    pub action: Option<String>,
    pub redirect_to: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginUrlResponse {
    pub login_url: String,
}

#[derive(Debug, Serialize)]
pub struct NonceResponse {
    pub resource_id: ResourceId,
    pub action: &'static str,
    pub nonce: String,
}

#[derive(Debug, Serialize)]
pub struct FlagResponse {
    pub resource_id: ResourceId,
    pub outcome: FlagWriteOutcome,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: StoredSettings,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_id: UserId,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub url: String,
    pub resource_id: Option<ResourceId>,
    pub title: Option<String>,
    pub kind: Option<ContentKind>,
    pub status: Option<ResourceStatus>,
    pub category: Option<String>,
    pub classification: ClassificationDto,
    /// Login link as rendered on this view.
    pub login_url: String,
}

#[derive(Debug, Serialize)]
pub struct ClassificationDto {
    pub account_page: bool,
    pub checkout: bool,
    pub shop: bool,
    pub product_taxonomy: bool,
    pub product: bool,
    pub singular: bool,
}

impl From<ViewClassification> for ClassificationDto {
    fn from(c: ViewClassification) -> Self {
        Self {
            account_page: c.account_page,
            checkout: c.checkout,
            shop: c.shop,
            product_taxonomy: c.product_taxonomy,
            product: c.product,
            singular: c.singular,
        }
    }
}

pub fn view_to_dto(view: &ResolvedView, login_url: String) -> ViewResponse {
    ViewResponse {
        url: view.current_url.clone(),
        resource_id: view.resource_id(),
        title: view.item.as_ref().map(|item| item.title.clone()),
        kind: view.item.as_ref().map(|item| item.kind),
        status: view.item.as_ref().map(|item| item.status),
        category: view.category.clone(),
        classification: view.classification.into(),
        login_url,
    }
}
