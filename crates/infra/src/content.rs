//! Content directory: pages, products and the commerce page assignments.
//!
//! Serves both the gate's metadata ports and the host adapter's view
//! resolution (slug lookups).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use gatehouse_auth::{CommercePages, ResourceDirectory};
use gatehouse_core::{GateError, GateResult, ResourceId, ResourceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Page,
    Post,
    Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ResourceId,
    pub slug: String,
    pub title: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub body: String,
}

/// Pages the commerce extension owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercePageIds {
    #[serde(default)]
    pub account: Option<ResourceId>,
    #[serde(default)]
    pub checkout: Option<ResourceId>,
    #[serde(default)]
    pub shop: Option<ResourceId>,
}

/// Site content as loaded from a seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSeed {
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub commerce: CommercePageIds,
    #[serde(default)]
    pub product_categories: Vec<String>,
    /// Resources whose force-login flag starts out set.
    #[serde(default)]
    pub forced: Vec<ResourceId>,
}

impl SiteSeed {
    pub fn from_json(value: serde_json::Value) -> GateResult<Self> {
        serde_json::from_value(value).map_err(|e| GateError::store(format!("site seed: {e}")))
    }

    /// A small shop: home, about, members area, login page, the three
    /// commerce pages and a couple of products.
    pub fn demo() -> Self {
        let pages = [
            (2, "home", "Home"),
            (3, "about", "About"),
            (4, "members", "Members"),
            (5, "login", "Log in or register"),
            (6, "shop", "Shop"),
            (7, "checkout", "Checkout"),
            (8, "my-account", "My account"),
        ]
        .map(|entry| (entry, ContentKind::Page));
        let products = [(100, "mug", "Mug"), (101, "t-shirt", "T-shirt")].map(|entry| (entry, ContentKind::Product));

        let items = pages
            .into_iter()
            .chain(products)
            .filter_map(|((id, slug, title), kind)| {
                Some(ContentItem {
                    id: ResourceId::new(id)?,
                    slug: slug.to_string(),
                    title: title.to_string(),
                    kind,
                    status: ResourceStatus::Published,
                    body: String::new(),
                })
            })
            .collect();

        Self {
            items,
            commerce: CommercePageIds {
                account: ResourceId::new(8),
                checkout: ResourceId::new(7),
                shop: ResourceId::new(6),
            },
            product_categories: vec!["kitchen".to_string(), "clothing".to_string()],
            forced: ResourceId::new(4).into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentDirectory {
    base_url: String,
    items: HashMap<ResourceId, ContentItem>,
    commerce: CommercePageIds,
    categories: HashSet<String>,
}

impl ContentDirectory {
    pub fn from_seed(base_url: &str, seed: &SiteSeed) -> GateResult<Self> {
        let mut items = HashMap::with_capacity(seed.items.len());
        for item in &seed.items {
            if item.id.get() == 0 {
                return Err(GateError::invalid_id(format!("content item '{}' has id 0", item.slug)));
            }
            if items.insert(item.id, item.clone()).is_some() {
                return Err(GateError::invalid_id(format!("duplicate content id {}", item.id)));
            }
        }

        for (role, id) in [
            ("account", seed.commerce.account),
            ("checkout", seed.commerce.checkout),
            ("shop", seed.commerce.shop),
        ] {
            if let Some(id) = id.filter(|id| !items.contains_key(id)) {
                tracing::warn!(role, %id, "commerce page assignment points at unknown content");
            }
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            items,
            commerce: seed.commerce,
            categories: seed.product_categories.iter().cloned().collect(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn commerce(&self) -> CommercePageIds {
        self.commerce
    }

    pub fn get(&self, id: ResourceId) -> Option<&ContentItem> {
        self.items.get(&id)
    }

    pub fn find(&self, kind: ContentKind, slug: &str) -> Option<&ContentItem> {
        self.items
            .values()
            .find(|item| item.kind == kind && item.slug == slug)
    }

    /// Pages and posts share the top-level slug namespace.
    pub fn find_top_level(&self, slug: &str) -> Option<&ContentItem> {
        self.find(ContentKind::Page, slug)
            .or_else(|| self.find(ContentKind::Post, slug))
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.categories.contains(slug)
    }

    /// Absolute URL of `path` on this site.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn path_of(&self, item: &ContentItem) -> String {
        match item.kind {
            ContentKind::Product => format!("/product/{}/", item.slug),
            ContentKind::Page | ContentKind::Post => format!("/{}/", item.slug),
        }
    }
}

impl ResourceDirectory for ContentDirectory {
    fn status(&self, id: ResourceId) -> Option<ResourceStatus> {
        self.get(id).map(|item| item.status)
    }

    fn permalink(&self, id: ResourceId) -> Option<String> {
        self.get(id).map(|item| self.url_for(&self.path_of(item)))
    }
}

impl CommercePages for ContentDirectory {
    fn account_page_id(&self) -> Option<ResourceId> {
        self.commerce.account
    }
}
