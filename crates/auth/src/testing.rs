//! In-crate fakes for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use gatehouse_core::{ResourceId, ResourceStatus, UserId};

use crate::ports::{CommercePages, EditPermissions, ForceLoginFlags, NonceVerifier, ResourceDirectory};

pub const BASE: &str = "https://shop.test";

pub fn id(raw: u64) -> ResourceId {
    ResourceId::new(raw).unwrap()
}

#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<ResourceId, (String, ResourceStatus)>,
    account: Option<ResourceId>,
    flags: Mutex<HashMap<ResourceId, bool>>,
    nonces: HashSet<(String, String, UserId)>,
    editors: HashSet<UserId>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, raw: u64, slug: &str, status: ResourceStatus) -> Self {
        self.pages.insert(id(raw), (slug.to_string(), status));
        self
    }

    /// Registers a published "my-account" page and marks it as the commerce
    /// account page.
    pub fn account(self, raw: u64) -> Self {
        let mut site = self.page(raw, "my-account", ResourceStatus::Published);
        site.account = Some(id(raw));
        site
    }

    pub fn forced(self, raw: u64) -> Self {
        self.flags.lock().unwrap().insert(id(raw), true);
        self
    }

    pub fn nonce(mut self, token: &str, action: &str, user: UserId) -> Self {
        self.nonces.insert((token.to_string(), action.to_string(), user));
        self
    }

    pub fn editor(mut self, user: UserId) -> Self {
        self.editors.insert(user);
        self
    }
}

impl ResourceDirectory for FakeSite {
    fn status(&self, id: ResourceId) -> Option<ResourceStatus> {
        self.pages.get(&id).map(|(_, status)| *status)
    }

    fn permalink(&self, id: ResourceId) -> Option<String> {
        self.pages.get(&id).map(|(slug, _)| format!("{BASE}/{slug}/"))
    }
}

impl CommercePages for FakeSite {
    fn account_page_id(&self) -> Option<ResourceId> {
        self.account
    }
}

impl ForceLoginFlags for FakeSite {
    fn get_flag(&self, id: ResourceId) -> bool {
        self.flags.lock().unwrap().get(&id).copied().unwrap_or(false)
    }

    fn set_flag(&self, id: ResourceId, value: bool) {
        self.flags.lock().unwrap().insert(id, value);
    }
}

impl NonceVerifier for FakeSite {
    fn verify(&self, token: &str, action: &str, user: UserId, _now: DateTime<Utc>) -> bool {
        self.nonces
            .contains(&(token.to_string(), action.to_string(), user))
    }
}

impl EditPermissions for FakeSite {
    fn can_edit(&self, user: UserId, _resource: ResourceId) -> bool {
        self.editors.contains(&user)
    }
}
