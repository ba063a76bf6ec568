//! Per-resource metadata, including the force-login flag.

use std::sync::Arc;

use gatehouse_auth::{ForceLoginFlags, YesNo};
use gatehouse_core::ResourceId;

use crate::store::{InMemoryKvStore, KvStore};

/// Metadata key holding the force-login flag (`"yes"` / `"no"`).
pub const FORCE_LOGIN_META: &str = "_gatehouse_force_login";

/// Resource metadata keyed by `(resource, meta key)`.
#[derive(Clone)]
pub struct ResourceMeta {
    store: Arc<dyn KvStore<(ResourceId, String), String>>,
}

impl ResourceMeta {
    pub fn new(store: Arc<dyn KvStore<(ResourceId, String), String>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKvStore::<(ResourceId, String), String>::new()))
    }

    pub fn get(&self, id: ResourceId, key: &str) -> Option<String> {
        self.store.get(&(id, key.to_string()))
    }

    pub fn set(&self, id: ResourceId, key: &str, value: impl Into<String>) {
        self.store.upsert((id, key.to_string()), value.into());
    }
}

impl ForceLoginFlags for ResourceMeta {
    fn get_flag(&self, id: ResourceId) -> bool {
        YesNo::from_submitted(self.get(id, FORCE_LOGIN_META).as_deref()).as_bool()
    }

    fn set_flag(&self, id: ResourceId, value: bool) {
        self.set(id, FORCE_LOGIN_META, YesNo::from(value).as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ResourceId {
        ResourceId::new(raw).unwrap()
    }

    #[test]
    fn unset_flag_reads_false() {
        assert!(!ResourceMeta::in_memory().get_flag(id(1)));
    }

    #[test]
    fn flag_is_stored_as_yes_no() {
        let meta = ResourceMeta::in_memory();
        meta.set_flag(id(1), true);
        assert_eq!(meta.get(id(1), FORCE_LOGIN_META).as_deref(), Some("yes"));
        assert!(meta.get_flag(id(1)));

        meta.set_flag(id(1), false);
        assert_eq!(meta.get(id(1), FORCE_LOGIN_META).as_deref(), Some("no"));
        assert!(!meta.get_flag(id(1)));
    }

    #[test]
    fn only_exact_yes_counts() {
        let meta = ResourceMeta::in_memory();
        meta.set(id(2), FORCE_LOGIN_META, "1");
        assert!(!meta.get_flag(id(2)));
    }
}
