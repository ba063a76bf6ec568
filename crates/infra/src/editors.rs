use std::sync::Arc;

use gatehouse_auth::EditPermissions;
use gatehouse_core::{ResourceId, UserId};

use crate::store::{InMemoryKvStore, KvStore};

/// Users allowed to edit content (site-wide edit capability).
#[derive(Clone)]
pub struct EditorRegistry {
    editors: Arc<dyn KvStore<UserId, ()>>,
}

impl EditorRegistry {
    pub fn new(editors: Arc<dyn KvStore<UserId, ()>>) -> Self {
        Self { editors }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKvStore::<UserId, ()>::new()))
    }

    pub fn grant(&self, user: UserId) {
        self.editors.upsert(user, ());
    }

    pub fn revoke(&self, user: UserId) {
        self.editors.remove(&user);
    }

    pub fn is_editor(&self, user: UserId) -> bool {
        self.editors.get(&user).is_some()
    }
}

impl EditPermissions for EditorRegistry {
    fn can_edit(&self, user: UserId, _resource: ResourceId) -> bool {
        self.is_editor(user)
    }
}
