//! Host option table: named JSON values, the gate settings among them.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use gatehouse_auth::{Settings, SettingsStore, StoredSettings, settings::SETTINGS_KEY};
use gatehouse_core::{GateError, GateResult};

use crate::store::{InMemoryKvStore, KvStore};

/// Option table backed by a [`KvStore`].
#[derive(Clone)]
pub struct OptionTable {
    store: Arc<dyn KvStore<String, Value>>,
}

impl OptionTable {
    pub fn new(store: Arc<dyn KvStore<String, Value>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKvStore::<String, Value>::new()))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(&key.to_string())
    }

    pub fn set(&self, key: &str, value: Value) {
        self.store.upsert(key.to_string(), value);
    }

    pub fn add(&self, key: &str, value: Value) -> bool {
        self.store.insert_if_absent(key.to_string(), value)
    }

    /// The raw stored settings object (defaults when nothing is stored).
    pub fn stored_settings(&self) -> GateResult<StoredSettings> {
        match self.get(SETTINGS_KEY) {
            Some(value) => StoredSettings::from_json(&value),
            None => Ok(StoredSettings::default()),
        }
    }
}

impl SettingsStore for OptionTable {
    fn load(&self) -> GateResult<Settings> {
        let stored = self.stored_settings()?;
        Ok(Settings::from(&stored))
    }

    fn save(&self, settings: StoredSettings) -> GateResult<()> {
        self.set(SETTINGS_KEY, settings.to_json());
        Ok(())
    }

    fn add_if_absent(&self, settings: StoredSettings) -> GateResult<bool> {
        Ok(self.add(SETTINGS_KEY, settings.to_json()))
    }
}

/// Activation: seed default settings without clobbering an existing install.
pub fn activate(store: &dyn SettingsStore) -> GateResult<bool> {
    let written = store.add_if_absent(StoredSettings::activation_defaults())?;
    if written {
        tracing::info!(key = SETTINGS_KEY, "default gate settings written");
    } else {
        tracing::debug!(key = SETTINGS_KEY, "gate settings already present; activation left them untouched");
    }
    Ok(written)
}

/// Seed the option table from a JSON document of `{ "<option>": <value> }`.
pub fn import_options(table: &OptionTable, document: &Value) -> GateResult<usize> {
    let Some(entries) = document.as_object() else {
        return Err(GateError::invalid_settings("options document must be a JSON object"));
    };
    for (key, value) in entries {
        table.set(key, value.clone());
    }
    Ok(entries.len())
}

/// Read a JSON document from disk.
pub fn read_json_file(path: &Path) -> GateResult<Value> {
    let raw = std::fs::read_to_string(path).map_err(|e| GateError::store(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| GateError::store(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_auth::YesNo;
    use gatehouse_core::ResourceId;
    use serde_json::json;

    #[test]
    fn empty_table_loads_defaults() {
        let table = OptionTable::in_memory();
        assert_eq!(table.load().unwrap(), Settings::default());
    }

    #[test]
    fn activation_writes_defaults_once() {
        let table = OptionTable::in_memory();
        assert!(activate(&table).unwrap());
        assert_eq!(
            table.get(SETTINGS_KEY).unwrap(),
            json!({
                "login_page_id": 0,
                "force_checkout_login": "no",
                "force_shop_login": "no",
                "force_product_login": "no",
            })
        );
        assert!(!activate(&table).unwrap());
    }

    #[test]
    fn activation_keeps_existing_settings() {
        let table = OptionTable::in_memory();
        table
            .save(StoredSettings {
                login_page_id: 7,
                force_checkout_login: YesNo::Yes,
                ..StoredSettings::default()
            })
            .unwrap();

        assert!(!activate(&table).unwrap());

        let settings = table.load().unwrap();
        assert_eq!(settings.login_page_id, ResourceId::new(7));
        assert!(settings.force_checkout_login);
    }

    #[test]
    fn corrupt_settings_surface_as_error() {
        let table = OptionTable::in_memory();
        table.set(SETTINGS_KEY, json!([1, 2, 3]));
        assert!(matches!(table.load(), Err(GateError::InvalidSettings(_))));
    }

    #[test]
    fn import_rejects_non_objects() {
        let table = OptionTable::in_memory();
        assert!(import_options(&table, &json!("x")).is_err());
        assert_eq!(
            import_options(&table, &json!({ SETTINGS_KEY: { "force_shop_login": "yes" } })).unwrap(),
            1
        );
        assert!(table.load().unwrap().force_shop_login);
    }
}
