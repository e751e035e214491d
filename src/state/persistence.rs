//! Persistence store for tool configurations.
//!
//! Records live under `{prefix}-{tool}` (configuration) and
//! `{prefix}-{tool}-history` (generation history). Reads that fail or hold
//! garbage behave like an empty store; writes that fail are logged and
//! dropped. Neither ever reaches the caller.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ScenegenError;
use crate::state::migration::{stamp_version, stored_version, MigrationChain};
use crate::state::reconcile::reconcile;
use crate::state::storage::Storage;

/// Loads and saves versioned records of one storage namespace.
#[derive(Debug, Clone)]
pub struct PersistenceStore<S> {
    storage: S,
    prefix: String,
}

impl<S: Storage> PersistenceStore<S> {
    pub fn new(storage: S, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn config_key(&self, tool_name: &str) -> String {
        format!("{}-{}", self.prefix, tool_name)
    }

    pub fn history_key(&self, tool_name: &str) -> String {
        format!("{}-{}-history", self.prefix, tool_name)
    }

    /// Loads the configuration of `tool_name`.
    ///
    /// - nothing stored: `default`
    /// - stored at `current_version`: `default` overlaid with the stored fields
    /// - stored at an older version: migrated, reconciled and written back;
    ///   `default` (also written back) when the chain cannot complete
    /// - stored at a newer version: `default`, store untouched
    pub fn load<T>(
        &self,
        tool_name: &str,
        default: &T,
        current_version: u32,
        migrations: &MigrationChain,
    ) -> T
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let key = self.config_key(tool_name);
        let Some(stored) = self.read_record(&key) else {
            return default.clone();
        };

        let version = stored_version(&stored);
        if version > current_version {
            warn!(
                "configuration for {} has schema {} but only {} is supported; using defaults",
                tool_name, version, current_version
            );
            return default.clone();
        }

        if version < current_version {
            return match migrations.migrate(stored, version, current_version) {
                Ok(migrated) => {
                    let config = reconcile(default, &migrated);
                    self.save(tool_name, &config, current_version);
                    config
                }
                Err(e) => {
                    warn!(
                        "migration of {} from schema {} to {} failed ({}); using defaults",
                        tool_name, version, current_version, e
                    );
                    self.save(tool_name, default, current_version);
                    default.clone()
                }
            };
        }

        reconcile(default, &stored)
    }

    /// Writes `configuration` stamped with `current_version`.
    pub fn save<T: Serialize>(&self, tool_name: &str, configuration: &T, current_version: u32) {
        let key = self.config_key(tool_name);
        match serde_json::to_value(configuration) {
            Ok(mut record) => {
                stamp_version(&mut record, current_version);
                self.write_record(&key, &record);
            }
            Err(e) => warn!("failed to serialize configuration for {}: {}", tool_name, e),
        }
    }

    /// Parsed record under `key`; `None` when absent or unreadable.
    pub fn read_record(&self, key: &str) -> Option<Value> {
        let raw = match self.storage.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                let err = ScenegenError::StorageRead {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                warn!("{}", err);
                None
            }
        }
    }

    pub fn write_record<V: Serialize + ?Sized>(&self, key: &str, record: &V) {
        let text = match serde_json::to_string(record) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize record {}: {}", key, e);
                return;
            }
        };

        match self.storage.set(key, &text) {
            Ok(()) => debug!("wrote {} ({} bytes)", key, text.len()),
            Err(e) => warn!("{}", e),
        }
    }

    pub fn remove_record(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::state::storage::MemoryStorage;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Grid {
        rows: u32,
        cols: u32,
        has_stripes: bool,
    }

    fn defaults() -> Grid {
        Grid {
            rows: 5,
            cols: 4,
            has_stripes: false,
        }
    }

    fn add_stripes(mut data: Value) -> Result<Value> {
        if let Some(obj) = data.as_object_mut() {
            obj.insert("hasStripes".to_string(), json!(true));
        }
        Ok(data)
    }

    fn reject_record(_data: Value) -> Result<Value> {
        Err(ScenegenError::Generation {
            reason: "unreadable record".to_string(),
        })
    }

    fn store() -> PersistenceStore<MemoryStorage> {
        PersistenceStore::new(MemoryStorage::new(), "excalidraw-tools")
    }

    fn raw(store: &PersistenceStore<MemoryStorage>, key: &str) -> Value {
        serde_json::from_str(&store.storage().get(key).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_keys_are_namespaced() {
        let store = store();
        assert_eq!(store.config_key("table"), "excalidraw-tools-table");
        assert_eq!(store.history_key("table"), "excalidraw-tools-table-history");
    }

    #[test]
    fn test_absent_record_gives_defaults() {
        let store = store();
        let loaded = store.load("grid", &defaults(), 1, &MigrationChain::new());
        assert_eq!(loaded, defaults());
    }

    #[test]
    fn test_save_then_load() {
        let store = store();
        let config = Grid {
            rows: 2,
            ..defaults()
        };
        store.save("grid", &config, 1);

        assert_eq!(raw(&store, "excalidraw-tools-grid")["schemaVersion"], json!(1));
        assert_eq!(store.load("grid", &defaults(), 1, &MigrationChain::new()), config);
    }

    #[test]
    fn test_missing_fields_filled_from_defaults() {
        let store = store();
        store
            .storage()
            .set("excalidraw-tools-grid", r#"{"rows":3,"schemaVersion":1}"#)
            .unwrap();

        let loaded = store.load("grid", &defaults(), 1, &MigrationChain::new());
        assert_eq!(
            loaded,
            Grid {
                rows: 3,
                cols: 4,
                has_stripes: false
            }
        );
    }

    #[test]
    fn test_older_record_is_migrated_and_written_back() {
        let store = store();
        store
            .storage()
            .set("excalidraw-tools-grid", r#"{"rows":7,"cols":1}"#)
            .unwrap();
        let chain = MigrationChain::new().with_step(1, add_stripes);

        let loaded = store.load("grid", &defaults(), 2, &chain);
        assert_eq!(
            loaded,
            Grid {
                rows: 7,
                cols: 1,
                has_stripes: true
            }
        );

        let written = raw(&store, "excalidraw-tools-grid");
        assert_eq!(written["schemaVersion"], json!(2));
        assert_eq!(written["hasStripes"], json!(true));
    }

    #[test]
    fn test_incomplete_chain_yields_exact_defaults() {
        let store = store();
        store
            .storage()
            .set("excalidraw-tools-grid", r#"{"rows":7,"cols":1,"schemaVersion":1}"#)
            .unwrap();
        // 1 -> 2 registered, 2 -> 3 missing
        let chain = MigrationChain::new().with_step(1, add_stripes);

        let loaded = store.load("grid", &defaults(), 3, &chain);
        assert_eq!(loaded, defaults());
        assert_eq!(raw(&store, "excalidraw-tools-grid")["schemaVersion"], json!(3));
    }

    #[test]
    fn test_failing_step_yields_exact_defaults() {
        let store = store();
        store
            .storage()
            .set("excalidraw-tools-grid", r#"{"rows":7,"cols":1,"schemaVersion":1}"#)
            .unwrap();
        // 1 -> 2 succeeds, 2 -> 3 fails
        let chain = MigrationChain::new()
            .with_step(1, add_stripes)
            .with_step(2, reject_record);

        let loaded = store.load("grid", &defaults(), 3, &chain);
        assert_eq!(loaded, defaults());

        let written = raw(&store, "excalidraw-tools-grid");
        assert_eq!(written["schemaVersion"], json!(3));
        assert_eq!(written["rows"], json!(5));
        assert_eq!(written["hasStripes"], json!(false));
    }

    #[test]
    fn test_newer_record_is_left_alone() {
        let store = store();
        let stored = r#"{"rows":7,"schemaVersion":9}"#;
        store.storage().set("excalidraw-tools-grid", stored).unwrap();

        let loaded = store.load("grid", &defaults(), 1, &MigrationChain::new());
        assert_eq!(loaded, defaults());
        assert_eq!(store.storage().get("excalidraw-tools-grid").unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_corrupt_record_gives_defaults() {
        let store = store();
        store.storage().set("excalidraw-tools-grid", "{not json").unwrap();
        assert_eq!(store.load("grid", &defaults(), 1, &MigrationChain::new()), defaults());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let store = store();
        store.storage().set_reject_writes(true);
        store.save("grid", &defaults(), 1);
        assert_eq!(store.storage().get("excalidraw-tools-grid").unwrap(), None);
    }
}
