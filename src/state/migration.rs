//! Schema migration for stored tool configurations.
//!
//! A chain is an explicit ordered list of single-version steps. Upgrading
//! from version V to the current version applies the step registered for V,
//! then V+1, and so on. A missing or failing step aborts the whole chain;
//! callers then fall back to a safe value instead of keeping a half-migrated
//! record.

use log::debug;
use serde_json::Value;

use crate::error::{Result, ScenegenError};

/// Key carrying the schema version of a stored record.
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// Key used by records written before `schemaVersion` existed.
const LEGACY_VERSION_KEY: &str = "version";

/// Version assumed when a record carries none.
pub const INITIAL_SCHEMA_VERSION: u32 = 1;

/// Upgrades a record by exactly one version.
pub type MigrateFn = fn(Value) -> Result<Value>;

/// One upgrade step, `from_version` → `from_version + 1`.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    pub from_version: u32,
    pub migrate: MigrateFn,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MigrationStep({} -> {})", self.from_version, self.from_version + 1)
    }
}

/// Ordered upgrade steps of one tool.
#[derive(Debug, Clone, Default)]
pub struct MigrationChain {
    steps: Vec<MigrationStep>,
}

impl MigrationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the step upgrading `from_version`, replacing any previous one.
    pub fn with_step(mut self, from_version: u32, migrate: MigrateFn) -> Self {
        self.steps.retain(|s| s.from_version != from_version);
        self.steps.push(MigrationStep {
            from_version,
            migrate,
        });
        self.steps.sort_by_key(|s| s.from_version);
        self
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// The step upgrading `version`, or `None` when nothing is registered.
    pub fn step_from(&self, version: u32) -> Option<&MigrationStep> {
        self.steps.iter().find(|s| s.from_version == version)
    }

    /// Whether every step between `from` and `to` is registered.
    pub fn has_path(&self, from: u32, to: u32) -> bool {
        from <= to && (from..to).all(|v| self.step_from(v).is_some())
    }

    /// Applies the steps `from..to` in order, stamping the version after each.
    pub fn migrate(&self, config: Value, from: u32, to: u32) -> Result<Value> {
        if from > to {
            return Err(ScenegenError::Migration {
                from,
                to,
                reason: "cannot downgrade from a newer schema version".to_string(),
            });
        }

        let mut data = config;
        for version in from..to {
            let step = self
                .step_from(version)
                .ok_or(ScenegenError::MissingMigrationStep { from: version, to })?;

            data = (step.migrate)(data).map_err(|e| ScenegenError::Migration {
                from: version,
                to: version + 1,
                reason: e.to_string(),
            })?;
            stamp_version(&mut data, version + 1);
            debug!("migrated record from schema {} to {}", version, version + 1);
        }

        Ok(data)
    }
}

/// Schema version of a stored record; absent or malformed means version 1.
pub fn stored_version(record: &Value) -> u32 {
    record
        .get(SCHEMA_VERSION_KEY)
        .or_else(|| record.get(LEGACY_VERSION_KEY))
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v >= INITIAL_SCHEMA_VERSION)
        .unwrap_or(INITIAL_SCHEMA_VERSION)
}

/// Writes `version` into an object record. Non-objects are left alone.
pub fn stamp_version(record: &mut Value, version: u32) {
    if let Some(obj) = record.as_object_mut() {
        obj.remove(LEGACY_VERSION_KEY);
        obj.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(version));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rename_size(mut data: Value) -> Result<Value> {
        if let Some(obj) = data.as_object_mut() {
            if let Some(size) = obj.remove("size") {
                obj.insert("jointSize".to_string(), size);
            }
        }
        Ok(data)
    }

    fn add_scale(mut data: Value) -> Result<Value> {
        if let Some(obj) = data.as_object_mut() {
            obj.entry("scale").or_insert(json!(1));
        }
        Ok(data)
    }

    fn explode(_data: Value) -> Result<Value> {
        Err(ScenegenError::Generation {
            reason: "bad record".to_string(),
        })
    }

    #[test]
    fn test_stored_version_defaults_to_one() {
        assert_eq!(stored_version(&json!({ "rows": 2 })), 1);
        assert_eq!(stored_version(&json!({ "schemaVersion": 3 })), 3);
        assert_eq!(stored_version(&json!({ "version": 2 })), 2);
        assert_eq!(stored_version(&json!({ "schemaVersion": "two" })), 1);
        assert_eq!(stored_version(&json!({ "schemaVersion": 0 })), 1);
    }

    #[test]
    fn test_same_version_is_unchanged() {
        let chain = MigrationChain::new();
        let data = json!({ "a": 1 });
        assert_eq!(chain.migrate(data.clone(), 2, 2).unwrap(), data);
    }

    #[test]
    fn test_steps_apply_in_order() {
        // registered out of order on purpose
        let chain = MigrationChain::new().with_step(2, add_scale).with_step(1, rename_size);
        assert_eq!(chain.steps()[0].from_version, 1);

        let migrated = chain.migrate(json!({ "size": 10 }), 1, 3).unwrap();
        assert_eq!(migrated, json!({ "jointSize": 10, "scale": 1, "schemaVersion": 3 }));
    }

    #[test]
    fn test_missing_step_aborts() {
        let chain = MigrationChain::new().with_step(1, rename_size);
        assert!(!chain.has_path(1, 3));

        let err = chain.migrate(json!({ "size": 10 }), 1, 3).unwrap_err();
        assert!(matches!(err, ScenegenError::MissingMigrationStep { from: 2, to: 3 }));
    }

    #[test]
    fn test_failing_step_aborts() {
        let chain = MigrationChain::new().with_step(1, rename_size).with_step(2, explode);
        let err = chain.migrate(json!({ "size": 10 }), 1, 3).unwrap_err();
        assert!(matches!(err, ScenegenError::Migration { from: 2, to: 3, .. }));
    }

    #[test]
    fn test_downgrade_is_rejected() {
        let chain = MigrationChain::new();
        assert!(chain.migrate(json!({}), 3, 2).is_err());
        assert!(!chain.has_path(3, 2));
    }

    #[test]
    fn test_stamp_replaces_legacy_key() {
        let mut record = json!({ "version": 1, "rows": 2 });
        stamp_version(&mut record, 2);
        assert_eq!(record, json!({ "rows": 2, "schemaVersion": 2 }));
    }
}
