//! Field reconciliation between a stored record and a tool's defaults.
//!
//! The default configuration defines the field set. Each default field takes
//! the stored value when one is present and still fits the field's type;
//! everything else keeps its default. Stored fields the defaults do not know
//! are dropped.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::state::migration::SCHEMA_VERSION_KEY;

/// Builds a configuration from `defaults` overlaid with the fields of `stored`.
pub fn reconcile<T>(defaults: &T, stored: &Value) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let mut fields = match serde_json::to_value(defaults) {
        Ok(Value::Object(fields)) => fields,
        _ => return defaults.clone(),
    };
    let stored = match stored.as_object() {
        Some(stored) => stored,
        None => {
            warn!("stored configuration is not an object; using defaults");
            return defaults.clone();
        }
    };

    let keys: Vec<String> = fields.keys().cloned().collect();
    for key in keys {
        let Some(value) = stored.get(&key) else {
            continue;
        };
        let previous = fields.insert(key.clone(), value.clone());
        if decode::<T>(&fields).is_none() {
            warn!("stored field '{}' has an incompatible value; keeping default", key);
            if let Some(previous) = previous {
                fields.insert(key, previous);
            }
        }
    }

    for key in stored.keys() {
        if key != SCHEMA_VERSION_KEY && !fields.contains_key(key) {
            debug!("dropping unknown stored field '{}'", key);
        }
    }

    decode(&fields).unwrap_or_else(|| defaults.clone())
}

fn decode<T: DeserializeOwned>(fields: &Map<String, Value>) -> Option<T> {
    serde_json::from_value(Value::Object(fields.clone())).ok()
}
