//! Generation History
//!
//! Bounded, newest-first record of the configurations that produced a
//! successful generation. Entries keep their configuration as raw JSON
//! because older entries may predate the tool's current schema; they are
//! migrated (or reconciled as-is) only when loaded back.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::generators::Tool;
use crate::state::migration::INITIAL_SCHEMA_VERSION;
use crate::state::persistence::PersistenceStore;
use crate::state::reconcile::reconcile;
use crate::state::storage::Storage;

/// Default maximum number of history entries to keep.
pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 15;

/// Longest string value shown verbatim in a preview.
const PREVIEW_VALUE_LIMIT: usize = 20;

/// Number of fields shown in a preview.
const PREVIEW_FIELDS: usize = 3;

fn initial_version() -> u32 {
    INITIAL_SCHEMA_VERSION
}

/// One past generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationHistoryItem<C = Value> {
    pub id: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    pub configuration: C,

    #[serde(default)]
    pub name: Option<String>,

    /// Schema version the configuration was written with.
    #[serde(default = "initial_version", alias = "version")]
    pub schema_version: u32,

    /// Older than the tool's current schema. Recomputed on every load.
    #[serde(default)]
    pub deprecated: bool,
}

impl<C> GenerationHistoryItem<C> {
    /// Short age description: "Just now", "5m ago", "3h ago", "2d ago" or a date.
    pub fn relative_age(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.timestamp);
        let minutes = elapsed.num_minutes();
        let hours = elapsed.num_hours();
        let days = elapsed.num_days();

        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if hours < 24 {
            format!("{}h ago", hours)
        } else if days < 7 {
            format!("{}d ago", days)
        } else {
            self.timestamp.format("%Y-%m-%d").to_string()
        }
    }
}

impl GenerationHistoryItem<Value> {
    /// First few configuration fields as `key: value` pairs.
    pub fn preview(&self) -> String {
        let Some(fields) = self.configuration.as_object() else {
            return self.configuration.to_string();
        };

        let shown: Vec<String> = fields
            .iter()
            .take(PREVIEW_FIELDS)
            .map(|(key, value)| {
                let display = match value {
                    Value::String(s) if s.chars().count() > PREVIEW_VALUE_LIMIT => {
                        format!("{}...", s.chars().take(PREVIEW_VALUE_LIMIT).collect::<String>())
                    }
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}: {}", key, display)
            })
            .collect();

        let preview = shown.join(", ");
        if fields.len() > PREVIEW_FIELDS {
            format!("{}...", preview)
        } else {
            preview
        }
    }
}

/// History of one tool, persisted under its history key.
#[derive(Debug)]
pub struct HistoryManager<T, S> {
    store: PersistenceStore<S>,
    items: Vec<GenerationHistoryItem>,
    max_items: usize,
    _tool: PhantomData<fn() -> T>,
}

impl<T: Tool, S: Storage> HistoryManager<T, S> {
    /// Opens the history and loads whatever is stored.
    pub fn new(store: PersistenceStore<S>, max_items: usize) -> Self {
        let mut manager = Self {
            store,
            items: Vec::new(),
            max_items: max_items.max(1),
            _tool: PhantomData,
        };
        manager.load_history();
        manager
    }

    pub fn items(&self) -> &[GenerationHistoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&GenerationHistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    fn key(&self) -> String {
        self.store.history_key(T::NAME)
    }

    /// Re-reads the stored entries and flags those below the current schema.
    pub fn load_history(&mut self) -> &[GenerationHistoryItem] {
        let key = self.key();
        let items = match self.store.read_record(&key) {
            Some(record) => match serde_json::from_value::<Vec<GenerationHistoryItem>>(record) {
                Ok(items) => items,
                Err(e) => {
                    warn!("failed to load history for {}: {}", T::NAME, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        self.items = items
            .into_iter()
            .take(self.max_items)
            .map(|mut item| {
                item.deprecated = item.schema_version < T::SCHEMA_VERSION;
                item
            })
            .collect();
        &self.items
    }

    /// Records a generation and returns its id. The oldest entries beyond
    /// the bound are discarded.
    pub fn add_to_history(&mut self, configuration: &T, name: Option<String>) -> Result<String> {
        let item = GenerationHistoryItem {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            configuration: serde_json::to_value(configuration)?,
            name,
            schema_version: T::SCHEMA_VERSION,
            deprecated: false,
        };
        let id = item.id.clone();

        self.items.insert(0, item);
        self.items.truncate(self.max_items);
        self.persist();

        debug!("added history entry {} for {}", id, T::NAME);
        Ok(id)
    }

    /// Whether an entry can be upgraded to the current schema.
    pub fn is_migratable(&self, item: &GenerationHistoryItem) -> bool {
        T::migrations().has_path(item.schema_version, T::SCHEMA_VERSION)
    }

    /// Turns an entry back into a configuration.
    ///
    /// Older entries go through the migration chain; if that fails the
    /// stored configuration is used as it is, with a warning.
    pub fn load_from_history(&self, item: &GenerationHistoryItem) -> T {
        let defaults = T::default();
        if item.schema_version >= T::SCHEMA_VERSION {
            return reconcile(&defaults, &item.configuration);
        }

        warn!(
            "loading deprecated {} configuration from schema {} (current {})",
            T::NAME,
            item.schema_version,
            T::SCHEMA_VERSION
        );
        match T::migrations().migrate(item.configuration.clone(), item.schema_version, T::SCHEMA_VERSION) {
            Ok(migrated) => reconcile(&defaults, &migrated),
            Err(e) => {
                warn!("migration failed, using configuration as-is: {}", e);
                reconcile(&defaults, &item.configuration)
            }
        }
    }

    /// Removes one entry. Returns whether anything was removed.
    pub fn delete_from_history(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear_history(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        self.store.write_record(&self.key(), &self.items);
    }
}
