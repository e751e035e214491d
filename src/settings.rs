//! Tool settings.
//!
//! Namespace and history bound shared by every tool instance. Settings can
//! be built in code or read from a JSON file; missing fields take their
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::DEFAULT_MAX_HISTORY_ITEMS;

/// Default storage key prefix.
pub const DEFAULT_STORAGE_PREFIX: &str = "excalidraw-tools";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    /// Prefix of every storage key.
    pub storage_prefix: String,

    /// Maximum number of history entries kept per tool.
    pub max_history_items: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            max_history_items: DEFAULT_MAX_HISTORY_ITEMS,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    /// Sets the history bound; at least one entry is always kept.
    pub fn with_max_history_items(mut self, max: usize) -> Self {
        self.max_history_items = max.max(1);
        self
    }
}
