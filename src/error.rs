//! Error handling for Scenegen
//!
//! Persistence and migration errors are absorbed by the state layer and only
//! logged; generation and sink errors always reach the caller.

use thiserror::Error;

/// Result type alias for Scenegen operations
pub type Result<T> = std::result::Result<T, ScenegenError>;

/// Main error type for Scenegen operations
#[derive(Error, Debug)]
pub enum ScenegenError {
    // Storage Errors
    #[error("Failed to read stored value for key '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    #[error("Failed to write stored value for key '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    // Migration Errors
    #[error("Migration failed from version {from} to {to}: {reason}")]
    Migration { from: u32, to: u32, reason: String },

    #[error("No migration step registered from version {from} (target {to})")]
    MissingMigrationStep { from: u32, to: u32 },

    // Generation Errors
    #[error("Generation failed: {reason}")]
    Generation { reason: String },

    #[error("Unknown kinematic tree: {name}")]
    UnknownKinematicTree { name: String },

    #[error("Invalid span #{index}: start={start}, end={end}, line={line}")]
    InvalidSpan {
        index: usize,
        start: i64,
        end: i64,
        line: i64,
    },

    #[error("Scene document integrity violated: {reason}")]
    DocumentIntegrity { reason: String },

    // Sink Errors
    #[error("Failed to hand off document: {reason}")]
    SinkWrite { reason: String },

    // Configuration Errors
    #[error("Unknown configuration field: {field}")]
    UnknownField { field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    // History Errors
    #[error("History item not found: {id}")]
    HistoryItemNotFound { id: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScenegenError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ScenegenError::StorageRead { .. } => "STORAGE_READ",
            ScenegenError::StorageWrite { .. } => "STORAGE_WRITE",
            ScenegenError::Migration { .. } => "MIGRATION_FAILED",
            ScenegenError::MissingMigrationStep { .. } => "MIGRATION_STEP_MISSING",
            ScenegenError::Generation { .. } => "GENERATION_FAILED",
            ScenegenError::UnknownKinematicTree { .. } => "UNKNOWN_KINEMATIC_TREE",
            ScenegenError::InvalidSpan { .. } => "INVALID_SPAN",
            ScenegenError::DocumentIntegrity { .. } => "DOCUMENT_INTEGRITY",
            ScenegenError::SinkWrite { .. } => "SINK_WRITE",
            ScenegenError::UnknownField { .. } => "UNKNOWN_FIELD",
            ScenegenError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            ScenegenError::HistoryItemNotFound { .. } => "HISTORY_ITEM_NOT_FOUND",
            ScenegenError::Io(_) => "IO_ERROR",
            ScenegenError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether this error must be surfaced to the person driving the tool.
    ///
    /// Storage and migration failures degrade silently instead.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            ScenegenError::StorageRead { .. }
                | ScenegenError::StorageWrite { .. }
                | ScenegenError::Migration { .. }
                | ScenegenError::MissingMigrationStep { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ScenegenError::UnknownKinematicTree { .. } => {
                Some("Pick one of the listed kinematic trees (smpljoints, guoh3djoints).")
            }
            ScenegenError::InvalidSpan { .. } => {
                Some("Each span needs start <= end and a line number of at least 1.")
            }
            ScenegenError::SinkWrite { .. } => {
                Some("The generated document is still available; copy it manually.")
            }
            ScenegenError::StorageWrite { .. } => {
                Some("Free up storage space or clear the generation history.")
            }
            ScenegenError::HistoryItemNotFound { .. } => {
                Some("List the history again; the entry may have been evicted.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ScenegenError::UnknownKinematicTree {
            name: "mixamo".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_KINEMATIC_TREE");
        assert!(err.to_string().contains("mixamo"));
    }

    #[test]
    fn test_visibility_policy() {
        let storage = ScenegenError::StorageWrite {
            key: "excalidraw-tools-table".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert!(!storage.is_user_visible());

        let sink = ScenegenError::SinkWrite {
            reason: "clipboard denied".to_string(),
        };
        assert!(sink.is_user_visible());
        assert!(sink.recovery_suggestion().is_some());
    }
}
