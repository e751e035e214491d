//! State Management Module
//!
//! Storage backends, versioned configuration persistence with migration,
//! field reconciliation and the bounded generation history.

pub mod history;
pub mod migration;
pub mod persistence;
pub mod reconcile;
pub mod storage;

pub use history::{GenerationHistoryItem, HistoryManager, DEFAULT_MAX_HISTORY_ITEMS};
pub use migration::{stored_version, MigrationChain, MigrationStep, SCHEMA_VERSION_KEY};
pub use persistence::PersistenceStore;
pub use reconcile::reconcile;
pub use storage::{FileStorage, MemoryStorage, Storage};
