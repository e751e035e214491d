//! Tool Manager
//!
//! One manager drives one tool: it owns the active configuration and its
//! history, runs the generator, hands the serialized document to a sink and
//! keeps a single status describing the outcome.
//!
//! Phases run `Idle -> Generating -> Succeeded | Failed`, and back to
//! `Idle` when the status is dismissed or the next generation starts.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{RandomSeeds, SeedSource};
use crate::error::{Result, ScenegenError};
use crate::generators::Tool;
use crate::settings::ToolSettings;
use crate::sink::Sink;
use crate::state::{GenerationHistoryItem, HistoryManager, PersistenceStore, Storage};

/// Where the manager is in a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Succeeded,
    Failed,
}

/// Outcome shown to the user. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    None,
    Success {
        message: String,
    },
    Error {
        message: String,
        /// Serialized document kept for manual retrieval, when one was produced.
        data: Option<String>,
    },
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error { .. })
    }

    pub fn data(&self) -> Option<&str> {
        match self {
            Status::Error { data, .. } => data.as_deref(),
            _ => None,
        }
    }
}

pub struct ToolManager<T: Tool, S: Storage, K: Sink> {
    store: PersistenceStore<S>,
    history: HistoryManager<T, S>,
    configuration: T,
    sink: K,
    seeds: Box<dyn SeedSource>,
    phase: Phase,
    status: Status,
}

impl<T: Tool, S: Storage + Clone, K: Sink> ToolManager<T, S, K> {
    /// Opens the tool: loads (and if needed migrates) its configuration and history.
    pub fn new(storage: S, sink: K, settings: &ToolSettings) -> Self {
        let store = PersistenceStore::new(storage.clone(), settings.storage_prefix.clone());
        let history = HistoryManager::new(
            PersistenceStore::new(storage, settings.storage_prefix.clone()),
            settings.max_history_items,
        );
        let configuration = store.load(
            T::NAME,
            &T::default(),
            T::SCHEMA_VERSION,
            &T::migrations(),
        );
        debug!(tool = T::NAME, history = history.len(), "tool manager ready");

        Self {
            store,
            history,
            configuration,
            sink,
            seeds: Box::new(RandomSeeds),
            phase: Phase::Idle,
            status: Status::None,
        }
    }

    /// Replaces the seed source used for cosmetic element fields.
    pub fn with_seed_source(mut self, seeds: impl SeedSource + 'static) -> Self {
        self.seeds = Box::new(seeds);
        self
    }
}

impl<T: Tool, S: Storage, K: Sink> ToolManager<T, S, K> {
    pub fn configuration(&self) -> &T {
        &self.configuration
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[GenerationHistoryItem] {
        self.history.items()
    }

    pub fn history_manager(&self) -> &HistoryManager<T, S> {
        &self.history
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Sets one field by its wire name, then normalizes and persists.
    pub fn update_configuration(&mut self, field: &str, value: Value) -> Result<()> {
        let mut record = serde_json::to_value(&self.configuration)?;
        let fields = record
            .as_object_mut()
            .ok_or_else(|| ScenegenError::UnknownField {
                field: field.to_string(),
            })?;
        if !fields.contains_key(field) {
            return Err(ScenegenError::UnknownField {
                field: field.to_string(),
            });
        }
        fields.insert(field.to_string(), value);

        let mut updated: T =
            serde_json::from_value(record).map_err(|e| ScenegenError::InvalidFieldValue {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        updated.normalize();
        self.set_configuration(updated);
        Ok(())
    }

    /// Replaces the whole configuration and persists it.
    pub fn set_configuration(&mut self, configuration: T) {
        self.configuration = configuration;
        self.save();
    }

    /// Generates the document, hands it to the sink and records the result.
    ///
    /// History only grows when the hand-off succeeds. When the sink fails
    /// the serialized document stays available in the error status.
    pub async fn generate_and_persist(&mut self) -> &Status {
        self.phase = Phase::Generating;
        self.status = Status::None;
        let subject = subject::<T>();

        let text = match self.render() {
            Ok(text) => text,
            Err(e) => {
                warn!(tool = T::NAME, error = %e, "generation failed");
                self.fail(format!("Failed to generate {}: {}", subject, e), None);
                return &self.status;
            }
        };

        match self.sink.write(&text).await {
            Ok(()) => {
                let name = self.configuration.history_name();
                if let Err(e) = self.history.add_to_history(&self.configuration, Some(name)) {
                    warn!(tool = T::NAME, error = %e, "failed to record history entry");
                }
                info!(tool = T::NAME, bytes = text.len(), "document handed off");
                self.succeed(format!("{} written to the output", subject));
            }
            Err(e) => {
                warn!(tool = T::NAME, error = %e, "sink hand-off failed");
                self.fail(
                    format!("Failed to write {}: {}. Copy the data manually.", subject, e),
                    Some(text),
                );
            }
        }
        &self.status
    }

    /// Hands the document kept in an error status to the sink again.
    pub async fn retry_hand_off(&mut self) -> &Status {
        let Some(text) = self.status.data().map(str::to_string) else {
            return &self.status;
        };

        match self.sink.write(&text).await {
            Ok(()) => self.succeed(format!("{} data written to the output", subject::<T>())),
            Err(e) => warn!(tool = T::NAME, error = %e, "manual hand-off failed again"),
        }
        &self.status
    }

    /// Makes a history entry the active configuration.
    pub fn load_from_history(&mut self, id: &str) -> Result<()> {
        let item = self
            .history
            .get(id)
            .ok_or_else(|| ScenegenError::HistoryItemNotFound { id: id.to_string() })?;
        let configuration = self.history.load_from_history(item);
        info!(tool = T::NAME, id, "restored configuration from history");
        self.set_configuration(configuration);
        Ok(())
    }

    pub fn delete_from_history(&mut self, id: &str) -> bool {
        self.history.delete_from_history(id)
    }

    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }

    /// Restores the default configuration. History is left as it is.
    pub fn reset_configuration(&mut self) {
        self.set_configuration(T::default());
    }

    pub fn dismiss_status(&mut self) {
        self.status = Status::None;
        self.phase = Phase::Idle;
    }

    fn render(&mut self) -> Result<String> {
        let document = self.configuration.generate(self.seeds.as_mut())?;
        document.validate()?;
        document.to_json_pretty()
    }

    fn save(&self) {
        self.store
            .save(T::NAME, &self.configuration, T::SCHEMA_VERSION);
    }

    fn succeed(&mut self, message: String) {
        self.phase = Phase::Succeeded;
        self.status = Status::Success { message };
    }

    fn fail(&mut self, message: String, data: Option<String>) {
        self.phase = Phase::Failed;
        self.status = Status::Error { message, data };
    }
}

/// "Table", "Progress", ... for status messages.
fn subject<T: Tool>() -> &'static str {
    let name = T::metadata().display_name;
    name.strip_suffix(" Tool").unwrap_or(name)
}
