//! Scene Generators
//!
//! Each tool pairs a configuration type with a pure generator. The [`Tool`]
//! trait carries everything the persistence layer and the facade need to
//! know about a tool: its storage name, current schema version, migration
//! steps and the descriptive name used for history entries.

mod pose;
mod progress;
mod skeleton;
mod table;
mod timeline;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::{SceneDocument, SeedSource};
use crate::error::Result;
use crate::state::MigrationChain;

pub use pose::{default_pose, parse_pose, Joint, JOINT_COUNT};
pub use progress::ProgressConfiguration;
pub use skeleton::{KinematicTree, SkeletonConfiguration, KINEMATIC_TREES};
pub use table::TableConfiguration;
pub use timeline::{Span, TickMode, TimelineConfiguration};

/// Descriptive metadata shown in tool listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMetadata {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub path: &'static str,
    pub experimental: bool,
}

/// A configurable scene generator.
pub trait Tool: Serialize + DeserializeOwned + Clone + Default + Debug + Send + 'static {
    /// Storage namespace and command-line name.
    const NAME: &'static str;

    /// Current configuration schema version.
    const SCHEMA_VERSION: u32 = 1;

    fn metadata() -> ToolMetadata;

    /// Maps the configuration to a scene document.
    fn generate(&self, seeds: &mut dyn SeedSource) -> Result<SceneDocument>;

    /// Descriptive name recorded with history entries.
    fn history_name(&self) -> String {
        format!("Generated {}", Self::NAME)
    }

    /// Ordered upgrade steps towards [`Tool::SCHEMA_VERSION`].
    fn migrations() -> MigrationChain {
        MigrationChain::new()
    }

    /// Applies input minimums after a field edit.
    fn normalize(&mut self) {}
}

/// Metadata of every available tool.
pub fn catalog() -> Vec<ToolMetadata> {
    vec![
        TableConfiguration::metadata(),
        ProgressConfiguration::metadata(),
        TimelineConfiguration::metadata(),
        SkeletonConfiguration::metadata(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let tools = catalog();
        let names: HashSet<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), tools.len());
        assert!(tools.iter().any(|t| t.experimental));
    }
}
