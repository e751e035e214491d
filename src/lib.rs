//! Scenegen - Diagram Scene Generators
//!
//! Scenegen turns small tool configurations into Excalidraw scene documents:
//! 1. Tables with optional header row, primary column and stripes
//! 2. Progress bars with progress and end ticks
//! 3. Timelines of spans laid out on numbered lines
//! 4. Skeletons of a 22-joint pose over a kinematic tree
//!
//! # Architecture
//!
//! - `generators`: pure configuration to document functions
//! - `state`: versioned persistence, migration and generation history
//! - `manager`: per-tool facade tying generation, sink hand-off and history together

pub mod cli;
pub mod document;
pub mod error;
pub mod generators;
pub mod manager;
pub mod settings;
pub mod sink;
pub mod state;

pub use error::{Result, ScenegenError};
pub use manager::{Phase, Status, ToolManager};
pub use settings::ToolSettings;
