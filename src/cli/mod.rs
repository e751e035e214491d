//! CLI Module
//!
//! Command-line interface over a directory-backed store.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scenegen - generate Excalidraw scenes from tool configurations
#[derive(Parser, Debug)]
#[command(name = "scenegen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding configurations and history
    #[arg(long, global = true, default_value = ".scenegen")]
    pub store: PathBuf,

    /// JSON settings file (storage prefix, history size)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available generators.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    Table,
    Progress,
    Timeline,
    Skeleton,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available tools
    #[command(name = "list")]
    List,

    /// Show the current configuration of a tool
    #[command(name = "show")]
    Show {
        #[arg(value_enum)]
        tool: ToolKind,
    },

    /// Set one configuration field from a JSON value
    #[command(name = "set")]
    Set {
        #[arg(value_enum)]
        tool: ToolKind,

        /// Field name, e.g. rows or showEndTicks
        field: String,

        /// JSON value, e.g. 3, true or '[{"start":1,"end":4,"line":1}]'
        value: String,
    },

    /// Generate a scene and write it out
    #[command(name = "generate")]
    Generate {
        #[arg(value_enum)]
        tool: ToolKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show generation history
    #[command(name = "history")]
    History {
        #[arg(value_enum)]
        tool: ToolKind,
    },

    /// Make a history entry the current configuration
    #[command(name = "restore")]
    Restore {
        #[arg(value_enum)]
        tool: ToolKind,

        /// History entry id
        id: String,
    },

    /// Delete a history entry
    #[command(name = "delete")]
    Delete {
        #[arg(value_enum)]
        tool: ToolKind,

        /// History entry id
        id: String,
    },

    /// Delete all history entries of a tool
    #[command(name = "clear-history")]
    ClearHistory {
        #[arg(value_enum)]
        tool: ToolKind,
    },

    /// Restore the default configuration
    #[command(name = "reset")]
    Reset {
        #[arg(value_enum)]
        tool: ToolKind,
    },
}

impl Commands {
    /// Tool addressed by the command, if any.
    pub fn tool(&self) -> Option<ToolKind> {
        match self {
            Commands::List => None,
            Commands::Show { tool }
            | Commands::Set { tool, .. }
            | Commands::Generate { tool, .. }
            | Commands::History { tool }
            | Commands::Restore { tool, .. }
            | Commands::Delete { tool, .. }
            | Commands::ClearHistory { tool }
            | Commands::Reset { tool } => Some(*tool),
        }
    }
}
