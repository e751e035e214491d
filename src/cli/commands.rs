//! CLI Command Implementations
//!
//! Each command opens the addressed tool over the file store, performs one
//! operation and prints the result.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use log::info;
use serde_json::Value;

use crate::cli::{Commands, ToolKind};
use crate::generators::{
    catalog, ProgressConfiguration, SkeletonConfiguration, TableConfiguration, Tool,
    TimelineConfiguration,
};
use crate::manager::{Status, ToolManager};
use crate::settings::ToolSettings;
use crate::sink::{FileSink, Sink, StdoutSink};
use crate::state::FileStorage;

type Manager<T> = ToolManager<T, FileStorage, Box<dyn Sink>>;

/// Runs one command against the store at `store`.
pub async fn run(command: Commands, store: PathBuf, settings: &ToolSettings) -> anyhow::Result<()> {
    let storage = FileStorage::new(store);
    match command.tool() {
        None => {
            list_tools();
            Ok(())
        }
        Some(ToolKind::Table) => run_tool::<TableConfiguration>(command, storage, settings).await,
        Some(ToolKind::Progress) => {
            run_tool::<ProgressConfiguration>(command, storage, settings).await
        }
        Some(ToolKind::Timeline) => {
            run_tool::<TimelineConfiguration>(command, storage, settings).await
        }
        Some(ToolKind::Skeleton) => {
            run_tool::<SkeletonConfiguration>(command, storage, settings).await
        }
    }
}

/// Print the tool catalog.
pub fn list_tools() {
    println!("Available tools:");
    println!("{:-<60}", "");
    for tool in catalog() {
        let marker = if tool.experimental { " [experimental]" } else { "" };
        println!(
            "{:<10} {}{} ({})",
            tool.name, tool.display_name, marker, tool.category
        );
        println!("{:<10} {}", "", tool.description);
    }
    println!("{:-<60}", "");
}

async fn run_tool<T: Tool>(
    command: Commands,
    storage: FileStorage,
    settings: &ToolSettings,
) -> anyhow::Result<()> {
    let sink: Box<dyn Sink> = match &command {
        Commands::Generate { out: Some(path), .. } => Box::new(FileSink::new(path)),
        _ => Box::new(StdoutSink),
    };
    let mut manager: Manager<T> = ToolManager::new(storage, sink, settings);

    match command {
        Commands::List => list_tools(),
        Commands::Show { .. } => print_configuration(&manager)?,
        Commands::Set { field, value, .. } => {
            let value = parse_value(&value);
            manager
                .update_configuration(&field, value)
                .with_context(|| format!("failed to set '{}' on {}", field, T::NAME))?;
            print_configuration(&manager)?;
        }
        Commands::Generate { out, .. } => {
            info!("Generating {} scene", T::NAME);
            match manager.generate_and_persist().await.clone() {
                Status::Success { message } => {
                    eprintln!("{}", message);
                    if let Some(path) = out {
                        eprintln!("Scene written to: {}", path.display());
                    }
                }
                Status::Error { message, data } => {
                    eprintln!("{}", message);
                    if let Some(data) = data {
                        println!("{}", data);
                    }
                    bail!("generation of {} did not complete", T::NAME);
                }
                Status::None => {}
            }
        }
        Commands::History { .. } => show_history(&manager),
        Commands::Restore { id, .. } => {
            manager
                .load_from_history(&id)
                .with_context(|| format!("failed to restore {} entry", T::NAME))?;
            println!("Restored history entry {}", id);
            print_configuration(&manager)?;
        }
        Commands::Delete { id, .. } => {
            if manager.delete_from_history(&id) {
                println!("Deleted history entry {}", id);
            } else {
                println!("No history entry {}", id);
            }
        }
        Commands::ClearHistory { .. } => {
            manager.clear_history();
            println!("History cleared for {}", T::NAME);
        }
        Commands::Reset { .. } => {
            manager.reset_configuration();
            println!("Configuration reset for {}", T::NAME);
            print_configuration(&manager)?;
        }
    }

    Ok(())
}

/// JSON when it parses, a plain string otherwise (`set skeleton kinematicTree smpljoints`).
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_configuration<T: Tool>(manager: &Manager<T>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(manager.configuration())
        .context("failed to serialize configuration")?;
    println!("{}", json);
    Ok(())
}

fn show_history<T: Tool>(manager: &Manager<T>) {
    let history = manager.history();
    if history.is_empty() {
        println!("No generations in history.");
        return;
    }

    let now = Utc::now();
    println!("{} History:", T::metadata().display_name);
    println!("{:-<60}", "");
    for item in history {
        let marker = if item.deprecated { "[old] " } else { "" };
        println!(
            "{}{}: {} ({})",
            marker,
            item.id,
            item.name.as_deref().unwrap_or("Unnamed"),
            item.relative_age(now)
        );
        println!("    {}", item.preview());
    }
    println!("{:-<60}", "");
    println!(
        "Entries: {} / {}",
        history.len(),
        manager.history_manager().max_items()
    );
}
