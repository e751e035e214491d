//! Tool Manager Tests
//!
//! Generation, sink hand-off and history through the facade.

use scenegen::document::SequentialSeeds;
use scenegen::generators::{Span, TickMode, TimelineConfiguration};
use scenegen::sink::{FileSink, MemorySink};
use scenegen::state::{FileStorage, MemoryStorage, Storage};
use scenegen::{Phase, Status, ToolManager, ToolSettings};
use serde_json::{json, Value};
use tempfile::TempDir;

#[tokio::test]
async fn test_timeline_round_trip_through_history() {
    let storage = MemoryStorage::new();
    let sink = MemorySink::new();
    let settings = ToolSettings::default().with_max_history_items(3);
    let mut tool: ToolManager<TimelineConfiguration, _, _> =
        ToolManager::new(storage.clone(), sink.clone(), &settings)
            .with_seed_source(SequentialSeeds::default());

    tool.set_configuration(TimelineConfiguration {
        ticks: TickMode::All,
        spans: Span::one_line_example(),
    });
    let status = tool.generate_and_persist().await.clone();
    assert!(matches!(status, Status::Success { .. }));

    let item = &tool.history()[0];
    assert_eq!(
        item.name.as_deref(),
        Some("Timeline (5 spans, 1 lines) - All Ticks")
    );
    let id = item.id.clone();

    tool.reset_configuration();
    assert!(tool.configuration().spans.is_empty());

    tool.load_from_history(&id).unwrap();
    assert_eq!(tool.configuration().spans, Span::one_line_example());

    let written: Value = serde_json::from_str(&sink.writes()[0]).unwrap();
    assert_eq!(written["source"], "timeline-generator");
}

#[tokio::test]
async fn test_empty_timeline_still_hands_off() {
    let sink = MemorySink::new();
    let mut tool: ToolManager<TimelineConfiguration, _, _> =
        ToolManager::new(MemoryStorage::new(), sink.clone(), &ToolSettings::default());

    tool.generate_and_persist().await;
    let written: Value = serde_json::from_str(&sink.writes()[0]).unwrap();
    assert_eq!(written["elements"], json!([]));
    assert_eq!(
        tool.history()[0].name.as_deref(),
        Some("Timeline (Empty) - Transition Ticks")
    );
}

#[tokio::test]
async fn test_invalid_configuration_reports_error_without_history() {
    let storage = MemoryStorage::new();
    let mut tool: ToolManager<TimelineConfiguration, _, _> =
        ToolManager::new(storage, MemorySink::new(), &ToolSettings::default());
    tool.update_configuration("spans", json!([{ "start": 4, "end": 1, "line": 1 }]))
        .unwrap();

    let status = tool.generate_and_persist().await.clone();
    assert!(status.is_error());
    assert_eq!(status.data(), None);
    assert_eq!(tool.phase(), Phase::Failed);
    assert!(tool.history().is_empty());
}

#[tokio::test]
async fn test_file_backed_manager_with_file_sink() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("timeline.excalidraw");
    let storage = FileStorage::new(dir.path().join("store"));

    {
        let mut tool: ToolManager<TimelineConfiguration, _, _> =
            ToolManager::new(storage.clone(), FileSink::new(&out), &ToolSettings::default());
        tool.update_configuration("ticks", json!("none")).unwrap();
        tool.update_configuration("spans", json!([{ "start": 0, "end": 3, "line": 2 }]))
            .unwrap();
        tool.generate_and_persist().await;
    }

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(document["type"], "excalidraw");

    let reopened: ToolManager<TimelineConfiguration, _, _> =
        ToolManager::new(storage.clone(), MemorySink::new(), &ToolSettings::default());
    assert_eq!(reopened.configuration().ticks, TickMode::None);
    assert_eq!(reopened.history().len(), 1);
    assert!(storage
        .get("excalidraw-tools-timeline-history")
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_custom_prefix_namespaces_keys() {
    let storage = MemoryStorage::new();
    let settings = ToolSettings::default().with_storage_prefix("demo");
    let mut tool: ToolManager<TimelineConfiguration, _, _> =
        ToolManager::new(storage.clone(), MemorySink::new(), &settings);
    tool.update_configuration("ticks", json!("all")).unwrap();
    tool.generate_and_persist().await;

    assert_eq!(storage.keys(), vec!["demo-timeline", "demo-timeline-history"]);
}
