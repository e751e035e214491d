//! Generator Tests
//!
//! End-to-end checks of the four generators through the public API.

use approx::assert_relative_eq;
use scenegen::document::{SceneDocument, SequentialSeeds};
use scenegen::generators::{
    ProgressConfiguration, SkeletonConfiguration, Span, TableConfiguration, TickMode,
    TimelineConfiguration, Tool, JOINT_COUNT, KINEMATIC_TREES,
};

fn generate<T: Tool>(config: &T) -> SceneDocument {
    let mut seeds = SequentialSeeds::default();
    config.generate(&mut seeds).expect("generation succeeds")
}

// === Table ===

#[test]
fn test_table_emits_rows_times_cols() {
    for (rows, cols) in [(1, 1), (3, 7), (10, 2)] {
        let config = TableConfiguration {
            rows,
            cols,
            ..TableConfiguration::default()
        };
        let doc = generate(&config);
        assert_eq!(doc.count_of("rectangle"), (rows * cols) as usize);
        doc.validate().unwrap();
    }
}

#[test]
fn test_plain_two_by_two_table() {
    let config = TableConfiguration {
        rows: 2,
        cols: 2,
        cell_width: 10.0,
        cell_height: 10.0,
        has_header_row: false,
        has_primary_column: false,
        has_stripes: false,
    };
    let doc = generate(&config);

    let cells: Vec<_> = doc.elements.iter().map(|e| (e.x, e.y, e.width, e.height)).collect();
    assert_eq!(
        cells,
        vec![
            (100.0, 100.0, 10.0, 10.0),
            (110.0, 100.0, 10.0, 10.0),
            (100.0, 110.0, 10.0, 10.0),
            (110.0, 110.0, 10.0, 10.0),
        ]
    );
    assert!(doc.elements.iter().all(|e| e.background_color == "#ffffff"));
}

// === Progress ===

#[test]
fn test_progress_half_full() {
    let config = ProgressConfiguration {
        width: 100.0,
        height: 20.0,
        progress: 50.0,
        show_progress_tick: false,
        show_end_ticks: false,
    };
    let doc = generate(&config);

    assert_eq!(doc.elements.len(), 2);
    let frame = &doc.elements[0];
    assert_relative_eq!(frame.x, 100.0);
    assert_relative_eq!(frame.width, 100.0);
    assert_relative_eq!(frame.height, 20.0);
    assert_relative_eq!(doc.elements[1].width, 48.0);
}

#[test]
fn test_progress_zero_has_no_fill() {
    let config = ProgressConfiguration {
        progress: 0.0,
        show_progress_tick: false,
        ..ProgressConfiguration::default()
    };
    let doc = generate(&config);
    assert_eq!(doc.count_of("rectangle"), 1);
}

#[test]
fn test_progress_fill_width_matches_rounding() {
    for progress in [1.0, 33.0, 66.0, 99.0, 100.0] {
        let config = ProgressConfiguration {
            width: 250.0,
            height: 30.0,
            progress,
            show_progress_tick: false,
            show_end_ticks: false,
        };
        let doc = generate(&config);
        // padding = clamp(round(250 * 0.02), 2, 24) = 5
        let inner_width = 250.0 - 10.0;
        let expected = (inner_width * progress / 100.0_f64).round();
        assert_relative_eq!(doc.elements[1].width, expected);
    }
}

// === Timeline ===

#[test]
fn test_empty_timeline_is_empty_document() {
    let doc = generate(&TimelineConfiguration::default());
    assert!(doc.elements.is_empty());
}

#[test]
fn test_all_ticks_cover_every_time_unit() {
    let config = TimelineConfiguration {
        ticks: TickMode::All,
        spans: Span::multi_line_example(),
    };
    let min = config.spans.iter().map(|s| s.start).min().unwrap();
    let max = config.spans.iter().map(|s| s.end).max().unwrap();

    let doc = generate(&config);
    let ticks = doc.elements.iter().filter(|e| e.id.starts_with("tick-")).count();
    assert_eq!(ticks as i64, 2 * (max - min + 1));
    doc.validate().unwrap();
}

#[test]
fn test_invalid_span_is_rejected() {
    let config = TimelineConfiguration {
        ticks: TickMode::None,
        spans: vec![Span::new(5, 2, 1)],
    };
    let mut seeds = SequentialSeeds::default();
    let err = config.generate(&mut seeds).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_SPAN");
}

// === Skeleton ===

#[test]
fn test_every_tree_binds_arrows_to_circles() {
    for tree in KINEMATIC_TREES {
        let config = SkeletonConfiguration {
            kinematic_tree: tree.name.to_string(),
            ..SkeletonConfiguration::default()
        };
        let doc = generate(&config);

        assert_eq!(doc.count_of("ellipse"), JOINT_COUNT);
        assert_eq!(doc.count_of("arrow"), tree.bone_count());
        for arrow in doc.elements_of("arrow") {
            for target in arrow.binding_targets() {
                let circle = doc.element(target).expect("bound circle exists");
                assert_eq!(circle.kind(), "ellipse");
            }
        }
    }
}

#[test]
fn test_partial_pose_still_emits_all_joints() {
    let config = SkeletonConfiguration {
        csv_data: Some("0,0.5,0.5,0.0\nnot,a,valid,line\n99,1,1,1".to_string()),
        show_joint_numbers: false,
        ..SkeletonConfiguration::default()
    };
    let doc = generate(&config);
    assert_eq!(doc.count_of("ellipse"), JOINT_COUNT);
    assert_eq!(doc.count_of("text"), 0);
}

#[test]
fn test_non_finite_pose_values_fall_back_to_defaults() {
    let config = SkeletonConfiguration {
        csv_data: Some("3,NaN,0,0\n4,inf,0,0".to_string()),
        ..SkeletonConfiguration::default()
    };
    let value: serde_json::Value =
        serde_json::from_str(&generate(&config).to_json_pretty().unwrap()).unwrap();

    let baseline: serde_json::Value =
        serde_json::from_str(&generate(&SkeletonConfiguration::default()).to_json_pretty().unwrap())
            .unwrap();
    for element in value["elements"].as_array().unwrap() {
        assert!(element["x"].is_number(), "{} has no numeric x", element["id"]);
        assert!(element["y"].is_number(), "{} has no numeric y", element["id"]);
    }
    assert_eq!(value, baseline);
}

#[test]
fn test_unknown_tree_fails() {
    let config = SkeletonConfiguration {
        kinematic_tree: "mixamo".to_string(),
        ..SkeletonConfiguration::default()
    };
    let mut seeds = SequentialSeeds::default();
    let err = config.generate(&mut seeds).unwrap_err();
    assert!(err.is_user_visible());
    assert_eq!(err.error_code(), "UNKNOWN_KINEMATIC_TREE");
}

// === Wire format ===

#[test]
fn test_document_envelope() {
    let doc = generate(&TableConfiguration::default());
    let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

    assert_eq!(value["type"], "excalidraw");
    assert_eq!(value["version"], 2);
    assert_eq!(value["source"], "table-generator");
    assert_eq!(value["appState"]["viewBackgroundColor"], "#ffffff");
    assert!(value["appState"]["gridSize"].is_null());
    assert_eq!(value["files"], serde_json::json!({}));
    assert_eq!(value["elements"][0]["type"], "rectangle");
    assert!(value["elements"][0]["versionNonce"].is_number());
}

#[test]
fn test_sequential_seeds_make_output_reproducible() {
    let config = SkeletonConfiguration::default();
    let first = generate(&config).to_json_pretty().unwrap();
    let second = generate(&config).to_json_pretty().unwrap();
    assert_eq!(first, second);
}
