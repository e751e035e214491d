//! Timeline generator.
//!
//! Lays spans out on horizontal lines inside a bounding container, with
//! dotted separators between lines and optional time ticks along the top.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{
    BoundElement, FillStyle, Roundness, SceneBuilder, SceneDocument, SceneElement, SeedSource,
    StrokeStyle,
};
use crate::error::{Result, ScenegenError};
use crate::generators::{Tool, ToolMetadata};

const START_X: f64 = 100.0;
const START_Y: f64 = 150.0;
/// Canvas units per time unit.
const SCALE: f64 = 30.0;
const ROW_HEIGHT: f64 = 75.0;
const SPAN_HEIGHT: f64 = 50.0;
const TICK_HEIGHT: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 20.0;
/// Widest time range a timeline may cover.
const MAX_TIME_EXTENT: i64 = 10_000;
/// Most lines a timeline may use.
const MAX_LINES: i64 = 1_000;
const X_PADDING: f64 = 10.0;
const Y_PADDING: f64 = 2.5;

const STROKE_COLOR: &str = "#1e1e1e";
const CONTAINER_COLOR: &str = "#e9ecef";
const SPAN_COLOR: &str = "#e9ecef";

/// Which time values get a tick mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickMode {
    None,
    Transition,
    All,
}

impl TickMode {
    pub fn label(&self) -> &'static str {
        match self {
            TickMode::None => "No Ticks",
            TickMode::Transition => "Transition Ticks",
            TickMode::All => "All Ticks",
        }
    }
}

/// A time interval drawn on a numbered line (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
    pub line: i64,
}

impl Span {
    pub fn new(start: i64, end: i64, line: i64) -> Self {
        Self { start, end, line }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end && self.line >= 1
    }

    /// Five back-to-back spans on a single line.
    pub fn one_line_example() -> Vec<Span> {
        vec![
            Span::new(0, 3, 1),
            Span::new(3, 10, 1),
            Span::new(10, 14, 1),
            Span::new(14, 20, 1),
            Span::new(20, 24, 1),
        ]
    }

    /// Overlapping spans spread over four lines.
    pub fn multi_line_example() -> Vec<Span> {
        vec![
            Span::new(0, 5, 3),
            Span::new(5, 10, 1),
            Span::new(10, 14, 2),
            Span::new(14, 20, 1),
            Span::new(20, 24, 3),
            Span::new(14, 22, 4),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfiguration {
    pub ticks: TickMode,
    pub spans: Vec<Span>,
}

impl Default for TimelineConfiguration {
    fn default() -> Self {
        Self {
            ticks: TickMode::Transition,
            spans: Vec::new(),
        }
    }
}

impl TimelineConfiguration {
    fn check_spans(&self) -> Result<()> {
        match self.spans.iter().enumerate().find(|(_, s)| !s.is_valid()) {
            Some((index, span)) => Err(ScenegenError::InvalidSpan {
                index,
                start: span.start,
                end: span.end,
                line: span.line,
            }),
            None => Ok(()),
        }
    }

    /// Time extent `max_time - min_time`, bounded so that every later
    /// offset from `min_time` fits and the drawing stays finite.
    fn check_extent(&self, min_time: i64, max_time: i64, max_line: i64) -> Result<i64> {
        let extent = max_time
            .checked_sub(min_time)
            .filter(|extent| *extent <= MAX_TIME_EXTENT)
            .ok_or_else(|| ScenegenError::Generation {
                reason: format!(
                    "timeline covers {}..{}, at most {} time units are supported",
                    min_time, max_time, MAX_TIME_EXTENT
                ),
            })?;
        if max_line > MAX_LINES {
            return Err(ScenegenError::Generation {
                reason: format!(
                    "timeline uses {} lines, at most {} are supported",
                    max_line, MAX_LINES
                ),
            });
        }
        Ok(extent)
    }

    /// Time values that receive a tick, ascending.
    fn tick_positions(&self, min_time: i64, max_time: i64) -> Vec<i64> {
        match self.ticks {
            TickMode::None => Vec::new(),
            TickMode::All => (min_time..=max_time).collect(),
            TickMode::Transition => self
                .spans
                .iter()
                .flat_map(|s| [s.start, s.end])
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }
}

impl Tool for TimelineConfiguration {
    const NAME: &'static str = "timeline";

    fn metadata() -> ToolMetadata {
        ToolMetadata {
            name: Self::NAME,
            display_name: "Timeline Tool",
            description: "Create and manage timelines.",
            category: "Data Visualization",
            path: "/timeline",
            experimental: false,
        }
    }

    fn generate(&self, seeds: &mut dyn SeedSource) -> Result<SceneDocument> {
        let mut scene = SceneBuilder::new("timeline-generator", seeds);

        let (min_time, max_time, max_line) = match (
            self.spans.iter().map(|s| s.start).min(),
            self.spans.iter().map(|s| s.end).max(),
            self.spans.iter().map(|s| s.line).max(),
        ) {
            (Some(min), Some(max), Some(line)) => (min, max, line),
            _ => return Ok(scene.finish()),
        };
        self.check_spans()?;
        let extent = self.check_extent(min_time, max_time, max_line)?;
        debug!(spans = self.spans.len(), extent, lines = max_line, "generating timeline");

        let timeline_width = extent as f64 * SCALE;
        let timeline_height = max_line as f64 * ROW_HEIGHT;
        let mut counter = 1u64;
        let mut next = || {
            let n = counter;
            counter += 1;
            n
        };

        scene.push(
            SceneElement::rectangle(
                format!("timeline-container-{}", next()),
                START_X - X_PADDING,
                START_Y - Y_PADDING,
                timeline_width + 2.0 * X_PADDING,
                timeline_height + 2.0 * Y_PADDING,
            )
            .with_stroke_color(STROKE_COLOR)
            .with_background(CONTAINER_COLOR)
            .with_fill(FillStyle::Hachure)
            .with_stroke_width(2.0)
            .with_roundness(Roundness::ADAPTIVE),
        );

        for i in 1..max_line {
            scene.push(
                SceneElement::line(
                    format!("h-line-{}-{}", i, next()),
                    START_X,
                    START_Y + i as f64 * ROW_HEIGHT,
                    vec![[0.0, 0.0], [timeline_width, 0.0]],
                )
                .with_stroke_color(STROKE_COLOR)
                .with_stroke_style(StrokeStyle::Dotted),
            );
        }

        for t in self.tick_positions(min_time, max_time) {
            let tick_x = START_X + (t - min_time) as f64 * SCALE;
            scene.push(
                SceneElement::line(
                    format!("tick-line-{}-{}", t, next()),
                    tick_x,
                    START_Y - Y_PADDING,
                    vec![[0.0, 0.0], [0.0, -TICK_HEIGHT]],
                )
                .with_stroke_color(STROKE_COLOR),
            );

            let label = t.to_string();
            scene.push(
                SceneElement::text(
                    format!("tick-label-{}-{}", t, next()),
                    tick_x - label.len() as f64 * LABEL_FONT_SIZE / 4.0,
                    START_Y - Y_PADDING - TICK_HEIGHT - LABEL_FONT_SIZE,
                    label,
                    LABEL_FONT_SIZE,
                )
                .with_stroke_color(STROKE_COLOR),
            );
        }

        for span in &self.spans {
            let span_x = START_X + (span.start - min_time) as f64 * SCALE;
            let span_y =
                START_Y + (span.line - 1) as f64 * ROW_HEIGHT + (ROW_HEIGHT - SPAN_HEIGHT) / 2.0;
            let span_width = (span.end - span.start) as f64 * SCALE;

            let rect_id = format!("span-rect-{}", next());
            let text_id = format!("span-text-{}", next());
            let group_id = format!("span-group-{}", next());

            scene.push(
                SceneElement::rectangle(&rect_id, span_x, span_y, span_width, SPAN_HEIGHT)
                    .with_stroke_color(STROKE_COLOR)
                    .with_background(SPAN_COLOR)
                    .with_fill(FillStyle::CrossHatch)
                    .with_stroke_width(2.0)
                    .with_roundness(Roundness::ADAPTIVE)
                    .with_bound(BoundElement::text(&text_id))
                    .with_group(&group_id),
            );

            let label = SceneElement::text(
                &text_id,
                0.0,
                0.0,
                format!("{}-{}", span.start, span.end),
                LABEL_FONT_SIZE,
            );
            let (label_width, label_height) = (label.width, label.height);
            scene.push(
                SceneElement {
                    x: span_x + (span_width - label_width) / 2.0,
                    y: span_y + (SPAN_HEIGHT - label_height) / 2.0,
                    ..label
                }
                .with_container(&rect_id)
                .with_stroke_color(STROKE_COLOR)
                .with_group(&group_id),
            );
        }

        Ok(scene.finish())
    }

    fn history_name(&self) -> String {
        if self.spans.is_empty() {
            return format!("Timeline (Empty) - {}", self.ticks.label());
        }
        let lines: HashSet<i64> = self.spans.iter().map(|s| s.line).collect();
        format!(
            "Timeline ({} spans, {} lines) - {}",
            self.spans.len(),
            lines.len(),
            self.ticks.label()
        )
    }
}
