//! Progress bar generator.
//!
//! A framed bar with a filled inner rectangle, an optional tick marking the
//! current percentage and optional ticks at 0% and 100%.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Roundness, SceneBuilder, SceneDocument, SceneElement, SeedSource};
use crate::error::Result;
use crate::generators::{Tool, ToolMetadata};

const START_X: f64 = 100.0;
const START_Y: f64 = 100.0;

const FRAME_COLOR: &str = "#ffffff";
const FILL_COLOR: &str = "#4c9ffe";
const TICK_COLOR: &str = "#000000";

const TICK_WIDTH: f64 = 2.0;
/// Ticks overhang the bar by this much on each side.
const TICK_OVERHANG: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const LABEL_GAP: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressConfiguration {
    pub width: f64,
    pub height: f64,
    pub progress: f64,
    pub show_progress_tick: bool,
    pub show_end_ticks: bool,
}

impl Default for ProgressConfiguration {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 24.0,
            progress: 50.0,
            show_progress_tick: true,
            show_end_ticks: false,
        }
    }
}

/// Resolved geometry of a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarLayout {
    width: f64,
    height: f64,
    percent: f64,
    pad_x: f64,
    pad_y: f64,
    inner_width: f64,
    inner_height: f64,
    fill_width: f64,
}

impl BarLayout {
    fn of(config: &ProgressConfiguration) -> Self {
        let width = config.width.floor().max(1.0);
        let height = config.height.floor().max(1.0);
        let percent = config.progress.round().clamp(0.0, 100.0);
        let pad_x = (width * 0.02).round().clamp(2.0, 24.0);
        let pad_y = (height * 0.2).round().clamp(2.0, 16.0);
        let inner_width = (width - pad_x * 2.0).max(0.0);
        let inner_height = (height - pad_y * 2.0).max(1.0);
        let fill_width = (inner_width * percent / 100.0).round();

        Self {
            width,
            height,
            percent,
            pad_x,
            pad_y,
            inner_width,
            inner_height,
            fill_width,
        }
    }

    fn inner_x(&self) -> f64 {
        START_X + self.pad_x
    }
}

struct TickPainter<'s, 'a> {
    scene: &'s mut SceneBuilder<'a>,
    bar_height: f64,
    next_id: u32,
}

impl TickPainter<'_, '_> {
    fn id(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        id
    }

    fn tick(&mut self, x: f64, label: &str) {
        let id = self.id();
        self.scene.push(
            SceneElement::rectangle(
                id,
                (x - TICK_WIDTH / 2.0).round(),
                START_Y - TICK_OVERHANG,
                TICK_WIDTH,
                self.bar_height + TICK_OVERHANG * 2.0,
            )
            .with_stroke_color(TICK_COLOR)
            .with_background(TICK_COLOR)
            .with_roundness(Roundness::LEGACY),
        );

        let half_width = label.chars().count() as f64 * LABEL_FONT_SIZE / 4.0;
        let id = self.id();
        self.scene.push(
            SceneElement::text(
                id,
                (x - half_width).round(),
                START_Y - TICK_OVERHANG - LABEL_FONT_SIZE - LABEL_GAP,
                label,
                LABEL_FONT_SIZE,
            )
            .with_stroke_color(TICK_COLOR),
        );
    }
}

impl Tool for ProgressConfiguration {
    const NAME: &'static str = "progress";

    fn metadata() -> ToolMetadata {
        ToolMetadata {
            name: Self::NAME,
            display_name: "Progress Tool",
            description: "Generate a simple progress bar.",
            category: "UI Components",
            path: "/progress",
            experimental: false,
        }
    }

    fn generate(&self, seeds: &mut dyn SeedSource) -> Result<SceneDocument> {
        let layout = BarLayout::of(self);
        debug!(
            width = layout.width,
            percent = layout.percent,
            fill = layout.fill_width,
            "generating progress bar"
        );
        let mut scene = SceneBuilder::new("progress-generator", seeds);

        scene.push(
            SceneElement::rectangle("1", START_X, START_Y, layout.width, layout.height)
                .with_background(FRAME_COLOR)
                .with_stroke_width(2.0)
                .with_roundness(Roundness::LEGACY),
        );

        let mut next_id = 2;
        if layout.fill_width > 0.0 {
            scene.push(
                SceneElement::rectangle(
                    "2",
                    layout.inner_x(),
                    START_Y + layout.pad_y,
                    layout.fill_width,
                    layout.inner_height,
                )
                .with_background(FILL_COLOR)
                .with_roundness(Roundness::LEGACY),
            );
            next_id = 3;
        }

        let mut ticks = TickPainter {
            scene: &mut scene,
            bar_height: layout.height,
            next_id,
        };

        if self.show_progress_tick {
            let at_boundary = layout.percent == 0.0 || layout.percent == 100.0;
            if !(self.show_end_ticks && at_boundary) {
                ticks.tick(
                    layout.inner_x() + layout.fill_width,
                    &format!("{}%", layout.percent),
                );
            }
        }

        if self.show_end_ticks {
            ticks.tick(layout.inner_x(), "0%");
            ticks.tick(layout.inner_x() + layout.inner_width, "100%");
        }

        Ok(scene.finish())
    }

    fn history_name(&self) -> String {
        format!(
            "Progress {}% ({}×{}){}{}",
            self.progress,
            self.width,
            self.height,
            if self.show_progress_tick { " +Tick" } else { "" },
            if self.show_end_ticks { " +EndTicks" } else { "" },
        )
    }
}
