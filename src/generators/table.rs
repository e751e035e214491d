//! Table generator: a grid of cell rectangles with optional header row,
//! primary column and zebra striping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{SceneBuilder, SceneDocument, SceneElement, SeedSource};
use crate::error::Result;
use crate::generators::{Tool, ToolMetadata};
use crate::state::MigrationChain;

const START_X: f64 = 100.0;
const START_Y: f64 = 100.0;

/// Extra size of the header row and primary column.
const EMPHASIS_INSET: f64 = 20.0;

const CORNER_COLOR: &str = "#b8b8b8";
const HEADER_COLOR: &str = "#d3d3d3";
const PRIMARY_COLOR: &str = "#e8e8e8";
const STRIPE_COLOR: &str = "#f5f5f5";
const CELL_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfiguration {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f64,
    pub cell_height: f64,
    pub has_header_row: bool,
    pub has_primary_column: bool,
    pub has_stripes: bool,
}

impl Default for TableConfiguration {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 4,
            cell_width: 120.0,
            cell_height: 60.0,
            has_header_row: true,
            has_primary_column: false,
            has_stripes: false,
        }
    }
}

impl TableConfiguration {
    fn header_height(&self) -> f64 {
        if self.has_header_row {
            self.cell_height + EMPHASIS_INSET
        } else {
            self.cell_height
        }
    }

    fn primary_width(&self) -> f64 {
        if self.has_primary_column {
            self.cell_width + EMPHASIS_INSET
        } else {
            self.cell_width
        }
    }

    fn cell_color(&self, row: u32, col: u32) -> &'static str {
        let header = self.has_header_row && row == 0;
        let primary = self.has_primary_column && col == 0;

        if header && primary {
            return CORNER_COLOR;
        }
        if header {
            return HEADER_COLOR;
        }
        if primary {
            return PRIMARY_COLOR;
        }
        if self.has_stripes {
            // stripe parity counts data rows only
            let data_row = if self.has_header_row { row - 1 } else { row };
            if data_row % 2 == 1 {
                return STRIPE_COLOR;
            }
        }
        CELL_COLOR
    }
}

/// Version 1 tables had no striping option.
fn add_stripes_field(mut config: Value) -> Result<Value> {
    if let Some(obj) = config.as_object_mut() {
        obj.entry("hasStripes").or_insert(Value::Bool(false));
    }
    Ok(config)
}

impl Tool for TableConfiguration {
    const NAME: &'static str = "table";
    const SCHEMA_VERSION: u32 = 2;

    fn metadata() -> ToolMetadata {
        ToolMetadata {
            name: Self::NAME,
            display_name: "Table Tool",
            description: "Create and manage tables.",
            category: "Data Visualization",
            path: "/table",
            experimental: false,
        }
    }

    fn generate(&self, seeds: &mut dyn SeedSource) -> Result<SceneDocument> {
        let mut scene = SceneBuilder::new("table-generator", seeds);
        let header_height = self.header_height();
        let primary_width = self.primary_width();
        let mut next_id = 1u64;

        for r in 0..self.rows {
            for c in 0..self.cols {
                let width = if self.has_primary_column && c == 0 {
                    primary_width
                } else {
                    self.cell_width
                };
                let height = if self.has_header_row && r == 0 {
                    header_height
                } else {
                    self.cell_height
                };

                let x = START_X
                    + if c == 0 {
                        0.0
                    } else {
                        primary_width + f64::from(c - 1) * self.cell_width
                    };
                let y = START_Y
                    + if r == 0 {
                        0.0
                    } else {
                        header_height + f64::from(r - 1) * self.cell_height
                    };

                scene.push(
                    SceneElement::rectangle(next_id.to_string(), x, y, width, height)
                        .with_background(self.cell_color(r, c)),
                );
                next_id += 1;
            }
        }

        Ok(scene.finish())
    }

    fn history_name(&self) -> String {
        format!(
            "{}x{} Table{}{}{}",
            self.rows,
            self.cols,
            if self.has_header_row { " (Header)" } else { "" },
            if self.has_primary_column { " (Primary)" } else { "" },
            if self.has_stripes { " (Striped)" } else { "" },
        )
    }

    fn migrations() -> MigrationChain {
        MigrationChain::new().with_step(1, add_stripes_field)
    }

    fn normalize(&mut self) {
        self.rows = self.rows.max(1);
        self.cols = self.cols.max(1);
    }
}
