//! Scene element shapes.
//!
//! Every element shares one attribute block (geometry, style, bookkeeping);
//! the variant-specific part lives in [`Shape`], flattened under the `type`
//! tag so the JSON matches what the drawing host reads.

use serde::{Deserialize, Serialize};

/// Default stroke colour used by generators that do not pick their own.
pub const DEFAULT_STROKE: &str = "#000000";

/// Fully transparent background.
pub const TRANSPARENT: &str = "transparent";

/// Fill pattern of a closed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    Solid,
    Hachure,
    CrossHatch,
}

/// Stroke pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Corner rounding algorithm understood by the host (2 = legacy, 3 = adaptive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Roundness {
    pub const LEGACY: Roundness = Roundness { kind: 2 };
    pub const ADAPTIVE: Roundness = Roundness { kind: 3 };
}

/// Kind of element referenced from a container's `boundElements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Text,
    Arrow,
}

/// Back-reference from a shape to an element attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BoundKind,
}

impl BoundElement {
    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BoundKind::Text,
        }
    }

    pub fn arrow(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BoundKind::Arrow,
        }
    }
}

/// Attachment of an arrow endpoint to another element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointBinding {
    pub element_id: String,
    pub focus: f64,
    pub gap: f64,
}

impl PointBinding {
    pub fn to(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            focus: 0.0,
            gap: 1.0,
        }
    }
}

/// Variant-specific part of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum Shape {
    Rectangle,
    Ellipse,
    Line {
        points: Vec<[f64; 2]>,
    },
    Arrow {
        points: Vec<[f64; 2]>,
        start_binding: Option<PointBinding>,
        end_binding: Option<PointBinding>,
        start_arrowhead: Option<String>,
        end_arrowhead: Option<String>,
        last_committed_point: Option<[f64; 2]>,
    },
    Text {
        text: String,
        font_size: f64,
        font_family: u8,
        text_align: String,
        vertical_align: String,
        container_id: Option<String>,
        original_text: String,
        line_height: f64,
    },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Ellipse => "ellipse",
            Shape::Line { .. } => "line",
            Shape::Arrow { .. } => "arrow",
            Shape::Text { .. } => "text",
        }
    }
}

/// One drawable element of a scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneElement {
    pub id: String,
    #[serde(flatten)]
    pub shape: Shape,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub roughness: u8,
    pub opacity: u8,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<Roundness>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub bound_elements: Vec<BoundElement>,
    pub updated: i64,
    pub link: Option<String>,
    pub locked: bool,
}

impl SceneElement {
    fn base(id: impl Into<String>, shape: Shape, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            shape,
            x,
            y,
            width,
            height,
            angle: 0.0,
            stroke_color: DEFAULT_STROKE.to_string(),
            background_color: TRANSPARENT.to_string(),
            fill_style: FillStyle::Solid,
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            roughness: 1,
            opacity: 100,
            group_ids: Vec::new(),
            frame_id: None,
            roundness: None,
            seed: 0,
            version: 1,
            version_nonce: 0,
            is_deleted: false,
            bound_elements: Vec::new(),
            updated: 0,
            link: None,
            locked: false,
        }
    }

    pub fn rectangle(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::base(id, Shape::Rectangle, x, y, width, height)
    }

    pub fn ellipse(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::base(id, Shape::Ellipse, x, y, width, height)
    }

    /// Polyline starting at `(x, y)`; points are relative to that origin.
    ///
    /// Width and height are the offset of the last point.
    pub fn line(id: impl Into<String>, x: f64, y: f64, points: Vec<[f64; 2]>) -> Self {
        let [width, height] = points.last().copied().unwrap_or([0.0, 0.0]);
        Self::base(id, Shape::Line { points }, x, y, width, height)
    }

    /// Straight arrow between two absolute canvas positions.
    pub fn arrow(id: impl Into<String>, from: (f64, f64), to: (f64, f64)) -> Self {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let shape = Shape::Arrow {
            points: vec![[0.0, 0.0], [dx, dy]],
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
            last_committed_point: None,
        };
        Self::base(id, shape, from.0, from.1, dx, dy)
    }

    /// Free-standing text; the box size is an estimate the host re-measures.
    pub fn text(id: impl Into<String>, x: f64, y: f64, text: impl Into<String>, font_size: f64) -> Self {
        let text = text.into();
        let line_height = 1.25;
        let width = text.chars().count() as f64 * font_size * 0.5;
        let height = font_size * line_height;
        let shape = Shape::Text {
            original_text: text.clone(),
            text,
            font_size,
            font_family: 5,
            text_align: "left".to_string(),
            vertical_align: "top".to_string(),
            container_id: None,
            line_height,
        };
        Self::base(id, shape, x, y, width, height)
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_fill(mut self, fill: FillStyle) -> Self {
        self.fill_style = fill;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.stroke_style = style;
        self
    }

    pub fn with_roughness(mut self, roughness: u8) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_roundness(mut self, roundness: Roundness) -> Self {
        self.roundness = Some(roundness);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    pub fn with_bound(mut self, bound: BoundElement) -> Self {
        self.bound_elements.push(bound);
        self
    }

    /// Binds a text element to its container. No-op for other shapes.
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        if let Shape::Text {
            container_id,
            text_align,
            vertical_align,
            ..
        } = &mut self.shape
        {
            *container_id = Some(container.into());
            *text_align = "center".to_string();
            *vertical_align = "middle".to_string();
        }
        self
    }

    pub fn with_font_family(mut self, family: u8) -> Self {
        if let Shape::Text { font_family, .. } = &mut self.shape {
            *font_family = family;
        }
        self
    }

    /// Binds both arrow endpoints. No-op for other shapes.
    pub fn with_endpoints(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        if let Shape::Arrow {
            start_binding,
            end_binding,
            ..
        } = &mut self.shape
        {
            *start_binding = Some(PointBinding::to(start));
            *end_binding = Some(PointBinding::to(end));
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        self.shape.name()
    }

    /// Ids of every element this one refers to by binding.
    pub fn binding_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = self.bound_elements.iter().map(|b| b.id.as_str()).collect();
        match &self.shape {
            Shape::Arrow {
                start_binding,
                end_binding,
                ..
            } => {
                targets.extend(start_binding.iter().map(|b| b.element_id.as_str()));
                targets.extend(end_binding.iter().map(|b| b.element_id.as_str()));
            }
            Shape::Text {
                container_id: Some(container),
                ..
            } => targets.push(container.as_str()),
            _ => {}
        }
        targets
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}
