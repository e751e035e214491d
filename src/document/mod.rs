//! Scene Document Model
//!
//! The portable envelope every generator emits: a document type tag, a
//! format version, the producing generator, the ordered element list, view
//! state and (always empty) attachments.

mod element;
mod seed;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScenegenError};

pub use element::{
    BoundElement, BoundKind, FillStyle, PointBinding, Roundness, SceneElement, Shape, StrokeStyle,
    DEFAULT_STROKE, TRANSPARENT,
};
pub use seed::{RandomSeeds, SeedSource, SequentialSeeds, SEED_RANGE};

/// Document type tag understood by the drawing host.
pub const DOCUMENT_TYPE: &str = "excalidraw";

/// Scene format version emitted by every generator.
pub const DOCUMENT_VERSION: u32 = 2;

/// Canvas background colour.
pub const VIEW_BACKGROUND: &str = "#ffffff";

/// Host-side view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view_background_color: String,
    pub grid_size: Option<u32>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_background_color: VIEW_BACKGROUND.to_string(),
            grid_size: None,
        }
    }
}

/// A complete scene ready for hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    #[serde(rename = "version")]
    pub schema_version: u32,
    pub source: String,
    pub elements: Vec<SceneElement>,
    #[serde(rename = "appState")]
    pub view_state: ViewState,
    #[serde(rename = "files")]
    pub attachments: Map<String, Value>,
}

impl SceneDocument {
    /// Document with no elements.
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            document_type: DOCUMENT_TYPE.to_string(),
            schema_version: DOCUMENT_VERSION,
            source: source.into(),
            elements: Vec::new(),
            view_state: ViewState::default(),
            attachments: Map::new(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements of one shape kind, in document order.
    pub fn elements_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a SceneElement> + 'a {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    pub fn count_of(&self, kind: &str) -> usize {
        self.elements_of(kind).count()
    }

    /// Checks id uniqueness and that every binding resolves inside the document.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !ids.insert(element.id.as_str()) {
                return Err(ScenegenError::DocumentIntegrity {
                    reason: format!("duplicate element id '{}'", element.id),
                });
            }
        }

        for element in &self.elements {
            for target in element.binding_targets() {
                if !ids.contains(target) {
                    return Err(ScenegenError::DocumentIntegrity {
                        reason: format!(
                            "element '{}' references missing element '{}'",
                            element.id, target
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accumulates elements and stamps their cosmetic fields from a [`SeedSource`].
pub struct SceneBuilder<'a> {
    document: SceneDocument,
    seeds: &'a mut dyn SeedSource,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(source: impl Into<String>, seeds: &'a mut dyn SeedSource) -> Self {
        Self {
            document: SceneDocument::empty(source),
            seeds,
        }
    }

    pub fn push(&mut self, mut element: SceneElement) {
        element.seed = self.seeds.seed();
        element.version_nonce = self.seeds.version_nonce();
        element.updated = self.seeds.timestamp();
        self.document.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.document.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.elements.is_empty()
    }

    pub fn finish(self) -> SceneDocument {
        self.document
    }
}
