//! Skeleton generator.
//!
//! Projects a 22-joint pose orthographically onto the canvas, draws one
//! circle per joint and one bound arrow per bone of the selected kinematic
//! tree.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{
    BoundElement, SceneBuilder, SceneDocument, SceneElement, SeedSource, TRANSPARENT,
};
use crate::error::{Result, ScenegenError};
use crate::generators::pose::{default_pose, parse_pose, Joint};
use crate::generators::{Tool, ToolMetadata};

const ORIGIN_X: f64 = 400.0;
const ORIGIN_Y: f64 = 400.0;
const STROKE_COLOR: &str = "#1e1e1e";
const JOINT_FILL: &str = "#ffffff";

/// Named set of joint chains; consecutive indices in a chain form a bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KinematicTree {
    pub name: &'static str,
    pub label: &'static str,
    pub chains: &'static [&'static [usize]],
}

const SMPL_CHAINS: &[&[usize]] = &[
    &[0, 3, 6, 9, 12, 15], // spine
    &[9, 13, 16, 18, 20],  // right arm
    &[9, 14, 17, 19, 21],  // left arm
    &[0, 1, 4, 7, 10],     // right leg
    &[0, 2, 5, 8, 11],     // left leg
];

pub const KINEMATIC_TREES: &[KinematicTree] = &[
    KinematicTree {
        name: "smpljoints",
        label: "SMPL Joints",
        chains: SMPL_CHAINS,
    },
    KinematicTree {
        name: "guoh3djoints",
        label: "GuoH3D Joints",
        chains: SMPL_CHAINS,
    },
];

impl KinematicTree {
    pub fn by_name(name: &str) -> Option<&'static KinematicTree> {
        KINEMATIC_TREES.iter().find(|t| t.name == name)
    }

    /// Number of bones across all chains.
    pub fn bone_count(&self) -> usize {
        self.chains.iter().map(|c| c.len().saturating_sub(1)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonConfiguration {
    pub kinematic_tree: String,
    pub show_joint_numbers: bool,
    /// `index,x,y,z` lines overriding the default pose.
    pub csv_data: Option<String>,
    pub joint_size: f64,
    pub scale: f64,
}

impl Default for SkeletonConfiguration {
    fn default() -> Self {
        Self {
            kinematic_tree: "smpljoints".to_string(),
            show_joint_numbers: true,
            csv_data: None,
            joint_size: 16.0,
            scale: 200.0,
        }
    }
}

impl SkeletonConfiguration {
    fn pose(&self) -> [Joint; crate::generators::JOINT_COUNT] {
        match self.csv_data.as_deref() {
            Some(text) if !text.trim().is_empty() => parse_pose(text),
            _ => default_pose(),
        }
    }

    fn project(&self, joint: &Joint) -> (f64, f64) {
        (ORIGIN_X + joint.x * self.scale, ORIGIN_Y - joint.y * self.scale)
    }
}

fn joint_id(index: usize) -> String {
    format!("joint_{}", index)
}

fn label_id(index: usize) -> String {
    format!("label_{}", index)
}

impl Tool for SkeletonConfiguration {
    const NAME: &'static str = "skeleton";

    fn metadata() -> ToolMetadata {
        ToolMetadata {
            name: Self::NAME,
            display_name: "Skeleton Tool",
            description: "Create and visualize 3D skeleton poses with kinematic trees.",
            category: "3D Graphics",
            path: "/skeleton",
            experimental: true,
        }
    }

    fn generate(&self, seeds: &mut dyn SeedSource) -> Result<SceneDocument> {
        let tree = KinematicTree::by_name(&self.kinematic_tree).ok_or_else(|| {
            ScenegenError::UnknownKinematicTree {
                name: self.kinematic_tree.clone(),
            }
        })?;
        let joints = self.pose();
        let positions: Vec<(f64, f64)> = joints.iter().map(|j| self.project(j)).collect();
        debug!(tree = tree.name, bones = tree.bone_count(), "generating skeleton");

        let mut attached: Vec<Vec<BoundElement>> = vec![Vec::new(); joints.len()];
        let mut scene = SceneBuilder::new("skeleton-generator", seeds);

        for (chain_index, chain) in tree.chains.iter().enumerate() {
            for (i, pair) in chain.windows(2).enumerate() {
                let (from, to) = (pair[0], pair[1]);
                let bone_id = format!("bone_{}_{}", chain_index, i);

                scene.push(
                    SceneElement::arrow(&bone_id, positions[from], positions[to])
                        .with_endpoints(joint_id(from), joint_id(to))
                        .with_stroke_color(STROKE_COLOR)
                        .with_stroke_width(3.0)
                        .with_roughness(0),
                );
                attached[from].push(BoundElement::arrow(&bone_id));
                attached[to].push(BoundElement::arrow(&bone_id));
            }
        }

        let size = self.joint_size;
        for (index, (x, y)) in positions.iter().copied().enumerate() {
            let mut circle = SceneElement::ellipse(joint_id(index), x - size / 2.0, y - size / 2.0, size, size)
                .with_stroke_color(STROKE_COLOR)
                .with_background(JOINT_FILL)
                .with_stroke_width(2.0)
                .with_roughness(0);
            circle.bound_elements = std::mem::take(&mut attached[index]);

            if !self.show_joint_numbers {
                scene.push(circle);
                continue;
            }

            scene.push(circle.with_bound(BoundElement::text(label_id(index))));
            scene.push(
                SceneElement::text(label_id(index), x - size / 4.0, y - size / 4.0, index.to_string(), size / 2.0)
                    .with_size(size / 2.0, size / 2.0)
                    .with_container(joint_id(index))
                    .with_stroke_color(STROKE_COLOR)
                    .with_background(TRANSPARENT)
                    .with_font_family(1)
                    .with_roughness(0),
            );
        }

        Ok(scene.finish())
    }

    fn history_name(&self) -> String {
        let has_csv = self
            .csv_data
            .as_deref()
            .map_or(false, |text| !text.trim().is_empty());
        format!(
            "Skeleton ({}) JS:{} Scale:{}{}{}",
            self.kinematic_tree,
            self.joint_size,
            self.scale,
            if self.show_joint_numbers { " +Numbers" } else { "" },
            if has_csv { " +CSV" } else { "" },
        )
    }
}
