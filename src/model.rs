//! External input contract: the drawing handed to the core by the job
//! runtime, plus the window/door block list collected separately by the
//! caller's layer-classification rule.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_z() -> f64 {
    0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_z")]
    pub z: f64,
}

impl From<RawPoint> for crate::geom::Point {
    fn from(p: RawPoint) -> Self {
        crate::geom::Point::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(rename = "Start")]
    pub start: RawPoint,
    #[serde(rename = "End")]
    pub end: RawPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPolyline {
    #[serde(rename = "Vertices")]
    pub vertices: Vec<RawPoint>,
    #[serde(rename = "IsClosed", default)]
    pub is_closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBoundingBox {
    #[serde(rename = "MinPoint")]
    pub min_point: RawPoint,
    #[serde(rename = "MaxPoint")]
    pub max_point: RawPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "Position")]
    pub position: RawPoint,
    #[serde(rename = "Rotation", default)]
    pub rotation: Option<f64>,
    #[serde(rename = "ScaleX", default)]
    pub scale_x: Option<f64>,
    #[serde(rename = "ScaleY", default)]
    pub scale_y: Option<f64>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "BoundingBox", default)]
    pub bounding_box: Option<RawBoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "LayerName")]
    pub layer_name: String,
    #[serde(rename = "Lines", default)]
    pub lines: Vec<RawLine>,
    #[serde(rename = "Polylines", default)]
    pub polylines: Vec<RawPolyline>,
    #[serde(rename = "Blocks", default)]
    pub blocks: Vec<RawBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub layers: Vec<Layer>,
}

impl Drawing {
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.layer_name == name)
    }
}

/// `window_or_door` tag on an externally-classified block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowOrDoor {
    Window,
    Door,
}

/// A block the caller has already classified as a window or door, supplied
/// alongside the drawing rather than discovered by layer name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDoorBlock {
    pub layer_name: String,
    #[serde(rename = "entity_type")]
    pub entity_type: String,
    pub window_or_door: WindowOrDoor,
    pub data: RawBlock,
}

/// Per-job input to the core: the drawing, the set of layers the caller has
/// selected to feed the pipeline, and the separately-classified door/window
/// block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInput {
    pub drawing: Drawing,
    pub selected_layer_names: Vec<String>,
    #[serde(default)]
    pub window_door_blocks: Vec<WindowDoorBlock>,
}

/// A door derived from a [`WindowDoorBlock`] tagged `Door`, carrying only
/// the fields the geometry stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub id: String,
    pub position: (f64, f64),
    pub local_bbox: (RawPoint, RawPoint),
    pub rotation_raw: f64,
}

/// Counts of entities collected per layer, mirroring the extract stage's
/// own bookkeeping in the original pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub lines: usize,
    pub polylines: usize,
    pub blocks: usize,
}

pub type LayerStatsMap = HashMap<String, LayerStats>;
