//! JSON-serializable stage outputs. Field names match the external
//! interface contract exactly; `serde_json`'s default map type is
//! `BTreeMap`-backed, so any `serde_json::Value` built from these structs
//! serializes with sorted object keys, which is what content hashing over
//! these artifacts requires.

use serde::Serialize;

use crate::metrics::Totals;
use crate::pipeline::door_assignment::DoorAssignment;
use crate::pipeline::door_bridge::{Bridge, DoorBridgeRecord};
use crate::pipeline::{Orientation, WallCandidate, WallRectangle};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointXY {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for PointXY {
    fn from(p: (f64, f64)) -> Self {
        Self { x: p.0, y: p.1 }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SegmentPoints {
    pub p1: PointXY,
    pub p2: PointXY,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RectBounds {
    #[serde(rename = "minX")]
    pub min_x: f64,
    #[serde(rename = "minY")]
    pub min_y: f64,
    #[serde(rename = "maxX")]
    pub max_x: f64,
    #[serde(rename = "maxY")]
    pub max_y: f64,
}

impl RectBounds {
    pub fn from_minmax(min: (f64, f64), max: (f64, f64)) -> Self {
        Self { min_x: min.0, min_y: min.1, max_x: max.0, max_y: max.1 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PairRecord {
    pub pair_id: String,
    #[serde(rename = "sourceLineIdA")]
    pub source_line_id_a: String,
    #[serde(rename = "sourceLineIdB")]
    pub source_line_id_b: String,
    #[serde(rename = "trimmedSegmentA")]
    pub trimmed_segment_a: SegmentPoints,
    #[serde(rename = "trimmedSegmentB")]
    pub trimmed_segment_b: SegmentPoints,
    pub distance: f64,
    pub distance_cm: f64,
    pub quad_corners: [PointXY; 4],
    pub bounding_rectangle: RectBounds,
}

impl From<&WallCandidate> for PairRecord {
    fn from(c: &WallCandidate) -> Self {
        Self {
            pair_id: c.pair_id.clone(),
            source_line_id_a: c.source_line_id_a.to_string(),
            source_line_id_b: c.source_line_id_b.to_string(),
            trimmed_segment_a: SegmentPoints { p1: c.trimmed_a.0.into(), p2: c.trimmed_a.1.into() },
            trimmed_segment_b: SegmentPoints { p1: c.trimmed_b.0.into(), p2: c.trimmed_b.1.into() },
            distance: c.distance_mm,
            distance_cm: c.distance_cm(),
            quad_corners: c.quad.corners.map(PointXY::from),
            bounding_rectangle: RectBounds::from_minmax(c.quad.min(), c.quad.max()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PairsArtifact {
    pub pairs: Vec<PairRecord>,
    pub algorithm_config: AlgorithmConfigSummary,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmConfigSummary {
    pub eps_mm: f64,
    pub stage_b_min_cm: f64,
    pub stage_b_max_cm: f64,
    pub parallel_angular_tolerance_deg: f64,
}

impl From<&crate::config::PipelineConfig> for AlgorithmConfigSummary {
    fn from(cfg: &crate::config::PipelineConfig) -> Self {
        Self {
            eps_mm: cfg.eps_mm,
            stage_b_min_cm: cfg.stage_b_min_cm,
            stage_b_max_cm: cfg.stage_b_max_cm,
            parallel_angular_tolerance_deg: cfg.parallel_angular_tolerance_deg,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RectangleRecord {
    pub quad_corners: [PointXY; 4],
    pub bounding_rectangle: RectBounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "junction_type")]
    pub junction_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub junction_point: Option<[f64; 2]>,
}

impl From<&WallRectangle> for RectangleRecord {
    fn from(r: &WallRectangle) -> Self {
        Self {
            quad_corners: r.quad.corners.map(PointXY::from),
            bounding_rectangle: RectBounds::from_minmax(r.min(), r.max()),
            extended: Some(r.quad.extended),
            junction_type: r.quad.extended.then_some("L"),
            junction_point: r.quad.junction_point.map(|(x, y)| [x, y]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoorAssignmentRecord {
    #[serde(rename = "doorId")]
    pub door_id: String,
    #[serde(rename = "doorType")]
    pub door_type: String,
    #[serde(rename = "rectanglesCount")]
    pub rectangles_count: usize,
    #[serde(rename = "rectangleIndices")]
    pub rectangle_indices: Vec<usize>,
}

impl From<&DoorAssignment> for DoorAssignmentRecord {
    fn from(a: &DoorAssignment) -> Self {
        Self {
            door_id: a.door_id.clone(),
            door_type: "door".to_string(),
            rectangles_count: a.rectangles_count(),
            rectangle_indices: a.rectangle_indices.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeMeta {
    pub orientation: &'static str,
    #[serde(rename = "alignmentToleranceUsed")]
    pub alignment_tolerance_used: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeRecordJson {
    #[serde(rename = "bridgeRectangle")]
    pub bridge_rectangle: RectBounds,
    pub meta: BridgeMeta,
}

impl From<&Bridge> for BridgeRecordJson {
    fn from(b: &Bridge) -> Self {
        Self {
            bridge_rectangle: RectBounds::from_minmax(b.min, b.max),
            meta: BridgeMeta {
                orientation: match b.orientation {
                    Orientation::Horizontal => "H",
                    Orientation::Vertical => "V",
                },
                alignment_tolerance_used: b.alignment_tolerance_used,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoorBridgeArtifactEntry {
    #[serde(rename = "doorId")]
    pub door_id: String,
    pub bridges: Vec<BridgeRecordJson>,
    pub meta: DoorBridgeMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoorBridgeMeta {
    pub bridge_count: usize,
}

impl From<&DoorBridgeRecord> for DoorBridgeArtifactEntry {
    fn from(r: &DoorBridgeRecord) -> Self {
        Self {
            door_id: r.door_id.clone(),
            bridges: r.bridges.iter().map(BridgeRecordJson::from).collect(),
            meta: DoorBridgeMeta { bridge_count: r.bridges.len() },
        }
    }
}
