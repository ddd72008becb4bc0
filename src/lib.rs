//! Geometric inference of wall rectangles and door associations from 2D
//! architectural line drawings.
//!
//! The pipeline runs as a fixed sequence of pure stages — extract/
//! normalize/dedup, then Stage B through Stage F, then door assignment and
//! door bridging — each a function from one artifact to the next with no
//! shared mutable state. See [`run_pipeline`] for the single entry point.

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geom;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod precore;

use serde::Serialize;

use config::PipelineConfig;
use metrics::{StageMetrics, Totals};
use model::PipelineInput;

/// Every artifact produced by one end-to-end pipeline run, one field per
/// stage, ready for serialization.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub wall_candidate_pairs_b: artifacts::PairsArtifact,
    pub logic_c_pairs: Vec<artifacts::PairRecord>,
    pub logic_d_rectangles: Vec<artifacts::PairRecord>,
    pub logic_e_rectangles: Vec<artifacts::RectangleRecord>,
    pub logic_f_rectangles: Vec<artifacts::RectangleRecord>,
    pub door_assignments: Vec<artifacts::DoorAssignmentRecord>,
    pub door_bridges: Vec<artifacts::DoorBridgeArtifactEntry>,
    pub stage_metrics: StageMetricsReport,
}

#[derive(Debug, Serialize)]
pub struct StageMetricsReport {
    pub stage_b: StageMetrics,
    pub stage_c: StageMetrics,
    pub stage_d: StageMetrics,
    pub stage_e: StageMetrics,
    pub stage_f: StageMetrics,
}

/// Runs the full pipeline over a single job's input and returns every
/// intermediate and final artifact. Never returns `Err` for malformed
/// geometry — invariant violations are logged and the offending item is
/// skipped; see [`error`] for the handful of conditions a caller can
/// match on directly.
pub fn run_pipeline(input: &PipelineInput, cfg: &PipelineConfig) -> PipelineOutput {
    let (lines, doors, _layer_stats) = precore::run(input, cfg);

    let (candidates_b, metrics_b) = pipeline::stage_b::run(&lines, cfg);
    let (candidates_c, metrics_c) = pipeline::stage_c::run(&candidates_b, &lines, cfg);
    let (candidates_d, metrics_d) = pipeline::stage_d::run(&candidates_c, cfg);
    let (rectangles_e, metrics_e) = pipeline::stage_e::run(&candidates_d, cfg);
    let (rectangles_f, metrics_f) = pipeline::stage_f::run(&rectangles_e, cfg);

    let door_assignments = pipeline::door_assignment::run(&doors, &rectangles_f, cfg);
    let door_centers: Vec<(f64, f64)> = doors.iter().map(|d| d.position).collect();
    let door_bridges =
        pipeline::door_bridge::run(&door_assignments, &door_centers, &rectangles_f, cfg);

    let totals = Totals {
        lines_considered: lines.len(),
        pairs_emitted: candidates_b.len(),
        pairs_rejected: metrics_b.rejected_count,
    };

    PipelineOutput {
        wall_candidate_pairs_b: artifacts::PairsArtifact {
            pairs: candidates_b.iter().map(artifacts::PairRecord::from).collect(),
            algorithm_config: artifacts::AlgorithmConfigSummary::from(cfg),
            totals,
        },
        logic_c_pairs: candidates_c.iter().map(artifacts::PairRecord::from).collect(),
        logic_d_rectangles: candidates_d.iter().map(artifacts::PairRecord::from).collect(),
        logic_e_rectangles: rectangles_e.iter().map(artifacts::RectangleRecord::from).collect(),
        logic_f_rectangles: rectangles_f.iter().map(artifacts::RectangleRecord::from).collect(),
        door_assignments: door_assignments.iter().map(artifacts::DoorAssignmentRecord::from).collect(),
        door_bridges: door_bridges.iter().map(artifacts::DoorBridgeArtifactEntry::from).collect(),
        stage_metrics: StageMetricsReport {
            stage_b: metrics_b,
            stage_c: metrics_c,
            stage_d: metrics_d,
            stage_e: metrics_e,
            stage_f: metrics_f,
        },
    }
}
