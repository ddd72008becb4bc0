//! End-to-end scenarios run through the public `run_pipeline` entry point,
//! one per worked example in the wall/door inference contract.

use std::sync::Arc;

use wallinfer::config::PipelineConfig;
use wallinfer::geom::Quad;
use wallinfer::model::{
    Drawing, Layer, PipelineInput, RawBlock, RawBoundingBox, RawLine, RawPoint, WindowDoorBlock,
    WindowOrDoor,
};
use wallinfer::pipeline::{self, WallCandidate};

fn pt(x: f64, y: f64) -> RawPoint {
    RawPoint { x, y, z: 0.0 }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> RawLine {
    RawLine { start: pt(x1, y1), end: pt(x2, y2) }
}

fn input_with_lines(lines: Vec<RawLine>) -> PipelineInput {
    PipelineInput {
        drawing: Drawing {
            layers: vec![Layer {
                layer_name: "A-WALL".into(),
                lines,
                polylines: vec![],
                blocks: vec![],
            }],
        },
        selected_layer_names: vec!["A-WALL".into()],
        window_door_blocks: vec![],
    }
}

/// Repeated runs on identical input must be byte-identical, including
/// `pair_id` — it is content-derived, not a random UUID.
#[test]
fn repeated_runs_produce_identical_pair_ids() {
    let input = input_with_lines(vec![
        line(0.0, 0.0, 100.0, 0.0),
        line(20.0, 10.0, 80.0, 10.0),
    ]);
    let cfg = PipelineConfig::default();
    let first = wallinfer::run_pipeline(&input, &cfg);
    let second = wallinfer::run_pipeline(&input, &cfg);

    assert_eq!(first.wall_candidate_pairs_b.pairs.len(), 1);
    assert_eq!(
        first.wall_candidate_pairs_b.pairs[0].pair_id,
        second.wall_candidate_pairs_b.pairs[0].pair_id
    );
}

#[test]
fn s1_per_line_reconstruction_through_full_pipeline() {
    let input = input_with_lines(vec![
        line(0.0, 0.0, 100.0, 0.0),
        line(20.0, 10.0, 80.0, 10.0),
    ]);
    let cfg = PipelineConfig::default();
    let out = wallinfer::run_pipeline(&input, &cfg);

    assert_eq!(out.wall_candidate_pairs_b.pairs.len(), 1);
    let pair = &out.wall_candidate_pairs_b.pairs[0];
    assert!((pair.distance - 10.0).abs() < 1e-6);
    assert!((pair.trimmed_segment_a.p1.x - 20.0).abs() < 1e-6);
    assert!((pair.trimmed_segment_a.p2.x - 80.0).abs() < 1e-6);
    assert!((pair.bounding_rectangle.min_x - 20.0).abs() < 1e-6);
    assert!((pair.bounding_rectangle.max_x - 80.0).abs() < 1e-6);
}

#[test]
fn s2_distance_range_accept_and_reject() {
    let accepted = input_with_lines(vec![
        line(0.0, 0.0, 100.0, 0.0),
        line(0.0, 10.0, 100.0, 10.0),
    ]);
    let rejected = input_with_lines(vec![
        line(0.0, 0.0, 100.0, 0.0),
        line(0.0, 500.0, 100.0, 500.0),
    ]);
    let cfg = PipelineConfig::default();
    assert_eq!(wallinfer::run_pipeline(&accepted, &cfg).wall_candidate_pairs_b.pairs.len(), 1);
    assert_eq!(wallinfer::run_pipeline(&rejected, &cfg).wall_candidate_pairs_b.pairs.len(), 0);
}

fn band_candidate(id: &str, min: (f64, f64), max: (f64, f64)) -> WallCandidate {
    let quad = Quad::new([(min.0, min.1), (max.0, min.1), (max.0, max.1), (min.0, max.1)]);
    WallCandidate {
        pair_id: id.to_string(),
        source_line_id_a: Arc::from(format!("{id}_a")),
        source_line_id_b: Arc::from(format!("{id}_b")),
        trimmed_a: ((min.0, min.1), (max.0, min.1)),
        trimmed_b: ((min.0, max.1), (max.0, max.1)),
        quad,
        distance_mm: max.1 - min.1,
    }
}

/// Two concentric wall-band quads with coincident centers; Stage D is the
/// stage that resolves this (Stage C's blocking filter is a separate,
/// deliberately untriggered concern here — the candidates are fed straight
/// in, as the pipeline would after Stage C already cleared them).
#[test]
fn s3_concentric_bands_keep_outer_only() {
    let outer = band_candidate("outer", (-500.0, -25.0), (500.0, 25.0));
    let inner = band_candidate("inner", (-400.0, -15.0), (400.0, 15.0));
    let cfg = PipelineConfig::default();

    let (kept, _metrics) = pipeline::stage_d::run(&[outer, inner], &cfg);

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].pair_id, "outer");
}

#[test]
fn s4_band_merge_respects_gap_tolerance() {
    let input = input_with_lines(vec![
        line(0.0, 0.0, 400.0, 0.0),
        line(0.0, 50.0, 400.0, 50.0),
        line(400.0, 0.0, 800.0, 0.0),
        line(400.0, 50.0, 800.0, 50.0),
        line(850.0, 0.0, 1200.0, 0.0),
        line(850.0, 50.0, 1200.0, 50.0),
    ]);
    let cfg = PipelineConfig::default();
    let out = wallinfer::run_pipeline(&input, &cfg);

    let mut spans: Vec<(f64, f64)> = out
        .logic_e_rectangles
        .iter()
        .map(|r| (r.bounding_rectangle.min_x, r.bounding_rectangle.max_x))
        .collect();
    spans.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    assert_eq!(spans.len(), 2);
    assert!((spans[0].0 - 0.0).abs() < 1e-6);
    assert!((spans[0].1 - 800.0).abs() < 1e-6);
    assert!((spans[1].0 - 850.0).abs() < 1e-6);
    assert!((spans[1].1 - 1200.0).abs() < 1e-6);
}

#[test]
fn s5_l_junction_extends_both_rectangles() {
    let input = input_with_lines(vec![
        line(0.0, 0.0, 1000.0, 0.0),
        line(0.0, 50.0, 1000.0, 50.0),
        line(0.0, 0.0, 0.0, 500.0),
        line(50.0, 0.0, 50.0, 500.0),
    ]);
    let cfg = PipelineConfig::default();
    let out = wallinfer::run_pipeline(&input, &cfg);

    let extended: Vec<_> = out
        .logic_f_rectangles
        .iter()
        .filter(|r| r.extended == Some(true))
        .collect();
    assert_eq!(extended.len(), 2);
    let horizontal = extended
        .iter()
        .find(|r| r.bounding_rectangle.max_x - r.bounding_rectangle.min_x > 100.0)
        .expect("horizontal rectangle should be among the extended pair");
    assert!((horizontal.bounding_rectangle.min_x - 25.0).abs() < 1.0);
}

#[test]
fn s6_door_bridge_keeps_only_the_largest_aligned_pair() {
    let mut input = input_with_lines(vec![
        line(0.0, 0.0, 100.0, 0.0),
        line(0.0, 50.0, 100.0, 50.0),
        line(200.0, 0.0, 400.0, 0.0),
        line(200.0, 50.0, 400.0, 50.0),
    ]);
    input.window_door_blocks.push(WindowDoorBlock {
        layer_name: "A-DOOR".into(),
        entity_type: "BLOCK".into(),
        window_or_door: WindowOrDoor::Door,
        data: RawBlock {
            position: pt(100.0, 50.0),
            rotation: Some(0.0),
            scale_x: None,
            scale_y: None,
            name: Some("D1".into()),
            bounding_box: Some(RawBoundingBox {
                min_point: pt(-100.0, -50.0),
                max_point: pt(100.0, 50.0),
            }),
        },
    });

    let cfg = PipelineConfig::default();
    let out = wallinfer::run_pipeline(&input, &cfg);

    assert_eq!(out.door_bridges.len(), 1);
    let entry = &out.door_bridges[0];
    assert_eq!(entry.bridges.len(), 1);
    let bridge = &entry.bridges[0];
    assert!((bridge.bridge_rectangle.min_x - 100.0).abs() < 1e-6);
    assert!((bridge.bridge_rectangle.max_x - 200.0).abs() < 1e-6);
    assert!((bridge.bridge_rectangle.min_y - 0.0).abs() < 1e-6);
    assert!((bridge.bridge_rectangle.max_y - 50.0).abs() < 1e-6);
}
