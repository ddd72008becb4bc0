//! Band-based adjacency merge: eligible Stage-D survivors are grouped by
//! orientation and quantized perpendicular band, then linearly merged
//! along their run axis.

use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::geom::Quad;
use crate::metrics::StageMetrics;

use super::{infer_orientation, Orientation, WallCandidate, WallRectangle};

struct Eligible {
    orientation: Orientation,
    run_start: f64,
    run_end: f64,
    perp_min: f64,
    perp_max: f64,
}

pub fn run(candidates: &[WallCandidate], cfg: &PipelineConfig) -> (Vec<WallRectangle>, StageMetrics) {
    let mut metrics = StageMetrics::new(candidates.len());
    let mut out = Vec::new();
    let mut groups: BTreeMap<(u8, i64, i64), Vec<Eligible>> = BTreeMap::new();

    for candidate in candidates {
        let min = candidate.quad.min();
        let max = candidate.quad.max();
        let dx = max.0 - min.0;
        let dy = max.1 - min.1;
        match infer_orientation(dx, dy, cfg.thickness_min_mm, cfg.thickness_max_mm, false) {
            Some(orientation) => {
                let (perp_min, perp_max, run_start, run_end) = match orientation {
                    Orientation::Horizontal => (min.1, max.1, min.0, max.0),
                    Orientation::Vertical => (min.0, max.0, min.1, max.1),
                };
                let q = |v: f64| (v / cfg.line_coord_tol_mm).round() as i64;
                let band_key = (q(perp_min), q(perp_max));
                let orient_tag = match orientation {
                    Orientation::Horizontal => 0u8,
                    Orientation::Vertical => 1u8,
                };
                groups
                    .entry((orient_tag, band_key.0, band_key.1))
                    .or_default()
                    .push(Eligible {
                        orientation,
                        run_start,
                        run_end,
                        perp_min,
                        perp_max,
                    });
            }
            None => {
                out.push(WallRectangle {
                    quad: candidate.quad.clone(),
                });
            }
        }
    }

    for (_, mut members) in groups {
        members.sort_by(|a, b| a.run_start.partial_cmp(&b.run_start).unwrap());
        let orientation = members[0].orientation;
        let perp_min = members.iter().map(|m| m.perp_min).fold(f64::INFINITY, f64::min);
        let perp_max = members
            .iter()
            .map(|m| m.perp_max)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut cur_start = members[0].run_start;
        let mut cur_end = members[0].run_end;
        for m in members.iter().skip(1) {
            if m.run_start <= cur_end + cfg.gap_tol_mm {
                cur_end = cur_end.max(m.run_end);
            } else {
                out.push(build_rect(orientation, cur_start, cur_end, perp_min, perp_max));
                cur_start = m.run_start;
                cur_end = m.run_end;
            }
        }
        out.push(build_rect(orientation, cur_start, cur_end, perp_min, perp_max));
    }

    metrics.record_output(out.len());
    (out, metrics)
}

fn build_rect(orientation: Orientation, run_start: f64, run_end: f64, perp_min: f64, perp_max: f64) -> WallRectangle {
    let corners = match orientation {
        Orientation::Horizontal => [
            (run_start, perp_min),
            (run_end, perp_min),
            (run_end, perp_max),
            (run_start, perp_max),
        ],
        Orientation::Vertical => [
            (perp_min, run_start),
            (perp_min, run_end),
            (perp_max, run_end),
            (perp_max, run_start),
        ],
    };
    WallRectangle { quad: Quad::new(corners) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn candidate(corners: [(f64, f64); 4]) -> WallCandidate {
        WallCandidate {
            pair_id: "p".into(),
            source_line_id_a: Arc::from("A"),
            source_line_id_b: Arc::from("B"),
            trimmed_a: (corners[0], corners[1]),
            trimmed_b: (corners[3], corners[2]),
            quad: Quad::new(corners),
            distance_mm: 50.0,
        }
    }

    #[test]
    fn s4_merge_touching_runs_gap_exceeding_tolerance_not_merged() {
        let r1 = candidate([(0.0, 0.0), (400.0, 0.0), (400.0, 50.0), (0.0, 50.0)]);
        let r2 = candidate([(400.0, 0.0), (800.0, 0.0), (800.0, 50.0), (400.0, 50.0)]);
        let r3 = candidate([(850.0, 0.0), (1200.0, 0.0), (1200.0, 50.0), (850.0, 50.0)]);
        let cfg = PipelineConfig::default();
        let (out, _) = run(&[r1, r2, r3], &cfg);
        assert_eq!(out.len(), 2);
        let mut mins: Vec<f64> = out.iter().map(|r| r.min().0).collect();
        mins.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(mins[0], 0.0);
        assert_eq!(mins[1], 850.0);
        let merged = out.iter().find(|r| r.min().0 == 0.0).unwrap();
        assert_eq!(merged.max().0, 800.0);
    }

    #[test]
    fn ineligible_rectangle_passes_through() {
        // thickness 500mm is outside [20, 450] and aspect ratio doesn't save it (dx < dy)
        let r = candidate([(0.0, 0.0), (5.0, 0.0), (5.0, 500.0), (0.0, 500.0)]);
        let cfg = PipelineConfig::default();
        let (out, _) = run(&[r], &cfg);
        assert_eq!(out.len(), 1);
    }
}
