//! Containment pruning: a Stage-C survivor is dropped if another survivor's
//! buffered cover contains it entirely. Spatial candidates are narrowed
//! with a bulk-loaded R-tree over AABBs, the same pattern the rest of this
//! crate uses for indexed geometry lookups.

use geo::Rect;
use rstar::{RTreeObject, AABB};

use crate::config::PipelineConfig;
use crate::metrics::StageMetrics;

use super::WallCandidate;

/// An R-tree entry keyed by the candidate's bounding rectangle, carrying
/// its index back into the input slice.
struct Indexed {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for Indexed {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

pub fn run(candidates: &[WallCandidate], cfg: &PipelineConfig) -> (Vec<WallCandidate>, StageMetrics) {
    let mut metrics = StageMetrics::new(candidates.len());

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[a]
            .quad
            .area()
            .partial_cmp(&candidates[b].quad.area())
            .unwrap()
    });

    let entries: Vec<Indexed> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| Indexed {
            idx,
            bbox: c.quad.bounding_rectangle,
        })
        .collect();
    let tree = rstar::RTree::bulk_load(entries);

    let mut contained = vec![false; candidates.len()];

    for &b_idx in &order {
        let b = &candidates[b_idx];
        let b_min = b.quad.min();
        let b_max = b.quad.max();
        let envelope = AABB::from_corners(
            [b_min.0 - f64::EPSILON, b_min.1 - f64::EPSILON],
            [b_max.0 + f64::EPSILON, b_max.1 + f64::EPSILON],
        );
        for candidate_entry in tree.locate_in_envelope_intersecting(&envelope) {
            let a_idx = candidate_entry.idx;
            if a_idx == b_idx {
                continue;
            }
            let a = &candidates[a_idx];
            if a.quad.area() <= b.quad.area() + cfg.stage_d_area_eps_mm2 {
                continue;
            }
            let a_min = a.quad.min();
            let a_max = a.quad.max();
            let aabb_covers = a_min.0 <= b_min.0
                && a_min.1 <= b_min.1
                && a_max.0 >= b_max.0
                && a_max.1 >= b_max.1;
            if !aabb_covers {
                continue;
            }
            if a.quad.covers_within_tolerance(&b.quad, cfg.stage_d_containment_tol_mm) {
                contained[b_idx] = true;
                break;
            }
        }
    }

    let out: Vec<WallCandidate> = candidates
        .iter()
        .enumerate()
        .filter(|(idx, _)| !contained[*idx])
        .map(|(_, c)| c.clone())
        .collect();

    metrics.record_rejected(contained.iter().filter(|&&c| c).count());
    metrics.record_output(out.len());
    (out, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Quad;
    use std::sync::Arc;

    fn candidate(id: &str, corners: [(f64, f64); 4]) -> WallCandidate {
        WallCandidate {
            pair_id: id.into(),
            source_line_id_a: Arc::from(format!("{id}A").as_str()),
            source_line_id_b: Arc::from(format!("{id}B").as_str()),
            trimmed_a: (corners[0], corners[1]),
            trimmed_b: (corners[3], corners[2]),
            quad: Quad::new(corners),
            distance_mm: 10.0,
        }
    }

    #[test]
    fn s3_concentric_quads_keep_outer_only() {
        let outer = candidate(
            "outer",
            [(-500.0, -25.0), (500.0, -25.0), (500.0, 25.0), (-500.0, 25.0)],
        );
        let inner = candidate(
            "inner",
            [(-400.0, -15.0), (400.0, -15.0), (400.0, 15.0), (-400.0, 15.0)],
        );
        let cfg = PipelineConfig::default();
        let (out, metrics) = run(&[outer.clone(), inner], &cfg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pair_id, "outer");
        assert_eq!(metrics.rejected_count, 1);
    }

    /// A tilted outer band (quad.area() != bounding_rectangle area) must
    /// still correctly contain the inner band: containment decisions use
    /// the quad's true polygon area, not its AABB's width*height.
    #[test]
    fn s3_variant_tilted_outer_band_still_contains_inner() {
        let outer = candidate(
            "outer",
            [(-500.0, -25.0), (500.0, -25.0), (500.0, 26.0), (-500.0, 24.0)],
        );
        let inner = candidate(
            "inner",
            [(-400.0, -15.0), (400.0, -15.0), (400.0, 15.0), (-400.0, 15.0)],
        );
        let outer_aabb_area = outer.quad.bounding_rectangle.width() * outer.quad.bounding_rectangle.height();
        assert!(outer.quad.area() < outer_aabb_area);

        let cfg = PipelineConfig::default();
        let (out, metrics) = run(&[outer, inner], &cfg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pair_id, "outer");
        assert_eq!(metrics.rejected_count, 1);
    }

    #[test]
    fn disjoint_quads_both_survive() {
        let a = candidate(
            "a",
            [(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0)],
        );
        let b = candidate(
            "b",
            [(200.0, 0.0), (300.0, 0.0), (300.0, 10.0), (200.0, 10.0)],
        );
        let cfg = PipelineConfig::default();
        let (out, _) = run(&[a, b], &cfg);
        assert_eq!(out.len(), 2);
    }
}
