//! Strip-interior blocking filter: a Stage-B pair is rejected if some
//! other, approximately-parallel line-like crosses enough of the band's
//! shrunk interior to represent a real intervening wall rather than
//! legitimate joinery.

use crate::config::PipelineConfig;
use crate::geom::kernel::cross2;
use crate::geom::LineLike;
use crate::metrics::StageMetrics;

use super::WallCandidate;

pub fn run(
    candidates: &[WallCandidate],
    lines: &[LineLike],
    cfg: &PipelineConfig,
) -> (Vec<WallCandidate>, StageMetrics) {
    let mut metrics = StageMetrics::new(candidates.len());
    let mut out = Vec::new();

    for candidate in candidates {
        if is_blocked(candidate, lines, cfg) {
            metrics.record_rejected(1);
        } else {
            out.push(candidate.clone());
        }
    }
    metrics.record_output(out.len());
    (out, metrics)
}

fn is_blocked(candidate: &WallCandidate, lines: &[LineLike], cfg: &PipelineConfig) -> bool {
    let Some(shrunk) = candidate.quad.shrink_interior(cfg.eps_mm) else {
        return false;
    };
    let axis = {
        let (a1, a2) = candidate.trimmed_a;
        let dx = a2.0 - a1.0;
        let dy = a2.1 - a1.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            return false;
        }
        (dx / len, dy / len)
    };
    let sin_tol = cfg.parallel_sin_tolerance();

    for line in lines {
        if line.segment.id.as_ref() == candidate.source_line_id_a.as_ref()
            || line.segment.id.as_ref() == candidate.source_line_id_b.as_ref()
        {
            continue;
        }
        if !candidate_aabb_overlaps(candidate, line) {
            continue;
        }
        let dir = line.segment.direction();
        if dir == (0.0, 0.0) {
            continue;
        }
        if cross2(axis, dir).abs() > sin_tol && cross2(axis, (-dir.0, -dir.1)).abs() > sin_tol {
            continue;
        }
        let clipped = shrunk.clip_segment_length(line.segment.p1.xy(), line.segment.p2.xy());
        if clipped > cfg.stage_c_min_blocking_length_mm {
            return true;
        }
    }
    false
}

fn candidate_aabb_overlaps(candidate: &WallCandidate, line: &LineLike) -> bool {
    let (min, max) = (candidate.quad.min(), candidate.quad.max());
    let p1 = line.segment.p1.xy();
    let p2 = line.segment.p2.xy();
    let (lmin, lmax) = (
        (p1.0.min(p2.0), p1.1.min(p2.1)),
        (p1.0.max(p2.0), p1.1.max(p2.1)),
    );
    min.0 <= lmax.0 && max.0 >= lmin.0 && min.1 <= lmax.1 && max.1 >= lmin.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point, Quad, Segment};
    use std::sync::Arc;

    fn candidate() -> WallCandidate {
        WallCandidate {
            pair_id: "p".into(),
            source_line_id_a: Arc::from("A"),
            source_line_id_b: Arc::from("B"),
            trimmed_a: ((0.0, 0.0), (100.0, 0.0)),
            trimmed_b: ((0.0, 10.0), (100.0, 10.0)),
            quad: Quad::new([(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0)]),
            distance_mm: 10.0,
        }
    }

    fn line(id: &str, p1: (f64, f64), p2: (f64, f64)) -> LineLike {
        LineLike {
            segment: Segment::try_new(
                Arc::<str>::from(id),
                Point::new(p1.0, p1.1, 0.0),
                Point::new(p2.0, p2.1, 0.0),
            )
            .unwrap(),
            layer: Arc::from("A-WALL"),
        }
    }

    #[test]
    fn parallel_crossing_line_blocks() {
        let c = candidate();
        let cfg = PipelineConfig::default();
        let blocker = line("C", (50.0, -5.0), (50.0, 15.0));
        // blocker is perpendicular, should NOT block (only parallel blocks)
        assert!(!is_blocked(&c, &[blocker], &cfg));

        let blocker_parallel = line("D", (40.0, 5.0), (60.0, 5.0));
        assert!(is_blocked(&c, &[blocker_parallel], &cfg));
    }

    #[test]
    fn excludes_source_lines() {
        let c = candidate();
        let cfg = PipelineConfig::default();
        let self_a = line("A", (0.0, 0.0), (100.0, 0.0));
        assert!(!is_blocked(&c, &[self_a], &cfg));
    }
}
