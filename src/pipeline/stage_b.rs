//! Parallel-pair enumeration with per-line overlap trimming.

use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::geom::kernel::{cross2, dot2, normalize2, point_to_segment_distance};
use crate::geom::{LineLike, Quad};
use crate::metrics::StageMetrics;

use super::WallCandidate;

/// Why a candidate pair did not reach output: an ordinary rejection
/// (failed a geometric criterion) or an on-segment invariant violation
/// (the reconstructed trim point fell off the source line, which the
/// trimming math should never produce).
#[derive(Debug)]
enum Rejection {
    Ordinary,
    InvariantViolation,
}

/// Runs Stage B over the canonical line-like list, emitting one
/// [`WallCandidate`] per accepted unordered pair.
pub fn run(lines: &[LineLike], cfg: &PipelineConfig) -> (Vec<WallCandidate>, StageMetrics) {
    let mut metrics = StageMetrics::new(lines.len());
    let mut out = Vec::new();
    let mut dedup_keys: HashSet<(String, String, i64, i64)> = HashSet::new();
    let (min_mm, max_mm) = cfg.stage_b_window_mm();
    let sin_tol = cfg.parallel_sin_tolerance();

    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let l1 = &lines[i];
            let l2 = &lines[j];
            match try_pair(l1, l2, cfg, min_mm, max_mm, sin_tol) {
                Ok((candidate, overlap_lo, overlap_hi)) => {
                    let key = dedup_key(
                        &candidate.source_line_id_a,
                        &candidate.source_line_id_b,
                        overlap_lo,
                        overlap_hi,
                        cfg.dedup_overlap_precision_mm,
                    );
                    if dedup_keys.insert(key) {
                        out.push(candidate);
                    } else {
                        metrics.record_rejected(1);
                    }
                }
                Err(Rejection::Ordinary) => metrics.record_rejected(1),
                Err(Rejection::InvariantViolation) => metrics.record_invariant_violation(),
            }
        }
    }
    metrics.record_output(out.len());
    (out, metrics)
}

fn dedup_key(
    id_a: &str,
    id_b: &str,
    overlap_lo: f64,
    overlap_hi: f64,
    precision: f64,
) -> (String, String, i64, i64) {
    let (id_min, id_max) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };
    (
        id_min.to_string(),
        id_max.to_string(),
        (overlap_lo / precision).round() as i64,
        (overlap_hi / precision).round() as i64,
    )
}

/// Content-derived pair id: a hash of the ordered source-line ids and the
/// rounded shared-axis overlap, so identical input yields byte-identical
/// ids across runs.
fn pair_id(id_a: &str, id_b: &str, overlap_lo: f64, overlap_hi: f64, precision: f64) -> String {
    let (id_min, id_max) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };
    let coords = serde_json::json!([
        id_min,
        id_max,
        (overlap_lo / precision).round() as i64,
        (overlap_hi / precision).round() as i64,
    ]);
    crate::precore::content_hash("stage_b", "pair", &coords)
}

fn try_pair(
    l1: &LineLike,
    l2: &LineLike,
    cfg: &PipelineConfig,
    min_mm: f64,
    max_mm: f64,
    sin_tol: f64,
) -> Result<(WallCandidate, f64, f64), Rejection> {
    let s1 = &l1.segment;
    let s2 = &l2.segment;

    let d1 = s1.direction();
    let d2_orig = s2.direction();
    if d1 == (0.0, 0.0) || d2_orig == (0.0, 0.0) {
        return Err(Rejection::Ordinary);
    }

    let flip = dot2(d1, d2_orig) < 0.0;
    let d2_hat = if flip { (-d2_orig.0, -d2_orig.1) } else { d2_orig };

    if cross2(d1, d2_hat).abs() > sin_tol {
        return Err(Rejection::Ordinary);
    }

    // Perpendicular separation, using L2's *original* (unflipped) direction.
    let sep = cross2(
        (s1.p1.x - s2.p1.x, s1.p1.y - s2.p1.y),
        d2_orig,
    )
    .abs();
    if sep < min_mm || sep > max_mm {
        return Err(Rejection::Ordinary);
    }

    let axis = normalize2((d1.0 + d2_hat.0, d1.1 + d2_hat.1));
    if axis == (0.0, 0.0) {
        return Err(Rejection::Ordinary);
    }
    let origin = s1.p1.xy();

    let project = |p: (f64, f64)| dot2((p.0 - origin.0, p.1 - origin.1), axis);

    let (s1_lo, s1_hi) = minmax(project(s1.p1.xy()), project(s1.p2.xy()));
    let (s2_lo, s2_hi) = minmax(project(s2.p1.xy()), project(s2.p2.xy()));

    let overlap_lo = s1_lo.max(s2_lo);
    let overlap_hi = s1_hi.min(s2_hi);
    if overlap_hi - overlap_lo <= cfg.eps_overlap_mm {
        return Err(Rejection::Ordinary);
    }

    // Per-line reconstruction: map the shared-axis overlap endpoints back
    // onto each line's own parameterization, never cross-projecting.
    let a_start_end = reconstruct(s1.p1.xy(), d1, origin, axis, overlap_lo, overlap_hi, s1.length(), cfg.eps_mm)
        .ok_or(Rejection::Ordinary)?;
    let b_start_end = reconstruct(s2.p1.xy(), d2_orig, origin, axis, overlap_lo, overlap_hi, s2.length(), cfg.eps_mm)
        .ok_or(Rejection::Ordinary)?;

    let (a_start, a_end) = a_start_end;
    let (b_start, b_end) = b_start_end;

    // On-segment invariant: the reconstructed trim points should always
    // land on their own source line; if not, the trimming math itself is
    // broken rather than the pair simply failing a geometric criterion.
    for p in [a_start, a_end] {
        if point_to_segment_distance(p, s1.p1.xy(), s1.p2.xy()) > cfg.eps_mm {
            tracing::warn!(line_a = %s1.id, "stage B on-segment invariant violated for A");
            return Err(Rejection::InvariantViolation);
        }
    }
    for p in [b_start, b_end] {
        if point_to_segment_distance(p, s2.p1.xy(), s2.p2.xy()) > cfg.eps_mm {
            tracing::warn!(line_b = %s2.id, "stage B on-segment invariant violated for B");
            return Err(Rejection::InvariantViolation);
        }
    }

    let quad = Quad::new([a_start, a_end, b_end, b_start]);
    let distance_mm = sep;

    let pair_id = pair_id(&s1.id, &s2.id, overlap_lo, overlap_hi, cfg.dedup_overlap_precision_mm);

    let candidate = WallCandidate {
        pair_id,
        source_line_id_a: s1.id.clone(),
        source_line_id_b: s2.id.clone(),
        trimmed_a: (a_start, a_end),
        trimmed_b: (b_start, b_end),
        quad,
        distance_mm,
    };
    Ok((candidate, overlap_lo, overlap_hi))
}

#[allow(clippy::too_many_arguments)]
fn reconstruct(
    own_origin: (f64, f64),
    own_dir: (f64, f64),
    shared_origin: (f64, f64),
    shared_axis: (f64, f64),
    overlap_lo: f64,
    overlap_hi: f64,
    length: f64,
    eps: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let denom = dot2(own_dir, shared_axis);
    if denom.abs() < 1e-12 {
        return None;
    }
    let point_at = |s: f64| -> (f64, f64) {
        (shared_origin.0 + s * shared_axis.0, shared_origin.1 + s * shared_axis.1)
    };
    let to_own_param = |world: (f64, f64)| -> f64 {
        dot2((world.0 - own_origin.0, world.1 - own_origin.1), own_dir)
    };

    let lo_world = point_at(overlap_lo);
    let hi_world = point_at(overlap_hi);

    let u_lo = to_own_param(lo_world).clamp(-eps, length + eps).clamp(0.0, length);
    let u_hi = to_own_param(hi_world).clamp(-eps, length + eps).clamp(0.0, length);

    let (u_lo, u_hi) = minmax(u_lo, u_hi);
    if u_hi - u_lo <= 0.0 {
        return None;
    }

    let start = (own_origin.0 + u_lo * own_dir.0, own_origin.1 + u_lo * own_dir.1);
    let end = (own_origin.0 + u_hi * own_dir.0, own_origin.1 + u_hi * own_dir.1);
    Some((start, end))
}

#[inline]
fn minmax(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
