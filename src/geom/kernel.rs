//! 2D vector primitives and numeric contract shared by every pipeline stage.
//!
//! All distances are in millimeters. These constants are the single source
//! of truth for the tolerances named throughout `spec.md` §4.1; stage code
//! should reach for [`crate::config::PipelineConfig`] rather than these
//! constants directly so tests can probe boundary behavior, but the
//! `Default` of that config is exactly these values.

/// Strict on-segment / parallelism tolerance (mm).
pub const EPS_MM: f64 = 1e-3;
/// Overlap-interval emptiness tolerance (mm).
pub const EPS_OVERLAP_MM: f64 = 1e-2;
/// Rounding precision used by the Stage-B dedup key (mm).
pub const DEDUP_OVERLAP_PRECISION_MM: f64 = 0.1;
/// Minimum intersection length with a strip interior to count as blocking (mm).
pub const STAGE_C_MIN_BLOCKING_LENGTH_MM: f64 = 1.0;
/// Containment tolerance for Stage D's buffered-cover test (mm).
pub const STAGE_D_CONTAINMENT_TOL_MM: f64 = 0.1;
/// Minimum area difference for "A is strictly larger than B" (mm^2).
pub const STAGE_D_AREA_EPS_MM2: f64 = 1e-6;
/// Eligible wall-thickness window for Stage E/F orientation inference (mm).
pub const THICKNESS_MIN_MM: f64 = 20.0;
pub const THICKNESS_MAX_MM: f64 = 450.0;
/// Quantum for Stage E band-key perpendicular coordinates (mm).
pub const LINE_COORD_TOL_MM: f64 = 0.5;
/// Run-axis merge gap tolerance for Stage E (mm).
pub const GAP_TOL_MM: f64 = 1.0;
/// Stage F near-perpendicularity dot-product tolerance.
pub const STAGE_F_ANGLE_DOT_TOL: f64 = 0.3;
/// Stage F maximum extension length per rectangle (mm).
pub const STAGE_F_MAX_EXTENSION_MM: f64 = 300.0;
/// Stage F maximum junction-to-rectangle distance (mm).
pub const STAGE_F_MAX_JUNCTION_DISTANCE_MM: f64 = 400.0;
/// Door world-AABB expansion margin (mm).
pub const DOOR_BBOX_EXPAND_MM: f64 = 200.0;
/// Door-bridge alignment tolerance (mm).
pub const DOOR_BRIDGE_ALIGNMENT_TOL_MM: f64 = 50.0;
/// Door-bridge maximum gap (mm).
pub const DOOR_BRIDGE_MAX_GAP_MM: f64 = 2000.0;
/// Stage B/Stage-C parallel-pair direction tolerance (degrees). Canonical
/// for the pipeline per `spec.md` §9 (the source's other, looser 5°/10°
/// tolerances are not used here).
pub const PARALLEL_ANGULAR_TOLERANCE_DEG: f64 = 2.0;
/// Stage B perpendicular-separation window, expressed in cm as in the spec.
pub const STAGE_B_MIN_CM: f64 = 1.0;
pub const STAGE_B_MAX_CM: f64 = 45.0;

/// Convert centimeters to internal millimeters (single source of truth).
#[inline]
pub fn cm_to_mm(cm: f64) -> f64 {
    cm * 10.0
}

#[inline]
pub fn dot2(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

#[inline]
pub fn cross2(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

#[inline]
pub fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Normalizes a 2D vector; returns `(0.0, 0.0)` for a zero-length input.
#[inline]
pub fn normalize2(v: (f64, f64)) -> (f64, f64) {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    if len <= 0.0 {
        (0.0, 0.0)
    } else {
        (v.0 / len, v.1 / len)
    }
}

/// Unit vector perpendicular to `u` (rotated +90°).
#[inline]
pub fn perp(u: (f64, f64)) -> (f64, f64) {
    normalize2((-u.1, u.0))
}

/// Distance from a point to the segment `(s1, s2)`.
pub fn point_to_segment_distance(p: (f64, f64), s1: (f64, f64), s2: (f64, f64)) -> f64 {
    let d = (s2.0 - s1.0, s2.1 - s1.1);
    let len_sq = d.0 * d.0 + d.1 * d.1;
    if len_sq <= 0.0 {
        return dist2(p, s1);
    }
    let t = (dot2((p.0 - s1.0, p.1 - s1.1), d) / len_sq).clamp(0.0, 1.0);
    let q = (s1.0 + t * d.0, s1.1 + t * d.1);
    dist2(p, q)
}

/// Distance from a point to the infinite line through `(a, b)`.
pub fn point_to_line_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let d = (b.0 - a.0, b.1 - a.1);
    let len_sq = d.0 * d.0 + d.1 * d.1;
    if len_sq <= 0.0 {
        return dist2(p, a);
    }
    let t = dot2((p.0 - a.0, p.1 - a.1), d) / len_sq;
    let q = (a.0 + t * d.0, a.1 + t * d.1);
    dist2(p, q)
}

/// Projects a point onto the infinite line through `(a, b)`.
pub fn project_onto_line(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let d = (b.0 - a.0, b.1 - a.1);
    let len_sq = d.0 * d.0 + d.1 * d.1;
    if len_sq <= 0.0 {
        return a;
    }
    let t = dot2((p.0 - a.0, p.1 - a.1), d) / len_sq;
    (a.0 + t * d.0, a.1 + t * d.1)
}

/// Intersection of the infinite lines through `(a1, a2)` and `(b1, b2)`.
/// Returns `None` when the determinant's magnitude is below `1e-12`.
pub fn line_line_intersection(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> Option<(f64, f64)> {
    let denom = (a1.0 - a2.0) * (b1.1 - b2.1) - (a1.1 - a2.1) * (b1.0 - b2.0);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = ((a1.0 - b1.0) * (b1.1 - b2.1) - (a1.1 - b1.1) * (b1.0 - b2.0)) / denom;
    Some((a1.0 + t * (a2.0 - a1.0), a1.1 + t * (a2.1 - a1.1)))
}

/// Shortest Euclidean distance from a point to an axis-aligned rectangle
/// (0 if the point is inside).
pub fn point_to_aabb_distance(p: (f64, f64), min: (f64, f64), max: (f64, f64)) -> f64 {
    let dx = (min.0 - p.0).max(p.0 - max.0).max(0.0);
    let dy = (min.1 - p.1).max(p.1 - max.1).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// True if the two 1D intervals overlap (inclusive).
#[inline]
pub fn intervals_intersect(a: (f64, f64), b: (f64, f64)) -> bool {
    !(a.1 < b.0 || b.1 < a.0)
}

/// True if AABB `a` overlaps AABB `b` with strictly positive overlap on
/// both axes (the convention used by the door-assignment AABB test).
#[inline]
pub fn aabb_intersects_strict(
    a_min: (f64, f64),
    a_max: (f64, f64),
    b_min: (f64, f64),
    b_max: (f64, f64),
) -> bool {
    a_min.0 < b_max.0 && a_max.0 > b_min.0 && a_min.1 < b_max.1 && a_max.1 > b_min.1
}

/// Orders four corners by angle from their centroid, matching the
/// frontend/worker's shared `orderQuadCorners` convention.
pub fn order_corners_by_angle(mut corners: [(f64, f64); 4]) -> [(f64, f64); 4] {
    let cx = corners.iter().map(|c| c.0).sum::<f64>() / 4.0;
    let cy = corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
    corners.sort_by(|a, b| {
        let angle_a = (a.1 - cy).atan2(a.0 - cx);
        let angle_b = (b.1 - cy).atan2(b.0 - cx);
        angle_a.partial_cmp(&angle_b).unwrap()
    });
    corners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize2_zero_vector() {
        assert_eq!(normalize2((0.0, 0.0)), (0.0, 0.0));
    }

    #[test]
    fn point_to_segment_distance_clamps_to_endpoints() {
        let d = point_to_segment_distance((10.0, 0.0), (0.0, 0.0), (5.0, 0.0));
        assert!((d - 5.0).abs() < EPS_MM);
    }

    #[test]
    fn line_line_intersection_detects_parallel() {
        assert!(line_line_intersection((0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn line_line_intersection_orthogonal() {
        let x = line_line_intersection((0.0, 0.0), (10.0, 0.0), (5.0, -5.0), (5.0, 5.0)).unwrap();
        assert!((x.0 - 5.0).abs() < EPS_MM);
        assert!((x.1 - 0.0).abs() < EPS_MM);
    }
}
