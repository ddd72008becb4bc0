//! L-junction extension: near-perpendicular rectangle pairs are extended to
//! meet at a shared corner, closing the joint the way two butting walls
//! would in the original drawing.

use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::geom::kernel::line_line_intersection;
use crate::geom::quad::rect_distance;
use crate::geom::Quad;
use crate::metrics::StageMetrics;

use super::{infer_orientation, Orientation, WallRectangle};

struct WallRepr {
    c1: (f64, f64),
    c2: (f64, f64),
    u: (f64, f64),
    orientation: Orientation,
}

fn wall_repr(rect: &WallRectangle, cfg: &PipelineConfig) -> Option<WallRepr> {
    let min = rect.min();
    let max = rect.max();
    let dx = max.0 - min.0;
    let dy = max.1 - min.1;
    let orientation = infer_orientation(dx, dy, cfg.thickness_min_mm, cfg.thickness_max_mm, true)?;
    let mid_x = (min.0 + max.0) / 2.0;
    let mid_y = (min.1 + max.1) / 2.0;
    Some(match orientation {
        Orientation::Horizontal => WallRepr {
            c1: (min.0, mid_y),
            c2: (max.0, mid_y),
            u: (1.0, 0.0),
            orientation,
        },
        Orientation::Vertical => WallRepr {
            c1: (mid_x, min.1),
            c2: (mid_x, max.1),
            u: (0.0, 1.0),
            orientation,
        },
    })
}

struct Candidate {
    i: usize,
    j: usize,
    score: f64,
    junction: (f64, f64),
    extend_start_i: bool,
    extend_start_j: bool,
}

pub fn run(rectangles: &[WallRectangle], cfg: &PipelineConfig) -> (Vec<WallRectangle>, StageMetrics) {
    let mut metrics = StageMetrics::new(rectangles.len());
    let reprs: Vec<Option<WallRepr>> = rectangles.iter().map(|r| wall_repr(r, cfg)).collect();

    let mut candidates = Vec::new();
    for i in 0..rectangles.len() {
        let Some(ri) = &reprs[i] else { continue };
        for j in (i + 1)..rectangles.len() {
            let Some(rj) = &reprs[j] else { continue };
            if ri.orientation == rj.orientation {
                continue;
            }
            let dot = ri.u.0 * rj.u.0 + ri.u.1 * rj.u.1;
            if dot.abs() > cfg.stage_f_angle_dot_tol {
                continue;
            }
            let Some(x) = line_line_intersection(ri.c1, ri.c2, rj.c1, rj.c2) else {
                continue;
            };
            let dist_i = rect_distance(x, &rectangles[i].quad.bounding_rectangle);
            let dist_j = rect_distance(x, &rectangles[j].quad.bounding_rectangle);
            if dist_i > cfg.stage_f_max_junction_distance_mm
                || dist_j > cfg.stage_f_max_junction_distance_mm
            {
                continue;
            }
            let (ext_i, extend_start_i) = extension_length(x, ri);
            let (ext_j, extend_start_j) = extension_length(x, rj);
            if ext_i > cfg.stage_f_max_extension_mm || ext_j > cfg.stage_f_max_extension_mm {
                continue;
            }
            let angular_err = (90.0 - dot.abs().clamp(-1.0, 1.0).acos().to_degrees()).abs();
            let score = angular_err + ext_i + ext_j + dist_i + dist_j;
            candidates.push(Candidate {
                i,
                j,
                score,
                junction: x,
                extend_start_i,
                extend_start_j,
            });
        }
    }
    candidates.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap());

    let mut locked: HashSet<usize> = HashSet::new();
    let mut out: Vec<WallRectangle> = rectangles.to_vec();

    for c in candidates {
        if locked.contains(&c.i) || locked.contains(&c.j) {
            continue;
        }
        locked.insert(c.i);
        locked.insert(c.j);
        apply_extension(&mut out[c.i], reprs[c.i].as_ref().unwrap(), c.extend_start_i, c.junction);
        apply_extension(&mut out[c.j], reprs[c.j].as_ref().unwrap(), c.extend_start_j, c.junction);
    }

    metrics.record_output(out.len());
    (out, metrics)
}

/// Smaller of the two distances from `x`'s projection along `repr.u` to
/// each centerline endpoint, plus which end (`c1`, the "start") is nearer.
fn extension_length(x: (f64, f64), repr: &WallRepr) -> (f64, bool) {
    let along = |p: (f64, f64)| p.0 * repr.u.0 + p.1 * repr.u.1;
    let x_along = along(x);
    let to_c1 = (x_along - along(repr.c1)).abs();
    let to_c2 = (x_along - along(repr.c2)).abs();
    if to_c1 <= to_c2 {
        (to_c1, true)
    } else {
        (to_c2, false)
    }
}

fn apply_extension(rect: &mut WallRectangle, repr: &WallRepr, extend_start: bool, junction: (f64, f64)) {
    // Project the junction onto this rectangle's own center-line so the
    // extension stays axis-aligned even if upstream floating-point noise
    // nudged the two centerlines' intersection off either line.
    let x_prime = match repr.orientation {
        Orientation::Horizontal => junction.0,
        Orientation::Vertical => junction.1,
    };

    let min = rect.min();
    let max = rect.max();
    let corners = match repr.orientation {
        Orientation::Horizontal => {
            let (x0, x1) = if extend_start { (x_prime, max.0) } else { (min.0, x_prime) };
            [(x0, min.1), (x1, min.1), (x1, max.1), (x0, max.1)]
        }
        Orientation::Vertical => {
            let (y0, y1) = if extend_start { (x_prime, max.1) } else { (min.1, x_prime) };
            [(min.0, y0), (max.0, y0), (max.0, y1), (min.0, y1)]
        }
    };

    let mut quad = Quad::new(corners);
    quad.extended = true;
    quad.junction_point = Some(junction);
    rect.quad = quad;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_l_junction_extends_both_rectangles() {
        let horizontal = WallRectangle {
            quad: Quad::new([(0.0, 0.0), (1000.0, 0.0), (1000.0, 50.0), (0.0, 50.0)]),
        };
        let vertical = WallRectangle {
            quad: Quad::new([(0.0, 0.0), (50.0, 0.0), (50.0, 500.0), (0.0, 500.0)]),
        };
        let cfg = PipelineConfig::default();
        let (out, _) = run(&[horizontal, vertical], &cfg);
        assert!(out[0].quad.extended);
        assert!(out[1].quad.extended);
        assert!((out[0].min().0 - 25.0).abs() < 1.0);
    }

    #[test]
    fn parallel_rectangles_never_extend() {
        let a = WallRectangle {
            quad: Quad::new([(0.0, 0.0), (1000.0, 0.0), (1000.0, 50.0), (0.0, 50.0)]),
        };
        let b = WallRectangle {
            quad: Quad::new([(0.0, 100.0), (1000.0, 100.0), (1000.0, 150.0), (0.0, 150.0)]),
        };
        let cfg = PipelineConfig::default();
        let (out, _) = run(&[a, b], &cfg);
        assert!(!out[0].quad.extended);
        assert!(!out[1].quad.extended);
    }
}
