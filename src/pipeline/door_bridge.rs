//! Door bridges: synthesized rectangles spanning the gap between two
//! aligned Stage-F rectangles assigned to the same door.

use crate::config::PipelineConfig;
use crate::geom::kernel::{dist2, intervals_intersect};

use super::door_assignment::DoorAssignment;
use super::{Orientation, WallRectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    pub min: (f64, f64),
    pub max: (f64, f64),
    pub orientation: Orientation,
    pub alignment_tolerance_used: f64,
}

impl Bridge {
    pub fn area(&self) -> f64 {
        (self.max.0 - self.min.0) * (self.max.1 - self.min.1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorBridgeRecord {
    pub door_id: String,
    pub bridges: Vec<Bridge>,
}

/// Bridge span plus the midline coordinate used to test alignment tolerance.
type BridgeSpan = ((f64, f64), (f64, f64), f64);

struct PairCandidate {
    group_key: (u8, i64),
    align_diff: f64,
    dist_from_door: f64,
    idx_sum: usize,
    bridge: Bridge,
}

fn bounds_center(min: (f64, f64), max: (f64, f64)) -> (f64, f64) {
    ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0)
}

fn span_or_overlap(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    if intervals_intersect(a, b) {
        (a.0.max(b.0), a.1.min(b.1))
    } else {
        (a.0.min(b.0), a.1.max(b.1))
    }
}

/// Horizontal bridge: gap along x between the inner edges of whichever
/// rectangle is further left/right.
fn compute_bridge_h(
    a_min: (f64, f64),
    a_max: (f64, f64),
    b_min: (f64, f64),
    b_max: (f64, f64),
) -> Option<BridgeSpan> {
    let ca = bounds_center(a_min, a_max);
    let cb = bounds_center(b_min, b_max);
    let (left_max, right_min) = if ca.0 <= cb.0 {
        (a_max.0, b_min.0)
    } else {
        (b_max.0, a_min.0)
    };
    let gap = right_min - left_max;
    if gap <= 0.0 {
        return None;
    }
    let (y_lo, y_hi) = span_or_overlap((a_min.1, a_max.1), (b_min.1, b_max.1));
    let mid_y = (y_lo + y_hi) / 2.0;
    Some(((left_max, y_lo), (right_min, y_hi), mid_y))
}

fn compute_bridge_v(
    a_min: (f64, f64),
    a_max: (f64, f64),
    b_min: (f64, f64),
    b_max: (f64, f64),
) -> Option<BridgeSpan> {
    let ca = bounds_center(a_min, a_max);
    let cb = bounds_center(b_min, b_max);
    let (bottom_max, top_min) = if ca.1 <= cb.1 {
        (a_max.1, b_min.1)
    } else {
        (b_max.1, a_min.1)
    };
    let gap = top_min - bottom_max;
    if gap <= 0.0 {
        return None;
    }
    let (x_lo, x_hi) = span_or_overlap((a_min.0, a_max.0), (b_min.0, b_max.0));
    let mid_x = (x_lo + x_hi) / 2.0;
    Some(((x_lo, bottom_max), (x_hi, top_min), mid_x))
}

pub fn run(
    assignments: &[DoorAssignment],
    door_centers: &[(f64, f64)],
    rectangles: &[WallRectangle],
    cfg: &PipelineConfig,
) -> Vec<DoorBridgeRecord> {
    assignments
        .iter()
        .zip(door_centers)
        .map(|(assignment, &door_center)| {
            DoorBridgeRecord {
                door_id: assignment.door_id.clone(),
                bridges: compute_door_bridges(assignment, door_center, rectangles, cfg),
            }
        })
        .collect()
}

fn compute_door_bridges(
    assignment: &DoorAssignment,
    door_center: (f64, f64),
    rectangles: &[WallRectangle],
    cfg: &PipelineConfig,
) -> Vec<Bridge> {
    let indices = &assignment.rectangle_indices;
    if indices.len() < 2 {
        return Vec::new();
    }
    let tol = cfg.door_bridge_alignment_tol_mm;

    let mut candidates: Vec<PairCandidate> = Vec::new();

    for ia in 0..indices.len() {
        for ib in (ia + 1)..indices.len() {
            let i = indices[ia];
            let j = indices[ib];
            let a_min = rectangles[i].min();
            let a_max = rectangles[i].max();
            let b_min = rectangles[j].min();
            let b_max = rectangles[j].max();
            let ca = bounds_center(a_min, a_max);
            let cb = bounds_center(b_min, b_max);
            let dcy = (ca.1 - cb.1).abs();
            let dcx = (ca.0 - cb.0).abs();

            let orientation = if dcy <= tol && dcx > tol {
                BridgeOrientation::Horizontal
            } else if dcx <= tol && dcy > tol {
                BridgeOrientation::Vertical
            } else if dcy <= tol && dcx <= tol {
                let h = compute_bridge_h(a_min, a_max, b_min, b_max);
                let v = compute_bridge_v(a_min, a_max, b_min, b_max);
                match (h, v) {
                    (Some((_, _, _)), Some((_, _, _))) => {
                        let h_gap = (b_min.0 - a_max.0).abs().min((a_min.0 - b_max.0).abs());
                        let v_gap = (b_min.1 - a_max.1).abs().min((a_min.1 - b_max.1).abs());
                        if h_gap <= v_gap {
                            BridgeOrientation::Horizontal
                        } else {
                            BridgeOrientation::Vertical
                        }
                    }
                    (Some(_), None) => BridgeOrientation::Horizontal,
                    (None, Some(_)) => BridgeOrientation::Vertical,
                    (None, None) => continue,
                }
            } else {
                continue;
            };

            let (bridge_min, bridge_max, perp, align_diff) = match orientation {
                BridgeOrientation::Horizontal => {
                    let Some((min, max, perp)) = compute_bridge_h(a_min, a_max, b_min, b_max) else {
                        continue;
                    };
                    if max.0 - min.0 > cfg.door_bridge_max_gap_mm {
                        continue;
                    }
                    (min, max, perp, dcy)
                }
                BridgeOrientation::Vertical => {
                    let Some((min, max, perp)) = compute_bridge_v(a_min, a_max, b_min, b_max) else {
                        continue;
                    };
                    if max.1 - min.1 > cfg.door_bridge_max_gap_mm {
                        continue;
                    }
                    (min, max, perp, dcx)
                }
            };

            let mid = bounds_center(bridge_min, bridge_max);
            let dist_from_door = dist2(door_center, mid);
            let line_key = (perp / 50.0).round() as i64;
            let orient_tag = match orientation {
                BridgeOrientation::Horizontal => 0u8,
                BridgeOrientation::Vertical => 1u8,
            };

            candidates.push(PairCandidate {
                group_key: (orient_tag, line_key),
                align_diff,
                dist_from_door,
                idx_sum: i + j,
                bridge: Bridge {
                    min: bridge_min,
                    max: bridge_max,
                    orientation: match orientation {
                        BridgeOrientation::Horizontal => Orientation::Horizontal,
                        BridgeOrientation::Vertical => Orientation::Vertical,
                    },
                    alignment_tolerance_used: tol,
                },
            });
        }
    }

    candidates.sort_by(|a, b| {
        a.group_key
            .cmp(&b.group_key)
            .then(a.align_diff.partial_cmp(&b.align_diff).unwrap())
            .then(a.dist_from_door.partial_cmp(&b.dist_from_door).unwrap())
            .then(a.idx_sum.cmp(&b.idx_sum))
    });

    let mut bridges: Vec<Bridge> = candidates.into_iter().map(|c| c.bridge).collect();

    if bridges.len() > 1 {
        let best = bridges
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.area().partial_cmp(&b.area()).unwrap())
            .map(|(idx, _)| idx)
            .unwrap();
        bridges = vec![bridges.remove(best)];
    }

    bridges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Quad;

    fn rect(min: (f64, f64), max: (f64, f64)) -> WallRectangle {
        WallRectangle {
            quad: Quad::new([min, (max.0, min.1), max, (min.0, max.1)]),
        }
    }

    #[test]
    fn s6_bridge_spans_gap_between_aligned_rectangles() {
        let rects = vec![
            rect((0.0, 0.0), (100.0, 50.0)),
            rect((200.0, 0.0), (400.0, 50.0)),
        ];
        let assignment = DoorAssignment {
            door_id: "D1".into(),
            rectangle_indices: vec![0, 1],
        };
        let cfg = PipelineConfig::default();
        let door_center = (100.0, 50.0);
        let bridges = compute_door_bridges(&assignment, door_center, &rects, &cfg);
        assert_eq!(bridges.len(), 1);
        let b = &bridges[0];
        assert!((b.min.0 - 100.0).abs() < 1e-6);
        assert!((b.max.0 - 200.0).abs() < 1e-6);
    }

    #[test]
    fn fewer_than_two_rectangles_yields_no_bridge() {
        let rects = vec![rect((0.0, 0.0), (100.0, 50.0))];
        let assignment = DoorAssignment {
            door_id: "D1".into(),
            rectangle_indices: vec![0],
        };
        let cfg = PipelineConfig::default();
        let bridges = compute_door_bridges(&assignment, (0.0, 0.0), &rects, &cfg);
        assert!(bridges.is_empty());
    }
}
