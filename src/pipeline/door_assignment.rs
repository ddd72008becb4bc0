//! Door-to-rectangle assignment: snaps each door's rotation to the nearest
//! multiple of 90°, derives its world AABB, expands it, and records every
//! Stage-F rectangle whose AABB overlaps.

use crate::config::PipelineConfig;
use crate::geom::kernel::aabb_intersects_strict;
use crate::model::Door;

use super::WallRectangle;

#[derive(Debug, Clone, PartialEq)]
pub struct DoorAssignment {
    pub door_id: String,
    pub rectangle_indices: Vec<usize>,
}

impl DoorAssignment {
    pub fn rectangles_count(&self) -> usize {
        self.rectangle_indices.len()
    }
}

/// Converts a raw rotation value to the nearest multiple of 90°, first
/// converting from grads if `|rot|` falls in `(360, 4000]`.
pub fn snap_rotation_deg(raw: f64) -> f64 {
    let deg = if raw.abs() > 360.0 && raw.abs() <= 4000.0 {
        raw * (360.0 / 4000.0)
    } else {
        raw
    };
    let normalized = deg.rem_euclid(360.0);
    ((normalized / 90.0).round() * 90.0).rem_euclid(360.0)
}

/// The door's world AABB: its local bounding box's four corners, rotated
/// by the snapped angle around the box centroid, then translated so the
/// centroid lands at the door's world position.
pub fn world_aabb(
    local_min: (f64, f64),
    local_max: (f64, f64),
    position: (f64, f64),
    snapped_deg: f64,
) -> ((f64, f64), (f64, f64)) {
    let cx = (local_min.0 + local_max.0) / 2.0;
    let cy = (local_min.1 + local_max.1) / 2.0;
    let theta = snapped_deg.to_radians();
    let (sin, cos) = theta.sin_cos();

    let corners = [
        (local_min.0, local_min.1),
        (local_max.0, local_min.1),
        (local_max.0, local_max.1),
        (local_min.0, local_max.1),
    ];

    let rotated: Vec<(f64, f64)> = corners
        .iter()
        .map(|&(x, y)| {
            let dx = x - cx;
            let dy = y - cy;
            (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
        })
        .collect();

    let translate = (position.0 - cx, position.1 - cy);
    let world: Vec<(f64, f64)> = rotated
        .iter()
        .map(|&(x, y)| (x + translate.0, y + translate.1))
        .collect();

    let min_x = world.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = world.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = world.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = world.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    ((min_x, min_y), (max_x, max_y))
}

pub fn run(doors: &[Door], rectangles: &[WallRectangle], cfg: &PipelineConfig) -> Vec<DoorAssignment> {
    doors
        .iter()
        .map(|door| {
            let snapped = snap_rotation_deg(door.rotation_raw);
            let local_min = (door.local_bbox.0.x, door.local_bbox.0.y);
            let local_max = (door.local_bbox.1.x, door.local_bbox.1.y);
            let (mut world_min, mut world_max) =
                world_aabb(local_min, local_max, door.position, snapped);
            world_min.0 -= cfg.door_bbox_expand_mm;
            world_min.1 -= cfg.door_bbox_expand_mm;
            world_max.0 += cfg.door_bbox_expand_mm;
            world_max.1 += cfg.door_bbox_expand_mm;

            let rectangle_indices: Vec<usize> = rectangles
                .iter()
                .enumerate()
                .filter(|(_, rect)| {
                    aabb_intersects_strict(world_min, world_max, rect.min(), rect.max())
                })
                .map(|(idx, _)| idx)
                .collect();

            DoorAssignment {
                door_id: door.id.clone(),
                rectangle_indices,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rotation_handles_grads() {
        assert_eq!(snap_rotation_deg(0.0), 0.0);
        assert_eq!(snap_rotation_deg(91.0), 90.0);
        assert_eq!(snap_rotation_deg(400.0), 0.0); // 400 grad -> 36deg -> snaps to 0
        assert_eq!(snap_rotation_deg(4000.0), 0.0); // 4000 grad -> 360deg -> 0
    }

    #[test]
    fn world_aabb_no_rotation_matches_local_translated() {
        let (min, max) = world_aabb((-10.0, -5.0), (10.0, 5.0), (100.0, 100.0), 0.0);
        assert!((min.0 - 90.0).abs() < 1e-9);
        assert!((max.0 - 110.0).abs() < 1e-9);
        assert!((min.1 - 95.0).abs() < 1e-9);
        assert!((max.1 - 105.0).abs() < 1e-9);
    }
}
