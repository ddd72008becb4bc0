//! The geometric inference pipeline: Stage B through the door-bridge stage.
//! Each stage is a pure function from its input artifact to its output
//! artifact plus a [`crate::metrics::StageMetrics`] counter set; there is no
//! shared mutable state between stages.

pub mod door_assignment;
pub mod door_bridge;
pub mod stage_b;
pub mod stage_c;
pub mod stage_d;
pub mod stage_e;
pub mod stage_f;

use std::sync::Arc;

use crate::geom::Quad;

/// A Stage-B wall-band candidate: two trimmed parallel segments and the
/// quad spanning them. Carried unchanged in spirit through Stage C and
/// Stage D (which only ever remove candidates, never mutate their
/// geometry).
#[derive(Debug, Clone, PartialEq)]
pub struct WallCandidate {
    pub pair_id: String,
    pub source_line_id_a: Arc<str>,
    pub source_line_id_b: Arc<str>,
    pub trimmed_a: ((f64, f64), (f64, f64)),
    pub trimmed_b: ((f64, f64), (f64, f64)),
    pub quad: Quad,
    pub distance_mm: f64,
}

impl WallCandidate {
    pub fn distance_cm(&self) -> f64 {
        self.distance_mm / 10.0
    }
}

/// An axis-aligned wall rectangle as emitted by Stage E and refined by
/// Stage F. Pair provenance is intentionally dropped here: a Stage-E
/// rectangle may be the linear merge of several Stage-D survivors, so no
/// single source-line pair identifies it any more.
#[derive(Debug, Clone, PartialEq)]
pub struct WallRectangle {
    pub quad: Quad,
}

impl WallRectangle {
    pub fn min(&self) -> (f64, f64) {
        self.quad.min()
    }

    pub fn max(&self) -> (f64, f64) {
        self.quad.max()
    }
}

/// Orientation inferred for a rectangle by the shared thickness-window
/// test used by Stage E and Stage F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Infers orientation from a rectangle's axis-aligned extents using the
/// thickness window. When `allow_aspect_fallback` is set (Stage F, which
/// needs an orientation for every rectangle to form H/V junction
/// candidates) a rectangle whose thickness falls outside the window is
/// still classified by raw aspect ratio rather than left ineligible.
pub fn infer_orientation(
    dx: f64,
    dy: f64,
    thickness_min: f64,
    thickness_max: f64,
    allow_aspect_fallback: bool,
) -> Option<Orientation> {
    let h_fits = (thickness_min..=thickness_max).contains(&dy) && dx >= dy;
    let v_fits = (thickness_min..=thickness_max).contains(&dx) && dy > dx;
    match (h_fits, v_fits) {
        (true, true) => {
            if dy <= dx {
                Some(Orientation::Horizontal)
            } else {
                Some(Orientation::Vertical)
            }
        }
        (true, false) => Some(Orientation::Horizontal),
        (false, true) => Some(Orientation::Vertical),
        (false, false) if allow_aspect_fallback && (dx >= 1.0 || dy >= 1.0) => {
            Some(if dx >= dy {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            })
        }
        (false, false) => None,
    }
}
