//! Tunable numeric contract for the pipeline.
//!
//! Every stage takes a `&PipelineConfig` instead of reaching for the
//! constants in [`crate::geom::kernel`] directly, so tests can probe
//! boundary behavior without recompiling. `Default` reproduces the
//! constants exactly.

use crate::geom::kernel as k;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub eps_mm: f64,
    pub eps_overlap_mm: f64,
    pub dedup_overlap_precision_mm: f64,
    pub stage_b_min_cm: f64,
    pub stage_b_max_cm: f64,
    pub parallel_angular_tolerance_deg: f64,
    pub stage_c_min_blocking_length_mm: f64,
    pub stage_d_containment_tol_mm: f64,
    pub stage_d_area_eps_mm2: f64,
    pub thickness_min_mm: f64,
    pub thickness_max_mm: f64,
    pub line_coord_tol_mm: f64,
    pub gap_tol_mm: f64,
    pub stage_f_angle_dot_tol: f64,
    pub stage_f_max_extension_mm: f64,
    pub stage_f_max_junction_distance_mm: f64,
    pub door_bbox_expand_mm: f64,
    pub door_bridge_alignment_tol_mm: f64,
    pub door_bridge_max_gap_mm: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            eps_mm: k::EPS_MM,
            eps_overlap_mm: k::EPS_OVERLAP_MM,
            dedup_overlap_precision_mm: k::DEDUP_OVERLAP_PRECISION_MM,
            stage_b_min_cm: k::STAGE_B_MIN_CM,
            stage_b_max_cm: k::STAGE_B_MAX_CM,
            parallel_angular_tolerance_deg: k::PARALLEL_ANGULAR_TOLERANCE_DEG,
            stage_c_min_blocking_length_mm: k::STAGE_C_MIN_BLOCKING_LENGTH_MM,
            stage_d_containment_tol_mm: k::STAGE_D_CONTAINMENT_TOL_MM,
            stage_d_area_eps_mm2: k::STAGE_D_AREA_EPS_MM2,
            thickness_min_mm: k::THICKNESS_MIN_MM,
            thickness_max_mm: k::THICKNESS_MAX_MM,
            line_coord_tol_mm: k::LINE_COORD_TOL_MM,
            gap_tol_mm: k::GAP_TOL_MM,
            stage_f_angle_dot_tol: k::STAGE_F_ANGLE_DOT_TOL,
            stage_f_max_extension_mm: k::STAGE_F_MAX_EXTENSION_MM,
            stage_f_max_junction_distance_mm: k::STAGE_F_MAX_JUNCTION_DISTANCE_MM,
            door_bbox_expand_mm: k::DOOR_BBOX_EXPAND_MM,
            door_bridge_alignment_tol_mm: k::DOOR_BRIDGE_ALIGNMENT_TOL_MM,
            door_bridge_max_gap_mm: k::DOOR_BRIDGE_MAX_GAP_MM,
        }
    }
}

impl PipelineConfig {
    /// Stage B's perpendicular-separation window, converted to millimeters.
    pub fn stage_b_window_mm(&self) -> (f64, f64) {
        (self.stage_b_min_cm * 10.0, self.stage_b_max_cm * 10.0)
    }

    /// `cos` of the parallel angular tolerance is not what the original
    /// uses; it tests `|cross| <= sin(tolerance)` on unit vectors.
    pub fn parallel_sin_tolerance(&self) -> f64 {
        self.parallel_angular_tolerance_deg.to_radians().sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_kernel_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.eps_mm, k::EPS_MM);
        assert_eq!(cfg.door_bridge_max_gap_mm, k::DOOR_BRIDGE_MAX_GAP_MM);
    }
}
