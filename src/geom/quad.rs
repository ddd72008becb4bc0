use geo::{Area, LineString, Polygon, Rect};

use super::kernel::{
    dist2, dot2, order_corners_by_angle, point_to_aabb_distance, point_to_segment_distance,
};

/// A wall-candidate rectangle produced by Stage B and carried, mutated in
/// place, through Stages C–F.
///
/// `corners` is always kept in angle-from-centroid order (matching the
/// worker's `orderQuadCorners`), so `bounding_rectangle` can be recomputed
/// cheaply whenever corners move (Stage F extension).
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub corners: [(f64, f64); 4],
    pub bounding_rectangle: Rect<f64>,
    pub extended: bool,
    pub junction_point: Option<(f64, f64)>,
}

impl Quad {
    /// Builds a quad from four corners in `(A_start, A_end, B_end, B_start)`
    /// winding order, re-sorting them by angle and deriving the AABB.
    pub fn new(corners: [(f64, f64); 4]) -> Self {
        let corners = order_corners_by_angle(corners);
        Self {
            bounding_rectangle: bounds_of(&corners),
            corners,
            extended: false,
            junction_point: None,
        }
    }

    /// Recomputes `bounding_rectangle` after `corners` has been mutated.
    pub fn refresh_bounds(&mut self) {
        self.bounding_rectangle = bounds_of(&self.corners);
    }

    /// True polygon area via the shoelace formula, not the bounding box's
    /// `width * height` — a quad tilted by source-line trimming has a
    /// smaller true area than its AABB, and Stage D's containment ordering
    /// depends on the real value.
    pub fn area(&self) -> f64 {
        let ring = LineString::from(self.corners.to_vec());
        Polygon::new(ring, vec![]).unsigned_area()
    }

    pub fn min(&self) -> (f64, f64) {
        let p = self.bounding_rectangle.min();
        (p.x, p.y)
    }

    pub fn max(&self) -> (f64, f64) {
        let p = self.bounding_rectangle.max();
        (p.x, p.y)
    }

    /// True if this quad's AABB overlaps `other`'s (inclusive on both axes),
    /// the cheap pre-filter used before exact polygon tests.
    pub fn aabb_overlaps(&self, other: &Quad) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.0 <= b_max.0 && a_max.0 >= b_min.0 && a_min.1 <= b_max.1 && a_max.1 >= b_min.1
    }

    /// Distance from `p` to the nearest edge or interior point of this
    /// convex quadrilateral: `0.0` when `p` is inside or on the boundary,
    /// otherwise the minimum distance to any of its four edges.
    ///
    /// Exact for convex polygons; every quad this pipeline builds is convex
    /// (it is always a rectangle, possibly skewed by source-line trimming),
    /// so this stands in for a general point-in-polygon/buffer routine.
    pub fn distance_to_point(&self, p: (f64, f64)) -> f64 {
        if self.contains_point(p) {
            return 0.0;
        }
        (0..4)
            .map(|i| {
                let a = self.corners[i];
                let b = self.corners[(i + 1) % 4];
                point_to_segment_distance(p, a, b)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Even-odd point-in-polygon test over the ordered corners.
    pub fn contains_point(&self, p: (f64, f64)) -> bool {
        let mut inside = false;
        let n = self.corners.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.corners[i];
            let (xj, yj) = self.corners[j];
            if ((yi > p.1) != (yj > p.1))
                && (p.0 < (xj - xi) * (p.1 - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Whether this quad's buffered self (expanded outward by `tol`) covers
    /// `other` entirely — Stage D's containment test. Exact for convex
    /// polygons: `other` is covered iff every corner of `other` lies within
    /// `tol` of `self` (inside or within `tol` of an edge).
    pub fn covers_within_tolerance(&self, other: &Quad, tol: f64) -> bool {
        other
            .corners
            .iter()
            .all(|&c| self.contains_point(c) || self.distance_to_point(c) <= tol)
    }

    /// Shrinks this convex quad inward by `eps` along each edge's inward
    /// normal, returning `None` if the offset would collapse the polygon
    /// (used by Stage C to build the strip's "shrunk interior").
    pub fn shrink_interior(&self, eps: f64) -> Option<ShrunkQuad> {
        let cx = self.corners.iter().map(|c| c.0).sum::<f64>() / 4.0;
        let cy = self.corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
        let mut shrunk = [(0.0, 0.0); 4];
        for (i, &c) in self.corners.iter().enumerate() {
            let to_centroid = (cx - c.0, cy - c.1);
            let len = (to_centroid.0.powi(2) + to_centroid.1.powi(2)).sqrt();
            if len <= eps {
                return None;
            }
            let dir = (to_centroid.0 / len, to_centroid.1 / len);
            shrunk[i] = (c.0 + dir.0 * eps, c.1 + dir.1 * eps);
        }
        Some(ShrunkQuad { corners: shrunk })
    }
}

/// The inward-offset interior of a [`Quad`], used only for Stage C's
/// blocking-length test against other line-likes.
pub struct ShrunkQuad {
    corners: [(f64, f64); 4],
}

impl ShrunkQuad {
    fn contains_point(&self, p: (f64, f64)) -> bool {
        let mut inside = false;
        let n = self.corners.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.corners[i];
            let (xj, yj) = self.corners[j];
            if ((yi > p.1) != (yj > p.1))
                && (p.0 < (xj - xi) * (p.1 - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    fn edge_intersection(
        &self,
        p1: (f64, f64),
        p2: (f64, f64),
        a: (f64, f64),
        b: (f64, f64),
    ) -> Option<(f64, f64)> {
        let r = (p2.0 - p1.0, p2.1 - p1.1);
        let s = (b.0 - a.0, b.1 - a.1);
        let denom = dot2(r, (-s.1, s.0));
        if denom.abs() < 1e-12 {
            return None;
        }
        let qp = (a.0 - p1.0, a.1 - p1.1);
        let t = dot2(qp, (-s.1, s.0)) / denom;
        let u = dot2(qp, (-r.1, r.0)) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some((p1.0 + t * r.0, p1.1 + t * r.1))
        } else {
            None
        }
    }

    /// Length of the portion of segment `(p1, p2)` that lies within this
    /// shrunk interior (the Sutherland–Hodgman clip of a segment against a
    /// convex polygon, specialized to the two-endpoint case).
    pub fn clip_segment_length(&self, p1: (f64, f64), p2: (f64, f64)) -> f64 {
        let mut hits: Vec<(f64, (f64, f64))> = Vec::new();
        if self.contains_point(p1) {
            hits.push((0.0, p1));
        }
        if self.contains_point(p2) {
            hits.push((1.0, p2));
        }
        let n = self.corners.len();
        for i in 0..n {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % n];
            if let Some(x) = self.edge_intersection(p1, p2, a, b) {
                let len = dist2(p1, p2);
                let t = if len > 0.0 { dist2(p1, x) / len } else { 0.0 };
                hits.push((t, x));
            }
        }
        if hits.len() < 2 {
            return 0.0;
        }
        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let first = hits.first().unwrap().1;
        let last = hits.last().unwrap().1;
        dist2(first, last)
    }
}

fn bounds_of(corners: &[(f64, f64); 4]) -> Rect<f64> {
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners
        .iter()
        .map(|c| c.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners
        .iter()
        .map(|c| c.1)
        .fold(f64::NEG_INFINITY, f64::max);
    Rect::new((min_x, min_y), (max_x, max_y))
}

/// Distance from a point to an axis-aligned rectangle's nearest edge/corner.
#[inline]
pub fn rect_distance(p: (f64, f64), rect: &Rect<f64>) -> f64 {
    let min = rect.min();
    let max = rect.max();
    point_to_aabb_distance(p, (min.x, min.y), (max.x, max.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Quad {
        Quad::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn contains_point_inside_and_outside() {
        let q = unit_square();
        assert!(q.contains_point((0.5, 0.5)));
        assert!(!q.contains_point((2.0, 2.0)));
    }

    #[test]
    fn distance_to_point_zero_inside() {
        let q = unit_square();
        assert_eq!(q.distance_to_point((0.5, 0.5)), 0.0);
    }

    #[test]
    fn distance_to_point_outside_is_positive() {
        let q = unit_square();
        let d = q.distance_to_point((2.0, 0.5));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn covers_within_tolerance_identical_quad() {
        let a = unit_square();
        let b = unit_square();
        assert!(a.covers_within_tolerance(&b, 1e-6));
    }

    #[test]
    fn shrink_interior_collapses_on_large_eps() {
        let q = unit_square();
        assert!(q.shrink_interior(10.0).is_none());
        assert!(q.shrink_interior(0.1).is_some());
    }

    #[test]
    fn clip_segment_length_through_square() {
        let q = unit_square();
        let shrunk = q.shrink_interior(0.0).unwrap();
        let len = shrunk.clip_segment_length((-1.0, 0.5), (2.0, 0.5));
        assert!((len - 1.0).abs() < 1e-9);
    }

    #[test]
    fn area_is_true_polygon_area_not_bounding_box_area() {
        let q = unit_square();
        assert!((q.area() - 1.0).abs() < 1e-9);

        // A parallelogram skewed within its own AABB: true area is less
        // than the AABB's width*height.
        let skewed = Quad::new([(0.0, 0.0), (10.0, 0.0), (11.0, 1.0), (1.0, 1.0)]);
        let aabb_area = skewed.bounding_rectangle.width() * skewed.bounding_rectangle.height();
        assert!((skewed.area() - 10.0).abs() < 1e-9);
        assert!(skewed.area() < aabb_area - 1e-9);
    }
}
