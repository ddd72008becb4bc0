use super::extract::ExtractedEntities;
use crate::model::RawPoint;

/// Quantizes a coordinate to the nearest multiple of `eps`: `round(v/eps)*eps`.
#[inline]
pub fn quantize(v: f64, eps: f64) -> f64 {
    if eps <= 0.0 {
        return v;
    }
    (v / eps).round() * eps
}

fn quantize_point(p: RawPoint, eps: f64) -> RawPoint {
    RawPoint {
        x: quantize(p.x, eps),
        y: quantize(p.y, eps),
        z: quantize(p.z, eps),
    }
}

/// Quantizes every coordinate carried by the extracted entities in place.
/// Doors are left untouched: their geometry is resolved directly against the
/// drawing's raw coordinates per the door-assignment algorithm, not pre-core.
pub fn quantize_entities(entities: &mut ExtractedEntities, eps: f64) {
    for (_, line) in &mut entities.lines {
        line.start = quantize_point(line.start, eps);
        line.end = quantize_point(line.end, eps);
    }
    for (_, pl) in &mut entities.polylines {
        for v in &mut pl.vertices {
            *v = quantize_point(*v, eps);
        }
    }
}
