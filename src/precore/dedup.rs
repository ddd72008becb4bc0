use std::collections::HashSet;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::extract::ExtractedEntities;
use crate::geom::{LineLike, Point, Segment};
use crate::model::{RawLine, RawPolyline};

/// Deterministic sha256-hex id for a piece of content, shared with Stage B
/// for content-derived pair ids so repeated runs on identical input are
/// byte-identical.
pub(crate) fn content_hash(layer: &str, kind: &str, coords: &serde_json::Value) -> String {
    let canonical = serde_json::to_string(coords).expect("coords serialize");
    let payload = format!("{layer}|{kind}|{canonical}");
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

fn line_coords(line: &RawLine) -> serde_json::Value {
    serde_json::json!([[line.start.x, line.start.y, line.start.z], [line.end.x, line.end.y, line.end.z]])
}

fn polyline_coords(pl: &RawPolyline) -> serde_json::Value {
    serde_json::json!({
        "vertices": pl.vertices.iter().map(|v| [v.x, v.y, v.z]).collect::<Vec<_>>(),
        "is_closed": pl.is_closed,
    })
}

/// Deduplicates extracted LINE and POLYLINE entities by content hash (first
/// occurrence by input order wins), then expands survivors into the flat
/// line-like list: LINEs pass through as-is, polyline edges become virtual
/// lines with id `<polyline_hash>_seg_<i>`.
pub fn dedup(entities: &ExtractedEntities, _eps: f64) -> Vec<LineLike> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (layer, line) in &entities.lines {
        let hash = content_hash(layer, "line", &line_coords(line));
        if !seen.insert(hash.clone()) {
            continue;
        }
        let p1 = Point::from(line.start);
        let p2 = Point::from(line.end);
        if let Some(seg) = Segment::try_new(Arc::<str>::from(hash.as_str()), p1, p2) {
            out.push(LineLike { segment: seg, layer: Arc::from(layer.as_str()) });
        }
    }

    for (layer, pl) in &entities.polylines {
        let hash = content_hash(layer, "polyline", &polyline_coords(pl));
        if !seen.insert(hash.clone()) {
            continue;
        }
        let n = pl.vertices.len();
        if n < 2 {
            continue;
        }
        let edge_count = if pl.is_closed { n } else { n - 1 };
        for i in 0..edge_count {
            let a = pl.vertices[i];
            let b = pl.vertices[(i + 1) % n];
            let id = format!("{hash}_seg_{i}");
            if let Some(seg) = Segment::try_new(id, Point::from(a), Point::from(b)) {
                out.push(LineLike { segment: seg, layer: Arc::from(layer.as_str()) });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawPoint;

    fn pt(x: f64, y: f64) -> RawPoint {
        RawPoint { x, y, z: 0.0 }
    }

    #[test]
    fn duplicate_lines_collapse_to_one() {
        let line = RawLine { start: pt(0.0, 0.0), end: pt(1.0, 0.0) };
        let entities = ExtractedEntities {
            lines: vec![
                ("A".into(), line.clone()),
                ("A".into(), line.clone()),
            ],
            polylines: vec![],
            doors: vec![],
        };
        let out = dedup(&entities, 0.001);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn polyline_expands_to_edges_with_seg_suffix() {
        let pl = RawPolyline {
            vertices: vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)],
            is_closed: false,
        };
        let entities = ExtractedEntities {
            lines: vec![],
            polylines: vec![("A".into(), pl)],
            doors: vec![],
        };
        let out = dedup(&entities, 0.001);
        assert_eq!(out.len(), 2);
        assert!(out[0].segment.id.ends_with("_seg_0"));
        assert!(out[1].segment.id.ends_with("_seg_1"));
    }

    #[test]
    fn degenerate_segment_is_dropped() {
        let line = RawLine { start: pt(0.0, 0.0), end: pt(0.0, 0.0) };
        let entities = ExtractedEntities {
            lines: vec![("A".into(), line)],
            polylines: vec![],
            doors: vec![],
        };
        let out = dedup(&entities, 0.001);
        assert!(out.is_empty());
    }
}
