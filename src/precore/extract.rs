use crate::model::{Door, LayerStatsMap, PipelineInput, RawLine, RawPolyline, WindowOrDoor};

/// Everything collected from the drawing's selected layers plus the
/// separately-classified door list, before quantization and dedup.
#[derive(Debug, Clone, Default)]
pub struct ExtractedEntities {
    pub lines: Vec<(String, RawLine)>,
    pub polylines: Vec<(String, RawPolyline)>,
    pub doors: Vec<Door>,
}

/// Collects every LINE and POLYLINE on the selected layers, plus the
/// caller-classified door blocks, and tallies per-layer entity counts.
pub fn extract(input: &PipelineInput) -> (ExtractedEntities, LayerStatsMap) {
    let mut entities = ExtractedEntities::default();
    let mut stats: LayerStatsMap = LayerStatsMap::new();

    for name in &input.selected_layer_names {
        let Some(layer) = input.drawing.layer(name) else {
            tracing::warn!(layer = %name, "selected layer not present in drawing");
            continue;
        };
        let entry = stats.entry(layer.layer_name.clone()).or_default();
        entry.lines += layer.lines.len();
        entry.polylines += layer.polylines.len();
        entry.blocks += layer.blocks.len();
        for line in &layer.lines {
            entities.lines.push((layer.layer_name.clone(), line.clone()));
        }
        for pl in &layer.polylines {
            entities
                .polylines
                .push((layer.layer_name.clone(), pl.clone()));
        }
    }

    for (i, wdb) in input.window_door_blocks.iter().enumerate() {
        if wdb.window_or_door != WindowOrDoor::Door {
            continue;
        }
        let Some(bbox) = wdb.data.bounding_box else {
            tracing::warn!(index = i, "door block missing BoundingBox, skipping");
            continue;
        };
        entities.doors.push(Door {
            id: wdb
                .data
                .name
                .clone()
                .unwrap_or_else(|| format!("door_{i}")),
            position: (wdb.data.position.x, wdb.data.position.y),
            local_bbox: (bbox.min_point, bbox.max_point),
            rotation_raw: wdb.data.rotation.unwrap_or(0.0),
        });
    }

    (entities, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Drawing, Layer, RawBoundingBox, RawBlock, RawPoint, WindowDoorBlock};

    fn pt(x: f64, y: f64) -> RawPoint {
        RawPoint { x, y, z: 0.0 }
    }

    #[test]
    fn extract_skips_unselected_layers() {
        let input = PipelineInput {
            drawing: Drawing {
                layers: vec![
                    Layer {
                        layer_name: "A-WALL".into(),
                        lines: vec![RawLine { start: pt(0.0, 0.0), end: pt(1.0, 0.0) }],
                        polylines: vec![],
                        blocks: vec![],
                    },
                    Layer {
                        layer_name: "A-TEXT".into(),
                        lines: vec![RawLine { start: pt(5.0, 5.0), end: pt(6.0, 5.0) }],
                        polylines: vec![],
                        blocks: vec![],
                    },
                ],
            },
            selected_layer_names: vec!["A-WALL".into()],
            window_door_blocks: vec![],
        };
        let (entities, stats) = extract(&input);
        assert_eq!(entities.lines.len(), 1);
        assert!(stats.contains_key("A-WALL"));
        assert!(!stats.contains_key("A-TEXT"));
    }

    #[test]
    fn extract_collects_only_door_blocks() {
        let input = PipelineInput {
            drawing: Drawing { layers: vec![] },
            selected_layer_names: vec![],
            window_door_blocks: vec![
                WindowDoorBlock {
                    layer_name: "A-DOOR".into(),
                    entity_type: "BLOCK".into(),
                    window_or_door: WindowOrDoor::Door,
                    data: RawBlock {
                        position: pt(0.0, 0.0),
                        rotation: Some(0.0),
                        scale_x: None,
                        scale_y: None,
                        name: Some("D1".into()),
                        bounding_box: Some(RawBoundingBox {
                            min_point: pt(-50.0, -10.0),
                            max_point: pt(50.0, 10.0),
                        }),
                    },
                },
                WindowDoorBlock {
                    layer_name: "A-WIND".into(),
                    entity_type: "BLOCK".into(),
                    window_or_door: WindowOrDoor::Window,
                    data: RawBlock {
                        position: pt(100.0, 0.0),
                        rotation: None,
                        scale_x: None,
                        scale_y: None,
                        name: Some("W1".into()),
                        bounding_box: Some(RawBoundingBox {
                            min_point: pt(-20.0, -5.0),
                            max_point: pt(20.0, 5.0),
                        }),
                    },
                },
            ],
        };
        let (entities, _stats) = extract(&input);
        assert_eq!(entities.doors.len(), 1);
        assert_eq!(entities.doors[0].id, "D1");
    }
}
