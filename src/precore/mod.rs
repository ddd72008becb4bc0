//! Pre-core stages: extract selected layers from the drawing, quantize
//! coordinates, and deduplicate by content hash into the canonical
//! line-like list Stage B and Stage C consume.

mod dedup;
mod extract;
mod normalize;

pub use dedup::dedup;
pub(crate) use dedup::content_hash;
pub use extract::{extract, ExtractedEntities};
pub use normalize::quantize;

use crate::config::PipelineConfig;
use crate::geom::LineLike;
use crate::model::{Door, LayerStatsMap, PipelineInput};

/// Runs extract → normalize → dedup end to end, producing the canonical
/// line-like list and door set fed to every downstream stage.
pub fn run(input: &PipelineInput, cfg: &PipelineConfig) -> (Vec<LineLike>, Vec<Door>, LayerStatsMap) {
    let (mut entities, stats) = extract::extract(input);
    normalize::quantize_entities(&mut entities, cfg.eps_mm);
    let lines = dedup::dedup(&entities, cfg.eps_mm);
    (lines, entities.doors, stats)
}
