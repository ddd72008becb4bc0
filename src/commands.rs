use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use crate::cli::{Cli, RunArgs};
use crate::config::PipelineConfig;
use crate::model::{Drawing, PipelineInput, WindowDoorBlock};

/// Writes `value` as pretty JSON to `path`, via a temp file in the same
/// directory and an atomic rename, refusing to clobber an existing file
/// unless `force` is set.
fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T, force: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    if !force && path.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", path.display());
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    serde_json::to_writer_pretty(&mut tmp, value)
        .with_context(|| format!("serialize {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}

pub fn run(cli: &Cli, args: &RunArgs) -> Result<()> {
    if cli.verbose > 0 {
        eprintln!("[run] drawing={}", args.drawing.display());
        eprintln!("[run] layers={:?}", args.layers);
        eprintln!("[run] -> {}", args.out.display());
    }

    let drawing_raw = fs::read_to_string(&args.drawing)
        .with_context(|| format!("read {}", args.drawing.display()))?;
    let drawing: Drawing = serde_json::from_str(&drawing_raw)
        .with_context(|| format!("parse {} as drawing JSON", args.drawing.display()))?;

    let window_door_blocks: Vec<WindowDoorBlock> = match &args.window_door_blocks {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parse {} as window/door blocks", path.display()))?
        }
        None => Vec::new(),
    };

    let input = PipelineInput {
        drawing,
        selected_layer_names: args.layers.clone(),
        window_door_blocks,
    };

    let cfg = PipelineConfig::default();
    let output = crate::run_pipeline(&input, &cfg);

    write_json_atomic(&args.out.join("wall_candidate_pairs_b.json"), &output.wall_candidate_pairs_b, args.force)?;
    write_json_atomic(&args.out.join("logic_c_pairs.json"), &output.logic_c_pairs, args.force)?;
    write_json_atomic(&args.out.join("logic_d_rectangles.json"), &output.logic_d_rectangles, args.force)?;
    write_json_atomic(&args.out.join("logic_e_rectangles.json"), &output.logic_e_rectangles, args.force)?;
    write_json_atomic(&args.out.join("logic_f_rectangles.json"), &output.logic_f_rectangles, args.force)?;
    write_json_atomic(&args.out.join("door_assignments.json"), &output.door_assignments, args.force)?;
    write_json_atomic(&args.out.join("door_bridges.json"), &output.door_bridges, args.force)?;

    if cli.verbose > 0 {
        eprintln!(
            "[run] stage B: {} pairs, stage F: {} rectangles, {} doors assigned",
            output.wall_candidate_pairs_b.pairs.len(),
            output.logic_f_rectangles.len(),
            output.door_assignments.len(),
        );
    }

    Ok(())
}
