//! Error conventions shared across the pipeline.
//!
//! Every stage is a pure, best-effort transform: a malformed pair or a
//! geometry invariant violation is logged and the offending item is
//! skipped rather than aborting the whole run. `anyhow` is used end to end
//! (matching the rest of this crate), with [`WallInferError`] reserved for
//! the handful of conditions a caller may want to match on directly.

use thiserror::Error;

/// Conditions a caller of the public pipeline API may want to distinguish.
/// Everything else surfaces as an opaque `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum WallInferError {
    #[error("drawing has no entities on any selected layer")]
    NoInputEntities,

    #[error("layer {0:?} was requested but is not present in the drawing")]
    UnknownLayer(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as JSON: {source}")]
    Json {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
