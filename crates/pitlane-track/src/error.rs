//! Track loading error types.

use std::path::PathBuf;

/// Errors that can occur while building or loading track geometry.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Failed to read a track mesh file.
    #[error("failed to read track mesh {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse RON mesh content.
    #[error("failed to parse track mesh: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// A triangle references a vertex that does not exist.
    #[error("mesh '{mesh}': triangle {triangle} uses vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        mesh: String,
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A detailed track was requested without a mesh file.
    #[error("detailed track selected but no mesh path configured")]
    MissingMeshPath,

    /// Ring parameters cannot produce a surface.
    #[error("invalid ring: inner radius {inner} must be below outer radius {outer}, with at least 3 segments (got {segments})")]
    InvalidRing {
        inner: f32,
        outer: f32,
        segments: u32,
    },
}
