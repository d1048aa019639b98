//! Graph errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving graph data.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A required input file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// A file is not the expected JSON shape.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File.
        path: PathBuf,
        /// Cause.
        #[source]
        source: serde_json::Error,
    },

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] docsmith_io::IoError),
}
