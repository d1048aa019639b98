//! Error types for scanning and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Scan errors.
///
/// Per-file read failures are not errors: they are collected as
/// `ScanFailure`s so the batch keeps going.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The documentation root does not exist or is not a directory.
    #[error("Documentation root not found: {0}")]
    RootNotFound(PathBuf),
    /// A directory listing failed.
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for `DocsConfig`.
    #[error("Invalid config {path}: {source}")]
    Yaml {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}
