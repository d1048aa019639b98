//! Maintenance errors.

use thiserror::Error;

/// Errors that stop a whole maintenance run.
///
/// Failures on single files are recorded in the change log instead.
#[derive(Debug, Error)]
pub enum MaintainError {
    /// The tree or a directory could not be listed.
    #[error(transparent)]
    Scan(#[from] docsmith_scanner::ScanError),
}
