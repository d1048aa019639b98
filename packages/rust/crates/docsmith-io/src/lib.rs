#![allow(clippy::doc_markdown)]

//! docsmith-io - Safe file reads and report output for docsmith
//!
//! # Features
//!
//! - **Safety**: Binary detection & size limits before a document is handed to the extractors
//! - **Reports**: Markdown + JSON report bundles written side by side
//!
//! # Architecture
//!
//! ```text
//! docsmith-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection & decoding
//! ├── sync.rs     # Synchronous read API
//! └── report.rs   # ReportWriter (Markdown / JSON)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use docsmith_io::{read_text_safe, ReportWriter};
//!
//! let content = read_text_safe("docs/01-intro.md", 2 * 1024 * 1024)?;
//! let writer = ReportWriter::new("docs/reports");
//! writer.write_markdown("naming-report", "# Report\n")?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod detect;
mod error;
mod report;
mod sync;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::IoError;
pub use report::{ReportPaths, ReportWriter, timestamped_name};
pub use sync::read_text_safe;

// Re-export detection utilities for advanced use
pub use detect::{BINARY_PROBE_BYTES, decode_buffer, is_binary};

/// Default read limit for a single Markdown document (2 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;
