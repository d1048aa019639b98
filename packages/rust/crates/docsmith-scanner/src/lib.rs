//! docsmith-scanner - Shared scanning for Markdown documentation trees.
//!
//! Every docsmith tool starts the same way: walk a directory tree, keep the
//! Markdown files that pass the exclusion rules, and pull a handful of fields
//! out of each file with regular expressions.
//!
//! # Architecture
//!
//! ```text
//! docsmith-scanner/src/
//! ├── lib.rs          # Main module and exports
//! ├── config.rs       # DocsConfig (YAML, every field defaulted)
//! ├── error.rs        # ScanError, ConfigError
//! ├── scanner.rs      # DocumentScanner, doc-type directory discovery
//! ├── record.rs       # DocumentRecord
//! ├── frontmatter.rs  # YAML frontmatter parsing
//! ├── extract.rs      # Title / description / keyword / concept extractors
//! ├── naming.rs       # `NN-<prefix>--<type>-<name>.md` parsing
//! └── similarity.rs   # Jaccard keyword overlap
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docsmith_scanner::{DocsConfig, DocumentScanner};
//!
//! let config = DocsConfig::default();
//! let scanner = DocumentScanner::new(config.scan_options());
//! let outcome = scanner.scan(Path::new("docs"))?;
//! for doc in &outcome.documents {
//!     println!("{} - {}", doc.relative_path, doc.title);
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod error;
pub mod extract;
pub mod frontmatter;
pub mod naming;
mod record;
mod scanner;
pub mod similarity;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{
    CategoryRule, ContentSettings, CorrespondenceSettings, DocsConfig, HeaderSettings,
    NamingConventions, ReportSettings, RequiredSection, ScanSettings, TagRule,
};
pub use error::{ConfigError, ScanError};
pub use frontmatter::extract_frontmatter;
pub use naming::{DocFileName, keywords_from_file_name, parse_file_name, split_number};
pub use record::DocumentRecord;
pub use scanner::{
    DocTypeDir, DocumentScanner, ScanFailure, ScanOptions, ScanOutcome, doc_type_directories,
    is_markdown, scan_directory,
};
pub use similarity::jaccard;

// ============================================================================
// Version
// ============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
