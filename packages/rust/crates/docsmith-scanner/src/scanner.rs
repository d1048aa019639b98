//! Document Scanner - walks a documentation tree and reads Markdown files.
//!
//! # Example
//!
//! ```ignore
//! use docsmith_scanner::{DocumentScanner, ScanOptions};
//!
//! let scanner = DocumentScanner::new(ScanOptions::default());
//! let outcome = scanner.scan(Path::new("docs"))?;
//! println!("{} documents, {} failures", outcome.documents.len(), outcome.failures.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::ScanSettings;
use crate::error::ScanError;
use crate::record::{DocumentRecord, relative_string};

/// Inclusion rules for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Skip paths whose root-relative form contains any of these.
    pub exclude_substrings: Vec<String>,
    /// Skip files with exactly these names.
    pub exclude_file_names: Vec<String>,
    /// Maximum walk depth below the root.
    pub max_depth: Option<usize>,
    /// Larger files become failures.
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        let settings = ScanSettings::default();
        Self {
            exclude_substrings: settings.exclude_substrings,
            exclude_file_names: settings.exclude_file_names,
            max_depth: settings.max_depth,
            max_file_size: settings.max_file_size,
        }
    }
}

/// A file that matched the filter but could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    /// File path.
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative_path: String,
    /// File name.
    pub file_name: String,
    /// Why the read failed.
    pub reason: String,
}

/// Result of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Scan root.
    pub root: PathBuf,
    /// Readable documents, sorted by relative path.
    pub documents: Vec<DocumentRecord>,
    /// Unreadable files, sorted by relative path.
    pub failures: Vec<ScanFailure>,
}

impl ScanOutcome {
    /// Number of files that passed the inclusion filter.
    #[must_use]
    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }
}

/// Scans documentation trees.
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    options: ScanOptions,
}

impl DocumentScanner {
    /// Create a scanner with the given inclusion rules.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Inclusion rules in use.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// True when a Markdown file at `relative_path` passes the exclusion rules.
    #[must_use]
    pub fn is_included(&self, relative_path: &str, file_name: &str) -> bool {
        if self
            .options
            .exclude_file_names
            .iter()
            .any(|name| name == file_name)
        {
            return false;
        }
        !self
            .options
            .exclude_substrings
            .iter()
            .any(|needle| !needle.is_empty() && relative_path.contains(needle.as_str()))
    }

    /// Paths of every included Markdown file under `root`, sorted.
    ///
    /// # Errors
    /// `ScanError::RootNotFound` when `root` is not a directory.
    pub fn collect_paths(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let relative = relative_string(entry.path(), root);
            if self.is_included(&relative, &file_name) {
                paths.push(entry.into_path());
            }
        }
        paths.sort_by_key(|path| relative_string(path, root));
        Ok(paths)
    }

    /// Read one file into a record.
    ///
    /// # Errors
    /// Any `docsmith_io::IoError` from the safe read.
    pub fn read_document(
        &self,
        path: &Path,
        root: &Path,
    ) -> Result<DocumentRecord, docsmith_io::IoError> {
        let content = docsmith_io::read_text_safe(path, self.options.max_file_size)?;
        Ok(DocumentRecord::from_content(path, root, content))
    }

    /// Scan `root` recursively.
    ///
    /// Unreadable files are collected as failures; the scan continues.
    ///
    /// # Errors
    /// `ScanError::RootNotFound` when `root` is not a directory.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        let paths = self.collect_paths(root)?;
        let mut outcome = ScanOutcome {
            root: root.to_path_buf(),
            ..ScanOutcome::default()
        };

        for path in paths {
            match self.read_document(&path, root) {
                Ok(record) => {
                    log::debug!("Scanned {}", record.relative_path);
                    outcome.documents.push(record);
                }
                Err(e) => {
                    log::warn!("Failed to read {}: {e}", path.display());
                    outcome.failures.push(ScanFailure {
                        relative_path: relative_string(&path, root),
                        file_name: path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        reason: e.to_string(),
                        path,
                    });
                }
            }
        }

        log::info!(
            "Scanned {} documents ({} failed) under {}",
            outcome.documents.len(),
            outcome.failures.len(),
            root.display()
        );
        Ok(outcome)
    }
}

/// True for `*.md` paths, ignoring case.
#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
}

/// Markdown files directly inside `dir`, sorted by name.
///
/// # Errors
/// `ScanError::RootNotFound` for a missing directory, `ScanError::ReadDir`
/// when listing fails.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::RootNotFound(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_markdown(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// A `<category>/<doc type>` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTypeDir {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Full path.
    pub path: PathBuf,
}

/// Every `<category>/<doc type>` directory under `root`, sorted.
///
/// # Errors
/// `ScanError::RootNotFound` for a missing root, `ScanError::ReadDir` when
/// the root cannot be listed.
pub fn doc_type_directories(
    root: &Path,
    doc_types: &[String],
) -> Result<Vec<DocTypeDir>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    let entries = fs::read_dir(root).map_err(|source| ScanError::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;
    let mut categories: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    categories.sort();

    let mut dirs = Vec::new();
    for category in categories {
        let category_name = category
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        for doc_type in doc_types {
            let path = category.join(doc_type);
            if path.is_dir() {
                dirs.push(DocTypeDir {
                    category: category_name.clone(),
                    doc_type: doc_type.clone(),
                    path,
                });
            }
        }
    }
    Ok(dirs)
}
