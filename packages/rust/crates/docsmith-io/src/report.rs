//! Report output.
//!
//! Every docsmith tool ends by serializing its per-file results as a Markdown
//! document and, for most tools, a JSON document with the same data. The two
//! files share a stem and live in one report directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::error::IoError;

/// Paths written by a single report call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    /// Markdown report, if one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<PathBuf>,
    /// JSON report, if one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
}

/// Writes report files into one directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<(), IoError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Write `<dir>/<name>.md`.
    ///
    /// # Errors
    /// Returns `IoError::System` when the directory or file cannot be written.
    pub fn write_markdown(&self, name: &str, body: &str) -> Result<PathBuf, IoError> {
        self.ensure_dir()?;
        let path = self.dir.join(format!("{name}.md"));
        fs::write(&path, body)?;
        tracing::info!(path = %path.display(), "markdown report written");
        Ok(path)
    }

    /// Write `<dir>/<name>.json` as pretty-printed UTF-8 JSON.
    ///
    /// Non-ASCII text is kept as-is rather than `\u` escaped.
    ///
    /// # Errors
    /// Returns `IoError::Json` when serialization fails, `IoError::System` on write failure.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<PathBuf, IoError> {
        self.ensure_dir()?;
        let path = self.dir.join(format!("{name}.json"));
        let rendered = serde_json::to_string_pretty(value)?;
        fs::write(&path, rendered)?;
        tracing::info!(path = %path.display(), "json report written");
        Ok(path)
    }

    /// Write both the Markdown and JSON forms of one report.
    ///
    /// # Errors
    /// Propagates the first failing write.
    pub fn write_bundle<T: Serialize + ?Sized>(
        &self,
        name: &str,
        markdown: &str,
        value: &T,
    ) -> Result<ReportPaths, IoError> {
        let json = self.write_json(name, value)?;
        let markdown = self.write_markdown(name, markdown)?;
        Ok(ReportPaths {
            markdown: Some(markdown),
            json: Some(json),
        })
    }
}

/// Append a `_YYYYmmdd_HHMMSS` suffix to `stem`.
#[must_use]
pub fn timestamped_name<Tz: TimeZone>(stem: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{stem}_{}", now.format("%Y%m%d_%H%M%S"))
}
