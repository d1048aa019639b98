//! Scanned document record.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::extract::{extract_description, extract_header, extract_sections, extract_title};
use crate::frontmatter::{extract_frontmatter, frontmatter_str};

/// One Markdown file and the fields extracted from it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    /// Absolute (or root-joined) path.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    /// File name.
    pub file_name: String,
    /// Raw text.
    #[serde(skip)]
    pub content: String,
    /// Hex SHA-256 of the content.
    pub content_hash: String,
    /// Size in bytes.
    pub size: u64,
    /// Number of lines.
    pub line_count: usize,
    /// First `# ` heading, else the frontmatter title.
    pub title: String,
    /// `@description` or description-section text.
    pub description: String,
    /// `## ` headings.
    pub sections: Vec<String>,
    /// `**@key**：value` metadata.
    pub header: BTreeMap<String, String>,
    /// YAML frontmatter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<serde_yaml::Value>,
}

impl DocumentRecord {
    /// Build a record from a file's content.
    ///
    /// `root` is used only to compute `relative_path`.
    #[must_use]
    pub fn from_content(path: &Path, root: &Path, content: String) -> Self {
        let relative_path = relative_string(path, root);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content_hash = hex::encode(Sha256::digest(content.as_bytes()));
        let frontmatter = extract_frontmatter(&content);
        let mut title = extract_title(&content);
        if title.is_empty()
            && let Some(fm_title) = frontmatter.as_ref().and_then(|fm| frontmatter_str(fm, "title"))
        {
            title = fm_title.trim().to_string();
        }

        Self {
            path: path.to_path_buf(),
            relative_path,
            file_name,
            content_hash,
            size: content.len() as u64,
            line_count: content.lines().count(),
            title,
            description: extract_description(&content),
            sections: extract_sections(&content),
            header: extract_header(&content),
            frontmatter,
            content,
        }
    }

    /// Top-level directory under the root, if the file is nested.
    #[must_use]
    pub fn category_dir(&self) -> Option<&str> {
        let (first, rest) = self.relative_path.split_once('/')?;
        (!rest.is_empty()).then_some(first)
    }

    /// Name of the directory holding the file.
    #[must_use]
    pub fn parent_dir_name(&self) -> Option<String> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// `/`-joined path of `path` relative to `root`.
#[must_use]
pub fn relative_string(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields() {
        let root = Path::new("/docs");
        let path = root.join("YYC3-Cater-架构设计/架构类/01-总体架构.md");
        let record = DocumentRecord::from_content(
            &path,
            root,
            "# 总体架构\n\n**@description**：概览\n\n## 1. 目标\n".to_string(),
        );
        assert_eq!(record.relative_path, "YYC3-Cater-架构设计/架构类/01-总体架构.md");
        assert_eq!(record.file_name, "01-总体架构.md");
        assert_eq!(record.title, "总体架构");
        assert_eq!(record.description, "概览");
        assert_eq!(record.sections, vec!["1. 目标"]);
        assert_eq!(record.category_dir(), Some("YYC3-Cater-架构设计"));
        assert_eq!(record.parent_dir_name().as_deref(), Some("架构类"));
        assert_eq!(record.content_hash.len(), 64);
    }

    #[test]
    fn test_frontmatter_title_fallback() {
        let record = DocumentRecord::from_content(
            Path::new("/d/a.md"),
            Path::new("/d"),
            "---\ntitle: 指南\n---\n正文\n".to_string(),
        );
        assert_eq!(record.title, "指南");
        assert_eq!(record.category_dir(), None);
    }
}
