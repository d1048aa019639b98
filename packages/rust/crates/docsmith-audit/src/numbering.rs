//! Number audit: duplicate and missing numbers per doc-type directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use docsmith_scanner::{DocsConfig, ScanError, doc_type_directories, scan_directory, split_number};
use serde::Serialize;

use crate::markdown::dir_label;

/// A number used by more than one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateNumber {
    /// The shared number.
    pub number: u32,
    /// File names using it, sorted.
    pub files: Vec<String>,
}

/// Numbering state of one doc-type directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNumbering {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Directory path.
    pub path: PathBuf,
    /// Markdown files in the directory.
    pub total: usize,
    /// Numbers shared by several files, ascending.
    pub duplicates: Vec<DuplicateNumber>,
    /// Files without a positive leading number.
    pub unnumbered: Vec<String>,
}

impl DirectoryNumbering {
    /// True when there is nothing to fix.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.unnumbered.is_empty()
    }
}

/// Totals across directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NumberingSummary {
    /// Directories checked.
    pub directories: usize,
    /// Files involved in a duplicate number.
    pub duplicate_files: usize,
    /// Files without a number.
    pub unnumbered_files: usize,
}

impl NumberingSummary {
    /// Build totals from per-directory results.
    #[must_use]
    pub fn from_directories(directories: &[DirectoryNumbering]) -> Self {
        Self {
            directories: directories.len(),
            duplicate_files: directories
                .iter()
                .flat_map(|dir| &dir.duplicates)
                .map(|dup| dup.files.len())
                .sum(),
            unnumbered_files: directories.iter().map(|dir| dir.unnumbered.len()).sum(),
        }
    }

    /// Files needing attention.
    #[must_use]
    pub fn total_issues(&self) -> usize {
        self.duplicate_files + self.unnumbered_files
    }
}

/// Checks document numbering.
#[derive(Debug, Clone)]
pub struct NumberAuditor {
    doc_types: Vec<String>,
}

impl NumberAuditor {
    /// Build an auditor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            doc_types: config.conventions.doc_types.clone(),
        }
    }

    /// Numbering of a single directory.
    ///
    /// # Errors
    /// `ScanError` when the directory cannot be listed.
    pub fn check_directory(
        &self,
        path: &Path,
        category: &str,
        doc_type: &str,
    ) -> Result<DirectoryNumbering, ScanError> {
        let files = scan_directory(path)?;
        let mut by_number: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        let mut unnumbered = Vec::new();

        for file in &files {
            let name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            match split_number(&name).0 {
                Some(number) if number > 0 => by_number.entry(number).or_default().push(name),
                _ => unnumbered.push(name),
            }
        }

        let duplicates = by_number
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(number, files)| DuplicateNumber { number, files })
            .collect();

        Ok(DirectoryNumbering {
            category: category.to_string(),
            doc_type: doc_type.to_string(),
            path: path.to_path_buf(),
            total: files.len(),
            duplicates,
            unnumbered,
        })
    }

    /// Numbering of every non-empty doc-type directory under `root`.
    ///
    /// # Errors
    /// `ScanError` when the root or a directory cannot be listed.
    pub fn audit(&self, root: &Path) -> Result<Vec<DirectoryNumbering>, ScanError> {
        let mut results = Vec::new();
        for dir in doc_type_directories(root, &self.doc_types)? {
            let numbering = self.check_directory(&dir.path, &dir.category, &dir.doc_type)?;
            if numbering.total > 0 {
                results.push(numbering);
            }
        }
        let summary = NumberingSummary::from_directories(&results);
        log::info!(
            "Number audit: {} directories, {} duplicate, {} unnumbered",
            summary.directories,
            summary.duplicate_files,
            summary.unnumbered_files
        );
        Ok(results)
    }
}

/// Render the Markdown number report.
#[must_use]
pub fn render_numbering_report(brand: &str, directories: &[DirectoryNumbering]) -> String {
    let summary = NumberingSummary::from_directories(directories);
    let mut out = String::new();
    out.push_str(&format!("# {brand} 文档编号审核报告\n\n"));

    for dir in directories {
        out.push_str(&format!("## 📁 {}\n\n", dir_label(&dir.category, &dir.doc_type)));
        out.push_str(&format!("- 总计文档: {}\n", dir.total));
        if !dir.duplicates.is_empty() {
            out.push_str(&format!("\n### 🔴 重复编号问题 ({} 个)\n\n", dir.duplicates.len()));
            for dup in &dir.duplicates {
                out.push_str(&format!("- 编号 {:02}:\n", dup.number));
                for file in &dup.files {
                    out.push_str(&format!("  - {file}\n"));
                }
            }
        }
        if !dir.unnumbered.is_empty() {
            out.push_str(&format!("\n### 🟡 未编号文档 ({} 个)\n\n", dir.unnumbered.len()));
            for file in &dir.unnumbered {
                out.push_str(&format!("- {file}\n"));
            }
        }
        if dir.is_clean() {
            out.push_str("- ✅ 编号规范，无问题\n");
        }
        out.push('\n');
    }

    out.push_str("## 审核总结\n\n");
    out.push_str(&format!("- 检查目录数: {}\n", summary.directories));
    out.push_str(&format!("- 重复编号文档: {}\n", summary.duplicate_files));
    out.push_str(&format!("- 未编号文档: {}\n", summary.unnumbered_files));
    if summary.total_issues() == 0 {
        out.push_str("\n✅ 所有文档编号规范，无需修正\n");
    } else {
        out.push_str(&format!("\n⚠️ 发现 {} 个问题需要处理\n", summary.total_issues()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_files() {
        let dir = DirectoryNumbering {
            category: "c".to_string(),
            doc_type: "架构类".to_string(),
            path: PathBuf::from("c/架构类"),
            total: 4,
            duplicates: vec![DuplicateNumber {
                number: 1,
                files: vec!["01-a.md".to_string(), "01-b.md".to_string()],
            }],
            unnumbered: vec!["x.md".to_string()],
        };
        let summary = NumberingSummary::from_directories(&[dir]);
        assert_eq!(summary.duplicate_files, 2);
        assert_eq!(summary.unnumbered_files, 1);
        assert_eq!(summary.total_issues(), 3);
    }
}
