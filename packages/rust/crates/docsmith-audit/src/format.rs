//! Format audit: structural markers every document should carry.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docsmith_scanner::extract::compile_regex;
use docsmith_scanner::{
    DocsConfig, DocumentScanner, ScanError, doc_type_directories, scan_directory,
};
use regex::Regex;
use serde::Serialize;

use crate::markdown::dir_label;

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^#{1,6}\s+\d+\.\s+"));

/// Format markers found in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatCheck {
    /// File name.
    pub file_name: String,
    /// `@file` and `@description` both present.
    pub has_standard_header: bool,
    /// Brand slogan present.
    pub has_brand_slogan: bool,
    /// Document-information table present.
    pub has_info_table: bool,
    /// Table of contents present.
    pub has_toc: bool,
    /// Numbered chapter heading such as `## 1. `.
    pub has_chapters: bool,
    /// Fenced code block present.
    pub has_code_blocks: bool,
    /// Markdown table present.
    pub has_tables: bool,
    /// Number of lines.
    pub line_count: usize,
}

/// Inspect one document's text.
#[must_use]
pub fn check_format(file_name: &str, content: &str, brand: &str) -> FormatCheck {
    FormatCheck {
        file_name: file_name.to_string(),
        has_standard_header: content.contains("@file") && content.contains("@description"),
        has_brand_slogan: content.contains("YanYuCloudCube")
            || (!brand.is_empty() && content.contains(brand)),
        has_info_table: content.contains("文档信息") || content.contains("| 文档标题"),
        has_toc: content.contains("目录"),
        has_chapters: CHAPTER_RE.is_match(content),
        has_code_blocks: content.contains("```"),
        has_tables: content.contains('|') && content.contains("---"),
        line_count: content.split('\n').count(),
    }
}

/// Format checks of one doc-type directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryFormat {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Directory path.
    pub path: PathBuf,
    /// Per-document checks.
    pub checks: Vec<FormatCheck>,
}

/// Missing-marker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormatSummary {
    /// Documents checked.
    pub total: usize,
    /// Documents without the standard header.
    pub missing_header: usize,
    /// Documents without a table of contents.
    pub missing_toc: usize,
    /// Documents without an info table.
    pub missing_info_table: usize,
    /// Documents without numbered chapters.
    pub missing_chapters: usize,
}

impl FormatSummary {
    /// Count missing markers over `checks`.
    #[must_use]
    pub fn from_checks<'a, I>(checks: I) -> Self
    where
        I: IntoIterator<Item = &'a FormatCheck>,
    {
        let mut summary = Self::default();
        for check in checks {
            summary.total += 1;
            summary.missing_header += usize::from(!check.has_standard_header);
            summary.missing_toc += usize::from(!check.has_toc);
            summary.missing_info_table += usize::from(!check.has_info_table);
            summary.missing_chapters += usize::from(!check.has_chapters);
        }
        summary
    }

    /// Sum of all missing markers.
    #[must_use]
    pub fn total_issues(&self) -> usize {
        self.missing_header + self.missing_toc + self.missing_info_table + self.missing_chapters
    }
}

impl DirectoryFormat {
    /// Counters for this directory.
    #[must_use]
    pub fn summary(&self) -> FormatSummary {
        FormatSummary::from_checks(&self.checks)
    }
}

/// Runs format checks over doc-type directories.
#[derive(Debug, Clone)]
pub struct FormatAuditor {
    scanner: DocumentScanner,
    doc_types: Vec<String>,
    brand: String,
}

impl FormatAuditor {
    /// Build an auditor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            scanner: DocumentScanner::new(config.scan_options()),
            doc_types: config.conventions.doc_types.clone(),
            brand: config.conventions.brand.clone(),
        }
    }

    /// Check every non-empty doc-type directory under `root`.
    ///
    /// Unreadable documents are logged and left out.
    ///
    /// # Errors
    /// `ScanError` when the root or a directory cannot be listed.
    pub fn audit(&self, root: &Path) -> Result<Vec<DirectoryFormat>, ScanError> {
        let mut results = Vec::new();
        for dir in doc_type_directories(root, &self.doc_types)? {
            let mut checks = Vec::new();
            for path in scan_directory(&dir.path)? {
                match self.scanner.read_document(&path, root) {
                    Ok(record) => {
                        checks.push(check_format(&record.file_name, &record.content, &self.brand));
                    }
                    Err(e) => log::warn!("Format check skipped {}: {e}", path.display()),
                }
            }
            if !checks.is_empty() {
                results.push(DirectoryFormat {
                    category: dir.category,
                    doc_type: dir.doc_type,
                    path: dir.path,
                    checks,
                });
            }
        }
        let summary = FormatSummary::from_checks(results.iter().flat_map(|dir| &dir.checks));
        log::info!(
            "Format audit: {} documents, {} missing markers",
            summary.total,
            summary.total_issues()
        );
        Ok(results)
    }
}

/// Render the Markdown format report.
#[must_use]
pub fn render_format_report(brand: &str, directories: &[DirectoryFormat]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {brand} 文档格式统一性审核报告\n\n"));

    for dir in directories {
        let summary = dir.summary();
        out.push_str(&format!("## 📁 {}\n\n", dir_label(&dir.category, &dir.doc_type)));
        out.push_str(&format!("- 总计文档: {}\n", summary.total));
        if summary.missing_header > 0 {
            out.push_str(&format!("- 🔴 缺少标准头部信息: {} 个文档\n", summary.missing_header));
        }
        if summary.missing_toc > 0 {
            out.push_str(&format!("- 🟡 缺少目录: {} 个文档\n", summary.missing_toc));
        }
        if summary.missing_info_table > 0 {
            out.push_str(&format!("- 🟡 缺少文档信息表格: {} 个文档\n", summary.missing_info_table));
        }
        if summary.missing_chapters > 0 {
            out.push_str(&format!("- 🟡 缺少章节标题: {} 个文档\n", summary.missing_chapters));
        }
        if summary.total_issues() == 0 {
            out.push_str("- ✅ 格式规范，无问题\n");
        }
        out.push('\n');
    }

    let total = FormatSummary::from_checks(directories.iter().flat_map(|dir| &dir.checks));
    out.push_str("## 审核总结\n\n");
    out.push_str(&format!("- 检查文档总数: {}\n", total.total));
    out.push_str(&format!("- 缺少标准头部信息: {}\n", total.missing_header));
    out.push_str(&format!("- 缺少目录: {}\n", total.missing_toc));
    out.push_str(&format!("- 缺少文档信息表格: {}\n", total.missing_info_table));
    out.push_str(&format!("- 缺少章节标题: {}\n", total.missing_chapters));
    if total.total_issues() == 0 {
        out.push_str("\n✅ 所有文档格式统一，符合规范\n");
    } else {
        out.push_str(&format!("\n⚠️ 发现 {} 个格式问题需要处理\n", total.total_issues()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_has_every_marker() {
        let text = "---\n**@file**：x\n**@description**：y\n---\n# YYC³ 文档\n\n| 文档标题 | x |\n|---|---|\n\n## 📑 目录\n\n## 1. 概述\n\n```rust\nfn main() {}\n```\n";
        let check = check_format("01-a.md", text, "YYC³");
        assert!(check.has_standard_header);
        assert!(check.has_brand_slogan);
        assert!(check.has_info_table);
        assert!(check.has_toc);
        assert!(check.has_chapters);
        assert!(check.has_code_blocks);
        assert!(check.has_tables);
        assert_eq!(FormatSummary::from_checks([&check]).total_issues(), 0);
    }

    #[test]
    fn test_chapter_heading_found_mid_document() {
        let check = check_format("a.md", "# T\n\ntext\n\n### 2. 细节\n", "YYC³");
        assert!(check.has_chapters);
        assert!(!check.has_standard_header);
        assert_eq!(FormatSummary::from_checks([&check]).missing_header, 1);
    }
}
