//! Context audit: how documents in one doc-type directory hang together.
//!
//! Three checks per directory:
//!
//! - numbering gaps (`03` followed by `05`);
//! - Markdown links to `.md` files that resolve to nothing;
//! - orphan documents that no sibling links to.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use docsmith_scanner::extract::{DocLink, extract_doc_links};
use docsmith_scanner::{
    DocsConfig, DocumentScanner, ScanError, doc_type_directories, scan_directory, split_number,
};
use serde::Serialize;

use crate::exempt::Exemptions;
use crate::markdown::{dir_label, now_display, percent};
use crate::naming::IssueSeverity;

/// Issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextIssueKind {
    /// Numbers skip one or more values.
    NumberingGap,
    /// Link target does not exist.
    InvalidReference,
    /// No sibling links to the document.
    OrphanDocument,
    /// The document could not be read.
    ReadError,
}

impl ContextIssueKind {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumberingGap => "numbering_gap",
            Self::InvalidReference => "invalid_reference",
            Self::OrphanDocument => "orphan_document",
            Self::ReadError => "read_error",
        }
    }
}

/// One context finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextIssue {
    /// Category.
    pub kind: ContextIssueKind,
    /// Severity.
    pub severity: IssueSeverity,
    /// Human-readable explanation.
    pub message: String,
    /// Files involved, for numbering gaps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Target file name, for broken links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Context of one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContext {
    /// File name.
    pub file_name: String,
    /// Siblings linking here, sorted.
    pub referenced_by: Vec<String>,
    /// Issues specific to this document.
    pub issues: Vec<ContextIssue>,
}

impl DocumentContext {
    /// True when the document has no issues of its own.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Context of one doc-type directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryContext {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Directory path.
    pub path: PathBuf,
    /// Gaps in the numbering sequence.
    pub numbering_gaps: Vec<ContextIssue>,
    /// Audited documents in name order.
    pub documents: Vec<DocumentContext>,
}

/// Totals across directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    /// Documents audited.
    pub total_docs: usize,
    /// Broken links.
    pub reference_issues: usize,
    /// Numbering gaps.
    pub numbering_gaps: usize,
    /// Orphan documents.
    pub orphan_docs: usize,
    /// Documents without issues of their own.
    pub passed: usize,
}

impl ContextStats {
    /// `passed / total_docs * 100`, or 0 with no documents.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        percent(self.passed, self.total_docs)
    }
}

/// Result of a context audit; this is the JSON report shape.
#[derive(Debug, Clone, Serialize)]
pub struct ContextAudit {
    /// Audited root.
    pub root: PathBuf,
    /// Local time of the audit.
    pub generated_at: String,
    /// Totals.
    pub stats: ContextStats,
    /// Per-directory results.
    pub directories: Vec<DirectoryContext>,
}

/// Gaps between consecutive distinct numbers in `names`.
///
/// Unnumbered files and `00-` are ignored; the first file carrying each
/// number is named in the issue.
#[must_use]
pub fn numbering_gaps(names: &[String]) -> Vec<ContextIssue> {
    let mut first_with: BTreeMap<u32, &str> = BTreeMap::new();
    for name in names {
        if let Some(number) = split_number(name).0.filter(|number| *number > 0) {
            first_with.entry(number).or_insert(name.as_str());
        }
    }
    let numbered: Vec<(u32, &str)> = first_with.into_iter().collect();
    numbered
        .windows(2)
        .filter(|pair| pair[1].0 - pair[0].0 > 1)
        .map(|pair| {
            let ((prev, prev_file), (next, next_file)) = (pair[0], pair[1]);
            ContextIssue {
                kind: ContextIssueKind::NumberingGap,
                severity: IssueSeverity::Medium,
                message: format!(
                    "编号不连续: {prev} → {next} (缺少 {}-{})",
                    prev + 1,
                    next - 1
                ),
                files: vec![prev_file.to_string(), next_file.to_string()],
                reference: None,
            }
        })
        .collect()
}

fn is_external(link: &DocLink) -> bool {
    link.target.contains("://")
}

fn link_resolves(link: &DocLink, dir: &Path, siblings: &BTreeSet<String>) -> bool {
    if siblings.contains(link.target_file_name()) {
        return true;
    }
    let path = link.target.split('#').next().unwrap_or_default();
    !path.is_empty() && dir.join(path).is_file()
}

fn is_index_page(file_name: &str) -> bool {
    file_name.contains("索引") || file_name.contains("README")
}

/// Checks cross-document context.
#[derive(Debug, Clone)]
pub struct ContextAuditor {
    scanner: DocumentScanner,
    doc_types: Vec<String>,
    exemptions: Exemptions,
}

impl ContextAuditor {
    /// Build an auditor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            scanner: DocumentScanner::new(config.scan_options()),
            doc_types: config.conventions.doc_types.clone(),
            exemptions: Exemptions::from_config(config),
        }
    }

    /// Context of a single directory.
    ///
    /// # Errors
    /// `ScanError` when the directory cannot be listed.
    pub fn check_directory(
        &self,
        path: &Path,
        category: &str,
        doc_type: &str,
    ) -> Result<DirectoryContext, ScanError> {
        let files: Vec<(PathBuf, String)> = scan_directory(path)?
            .into_iter()
            .filter_map(|file| {
                let name = file.file_name()?.to_string_lossy().into_owned();
                (!self.exemptions.covers(&name)).then_some((file, name))
            })
            .collect();
        let names: Vec<String> = files.iter().map(|(_, name)| name.clone()).collect();
        let siblings: BTreeSet<String> = names.iter().cloned().collect();

        let mut links: BTreeMap<&str, Vec<DocLink>> = BTreeMap::new();
        let mut issues: BTreeMap<&str, Vec<ContextIssue>> = BTreeMap::new();
        for (file, name) in &files {
            match self.scanner.read_document(file, path) {
                Ok(record) => {
                    links.insert(name.as_str(), extract_doc_links(&record.content));
                }
                Err(e) => {
                    log::warn!("Context check could not read {}: {e}", file.display());
                    issues.entry(name.as_str()).or_default().push(ContextIssue {
                        kind: ContextIssueKind::ReadError,
                        severity: IssueSeverity::High,
                        message: format!("无法读取文件: {e}"),
                        files: Vec::new(),
                        reference: None,
                    });
                }
            }
        }

        let mut referenced_by: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (source, doc_links) in &links {
            for link in doc_links.iter().filter(|link| !is_external(link)) {
                let target = link.target_file_name();
                if let Some(sibling) = siblings.get(target)
                    && sibling.as_str() != *source
                {
                    referenced_by.entry(sibling.as_str()).or_default().insert(*source);
                }
                if !link_resolves(link, path, &siblings) {
                    issues.entry(*source).or_default().push(ContextIssue {
                        kind: ContextIssueKind::InvalidReference,
                        severity: IssueSeverity::High,
                        message: format!("无效的文档引用: [{}]({})", link.label, link.target),
                        files: Vec::new(),
                        reference: Some(target.to_string()),
                    });
                }
            }
        }

        let documents = names
            .iter()
            .map(|name| {
                let inbound: Vec<String> = referenced_by
                    .get(name.as_str())
                    .map(|sources| sources.iter().map(ToString::to_string).collect())
                    .unwrap_or_default();
                let mut doc_issues = issues.remove(name.as_str()).unwrap_or_default();
                if inbound.is_empty() && !is_index_page(name) {
                    doc_issues.push(ContextIssue {
                        kind: ContextIssueKind::OrphanDocument,
                        severity: IssueSeverity::Low,
                        message: "文档没有被其他文档引用，可能需要添加相关链接".to_string(),
                        files: Vec::new(),
                        reference: None,
                    });
                }
                DocumentContext {
                    file_name: name.clone(),
                    referenced_by: inbound,
                    issues: doc_issues,
                }
            })
            .collect();

        Ok(DirectoryContext {
            category: category.to_string(),
            doc_type: doc_type.to_string(),
            path: path.to_path_buf(),
            numbering_gaps: numbering_gaps(&names),
            documents,
        })
    }

    /// Context of every non-empty doc-type directory under `root`.
    ///
    /// # Errors
    /// `ScanError` when the root or a directory cannot be listed.
    pub fn audit(&self, root: &Path) -> Result<ContextAudit, ScanError> {
        let mut stats = ContextStats::default();
        let mut directories = Vec::new();
        for dir in doc_type_directories(root, &self.doc_types)? {
            let context = self.check_directory(&dir.path, &dir.category, &dir.doc_type)?;
            if context.documents.is_empty() {
                continue;
            }
            stats.numbering_gaps += context.numbering_gaps.len();
            for doc in &context.documents {
                stats.total_docs += 1;
                if doc.passed() {
                    stats.passed += 1;
                }
                for issue in &doc.issues {
                    match issue.kind {
                        ContextIssueKind::InvalidReference => stats.reference_issues += 1,
                        ContextIssueKind::OrphanDocument => stats.orphan_docs += 1,
                        ContextIssueKind::NumberingGap | ContextIssueKind::ReadError => {}
                    }
                }
            }
            directories.push(context);
        }
        log::info!(
            "Context audit: {} documents, {} broken links, {} gaps, {} orphans",
            stats.total_docs,
            stats.reference_issues,
            stats.numbering_gaps,
            stats.orphan_docs
        );
        Ok(ContextAudit {
            root: root.to_path_buf(),
            generated_at: now_display(),
            stats,
            directories,
        })
    }
}

fn push_issue(out: &mut String, issue: &ContextIssue) {
    out.push_str(&format!(
        "- {} **{}**: {}\n",
        issue.severity.icon(),
        issue.kind.as_str(),
        issue.message
    ));
    if !issue.files.is_empty() {
        out.push_str(&format!("  - 涉及文件: {}\n", issue.files.join(", ")));
    }
    if let Some(reference) = &issue.reference {
        out.push_str(&format!("  - 引用文件: {reference}\n"));
    }
}

impl ContextAudit {
    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, brand: &str) -> String {
        let stats = &self.stats;
        let mut out = format!("# {brand} 文档间上下文衔接有序性审核报告\n\n");
        out.push_str(&format!("**审核时间**: {}\n", self.generated_at));
        out.push_str(&format!("**审核目录**: {}\n\n", self.root.display()));

        out.push_str("## 📊 审核统计\n\n");
        out.push_str(&format!("- **总文档数**: {}\n", stats.total_docs));
        out.push_str(&format!("- **引用问题**: {}\n", stats.reference_issues));
        out.push_str(&format!("- **编号断层**: {}\n", stats.numbering_gaps));
        out.push_str(&format!("- **孤立文档**: {}\n", stats.orphan_docs));
        out.push_str(&format!("- **通过审核**: {}\n", stats.passed));
        out.push_str(&format!("- **通过率**: {:.1}%\n\n", stats.pass_rate()));

        out.push_str("## 🔍 详细问题\n");
        for dir in &self.directories {
            let failing: Vec<&DocumentContext> =
                dir.documents.iter().filter(|doc| !doc.passed()).collect();
            if failing.is_empty() && dir.numbering_gaps.is_empty() {
                continue;
            }
            out.push_str(&format!("\n### {}\n\n", dir_label(&dir.category, &dir.doc_type)));
            for gap in &dir.numbering_gaps {
                push_issue(&mut out, gap);
            }
            for doc in failing {
                out.push_str(&format!("\n**{}**\n", doc.file_name));
                for issue in &doc.issues {
                    push_issue(&mut out, issue);
                }
            }
        }

        out.push_str("\n## 💡 改进建议\n\n");
        out.push_str("1. **修复无效引用**（P0）: 确保引用的文件存在，使用相对路径引用文档\n");
        out.push_str("2. **完善编号连续性**（P1）: 为缺失的编号补充文档或重新编号\n");
        out.push_str("3. **增强文档关联**（P2）: 为孤立文档添加相关文档的交叉引用\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_gap_names_missing_range() {
        let gaps = numbering_gaps(&names(&["01-a.md", "02-b.md", "05-c.md", "notes.md"]));
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].message, "编号不连续: 2 → 5 (缺少 3-4)");
        assert_eq!(gaps[0].files, vec!["02-b.md", "05-c.md"]);
    }

    #[test]
    fn test_duplicates_are_not_gaps() {
        assert!(numbering_gaps(&names(&["01-a.md", "01-b.md", "02-c.md"])).is_empty());
        assert!(numbering_gaps(&names(&["00-a.md", "01-b.md"])).is_empty());
    }

    #[test]
    fn test_external_links_are_ignored() {
        let link = DocLink {
            label: "x".to_string(),
            target: "https://example.com/README.md".to_string(),
        };
        assert!(is_external(&link));
    }
}
