//! Content completeness audit.
//!
//! Flags documents that are too short, miss one of the required `##`
//! sections, or (for technical documents) carry no code example or table.

use std::path::{Path, PathBuf};

use docsmith_scanner::extract::compile_regex;
use docsmith_scanner::{
    ContentSettings, DocsConfig, DocumentScanner, ScanError, doc_type_directories, scan_directory,
};
use regex::Regex;
use serde::Serialize;

use crate::exempt::Exemptions;
use crate::markdown::{dir_label, now_display, percent};
use crate::naming::IssueSeverity;

/// Issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentIssueKind {
    /// Fewer content lines than required.
    TooShort,
    /// One or more required sections absent.
    MissingSections,
    /// Technical document without a fenced code block.
    MissingExamples,
    /// Technical document without a table.
    MissingTables,
}

impl ContentIssueKind {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::MissingSections => "missing_sections",
            Self::MissingExamples => "missing_examples",
            Self::MissingTables => "missing_tables",
        }
    }
}

/// One content finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentIssue {
    /// Category.
    pub kind: ContentIssueKind,
    /// Severity.
    pub severity: IssueSeverity,
    /// Human-readable explanation.
    pub message: String,
}

/// Content check of one document.
#[derive(Debug, Clone, Serialize)]
pub struct ContentCheck {
    /// File name.
    pub file_name: String,
    /// Lines, including blank ones.
    pub total_lines: usize,
    /// Non-empty lines that are not headings.
    pub content_lines: usize,
    /// Required sections not found, by report name.
    pub missing_sections: Vec<String>,
    /// Issues found.
    pub issues: Vec<ContentIssue>,
}

impl ContentCheck {
    /// True when no issue was found.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Content checks of one doc-type directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryContent {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Directory path.
    pub path: PathBuf,
    /// Per-document checks in name order.
    pub checks: Vec<ContentCheck>,
}

/// Totals across directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentStats {
    /// Documents checked.
    pub total_docs: usize,
    /// Documents below the line minimum.
    pub too_short: usize,
    /// Documents missing a required section.
    pub missing_sections: usize,
    /// Documents with any issue.
    pub incomplete_content: usize,
    /// Documents without issues.
    pub passed: usize,
}

impl ContentStats {
    /// `passed / total_docs * 100`, or 0 with no documents.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        percent(self.passed, self.total_docs)
    }

    fn record(&mut self, check: &ContentCheck) {
        self.total_docs += 1;
        if check.passed() {
            self.passed += 1;
            return;
        }
        self.incomplete_content += 1;
        for issue in &check.issues {
            match issue.kind {
                ContentIssueKind::TooShort => self.too_short += 1,
                ContentIssueKind::MissingSections => self.missing_sections += 1,
                ContentIssueKind::MissingExamples | ContentIssueKind::MissingTables => {}
            }
        }
    }
}

/// Result of a content audit; this is the JSON report shape.
#[derive(Debug, Clone, Serialize)]
pub struct ContentAudit {
    /// Audited root.
    pub root: PathBuf,
    /// Local time of the audit.
    pub generated_at: String,
    /// Totals.
    pub stats: ContentStats,
    /// Per-directory results.
    pub directories: Vec<DirectoryContent>,
}

/// Non-empty lines that do not start with `#`.
#[must_use]
pub fn content_line_count(content: &str) -> usize {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

/// Checks content completeness.
#[derive(Debug, Clone)]
pub struct ContentAuditor {
    scanner: DocumentScanner,
    doc_types: Vec<String>,
    exemptions: Exemptions,
    settings: ContentSettings,
    sections: Vec<(String, Regex)>,
}

impl ContentAuditor {
    /// Build an auditor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        let settings = config.content.clone();
        let sections = settings
            .required_sections
            .iter()
            .map(|section| {
                let titles = section
                    .titles
                    .iter()
                    .map(|title| regex::escape(title))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = compile_regex(&format!(r"##\s+(?:\d+\.\s+)?(?:{titles})"));
                (section.name.clone(), pattern)
            })
            .collect();
        Self {
            scanner: DocumentScanner::new(config.scan_options()),
            doc_types: config.conventions.doc_types.clone(),
            exemptions: Exemptions::from_config(config),
            settings,
            sections,
        }
    }

    /// Check one document's text.
    #[must_use]
    pub fn check(&self, file_name: &str, content: &str) -> ContentCheck {
        let total_lines = content.split('\n').count();
        let content_lines = content_line_count(content);
        let mut issues = Vec::new();

        let minimum = self.settings.min_content_lines;
        if content_lines < minimum {
            issues.push(ContentIssue {
                kind: ContentIssueKind::TooShort,
                severity: IssueSeverity::High,
                message: format!(
                    "文档内容过少，仅有 {content_lines} 行有效内容（建议至少{minimum}行）"
                ),
            });
        }

        let missing_sections: Vec<String> = self
            .sections
            .iter()
            .filter(|(_, pattern)| !pattern.is_match(content))
            .map(|(name, _)| name.clone())
            .collect();
        if !missing_sections.is_empty() {
            issues.push(ContentIssue {
                kind: ContentIssueKind::MissingSections,
                severity: IssueSeverity::Medium,
                message: format!("缺少必要章节: {}", missing_sections.join(", ")),
            });
        }

        let technical = self
            .settings
            .technical_markers
            .iter()
            .any(|marker| !marker.is_empty() && file_name.contains(marker.as_str()));
        if technical && !content.contains("```") {
            issues.push(ContentIssue {
                kind: ContentIssueKind::MissingExamples,
                severity: IssueSeverity::Low,
                message: "技术文档缺少代码示例或配置示例".to_string(),
            });
        }
        if technical && !content.contains('|') {
            issues.push(ContentIssue {
                kind: ContentIssueKind::MissingTables,
                severity: IssueSeverity::Low,
                message: "架构文档缺少表格（如组件列表、接口列表等）".to_string(),
            });
        }

        ContentCheck {
            file_name: file_name.to_string(),
            total_lines,
            content_lines,
            missing_sections,
            issues,
        }
    }

    /// Check every non-empty doc-type directory under `root`.
    ///
    /// Unreadable documents are logged and left out.
    ///
    /// # Errors
    /// `ScanError` when the root or a directory cannot be listed.
    pub fn audit(&self, root: &Path) -> Result<ContentAudit, ScanError> {
        let mut stats = ContentStats::default();
        let mut directories = Vec::new();
        for dir in doc_type_directories(root, &self.doc_types)? {
            let mut checks = Vec::new();
            for path in scan_directory(&dir.path)? {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if self.exemptions.covers(&file_name) {
                    continue;
                }
                match self.scanner.read_document(&path, root) {
                    Ok(record) => {
                        let check = self.check(&file_name, &record.content);
                        stats.record(&check);
                        checks.push(check);
                    }
                    Err(e) => log::warn!("Content check skipped {}: {e}", path.display()),
                }
            }
            if !checks.is_empty() {
                directories.push(DirectoryContent {
                    category: dir.category,
                    doc_type: dir.doc_type,
                    path: dir.path,
                    checks,
                });
            }
        }
        log::info!(
            "Content audit: {} documents, {} passed, {} incomplete",
            stats.total_docs,
            stats.passed,
            stats.incomplete_content
        );
        Ok(ContentAudit {
            root: root.to_path_buf(),
            generated_at: now_display(),
            stats,
            directories,
        })
    }
}

impl ContentAudit {
    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, brand: &str) -> String {
        let stats = &self.stats;
        let mut out = format!("# {brand} 文档内容完整性审核报告\n\n");
        out.push_str(&format!("**审核时间**: {}\n", self.generated_at));
        out.push_str(&format!("**审核目录**: {}\n\n", self.root.display()));

        out.push_str("## 📊 审核统计\n\n");
        out.push_str(&format!("- **总文档数**: {}\n", stats.total_docs));
        out.push_str(&format!("- **内容过少**: {}\n", stats.too_short));
        out.push_str(&format!("- **缺少章节**: {}\n", stats.missing_sections));
        out.push_str(&format!("- **内容不完整**: {}\n", stats.incomplete_content));
        out.push_str(&format!("- **通过审核**: {}\n", stats.passed));
        out.push_str(&format!("- **通过率**: {:.1}%\n\n", stats.pass_rate()));

        out.push_str("## 🔍 详细问题\n");
        for dir in &self.directories {
            let failing: Vec<&ContentCheck> =
                dir.checks.iter().filter(|check| !check.passed()).collect();
            if failing.is_empty() {
                continue;
            }
            out.push_str(&format!("\n### {}\n", dir_label(&dir.category, &dir.doc_type)));
            for check in failing {
                out.push_str(&format!("\n**{}**\n", check.file_name));
                out.push_str(&format!("- 总行数: {}\n", check.total_lines));
                out.push_str(&format!("- 有效内容行数: {}\n", check.content_lines));
                for issue in &check.issues {
                    out.push_str(&format!(
                        "- {} **{}**: {}\n",
                        issue.severity.icon(),
                        issue.kind.as_str(),
                        issue.message
                    ));
                }
            }
        }

        out.push_str("\n## 💡 改进建议\n\n");
        out.push_str("1. **补充内容过少的文档**（P0）: 补充详细说明、实现细节和示例\n");
        out.push_str("2. **完善文档结构**（P1）: 补齐概述、功能特性、技术栈、实现等核心章节\n");
        out.push_str("3. **增强文档可读性**（P2）: 为技术文档添加代码示例、表格和图表\n");
        out
    }
}
