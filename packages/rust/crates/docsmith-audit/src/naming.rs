//! File-naming audit.
//!
//! Standard form: `NN-<prefix>--<type>-<name>.md`, for example
//! `01-YYC3-Cater--架构类-总体架构设计文档.md`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docsmith_scanner::extract::compile_regex;
use docsmith_scanner::naming::file_stem;
use docsmith_scanner::{DocsConfig, NamingConventions, ScanError, doc_type_directories, is_markdown};
use regex::Regex;
use serde::Serialize;

use crate::exempt::Exemptions;
use crate::markdown::{now_display, percent};

static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^\d{2,3}-"));
static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[A-Z]"));

/// Issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Name does not start with a 2-3 digit number.
    MissingNumber,
    /// Any other convention violation.
    InvalidFormat,
}

impl IssueKind {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingNumber => "missing_number",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Cosmetic.
    Low,
    /// Should be fixed.
    Medium,
    /// Breaks the convention.
    High,
}

impl IssueSeverity {
    pub(crate) fn icon(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }
}

/// One naming violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingIssue {
    /// Category.
    pub kind: IssueKind,
    /// Severity.
    pub severity: IssueSeverity,
    /// Human-readable explanation.
    pub message: String,
}

/// Result for one checked file.
#[derive(Debug, Clone, Serialize)]
pub struct FileNamingResult {
    /// File path.
    pub path: PathBuf,
    /// File name.
    pub file_name: String,
    /// Violations; empty means the file passed.
    pub issues: Vec<NamingIssue>,
}

impl FileNamingResult {
    /// True when no rule was violated.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Results for one doc-type directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNaming {
    /// Category directory name.
    pub category: String,
    /// Doc-type directory name.
    pub doc_type: String,
    /// Checked (non-skipped) files.
    pub results: Vec<FileNamingResult>,
}

/// Audit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NamingStats {
    /// Every regular file visited, including skipped ones.
    pub total_files: usize,
    /// Files with at least one issue.
    pub naming_issues: usize,
    /// `missing_number` issues.
    pub missing_number: usize,
    /// `invalid_format` issues.
    pub invalid_format: usize,
    /// Files without issues.
    pub passed: usize,
}

impl NamingStats {
    /// `passed / total_files * 100`, or 0 for an empty tree.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        percent(self.passed, self.total_files)
    }
}

/// Whole-tree naming audit.
#[derive(Debug, Clone, Serialize)]
pub struct NamingAudit {
    /// Audited root.
    pub root: PathBuf,
    /// Audit time.
    pub generated_at: String,
    /// Counters.
    pub stats: NamingStats,
    /// Per-directory results, in directory order.
    pub directories: Vec<DirectoryNaming>,
}

/// Checks file names against the naming conventions.
#[derive(Debug, Clone)]
pub struct NamingAuditor {
    conventions: NamingConventions,
    exemptions: Exemptions,
    standard_head: Regex,
}

impl NamingAuditor {
    /// Build an auditor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        let conventions = config.conventions.clone();
        let types = conventions
            .doc_types
            .iter()
            .map(|doc_type| regex::escape(doc_type))
            .collect::<Vec<_>>()
            .join("|");
        let standard_head = compile_regex(&format!(
            r"^\d{{2,3}}-{}--(?:{types})-",
            regex::escape(&conventions.prefix)
        ));
        Self {
            conventions,
            exemptions: Exemptions::from_config(config),
            standard_head,
        }
    }

    /// True when `file_name` is not subject to the naming rules.
    #[must_use]
    pub fn is_skipped(&self, path: &Path, file_name: &str) -> bool {
        !is_markdown(path) || self.exemptions.covers(file_name)
    }

    /// Apply every naming rule to one file name.
    #[must_use]
    pub fn check_name(&self, file_name: &str) -> Vec<NamingIssue> {
        let conventions = &self.conventions;
        let mut issues = Vec::new();

        if !NUMBER_PREFIX_RE.is_match(file_name) {
            issues.push(NamingIssue {
                kind: IssueKind::MissingNumber,
                severity: IssueSeverity::High,
                message: format!(
                    "文件名缺少编号，格式应为: 编号-{}--类型-名称.md",
                    conventions.prefix
                ),
            });
        }

        if !file_name.contains(&conventions.prefix) {
            issues.push(NamingIssue {
                kind: IssueKind::InvalidFormat,
                severity: IssueSeverity::High,
                message: format!("文件名缺少{}前缀", conventions.prefix),
            });
        }

        if conventions.doc_type_of(file_name).is_none() {
            issues.push(NamingIssue {
                kind: IssueKind::InvalidFormat,
                severity: IssueSeverity::Medium,
                message: format!("文件名缺少类型标识（{}）", conventions.doc_types.join("/")),
            });
        }

        let stem = file_stem(file_name);
        let name_part = self
            .standard_head
            .find(stem)
            .map_or(stem, |head| &stem[head.end()..]);

        if name_part.contains(' ') {
            issues.push(NamingIssue {
                kind: IssueKind::InvalidFormat,
                severity: IssueSeverity::Medium,
                message: "文件名包含空格，应使用kebab-case格式".to_string(),
            });
        }

        let bare_title = conventions
            .doc_types
            .iter()
            .fold(name_part.to_string(), |acc, doc_type| acc.replace(doc_type.as_str(), ""));
        if UPPERCASE_RE.is_match(&bare_title) {
            issues.push(NamingIssue {
                kind: IssueKind::InvalidFormat,
                severity: IssueSeverity::Low,
                message: "文件名包含大写字母，建议使用kebab-case格式".to_string(),
            });
        }

        let length = file_name.chars().count();
        if length > conventions.max_file_name_chars {
            issues.push(NamingIssue {
                kind: IssueKind::InvalidFormat,
                severity: IssueSeverity::Low,
                message: format!(
                    "文件名过长（{length}字符），建议不超过{}字符",
                    conventions.max_file_name_chars
                ),
            });
        }

        issues
    }

    /// Audit every doc-type directory under `root`.
    ///
    /// # Errors
    /// `ScanError` when the root or a doc-type directory cannot be listed.
    pub fn audit(&self, root: &Path) -> Result<NamingAudit, ScanError> {
        let mut stats = NamingStats::default();
        let mut directories = Vec::new();

        for dir in doc_type_directories(root, &self.conventions.doc_types)? {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&dir.path)
                .map_err(|source| ScanError::ReadDir {
                    path: dir.path.clone(),
                    source,
                })?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            files.sort();

            let mut results = Vec::new();
            for path in files {
                stats.total_files += 1;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if self.is_skipped(&path, &file_name) {
                    log::debug!("Naming check skipped {file_name}");
                    continue;
                }

                let issues = self.check_name(&file_name);
                if issues.is_empty() {
                    stats.passed += 1;
                } else {
                    stats.naming_issues += 1;
                    for issue in &issues {
                        match issue.kind {
                            IssueKind::MissingNumber => stats.missing_number += 1,
                            IssueKind::InvalidFormat => stats.invalid_format += 1,
                        }
                    }
                }
                results.push(FileNamingResult {
                    path,
                    file_name,
                    issues,
                });
            }

            if !results.is_empty() {
                directories.push(DirectoryNaming {
                    category: dir.category,
                    doc_type: dir.doc_type,
                    results,
                });
            }
        }

        log::info!(
            "Naming audit: {} files, {} passed, {} with issues",
            stats.total_files,
            stats.passed,
            stats.naming_issues
        );
        Ok(NamingAudit {
            root: root.to_path_buf(),
            generated_at: now_display(),
            stats,
            directories,
        })
    }
}

impl NamingAudit {
    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, conventions: &NamingConventions) -> String {
        let stats = &self.stats;
        let mut out = String::new();
        out.push_str(&format!("# {} 文件命名规范性审核报告\n\n", conventions.brand));
        out.push_str(&format!("**审核时间**: {}\n", self.generated_at));
        out.push_str(&format!("**审核目录**: {}\n\n", self.root.display()));
        out.push_str("## 📊 审核统计\n\n");
        out.push_str(&format!("- **总文件数**: {}\n", stats.total_files));
        out.push_str(&format!("- **命名问题**: {}\n", stats.naming_issues));
        out.push_str(&format!("- **缺少编号**: {}\n", stats.missing_number));
        out.push_str(&format!("- **格式无效**: {}\n", stats.invalid_format));
        out.push_str(&format!("- **通过审核**: {}\n", stats.passed));
        out.push_str(&format!("- **通过率**: {:.1}%\n\n", stats.pass_rate()));
        out.push_str("## 🔍 详细问题\n");

        let mut current_category: Option<&str> = None;
        for dir in &self.directories {
            if current_category != Some(dir.category.as_str()) {
                out.push_str(&format!("\n### {}\n", dir.category));
                current_category = Some(dir.category.as_str());
            }
            out.push_str(&format!("\n#### {}\n", dir.doc_type));
            for result in dir.results.iter().filter(|result| !result.passed()) {
                out.push_str(&format!("\n**{}**\n", result.file_name));
                for issue in &result.issues {
                    out.push_str(&format!(
                        "- {} **{}**: {}\n",
                        issue.severity.icon(),
                        issue.kind.as_str(),
                        issue.message
                    ));
                }
            }
        }

        let prefix = &conventions.prefix;
        let types = conventions.doc_types.join("/");
        out.push_str("\n## 💡 改进建议\n\n### 命名规范\n\n文档文件命名应遵循以下格式：\n\n");
        out.push_str(&format!("```text\n编号-{prefix}--类型-名称.md\n```\n\n"));
        out.push_str("**示例：**\n\n");
        for (index, doc_type) in conventions.doc_types.iter().enumerate() {
            out.push_str(&format!("- `{:02}-{prefix}--{doc_type}-示例文档.md`\n", index + 1));
        }
        out.push_str("\n### 命名规则\n\n");
        out.push_str("1. **编号**: 使用2-3位数字，从01开始\n");
        out.push_str(&format!("2. **前缀**: 必须包含 `{prefix}`\n"));
        out.push_str(&format!("3. **类型**: 必须包含类型标识（{types}）\n"));
        out.push_str("4. **名称**: 使用中文，清晰描述文档内容\n");
        out.push_str("5. **格式**: 使用kebab-case，避免空格和特殊字符\n");
        out.push_str(&format!(
            "6. **长度**: 建议不超过{}字符\n",
            conventions.max_file_name_chars
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auditor() -> NamingAuditor {
        NamingAuditor::new(&DocsConfig::default())
    }

    #[test]
    fn test_standard_name_passes() {
        assert!(auditor().check_name("01-YYC3-Cater--架构类-总体架构设计文档.md").is_empty());
    }

    #[test]
    fn test_uppercase_in_title_is_low() {
        let issues = auditor().check_name("02-YYC3-Cater--技巧类-API网关.md");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Low);
    }

    #[test]
    fn test_bare_name_collects_every_rule() {
        let issues = auditor().check_name("my notes.md");
        let severities: Vec<(IssueKind, IssueSeverity)> =
            issues.iter().map(|issue| (issue.kind, issue.severity)).collect();
        assert_eq!(
            severities,
            vec![
                (IssueKind::MissingNumber, IssueSeverity::High),
                (IssueKind::InvalidFormat, IssueSeverity::High),
                (IssueKind::InvalidFormat, IssueSeverity::Medium),
                (IssueKind::InvalidFormat, IssueSeverity::Medium),
            ]
        );
    }

    #[test]
    fn test_long_name_flagged() {
        let name = format!("01-YYC3-Cater--架构类-{}.md", "长".repeat(100));
        let issues = auditor().check_name(&name);
        assert!(issues.iter().any(|issue| issue.message.contains("过长")));
    }

    #[test]
    fn test_skip_rules() {
        let auditor = auditor();
        assert!(auditor.is_skipped(Path::new("a.png"), "a.png"));
        assert!(auditor.is_skipped(Path::new("yyc3-check.md"), "yyc3-check.md"));
        assert!(auditor.is_skipped(Path::new("YYC3-文档索引.md"), "YYC3-文档索引.md"));
        assert!(auditor.is_skipped(Path::new("x审核报告.md"), "x审核报告.md"));
        assert!(!auditor.is_skipped(Path::new("01-a.md"), "01-a.md"));
    }

    #[test]
    fn test_script_prefix_is_case_sensitive() {
        let auditor = auditor();
        let name = "YYC3-Cater--架构类-缓存.md";
        assert!(!auditor.is_skipped(Path::new(name), name));
    }
}
