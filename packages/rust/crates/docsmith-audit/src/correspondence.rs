//! Name/content correspondence: does a file's name describe its content?
//!
//! File-name keywords are compared with keywords drawn from the title,
//! description, info table and table of contents using Jaccard overlap.


use docsmith_scanner::extract::content_keywords;
use docsmith_scanner::{
    CorrespondenceSettings, DocsConfig, DocumentRecord, NamingConventions, ScanFailure,
    ScanOutcome, jaccard, keywords_from_file_name,
};
use serde::Serialize;

use crate::markdown::{keyword_cell, now_display, percent};

/// Check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrespondenceStatus {
    /// Similarity reached the pass threshold.
    Pass,
    /// Similarity below the pass threshold.
    Fail,
    /// The document could not be read.
    Error,
}

/// Fix priority of a failing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    /// Name and content are unrelated.
    P0,
    /// Name and content overlap weakly.
    P1,
}

/// Letter grade for a similarity value.
#[must_use]
pub fn similarity_grade(similarity: f64) -> char {
    if similarity >= 0.7 {
        'A'
    } else if similarity >= 0.5 {
        'B'
    } else if similarity >= 0.3 {
        'C'
    } else if similarity >= 0.1 {
        'D'
    } else {
        'F'
    }
}

/// Per-document result.
#[derive(Debug, Clone, Serialize)]
pub struct CorrespondenceResult {
    /// File name.
    pub file_name: String,
    /// Path relative to the scan root.
    pub relative_path: String,
    /// Keywords from the file name.
    pub name_keywords: Vec<String>,
    /// Keywords from the content.
    pub content_keywords: Vec<String>,
    /// Jaccard similarity of the two keyword sets.
    pub similarity: f64,
    /// Outcome.
    pub status: CorrespondenceStatus,
    /// Problems found.
    pub issues: Vec<String>,
    /// Read error, for `Error` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fix priority, for `Fail` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Letter grade of the similarity.
    pub grade: char,
}

/// Results for a whole scan.
#[derive(Debug, Clone, Serialize)]
pub struct CorrespondenceAudit {
    /// Audit time.
    pub generated_at: String,
    /// Documents checked, including unreadable ones.
    pub total: usize,
    /// Passing documents.
    pub passed: usize,
    /// Failing or unreadable documents.
    pub failed: usize,
    /// Per-document results in scan order.
    pub results: Vec<CorrespondenceResult>,
}

impl CorrespondenceAudit {
    /// `passed / total * 100`.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        percent(self.passed, self.total)
    }

    /// Results with the given priority.
    pub fn with_priority(&self, priority: Priority) -> impl Iterator<Item = &CorrespondenceResult> {
        self.results
            .iter()
            .filter(move |result| result.priority == Some(priority))
    }
}

/// Compares document names with document content.
#[derive(Debug, Clone)]
pub struct NameContentChecker {
    conventions: NamingConventions,
    settings: CorrespondenceSettings,
}

impl NameContentChecker {
    /// Build a checker from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            conventions: config.conventions.clone(),
            settings: config.correspondence,
        }
    }

    /// Check one scanned document.
    #[must_use]
    pub fn check_document(&self, record: &DocumentRecord) -> CorrespondenceResult {
        let name_keywords = keywords_from_file_name(&record.file_name, &self.conventions);
        let content_keywords = content_keywords(&record.content);
        let similarity = jaccard(&name_keywords, &content_keywords);

        let passed = similarity >= self.settings.pass_threshold;
        let (status, issues, priority) = if passed {
            (CorrespondenceStatus::Pass, Vec::new(), None)
        } else {
            let priority = if similarity < self.settings.critical_threshold {
                Priority::P0
            } else {
                Priority::P1
            };
            (
                CorrespondenceStatus::Fail,
                vec![format!("相似度过低（{similarity:.2}）")],
                Some(priority),
            )
        };
        log::debug!("{}: similarity {similarity:.2}", record.relative_path);

        CorrespondenceResult {
            file_name: record.file_name.clone(),
            relative_path: record.relative_path.clone(),
            name_keywords,
            content_keywords,
            similarity,
            status,
            issues,
            error: None,
            priority,
            grade: similarity_grade(similarity),
        }
    }

    /// Result for a file the scanner could not read.
    #[must_use]
    pub fn check_failure(&self, failure: &ScanFailure) -> CorrespondenceResult {
        CorrespondenceResult {
            file_name: failure.file_name.clone(),
            relative_path: failure.relative_path.clone(),
            name_keywords: keywords_from_file_name(&failure.file_name, &self.conventions),
            content_keywords: Vec::new(),
            similarity: 0.0,
            status: CorrespondenceStatus::Error,
            issues: Vec::new(),
            error: Some(failure.reason.clone()),
            priority: None,
            grade: similarity_grade(0.0),
        }
    }

    /// Check every scanned document; unreadable files become `Error` results.
    #[must_use]
    pub fn check_all(&self, outcome: &ScanOutcome) -> CorrespondenceAudit {
        let mut results: Vec<CorrespondenceResult> = outcome
            .documents
            .iter()
            .map(|record| self.check_document(record))
            .chain(outcome.failures.iter().map(|failure| self.check_failure(failure)))
            .collect();
        results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        let passed = results
            .iter()
            .filter(|result| result.status == CorrespondenceStatus::Pass)
            .count();
        let total = results.len();
        log::info!("Correspondence: {passed}/{total} documents passed");

        CorrespondenceAudit {
            generated_at: now_display(),
            total,
            passed,
            failed: total - passed,
            results,
        }
    }
}

fn write_issue_table(
    out: &mut String,
    results: impl Iterator<Item = CorrespondenceResult>,
    label: &str,
    advice: &str,
) {
    out.push_str("| 文档名称 | 名称关键词 | 内容关键词 | 相似度 | 优先级 | 建议修复 |\n");
    out.push_str("|---------|-----------|-----------|--------|--------|---------|\n");
    for result in results {
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {label} | {advice} |\n",
            result.file_name,
            keyword_cell(&result.name_keywords),
            keyword_cell(&result.content_keywords),
            result.similarity
        ));
    }
}

impl CorrespondenceAudit {
    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, brand: &str, settings: &CorrespondenceSettings) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {brand} 文档名称与内容对应关系审核报告\n\n"));
        out.push_str("## 📋 审核概述\n\n");
        out.push_str(&format!("- 审核时间：{}\n", self.generated_at));
        out.push_str(&format!("- 审核文档总数：{}个\n", self.total));
        out.push_str(&format!("- ✅ 通过文档数：{}个\n", self.passed));
        out.push_str(&format!("- ❌ 未通过文档数：{}个\n", self.failed));
        out.push_str(&format!("- 📊 通过率：{:.1}%\n\n", self.pass_rate()));

        out.push_str("## 🔍 详细问题列表\n\n");
        out.push_str(&format!(
            "### 严重问题（P0，相似度 < {}）\n\n",
            settings.critical_threshold
        ));
        write_issue_table(
            &mut out,
            self.with_priority(Priority::P0).cloned(),
            "P0",
            "重新命名文档或补充内容关键词",
        );
        out.push_str(&format!(
            "\n### 警告问题（P1，{} ≤ 相似度 < {}）\n\n",
            settings.critical_threshold, settings.pass_threshold
        ));
        write_issue_table(
            &mut out,
            self.with_priority(Priority::P1).cloned(),
            "P1",
            "优化文档名称或内容",
        );

        let errors: Vec<&CorrespondenceResult> = self
            .results
            .iter()
            .filter(|result| result.status == CorrespondenceStatus::Error)
            .collect();
        if !errors.is_empty() {
            out.push_str("\n### 读取失败\n\n| 文档名称 | 错误 |\n|---------|------|\n");
            for result in errors {
                out.push_str(&format!(
                    "| {} | {} |\n",
                    result.file_name,
                    result.error.as_deref().unwrap_or_default()
                ));
            }
        }

        out.push_str("\n### 合规文档\n\n");
        out.push_str("| 文档名称 | 名称关键词 | 内容关键词 | 相似度 |\n");
        out.push_str("|---------|-----------|-----------|--------|\n");
        for result in self
            .results
            .iter()
            .filter(|result| result.status == CorrespondenceStatus::Pass)
        {
            out.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                result.file_name,
                keyword_cell(&result.name_keywords),
                keyword_cell(&result.content_keywords),
                result.similarity
            ));
        }

        out.push_str("\n## 📊 评分标准\n\n");
        out.push_str("| 相似度范围 | 等级 | 说明 |\n|-----------|------|------|\n");
        out.push_str("| 0.7-1.0 | A | 优秀，名称与内容高度一致 |\n");
        out.push_str("| 0.5-0.7 | B | 良好，名称与内容基本一致 |\n");
        out.push_str("| 0.3-0.5 | C | 可接受，名称与内容部分一致 |\n");
        out.push_str("| 0.1-0.3 | D | 需要改进，名称与内容一致性较低 |\n");
        out.push_str("| 0.0-0.1 | F | 不合规，名称与内容不一致 |\n");
        out
    }
}
