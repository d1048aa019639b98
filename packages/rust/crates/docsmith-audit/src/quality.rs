//! Document quality assessment.
//!
//! Scores five dimensions in `[0, 1]` from regex and counting heuristics,
//! combines them with per-document-type weights into a `[0, 100]` overall
//! score, and derives a letter grade, issue list and suggestions.
//!
//! The JSON form of [`QualityAssessment`] is read back by the graph builder,
//! which looks up `reports[].file_name` and `reports[].metrics.overall_score`.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use chrono::Local;
use docsmith_scanner::extract::compile_regex;
use docsmith_scanner::{DocsConfig, DocumentRecord, NamingConventions, ScanOutcome};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::markdown::percent;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^#\s+.+"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"@description|描述|说明"));
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"@author|作者"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"@version|版本|v\d+\.\d+\.\d+"));
static TOC_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"目录|TOC|##\s+\d+\."));
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^##\s+.+"));
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?s)```.*?```"));
static TECH_TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"API|接口|函数|类|方法|参数|返回值"));
static EXAMPLE_TERM_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"示例|例子|demo|Demo"));
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^#+\s+.+"));
static WELL_FORMED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^#+\s+"));
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^\s*[-*+]\s+"));
static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\|.*\|"));
static TERM_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\b[A-Z][a-zA-Z]+\b"));

/// Section names looked for in `##` headings.
pub const STANDARD_SECTIONS: [&str; 34] = [
    "概述", "简介", "背景", "目标", "范围",
    "核心概念", "基本概念", "术语", "定义",
    "实施步骤", "实现步骤", "操作指南", "使用方法",
    "代码示例", "示例代码", "代码实现",
    "注意事项", "限制", "约束",
    "最佳实践", "实践建议", "经验总结",
    "常见问题", "FAQ", "问题解答",
    "案例分析", "案例研究", "实际案例",
    "总结", "总结与展望", "结论",
    "参考文档", "相关文档", "参考资料",
];

/// Document kind, which selects the dimension weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// Architecture document.
    Architecture,
    /// Technique document (default).
    Technique,
    /// Template document.
    Template,
}

/// Dimension weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Completeness weight.
    pub completeness: f64,
    /// Accuracy weight.
    pub accuracy: f64,
    /// Readability weight.
    pub readability: f64,
    /// Practicality weight.
    pub practicality: f64,
    /// Consistency weight.
    pub consistency: f64,
}

impl DocKind {
    /// Detect the kind from a file name.
    #[must_use]
    pub fn detect(file_name: &str, conventions: &NamingConventions) -> Self {
        let name = file_name.to_lowercase();
        let technique = conventions.doc_types.get(1).map(String::as_str);
        let architecture = conventions.architecture_marker();
        if !architecture.is_empty() && name.contains(architecture) {
            Self::Architecture
        } else if technique.is_some_and(|marker| !marker.is_empty() && name.contains(marker)) {
            Self::Technique
        } else if conventions.is_template(&name) {
            Self::Template
        } else {
            Self::Technique
        }
    }

    /// Weights for this kind.
    #[must_use]
    pub fn weights(self) -> Weights {
        match self {
            Self::Architecture => Weights {
                completeness: 0.25,
                accuracy: 0.30,
                readability: 0.15,
                practicality: 0.20,
                consistency: 0.10,
            },
            Self::Technique => Weights {
                completeness: 0.20,
                accuracy: 0.20,
                readability: 0.20,
                practicality: 0.30,
                consistency: 0.10,
            },
            Self::Template => Weights {
                completeness: 0.30,
                accuracy: 0.20,
                readability: 0.15,
                practicality: 0.25,
                consistency: 0.10,
            },
        }
    }
}

/// Scores, flags and counters for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityMetrics {
    /// Completeness in `[0, 1]`.
    pub completeness: f64,
    /// Accuracy in `[0, 1]`.
    pub accuracy: f64,
    /// Readability in `[0, 1]`.
    pub readability: f64,
    /// Practicality in `[0, 1]`.
    pub practicality: f64,
    /// Consistency in `[0, 1]`.
    pub consistency: f64,
    /// Weighted overall score in `[0, 100]`.
    pub overall_score: f64,

    /// `# ` heading present.
    pub has_title: bool,
    /// Description marker present.
    pub has_description: bool,
    /// Author marker present.
    pub has_author: bool,
    /// Version marker present.
    pub has_version: bool,
    /// Table of contents present.
    pub has_table_of_contents: bool,
    /// At least one code block.
    pub has_code_examples: bool,
    /// Best-practice section present.
    pub has_best_practices: bool,
    /// Case-study section present.
    pub has_case_studies: bool,
    /// FAQ section present.
    pub has_faq: bool,
    /// References section present.
    pub has_references: bool,

    /// `## ` headings.
    pub total_sections: usize,
    /// Fenced code blocks.
    pub code_blocks: usize,
    /// Non-empty lines inside code blocks, fences excluded.
    pub code_lines: usize,
    /// Lines.
    pub total_lines: usize,
    /// Whitespace-separated words.
    pub word_count: usize,
    /// `total_lines / total_sections`.
    pub avg_section_length: f64,
}

impl QualityMetrics {
    /// Score of a named dimension, `None` for an unknown name.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<f64> {
        match name {
            "completeness" => Some(self.completeness),
            "accuracy" => Some(self.accuracy),
            "readability" => Some(self.readability),
            "practicality" => Some(self.practicality),
            "consistency" => Some(self.consistency),
            _ => None,
        }
    }
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitySeverity {
    /// Must fix.
    Critical,
    /// Should fix.
    Major,
    /// Nice to fix.
    Minor,
    /// Informational.
    Info,
}

impl QualitySeverity {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Info => "info",
        }
    }

    pub(crate) fn icon(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::Major => "🟡",
            Self::Minor => "🟢",
            Self::Info => "🔵",
        }
    }
}

/// One quality issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Severity.
    pub severity: QualitySeverity,
    /// Dimension the issue belongs to.
    pub category: String,
    /// What is wrong.
    pub message: String,
    /// How to fix it.
    pub suggestion: String,
}

impl QualityIssue {
    fn new(severity: QualitySeverity, category: &str, message: &str, suggestion: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            message: message.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}

/// Assessment of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentQualityReport {
    /// File path.
    pub file_path: String,
    /// File name.
    pub file_name: String,
    /// Document kind.
    pub doc_type: DocKind,
    /// Scores and counters.
    pub metrics: QualityMetrics,
    /// Letter grade.
    pub grade: String,
    /// Issues found.
    pub issues: Vec<QualityIssue>,
    /// Improvement suggestions.
    pub suggestions: Vec<String>,
}

/// Batch totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Documents assessed.
    pub total_documents: usize,
    /// Mean overall score.
    pub avg_score: f64,
    /// Count per grade, `A` through `F`.
    pub grade_distribution: BTreeMap<String, usize>,
}

/// Assessment of a whole tree; this is the JSON report shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// RFC 3339 assessment time.
    pub timestamp: String,
    /// Totals.
    pub summary: QualitySummary,
    /// Per-document assessments.
    pub reports: Vec<DocumentQualityReport>,
}

/// Letter grades, best first.
pub const GRADES: [&str; 5] = ["A", "B", "C", "D", "F"];

/// Letter grade for an overall score.
#[must_use]
pub fn quality_grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else if score >= 60.0 {
        "D"
    } else {
        "F"
    }
}

/// Headings (`##` and deeper) lowercased, for section lookups.
fn section_headings(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.starts_with("##"))
        .map(str::to_lowercase)
        .collect()
}

/// Which standard sections appear in a `##` heading, case-insensitively.
#[must_use]
pub fn standard_sections_found(content: &str) -> HashMap<&'static str, bool> {
    let headings = section_headings(content);
    STANDARD_SECTIONS
        .iter()
        .map(|section| {
            let needle = section.to_lowercase();
            (*section, headings.iter().any(|heading| heading.contains(&needle)))
        })
        .collect()
}

fn count_code(content: &str) -> (usize, usize) {
    let mut blocks = 0;
    let mut lines = 0;
    for block in CODE_BLOCK_RE.find_iter(content) {
        blocks += 1;
        lines += block
            .as_str()
            .split('\n')
            .filter(|line| !line.is_empty() && !line.starts_with("```"))
            .count();
    }
    (blocks, lines)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn completeness(metrics: &QualityMetrics, sections: &HashMap<&'static str, bool>) -> f64 {
    let metadata = [
        metrics.has_title,
        metrics.has_description,
        metrics.has_author,
        metrics.has_version,
        metrics.has_table_of_contents,
    ]
    .iter()
    .filter(|flag| **flag)
    .count();
    #[allow(clippy::cast_precision_loss)]
    let mut score = metadata as f64 * 6.0;
    score += ratio(sections.values().filter(|found| **found).count(), sections.len()) * 40.0;
    if metrics.has_code_examples {
        score += 10.0;
    }
    if metrics.has_best_practices {
        score += 10.0;
    }
    if metrics.has_case_studies {
        score += 5.0;
    }
    if metrics.has_faq {
        score += 5.0;
    }
    score / 100.0
}

fn accuracy(content: &str, metrics: &QualityMetrics) -> f64 {
    let mut score = 0.0;
    if metrics.has_code_examples && metrics.code_blocks > 0 {
        score += 40.0;
    } else if metrics.code_blocks > 0 {
        score += 20.0;
    }
    if TECH_TERM_RE.is_match(content) {
        score += 15.0;
    }
    if EXAMPLE_TERM_RE.is_match(content) {
        score += 15.0;
    }
    if metrics.has_version {
        score += 30.0;
    }
    score / 100.0
}

fn readability(content: &str, metrics: &QualityMetrics) -> f64 {
    let mut score = 0.0;

    let paragraphs: Vec<&str> = content.split("\n\n").collect();
    let total_chars: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
    let avg_paragraph = ratio(total_chars, paragraphs.len());
    if (100.0..=500.0).contains(&avg_paragraph) {
        score += 20.0;
    } else if (50.0..100.0).contains(&avg_paragraph)
        || (avg_paragraph > 500.0 && avg_paragraph <= 800.0)
    {
        score += 10.0;
    }

    let headings = HEADING_RE.find_iter(content).count();
    if headings >= 5 {
        score += 20.0;
    } else if headings >= 3 {
        score += 10.0;
    }

    let list_items = LIST_ITEM_RE.find_iter(content).count();
    if list_items >= 10 {
        score += 20.0;
    } else if list_items >= 5 {
        score += 10.0;
    }

    let table_rows = TABLE_ROW_RE.find_iter(content).count();
    if table_rows >= 3 {
        score += 20.0;
    } else if table_rows >= 1 {
        score += 10.0;
    }

    if metrics.code_blocks > 0 {
        score += 20.0;
    }
    score / 100.0
}

fn practicality(metrics: &QualityMetrics) -> f64 {
    let mut score = 0.0;
    if metrics.has_code_examples {
        if metrics.code_blocks >= 3 {
            score += 30.0;
        } else if metrics.code_blocks >= 1 {
            score += 15.0;
        }
    }
    if metrics.has_best_practices {
        score += 30.0;
    }
    if metrics.has_case_studies {
        score += 20.0;
    }
    if metrics.has_faq {
        score += 20.0;
    }
    score / 100.0
}

fn consistency(content: &str, metrics: &QualityMetrics) -> f64 {
    let mut score = 0.0;

    let mut term_counts: HashMap<&str, usize> = HashMap::new();
    for term in TERM_RE.find_iter(content) {
        *term_counts.entry(term.as_str()).or_default() += 1;
    }
    let top_term = term_counts.values().copied().max().unwrap_or(0);
    if top_term >= 3 {
        score += 30.0;
    } else if top_term >= 2 {
        score += 15.0;
    }

    let headings: Vec<&str> = HEADING_RE.find_iter(content).map(|m| m.as_str()).collect();
    if !headings.is_empty()
        && headings
            .iter()
            .all(|heading| WELL_FORMED_HEADING_RE.is_match(heading))
    {
        score += 30.0;
    }

    if metrics.code_blocks > 0 {
        score += 20.0;
    }
    if metrics.has_title && metrics.has_author && metrics.has_version {
        score += 20.0;
    }
    score / 100.0
}

fn issues_for(metrics: &QualityMetrics) -> Vec<QualityIssue> {
    use QualitySeverity::{Critical, Major, Minor};

    let mut issues = Vec::new();
    let rules: [(bool, QualitySeverity, &str, &str, &str); 10] = [
        (!metrics.has_title, Critical, "completeness", "文档缺少标题", "在文档开头添加 # 标题"),
        (!metrics.has_description, Major, "completeness", "文档缺少描述信息", "添加 @description 或描述章节"),
        (!metrics.has_author, Major, "completeness", "文档缺少作者信息", "添加 @author 或作者章节"),
        (!metrics.has_version, Major, "completeness", "文档缺少版本信息", "添加 @version 或版本章节"),
        (!metrics.has_table_of_contents, Minor, "completeness", "文档缺少目录", "添加目录章节，提升文档可导航性"),
        (!metrics.has_code_examples, Major, "practicality", "文档缺少代码示例", "添加代码示例，提升文档实用性"),
        (!metrics.has_best_practices, Major, "practicality", "文档缺少最佳实践", "添加最佳实践章节，分享经验总结"),
        (!metrics.has_case_studies, Minor, "practicality", "文档缺少案例分析", "添加案例分析章节，提供实际应用场景"),
        (!metrics.has_faq, Minor, "practicality", "文档缺少常见问题", "添加常见问题章节，解答用户疑问"),
        (metrics.code_blocks == 0, Major, "accuracy", "文档缺少代码块", "添加代码块，提供具体实现示例"),
    ];
    for (violated, severity, category, message, suggestion) in rules {
        if violated {
            issues.push(QualityIssue::new(severity, category, message, suggestion));
        }
    }
    if metrics.total_sections < 5 {
        issues.push(QualityIssue::new(
            Minor,
            "readability",
            &format!("文档章节过少（仅{}个）", metrics.total_sections),
            "增加更多章节，完善文档结构",
        ));
    }
    issues
}

/// Score dimensions in report order.
pub const DIMENSIONS: [&str; 5] = [
    "completeness",
    "accuracy",
    "readability",
    "practicality",
    "consistency",
];

/// Dimension score below which suggestions are made.
pub const DIMENSION_THRESHOLD: f64 = 0.7;

/// Fixed suggestions for a weak dimension.
#[must_use]
pub fn dimension_suggestions(dimension: &str) -> &'static [&'static str] {
    match dimension {
        "completeness" => &[
            "完善文档元数据，添加标题、描述、作者、版本等信息",
            "增加标准章节：概述、核心概念、实施步骤、代码示例等",
        ],
        "accuracy" => &["添加更多代码示例，提升技术准确性", "提供具体的API接口、函数、参数说明"],
        "readability" => &[
            "优化段落长度，控制在100-500字之间",
            "增加列表、表格等格式，提升可读性",
            "添加更多标题层级，改善文档结构",
        ],
        "practicality" => &[
            "添加最佳实践章节，分享经验总结",
            "增加案例分析，提供实际应用场景",
            "补充常见问题，解答用户疑问",
        ],
        "consistency" => &[
            "统一术语使用，保持命名一致性",
            "规范格式，保持标题、列表等格式统一",
            "统一代码风格，保持代码格式一致",
        ],
        _ => &[],
    }
}

fn suggestions_for(metrics: &QualityMetrics) -> Vec<String> {
    DIMENSIONS
        .iter()
        .filter(|dimension| metrics.dimension(dimension).unwrap_or(1.0) < DIMENSION_THRESHOLD)
        .flat_map(|dimension| dimension_suggestions(dimension).iter().map(ToString::to_string))
        .collect()
}

/// Scores documents.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    conventions: NamingConventions,
}

impl QualityAssessor {
    /// Build an assessor from the workspace configuration.
    #[must_use]
    pub fn new(config: &DocsConfig) -> Self {
        Self {
            conventions: config.conventions.clone(),
        }
    }

    /// Compute metrics for a document's text.
    #[must_use]
    pub fn metrics(&self, content: &str, kind: DocKind) -> QualityMetrics {
        let sections = standard_sections_found(content);
        let found = |names: &[&str]| {
            names
                .iter()
                .any(|name| sections.get(*name).copied().unwrap_or(false))
        };

        let total_sections = SECTION_RE.find_iter(content).count();
        let (code_blocks, code_lines) = count_code(content);
        let total_lines = content.split('\n').count();

        let mut metrics = QualityMetrics {
            has_title: TITLE_RE.is_match(content),
            has_description: DESCRIPTION_RE.is_match(content),
            has_author: AUTHOR_RE.is_match(content),
            has_version: VERSION_RE.is_match(content),
            has_table_of_contents: TOC_RE.is_match(content),
            has_code_examples: code_blocks > 0,
            has_best_practices: found(&["最佳实践", "实践建议"]),
            has_case_studies: found(&["案例分析", "案例研究"]),
            has_faq: found(&["常见问题", "FAQ", "问题解答"]),
            has_references: found(&["参考文档", "相关文档"]),
            total_sections,
            code_blocks,
            code_lines,
            total_lines,
            word_count: content.split_whitespace().count(),
            avg_section_length: ratio(total_lines, total_sections),
            ..QualityMetrics::default()
        };

        metrics.completeness = completeness(&metrics, &sections);
        metrics.accuracy = accuracy(content, &metrics);
        metrics.readability = readability(content, &metrics);
        metrics.practicality = practicality(&metrics);
        metrics.consistency = consistency(content, &metrics);

        let weights = kind.weights();
        metrics.overall_score = (metrics.completeness * weights.completeness
            + metrics.accuracy * weights.accuracy
            + metrics.readability * weights.readability
            + metrics.practicality * weights.practicality
            + metrics.consistency * weights.consistency)
            * 100.0;
        metrics.overall_score = metrics.overall_score.clamp(0.0, 100.0);
        metrics
    }

    /// Assess one scanned document.
    #[must_use]
    pub fn assess(&self, record: &DocumentRecord) -> DocumentQualityReport {
        let doc_type = DocKind::detect(&record.file_name, &self.conventions);
        let metrics = self.metrics(&record.content, doc_type);
        let grade = quality_grade(metrics.overall_score).to_string();
        log::debug!(
            "Assessed {}: {:.1} ({grade})",
            record.file_name,
            metrics.overall_score
        );
        DocumentQualityReport {
            file_path: record.path.to_string_lossy().into_owned(),
            file_name: record.file_name.clone(),
            doc_type,
            issues: issues_for(&metrics),
            suggestions: suggestions_for(&metrics),
            metrics,
            grade,
        }
    }

    /// Assess every scanned document.
    #[must_use]
    pub fn assess_all(&self, outcome: &ScanOutcome) -> QualityAssessment {
        let reports: Vec<DocumentQualityReport> =
            outcome.documents.iter().map(|record| self.assess(record)).collect();
        for failure in &outcome.failures {
            log::warn!("Quality assessment skipped {}: {}", failure.relative_path, failure.reason);
        }
        let summary = QualitySummary::from_reports(&reports);
        log::info!(
            "Quality: {} documents, average {:.1}",
            summary.total_documents,
            summary.avg_score
        );
        QualityAssessment {
            timestamp: Local::now().to_rfc3339(),
            summary,
            reports,
        }
    }
}

impl QualitySummary {
    /// Totals over per-document reports.
    #[must_use]
    pub fn from_reports(reports: &[DocumentQualityReport]) -> Self {
        let mut grade_distribution: BTreeMap<String, usize> =
            GRADES.iter().map(|grade| ((*grade).to_string(), 0)).collect();
        for report in reports {
            *grade_distribution.entry(report.grade.clone()).or_default() += 1;
        }
        let total: f64 = reports.iter().map(|report| report.metrics.overall_score).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg_score = if reports.is_empty() {
            0.0
        } else {
            total / reports.len() as f64
        };
        Self {
            total_documents: reports.len(),
            avg_score,
            grade_distribution,
        }
    }
}

impl QualityAssessment {
    /// Share of documents scoring at least 60.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let passing = self
            .reports
            .iter()
            .filter(|report| report.metrics.overall_score >= 60.0)
            .count();
        percent(passing, self.reports.len())
    }

    /// Reports ordered by score, highest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&DocumentQualityReport> {
        let mut ranked: Vec<&DocumentQualityReport> = self.reports.iter().collect();
        ranked.sort_by(|a, b| {
            b.metrics
                .overall_score
                .total_cmp(&a.metrics.overall_score)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        ranked
    }

    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, brand: &str, root: &Path) -> String {
        let summary = &self.summary;
        let mut out = String::new();
        out.push_str(&format!("# {brand} 文档质量评估报告\n\n"));
        out.push_str(&format!("**评估时间**: {}\n", self.timestamp));
        out.push_str(&format!("**评估目录**: {}\n\n", root.display()));

        out.push_str("## 📊 总体统计\n\n");
        out.push_str(&format!("- **总文档数**: {}\n", summary.total_documents));
        out.push_str(&format!("- **平均评分**: {:.1}\n", summary.avg_score));
        out.push_str(&format!("- **通过率**: {:.1}%\n\n", self.pass_rate()));

        out.push_str("### 等级分布\n\n| 等级 | 数量 | 占比 |\n|------|------|------|\n");
        for grade in GRADES {
            let count = summary.grade_distribution.get(grade).copied().unwrap_or(0);
            out.push_str(&format!(
                "| {grade} | {count} | {:.1}% |\n",
                percent(count, summary.total_documents)
            ));
        }

        let ranked = self.ranked();
        out.push_str("\n### 评分分布\n\n```text\n");
        for report in &ranked {
            let score = report.metrics.overall_score;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bar = "█".repeat((score / 5.0).floor() as usize);
            out.push_str(&format!("{score:5.1} {bar} {}\n", report.file_name));
        }
        out.push_str("```\n\n## 📈 详细评估结果\n\n");

        for report in &ranked {
            let metrics = &report.metrics;
            out.push_str(&format!("### {}\n\n", report.file_name));
            out.push_str(&format!(
                "**等级**: {} | **评分**: {:.1}\n\n",
                report.grade, metrics.overall_score
            ));
            out.push_str("#### 质量指标\n\n");
            out.push_str(&format!("- **完整性**: {:.1}%\n", metrics.completeness * 100.0));
            out.push_str(&format!("- **准确性**: {:.1}%\n", metrics.accuracy * 100.0));
            out.push_str(&format!("- **可读性**: {:.1}%\n", metrics.readability * 100.0));
            out.push_str(&format!("- **实用性**: {:.1}%\n", metrics.practicality * 100.0));
            out.push_str(&format!("- **一致性**: {:.1}%\n\n", metrics.consistency * 100.0));

            if !report.issues.is_empty() {
                out.push_str("#### 发现的问题\n\n");
                for issue in &report.issues {
                    out.push_str(&format!(
                        "{} **{}**: {}\n   建议: {}\n\n",
                        issue.severity.icon(),
                        issue.severity.as_str(),
                        issue.message,
                        issue.suggestion
                    ));
                }
            }
            if !report.suggestions.is_empty() {
                out.push_str("#### 改进建议\n\n");
                for suggestion in &report.suggestions {
                    out.push_str(&format!("- {suggestion}\n"));
                }
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICH_DOC: &str = "---\n**@file**：x\n**@description**：缓存策略\n**@author**：YYC³\n**@version**：v1.0.0\n---\n\n# 缓存策略\n\n## 目录\n\n- [概述](#1)\n- [最佳实践](#2)\n\n## 1. 概述\n\nRedis 缓存通过 API 接口访问，示例如下。\n\n```rust\nlet cache = Redis::open();\ncache.get(key);\n```\n\n## 2. 最佳实践\n\n| 项 | 值 |\n|---|---|\n| TTL | 60 |\n\n## 3. 案例分析\n\nRedis Redis\n\n## 4. 常见问题\n\n## 5. 参考文档\n";

    #[test]
    fn test_sections_list_has_no_duplicates() {
        let unique: std::collections::HashSet<&str> = STANDARD_SECTIONS.iter().copied().collect();
        assert_eq!(unique.len(), STANDARD_SECTIONS.len());
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(quality_grade(90.0), "A");
        assert_eq!(quality_grade(89.99), "B");
        assert_eq!(quality_grade(70.0), "C");
        assert_eq!(quality_grade(60.0), "D");
        assert_eq!(quality_grade(59.9), "F");
    }

    #[test]
    fn test_doc_kind_detection() {
        let conventions = NamingConventions::default();
        assert_eq!(DocKind::detect("01-YYC3-Cater--架构类-a.md", &conventions), DocKind::Architecture);
        assert_eq!(DocKind::detect("01-YYC3-Cater--技巧类-a.md", &conventions), DocKind::Technique);
        assert_eq!(DocKind::detect("发布模板.md", &conventions), DocKind::Template);
        assert_eq!(DocKind::detect("notes.md", &conventions), DocKind::Technique);
    }

    #[test]
    fn test_rich_document_metrics() {
        let assessor = QualityAssessor::new(&DocsConfig::default());
        let metrics = assessor.metrics(RICH_DOC, DocKind::Technique);
        assert!(metrics.has_title && metrics.has_author && metrics.has_version);
        assert!(metrics.has_best_practices && metrics.has_case_studies && metrics.has_faq);
        assert!(metrics.has_references);
        assert_eq!(metrics.code_blocks, 1);
        assert_eq!(metrics.code_lines, 2);
        assert_eq!(metrics.total_sections, 6);
        assert!((metrics.practicality - 0.85).abs() < 1e-9);
        assert!((metrics.accuracy - 1.0).abs() < 1e-9);
        for score in [
            metrics.completeness,
            metrics.accuracy,
            metrics.readability,
            metrics.practicality,
            metrics.consistency,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
        assert!((0.0..=100.0).contains(&metrics.overall_score));
    }

    #[test]
    fn test_deep_headings_keep_consistency_points() {
        let assessor = QualityAssessor::new(&DocsConfig::default());
        let shallow = assessor.metrics("# 标题\n\n###### 六级\n", DocKind::Technique);
        let deep = assessor.metrics("# 标题\n\n####### 七级\n", DocKind::Technique);
        assert!((shallow.consistency - 0.3).abs() < 1e-9);
        assert!((deep.consistency - shallow.consistency).abs() < 1e-9);
    }

    #[test]
    fn test_empty_document_scores_zero_and_lists_issues() {
        let assessor = QualityAssessor::new(&DocsConfig::default());
        let metrics = assessor.metrics("", DocKind::Architecture);
        assert!(metrics.overall_score.abs() < 1e-9);
        let issues = issues_for(&metrics);
        assert_eq!(issues.len(), 11);
        assert_eq!(issues[0].severity, QualitySeverity::Critical);
        assert_eq!(suggestions_for(&metrics).len(), 13);
    }
}
