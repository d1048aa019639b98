//! Second-pass audit over a saved quality assessment.
//!
//! Works on [`QualityAssessment`] alone: per dimension it collects the
//! documents scoring below [`DIMENSION_THRESHOLD`], turns them into a
//! prioritized finding, summarizes the score distribution, and folds the
//! findings into a four-horizon improvement plan.

use std::collections::BTreeMap;

use chrono::Local;
use serde::Serialize;

use crate::markdown::{now_display, percent};
use crate::quality::{
    DIMENSION_THRESHOLD, DIMENSIONS, DocumentQualityReport, GRADES, QualityAssessment,
    QualitySeverity, dimension_suggestions, quality_grade,
};

/// More low-completeness documents than this makes the finding critical.
const CRITICAL_LOW_DOCS: usize = 30;

const AFFECTED_DOCS_SHOWN: usize = 10;

const COMMON_ISSUES_SHOWN: usize = 5;

const SHORT_TERM_ROUTINE: [&str; 3] = [
    "建立文档质量检查清单，在文档创建时使用",
    "定期进行文档质量评审，每月至少一次",
    "建立文档质量奖励机制，鼓励高质量文档",
];

const MEDIUM_TERM_ROUTINE: [&str; 3] = [
    "开发文档质量自动化检查工具",
    "建立文档质量监控仪表板",
    "开展文档质量培训课程",
];

const LONG_TERM_ROUTINE: [&str; 3] = [
    "建立文档质量持续改进机制",
    "建立文档质量知识库",
    "定期发布文档质量报告",
];

fn dimension_label(dimension: &str) -> &'static str {
    match dimension {
        "completeness" => "完整性",
        "accuracy" => "准确性",
        "readability" => "可读性",
        "practicality" => "实用性",
        "consistency" => "一致性",
        _ => "其他",
    }
}

fn dimension_priority(dimension: &str) -> u8 {
    match dimension {
        "completeness" => 1,
        "accuracy" | "practicality" => 2,
        "readability" => 3,
        _ => 4,
    }
}

fn dimension_severity(dimension: &str, low_docs: usize) -> QualitySeverity {
    match dimension {
        "completeness" if low_docs > CRITICAL_LOW_DOCS => QualitySeverity::Critical,
        "consistency" => QualitySeverity::Minor,
        _ => QualitySeverity::Major,
    }
}

/// One dimension-level finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditFinding {
    /// Dimension key, e.g. `completeness`.
    pub dimension: String,
    /// Display name of the dimension.
    pub category: String,
    /// Severity.
    pub severity: QualitySeverity,
    /// Count and average of the weak documents.
    pub description: String,
    /// First weak documents by file name.
    pub affected_docs: Vec<String>,
    /// Suggestions joined into one line.
    pub recommendation: String,
    /// 1 is most urgent.
    pub priority: u8,
}

/// Score picture of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityTrend {
    /// Display name of the dimension.
    pub dimension: String,
    /// Average score in `[0, 100]`.
    pub avg_score: f64,
    /// Documents per letter grade of this dimension's score.
    pub score_distribution: BTreeMap<String, usize>,
    /// Distinct issue messages of weak documents.
    pub common_issues: Vec<String>,
    /// `100 - avg_score`.
    pub improvement_potential: f64,
}

/// Recommendations grouped by horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImprovementPlan {
    /// Priority 1.
    pub immediate: Vec<String>,
    /// Priority 2 plus routine items.
    pub short_term: Vec<String>,
    /// Priority 3 plus routine items.
    pub medium_term: Vec<String>,
    /// Everything else plus routine items.
    pub long_term: Vec<String>,
}

impl ImprovementPlan {
    /// Group findings by priority and append the routine items.
    #[must_use]
    pub fn from_findings(findings: &[AuditFinding]) -> Self {
        let mut plan = Self::default();
        for finding in findings {
            let horizon = match finding.priority {
                1 => &mut plan.immediate,
                2 => &mut plan.short_term,
                3 => &mut plan.medium_term,
                _ => &mut plan.long_term,
            };
            horizon.push(finding.recommendation.clone());
        }
        plan.short_term
            .extend(SHORT_TERM_ROUTINE.iter().map(ToString::to_string));
        plan.medium_term
            .extend(MEDIUM_TERM_ROUTINE.iter().map(ToString::to_string));
        plan.long_term
            .extend(LONG_TERM_ROUTINE.iter().map(ToString::to_string));
        plan
    }

    /// Number of plan items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.immediate.len() + self.short_term.len() + self.medium_term.len() + self.long_term.len()
    }

    /// True when the plan has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a quality audit; this is the JSON report shape.
#[derive(Debug, Clone, Serialize)]
pub struct QualityAudit {
    /// Local time of the audit.
    pub generated_at: String,
    /// Timestamp of the audited assessment.
    pub assessed_at: String,
    /// Documents in the assessment.
    pub total_documents: usize,
    /// Mean overall score.
    pub avg_score: f64,
    /// Share of documents scoring at least 60.
    pub pass_rate: f64,
    /// Count per overall grade.
    pub grade_distribution: BTreeMap<String, usize>,
    /// Findings in dimension order.
    pub findings: Vec<AuditFinding>,
    /// One trend per dimension.
    pub trends: Vec<QualityTrend>,
    /// Recommendations by horizon.
    pub improvement_plan: ImprovementPlan,
}

struct DimensionAnalysis {
    low_docs: Vec<String>,
    common_issues: Vec<String>,
    average: f64,
}

fn analyze_dimension(reports: &[DocumentQualityReport], dimension: &str) -> DimensionAnalysis {
    let mut low_docs = Vec::new();
    let mut common_issues: Vec<String> = Vec::new();
    let mut total = 0.0;
    for report in reports {
        let score = report.metrics.dimension(dimension).unwrap_or_default();
        total += score;
        if score >= DIMENSION_THRESHOLD {
            continue;
        }
        low_docs.push(report.file_name.clone());
        for issue in report.issues.iter().filter(|issue| issue.category == dimension) {
            if !common_issues.contains(&issue.message) {
                common_issues.push(issue.message.clone());
            }
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let average = if reports.is_empty() {
        0.0
    } else {
        total / reports.len() as f64
    };
    DimensionAnalysis {
        low_docs,
        common_issues,
        average,
    }
}

fn finding_for(dimension: &str, analysis: &DimensionAnalysis) -> Option<AuditFinding> {
    if analysis.low_docs.is_empty() {
        return None;
    }
    let label = dimension_label(dimension);
    Some(AuditFinding {
        dimension: dimension.to_string(),
        category: label.to_string(),
        severity: dimension_severity(dimension, analysis.low_docs.len()),
        description: format!(
            "{}个文档{label}不足（平均{:.1}%）",
            analysis.low_docs.len(),
            analysis.average * 100.0
        ),
        affected_docs: analysis.low_docs.iter().take(AFFECTED_DOCS_SHOWN).cloned().collect(),
        recommendation: dimension_suggestions(dimension).join("；"),
        priority: dimension_priority(dimension),
    })
}

fn trend_for(
    reports: &[DocumentQualityReport],
    dimension: &str,
    analysis: &DimensionAnalysis,
) -> QualityTrend {
    let mut score_distribution: BTreeMap<String, usize> =
        GRADES.iter().map(|grade| ((*grade).to_string(), 0)).collect();
    for report in reports {
        let score = report.metrics.dimension(dimension).unwrap_or_default() * 100.0;
        *score_distribution.entry(quality_grade(score).to_string()).or_default() += 1;
    }
    QualityTrend {
        dimension: dimension_label(dimension).to_string(),
        avg_score: analysis.average * 100.0,
        score_distribution,
        common_issues: analysis.common_issues.iter().take(COMMON_ISSUES_SHOWN).cloned().collect(),
        improvement_potential: (1.0 - analysis.average) * 100.0,
    }
}

/// Audit a saved assessment.
#[must_use]
pub fn audit_quality(assessment: &QualityAssessment) -> QualityAudit {
    let mut findings = Vec::new();
    let mut trends = Vec::new();
    for dimension in DIMENSIONS {
        let analysis = analyze_dimension(&assessment.reports, dimension);
        findings.extend(finding_for(dimension, &analysis));
        trends.push(trend_for(&assessment.reports, dimension, &analysis));
    }
    let improvement_plan = ImprovementPlan::from_findings(&findings);
    log::info!(
        "Quality audit: {} documents, {} findings, {} plan items",
        assessment.summary.total_documents,
        findings.len(),
        improvement_plan.len()
    );
    QualityAudit {
        generated_at: Local::now().to_rfc3339(),
        assessed_at: assessment.timestamp.clone(),
        total_documents: assessment.summary.total_documents,
        avg_score: assessment.summary.avg_score,
        pass_rate: assessment.pass_rate(),
        grade_distribution: assessment.summary.grade_distribution.clone(),
        findings,
        trends,
        improvement_plan,
    }
}

fn plan_section(out: &mut String, title: &str, items: &[String]) {
    out.push_str(&format!("### {title}\n\n"));
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
    out.push('\n');
}

impl QualityAudit {
    fn grade_count(&self, grade: &str) -> usize {
        self.grade_distribution.get(grade).copied().unwrap_or_default()
    }

    /// Render the Markdown report.
    #[must_use]
    pub fn to_markdown(&self, brand: &str) -> String {
        let mut out = format!("# {brand} 文档质量审计报告\n\n");
        out.push_str(&format!("**审计时间**: {}\n", now_display()));
        out.push_str(&format!("**评估时间**: {}\n\n", self.assessed_at));

        out.push_str("## 📊 审计概览\n\n");
        out.push_str(&format!("- **总文档数**: {}\n", self.total_documents));
        out.push_str(&format!("- **平均评分**: {:.1}\n", self.avg_score));
        out.push_str(&format!("- **通过率**: {:.1}%\n\n", self.pass_rate));

        out.push_str("### 等级分布\n\n");
        out.push_str("| 等级 | 数量 | 占比 |\n");
        out.push_str("|------|------|------|\n");
        for grade in GRADES {
            let count = self.grade_count(grade);
            out.push_str(&format!(
                "| {grade} | {count} | {:.1}% |\n",
                percent(count, self.total_documents)
            ));
        }
        out.push('\n');

        out.push_str("## 🔍 关键发现\n\n");
        if self.findings.is_empty() {
            out.push_str("各维度均达到阈值，未发现关键问题。\n\n");
        }
        for (index, finding) in self.findings.iter().enumerate() {
            out.push_str(&format!(
                "### {}. {}问题 ({})\n\n",
                index + 1,
                finding.category,
                finding.severity.icon()
            ));
            out.push_str(&format!("**严重程度**: {}\n", finding.severity.as_str()));
            out.push_str(&format!("**优先级**: {}\n\n", finding.priority));
            out.push_str(&format!("**问题描述**: {}\n\n", finding.description));
            if !finding.affected_docs.is_empty() {
                out.push_str(&format!("**受影响文档**（前{AFFECTED_DOCS_SHOWN}个）:\n"));
                for doc in &finding.affected_docs {
                    out.push_str(&format!("- {doc}\n"));
                }
                out.push('\n');
            }
            out.push_str(&format!("**改进建议**: {}\n\n", finding.recommendation));
        }

        out.push_str("## 📈 质量趋势分析\n\n");
        for trend in &self.trends {
            out.push_str(&format!("### {}\n\n", trend.dimension));
            out.push_str(&format!("**平均评分**: {:.1}%\n", trend.avg_score));
            out.push_str(&format!("**改进潜力**: {:.1}%\n\n", trend.improvement_potential));
            out.push_str("**评分分布**:\n");
            out.push_str("| 等级 | 数量 |\n");
            out.push_str("|------|------|\n");
            for grade in GRADES {
                let count = trend.score_distribution.get(grade).copied().unwrap_or_default();
                out.push_str(&format!("| {grade} | {count} |\n"));
            }
            out.push('\n');
            if !trend.common_issues.is_empty() {
                out.push_str("**常见问题**:\n");
                for issue in &trend.common_issues {
                    out.push_str(&format!("- {issue}\n"));
                }
                out.push('\n');
            }
        }

        out.push_str("## 🎯 改进计划\n\n");
        let plan = &self.improvement_plan;
        plan_section(&mut out, "立即执行", &plan.immediate);
        plan_section(&mut out, "短期（1-2周）", &plan.short_term);
        plan_section(&mut out, "中期（1个月）", &plan.medium_term);
        plan_section(&mut out, "长期（持续）", &plan.long_term);

        out.push_str("## 📋 总结\n\n");
        out.push_str(&format!(
            "本次审计共评估{}个文档，平均评分{:.1}分。\n\n",
            self.total_documents, self.avg_score
        ));
        out.push_str("主要发现：\n");
        for grade in GRADES {
            let count = self.grade_count(grade);
            out.push_str(&format!(
                "- {count}个文档达到{grade}级标准（{:.1}%）\n",
                percent(count, self.total_documents)
            ));
        }
        out
    }
}
