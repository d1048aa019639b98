//! docsmith-audit - Read-only checks over a documentation tree.
//!
//! Each auditor produces a serializable result plus a Markdown rendering.
//! Nothing here touches the filesystem beyond reading documents; report files
//! are written by the caller through `docsmith_io::ReportWriter`.
//!
//! | module | check |
//! |--------|-------|
//! | [`naming`] | `NN-<prefix>--<type>-<name>.md` file-name rules |
//! | [`numbering`] | duplicate and missing numbers per doc-type directory |
//! | [`format`] | standard header, table of contents, info table, chapters |
//! | [`correspondence`] | file-name keywords against content keywords |
//! | [`quality`] | five-dimension weighted quality score |
//! | [`quality_audit`] | findings, trends and improvement plan from a saved assessment |
//! | [`context`] | numbering gaps, broken `.md` links, orphan documents |
//! | [`content`] | minimum length, required sections, examples and tables |

pub mod content;
pub mod context;
pub mod correspondence;
mod exempt;
pub mod format;
mod markdown;
pub mod naming;
pub mod numbering;
pub mod quality;
pub mod quality_audit;

pub use content::{
    ContentAudit, ContentAuditor, ContentCheck, ContentIssue, ContentIssueKind, ContentStats,
    DirectoryContent, content_line_count,
};
pub use context::{
    ContextAudit, ContextAuditor, ContextIssue, ContextIssueKind, ContextStats, DirectoryContext,
    DocumentContext, numbering_gaps,
};

pub use correspondence::{
    CorrespondenceAudit, CorrespondenceResult, CorrespondenceStatus, NameContentChecker, Priority,
    similarity_grade,
};
pub use format::{
    DirectoryFormat, FormatAuditor, FormatCheck, FormatSummary, check_format, render_format_report,
};
pub use naming::{
    DirectoryNaming, FileNamingResult, IssueKind, IssueSeverity, NamingAudit, NamingAuditor,
    NamingIssue, NamingStats,
};
pub use numbering::{
    DirectoryNumbering, DuplicateNumber, NumberAuditor, NumberingSummary, render_numbering_report,
};
pub use quality::{
    DocKind, DocumentQualityReport, QualityAssessment, QualityAssessor, QualityIssue,
    QualityMetrics, QualitySeverity, QualitySummary, STANDARD_SECTIONS, quality_grade,
};
pub use quality_audit::{
    AuditFinding, ImprovementPlan, QualityAudit, QualityTrend, audit_quality,
};
