//! Integration tests running the directory audits over a fixture tree.

use std::fs;
use std::path::Path;

use docsmith_audit::{
    ContentAuditor, ContentIssueKind, ContextAuditor, ContextIssueKind, FormatAuditor,
    IssueSeverity, NamingAuditor, NumberAuditor, render_format_report, render_numbering_report,
};
use docsmith_scanner::DocsConfig;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let arch = "YYC3-Cater-架构设计/架构类";
    write(root, &format!("{arch}/01-YYC3-Cater--架构类-总体架构.md"), "**@file**：a\n**@description**：b\n# 总体架构\n\n## 目录\n\n## 1. 概述\n");
    write(root, &format!("{arch}/01-YYC3-Cater--架构类-数据架构.md"), "# 数据架构\n");
    write(root, &format!("{arch}/部署 说明.md"), "# 部署\n");
    write(root, &format!("{arch}/yyc3-fix.md"), "# script\n");
    write(root, &format!("{arch}/diagram.png"), "png");
    write(root, "YYC3-Cater-架构设计/技巧类/02-YYC3-Cater--技巧类-缓存.md", "# 缓存\n");
    tmp
}

#[test]
fn test_naming_audit_counts_every_visited_file() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let audit = NamingAuditor::new(&config).audit(tmp.path()).unwrap();

    assert_eq!(audit.stats.total_files, 6);
    assert_eq!(audit.stats.passed, 3);
    assert_eq!(audit.stats.naming_issues, 1);
    assert_eq!(audit.stats.missing_number, 1);
    assert_eq!(audit.stats.invalid_format, 3);
    assert!((audit.stats.pass_rate() - 50.0).abs() < 1e-9);

    let flagged = audit
        .directories
        .iter()
        .flat_map(|dir| &dir.results)
        .find(|result| !result.passed())
        .unwrap();
    assert_eq!(flagged.file_name, "部署 说明.md");
    assert_eq!(flagged.issues[0].severity, IssueSeverity::High);

    let report = audit.to_markdown(&config.conventions);
    assert!(report.contains("### YYC3-Cater-架构设计"));
    assert!(report.contains("**部署 说明.md**"));
    assert!(report.contains("命名规则"));
}

#[test]
fn test_naming_audit_flags_unnumbered_brand_document() {
    let tmp = TempDir::new().unwrap();
    let dir = "YYC3-Cater-架构设计/架构类";
    write(tmp.path(), &format!("{dir}/01-YYC3-Cater--架构类-总体架构.md"), "# 总体架构\n");
    write(tmp.path(), &format!("{dir}/YYC3-Cater--架构类-缓存.md"), "# 缓存\n");
    write(tmp.path(), &format!("{dir}/yyc3-renumber.md"), "# script\n");

    let audit = NamingAuditor::new(&DocsConfig::default())
        .audit(tmp.path())
        .unwrap();

    assert_eq!(audit.stats.total_files, 3);
    assert_eq!(audit.stats.passed, 1);
    assert_eq!(audit.stats.naming_issues, 1);
    assert_eq!(audit.stats.missing_number, 1);
    let flagged = &audit.directories[0].results[1];
    assert_eq!(flagged.file_name, "YYC3-Cater--架构类-缓存.md");
    assert_eq!(flagged.issues[0].severity, IssueSeverity::High);
    assert!(flagged.issues[0].message.contains("缺少编号"));
}

#[test]
fn test_number_audit_reports_duplicates_and_unnumbered() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let dirs = NumberAuditor::new(&config).audit(tmp.path()).unwrap();
    assert_eq!(dirs.len(), 2);

    let arch = &dirs[0];
    assert_eq!(arch.doc_type, "架构类");
    assert_eq!(arch.total, 4);
    assert_eq!(arch.duplicates.len(), 1);
    assert_eq!(arch.duplicates[0].number, 1);
    assert_eq!(arch.unnumbered, vec!["yyc3-fix.md", "部署 说明.md"]);
    assert!(dirs[1].is_clean());

    let report = render_numbering_report("YYC³", &dirs);
    assert!(report.contains("重复编号文档: 2"));
    assert!(report.contains("未编号文档: 2"));
}

#[test]
fn test_format_audit_counts_missing_markers() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let dirs = FormatAuditor::new(&config).audit(tmp.path()).unwrap();
    let arch = dirs[0].summary();
    assert_eq!(arch.total, 4);
    assert_eq!(arch.missing_header, 3);
    assert_eq!(arch.missing_chapters, 3);

    let report = render_format_report("YYC³", &dirs);
    assert!(report.contains("检查文档总数: 5"));
}

#[test]
fn test_missing_root_errors() {
    let tmp = TempDir::new().unwrap();
    let config = DocsConfig::default();
    assert!(NamingAuditor::new(&config).audit(&tmp.path().join("nope")).is_err());
}

fn linked_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let arch = "YYC3-Cater-架构设计/架构类";
    write(
        root,
        &format!("{arch}/00-YYC3-Cater--架构类-文档索引.md"),
        "# 索引\n\n- [总体架构](01-YYC3-Cater--架构类-总体架构.md)\n",
    );
    write(
        root,
        &format!("{arch}/01-YYC3-Cater--架构类-总体架构.md"),
        "# 总体架构\n\n见 [数据](./02-YYC3-Cater--架构类-数据架构.md#存储) 与 [旧版](99-已删除.md)。\n[外部](https://example.com/guide.md)\n",
    );
    write(root, &format!("{arch}/02-YYC3-Cater--架构类-数据架构.md"), "# 数据架构\n");
    write(root, &format!("{arch}/05-YYC3-Cater--架构类-部署架构.md"), "# 部署架构\n");
    write(root, &format!("{arch}/yyc3-check.md"), "[坏链](missing.md)\n");
    tmp
}

#[test]
fn test_context_audit_reports_gaps_links_and_orphans() {
    let tmp = linked_fixture();
    let audit = ContextAuditor::new(&DocsConfig::default()).audit(tmp.path()).unwrap();

    assert_eq!(audit.stats.total_docs, 4);
    assert_eq!(audit.stats.numbering_gaps, 1);
    assert_eq!(audit.stats.reference_issues, 1);
    assert_eq!(audit.stats.orphan_docs, 1);
    assert_eq!(audit.stats.passed, 2);

    let dir = &audit.directories[0];
    assert!(dir.numbering_gaps[0].message.contains("缺少 3-4"));

    let overview = dir
        .documents
        .iter()
        .find(|doc| doc.file_name.starts_with("01-"))
        .unwrap();
    assert_eq!(overview.issues.len(), 1);
    assert_eq!(overview.issues[0].kind, ContextIssueKind::InvalidReference);
    assert_eq!(overview.issues[0].reference.as_deref(), Some("99-已删除.md"));
    assert_eq!(overview.referenced_by, vec!["00-YYC3-Cater--架构类-文档索引.md"]);

    let deploy = dir
        .documents
        .iter()
        .find(|doc| doc.file_name.starts_with("05-"))
        .unwrap();
    assert_eq!(deploy.issues[0].kind, ContextIssueKind::OrphanDocument);

    let report = audit.to_markdown("YYC³");
    assert!(report.contains("99-已删除.md"));
}

#[test]
fn test_content_audit_flags_short_and_unstructured_documents() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let arch = "YYC3-Cater-架构设计/架构类";
    let body = "说明文字\n".repeat(55);
    write(
        root,
        &format!("{arch}/01-YYC3-Cater--架构类-缓存.md"),
        &format!(
            "# 缓存\n\n## 1. 概述\n## 2. 功能特性\n## 3. 技术栈\n## 4. 实现\n{body}\n```\nredis\n```\n\n| 项 | 值 |\n"
        ),
    );
    write(
        root,
        &format!("{arch}/02-YYC3-Cater--架构类-总体架构.md"),
        "# 总体架构\n\n## 概述\n\n简述\n",
    );
    write(root, &format!("{arch}/yyc3-notes.md"), "# 脚本\n");

    let audit = ContentAuditor::new(&DocsConfig::default()).audit(root).unwrap();
    assert_eq!(audit.stats.total_docs, 2);
    assert_eq!(audit.stats.passed, 1);
    assert_eq!(audit.stats.too_short, 1);
    assert_eq!(audit.stats.missing_sections, 1);
    assert_eq!(audit.stats.incomplete_content, 1);

    let failing = &audit.directories[0].checks[1];
    assert_eq!(failing.content_lines, 1);
    assert_eq!(failing.missing_sections, vec!["功能特性", "技术栈", "实现"]);
    let kinds: Vec<ContentIssueKind> = failing.issues.iter().map(|issue| issue.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ContentIssueKind::TooShort,
            ContentIssueKind::MissingSections,
            ContentIssueKind::MissingExamples,
            ContentIssueKind::MissingTables,
        ]
    );

    let report = audit.to_markdown("YYC³");
    assert!(report.contains("**02-YYC3-Cater--架构类-总体架构.md**"));
    assert!(!report.contains("**01-YYC3-Cater--架构类-缓存.md**"));
}
