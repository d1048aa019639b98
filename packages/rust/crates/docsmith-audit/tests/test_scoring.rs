//! Integration tests for correspondence and quality scoring over scans.

use std::fs;

use docsmith_audit::{
    CorrespondenceStatus, NameContentChecker, Priority, QualityAssessment, QualityAssessor,
};
use docsmith_scanner::{DocsConfig, DocumentScanner};
use tempfile::TempDir;

const GOOD_DOC: &str = "---\n\n**@file**：YYC³-缓存策略\n**@description**：缓存策略，失效策略\n**@author**：YYC³\n**@version**：v1.0.0\n\n---\n\n# 缓存策略\n\n## 📑 目录\n\n- [概述](#1)\n- [最佳实践](#2)\n\n## 1. 概述\n\n示例 API 说明。\n\n```rust\nlet a = 1;\n```\n\n## 2. 最佳实践\n\n## 3. 常见问题\n";

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("YYC3-Cater-架构设计/技巧类");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("01-YYC3-Cater--技巧类-缓存策略-概述.md"), GOOD_DOC).unwrap();
    fs::write(dir.join("02-YYC3-Cater--技巧类-消息队列.md"), "# 部署手册\n").unwrap();
    fs::write(dir.join("03-YYC3-Cater--技巧类-坏文件.md"), b"\x00\x01").unwrap();
    tmp
}

#[test]
fn test_correspondence_over_scan() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let outcome = DocumentScanner::new(config.scan_options())
        .scan(tmp.path())
        .unwrap();
    let audit = NameContentChecker::new(&config).check_all(&outcome);

    assert_eq!(audit.total, 3);
    assert_eq!(audit.passed, 1);
    assert_eq!(audit.failed, 2);
    assert_eq!(audit.results[0].status, CorrespondenceStatus::Pass);
    assert_eq!(audit.results[1].priority, Some(Priority::P0));
    assert_eq!(audit.results[2].status, CorrespondenceStatus::Error);
    assert!(audit.results[2].error.is_some());

    let report = audit.to_markdown("YYC³", &config.correspondence);
    assert!(report.contains("通过率：33.3%"));
    assert!(report.contains("| 02-YYC3-Cater--技巧类-消息队列.md |"));
    assert!(report.contains("读取失败"));
}

#[test]
fn test_quality_report_round_trips_through_json() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let outcome = DocumentScanner::new(config.scan_options())
        .scan(tmp.path())
        .unwrap();
    let assessment = QualityAssessor::new(&config).assess_all(&outcome);

    assert_eq!(assessment.summary.total_documents, 2);
    let ranked = assessment.ranked();
    assert_eq!(ranked[0].file_name, "01-YYC3-Cater--技巧类-缓存策略-概述.md");
    assert!(ranked[0].metrics.overall_score > ranked[1].metrics.overall_score);
    let grades: usize = assessment.summary.grade_distribution.values().sum();
    assert_eq!(grades, 2);

    let json = serde_json::to_string(&assessment).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["reports"][0]["doc_type"], "technique");
    assert!(value["reports"][0]["metrics"]["overall_score"].is_number());
    let back: QualityAssessment = serde_json::from_str(&json).unwrap();
    assert_eq!(back.reports.len(), 2);

    let markdown = assessment.to_markdown("YYC³", tmp.path());
    assert!(markdown.contains("### 等级分布"));
    assert!(markdown.contains("█"));
}
