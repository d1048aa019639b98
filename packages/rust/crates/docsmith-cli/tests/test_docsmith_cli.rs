//! Integration tests for the `docsmith` CLI binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const ARCH: &str = "YYC3-Cater-架构设计/架构类";
const REPORT_DIR: &str = "YYC3-Cater-审核报告";

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn docsmith(root: &Path, args: &[&str]) -> Result<Output, Box<dyn std::error::Error>> {
    Ok(Command::new(env!("CARGO_BIN_EXE_docsmith"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()?)
}

fn payload(output: &Output) -> Result<Value, Box<dyn std::error::Error>> {
    assert!(
        output.status.success(),
        "docsmith failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn fixture() -> Result<TempDir, Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let dir = tmp.path().join(ARCH);
    write_file(
        &dir.join("01-YYC3-Cater--架构类-总体架构.md"),
        "# 总体架构\n\n**@description**：平台总体架构\n\n## 1. 概述\n\n数据架构 与 业务架构\n",
    )?;
    write_file(
        &dir.join("03-YYC3-Cater--架构类-数据架构.md"),
        "# 数据架构\n\n数据架构 说明，见 YYC3-Cater--架构类-总体架构\n",
    )?;
    Ok(tmp)
}

#[test]
fn test_naming_writes_report_bundle() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    let value = payload(&docsmith(tmp.path(), &["naming"])?)?;
    assert_eq!(value["command"], "naming");
    assert_eq!(value["summary"]["total_files"], 2);

    let markdown = value["reports"]["markdown"].as_str().ok_or("missing markdown path")?;
    assert!(Path::new(markdown).starts_with(tmp.path().join(REPORT_DIR)));
    assert!(Path::new(markdown).is_file());
    assert!(value["reports"]["json"].as_str().is_some());
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let output = docsmith(&tmp.path().join("absent"), &["quality"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("root not found"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    write_file(&tmp.path().join("docsmith.yaml"), "scan: [unclosed\n")?;
    let output = docsmith(tmp.path(), &["naming"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_renumber_dry_run_leaves_tree() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    let value = payload(&docsmith(tmp.path(), &["renumber", "--dry-run"])?)?;
    assert_eq!(value["summary"]["dry_run"], true);
    assert_eq!(value["summary"]["modifications"], 1);
    assert!(tmp.path().join(ARCH).join("03-YYC3-Cater--架构类-数据架构.md").is_file());
    assert!(!tmp.path().join(REPORT_DIR).exists());

    let value = payload(&docsmith(tmp.path(), &["renumber"])?)?;
    assert_eq!(value["summary"]["failures"], 0);
    assert!(tmp.path().join(ARCH).join("02-YYC3-Cater--架构类-数据架构.md").is_file());
    Ok(())
}

#[test]
fn test_quality_graph_recommend_pipeline() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    payload(&docsmith(tmp.path(), &["quality"])?)?;
    assert!(tmp.path().join(REPORT_DIR).join("YYC3-文档质量评估报告.json").is_file());

    let graph = payload(&docsmith(tmp.path(), &["graph"])?)?;
    assert_eq!(graph["summary"]["total_documents"], 2);
    let graph_file = graph["reports"]["graph"].as_str().ok_or("missing graph path")?;

    let missing_arg = docsmith(tmp.path(), &["recommend", "--graph-file", graph_file, "--type", "document"])?;
    assert!(!missing_arg.status.success());

    let value = payload(&docsmith(
        tmp.path(),
        &[
            "recommend",
            "--graph-file",
            graph_file,
            "--type",
            "document",
            "--document",
            "01-YYC3-Cater--架构类-总体架构.md",
        ],
    )?)?;
    let results = value["results"].as_array().ok_or("missing results")?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["document_name"], "03-YYC3-Cater--架构类-数据架构.md");
    assert!(value["reports"]["markdown"].as_str().is_some());

    let missing_graph = docsmith(
        tmp.path(),
        &["recommend", "--graph-file", "/nonexistent/graph.json"],
    )?;
    assert!(!missing_graph.status.success());
    Ok(())
}

#[test]
fn test_quality_audit_reads_saved_assessment() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    let missing = docsmith(tmp.path(), &["quality-audit"])?;
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("quality assessment not found"));

    payload(&docsmith(tmp.path(), &["quality"])?)?;
    let value = payload(&docsmith(tmp.path(), &["quality-audit"])?)?;
    assert_eq!(value["command"], "quality-audit");
    assert_eq!(value["summary"]["total_documents"], 2);
    assert!(value["summary"]["findings"].as_u64().ok_or("missing findings")? >= 1);

    let markdown = value["reports"]["markdown"].as_str().ok_or("missing markdown path")?;
    assert!(markdown.contains("YYC3-文档质量审计报告_"));
    assert!(fs::read_to_string(markdown)?.contains("## 🎯 改进计划"));
    Ok(())
}

#[test]
fn test_context_and_content_audits() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = fixture()?;
    let context = payload(&docsmith(tmp.path(), &["context"])?)?;
    assert_eq!(context["summary"]["total_docs"], 2);
    assert_eq!(context["summary"]["numbering_gaps"], 1);
    assert_eq!(context["summary"]["orphan_docs"], 2);
    assert!(tmp.path().join(REPORT_DIR).join("YYC3-文档上下文审核报告.md").is_file());

    let content = payload(&docsmith(tmp.path(), &["content"])?)?;
    assert_eq!(content["summary"]["total_docs"], 2);
    assert_eq!(content["summary"]["too_short"], 2);
    assert_eq!(content["summary"]["passed"], 0);
    assert!(tmp.path().join(REPORT_DIR).join("YYC3-文档内容审核报告.json").is_file());
    Ok(())
}
