//! Tests for the report writer.

use docsmith_io::ReportWriter;
use serde_json::{Value, json};
use tempfile::TempDir;

#[test]
fn test_write_markdown_creates_directory() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let writer = ReportWriter::new(tmp.path().join("reports/nested"));

    let path = writer.write_markdown("naming", "# 命名审核报告\n")?;

    assert_eq!(path, tmp.path().join("reports/nested/naming.md"));
    assert_eq!(std::fs::read_to_string(&path)?, "# 命名审核报告\n");
    Ok(())
}

#[test]
fn test_write_json_keeps_non_ascii() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let writer = ReportWriter::new(tmp.path());

    let path = writer.write_json("quality", &json!({"grade": "优秀"}))?;
    let raw = std::fs::read_to_string(&path)?;

    assert!(raw.contains("优秀"));
    let parsed: Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed["grade"], "优秀");
    Ok(())
}

#[test]
fn test_write_bundle_returns_both_paths() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let writer = ReportWriter::new(tmp.path());

    let paths = writer.write_bundle("graph", "# Graph\n", &json!({"total": 0}))?;

    let markdown = paths.markdown.ok_or("missing markdown path")?;
    let json_path = paths.json.ok_or("missing json path")?;
    assert!(markdown.exists());
    assert!(json_path.exists());
    assert_eq!(json_path.extension().and_then(|e| e.to_str()), Some("json"));
    Ok(())
}
