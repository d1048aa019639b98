//! Integration tests for the document scanner.

use std::fs;
use std::path::Path;

use docsmith_scanner::{
    DocsConfig, DocumentScanner, ScanError, ScanOptions, doc_type_directories, scan_directory,
};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "YYC3-Cater-架构设计/架构类/01-YYC3-Cater--架构类-总体架构.md", "# 总体架构\n");
    write(root, "YYC3-Cater-架构设计/技巧类/01-YYC3-Cater--技巧类-缓存.md", "# 缓存\n");
    write(root, "YYC3-Cater-架构设计/README.md", "# readme\n");
    write(root, "YYC3-Cater-审核报告/report.md", "# report\n");
    write(root, "YYC3-Cater-脚本工具/notes.md", "# notes\n");
    write(root, "YYC3-Cater-架构设计/架构类/diagram.png", "png");
    write(root, "UPPER.MD", "# upper\n");
    tmp
}

#[test]
fn test_scan_lists_exactly_included_files() {
    let tmp = fixture();
    let outcome = DocumentScanner::default().scan(tmp.path()).unwrap();
    let listed: Vec<&str> = outcome
        .documents
        .iter()
        .map(|doc| doc.relative_path.as_str())
        .collect();
    assert_eq!(
        listed,
        vec![
            "UPPER.MD",
            "YYC3-Cater-架构设计/技巧类/01-YYC3-Cater--技巧类-缓存.md",
            "YYC3-Cater-架构设计/架构类/01-YYC3-Cater--架构类-总体架构.md",
        ]
    );
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.total(), 3);
}

#[test]
fn test_scan_records_binary_file_as_failure() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("ok.md"), "# ok\n").unwrap();
    fs::write(tmp.path().join("bad.md"), b"# bad\x00\x01").unwrap();

    let outcome = DocumentScanner::default().scan(tmp.path()).unwrap();
    assert_eq!(outcome.documents.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].file_name, "bad.md");
}

#[test]
fn test_scan_respects_size_limit_and_depth() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "big.md", &"x".repeat(64));
    write(tmp.path(), "a/b/deep.md", "# deep\n");

    let scanner = DocumentScanner::new(ScanOptions {
        max_depth: Some(1),
        max_file_size: 16,
        ..ScanOptions::default()
    });
    let outcome = scanner.scan(tmp.path()).unwrap();
    assert!(outcome.documents.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].relative_path, "big.md");
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let err = DocumentScanner::default().scan(&missing).unwrap_err();
    assert!(matches!(err, ScanError::RootNotFound(_)));
}

#[test]
fn test_doc_type_directories_sorted() {
    let tmp = fixture();
    let config = DocsConfig::default();
    let dirs = doc_type_directories(tmp.path(), &config.conventions.doc_types).unwrap();
    let names: Vec<(String, String)> = dirs
        .iter()
        .map(|dir| (dir.category.clone(), dir.doc_type.clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("YYC3-Cater-架构设计".to_string(), "架构类".to_string()),
            ("YYC3-Cater-架构设计".to_string(), "技巧类".to_string()),
        ]
    );
}

#[test]
fn test_scan_directory_is_flat() {
    let tmp = fixture();
    let files = scan_directory(&tmp.path().join("YYC3-Cater-架构设计/架构类")).unwrap();
    assert_eq!(files.len(), 1);
    assert!(scan_directory(&tmp.path().join("missing")).is_err());
}
