//! Integration tests for the mutating fixes over fixture trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use docsmith_maintain::{
    Change, Deduplicator, GroupReason, HeaderInjector, Renumberer, has_standard_header,
};
use docsmith_scanner::DocsConfig;
use tempfile::TempDir;

/// Relative path to content for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read(&path).unwrap());
            }
        }
    }
    files
}

const ARCH: &str = "YYC3-Cater-架构设计/架构类";

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn duplicate_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, &format!("{ARCH}/01-YYC3-Cater--架构类-总体架构.md"), "# 总体架构\n");
    write(
        root,
        &format!("{ARCH}/02-YYC3-Cater--架构类-总体架构.md"),
        "# 总体架构\n\n更完整的版本\n",
    );
    write(root, &format!("{ARCH}/03-YYC3-Cater--架构类-数据架构.md"), "# 数据架构\n");
    write(root, &format!("{ARCH}/04-YYC3-Cater--架构类-数据副本.md"), "# 数据架构\n");
    write(root, &format!("{ARCH}/05-YYC3-Cater--架构类-安全架构.md"), "# 安全\n");
    tmp
}

#[test]
fn test_dedup_keeps_largest_and_renumbers() {
    let tmp = duplicate_fixture();
    let config = DocsConfig::default();
    let outcome = Deduplicator::new(&config, false).apply(tmp.path()).unwrap();

    assert_eq!(outcome.groups.len(), 2);
    let by_name = &outcome.groups[0];
    assert_eq!(by_name.reason, GroupReason::SameName);
    assert!(by_name.kept.ends_with("02-YYC3-Cater--架构类-总体架构.md"));
    let by_content = &outcome.groups[1];
    assert_eq!(by_content.reason, GroupReason::SameContent);
    assert!(by_content.kept.ends_with("03-YYC3-Cater--架构类-数据架构.md"));

    assert_eq!(
        names_in(&tmp.path().join(ARCH)),
        vec![
            "01-YYC3-Cater--架构类-总体架构.md",
            "02-YYC3-Cater--架构类-数据架构.md",
            "03-YYC3-Cater--架构类-安全架构.md",
        ]
    );
    let kept = fs::read_to_string(tmp.path().join(ARCH).join("01-YYC3-Cater--架构类-总体架构.md"))
        .unwrap();
    assert!(kept.contains("更完整的版本"));
    assert_eq!(outcome.log.failures(), 0);
    assert!(outcome.to_markdown().contains("同名"));
}

#[test]
fn test_dedup_dry_run_leaves_tree_untouched() {
    let tmp = duplicate_fixture();
    let before = snapshot(tmp.path());
    let config = DocsConfig::default();
    let outcome = Deduplicator::new(&config, true).apply(tmp.path()).unwrap();

    assert!(outcome.log.dry_run);
    assert_eq!(
        outcome
            .log
            .changes
            .iter()
            .filter(|change| matches!(change, Change::Deleted { .. }))
            .count(),
        2
    );
    assert!(outcome
        .log
        .changes
        .iter()
        .any(|change| matches!(change, Change::Renamed { .. })));
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn test_renumber_directory_is_contiguous_and_keeps_every_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(ARCH);
    for (name, body) in [
        ("02-b.md", "b"),
        ("05-c.md", "c"),
        ("01-2-a.md", "a2"),
        ("01-1-a.md", "a1"),
        ("notes.md", "n"),
    ] {
        write(tmp.path(), &format!("{ARCH}/{name}"), body);
    }

    let log = Renumberer::new(false).renumber_directory(&dir).unwrap();
    assert_eq!(log.failures(), 0);
    assert_eq!(
        names_in(&dir),
        vec!["01-a.md", "02-a.md", "03-b.md", "04-c.md", "05-notes.md"]
    );
    assert_eq!(fs::read_to_string(dir.join("01-a.md")).unwrap(), "a1");
    assert_eq!(fs::read_to_string(dir.join("02-a.md")).unwrap(), "a2");
    assert_eq!(fs::read_to_string(dir.join("05-notes.md")).unwrap(), "n");
}

#[test]
fn test_renumber_swaps_without_collision() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(ARCH);
    write(tmp.path(), &format!("{ARCH}/02-x.md"), "first");
    write(tmp.path(), &format!("{ARCH}/03-x.md"), "second");

    let log = Renumberer::new(false)
        .renumber_tree(tmp.path(), &DocsConfig::default().conventions.doc_types)
        .unwrap();
    assert_eq!(log.modifications(), 2);
    assert_eq!(names_in(&dir), vec!["01-x.md", "02-x.md"]);
    assert_eq!(fs::read_to_string(dir.join("01-x.md")).unwrap(), "first");
    assert_eq!(fs::read_to_string(dir.join("02-x.md")).unwrap(), "second");
}

#[test]
fn test_renumber_leaves_correct_directory_alone() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), &format!("{ARCH}/01-a.md"), "a");
    write(tmp.path(), &format!("{ARCH}/02-b.md"), "b");
    let log = Renumberer::new(false)
        .renumber_directory(&tmp.path().join(ARCH))
        .unwrap();
    assert!(log.changes.is_empty());
}

#[test]
fn test_header_injection_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, &format!("{ARCH}/01-YYC3-Cater--架构类-微服务架构.md"), "# 微服务\n");
    write(root, &format!("{ARCH}/02-YYC3-Cater--架构类-已有.md"), "**@file**：x\n# 已有\n");
    write(root, "YYC3-Cater-审核报告/report.md", "# skipped\n");
    let config = DocsConfig::default();

    let first = HeaderInjector::new(&config, false).apply(root).unwrap();
    assert_eq!(first.modifications(), 1);
    assert_eq!(first.changes.len(), 2);

    let injected =
        fs::read_to_string(root.join(ARCH).join("01-YYC3-Cater--架构类-微服务架构.md")).unwrap();
    assert!(has_standard_header(&injected));
    assert!(injected.starts_with("---\n\n**@file**：YYC³-微服务架构\n"));
    assert!(injected.contains("**@tags**：架构设计,微服务,YYC³,服务治理\n"));
    assert!(injected.ends_with("# 微服务\n"));
    assert_eq!(
        fs::read_to_string(root.join("YYC3-Cater-审核报告/report.md")).unwrap(),
        "# skipped\n"
    );

    let before = snapshot(root);
    let second = HeaderInjector::new(&config, false).apply(root).unwrap();
    assert_eq!(second.modifications(), 0);
    assert_eq!(snapshot(root), before);
}

#[test]
fn test_header_dry_run_reports_without_writing() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), &format!("{ARCH}/01-YYC3-Cater--架构类-总体架构.md"), "# 总体\n");
    let before = snapshot(tmp.path());
    let log = HeaderInjector::new(&DocsConfig::default(), true)
        .apply(tmp.path())
        .unwrap();
    assert_eq!(log.modifications(), 1);
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    assert!(HeaderInjector::new(&DocsConfig::default(), true).apply(&missing).is_err());
    assert!(Deduplicator::new(&DocsConfig::default(), true).apply(&missing).is_err());
}
