//! Duplicate removal inside doc-type directories.
//!
//! Two files are duplicates when they share the document name after the
//! `NN-<prefix>--<type>-` head, or when their bytes hash to the same SHA-256.
//! Both relations are merged, so a chain of matches forms a single group.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use docsmith_scanner::extract::compile_regex;
use docsmith_scanner::{DocsConfig, doc_type_directories, scan_directory};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::change::{Change, ChangeLog};
use crate::error::MaintainError;
use crate::renumber::{Renumberer, plan_renames};

/// What tied a duplicate group together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupReason {
    /// Same document name.
    SameName,
    /// Identical content.
    SameContent,
    /// Both relations contributed.
    Mixed,
}

/// Files found to be copies of one document.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Directory holding the group.
    pub directory: PathBuf,
    /// Relation that formed the group.
    pub reason: GroupReason,
    /// Surviving file.
    pub kept: PathBuf,
    /// Files removed, or planned for removal.
    pub removed: Vec<PathBuf>,
}

/// Result of one deduplication run.
#[derive(Debug, Clone, Serialize)]
pub struct DedupOutcome {
    /// Every group with more than one member.
    pub groups: Vec<DuplicateGroup>,
    /// Deletions and renumbering renames.
    pub log: ChangeLog,
}

impl DedupOutcome {
    /// Render as a Markdown report.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = self.log.to_markdown("重复文档清理报告");
        out.push_str(&format!("\n## 🔍 重复文档组 ({})\n\n", self.groups.len()));
        for group in &self.groups {
            let name = |path: &PathBuf| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            };
            let reason = match group.reason {
                GroupReason::SameName => "同名",
                GroupReason::SameContent => "内容相同",
                GroupReason::Mixed => "同名且内容相同",
            };
            out.push_str(&format!("- **{}** ({reason})\n", name(&group.kept)));
            for removed in &group.removed {
                out.push_str(&format!("  - 删除 {}\n", name(removed)));
            }
        }
        out
    }
}

struct Candidate {
    path: PathBuf,
    name: String,
    size: u64,
    hash: String,
}

fn load_candidates(
    dir: &Path,
    log: &mut ChangeLog,
) -> Result<Vec<Candidate>, MaintainError> {
    let mut candidates = Vec::new();
    for path in scan_directory(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::read(&path) {
            Ok(bytes) => candidates.push(Candidate {
                size: bytes.len() as u64,
                hash: hex::encode(Sha256::digest(&bytes)),
                path,
                name,
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {e}", path.display());
                log.push(Change::Failed {
                    path,
                    action: "读取".to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(candidates)
}

/// Union-find over candidate indices.
struct Groups {
    parent: Vec<usize>,
}

impl Groups {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Removes duplicate documents and renumbers what remains.
#[derive(Debug)]
pub struct Deduplicator<'a> {
    config: &'a DocsConfig,
    name_pattern: Regex,
    dry_run: bool,
}

impl<'a> Deduplicator<'a> {
    /// Create a deduplicator.
    #[must_use]
    pub fn new(config: &'a DocsConfig, dry_run: bool) -> Self {
        let conventions = &config.conventions;
        let types = conventions
            .doc_types
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let name_pattern = compile_regex(&format!(
            r"^\d{{2,3}}-{}--(?:{types})-(.+)\.md$",
            regex::escape(&conventions.prefix)
        ));
        Self {
            config,
            name_pattern,
            dry_run,
        }
    }

    /// Document name used to group `file_name`, if it follows the convention.
    #[must_use]
    pub fn name_key<'n>(&self, file_name: &'n str) -> Option<&'n str> {
        self.name_pattern
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Deduplicate every doc-type directory under `root`.
    ///
    /// # Errors
    /// `MaintainError::Scan` when the tree cannot be listed.
    pub fn apply(&self, root: &Path) -> Result<DedupOutcome, MaintainError> {
        let mut outcome = DedupOutcome {
            groups: Vec::new(),
            log: ChangeLog::new(self.dry_run),
        };
        for dir in doc_type_directories(root, &self.config.conventions.doc_types)? {
            self.apply_directory(&dir.path, &mut outcome)?;
        }
        log::info!(
            "Deduplicated {}: {} groups, {} changes",
            root.display(),
            outcome.groups.len(),
            outcome.log.modifications()
        );
        Ok(outcome)
    }

    fn apply_directory(
        &self,
        dir: &Path,
        outcome: &mut DedupOutcome,
    ) -> Result<(), MaintainError> {
        let candidates = load_candidates(dir, &mut outcome.log)?;
        let mut groups = Groups::new(candidates.len());
        let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_hash: BTreeMap<&str, usize> = BTreeMap::new();
        let mut name_linked = vec![false; candidates.len()];
        let mut hash_linked = vec![false; candidates.len()];

        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(key) = self.name_key(&candidate.name) {
                if let Some(&first) = by_name.get(key) {
                    groups.union(first, index);
                    name_linked[first] = true;
                    name_linked[index] = true;
                } else {
                    by_name.insert(key, index);
                }
            }
            if let Some(&first) = by_hash.get(candidate.hash.as_str()) {
                groups.union(first, index);
                hash_linked[first] = true;
                hash_linked[index] = true;
            } else {
                by_hash.insert(candidate.hash.as_str(), index);
            }
        }

        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for index in 0..candidates.len() {
            members.entry(groups.find(index)).or_default().push(index);
        }

        let mut deleted = vec![false; candidates.len()];
        for indices in members.into_values().filter(|m| m.len() > 1) {
            // Largest wins; among equal sizes the lowest name.
            let Some(&keep) = indices.iter().min_by(|&&a, &&b| {
                candidates[b]
                    .size
                    .cmp(&candidates[a].size)
                    .then_with(|| candidates[a].name.cmp(&candidates[b].name))
            }) else {
                continue;
            };
            let by_name = indices.iter().any(|&i| name_linked[i]);
            let by_hash = indices.iter().any(|&i| hash_linked[i]);
            let reason = match (by_name, by_hash) {
                (true, true) => GroupReason::Mixed,
                (false, true) => GroupReason::SameContent,
                _ => GroupReason::SameName,
            };

            let kept = candidates[keep].path.clone();
            let mut removed = Vec::new();
            for &index in indices.iter().filter(|&&i| i != keep) {
                let path = &candidates[index].path;
                if !self.dry_run
                    && let Err(e) = fs::remove_file(path)
                {
                    log::warn!("Cannot delete {}: {e}", path.display());
                    outcome.log.push(Change::Failed {
                        path: path.clone(),
                        action: "删除".to_string(),
                        error: e.to_string(),
                    });
                    continue;
                }
                deleted[index] = true;
                removed.push(path.clone());
                outcome.log.push(Change::Deleted {
                    path: path.clone(),
                    kept: kept.clone(),
                });
            }
            outcome.groups.push(DuplicateGroup {
                directory: dir.to_path_buf(),
                reason,
                kept,
                removed,
            });
        }

        if deleted.iter().any(|&d| d) {
            let survivors: Vec<PathBuf> = candidates
                .iter()
                .zip(&deleted)
                .filter(|(_, gone)| !**gone)
                .map(|(candidate, _)| candidate.path.clone())
                .collect();
            let plan = plan_renames(&survivors);
            outcome
                .log
                .extend(Renumberer::new(self.dry_run).execute(&plan));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_follows_convention() {
        let config = DocsConfig::default();
        let dedup = Deduplicator::new(&config, true);
        assert_eq!(
            dedup.name_key("03-YYC3-Cater--架构类-数据架构.md"),
            Some("数据架构")
        );
        assert_eq!(dedup.name_key("103-YYC3-Cater--技巧类-缓存.md"), Some("缓存"));
        assert_eq!(dedup.name_key("数据架构.md"), None);
        assert_eq!(dedup.name_key("3-YYC3-Cater--架构类-数据架构.md"), None);
    }

    #[test]
    fn test_groups_merge_transitively() {
        let mut groups = Groups::new(4);
        groups.union(0, 2);
        groups.union(2, 3);
        assert_eq!(groups.find(3), groups.find(0));
        assert_ne!(groups.find(1), groups.find(0));
    }
}
