//! Contiguous renumbering of doc-type directories.

use std::fs;
use std::path::{Path, PathBuf};

use docsmith_scanner::{doc_type_directories, scan_directory, split_number};
use serde::Serialize;

use crate::change::{Change, ChangeLog};
use crate::error::MaintainError;

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    /// Current path.
    pub from: PathBuf,
    /// Target path.
    pub to: PathBuf,
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Plan the renames that number `files` as `01..N`.
///
/// Files sort by number, sub-number and name; unnumbered files go last.
/// Files that already hold their target name are omitted.
#[must_use]
pub fn plan_renames(files: &[PathBuf]) -> Vec<RenamePlan> {
    let mut entries: Vec<(Option<u32>, Option<u32>, String, &PathBuf)> = files
        .iter()
        .map(|path| {
            let name = file_name_of(path);
            let (number, sub_number, _) = split_number(&name);
            (number, sub_number, name, path)
        })
        .collect();
    entries.sort_by(|a, b| {
        (a.0.is_none(), a.0, a.1, &a.2).cmp(&(b.0.is_none(), b.0, b.1, &b.2))
    });

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, (_, _, name, path))| {
            let rest = split_number(&name).2;
            let target = format!("{:02}-{rest}", index + 1);
            (target != name).then(|| RenamePlan {
                from: path.clone(),
                to: path.with_file_name(target),
            })
        })
        .collect()
}

/// Applies contiguous numbering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renumberer {
    dry_run: bool,
}

impl Renumberer {
    /// Create a renumberer.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Renumber the Markdown files directly inside `dir`.
    ///
    /// # Errors
    /// `MaintainError::Scan` when `dir` cannot be listed.
    pub fn renumber_directory(&self, dir: &Path) -> Result<ChangeLog, MaintainError> {
        let files = scan_directory(dir)?;
        let plan = plan_renames(&files);
        Ok(self.execute(&plan))
    }

    /// Renumber every `<category>/<doc type>` directory under `root`.
    ///
    /// # Errors
    /// `MaintainError::Scan` when the tree cannot be listed.
    pub fn renumber_tree(
        &self,
        root: &Path,
        doc_types: &[String],
    ) -> Result<ChangeLog, MaintainError> {
        let mut log = ChangeLog::new(self.dry_run);
        for dir in doc_type_directories(root, doc_types)? {
            log::debug!("Renumbering {}/{}", dir.category, dir.doc_type);
            log.extend(self.renumber_directory(&dir.path)?);
        }
        log::info!(
            "Renumbered {}: {} renames, {} failed",
            root.display(),
            log.modifications(),
            log.failures()
        );
        Ok(log)
    }

    /// Carry out a plan.
    ///
    /// Files move to temporary names first and to their targets second, so
    /// no target can collide with a file that has not moved yet. A target
    /// that is still occupied sends the file back to its original name.
    #[must_use]
    pub fn execute(&self, plan: &[RenamePlan]) -> ChangeLog {
        let mut log = ChangeLog::new(self.dry_run);
        if self.dry_run {
            for step in plan {
                log.push(Change::Renamed {
                    from: step.from.clone(),
                    to: step.to.clone(),
                });
            }
            return log;
        }

        let mut staged = Vec::with_capacity(plan.len());
        for (index, step) in plan.iter().enumerate() {
            let temp = step
                .from
                .with_file_name(format!(".docsmith-renumber-{index}.tmp"));
            match fs::rename(&step.from, &temp) {
                Ok(()) => staged.push((step, temp)),
                Err(e) => {
                    log::warn!("Cannot stage {}: {e}", step.from.display());
                    log.push(failed(&step.from, &e));
                }
            }
        }

        for (step, temp) in staged {
            let result = if step.to.exists() {
                Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} already exists", step.to.display()),
                ))
            } else {
                fs::rename(&temp, &step.to)
            };
            match result {
                Ok(()) => log.push(Change::Renamed {
                    from: step.from.clone(),
                    to: step.to.clone(),
                }),
                Err(e) => {
                    log::warn!("Cannot rename {}: {e}", step.from.display());
                    if let Err(restore) = fs::rename(&temp, &step.from) {
                        log::warn!(
                            "Left {} at {}: {restore}",
                            step.from.display(),
                            temp.display()
                        );
                    }
                    log.push(failed(&step.from, &e));
                }
            }
        }
        log
    }
}

fn failed(path: &Path, error: &std::io::Error) -> Change {
    Change::Failed {
        path: path.to_path_buf(),
        action: "重命名".to_string(),
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(plan: &[RenamePlan]) -> Vec<(String, String)> {
        plan.iter()
            .map(|step| (file_name_of(&step.from), file_name_of(&step.to)))
            .collect()
    }

    #[test]
    fn test_plan_puts_unnumbered_last_and_skips_correct_names() {
        let files: Vec<PathBuf> = ["01-a.md", "03-c.md", "03-1-b.md", "notes.md"]
            .iter()
            .map(|name| PathBuf::from("d").join(name))
            .collect();
        assert_eq!(
            names(&plan_renames(&files)),
            vec![
                ("03-c.md".to_string(), "02-c.md".to_string()),
                ("03-1-b.md".to_string(), "03-b.md".to_string()),
                ("notes.md".to_string(), "04-notes.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_is_empty_for_contiguous_directory() {
        let files = vec![PathBuf::from("01-a.md"), PathBuf::from("02-b.md")];
        assert!(plan_renames(&files).is_empty());
    }

    #[test]
    fn test_sub_numbers_order_before_name() {
        let files = vec![PathBuf::from("02-2-a.md"), PathBuf::from("02-1-z.md")];
        assert_eq!(
            names(&plan_renames(&files)),
            vec![
                ("02-1-z.md".to_string(), "01-z.md".to_string()),
                ("02-2-a.md".to_string(), "02-a.md".to_string()),
            ]
        );
    }
}
