//! Change log shared by every maintenance operation.

use std::path::PathBuf;

use serde::Serialize;

/// One planned or applied change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// A standard header was prepended.
    HeaderAdded {
        /// File.
        path: PathBuf,
    },
    /// The file was left alone.
    Skipped {
        /// File.
        path: PathBuf,
        /// Why.
        reason: String,
    },
    /// A duplicate was removed.
    Deleted {
        /// Removed file.
        path: PathBuf,
        /// File kept in its place.
        kept: PathBuf,
    },
    /// A file was renamed.
    Renamed {
        /// Old path.
        from: PathBuf,
        /// New path.
        to: PathBuf,
    },
    /// An action failed on this file.
    Failed {
        /// File.
        path: PathBuf,
        /// Attempted action.
        action: String,
        /// Error text.
        error: String,
    },
}

impl Change {
    fn render(&self) -> String {
        match self {
            Self::HeaderAdded { path } => format!("✅ 添加标准头部: {}", path.display()),
            Self::Skipped { path, reason } => format!("⏭️ 跳过: {} ({reason})", path.display()),
            Self::Deleted { path, kept } => {
                format!("🗑️ 删除重复文档: {} (保留 {})", path.display(), kept.display())
            }
            Self::Renamed { from, to } => {
                let name = |p: &PathBuf| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                };
                format!("🔄 重命名: {} -> {}", name(from), name(to))
            }
            Self::Failed {
                path,
                action,
                error,
            } => format!("❌ {action}失败: {} - {error}", path.display()),
        }
    }
}

/// Ordered record of what an operation did or would do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeLog {
    /// Whether the changes were only planned.
    pub dry_run: bool,
    /// Changes in execution order.
    pub changes: Vec<Change>,
}

impl ChangeLog {
    /// Empty log.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            changes: Vec::new(),
        }
    }

    /// Append a change.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Append every change of another log.
    pub fn extend(&mut self, other: ChangeLog) {
        self.changes.extend(other.changes);
    }

    /// Number of `Failed` entries.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.changes
            .iter()
            .filter(|change| matches!(change, Change::Failed { .. }))
            .count()
    }

    /// Number of entries that modify the tree.
    #[must_use]
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|change| {
                matches!(
                    change,
                    Change::HeaderAdded { .. } | Change::Deleted { .. } | Change::Renamed { .. }
                )
            })
            .count()
    }

    /// Render as a Markdown change report.
    #[must_use]
    pub fn to_markdown(&self, title: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {title}\n\n"));
        if self.dry_run {
            out.push_str("> 预演模式（dry-run）：以下变更未写入磁盘。\n\n");
        }
        out.push_str(&format!(
            "- 变更数: {}\n- 失败数: {}\n\n",
            self.modifications(),
            self.failures()
        ));
        out.push_str("## 📋 变更日志\n\n");
        if self.changes.is_empty() {
            out.push_str("无变更\n");
        }
        for change in &self.changes {
            out.push_str(&format!("- {}\n", change.render()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_dry_run_banner() {
        let mut log = ChangeLog::new(true);
        log.push(Change::Renamed {
            from: PathBuf::from("d/02-a.md"),
            to: PathBuf::from("d/01-a.md"),
        });
        log.push(Change::Failed {
            path: PathBuf::from("d/x.md"),
            action: "重命名".to_string(),
            error: "denied".to_string(),
        });
        assert_eq!(log.modifications(), 1);
        assert_eq!(log.failures(), 1);
        let markdown = log.to_markdown("重新编号报告");
        assert!(markdown.contains("dry-run"));
        assert!(markdown.contains("02-a.md -> 01-a.md"));
    }
}
