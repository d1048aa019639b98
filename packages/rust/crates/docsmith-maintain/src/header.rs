//! Standard header injection.
//!
//! The header is the `**@file**：…` metadata block placed at the top of a
//! document:
//!
//! ```text
//! ---
//!
//! **@file**：YYC³-总体架构
//! **@description**：…
//! …
//! **@tags**：YYC³,文档
//!
//! ---
//! ```

use std::fs;
use std::path::Path;

use docsmith_scanner::{DocsConfig, DocumentScanner, parse_file_name};

use crate::change::{Change, ChangeLog};
use crate::error::MaintainError;

const FILE_MARKER: &str = "**@file**：";

/// True when `text` already carries a standard header.
#[must_use]
pub fn has_standard_header(text: &str) -> bool {
    text.contains(FILE_MARKER)
}

fn description_for(title: &str, config: &DocsConfig) -> String {
    config
        .header
        .descriptions
        .get(title)
        .cloned()
        .unwrap_or_else(|| format!("{}的{title}", config.header.project))
}

fn tags_for<'a>(title: &str, config: &'a DocsConfig) -> &'a str {
    config
        .header
        .tag_rules
        .iter()
        .find(|rule| !rule.keyword.is_empty() && title.contains(&rule.keyword))
        .map_or(config.header.fallback_tags.as_str(), |rule| {
            rule.tags.as_str()
        })
}

/// Render the standard header for a document titled `title`.
#[must_use]
pub fn build_header(title: &str, config: &DocsConfig) -> String {
    let header = &config.header;
    let mut out = String::from("---\n\n");
    out.push_str(&format!("**@file**：{}-{title}\n", config.conventions.brand));
    out.push_str(&format!("**@description**：{}\n", description_for(title, config)));
    out.push_str(&format!("**@author**：{}\n", header.author));
    out.push_str(&format!("**@version**：{}\n", header.version));
    out.push_str(&format!("**@created**：{}\n", header.created));
    out.push_str(&format!("**@updated**：{}\n", header.updated));
    out.push_str(&format!("**@status**：{}\n", header.status));
    out.push_str(&format!("**@tags**：{}\n", tags_for(title, config)));
    out.push_str("\n---\n\n");
    out
}

/// Prepends the standard header to documents that lack one.
#[derive(Debug, Clone)]
pub struct HeaderInjector<'a> {
    config: &'a DocsConfig,
    dry_run: bool,
}

impl<'a> HeaderInjector<'a> {
    /// Create an injector.
    #[must_use]
    pub fn new(config: &'a DocsConfig, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    /// Process every included Markdown file under `root`.
    ///
    /// # Errors
    /// `MaintainError::Scan` when `root` cannot be walked.
    pub fn apply(&self, root: &Path) -> Result<ChangeLog, MaintainError> {
        let scanner = DocumentScanner::new(self.config.scan_options());
        let mut log = ChangeLog::new(self.dry_run);
        for path in scanner.collect_paths(root)? {
            log.push(self.apply_file(&path));
        }
        log::info!(
            "Header injection over {}: {} added, {} failed",
            root.display(),
            log.modifications(),
            log.failures()
        );
        Ok(log)
    }

    fn apply_file(&self, path: &Path) -> Change {
        let content = match docsmith_io::read_text_safe(path, self.config.scan.max_file_size) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Cannot read {}: {e}", path.display());
                return Change::Failed {
                    path: path.to_path_buf(),
                    action: "读取".to_string(),
                    error: e.to_string(),
                };
            }
        };
        if has_standard_header(&content) {
            log::debug!("Header present in {}", path.display());
            return Change::Skipped {
                path: path.to_path_buf(),
                reason: "已有标准头部".to_string(),
            };
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = parse_file_name(&file_name, &self.config.conventions).title;
        let updated = format!("{}{content}", build_header(&title, self.config));

        if !self.dry_run
            && let Err(e) = fs::write(path, updated)
        {
            log::warn!("Cannot write {}: {e}", path.display());
            return Change::Failed {
                path: path.to_path_buf(),
                action: "写入".to_string(),
                error: e.to_string(),
            };
        }
        Change::HeaderAdded {
            path: path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_header_uses_tag_rule_and_fallback_description() {
        let config = DocsConfig::default();
        let header = build_header("总体架构", &config);
        assert!(header.starts_with("---\n\n**@file**：YYC³-总体架构\n"));
        assert!(header.contains("**@description**：YYC³餐饮行业智能化平台的总体架构\n"));
        assert!(header.contains("**@status**：published\n"));
        assert!(header.ends_with("\n---\n\n"));
        assert!(has_standard_header(&header));
    }

    #[test]
    fn test_tags_fall_back_when_no_rule_matches() {
        let config = DocsConfig::default();
        let header = build_header("zzz", &config);
        assert!(header.contains(&format!("**@tags**：{}\n", config.header.fallback_tags)));
    }

    #[test]
    fn test_configured_description_wins() {
        let mut config = DocsConfig::default();
        config
            .header
            .descriptions
            .insert("缓存".to_string(), "缓存策略总览".to_string());
        assert!(build_header("缓存", &config).contains("**@description**：缓存策略总览\n"));
    }
}
