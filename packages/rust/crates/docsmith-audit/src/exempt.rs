//! Files the per-directory audits leave alone: audit reports, helper
//! scripts and the index page.

use docsmith_scanner::DocsConfig;

#[derive(Debug, Clone, Default)]
pub(crate) struct Exemptions {
    substrings: Vec<String>,
    prefixes: Vec<String>,
    names: Vec<String>,
}

impl Exemptions {
    pub(crate) fn from_config(config: &DocsConfig) -> Self {
        Self {
            substrings: config.scan.exclude_substrings.clone(),
            prefixes: config.conventions.ignored_prefixes.clone(),
            names: config.conventions.ignored_names.clone(),
        }
    }

    /// Prefixes compare case-sensitively: `yyc3-` marks a script, while
    /// `YYC3-Cater--…` is an unnumbered document.
    pub(crate) fn covers(&self, file_name: &str) -> bool {
        self.substrings
            .iter()
            .any(|needle| !needle.is_empty() && file_name.contains(needle.as_str()))
            || self
                .prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && file_name.starts_with(prefix.as_str()))
            || self.names.iter().any(|name| name == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exemptions() {
        let exemptions = Exemptions::from_config(&DocsConfig::default());
        assert!(exemptions.covers("yyc3-check.md"));
        assert!(exemptions.covers("YYC3-文档索引.md"));
        assert!(exemptions.covers("YYC3-文档质量评估报告.md"));
        assert!(!exemptions.covers("YYC3-Cater--架构类-缓存.md"));
    }
}
