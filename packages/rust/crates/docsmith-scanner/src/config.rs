//! Workspace configuration (`docsmith.yaml`).
//!
//! Every section and field is optional; missing values fall back to the
//! conventions of the YYC³ documentation tree.
//!
//! ```yaml
//! scan:
//!   exclude_substrings: ["审核报告", "脚本工具"]
//!   max_depth: 6
//! conventions:
//!   prefix: "YYC3-Cater"
//!   doc_types: ["架构类", "技巧类"]
//! correspondence:
//!   pass_threshold: 0.3
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scanner::ScanOptions;

/// Default config file name looked up at the docs root.
pub const CONFIG_FILE_NAME: &str = "docsmith.yaml";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Scanner inclusion rules.
    pub scan: ScanSettings,
    /// File naming conventions.
    pub conventions: NamingConventions,
    /// Report output location.
    pub report: ReportSettings,
    /// Standard header template values.
    pub header: HeaderSettings,
    /// Name/content correspondence thresholds.
    pub correspondence: CorrespondenceSettings,
    /// Content completeness rules.
    pub content: ContentSettings,
    /// Ordered document-category keyword rules; first match wins.
    pub categories: Vec<CategoryRule>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            scan: ScanSettings::default(),
            conventions: NamingConventions::default(),
            report: ReportSettings::default(),
            header: HeaderSettings::default(),
            correspondence: CorrespondenceSettings::default(),
            content: ContentSettings::default(),
            categories: default_categories(),
        }
    }
}

impl DocsConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, `ConfigError::Yaml`
    /// when it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        if config.categories.is_empty() {
            config.categories = default_categories();
        }
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration for `root`.
    ///
    /// An explicit path wins; otherwise `<root>/docsmith.yaml` is used when it
    /// exists; otherwise defaults.
    ///
    /// # Errors
    /// Propagates `load` errors for whichever file was selected.
    pub fn load_or_default(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Directory reports are written to.
    #[must_use]
    pub fn report_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.report.dir_name)
    }

    /// Scanner options derived from the `scan` section.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            exclude_substrings: self.scan.exclude_substrings.clone(),
            exclude_file_names: self.scan.exclude_file_names.clone(),
            max_depth: self.scan.max_depth,
            max_file_size: self.scan.max_file_size,
        }
    }
}

/// Scanner inclusion rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Paths whose root-relative form contains any of these are skipped.
    pub exclude_substrings: Vec<String>,
    /// Exact file names that are skipped.
    pub exclude_file_names: Vec<String>,
    /// Maximum walk depth below the root.
    pub max_depth: Option<usize>,
    /// Files larger than this many bytes are reported as failures.
    pub max_file_size: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            exclude_substrings: vec!["审核报告".to_string(), "脚本工具".to_string()],
            exclude_file_names: vec!["README.md".to_string()],
            max_depth: None,
            max_file_size: docsmith_io::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// File naming conventions: `NN-<prefix>--<type>-<name>.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventions {
    /// Project prefix following the number.
    pub prefix: String,
    /// Short brand code that may prefix bare document references.
    pub brand_code: String,
    /// Display brand used in generated text.
    pub brand: String,
    /// Doc-type markers, also the names of the doc-type directories.
    /// The first entry is the architecture type.
    pub doc_types: Vec<String>,
    /// Markers identifying template documents.
    pub template_markers: Vec<String>,
    /// Longest acceptable file name, in characters.
    pub max_file_name_chars: usize,
    /// Words dropped from file-name keywords.
    pub keyword_stop_words: Vec<String>,
    /// Lowercase file-name prefixes of script outputs the naming check ignores.
    pub ignored_prefixes: Vec<String>,
    /// File names the naming check ignores.
    pub ignored_names: Vec<String>,
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self {
            prefix: "YYC3-Cater".to_string(),
            brand_code: "YYC3".to_string(),
            brand: "YYC³".to_string(),
            doc_types: vec!["架构类".to_string(), "技巧类".to_string()],
            template_markers: vec!["模版".to_string(), "模板".to_string()],
            max_file_name_chars: 100,
            keyword_stop_words: ["文档", "设计", "架构", "说明", "指南", "手册"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignored_prefixes: vec!["yyc3-".to_string()],
            ignored_names: vec!["YYC3-文档索引.md".to_string()],
        }
    }
}

impl NamingConventions {
    /// Architecture doc-type marker.
    #[must_use]
    pub fn architecture_marker(&self) -> &str {
        self.doc_types.first().map_or("", String::as_str)
    }

    /// First doc-type marker contained in `name`.
    #[must_use]
    pub fn doc_type_of(&self, name: &str) -> Option<&str> {
        self.doc_types
            .iter()
            .find(|marker| !marker.is_empty() && name.contains(marker.as_str()))
            .map(String::as_str)
    }

    /// True when `name` is a template document.
    #[must_use]
    pub fn is_template(&self, name: &str) -> bool {
        self.template_markers
            .iter()
            .any(|marker| !marker.is_empty() && name.contains(marker.as_str()))
    }
}

/// Report output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Report directory name inside the docs root.
    pub dir_name: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            dir_name: "YYC3-Cater-审核报告".to_string(),
        }
    }
}

/// Standard header template values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    /// `@author` value.
    pub author: String,
    /// `@version` value.
    pub version: String,
    /// `@created` value.
    pub created: String,
    /// `@updated` value.
    pub updated: String,
    /// `@status` value.
    pub status: String,
    /// Project name used by the fallback description `"{project}的{title}"`.
    pub project: String,
    /// Title to description overrides.
    pub descriptions: BTreeMap<String, String>,
    /// Ordered keyword to tag rules; the first keyword found in the title wins.
    pub tag_rules: Vec<TagRule>,
    /// Tags used when no rule matches.
    pub fallback_tags: String,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            author: "YYC³".to_string(),
            version: "v1.0.0".to_string(),
            created: "2025-01-30".to_string(),
            updated: "2025-01-30".to_string(),
            status: "published".to_string(),
            project: "YYC³餐饮行业智能化平台".to_string(),
            descriptions: BTreeMap::new(),
            tag_rules: default_tag_rules(),
            fallback_tags: "YYC³,文档".to_string(),
        }
    }
}

/// One keyword to tags rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Substring looked up in the document title.
    pub keyword: String,
    /// Comma-separated tags.
    pub tags: String,
}

fn default_tag_rules() -> Vec<TagRule> {
    [
        ("架构设计", "架构设计,YYC³,系统架构"),
        ("微服务", "架构设计,微服务,YYC³,服务治理"),
        ("数据库", "架构设计,数据库,YYC³,数据存储"),
        ("API", "架构设计,API,YYC³,接口设计"),
        ("数据架构", "架构设计,数据架构,YYC³,数据治理"),
        ("安全架构", "架构设计,安全,YYC³,安全防护"),
        ("接口架构", "架构设计,接口,YYC³,接口管理"),
        ("智能架构", "架构设计,AI,YYC³,智能化"),
        ("部署架构", "架构设计,部署,YYC³,容器化"),
        ("ADR", "架构设计,ADR,YYC³,架构决策"),
        ("监控架构", "架构设计,监控,YYC³,运维监控"),
        ("全链路智能化", "架构设计,智能化,YYC³,转型"),
        ("分层闭环", "架构设计,开发模型,YYC³,闭环"),
        ("多维度闭环", "架构设计,监控优化,YYC³,闭环"),
        ("系统色", "架构设计,UI设计,YYC³,色彩"),
        ("可访问性", "架构设计,可访问性,YYC³,无障碍"),
        ("错误处理", "架构设计,错误处理,YYC³,容错"),
    ]
    .iter()
    .map(|(keyword, tags)| TagRule {
        keyword: (*keyword).to_string(),
        tags: (*tags).to_string(),
    })
    .collect()
}

/// Name/content correspondence thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrespondenceSettings {
    /// Similarity at or above which a document passes.
    pub pass_threshold: f64,
    /// Failing similarity below which a document is P0.
    pub critical_threshold: f64,
}

impl Default for CorrespondenceSettings {
    fn default() -> Self {
        Self {
            pass_threshold: 0.3,
            critical_threshold: 0.1,
        }
    }
}

/// A section every document should have, under any of its titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSection {
    /// Name used in reports.
    pub name: String,
    /// Accepted `##` heading titles, numbered (`## 1. 概述`) or not.
    pub titles: Vec<String>,
}

/// Content completeness rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Minimum non-empty, non-heading lines.
    pub min_content_lines: usize,
    /// Sections looked for in `##` headings.
    pub required_sections: Vec<RequiredSection>,
    /// File-name substrings marking a technical document, which should
    /// carry code examples and tables.
    pub technical_markers: Vec<String>,
}

impl Default for ContentSettings {
    fn default() -> Self {
        let section = |name: &str, titles: &[&str]| RequiredSection {
            name: name.to_string(),
            titles: titles.iter().map(ToString::to_string).collect(),
        };
        Self {
            min_content_lines: 50,
            required_sections: vec![
                section("概述", &["概述"]),
                section("功能特性", &["功能特性"]),
                section("技术栈", &["技术栈"]),
                section("实现", &["实现", "详细设计"]),
            ],
            technical_markers: vec!["架构".to_string(), "设计".to_string()],
        }
    }
}

/// One document category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name.
    pub name: String,
    /// Lowercase substrings looked up in the file name and content.
    pub keywords: Vec<String>,
}

/// Default category rules in match order.
#[must_use]
pub fn default_categories() -> Vec<CategoryRule> {
    [
        ("架构设计", ["架构", "设计", "系统", "平台"]),
        ("开发实施", ["开发", "实施", "编码", "实现"]),
        ("测试验证", ["测试", "验证", "质量", "缺陷"]),
        ("部署发布", ["部署", "发布", "运维", "容器"]),
        ("运维运营", ["运维", "监控", "告警", "日志"]),
        ("需求规划", ["需求", "规划", "产品", "用户"]),
        ("用户指南", ["指南", "手册", "教程", "入门"]),
        ("归类迭代", ["迭代", "版本", "更新", "变更"]),
    ]
    .iter()
    .map(|(name, keywords)| CategoryRule {
        name: (*name).to_string(),
        keywords: keywords.iter().map(ToString::to_string).collect(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: DocsConfig =
            serde_yaml::from_str("conventions:\n  prefix: ACME\n").unwrap();
        assert_eq!(config.conventions.prefix, "ACME");
        assert_eq!(config.conventions.doc_types, vec!["架构类", "技巧类"]);
        assert_eq!(config.report.dir_name, "YYC3-Cater-审核报告");
        assert!((config.correspondence.pass_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.content.min_content_lines, 50);
        assert_eq!(config.content.required_sections.len(), 4);
    }

    #[test]
    fn test_doc_type_of_first_match() {
        let conventions = NamingConventions::default();
        assert_eq!(
            conventions.doc_type_of("01-YYC3-Cater--技巧类-缓存.md"),
            Some("技巧类")
        );
        assert_eq!(conventions.doc_type_of("notes.md"), None);
        assert!(conventions.is_template("03-模板-发布.md"));
    }
}
