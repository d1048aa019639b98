//! Regex field extraction.
//!
//! Every extractor is a pure function over the document text. Patterns are
//! compiled once and shared.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Compile a hardcoded pattern, falling back to a never-matching regex.
#[must_use]
pub fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^#[ \t]+(.+)$"));
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^##[ \t]+(.+)$"));
static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?m)@description(?:\*\*)?[ \t]*[:：]?[ \t]*(.+)$"));
static DESCRIPTION_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"(?s)##\s*(?:描述|说明|概述|简介)\s*\n\s*(.+?)(?:\n##|\n\n|\z)")
});
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?m)^\*\*@([A-Za-z_]+)\*\*[ \t]*[:：][ \t]*(.*)$"));
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\[([^\]]+)\]\(([^)]+)\)"));
static TOC_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?m)^##[ \t]+(?:\S+[ \t]+)?目录[ \t]*\r?$"));
static BRACKET_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\[(.+?)\]"));
static INFO_TABLE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\*\*文档标题\*\*[ \t]*\|[ \t]*([^|\n]+)"));
static TITLE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[\s-]+"));
static DESCRIPTION_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[\s,，、]+"));

static KEYWORD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b[A-Z][a-zA-Z]{2,}\b",
        r"\b(?:架构|设计|开发|测试|部署|运维|监控|API|接口|服务|模块|组件|系统|平台|应用)\b",
        r"\b(?:AI|人工智能|机器学习|深度学习|智能|自动化|优化|性能|安全|质量)\b",
        r"\b(?:需求|规划|实施|迭代|发布|版本|文档|规范|标准|流程)\b",
    ]
    .iter()
    .map(|pattern| compile_regex(pattern))
    .collect()
});

static CONCEPT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:架构|设计)模式",
        r"(?:开发|测试|部署|运维)流程",
        r"(?:API|接口)设计",
        r"(?:数据|业务|技术)架构",
        r"(?:性能|安全|质量)保障",
        r"(?:微服务|容器|云)部署",
        r"(?:CI/CD|DevOps)流水线",
        r"(?:监控|告警|日志)系统",
        r"(?:需求|用户|产品)管理",
        r"(?:文档|知识)管理",
    ]
    .iter()
    .map(|pattern| compile_regex(pattern))
    .collect()
});

const DESCRIPTION_SECTION_CHARS: usize = 200;

/// First `# ` heading, trimmed; empty when absent.
#[must_use]
pub fn extract_title(text: &str) -> String {
    TITLE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// `@description` value, else the first paragraph of a description section.
#[must_use]
pub fn extract_description(text: &str) -> String {
    if let Some(value) = DESCRIPTION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
    {
        return value.to_string();
    }
    DESCRIPTION_SECTION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .chars()
                .take(DESCRIPTION_SECTION_CHARS)
                .collect()
        })
        .unwrap_or_default()
}

/// All `## ` heading texts, in document order.
#[must_use]
pub fn extract_sections(text: &str) -> Vec<String> {
    SECTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// `**@key**：value` metadata lines. The first occurrence of a key wins.
#[must_use]
pub fn extract_header(text: &str) -> BTreeMap<String, String> {
    let mut header = BTreeMap::new();
    for caps in HEADER_RE.captures_iter(text) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        header
            .entry(key.as_str().to_string())
            .or_insert_with(|| value.as_str().trim().to_string());
    }
    header
}

/// The `limit` most frequent keyword-pattern matches.
///
/// Ties keep first-occurrence order, scanning pattern by pattern.
#[must_use]
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let matches = KEYWORD_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str().to_string()));
    rank_by_frequency(matches, limit)
}

/// Deduplicated concept-pattern matches, in first-occurrence order.
#[must_use]
pub fn extract_concepts(text: &str) -> Vec<String> {
    dedup_in_order(
        CONCEPT_PATTERNS
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str().to_string())),
    )
}

/// Names of other documents this text points at.
///
/// Collects the link text of Markdown links to `.md` files and bare
/// `<brand_code>-…` document names.
#[must_use]
pub fn extract_references(text: &str, brand_code: &str) -> Vec<String> {
    let links = MD_LINK_RE.captures_iter(text).filter_map(|caps| {
        let label = caps.get(1)?.as_str();
        let target = caps.get(2)?.as_str().trim();
        (target.ends_with(".md") || target.ends_with(".MD")).then(|| label.to_string())
    });
    let mut refs: Vec<String> = links.collect();

    if !brand_code.is_empty() {
        let bare = compile_regex(&format!(r"{}-[^:\s\[\]()，,。]+", regex::escape(brand_code)));
        refs.extend(bare.find_iter(text).map(|m| m.as_str().to_string()));
    }
    dedup_in_order(refs)
}

/// A Markdown link whose target is a `.md` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLink {
    /// Link text.
    pub label: String,
    /// Target as written, e.g. `../架构类/01-a.md`.
    pub target: String,
}

impl DocLink {
    /// File name of the target, without directories or `#anchor`.
    #[must_use]
    pub fn target_file_name(&self) -> &str {
        let path = self.target.split('#').next().unwrap_or_default();
        path.rsplit(['/', '\\']).next().unwrap_or(path)
    }
}

/// Links to `.md` files, in document order.
#[must_use]
pub fn extract_doc_links(text: &str) -> Vec<DocLink> {
    MD_LINK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let label = caps.get(1)?.as_str();
            let target = caps.get(2)?.as_str().trim();
            let path = target.split('#').next().unwrap_or_default();
            path.to_lowercase().ends_with(".md").then(|| DocLink {
                label: label.to_string(),
                target: target.to_string(),
            })
        })
        .collect()
}

/// `[label]` texts inside the `## 目录` section.
#[must_use]
pub fn extract_toc_entries(text: &str) -> Vec<String> {
    let Some(heading) = TOC_HEADING_RE.find(text) else {
        return Vec::new();
    };
    let body = &text[heading.end()..];
    let body = body.find("\n##").map_or(body, |end| &body[..end]);
    BRACKET_LABEL_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keyword set used to judge whether a document's content matches its name.
///
/// Gathers tokens longer than one character from the title, the
/// `@description` value, the info-table title row and the table of contents.
#[must_use]
pub fn content_keywords(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut push_split = |value: &str, splitter: &Regex| {
        tokens.extend(
            splitter
                .split(value)
                .filter(|token| token.chars().count() > 1)
                .map(ToString::to_string),
        );
    };

    let title = extract_title(text);
    push_split(&title, &TITLE_SPLIT_RE);

    let header = extract_header(text);
    if let Some(description) = header.get("description") {
        push_split(description, &DESCRIPTION_SPLIT_RE);
    }

    if let Some(row) = INFO_TABLE_TITLE_RE.captures(text).and_then(|caps| caps.get(1)) {
        push_split(row.as_str().trim(), &TITLE_SPLIT_RE);
    }

    tokens.extend(
        extract_toc_entries(text)
            .into_iter()
            .filter(|label| label.chars().count() > 1),
    );

    dedup_in_order(tokens)
}

/// Count items and return the `limit` most frequent, ties in first-seen order.
#[must_use]
pub fn rank_by_frequency<I>(items: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for item in items {
        if let Some(&slot) = index.get(&item) {
            counts[slot].1 += 1;
        } else {
            index.insert(item.clone(), counts.len());
            counts.push((item, 1));
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(item, _)| item).collect()
}

/// Remove duplicates, keeping the first occurrence.
#[must_use]
pub fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
