//! Document recommendation over a graph snapshot.
//!
//! Every strategy accumulates per-document scores, normalises them by the
//! maximum, and returns the best `limit` documents. Ties sort by name.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use docsmith_scanner::extract::{compile_regex, dedup_in_order};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{DocumentNode, EdgeKind};
use crate::persistence::GraphSnapshot;

const PREVIEW_CHARS: usize = 200;
const RELATED_PER_VIEWED: usize = 5;
const SUB_SEARCH_LIMIT: usize = 20;
const QUERY_KEYWORD_LIMIT: usize = 10;

static CAPITALISED_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"\b[A-Z][a-zA-Z]{2,}\b"));
static TECH_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"\b(?:架构|设计|开发|测试|部署|API|接口|服务|模块|组件|系统|平台|应用|数据库|缓存|消息队列|监控|日志|安全|性能|优化)\b",
    )
});

/// Capitalised words and technical terms of a free-text query.
///
/// Capitalised words come first, then technical terms; duplicates are
/// dropped and at most ten are kept.
#[must_use]
pub fn extract_query_keywords(query: &str) -> Vec<String> {
    let words = CAPITALISED_RE
        .find_iter(query)
        .chain(TECH_TERM_RE.find_iter(query))
        .map(|m| m.as_str().to_string());
    let mut keywords = dedup_in_order(words);
    keywords.truncate(QUERY_KEYWORD_LIMIT);
    keywords
}

/// What is known about the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    /// Document being read.
    pub current_document: Option<String>,
    /// Earlier queries.
    pub search_history: Vec<String>,
    /// Documents already read.
    pub viewed_documents: Vec<String>,
    /// Interest tags, matched against keywords and concepts.
    pub interests: Vec<String>,
    /// Reader role.
    pub role: String,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            current_document: None,
            search_history: Vec::new(),
            viewed_documents: Vec::new(),
            interests: Vec::new(),
            role: "developer".to_string(),
        }
    }
}

/// One recommended document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// File name.
    pub document_name: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: String,
    /// Relevance in `[0, 1]`.
    pub relevance_score: f64,
    /// Quality score.
    pub quality_score: f64,
    /// Graph importance.
    pub importance: f64,
    /// Why it was picked.
    pub match_reasons: Vec<String>,
    /// Start of the description.
    pub preview: String,
}

/// Results of one recommendation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// RFC 3339 time of the query.
    pub timestamp: String,
    /// Query text.
    pub query: String,
    /// Number of results.
    pub total_results: usize,
    /// Results, best first.
    pub results: Vec<Recommendation>,
}

impl RecommendationReport {
    /// Wrap `results` for `query`.
    #[must_use]
    pub fn new<Tz: TimeZone>(
        query: &str,
        results: Vec<Recommendation>,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            timestamp: now.to_rfc3339(),
            query: query.to_string(),
            total_results: results.len(),
            results,
        }
    }

    /// Render the result table and per-result details.
    #[must_use]
    pub fn to_markdown(&self, brand: &str) -> String {
        let short = |text: &str| text.chars().take(30).collect::<String>();
        let mut out = String::new();
        out.push_str(&format!("# {brand} 文档推荐报告\n\n"));
        out.push_str(&format!("**生成时间**: {}\n", self.timestamp));
        if !self.query.is_empty() {
            out.push_str(&format!("**查询**: {}\n", self.query));
        }
        out.push_str(&format!("**推荐结果数**: {}\n\n", self.total_results));

        out.push_str("## 推荐结果\n\n");
        out.push_str("| 排名 | 文档名称 | 标题 | 分类 | 相关性 | 质量 | 重要性 | 匹配原因 |\n");
        out.push_str("|------|---------|------|------|--------|------|--------|----------|\n");
        for (rank, result) in self.results.iter().enumerate() {
            let reasons = result
                .match_reasons
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(&format!(
                "| {} | {} | {} | {} | {:.3} | {:.1} | {:.3} | {} |\n",
                rank + 1,
                short(&result.document_name),
                short(&result.title),
                result.category,
                result.relevance_score,
                result.quality_score,
                result.importance,
                reasons.replace('|', "\\|")
            ));
        }

        out.push_str("\n## 详细信息\n\n");
        for (rank, result) in self.results.iter().enumerate() {
            out.push_str(&format!("### {}. {}\n\n", rank + 1, result.title));
            out.push_str(&format!("**文档名称**: {}\n\n", result.document_name));
            out.push_str(&format!("**分类**: {}\n\n", result.category));
            out.push_str(&format!("**相关性评分**: {:.3}\n\n", result.relevance_score));
            out.push_str(&format!("**质量评分**: {:.1}\n\n", result.quality_score));
            out.push_str(&format!("**重要性**: {:.3}\n\n", result.importance));
            out.push_str("**匹配原因**:\n");
            for reason in &result.match_reasons {
                out.push_str(&format!("- {reason}\n"));
            }
            out.push_str(&format!("\n**预览**: {}...\n\n", result.preview));
            out.push_str("---\n\n");
        }
        out
    }
}

/// Indexes a snapshot and answers recommendation queries.
#[derive(Debug, Clone)]
pub struct Recommender {
    snapshot: GraphSnapshot,
    by_name: HashMap<String, usize>,
    keyword_index: BTreeMap<String, BTreeSet<String>>,
    concept_index: BTreeMap<String, BTreeSet<String>>,
    concept_importance: HashMap<String, f64>,
    category_index: BTreeMap<String, BTreeSet<String>>,
    reference_index: BTreeMap<String, BTreeSet<String>>,
    referenced_by_index: BTreeMap<String, BTreeSet<String>>,
}

impl Recommender {
    /// Build every index over `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut by_name = HashMap::new();
        let mut keyword_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut concept_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut category_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (index, doc) in snapshot.documents.iter().enumerate() {
            by_name.entry(doc.file_name.clone()).or_insert(index);
            for keyword in &doc.keywords {
                keyword_index
                    .entry(keyword.to_lowercase())
                    .or_default()
                    .insert(doc.file_name.clone());
            }
            for concept in &doc.concepts {
                concept_index
                    .entry(concept.clone())
                    .or_default()
                    .insert(doc.file_name.clone());
            }
            category_index
                .entry(doc.category.clone())
                .or_default()
                .insert(doc.file_name.clone());
        }

        let mut reference_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut referenced_by_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for edge in snapshot.edges.iter().filter(|e| e.kind == EdgeKind::Reference) {
            reference_index
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
            referenced_by_index
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone());
        }

        let concept_importance = snapshot
            .concepts
            .iter()
            .map(|concept| (concept.name.clone(), concept.importance))
            .collect();

        Self {
            snapshot,
            by_name,
            keyword_index,
            concept_index,
            concept_importance,
            category_index,
            reference_index,
            referenced_by_index,
        }
    }

    /// The indexed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    fn document(&self, name: &str) -> Option<&DocumentNode> {
        self.by_name
            .get(name)
            .and_then(|&index| self.snapshot.documents.get(index))
    }

    /// Concept names of the snapshot that occur in `text`.
    #[must_use]
    pub fn concepts_in(&self, text: &str) -> Vec<String> {
        self.snapshot
            .concepts
            .iter()
            .filter(|concept| text.contains(&concept.name))
            .map(|concept| concept.name.clone())
            .collect()
    }

    /// +1 per matching keyword, case-insensitive.
    #[must_use]
    pub fn search_by_keywords(&self, keywords: &[String], limit: usize) -> Vec<Recommendation> {
        let mut scores = BTreeMap::new();
        for keyword in keywords {
            if let Some(docs) = self.keyword_index.get(&keyword.to_lowercase()) {
                for doc in docs {
                    *scores.entry(doc.clone()).or_insert(0.0) += 1.0;
                }
            }
        }
        let reason = format!("匹配关键词: {}", keywords.join(", "));
        self.finish(normalise(scores), limit, |_| vec![reason.clone()])
    }

    /// Each matching concept adds its importance.
    #[must_use]
    pub fn recommend_by_concepts(&self, concepts: &[String], limit: usize) -> Vec<Recommendation> {
        let mut scores = BTreeMap::new();
        for concept in concepts {
            let Some(docs) = self.concept_index.get(concept) else {
                continue;
            };
            let weight = self.concept_importance.get(concept).copied().unwrap_or(0.0);
            for doc in docs {
                *scores.entry(doc.clone()).or_insert(0.0) += weight;
            }
        }
        self.finish(normalise(scores), limit, |doc| {
            let matched: Vec<&str> = concepts
                .iter()
                .filter(|concept| doc.concepts.contains(concept))
                .map(String::as_str)
                .collect();
            vec![format!("匹配概念: {}", matched.join(", "))]
        })
    }

    /// Documents related to `name` by references, concepts and category.
    ///
    /// `name` itself is never returned; an unknown name gives no results.
    #[must_use]
    pub fn recommend_by_document(&self, name: &str, limit: usize) -> Vec<Recommendation> {
        let Some(current) = self.document(name) else {
            return Vec::new();
        };
        let empty = BTreeSet::new();
        let references = self.reference_index.get(name).unwrap_or(&empty);
        let referenced_by = self.referenced_by_index.get(name).unwrap_or(&empty);

        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        for doc in references {
            *scores.entry(doc.clone()).or_default() += 0.3;
        }
        for doc in referenced_by {
            *scores.entry(doc.clone()).or_default() += 0.4;
        }
        for concept in &current.concepts {
            for doc in self.concept_index.get(concept).into_iter().flatten() {
                *scores.entry(doc.clone()).or_default() += 0.2;
            }
        }
        for doc in self.category_index.get(&current.category).into_iter().flatten() {
            *scores.entry(doc.clone()).or_default() += 0.1;
        }
        scores.remove(name);

        self.finish(normalise(scores), limit, |other| {
            let mut reasons = Vec::new();
            if references.contains(&other.file_name) {
                reasons.push("被当前文档引用".to_string());
            }
            if referenced_by.contains(&other.file_name) {
                reasons.push("引用当前文档".to_string());
            }
            let shared: Vec<&str> = current
                .concepts
                .iter()
                .filter(|concept| other.concepts.contains(concept))
                .take(3)
                .map(String::as_str)
                .collect();
            if !shared.is_empty() {
                reasons.push(format!("共享概念: {}", shared.join(", ")));
            }
            if other.category == current.category {
                reasons.push("相同分类".to_string());
            }
            reasons
        })
    }

    /// Documents of `category` by importance, then quality.
    #[must_use]
    pub fn recommend_by_category(&self, category: &str, limit: usize) -> Vec<Recommendation> {
        let Some(names) = self.category_index.get(category) else {
            return Vec::new();
        };
        let mut docs: Vec<&DocumentNode> =
            names.iter().filter_map(|name| self.document(name)).collect();
        docs.sort_by(|a, b| {
            b.importance
                .total_cmp(&a.importance)
                .then(b.quality_score.total_cmp(&a.quality_score))
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        docs.into_iter()
            .take(limit)
            .map(|doc| recommendation(doc, doc.importance, vec![format!("分类: {category}")]))
            .collect()
    }

    /// Recommendations from reading history and interests.
    ///
    /// Viewed documents are never returned.
    #[must_use]
    pub fn personalized(&self, context: &UserContext, limit: usize) -> Vec<Recommendation> {
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        for viewed in &context.viewed_documents {
            for related in self.recommend_by_document(viewed, RELATED_PER_VIEWED) {
                *scores.entry(related.document_name).or_default() += 0.3;
            }
        }
        for interest in &context.interests {
            for doc in self.keyword_index.get(&interest.to_lowercase()).into_iter().flatten() {
                *scores.entry(doc.clone()).or_default() += 0.2;
            }
            for doc in self.concept_index.get(interest).into_iter().flatten() {
                *scores.entry(doc.clone()).or_default() += 0.3;
            }
        }
        for viewed in &context.viewed_documents {
            scores.remove(viewed);
        }
        self.finish(normalise(scores), limit, |_| vec!["个性化推荐".to_string()])
    }

    /// Weighted blend of the keyword, concept, current-document and
    /// personalised strategies.
    #[must_use]
    pub fn hybrid(
        &self,
        query: &str,
        context: Option<&UserContext>,
        limit: usize,
    ) -> Vec<Recommendation> {
        let keywords = extract_query_keywords(query);
        let concepts = self.concepts_in(query);
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        let mut blend = |results: Vec<Recommendation>, weight: f64| {
            for result in results {
                *scores.entry(result.document_name).or_default() += result.relevance_score * weight;
            }
        };

        blend(self.search_by_keywords(&keywords, SUB_SEARCH_LIMIT), 0.4);
        blend(self.recommend_by_concepts(&concepts, SUB_SEARCH_LIMIT), 0.3);
        if let Some(current) = context.and_then(|c| c.current_document.as_deref()) {
            blend(self.recommend_by_document(current, SUB_SEARCH_LIMIT), 0.2);
        }
        if let Some(context) = context {
            blend(self.personalized(context, SUB_SEARCH_LIMIT), 0.1);
        }

        self.finish(scores, limit, |doc| {
            let mut reasons = Vec::new();
            let own: Vec<String> = doc.keywords.iter().map(|k| k.to_lowercase()).collect();
            let matched: Vec<&str> = keywords
                .iter()
                .filter(|keyword| own.contains(&keyword.to_lowercase()))
                .take(3)
                .map(String::as_str)
                .collect();
            if !matched.is_empty() {
                reasons.push(format!("匹配关键词: {}", matched.join(", ")));
            }
            let matched: Vec<&str> = concepts
                .iter()
                .filter(|concept| doc.concepts.contains(concept))
                .take(3)
                .map(String::as_str)
                .collect();
            if !matched.is_empty() {
                reasons.push(format!("匹配概念: {}", matched.join(", ")));
            }
            reasons
        })
    }

    /// Sort by score (ties by name), cut to `limit`, and attach reasons.
    fn finish(
        &self,
        scores: BTreeMap<String, f64>,
        limit: usize,
        reasons: impl Fn(&DocumentNode) -> Vec<String>,
    ) -> Vec<Recommendation> {
        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .filter_map(|(name, score)| {
                let doc = self.document(&name)?;
                Some(recommendation(doc, score, reasons(doc)))
            })
            .take(limit)
            .collect()
    }
}

fn recommendation(
    doc: &DocumentNode,
    score: f64,
    reasons: Vec<String>,
) -> Recommendation {
    Recommendation {
        document_name: doc.file_name.clone(),
        title: doc.title.clone(),
        category: doc.category.clone(),
        relevance_score: score,
        quality_score: doc.quality_score,
        importance: doc.importance,
        match_reasons: reasons,
        preview: doc.description.chars().take(PREVIEW_CHARS).collect(),
    }
}

/// Divide every score by the maximum; an empty or all-zero map is unchanged.
fn normalise(mut scores: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = scores.values().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for score in scores.values_mut() {
            *score /= max;
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keywords_dedup_in_order() {
        let keywords = extract_query_keywords("Redis 缓存 Redis Kafka ok");
        assert_eq!(keywords, vec!["Redis", "Kafka", "缓存"]);
    }

    #[test]
    fn test_normalise_scales_to_one() {
        let scores = normalise(BTreeMap::from([
            ("a".to_string(), 2.0),
            ("b".to_string(), 1.0),
        ]));
        assert!((scores["a"] - 1.0).abs() < 1e-12);
        assert!((scores["b"] - 0.5).abs() < 1e-12);
        assert!(normalise(BTreeMap::new()).is_empty());
    }
}
