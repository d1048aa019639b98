//! Knowledge-graph construction from a scan.
//!
//! Steps, in order: document nodes, concept nodes, reference and concept
//! edges, centrality, importance.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use docsmith_scanner::extract::{extract_concepts, extract_keywords, extract_references};
use docsmith_scanner::{DocsConfig, DocumentRecord, ScanOutcome};
use serde::Deserialize;

use crate::error::GraphError;
use crate::model::{ConceptNode, DocumentNode, Edge, EdgeKind, KnowledgeGraph};

const KEYWORD_LIMIT: usize = 10;
const FALLBACK_CATEGORY: &str = "其他";

#[derive(Deserialize)]
struct QualityFile {
    #[serde(default)]
    reports: Vec<QualityEntry>,
}

#[derive(Deserialize)]
struct QualityEntry {
    file_name: String,
    metrics: QualityEntryMetrics,
}

#[derive(Deserialize)]
struct QualityEntryMetrics {
    overall_score: f64,
}

/// File name to overall score, read from a quality assessment JSON report.
///
/// A missing file gives an empty map.
///
/// # Errors
/// `GraphError::Read` or `GraphError::Json` when the file exists but cannot
/// be read or parsed.
pub fn load_quality_scores(path: &Path) -> Result<HashMap<String, f64>, GraphError> {
    if !path.is_file() {
        log::info!("No quality report at {}; scores default to 0", path.display());
        return Ok(HashMap::new());
    }
    let raw = fs::read_to_string(path).map_err(|source| GraphError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: QualityFile = serde_json::from_str(&raw).map_err(|source| GraphError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed
        .reports
        .into_iter()
        .map(|entry| (entry.file_name, entry.metrics.overall_score))
        .collect())
}

/// Category of a concept name.
#[must_use]
pub fn concept_category(name: &str) -> &'static str {
    if name.contains("架构") {
        "架构"
    } else if name.contains("开发") || name.contains("测试") {
        "开发"
    } else if name.contains("部署") || name.contains("运维") {
        "运维"
    } else if name.contains("需求") || name.contains("用户") {
        "产品"
    } else {
        "技术"
    }
}

/// Builds a [`KnowledgeGraph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder<'a> {
    config: &'a DocsConfig,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder.
    #[must_use]
    pub fn new(config: &'a DocsConfig) -> Self {
        Self { config }
    }

    /// First category rule matching the lowercased file name or content.
    #[must_use]
    pub fn classify(&self, file_name: &str, content: &str) -> String {
        let name = file_name.to_lowercase();
        let content = content.to_lowercase();
        self.config
            .categories
            .iter()
            .find(|rule| {
                rule.keywords.iter().any(|keyword| {
                    !keyword.is_empty()
                        && (name.contains(keyword.as_str()) || content.contains(keyword.as_str()))
                })
            })
            .map_or_else(|| FALLBACK_CATEGORY.to_string(), |rule| rule.name.clone())
    }

    fn document_node(
        &self,
        record: &DocumentRecord,
        scores: &HashMap<String, f64>,
    ) -> DocumentNode {
        let architecture = self.config.conventions.architecture_marker();
        let doc_type = if !architecture.is_empty() && record.file_name.contains(architecture) {
            "architecture"
        } else {
            "technique"
        };
        DocumentNode {
            file_name: record.file_name.clone(),
            path: record.relative_path.clone(),
            doc_type: doc_type.to_string(),
            title: record.title.clone(),
            category: self.classify(&record.file_name, &record.content),
            description: record.description.clone(),
            keywords: extract_keywords(&record.content, KEYWORD_LIMIT),
            concepts: extract_concepts(&record.content),
            quality_score: scores.get(&record.file_name).copied().unwrap_or(0.0),
            centrality: 0.0,
            importance: 0.0,
            references: extract_references(&record.content, &self.config.conventions.brand_code),
            referenced_by: Vec::new(),
        }
    }

    /// Build the graph for every document of `outcome`.
    ///
    /// File names are node keys; a repeated name keeps the first document.
    #[must_use]
    pub fn build(&self, outcome: &ScanOutcome, scores: &HashMap<String, f64>) -> KnowledgeGraph {
        let mut documents: Vec<DocumentNode> = Vec::with_capacity(outcome.documents.len());
        for record in &outcome.documents {
            if documents.iter().any(|doc| doc.file_name == record.file_name) {
                log::warn!(
                    "Duplicate file name {}; keeping the first occurrence",
                    record.relative_path
                );
                continue;
            }
            log::debug!("Graph node {}", record.relative_path);
            documents.push(self.document_node(record, scores));
        }

        let concepts = build_concepts(&documents);
        let mut edges = link_references(&mut documents);
        edges.extend(link_concepts(&documents));
        score_documents(&mut documents);

        log::info!(
            "Knowledge graph: {} documents, {} concepts, {} edges",
            documents.len(),
            concepts.len(),
            edges.len()
        );
        KnowledgeGraph {
            documents,
            concepts,
            edges,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn build_concepts(documents: &[DocumentNode]) -> Vec<ConceptNode> {
    let mut concepts: Vec<ConceptNode> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut quality_sums: Vec<f64> = Vec::new();

    for doc in documents {
        for concept in &doc.concepts {
            let slot = *index.entry(concept.as_str()).or_insert_with(|| {
                concepts.push(ConceptNode {
                    name: concept.clone(),
                    category: concept_category(concept).to_string(),
                    frequency: 0,
                    documents: Vec::new(),
                    importance: 0.0,
                });
                quality_sums.push(0.0);
                concepts.len() - 1
            });
            concepts[slot].frequency += 1;
            concepts[slot].documents.push(doc.file_name.clone());
            quality_sums[slot] += doc.quality_score;
        }
    }

    for (concept, sum) in concepts.iter_mut().zip(quality_sums) {
        let frequency = concept.frequency as f64;
        let mean = if concept.frequency > 0 { sum / frequency } else { 0.0 };
        concept.importance = frequency * mean / 100.0;
    }
    concepts
}

/// Reference edges: each reference links to the first other document whose
/// name or title contains it.
fn link_references(documents: &mut [DocumentNode]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for source in 0..documents.len() {
        for reference in documents[source].references.clone() {
            let target = (0..documents.len()).find(|&other| {
                other != source
                    && (documents[other].file_name.contains(&reference)
                        || documents[other].title.contains(&reference))
            });
            let Some(target) = target else {
                continue;
            };
            let source_name = documents[source].file_name.clone();
            edges.push(Edge {
                source: source_name.clone(),
                target: documents[target].file_name.clone(),
                kind: EdgeKind::Reference,
                weight: 1.0,
                concepts: Vec::new(),
            });
            if !documents[target].referenced_by.contains(&source_name) {
                documents[target].referenced_by.push(source_name);
            }
        }
    }
    edges
}

/// Concept edges: one per unordered pair of documents sharing concepts.
#[allow(clippy::cast_precision_loss)]
fn link_concepts(documents: &[DocumentNode]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (i, left) in documents.iter().enumerate() {
        for right in &documents[i + 1..] {
            let shared: Vec<String> = left
                .concepts
                .iter()
                .filter(|concept| right.concepts.contains(concept))
                .cloned()
                .collect();
            if shared.is_empty() {
                continue;
            }
            edges.push(Edge {
                source: left.file_name.clone(),
                target: right.file_name.clone(),
                kind: EdgeKind::Concept,
                weight: shared.len() as f64,
                concepts: shared,
            });
        }
    }
    edges
}

#[allow(clippy::cast_precision_loss)]
fn score_documents(documents: &mut [DocumentNode]) {
    for doc in documents.iter_mut() {
        doc.centrality = (doc.referenced_by.len() * 2 + doc.references.len()) as f64;
    }
    let max_centrality = documents.iter().map(|d| d.centrality).fold(0.0, f64::max);
    let max_quality = documents.iter().map(|d| d.quality_score).fold(0.0, f64::max);
    let total = documents.len() as f64;

    for doc in documents.iter_mut() {
        let centrality = ratio(doc.centrality, max_centrality);
        let quality = ratio(doc.quality_score, max_quality);
        let cited = ratio(doc.referenced_by.len() as f64, total);
        doc.importance = centrality * 0.4 + quality * 0.4 + cited * 0.2;
    }
}

/// `value / max`, or 0 when `max` is not positive.
fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}
