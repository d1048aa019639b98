//! Graph snapshot JSON and the `{nodes, links}` visualization export.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use docsmith_io::ReportWriter;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::model::{ConceptNode, DocumentNode, Edge, EdgeKind, KnowledgeGraph};

/// Graph totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    /// Document nodes.
    pub total_documents: usize,
    /// Concept nodes.
    pub total_concepts: usize,
    /// Edges of both kinds.
    pub total_edges: usize,
}

/// Serialized form of a [`KnowledgeGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// RFC 3339 build time.
    pub timestamp: String,
    /// Totals.
    pub statistics: GraphStatistics,
    /// Document nodes.
    pub documents: Vec<DocumentNode>,
    /// Concept nodes.
    pub concepts: Vec<ConceptNode>,
    /// Edges.
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Snapshot the graph, stamped with `now`.
    #[must_use]
    pub fn snapshot<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> GraphSnapshot
    where
        Tz::Offset: std::fmt::Display,
    {
        GraphSnapshot {
            timestamp: now.to_rfc3339(),
            statistics: GraphStatistics {
                total_documents: self.documents.len(),
                total_concepts: self.concepts.len(),
                total_edges: self.edges.len(),
            },
            documents: self.documents.clone(),
            concepts: self.concepts.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl GraphSnapshot {
    /// Write `<dir>/<name>.json`.
    ///
    /// # Errors
    /// `GraphError::Io` when the report cannot be written.
    pub fn save(&self, writer: &ReportWriter, name: &str) -> Result<PathBuf, GraphError> {
        Ok(writer.write_json(name, self)?)
    }

    /// Read a snapshot written by [`GraphSnapshot::save`].
    ///
    /// # Errors
    /// `GraphError::NotFound` for a missing file, `GraphError::Read` or
    /// `GraphError::Json` when it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        if !path.is_file() {
            return Err(GraphError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| GraphError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&raw).map_err(|source| GraphError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loaded graph {}: {} documents, {} concepts, {} edges",
            path.display(),
            snapshot.documents.len(),
            snapshot.concepts.len(),
            snapshot.edges.len()
        );
        Ok(snapshot)
    }

    /// Node-link form for force-directed renderers.
    #[must_use]
    pub fn visualization(&self) -> Visualization {
        let documents = self.documents.iter().map(|doc| VisNode {
            id: doc.file_name.clone(),
            kind: "document".to_string(),
            title: doc.title.clone(),
            category: doc.category.clone(),
            size: 10.0 + doc.importance * 30.0,
            color: category_color(&doc.category).to_string(),
            importance: doc.importance,
            quality: Some(doc.quality_score),
            frequency: None,
        });
        let concepts = self.concepts.iter().map(|concept| VisNode {
            id: format!("concept_{}", concept.name),
            kind: "concept".to_string(),
            title: concept.name.clone(),
            category: concept.category.clone(),
            size: 5.0 + concept.importance * 20.0,
            color: concept_color(&concept.category).to_string(),
            importance: concept.importance,
            quality: None,
            frequency: Some(concept.frequency),
        });
        let links = self
            .edges
            .iter()
            .map(|edge| VisLink {
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
                weight: edge.weight,
            })
            .collect();
        Visualization {
            nodes: documents.chain(concepts).collect(),
            links,
        }
    }
}

/// Visualization node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    /// Document name, or `concept_<name>`.
    pub id: String,
    /// `document` or `concept`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display title.
    pub title: String,
    /// Category.
    pub category: String,
    /// Radius.
    pub size: f64,
    /// Hex colour.
    pub color: String,
    /// Importance.
    pub importance: f64,
    /// Quality score of a document node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    /// Frequency of a concept node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<usize>,
}

/// Visualization link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisLink {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Edge type.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Edge weight.
    pub weight: f64,
}

/// `{nodes, links}` export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visualization {
    /// Document nodes, then concept nodes.
    pub nodes: Vec<VisNode>,
    /// One link per edge.
    pub links: Vec<VisLink>,
}

/// Colour of a document category.
#[must_use]
pub fn category_color(category: &str) -> &'static str {
    match category {
        "架构设计" => "#FF6B6B",
        "开发实施" => "#4ECDC4",
        "测试验证" => "#45B7D1",
        "部署发布" => "#96CEB4",
        "运维运营" => "#FFEAA7",
        "需求规划" => "#DDA0DD",
        "用户指南" => "#98D8C8",
        "归类迭代" => "#F7DC6F",
        _ => "#BDC3C7",
    }
}

/// Colour of a concept category.
#[must_use]
pub fn concept_color(category: &str) -> &'static str {
    match category {
        "架构" => "#E74C3C",
        "开发" => "#3498DB",
        "运维" => "#2ECC71",
        "产品" => "#9B59B6",
        "技术" => "#F39C12",
        _ => "#95A5A6",
    }
}
