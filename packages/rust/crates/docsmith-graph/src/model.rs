//! Graph nodes and edges.

use serde::{Deserialize, Serialize};

/// One document in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// File name; the node key.
    #[serde(rename = "name")]
    pub file_name: String,
    /// Path relative to the scan root.
    #[serde(default)]
    pub path: String,
    /// `architecture` or `technique`.
    #[serde(default)]
    pub doc_type: String,
    /// First `# ` heading.
    pub title: String,
    /// Category from the category rules.
    pub category: String,
    /// Extracted description.
    #[serde(default)]
    pub description: String,
    /// Most frequent keywords.
    pub keywords: Vec<String>,
    /// Concepts found in the text.
    pub concepts: Vec<String>,
    /// Quality score from the quality report, 0 when unknown.
    pub quality_score: f64,
    /// `2 × in-degree + out-degree`.
    pub centrality: f64,
    /// Weighted blend of centrality, quality and in-degree.
    pub importance: f64,
    /// Reference texts extracted from the document.
    pub references: Vec<String>,
    /// Documents with a reference edge to this one.
    pub referenced_by: Vec<String>,
}

/// One concept in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    /// Concept text.
    pub name: String,
    /// 架构, 开发, 运维, 产品 or 技术.
    pub category: String,
    /// Number of documents containing it.
    pub frequency: usize,
    /// Those documents.
    pub documents: Vec<String>,
    /// `frequency × mean quality / 100`.
    pub importance: f64,
}

/// Edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Source references target.
    Reference,
    /// Source and target share concepts.
    Concept,
}

/// A directed (reference) or paired (concept) link between documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source document.
    pub source: String,
    /// Target document.
    pub target: String,
    /// Edge type.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// 1.0 for references, shared-concept count otherwise.
    pub weight: f64,
    /// Shared concepts of a concept edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<String>,
}

/// The assembled graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeGraph {
    /// Documents in scan order.
    pub documents: Vec<DocumentNode>,
    /// Concepts in first-seen order.
    pub concepts: Vec<ConceptNode>,
    /// Reference edges followed by concept edges.
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Document by file name.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<&DocumentNode> {
        self.documents.iter().find(|doc| doc.file_name == name)
    }

    /// Concept by name.
    #[must_use]
    pub fn concept(&self, name: &str) -> Option<&ConceptNode> {
        self.concepts.iter().find(|concept| concept.name == name)
    }
}
