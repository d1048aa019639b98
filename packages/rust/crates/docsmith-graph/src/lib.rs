//! docsmith-graph - Document knowledge graph.
//!
//! # Architecture
//!
//! ```text
//! docsmith-graph/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # GraphError
//! ├── model.rs        # Document/concept nodes and edges
//! ├── builder.rs      # ScanOutcome -> KnowledgeGraph
//! ├── persistence.rs  # GraphSnapshot JSON and visualization export
//! ├── report.rs       # Markdown graph report
//! └── recommend.rs    # Recommender strategies over a snapshot
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use docsmith_graph::{GraphBuilder, Recommender, load_quality_scores};
//!
//! let scores = load_quality_scores(&quality_json)?;
//! let graph = GraphBuilder::new(&config).build(&outcome, &scores);
//! let snapshot = graph.snapshot(&chrono::Local::now());
//! let recommender = Recommender::from_snapshot(snapshot);
//! let results = recommender.search_by_keywords(&["Redis".to_string()], 10);
//! ```

mod builder;
mod error;
mod model;
mod persistence;
mod recommend;
mod report;

pub use builder::{GraphBuilder, concept_category, load_quality_scores};
pub use error::GraphError;
pub use model::{ConceptNode, DocumentNode, Edge, EdgeKind, KnowledgeGraph};
pub use persistence::{
    GraphSnapshot, GraphStatistics, VisLink, VisNode, Visualization, category_color,
    concept_color,
};
pub use recommend::{
    Recommendation, RecommendationReport, Recommender, UserContext, extract_query_keywords,
};
