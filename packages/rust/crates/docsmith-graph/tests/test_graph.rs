//! Integration tests: scan a fixture tree, build the graph, persist it and
//! query the recommender.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use docsmith_graph::{
    EdgeKind, GraphBuilder, GraphError, GraphSnapshot, KnowledgeGraph, Recommender, UserContext,
    load_quality_scores,
};
use docsmith_io::ReportWriter;
use docsmith_scanner::{DocsConfig, DocumentScanner};
use tempfile::TempDir;

const A: &str = "01-YYC3-Cater--架构类-总体架构.md";
const B: &str = "02-YYC3-Cater--技巧类-缓存策略.md";
const C: &str = "03-YYC3-Cater--技巧类-部署.md";

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        &format!("docs/{A}"),
        &format!("# 总体架构\n\n**@description**：平台总体架构\n\n数据架构 与 业务架构。参见 [缓存]({B})\n"),
    );
    write(root, &format!("docs/{B}"), "# 缓存策略\n\nRedis 数据架构 设计模式\n");
    write(
        root,
        &format!("docs/{C}"),
        "# 部署\n\n容器部署 与 数据架构, 见 YYC3-Cater--架构类-总体架构\n",
    );
    tmp
}

fn build(root: &Path) -> KnowledgeGraph {
    let config = DocsConfig::default();
    let outcome = DocumentScanner::new(config.scan_options()).scan(root).unwrap();
    let scores = HashMap::from([(A.to_string(), 90.0), (B.to_string(), 60.0)]);
    GraphBuilder::new(&config).build(&outcome, &scores)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_edges_centrality_and_importance() {
    let tmp = fixture();
    let graph = build(tmp.path());

    let references: Vec<(&str, &str)> = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Reference)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(references, vec![(A, B), (A, B), (C, A)]);

    let concept_edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Concept)
        .collect();
    assert_eq!(concept_edges.len(), 3);
    assert!(concept_edges.iter().all(|e| close(e.weight, 1.0)));
    assert_eq!(concept_edges[0].concepts, vec!["数据架构"]);

    let a = graph.document(A).unwrap();
    let b = graph.document(B).unwrap();
    let c = graph.document(C).unwrap();
    assert_eq!(a.referenced_by, vec![C]);
    assert_eq!(b.referenced_by, vec![A]);
    assert!(close(a.centrality, 4.0));
    assert!(close(b.centrality, 2.0));
    assert!(close(c.centrality, 1.0));
    assert!(close(a.importance, 0.8 + 0.2 / 3.0));
    assert!(close(b.importance, 0.2 + 0.4 * 60.0 / 90.0 + 0.2 / 3.0));
    assert!(close(c.importance, 0.1));
    assert_eq!(a.doc_type, "architecture");
    assert_eq!(b.doc_type, "technique");
    assert_eq!(a.description, "平台总体架构");

    let shared = graph.concept("数据架构").unwrap();
    assert_eq!(shared.frequency, 3);
    assert_eq!(shared.category, "架构");
    assert!(close(shared.importance, 1.5));
    assert!(close(graph.concept("容器部署").unwrap().importance, 0.0));
}

#[test]
fn test_snapshot_save_load_and_exports() {
    let tmp = fixture();
    let graph = build(tmp.path());
    let now = Utc.with_ymd_and_hms(2025, 12, 28, 4, 50, 44).unwrap();
    let snapshot = graph.snapshot(&now);
    assert_eq!(snapshot.statistics.total_documents, 3);
    assert_eq!(snapshot.statistics.total_concepts, 4);
    assert_eq!(snapshot.statistics.total_edges, 6);

    let writer = ReportWriter::new(tmp.path().join("out"));
    let path = snapshot.save(&writer, "graph").unwrap();
    let loaded = GraphSnapshot::load(&path).unwrap();
    assert_eq!(loaded.statistics, snapshot.statistics);
    assert_eq!(loaded.timestamp, snapshot.timestamp);
    assert_eq!(loaded.documents[0].file_name, A);
    assert_eq!(loaded.documents[0].referenced_by, vec![C]);
    assert_eq!(loaded.edges.len(), 6);

    let vis = snapshot.visualization();
    assert_eq!(vis.nodes.len(), 7);
    assert_eq!(vis.links.len(), 6);
    let doc = &vis.nodes[0];
    assert!(close(doc.size, 10.0 + 30.0 * graph.documents[0].importance));
    assert_eq!(doc.color, "#FF6B6B");
    assert!(vis.nodes.iter().any(|n| n.id == "concept_数据架构" && n.color == "#E74C3C"));

    let report = snapshot.to_markdown("YYC³");
    assert!(report.contains("## 📊 图谱统计"));
    assert!(report.contains(&format!("- **{A}**: 质量90.0")));
    assert!(report.contains(&format!("- **{B}**: 质量60.0")));
}

#[test]
fn test_load_errors_and_quality_scores() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("graph.json");
    assert!(matches!(GraphSnapshot::load(&missing), Err(GraphError::NotFound(_))));

    fs::write(&missing, "{not json").unwrap();
    assert!(matches!(GraphSnapshot::load(&missing), Err(GraphError::Json { .. })));

    let quality = tmp.path().join("quality.json");
    fs::write(
        &quality,
        r#"{"timestamp":"t","reports":[{"file_name":"a.md","metrics":{"overall_score":87.5}}]}"#,
    )
    .unwrap();
    let scores = load_quality_scores(&quality).unwrap();
    assert!(close(scores["a.md"], 87.5));
}

fn recommender(root: &Path) -> Recommender {
    let now = Utc.with_ymd_and_hms(2025, 12, 28, 0, 0, 0).unwrap();
    Recommender::from_snapshot(build(root).snapshot(&now))
}

#[test]
fn test_recommend_by_document_excludes_current() {
    let tmp = fixture();
    let rec = recommender(tmp.path());
    let results = rec.recommend_by_document(A, 10);
    let names: Vec<&str> = results.iter().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names, vec![C, B]);
    assert!(close(results[0].relevance_score, 1.0));
    assert!(close(results[1].relevance_score, 0.6 / 0.7));
    assert_eq!(
        results[0].match_reasons,
        vec!["引用当前文档", "共享概念: 数据架构", "相同分类"]
    );
    assert!(rec.recommend_by_document("missing.md", 10).is_empty());
}

#[test]
fn test_keyword_concept_and_category_strategies() {
    let tmp = fixture();
    let rec = recommender(tmp.path());

    let by_keyword = rec.search_by_keywords(&["REDIS".to_string()], 10);
    assert_eq!(by_keyword.len(), 1);
    assert_eq!(by_keyword[0].document_name, B);
    assert!(close(by_keyword[0].relevance_score, 1.0));

    let by_concept = rec.recommend_by_concepts(&["数据架构".to_string()], 2);
    assert_eq!(by_concept.len(), 2);
    assert!(by_concept.iter().all(|r| close(r.relevance_score, 1.0)));

    let by_category = rec.recommend_by_category("架构设计", 10);
    let names: Vec<&str> = by_category.iter().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names, vec![A, B, C]);
    assert!(close(by_category[2].relevance_score, 0.1));
    assert!(rec.recommend_by_category("无此分类", 10).is_empty());
}

#[test]
fn test_personalized_and_hybrid() {
    let tmp = fixture();
    let rec = recommender(tmp.path());

    let context = UserContext {
        viewed_documents: vec![A.to_string()],
        interests: vec!["redis".to_string()],
        ..UserContext::default()
    };
    let personal = rec.personalized(&context, 10);
    let names: Vec<&str> = personal.iter().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names, vec![B, C]);
    assert!(close(personal[1].relevance_score, 0.6));

    let hybrid = rec.hybrid("数据架构 Redis", None, 10);
    let names: Vec<&str> = hybrid.iter().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names, vec![B, A, C]);
    assert!(close(hybrid[0].relevance_score, 0.7));
    assert!(hybrid.iter().all(|r| r.relevance_score <= 1.0));
    assert_eq!(
        hybrid[0].match_reasons,
        vec!["匹配关键词: Redis", "匹配概念: 数据架构"]
    );
}
