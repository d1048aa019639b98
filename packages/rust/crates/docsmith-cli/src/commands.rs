//! Subcommand execution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use docsmith_audit::{
    ContentAuditor, ContextAuditor, FormatAuditor, FormatSummary, NameContentChecker,
    NamingAuditor, NumberAuditor, NumberingSummary, QualityAssessment, QualityAssessor,
    audit_quality, render_format_report, render_numbering_report,
};
use docsmith_graph::{
    GraphBuilder, GraphSnapshot, RecommendationReport, Recommender, UserContext,
    load_quality_scores,
};
use docsmith_io::{ReportPaths, ReportWriter, timestamped_name};
use docsmith_maintain::{ChangeLog, Deduplicator, HeaderInjector, Renumberer};
use docsmith_scanner::{DocsConfig, DocumentScanner, ScanOutcome};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::{Cli, Command, OutputFormat, RecommendType};

struct Workspace {
    root: PathBuf,
    config: DocsConfig,
    writer: ReportWriter,
}

impl Workspace {
    fn load(cli: &Cli) -> Result<Self> {
        if !cli.root.is_dir() {
            bail!("documentation root not found: {}", cli.root.display());
        }
        let config = DocsConfig::load_or_default(&cli.root, cli.config_file.as_deref())
            .context("failed to load docsmith config")?;
        let report_dir = cli
            .report_dir
            .clone()
            .unwrap_or_else(|| config.report_dir(&cli.root));
        tracing::debug!(
            root = %cli.root.display(),
            report_dir = %report_dir.display(),
            "workspace loaded"
        );
        Ok(Self {
            root: cli.root.clone(),
            writer: ReportWriter::new(report_dir),
            config,
        })
    }

    fn report_name(&self, stem: &str) -> String {
        format!("{}-{stem}", self.config.conventions.brand_code)
    }

    fn brand(&self) -> &str {
        &self.config.conventions.brand
    }

    fn scan(&self) -> Result<ScanOutcome> {
        DocumentScanner::new(self.config.scan_options())
            .scan(&self.root)
            .with_context(|| format!("failed to scan {}", self.root.display()))
    }
}

const QUALITY_REPORT: &str = "文档质量评估报告";
const HEADERS_REPORT: &str = "标准头部注入报告";
const DEDUP_REPORT: &str = "重复文档清理报告";
const RENUMBER_REPORT: &str = "文档重新编号报告";

fn emit<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
    .context("failed to serialize CLI output as JSON")?;
    println!("{rendered}");
    Ok(())
}

fn summary<T: Serialize>(command: &str, root: &Path, stats: &T, reports: &ReportPaths) -> Value {
    json!({
        "command": command,
        "root": root,
        "summary": stats,
        "reports": reports,
    })
}

pub fn execute(cli: &Cli) -> Result<()> {
    let ws = Workspace::load(cli)?;
    let payload = match &cli.command {
        Command::Naming => naming(&ws)?,
        Command::Numbers => numbers(&ws)?,
        Command::Format => format_check(&ws)?,
        Command::Correspondence => correspondence(&ws)?,
        Command::Quality => quality(&ws)?,
        Command::QualityAudit { quality_file } => quality_audit(&ws, quality_file.as_deref())?,
        Command::Context => context(&ws)?,
        Command::Content => content(&ws)?,
        Command::Headers { dry_run } => {
            let log = HeaderInjector::new(&ws.config, *dry_run)
                .apply(&ws.root)
                .context("header injection failed")?;
            let markdown = log.to_markdown(HEADERS_REPORT);
            change_report(&ws, "headers", HEADERS_REPORT, &log, &markdown)?
        }
        Command::Dedup { dry_run } => {
            let outcome = Deduplicator::new(&ws.config, *dry_run)
                .apply(&ws.root)
                .context("deduplication failed")?;
            let markdown = outcome.to_markdown();
            let mut payload =
                change_report(&ws, "dedup", DEDUP_REPORT, &outcome.log, &markdown)?;
            payload["groups"] = json!(outcome.groups);
            payload
        }
        Command::Renumber { dry_run } => {
            let log = Renumberer::new(*dry_run)
                .renumber_tree(&ws.root, &ws.config.conventions.doc_types)
                .context("renumbering failed")?;
            let markdown = log.to_markdown(RENUMBER_REPORT);
            change_report(&ws, "renumber", RENUMBER_REPORT, &log, &markdown)?
        }
        Command::Graph { quality_file } => graph(&ws, quality_file.as_deref())?,
        Command::Recommend {
            graph_file,
            kind,
            query,
            document,
            category,
            limit,
        } => {
            let request = RecommendRequest {
                kind: *kind,
                query,
                document: document.as_deref(),
                category: category.as_deref(),
                limit: *limit,
            };
            recommend(&ws, graph_file, &request)?
        }
    };
    emit(&payload, cli.output)
}

fn naming(ws: &Workspace) -> Result<Value> {
    let audit = NamingAuditor::new(&ws.config)
        .audit(&ws.root)
        .context("naming audit failed")?;
    let markdown = audit.to_markdown(&ws.config.conventions);
    let reports = ws
        .writer
        .write_bundle(&ws.report_name("文档命名审核报告"), &markdown, &audit)?;
    Ok(summary("naming", &ws.root, &audit.stats, &reports))
}

fn numbers(ws: &Workspace) -> Result<Value> {
    let directories = NumberAuditor::new(&ws.config)
        .audit(&ws.root)
        .context("number audit failed")?;
    let stats = NumberingSummary::from_directories(&directories);
    let markdown = render_numbering_report(ws.brand(), &directories);
    let reports = ws.writer.write_bundle(
        &ws.report_name("文档编号审核报告"),
        &markdown,
        &json!({ "summary": stats, "directories": directories }),
    )?;
    Ok(summary("numbers", &ws.root, &stats, &reports))
}

fn format_check(ws: &Workspace) -> Result<Value> {
    let directories = FormatAuditor::new(&ws.config)
        .audit(&ws.root)
        .context("format audit failed")?;
    let stats = FormatSummary::from_checks(directories.iter().flat_map(|dir| &dir.checks));
    let markdown = render_format_report(ws.brand(), &directories);
    let reports = ws.writer.write_bundle(
        &ws.report_name("文档格式审核报告"),
        &markdown,
        &json!({ "summary": stats, "directories": directories }),
    )?;
    Ok(summary("format", &ws.root, &stats, &reports))
}

fn correspondence(ws: &Workspace) -> Result<Value> {
    let outcome = ws.scan()?;
    let audit = NameContentChecker::new(&ws.config).check_all(&outcome);
    let markdown = audit.to_markdown(ws.brand(), &ws.config.correspondence);
    let reports = ws.writer.write_bundle(
        &ws.report_name("文档名称内容对应审核报告"),
        &markdown,
        &audit,
    )?;
    let stats = json!({
        "total": audit.total,
        "passed": audit.passed,
        "failed": audit.failed,
        "pass_rate": audit.pass_rate(),
    });
    Ok(summary("correspondence", &ws.root, &stats, &reports))
}

fn quality(ws: &Workspace) -> Result<Value> {
    let outcome = ws.scan()?;
    let assessment = QualityAssessor::new(&ws.config).assess_all(&outcome);
    let markdown = assessment.to_markdown(ws.brand(), &ws.root);
    let reports = ws.writer.write_bundle(
        &ws.report_name(QUALITY_REPORT),
        &markdown,
        &assessment,
    )?;
    let stats = json!({
        "summary": assessment.summary,
        "pass_rate": assessment.pass_rate(),
    });
    Ok(summary("quality", &ws.root, &stats, &reports))
}

fn default_quality_file(ws: &Workspace) -> PathBuf {
    ws.writer
        .dir()
        .join(format!("{}.json", ws.report_name(QUALITY_REPORT)))
}

fn quality_audit(ws: &Workspace, quality_file: Option<&Path>) -> Result<Value> {
    let quality_file = quality_file.map_or_else(|| default_quality_file(ws), Path::to_path_buf);
    let raw = fs::read_to_string(&quality_file).with_context(|| {
        format!("quality assessment not found: {}", quality_file.display())
    })?;
    let assessment: QualityAssessment = serde_json::from_str(&raw)
        .with_context(|| format!("invalid quality assessment {}", quality_file.display()))?;

    let audit = audit_quality(&assessment);
    let name = timestamped_name(&ws.report_name("文档质量审计报告"), &Local::now());
    let reports = ws
        .writer
        .write_bundle(&name, &audit.to_markdown(ws.brand()), &audit)?;
    let stats = json!({
        "total_documents": audit.total_documents,
        "avg_score": audit.avg_score,
        "findings": audit.findings.len(),
        "plan_items": audit.improvement_plan.len(),
    });
    Ok(summary("quality-audit", &ws.root, &stats, &reports))
}

fn context(ws: &Workspace) -> Result<Value> {
    let audit = ContextAuditor::new(&ws.config)
        .audit(&ws.root)
        .context("context audit failed")?;
    let markdown = audit.to_markdown(ws.brand());
    let reports = ws
        .writer
        .write_bundle(&ws.report_name("文档上下文审核报告"), &markdown, &audit)?;
    Ok(summary("context", &ws.root, &audit.stats, &reports))
}

fn content(ws: &Workspace) -> Result<Value> {
    let audit = ContentAuditor::new(&ws.config)
        .audit(&ws.root)
        .context("content audit failed")?;
    let markdown = audit.to_markdown(ws.brand());
    let reports = ws
        .writer
        .write_bundle(&ws.report_name("文档内容审核报告"), &markdown, &audit)?;
    Ok(summary("content", &ws.root, &audit.stats, &reports))
}

/// Dry runs write no report files.
fn change_report(
    ws: &Workspace,
    command: &str,
    stem: &str,
    log: &ChangeLog,
    markdown: &str,
) -> Result<Value> {
    let reports = if log.dry_run {
        ReportPaths::default()
    } else {
        ws.writer.write_bundle(&ws.report_name(stem), markdown, log)?
    };
    let stats = json!({
        "dry_run": log.dry_run,
        "modifications": log.modifications(),
        "failures": log.failures(),
    });
    let mut payload = summary(command, &ws.root, &stats, &reports);
    payload["changes"] = json!(log.changes);
    Ok(payload)
}

fn graph(ws: &Workspace, quality_file: Option<&Path>) -> Result<Value> {
    let quality_file = quality_file.map_or_else(|| default_quality_file(ws), Path::to_path_buf);
    let scores = load_quality_scores(&quality_file).with_context(|| {
        format!("failed to load quality scores from {}", quality_file.display())
    })?;

    let outcome = ws.scan()?;
    let graph = GraphBuilder::new(&ws.config).build(&outcome, &scores);
    let now = Local::now();
    let snapshot = graph.snapshot(&now);

    let graph_name = timestamped_name(&ws.report_name("文档知识图谱"), &now);
    let graph_path = snapshot.save(&ws.writer, &graph_name)?;
    let visualization = ws.writer.write_json(
        &timestamped_name(&ws.report_name("文档知识图谱可视化"), &now),
        &snapshot.visualization(),
    )?;
    let report = ws.writer.write_markdown(
        &timestamped_name(&ws.report_name("文档知识图谱报告"), &now),
        &snapshot.to_markdown(ws.brand()),
    )?;

    Ok(json!({
        "command": "graph",
        "root": ws.root,
        "summary": snapshot.statistics,
        "reports": {
            "graph": graph_path,
            "visualization": visualization,
            "markdown": report,
        },
    }))
}

struct RecommendRequest<'a> {
    kind: RecommendType,
    query: &'a str,
    document: Option<&'a str>,
    category: Option<&'a str>,
    limit: usize,
}

fn recommend(ws: &Workspace, graph_file: &Path, request: &RecommendRequest<'_>) -> Result<Value> {
    let snapshot = GraphSnapshot::load(graph_file)
        .with_context(|| format!("failed to load graph {}", graph_file.display()))?;
    let recommender = Recommender::from_snapshot(snapshot);
    let (query, limit) = (request.query, request.limit);
    let words = || query.split_whitespace().map(ToString::to_string).collect::<Vec<_>>();

    let results = match request.kind {
        RecommendType::Keyword => recommender.search_by_keywords(&words(), limit),
        RecommendType::Concept => {
            recommender.recommend_by_concepts(&recommender.concepts_in(query), limit)
        }
        RecommendType::Document => {
            let Some(document) = request.document else {
                bail!("--document is required for --type document");
            };
            recommender.recommend_by_document(document, limit)
        }
        RecommendType::Category => {
            let Some(category) = request.category else {
                bail!("--category is required for --type category");
            };
            recommender.recommend_by_category(category, limit)
        }
        RecommendType::Personalized => {
            let context = UserContext {
                current_document: request.document.map(ToString::to_string),
                interests: words(),
                ..UserContext::default()
            };
            recommender.personalized(&context, limit)
        }
        RecommendType::Hybrid => {
            let context = UserContext {
                current_document: request.document.map(ToString::to_string),
                ..UserContext::default()
            };
            recommender.hybrid(query, Some(&context), limit)
        }
    };

    let now = Local::now();
    let report = RecommendationReport::new(query, results, &now);
    let stem = ws.report_name(&format!("文档推荐报告_{}", request.kind.as_str()));
    let reports = ws.writer.write_bundle(
        &timestamped_name(&stem, &now),
        &report.to_markdown(ws.brand()),
        &report,
    )?;

    Ok(json!({
        "command": "recommend",
        "type": request.kind.as_str(),
        "query": query,
        "total_results": report.total_results,
        "results": report.results,
        "reports": reports,
    }))
}
