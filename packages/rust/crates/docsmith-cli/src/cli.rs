//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "docsmith",
    about = "Audit and maintain Markdown documentation trees",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Documentation root directory.
    #[arg(
        long,
        short = 'r',
        value_name = "DIR",
        default_value = ".",
        global = true
    )]
    pub root: PathBuf,

    /// Explicit config file; defaults to `<root>/docsmith.yaml` when present.
    #[arg(long = "conf", short = 'c', value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Report directory; defaults to `<root>/<report.dir_name>`.
    #[arg(long = "report-dir", value_name = "DIR", global = true)]
    pub report_dir: Option<PathBuf>,

    /// Output format of the stdout summary.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub output: OutputFormat,

    /// Debug logging on stderr.
    #[arg(long, short = 'v', default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check file names against the naming convention.
    Naming,
    /// Find duplicate and missing numbers in doc-type directories.
    Numbers,
    /// Check for the standard header, title and numbered chapters.
    Format,
    /// Compare file-name keywords with content keywords.
    Correspondence,
    /// Score documents on five quality dimensions.
    Quality,
    /// Turn a saved quality assessment into findings, trends and a plan.
    QualityAudit {
        /// Quality assessment JSON; defaults to the one in the report directory.
        #[arg(long = "quality-file", value_name = "FILE")]
        quality_file: Option<PathBuf>,
    },
    /// Find numbering gaps, broken document links and orphan documents.
    Context,
    /// Check length, required sections, examples and tables.
    Content,
    /// Prepend the standard header to documents lacking one.
    Headers {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Delete duplicate documents and renumber their directories.
    Dedup {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Renumber every doc-type directory as 01..N.
    Renumber {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Build the knowledge graph and write it with its visualization and report.
    Graph {
        /// Quality assessment JSON; defaults to the one in the report directory.
        #[arg(long = "quality-file", value_name = "FILE")]
        quality_file: Option<PathBuf>,
    },
    /// Recommend documents from a saved graph.
    Recommend {
        #[arg(long = "graph-file", value_name = "FILE")]
        graph_file: PathBuf,
        #[arg(long = "type", value_enum, default_value_t = RecommendType::Hybrid)]
        kind: RecommendType,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        document: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RecommendType {
    Keyword,
    Concept,
    Document,
    Category,
    Personalized,
    Hybrid,
}

impl RecommendType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Concept => "concept",
            Self::Document => "document",
            Self::Category => "category",
            Self::Personalized => "personalized",
            Self::Hybrid => "hybrid",
        }
    }
}
