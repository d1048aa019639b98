#![allow(missing_docs)]

//! `docsmith`: audits and fixes for Markdown documentation trees.
//!
//! Logging goes to stderr. `RUST_LOG` overrides the default of `info` for
//! the docsmith crates (`debug` with `--verbose`).

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

const LOG_TARGETS: [&str; 6] = [
    "docsmith",
    "docsmith_io",
    "docsmith_scanner",
    "docsmith_audit",
    "docsmith_maintain",
    "docsmith_graph",
];

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    commands::execute(&cli)
}
