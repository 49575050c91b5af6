#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "scopegraph: architecture graphs for codebases",
    long_about = None
)]
struct Cli {
    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze an input tree",
        long_about = "Project references onto scope graphs, prune them, and print every artifact's metrics.",
        after_help = "EXAMPLES:\n    # Analyze with ./scopegraph.toml if present\n    scopegraph analyze tree.json\n\n    # Emit machine-readable output\n    scopegraph analyze tree.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Summarize an input tree",
        after_help = "EXAMPLES:\n    scopegraph summary tree.json"
    )]
    Summary(cmd::summary::SummaryArgs),

    #[command(
        about = "List the retained dependencies of one scope",
        after_help = "EXAMPLES:\n    # Dependencies between the files of folder src\n    scopegraph deps tree.json src"
    )]
    Deps(cmd::deps::DepsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCOPEGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "scopegraph=debug,info"
        } else {
            "scopegraph=info,warn"
        })
    });

    let format = env::var("SCOPEGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = resolve_output_mode(cli.format);
    debug!(?output, "resolved output mode");

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, output),
        Commands::Summary(ref args) => cmd::summary::run_summary(args, output),
        Commands::Deps(ref args) => cmd::deps::run_deps(args, output),
    }
}
