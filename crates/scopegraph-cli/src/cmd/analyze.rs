//! `scopegraph analyze`: run the full pipeline and print the annotated tree.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use scopegraph_analysis::{AnnotatedArtifact, RunReport, annotate, analyze};

use crate::cmd::{load_config, load_input};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `scopegraph analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input tree (JSON).
    pub input: PathBuf,

    /// Config file (TOML). Defaults to ./scopegraph.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Process scopes on a single thread.
    #[arg(long)]
    pub sequential: bool,

    /// Exit non-zero if any reference was skipped.
    #[arg(long)]
    pub fail_on_skipped: bool,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    tree: AnnotatedArtifact,
    report: RunReport,
}

/// Execute `scopegraph analyze`.
pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_ref(), output)?;
    if args.sequential {
        config.parallel = false;
    }
    config.fail_on_skipped |= args.fail_on_skipped;

    let (hierarchy, references) = load_input(&args.input, output)?;
    let analysis = match analyze(&hierarchy, &references, &config) {
        Ok(analysis) => analysis,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };
    let tree = annotate(&hierarchy, &analysis)?;

    info!(
        input = %args.input.display(),
        skipped = analysis.report.skipped.len(),
        "analyzed input tree"
    );

    let payload = AnalyzeOutput {
        tree,
        report: analysis.report,
    };
    render_mode(output, &payload, render_text, render_pretty)?;

    if config.fail_on_skipped && payload.report.has_skipped() {
        anyhow::bail!(
            "{} reference(s) skipped and fail_on_skipped is set",
            payload.report.skipped.len()
        );
    }
    Ok(())
}

fn render_text(payload: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "id  kind  loc  rank  scc  cycle  in  out")?;
    write_rows(&payload.tree, w)?;
    for skipped in &payload.report.skipped {
        writeln!(
            w,
            "skipped  {}  {} -> {}",
            skipped.code, skipped.source, skipped.target
        )?;
    }
    Ok(())
}

fn write_rows(node: &AnnotatedArtifact, w: &mut dyn Write) -> io::Result<()> {
    let m = &node.metrics;
    writeln!(
        w,
        "{}  {}  {}  {}  {}  {}  {}  {}",
        node.id,
        node.kind_name,
        m.lines_of_code,
        m.component_rank,
        m.scc_index_topologically_sorted,
        m.is_in_a_cycle,
        m.ingoing_dependencies_in_scope,
        m.outgoing_dependencies_in_scope
    )?;
    for part in &node.parts {
        write_rows(part, w)?;
    }
    Ok(())
}

fn render_pretty(payload: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    let report = &payload.report;
    pretty_section(w, "Analysis")?;
    pretty_kv(w, "artifacts", report.artifact_count.to_string())?;
    pretty_kv(
        w,
        "references",
        format!(
            "{} ({} projected)",
            report.reference_count,
            report.projected_reference_count()
        ),
    )?;
    pretty_kv(w, "scopes", report.scopes.len().to_string())?;
    pretty_kv(w, "edges", report.retained_edge_count().to_string())?;
    pretty_kv(w, "pruned", report.pruned_edge_count().to_string())?;
    pretty_kv(w, "cycles", report.cycle_count().to_string())?;
    pretty_kv(w, "hash", &report.content_hash)?;

    writeln!(w)?;
    pretty_section(w, "Tree")?;
    write_tree(&payload.tree, 0, w)?;

    if !report.skipped.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Skipped references")?;
        for skipped in &report.skipped {
            writeln!(
                w,
                "  [{}] {} -> {}: {}",
                skipped.code, skipped.source, skipped.target, skipped.reason
            )?;
        }
    }
    Ok(())
}

fn write_tree(node: &AnnotatedArtifact, depth: usize, w: &mut dyn Write) -> io::Result<()> {
    let m = &node.metrics;
    let cycle = if m.is_in_a_cycle { "  ↻" } else { "" };
    writeln!(
        w,
        "{:indent$}{} ({}) loc={} rank={} scc={} in={} out={}{cycle}",
        "",
        node.name,
        node.kind_name,
        m.lines_of_code,
        m.component_rank,
        m.scc_index_topologically_sorted,
        m.ingoing_dependencies_in_scope,
        m.outgoing_dependencies_in_scope,
        indent = depth * 2
    )?;
    for dep in &node.dependencies {
        writeln!(
            w,
            "{:indent$}· {} -> {} ×{}",
            "",
            dep.source,
            dep.target,
            dep.weight,
            indent = depth * 2 + 2
        )?;
    }
    for part in &node.parts {
        write_tree(part, depth + 1, w)?;
    }
    Ok(())
}
