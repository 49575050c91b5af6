//! `scopegraph deps`: retained dependencies of one scope.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use scopegraph_analysis::{Dependency, ScopeStats, analyze};
use scopegraph_core::ArtifactId;

use crate::cmd::{load_config, load_input};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `scopegraph deps`.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Input tree (JSON).
    pub input: PathBuf,

    /// Artifact whose scope graph to list.
    pub scope: String,

    /// Config file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DepsOutput {
    scope: ArtifactId,
    dependencies: Vec<Dependency>,
    stats: Option<ScopeStats>,
}

/// Execute `scopegraph deps`.
pub fn run_deps(args: &DepsArgs, output: OutputMode) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref(), output)?;
    let (hierarchy, references) = load_input(&args.input, output)?;
    let scope = ArtifactId::new(args.scope.as_str());

    if !hierarchy.contains_id(&scope) {
        render_error(
            output,
            &CliError::new(format!("artifact '{scope}' not found in input tree")),
        )?;
        anyhow::bail!("unknown artifact {scope}");
    }

    let analysis = analyze(&hierarchy, &references, &config)?;
    let dependencies = analysis
        .graph(&scope)
        .map(scopegraph_analysis::ScopeGraph::dependencies)
        .unwrap_or_default();
    let stats = analysis
        .report
        .scopes
        .iter()
        .find(|s| s.scope == scope)
        .cloned();

    let payload = DepsOutput {
        scope,
        dependencies,
        stats,
    };
    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(payload: &DepsOutput, w: &mut dyn Write) -> io::Result<()> {
    for dep in &payload.dependencies {
        writeln!(w, "{}  {}  {}", dep.source, dep.target, dep.weight)?;
    }
    Ok(())
}

fn render_pretty(payload: &DepsOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Dependencies in {}", payload.scope))?;
    if payload.dependencies.is_empty() {
        writeln!(w, "(none)")?;
    }
    for dep in &payload.dependencies {
        writeln!(w, "  {} -> {} ×{}", dep.source, dep.target, dep.weight)?;
    }
    if let Some(stats) = &payload.stats {
        writeln!(w)?;
        pretty_kv(w, "parts", stats.node_count.to_string())?;
        pretty_kv(w, "components", stats.component_count.to_string())?;
        pretty_kv(w, "cycles", stats.cycle_count.to_string())?;
        pretty_kv(
            w,
            "pruned",
            format!("{} of {}", stats.pruned_edge_count(), stats.edge_count),
        )?;
    }
    Ok(())
}
