//! `scopegraph summary`: size and shape of an input tree.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use scopegraph_analysis::{CodebaseSummary, summarize};

use crate::cmd::load_input;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `scopegraph summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Input tree (JSON).
    pub input: PathBuf,
}

/// Execute `scopegraph summary`.
pub fn run_summary(args: &SummaryArgs, output: OutputMode) -> anyhow::Result<()> {
    let (hierarchy, _) = load_input(&args.input, output)?;
    let summary = summarize(&hierarchy);
    render_mode(output, &summary, render_text, render_pretty)
}

fn render_text(summary: &CodebaseSummary, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "loc={} folders={} files={} symbols={}",
        summary.total_lines_of_code, summary.folders, summary.files, summary.symbols
    )
}

fn render_pretty(summary: &CodebaseSummary, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Codebase")?;
    pretty_kv(w, "lines", summary.total_lines_of_code.to_string())?;
    pretty_kv(w, "folders", summary.folders.to_string())?;
    pretty_kv(w, "files", summary.files.to_string())?;
    pretty_kv(w, "symbols", summary.symbols.to_string())
}
