pub mod analyze;
pub mod deps;
pub mod summary;

use std::path::{Path, PathBuf};

use anyhow::Context;
use scopegraph_core::{AnalysisConfig, ErrorCode, Hierarchy, InputTree, Reference, config};

use crate::output::{CliError, OutputMode, render_error};

/// Read an input tree and build its hierarchy.
///
/// Parse and hierarchy errors are rendered with their code before failing.
pub fn load_input(path: &Path, output: OutputMode) -> anyhow::Result<(Hierarchy, Vec<Reference>)> {
    let tree = match InputTree::load(path) {
        Ok(tree) => tree,
        Err(err) => {
            render_error(
                output,
                &CliError::with_code(format!("{err:#}"), ErrorCode::InputParseError),
            )?;
            return Err(err);
        }
    };
    match tree.into_hierarchy() {
        Ok(loaded) => Ok(loaded),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Err(err).with_context(|| format!("invalid artifact tree in {}", path.display()))
        }
    }
}

/// Load the analysis config and apply environment overrides.
pub fn load_config(path: Option<&PathBuf>, output: OutputMode) -> anyhow::Result<AnalysisConfig> {
    match config::load_config(path.map(PathBuf::as_path)) {
        Ok(loaded) => Ok(config::apply_env_overrides(loaded)),
        Err(err) => {
            render_error(
                output,
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            Err(err)
        }
    }
}
