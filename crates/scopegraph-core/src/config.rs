use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "scopegraph.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analyze independent scope graphs on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub lines_of_code: LinesOfCodeSource,
    /// Treat any skipped reference as a failed run at the CLI boundary.
    #[serde(default)]
    pub fail_on_skipped: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
            lines_of_code: LinesOfCodeSource::default(),
            fail_on_skipped: false,
        }
    }
}

/// Where an artifact's `linesOfCode` metric comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinesOfCodeSource {
    /// The artifact's own intrinsic size, zero when absent.
    #[default]
    Intrinsic,
    /// Own size when present, otherwise the sum over the artifact's parts.
    RollUp,
}

/// Load configuration from `path`, or from `./scopegraph.toml` when `None`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Apply `SCOPEGRAPH_PARALLEL` on top of a loaded config.
#[must_use]
pub fn apply_env_overrides(mut config: AnalysisConfig) -> AnalysisConfig {
    if let Some(parallel) = env::var("SCOPEGRAPH_PARALLEL")
        .ok()
        .as_deref()
        .and_then(parse_flag)
    {
        config.parallel = parallel;
    }
    config
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(Some(&dir.path().join("absent.toml"))).expect("load");
        assert_eq!(config, AnalysisConfig::default());
        assert!(config.parallel);
        assert_eq!(config.lines_of_code, LinesOfCodeSource::Intrinsic);
    }

    #[test]
    fn parses_all_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scopegraph.toml");
        std::fs::write(
            &path,
            "parallel = false\nlines_of_code = \"roll-up\"\nfail_on_skipped = true\n",
        )
        .expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert!(!config.parallel);
        assert_eq!(config.lines_of_code, LinesOfCodeSource::RollUp);
        assert!(config.fail_on_skipped);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scopegraph.toml");
        std::fs::write(&path, "fail_on_skipped = true\n").expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert!(config.parallel);
        assert!(config.fail_on_skipped);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scopegraph.toml");
        std::fs::write(&path, "lines_of_code = \"sometimes\"\n").expect("write");

        let err = load_config(Some(&path)).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" Off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
