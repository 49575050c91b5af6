#![forbid(unsafe_code)]
//! scopegraph-core library.
//!
//! Artifact hierarchy, per-run metrics store, configuration, and the error
//! taxonomy shared by the analysis engine and the CLI.
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums for domain failures, `anyhow::Result`
//!   for file loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod artifact;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod metrics;

pub use artifact::{Artifact, ArtifactId, ArtifactKind};
pub use config::{AnalysisConfig, LinesOfCodeSource};
pub use error::{AnalysisError, ErrorCode, HierarchyError, ScopePhase, Severity};
pub use hierarchy::{Hierarchy, HierarchyBuilder};
pub use input::{InputTree, Reference};
pub use metrics::{Metrics, MetricsStore};
