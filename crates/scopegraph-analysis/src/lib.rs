#![forbid(unsafe_code)]
//! scopegraph-analysis library.
//!
//! Builds a dependency graph for every scope of an artifact hierarchy,
//! projects symbol references onto those graphs, and annotates every
//! artifact with component, SCC, cycle and in-scope degree metrics.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`scopegraph_core::AnalysisError`]; recoverable
//!   reference problems are collected, never returned.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analyze;
pub mod export;
pub mod graph;
pub mod pipeline;
pub mod resolve;

pub use analyze::ScopeAnalysis;
pub use export::{AnnotatedArtifact, CodebaseSummary, annotate, part_dependencies, summarize};
pub use graph::{Dependency, ScopeGraph, ScopeStats};
pub use pipeline::{Analysis, RunReport, analyze};
pub use resolve::{Placement, SkippedReference, place, project_references};
