//! Whole-run orchestration.
//!
//! A run builds one empty [`ScopeGraph`] per scope, projects every reference
//! onto them, and only then analyzes each graph. After projection no scope
//! reads another scope's graph, so graphs are processed on the rayon pool
//! when [`AnalysisConfig::parallel`] is set. The only shared state is the
//! run's [`MetricsStore`], and every part is written by exactly one scope.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use scopegraph_core::{
    AnalysisConfig, AnalysisError, ArtifactId, Hierarchy, LinesOfCodeSource, Metrics,
    MetricsStore, Reference, ScopePhase,
};

use crate::analyze::ScopeAnalysis;
use crate::graph::{ScopeGraph, ScopeStats};
use crate::resolve::{SkippedReference, project_references};

/// Everything produced by one run.
#[derive(Debug)]
pub struct Analysis {
    /// Pruned graph of every scope, keyed by scope id.
    pub graphs: BTreeMap<ArtifactId, ScopeGraph>,
    pub metrics: MetricsStore,
    pub report: RunReport,
}

impl Analysis {
    #[must_use]
    pub fn graph(&self, scope: &ArtifactId) -> Option<&ScopeGraph> {
        self.graphs.get(scope)
    }
}

/// Warnings and statistics of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub artifact_count: usize,
    pub reference_count: usize,
    /// References that were not projected (recoverable errors).
    pub skipped: Vec<SkippedReference>,
    /// Per-scope statistics, ordered by scope id.
    pub scopes: Vec<ScopeStats>,
    /// BLAKE3 hash over every scope's retained edge set.
    pub content_hash: String,
}

impl RunReport {
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    #[must_use]
    pub fn projected_reference_count(&self) -> usize {
        self.reference_count.saturating_sub(self.skipped.len())
    }

    #[must_use]
    pub fn retained_edge_count(&self) -> usize {
        self.scopes.iter().map(|s| s.retained_edge_count).sum()
    }

    #[must_use]
    pub fn pruned_edge_count(&self) -> usize {
        self.scopes.iter().map(ScopeStats::pruned_edge_count).sum()
    }

    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.scopes.iter().map(|s| s.cycle_count).sum()
    }
}

/// Analyze `hierarchy` with the given references.
///
/// Recoverable reference problems are collected in the report. The result
/// carries a [`Metrics`] record for every artifact in the hierarchy.
///
/// # Errors
///
/// Returns the first fatal [`AnalysisError`] raised by any scope.
#[instrument(skip_all, fields(artifacts = hierarchy.len(), references = references.len()))]
pub fn analyze(
    hierarchy: &Hierarchy,
    references: &[Reference],
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let mut graphs: BTreeMap<ArtifactId, ScopeGraph> = hierarchy
        .scopes()
        .map(|a| (a.id.clone(), ScopeGraph::for_artifact(a)))
        .collect();

    let skipped = project_references(hierarchy, references, &mut graphs);

    let table = lines_of_code_table(hierarchy, config.lines_of_code);
    let lines_of_code = |id: &ArtifactId| table.get(id).copied().unwrap_or(0);
    let metrics = MetricsStore::new();

    let results: Vec<Result<ScopeStats, AnalysisError>> = if config.parallel {
        graphs
            .par_iter_mut()
            .map(|(_, graph)| ScopeAnalysis::new(graph, lines_of_code).run(&metrics))
            .collect()
    } else {
        graphs
            .iter_mut()
            .map(|(_, graph)| ScopeAnalysis::new(graph, lines_of_code).run(&metrics))
            .collect()
    };
    let mut scopes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    scopes.sort_by(|a, b| a.scope.cmp(&b.scope));

    let root = hierarchy.root();
    metrics.insert(
        root.id.clone(),
        Metrics {
            lines_of_code: lines_of_code(&root.id),
            ..Metrics::default()
        },
    );

    if let Some(missing) = hierarchy.iter().find(|a| !metrics.contains(&a.id)) {
        return Err(AnalysisError::OrderingViolation {
            scope: missing.scope.clone().unwrap_or_else(|| missing.id.clone()),
            operation: "analyze",
            required: ScopePhase::MetricsWritten,
            actual: ScopePhase::Unanalyzed,
        });
    }

    let report = RunReport {
        artifact_count: hierarchy.len(),
        reference_count: references.len(),
        skipped,
        scopes,
        content_hash: run_content_hash(&graphs),
    };

    info!(
        scopes = report.scopes.len(),
        skipped = report.skipped.len(),
        retained = report.retained_edge_count(),
        pruned = report.pruned_edge_count(),
        "analysis complete"
    );

    Ok(Analysis {
        graphs,
        metrics,
        report,
    })
}

/// `linesOfCode` of every artifact under the configured source.
fn lines_of_code_table(
    hierarchy: &Hierarchy,
    source: LinesOfCodeSource,
) -> HashMap<ArtifactId, usize> {
    match source {
        LinesOfCodeSource::Intrinsic => hierarchy
            .iter()
            .map(|a| (a.id.clone(), a.lines_of_code()))
            .collect(),
        LinesOfCodeSource::RollUp => hierarchy.rolled_up_lines_of_code(),
    }
}

fn run_content_hash(graphs: &BTreeMap<ArtifactId, ScopeGraph>) -> String {
    let mut hasher = blake3::Hasher::new();
    for graph in graphs.values() {
        hasher.update(graph.content_hash().as_bytes());
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
