//! Annotated output tree and derived listings.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use scopegraph_core::{AnalysisError, ArtifactId, ArtifactKind, Hierarchy, Metrics, ScopePhase};

use crate::graph::{Dependency, ScopeGraph};
use crate::pipeline::Analysis;

/// One artifact of the output tree with its metrics and scope graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedArtifact {
    pub id: ArtifactId,
    pub name: String,
    pub kind_name: String,
    pub metrics: Metrics,
    /// Retained edges of this artifact's scope graph; empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<AnnotatedArtifact>,
}

impl AnnotatedArtifact {
    /// Number of artifacts in this subtree, including itself.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.parts.iter().map(Self::count).sum::<usize>()
    }

    /// Find an artifact in this subtree by id.
    #[must_use]
    pub fn find(&self, id: &ArtifactId) -> Option<&Self> {
        if &self.id == id {
            return Some(self);
        }
        self.parts.iter().find_map(|p| p.find(id))
    }
}

/// Build the annotated tree rooted at the hierarchy's root.
///
/// # Errors
///
/// Returns [`AnalysisError::OrderingViolation`] if an artifact has no
/// metrics record, i.e. the analysis did not complete.
pub fn annotate(
    hierarchy: &Hierarchy,
    analysis: &Analysis,
) -> Result<AnnotatedArtifact, AnalysisError> {
    // Post-order: every part is finished before its scope claims it.
    let mut finished: HashMap<&ArtifactId, AnnotatedArtifact> =
        HashMap::with_capacity(hierarchy.len());

    for artifact in hierarchy.post_order() {
        let metrics = analysis.metrics.get(&artifact.id).ok_or_else(|| {
            AnalysisError::OrderingViolation {
                scope: artifact.id.clone(),
                operation: "annotate",
                required: ScopePhase::MetricsWritten,
                actual: ScopePhase::Unanalyzed,
            }
        })?;
        let parts = artifact
            .parts()
            .filter_map(|p| finished.remove(p))
            .collect();
        let dependencies = analysis
            .graph(&artifact.id)
            .map(ScopeGraph::dependencies)
            .unwrap_or_default();

        finished.insert(
            &artifact.id,
            AnnotatedArtifact {
                id: artifact.id.clone(),
                name: artifact.name.clone(),
                kind_name: artifact.kind_name().to_string(),
                metrics,
                dependencies,
                parts,
            },
        );
    }

    let root = &hierarchy.root().id;
    finished
        .remove(root)
        .ok_or_else(|| AnalysisError::UnknownArtifact { id: root.clone() })
}

/// Retained dependencies of every scope, flattened.
///
/// Edges whose endpoints do not resolve in `hierarchy` are logged and left
/// out.
#[must_use]
pub fn part_dependencies(hierarchy: &Hierarchy, analysis: &Analysis) -> Vec<Dependency> {
    analysis
        .graphs
        .values()
        .flat_map(ScopeGraph::dependencies)
        .filter(|dep| {
            let known = hierarchy.contains_id(&dep.source) && hierarchy.contains_id(&dep.target);
            if !known {
                warn!(
                    source = %dep.source,
                    target = %dep.target,
                    "skipping dependency with unresolved endpoint"
                );
            }
            known
        })
        .collect()
}

/// Size and shape of a codebase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodebaseSummary {
    pub total_lines_of_code: usize,
    pub folders: usize,
    pub files: usize,
    pub symbols: usize,
}

/// Count artifacts by kind and total the rolled-up size from the root.
#[must_use]
pub fn summarize(hierarchy: &Hierarchy) -> CodebaseSummary {
    let mut summary = CodebaseSummary {
        total_lines_of_code: hierarchy
            .rolled_up_lines_of_code()
            .get(&hierarchy.root().id)
            .copied()
            .unwrap_or(0),
        ..CodebaseSummary::default()
    };
    for artifact in hierarchy.iter() {
        match artifact.kind {
            ArtifactKind::Folder { .. } => summary.folders += 1,
            ArtifactKind::File { .. } => summary.files += 1,
            ArtifactKind::Symbol { .. } => summary.symbols += 1,
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
