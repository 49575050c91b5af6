//! Summary statistics for one analyzed scope graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Number of parts in the scope.
//! - **edge_count**: Dependencies before pruning.
//! - **retained_edge_count**: Dependencies left after minimum-equivalent-graph
//!   pruning.
//! - **density**: `edge_count / (node_count * (node_count - 1))`, 0.0 for
//!   graphs with fewer than two nodes.
//! - **component_count**: Weakly connected components.
//! - **scc_count**: Strongly connected components across all components.
//!   Equals `node_count` when the scope has no cycles.
//! - **cycle_count**: SCCs with more than one member.
//! - **max_in_degree** / **max_out_degree**: Highest retained in/out degree.

use serde::{Deserialize, Serialize};

use scopegraph_core::ArtifactId;

/// Summary statistics for one scope graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeStats {
    pub scope: ArtifactId,
    pub node_count: usize,
    pub edge_count: usize,
    pub retained_edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub scc_count: usize,
    pub cycle_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

impl ScopeStats {
    /// Number of dependencies removed by pruning.
    #[must_use]
    pub const fn pruned_edge_count(&self) -> usize {
        self.edge_count.saturating_sub(self.retained_edge_count)
    }

    /// Return `true` if the scope has no dependencies at all.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if the scope contains at least one dependency cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }

    /// Fraction of edges removed by pruning, 0.0 when there were none.
    #[must_use]
    pub fn reduction_ratio(&self) -> f64 {
        compute_ratio(self.edge_count, self.retained_edge_count)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
pub(crate) fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_ratio(raw: usize, reduced: usize) -> f64 {
    if raw == 0 {
        return 0.0_f64;
    }
    let removed = (raw as f64 - reduced as f64).max(0.0_f64);
    removed / raw as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
