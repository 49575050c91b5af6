//! Per-scope analysis passes and the metrics writer.
//!
//! # Phases
//!
//! ```text
//! Unanalyzed ─find_components→ ComponentsFound ─assign_sccs→ SccsAssigned
//!            ─prune→ Pruned ─write_metrics→ MetricsWritten
//! ```
//!
//! Each pass checks the phase it requires and fails with
//! [`AnalysisError::OrderingViolation`] if the previous pass has not run.
//! Values computed by a pass are held on the [`ScopeAnalysis`] until
//! [`ScopeAnalysis::write_metrics`] commits one whole [`Metrics`] record per
//! part to the store.

#![allow(clippy::module_name_repetitions)]

use std::cmp::Reverse;

use petgraph::{graph::NodeIndex, visit::EdgeRef};
use tracing::debug;

use scopegraph_core::{AnalysisError, ArtifactId, Metrics, MetricsStore, ScopePhase};

use crate::graph::{
    Condensation, ScopeGraph, ScopeStats, find_components, minimum_equivalent_graph,
    stats::compute_density,
};

/// Values collected for one part before its record is written.
#[derive(Debug, Clone, Copy, Default)]
struct Pending {
    lines_of_code: usize,
    component: Option<usize>,
    component_rank: Option<usize>,
    scc_index: Option<usize>,
    is_in_a_cycle: Option<bool>,
}

/// Drives one [`ScopeGraph`] through the analysis passes.
#[derive(Debug)]
pub struct ScopeAnalysis<'g> {
    graph: &'g mut ScopeGraph,
    phase: ScopePhase,
    pending: Vec<Pending>,
    components: Vec<Vec<NodeIndex>>,
    condensations: Vec<Condensation>,
    original_edge_count: usize,
}

impl<'g> ScopeAnalysis<'g> {
    /// Start analyzing `graph`. `lines_of_code` supplies each part's size.
    pub fn new(graph: &'g mut ScopeGraph, lines_of_code: impl Fn(&ArtifactId) -> usize) -> Self {
        let pending = graph
            .graph()
            .node_weights()
            .map(|id| Pending {
                lines_of_code: lines_of_code(id),
                ..Pending::default()
            })
            .collect();
        let original_edge_count = graph.edge_count();
        Self {
            graph,
            phase: ScopePhase::Unanalyzed,
            pending,
            components: Vec::new(),
            condensations: Vec::new(),
            original_edge_count,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ScopePhase {
        self.phase
    }

    #[must_use]
    pub fn graph(&self) -> &ScopeGraph {
        &*self.graph
    }

    /// Weakly connected components, in discovery order.
    #[must_use]
    pub fn components(&self) -> &[Vec<NodeIndex>] {
        &self.components
    }

    /// Condensations, parallel to [`Self::components`].
    #[must_use]
    pub fn condensations(&self) -> &[Condensation] {
        &self.condensations
    }

    /// Partition the parts into components and rank them by total size.
    ///
    /// Ranks are assigned in descending order of summed lines of code; equal
    /// totals keep discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OrderingViolation`] unless the scope is
    /// [`ScopePhase::Unanalyzed`].
    pub fn find_components(&mut self) -> Result<(), AnalysisError> {
        self.require("find_components", ScopePhase::Unanalyzed)?;

        let components = find_components(self.graph.graph());
        let totals: Vec<usize> = components
            .iter()
            .map(|members| {
                members
                    .iter()
                    .map(|n| self.pending[n.index()].lines_of_code)
                    .sum()
            })
            .collect();

        let mut ranking: Vec<usize> = (0..components.len()).collect();
        ranking.sort_by_key(|&c| Reverse(totals[c]));

        for (rank, &c) in ranking.iter().enumerate() {
            for member in &components[c] {
                let entry = &mut self.pending[member.index()];
                entry.component = Some(c);
                entry.component_rank = Some(rank);
            }
        }

        debug!(
            scope = %self.graph.scope(),
            components = components.len(),
            "found components"
        );
        self.components = components;
        self.phase = ScopePhase::ComponentsFound;
        Ok(())
    }

    /// Condense each component and assign topological SCC indices.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OrderingViolation`] unless components have
    /// been found.
    pub fn assign_sccs(&mut self) -> Result<(), AnalysisError> {
        self.require("assign_sccs", ScopePhase::ComponentsFound)?;

        let condensations: Vec<Condensation> = self
            .components
            .iter()
            .map(|members| Condensation::build(self.graph.graph(), members))
            .collect();

        for condensation in &condensations {
            for (position, scc) in condensation.sccs_in_order().enumerate() {
                for member in &scc.members {
                    let entry = &mut self.pending[member.index()];
                    entry.scc_index = Some(position);
                    entry.is_in_a_cycle = Some(scc.is_cycle());
                }
            }
        }

        debug!(
            scope = %self.graph.scope(),
            sccs = condensations.iter().map(Condensation::scc_count).sum::<usize>(),
            "assigned scc indices"
        );
        self.condensations = condensations;
        self.phase = ScopePhase::SccsAssigned;
        Ok(())
    }

    /// Remove every cross-SCC edge whose SCC-level edge is redundant.
    ///
    /// Edges inside one SCC are always kept. Returns the number of edges
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OrderingViolation`] unless SCC indices have
    /// been assigned, and [`AnalysisError::NotAcyclic`] if a condensation's
    /// SCC order is not topological.
    pub fn prune(&mut self) -> Result<usize, AnalysisError> {
        self.require("prune", ScopePhase::SccsAssigned)?;

        let reduced = self
            .condensations
            .iter()
            .map(minimum_equivalent_graph)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AnalysisError::NotAcyclic {
                scope: self.graph.scope().clone(),
            })?;

        let edges: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .graph()
            .edge_references()
            .map(|e| (e.source(), e.target()))
            .collect();

        let mut redundant = Vec::new();
        for (source, target) in edges {
            let (component, source_scc) = self.assigned_scc(source, "prune")?;
            let (_, target_scc) = self.assigned_scc(target, "prune")?;
            if source_scc == target_scc {
                continue;
            }
            if !reduced[component].keeps(source_scc, target_scc) {
                redundant.push((source, target));
            }
        }

        let removed = redundant
            .into_iter()
            .filter(|&(s, t)| self.graph.remove_edge_between(s, t))
            .count();

        debug!(scope = %self.graph.scope(), removed, "pruned redundant edges");
        self.phase = ScopePhase::Pruned;
        Ok(removed)
    }

    /// Count retained in/out edges and commit one record per part.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OrderingViolation`] unless the graph has been
    /// pruned.
    pub fn write_metrics(&mut self, store: &MetricsStore) -> Result<ScopeStats, AnalysisError> {
        self.require("write_metrics", ScopePhase::Pruned)?;

        let mut records = Vec::with_capacity(self.pending.len());
        for (i, entry) in self.pending.iter().enumerate() {
            let node = NodeIndex::new(i);
            let id = self
                .graph
                .part_id(node)
                .cloned()
                .ok_or_else(|| AnalysisError::UnknownArtifact {
                    id: self.graph.scope().clone(),
                })?;
            let (Some(component_rank), Some(scc_index), Some(is_in_a_cycle)) =
                (entry.component_rank, entry.scc_index, entry.is_in_a_cycle)
            else {
                return Err(self.violation("write_metrics", ScopePhase::SccsAssigned));
            };
            records.push((
                id,
                Metrics {
                    lines_of_code: entry.lines_of_code,
                    component_rank,
                    scc_index_topologically_sorted: scc_index,
                    is_in_a_cycle,
                    ingoing_dependencies_in_scope: self.graph.in_degree(node),
                    outgoing_dependencies_in_scope: self.graph.out_degree(node),
                },
            ));
        }

        let stats = self.stats(&records);
        for (id, metrics) in records {
            store.insert(id, metrics);
        }

        self.phase = ScopePhase::MetricsWritten;
        Ok(stats)
    }

    /// Run every pass in order.
    ///
    /// # Errors
    ///
    /// Propagates the first error from any pass.
    pub fn run(mut self, store: &MetricsStore) -> Result<ScopeStats, AnalysisError> {
        self.find_components()?;
        self.assign_sccs()?;
        self.prune()?;
        self.write_metrics(store)
    }

    fn stats(&self, records: &[(ArtifactId, Metrics)]) -> ScopeStats {
        let node_count = self.graph.node_count();
        ScopeStats {
            scope: self.graph.scope().clone(),
            node_count,
            edge_count: self.original_edge_count,
            retained_edge_count: self.graph.edge_count(),
            density: compute_density(node_count, self.original_edge_count),
            component_count: self.components.len(),
            scc_count: self
                .condensations
                .iter()
                .map(Condensation::scc_count)
                .sum(),
            cycle_count: self
                .condensations
                .iter()
                .map(Condensation::cycle_count)
                .sum(),
            max_in_degree: records
                .iter()
                .map(|(_, m)| m.ingoing_dependencies_in_scope)
                .max()
                .unwrap_or(0),
            max_out_degree: records
                .iter()
                .map(|(_, m)| m.outgoing_dependencies_in_scope)
                .max()
                .unwrap_or(0),
        }
    }

    /// Component and SCC index of a node; unset values are an ordering bug.
    fn assigned_scc(
        &self,
        node: NodeIndex,
        operation: &'static str,
    ) -> Result<(usize, usize), AnalysisError> {
        let entry = self.pending.get(node.index()).copied().unwrap_or_default();
        match (entry.component, entry.scc_index) {
            (Some(component), Some(scc)) => Ok((component, scc)),
            _ => Err(self.violation(operation, ScopePhase::SccsAssigned)),
        }
    }

    fn require(&self, operation: &'static str, required: ScopePhase) -> Result<(), AnalysisError> {
        if self.phase == required {
            Ok(())
        } else {
            Err(self.violation(operation, required))
        }
    }

    fn violation(&self, operation: &'static str, required: ScopePhase) -> AnalysisError {
        AnalysisError::OrderingViolation {
            scope: self.graph.scope().clone(),
            operation,
            required,
            actual: self.phase,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
