//! Weighted dependency graph over the immediate parts of one scope.
//!
//! # Overview
//!
//! Every artifact that owns parts gets one [`ScopeGraph`]. Its nodes are the
//! artifact's parts, added in part order so that node indices double as the
//! parts' positions. An edge `A → B` means "part A depends on part B"; its
//! weight is the number of underlying references that were projected onto
//! this pair.
//!
//! ## Invariants
//!
//! - Edges only join nodes of this graph; unknown endpoints are rejected.
//! - No self-edges.
//! - At most one edge per ordered pair. Adding a pair again increments the
//!   existing edge's weight.
//!
//! ## Cache Invalidation
//!
//! [`ScopeGraph::content_hash`] is a BLAKE3 hash of the sorted
//! `(source, target, weight)` triples. It changes only when edges change.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use scopegraph_core::{AnalysisError, Artifact, ArtifactId};

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

/// One weighted edge of a scope graph, by artifact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub source: ArtifactId,
    pub target: ArtifactId,
    pub weight: usize,
}

// ---------------------------------------------------------------------------
// ScopeGraph
// ---------------------------------------------------------------------------

/// Directed weighted graph whose nodes are the parts of one scope.
#[derive(Debug, Clone)]
pub struct ScopeGraph {
    scope: ArtifactId,
    /// Nodes = part IDs, edge weights = reference counts.
    graph: DiGraph<ArtifactId, usize>,
    node_map: HashMap<ArtifactId, NodeIndex>,
}

impl ScopeGraph {
    /// Create an edgeless graph over `parts` (in order).
    #[must_use]
    pub fn new(scope: ArtifactId, parts: impl IntoIterator<Item = ArtifactId>) -> Self {
        let mut graph = DiGraph::<ArtifactId, usize>::new();
        let mut node_map = HashMap::new();
        for part in parts {
            if node_map.contains_key(&part) {
                continue;
            }
            let idx = graph.add_node(part.clone());
            node_map.insert(part, idx);
        }
        Self {
            scope,
            graph,
            node_map,
        }
    }

    /// Create the edgeless graph for `artifact`'s parts.
    #[must_use]
    pub fn for_artifact(artifact: &Artifact) -> Self {
        Self::new(artifact.id.clone(), artifact.parts().cloned())
    }

    /// The artifact owning this graph.
    #[must_use]
    pub const fn scope(&self) -> &ArtifactId {
        &self.scope
    }

    #[must_use]
    pub const fn graph(&self) -> &DiGraph<ArtifactId, usize> {
        &self.graph
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn node_index(&self, id: &ArtifactId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    #[must_use]
    pub fn part_id(&self, idx: NodeIndex) -> Option<&ArtifactId> {
        self.graph.node_weight(idx)
    }

    /// Record one reference from part `from` to part `to`.
    ///
    /// Returns the edge weight after the increment.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownArtifact`] if either part is not a node
    /// of this graph and [`AnalysisError::SelfDependency`] if `from == to`.
    pub fn add_dependency(
        &mut self,
        from: &ArtifactId,
        to: &ArtifactId,
    ) -> Result<usize, AnalysisError> {
        let source = self.require_node(from)?;
        let target = self.require_node(to)?;
        if source == target {
            return Err(AnalysisError::SelfDependency {
                scope: self.scope.clone(),
                id: from.clone(),
            });
        }

        if let Some(edge) = self.graph.find_edge(source, target) {
            let weight = &mut self.graph[edge];
            *weight += 1;
            return Ok(*weight);
        }

        self.graph.add_edge(source, target, 1);
        Ok(1)
    }

    /// Weight of the edge `from → to`, if present.
    #[must_use]
    pub fn weight(&self, from: &ArtifactId, to: &ArtifactId) -> Option<usize> {
        let source = self.node_index(from)?;
        let target = self.node_index(to)?;
        self.graph
            .find_edge(source, target)
            .map(|edge| self.graph[edge])
    }

    /// Remove the edge between two nodes. Returns `true` if one existed.
    pub(crate) fn remove_edge_between(&mut self, source: NodeIndex, target: NodeIndex) -> bool {
        self.graph
            .find_edge(source, target)
            .and_then(|edge| self.graph.remove_edge(edge))
            .is_some()
    }

    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// All edges, ordered by source then target part position.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut edges: Vec<(NodeIndex, NodeIndex, usize)> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect();
        edges.sort_unstable();

        edges
            .into_iter()
            .map(|(s, t, weight)| Dependency {
                source: self.graph[s].clone(),
                target: self.graph[t].clone(),
                weight,
            })
            .collect()
    }

    /// BLAKE3 hash of the sorted edge set, for cache invalidation.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut triples: Vec<(&str, &str, usize)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                    *e.weight(),
                )
            })
            .collect();
        triples.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.scope.as_str().as_bytes());
        hasher.update(b"\x00");
        for (source, target, weight) in triples {
            hasher.update(source.as_bytes());
            hasher.update(b"\x00");
            hasher.update(target.as_bytes());
            hasher.update(b"\x00");
            hasher.update(&weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    fn require_node(&self, id: &ArtifactId) -> Result<NodeIndex, AnalysisError> {
        self.node_index(id)
            .ok_or_else(|| AnalysisError::UnknownArtifact { id: id.clone() })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ArtifactId {
        ArtifactId::from(s)
    }

    fn graph(parts: &[&str]) -> ScopeGraph {
        ScopeGraph::new(id("scope"), parts.iter().map(|p| id(p)))
    }

    #[test]
    fn nodes_follow_part_order() {
        let g = graph(&["a", "b", "c"]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.node_index(&id("a")).map(NodeIndex::index), Some(0));
        assert_eq!(g.node_index(&id("c")).map(NodeIndex::index), Some(2));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_pair_increments_weight() {
        let mut g = graph(&["a", "b"]);
        assert_eq!(g.add_dependency(&id("a"), &id("b")), Ok(1));
        assert_eq!(g.add_dependency(&id("a"), &id("b")), Ok(2));
        assert_eq!(g.add_dependency(&id("a"), &id("b")), Ok(3));
        assert_eq!(g.edge_count(), 1, "no parallel edges");
        assert_eq!(g.weight(&id("a"), &id("b")), Some(3));
        assert_eq!(g.weight(&id("b"), &id("a")), None);
    }

    #[test]
    fn self_edge_rejected() {
        let mut g = graph(&["a"]);
        let err = g.add_dependency(&id("a"), &id("a")).unwrap_err();
        assert!(matches!(err, AnalysisError::SelfDependency { .. }));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut g = graph(&["a"]);
        let err = g.add_dependency(&id("a"), &id("zzz")).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownArtifact { id: id("zzz") });
    }

    #[test]
    fn degrees_count_distinct_edges() {
        let mut g = graph(&["a", "b", "c"]);
        g.add_dependency(&id("a"), &id("c")).unwrap();
        g.add_dependency(&id("a"), &id("c")).unwrap();
        g.add_dependency(&id("b"), &id("c")).unwrap();
        let c = g.node_index(&id("c")).unwrap();
        let a = g.node_index(&id("a")).unwrap();
        assert_eq!(g.in_degree(c), 2);
        assert_eq!(g.out_degree(a), 1);
    }

    #[test]
    fn remove_edge_between_nodes() {
        let mut g = graph(&["a", "b"]);
        g.add_dependency(&id("a"), &id("b")).unwrap();
        let a = g.node_index(&id("a")).unwrap();
        let b = g.node_index(&id("b")).unwrap();
        assert!(g.remove_edge_between(a, b));
        assert!(!g.remove_edge_between(a, b));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn dependencies_sorted_by_position() {
        let mut g = graph(&["a", "b", "c"]);
        g.add_dependency(&id("c"), &id("a")).unwrap();
        g.add_dependency(&id("a"), &id("b")).unwrap();
        let deps = g.dependencies();
        assert_eq!(deps[0].source, id("a"));
        assert_eq!(deps[1].source, id("c"));
    }

    #[test]
    fn content_hash_changes_with_weight() {
        let mut g = graph(&["a", "b"]);
        let empty = g.content_hash();
        g.add_dependency(&id("a"), &id("b")).unwrap();
        let one = g.content_hash();
        g.add_dependency(&id("a"), &id("b")).unwrap();
        let two = g.content_hash();
        assert!(empty.starts_with("blake3:"));
        assert_ne!(empty, one);
        assert_ne!(one, two);
    }
}
