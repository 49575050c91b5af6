//! Weakly connected components of a scope graph.
//!
//! Edge direction and weight play no part here: two nodes share a component
//! iff they are linked by a chain of edges in either direction. The result
//! partitions the node set.

use petgraph::{
    graph::{DiGraph, NodeIndex},
    unionfind::UnionFind,
    visit::EdgeRef,
};

/// Partition `graph`'s nodes into weakly connected components.
///
/// Components are listed in discovery order (by their lowest node index) and
/// each component's members are in ascending node-index order, so the output
/// is deterministic for a given graph.
#[must_use]
pub fn find_components<N, E>(graph: &DiGraph<N, E>) -> Vec<Vec<NodeIndex>> {
    let n = graph.node_count();
    let mut sets = UnionFind::<usize>::new(n);
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    // Map each representative to its component slot in first-seen order.
    let mut slot_of_rep: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();

    for idx in graph.node_indices() {
        let rep = sets.find(idx.index());
        let slot = *slot_of_rep[rep].get_or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(idx);
    }

    components
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
