//! SCC condensation of one component, with a deterministic topological order.
//!
//! # Overview
//!
//! A component may contain cycles. Collapsing each strongly connected
//! component (SCC) into one node yields the condensation graph, which is
//! always a DAG. Every step that assumes acyclicity (ordering, reduction)
//! runs on the condensation, never on the raw scope graph.
//!
//! # Ordering
//!
//! Condensation nodes are sorted by their number of ancestors (nodes that can
//! reach them). If `A → B` then `B` has strictly more ancestors than `A`, so
//! the sort is a valid topological order. Equal ancestor counts are broken by
//! the lowest scope-graph node index among the SCC's members, i.e. by part
//! position, which makes the order fully deterministic.

use std::collections::HashMap;

use petgraph::{
    algo::condensation,
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, EdgeRef, Reversed},
};

// ---------------------------------------------------------------------------
// SccNode
// ---------------------------------------------------------------------------

/// A node of the condensation graph: one SCC of the scope graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccNode {
    /// Scope-graph node indices in this SCC (sorted ascending).
    pub members: Vec<NodeIndex>,
}

impl SccNode {
    /// Return `true` if this SCC contains more than one node (i.e., a cycle).
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.members.len() > 1
    }

    /// Lowest member index; used as the ordering tie-break.
    #[must_use]
    pub fn representative(&self) -> Option<NodeIndex> {
        self.members.first().copied()
    }
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// Condensation DAG of one component plus its topological sequence.
#[derive(Debug, Clone)]
pub struct Condensation {
    /// DAG whose nodes are SCCs; `a → b` iff some scope-graph edge crosses
    /// from a member of `a` to a member of `b`.
    pub dag: DiGraph<SccNode, ()>,
    /// DAG node indices in topological sequence; the position is the SCC index.
    pub order: Vec<NodeIndex>,
    /// Number of ancestors per DAG node, parallel to `dag`'s node indices.
    pub ancestor_counts: Vec<usize>,
    scc_index: HashMap<NodeIndex, usize>,
}

impl Condensation {
    /// Condense the subgraph of `graph` induced by `component`.
    ///
    /// `component` must be a union of weakly connected components of `graph`
    /// (edges leaving it are ignored).
    #[must_use]
    pub fn build<N, E>(graph: &DiGraph<N, E>, component: &[NodeIndex]) -> Self {
        // Subgraph whose node weights are the original indices.
        let mut sub: DiGraph<NodeIndex, ()> = DiGraph::with_capacity(component.len(), 0);
        let mut local: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(component.len());
        for &original in component {
            local.insert(original, sub.add_node(original));
        }
        for &original in component {
            for edge in graph.edges(original) {
                if let Some(&target) = local.get(&edge.target()) {
                    sub.add_edge(local[&original], target, ());
                }
            }
        }

        // make_acyclic=true drops intra-SCC edges and parallel edges.
        let dag: DiGraph<SccNode, ()> = condensation(sub, true).map(
            |_, members| {
                let mut sorted = members.clone();
                sorted.sort_unstable();
                SccNode { members: sorted }
            },
            |_, _| (),
        );

        let ancestor_counts = count_ancestors(&dag);

        let mut order: Vec<NodeIndex> = dag.node_indices().collect();
        order.sort_by_key(|&idx| (ancestor_counts[idx.index()], dag[idx].representative()));

        let mut scc_index = HashMap::with_capacity(component.len());
        for (position, &idx) in order.iter().enumerate() {
            for &member in &dag[idx].members {
                scc_index.insert(member, position);
            }
        }

        Self {
            dag,
            order,
            ancestor_counts,
            scc_index,
        }
    }

    /// Number of SCCs.
    #[must_use]
    pub fn scc_count(&self) -> usize {
        self.dag.node_count()
    }

    /// Number of SCCs with more than one member.
    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.dag.node_weights().filter(|n| n.is_cycle()).count()
    }

    /// Topological SCC index of a scope-graph node.
    #[must_use]
    pub fn scc_index_of(&self, node: NodeIndex) -> Option<usize> {
        self.scc_index.get(&node).copied()
    }

    /// SCCs in topological sequence.
    pub fn sccs_in_order(&self) -> impl Iterator<Item = &SccNode> {
        self.order.iter().map(|&idx| &self.dag[idx])
    }
}

/// For every node, count the distinct nodes that can reach it.
fn count_ancestors<N, E>(dag: &DiGraph<N, E>) -> Vec<usize> {
    let reversed = Reversed(dag);
    dag.node_indices()
        .map(|start| {
            let mut dfs = Dfs::new(reversed, start);
            let mut count = 0;
            while let Some(visited) = dfs.next(reversed) {
                if visited != start {
                    count += 1;
                }
            }
            count
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> (DiGraph<usize, ()>, Vec<NodeIndex>) {
        let mut g = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..n).map(|i| g.add_node(i)).collect();
        for &(a, b) in edges {
            g.add_edge(nodes[a], nodes[b], ());
        }
        (g, nodes)
    }

    #[test]
    fn chain_orders_by_ancestors() {
        // 2 → 1 → 0: node 2 has no ancestors, so it comes first.
        let (g, n) = graph(3, &[(2, 1), (1, 0)]);
        let c = Condensation::build(&g, &n);
        assert_eq!(c.scc_count(), 3);
        assert_eq!(c.cycle_count(), 0);
        assert_eq!(c.scc_index_of(n[2]), Some(0));
        assert_eq!(c.scc_index_of(n[1]), Some(1));
        assert_eq!(c.scc_index_of(n[0]), Some(2));
    }

    #[test]
    fn cycle_collapses_to_one_scc() {
        // A→B, B→C, C→A, D→A
        let (g, n) = graph(4, &[(0, 1), (1, 2), (2, 0), (3, 0)]);
        let c = Condensation::build(&g, &n);

        assert_eq!(c.scc_count(), 2);
        assert_eq!(c.cycle_count(), 1);
        assert_eq!(c.dag.edge_count(), 1, "only D → {{A,B,C}}");

        // D has no ancestors and precedes the cycle.
        assert_eq!(c.scc_index_of(n[3]), Some(0));
        for &member in &n[..3] {
            assert_eq!(c.scc_index_of(member), Some(1));
        }

        let first = c.sccs_in_order().next().expect("one scc");
        assert_eq!(first.members, vec![n[3]]);
        assert!(!first.is_cycle());
    }

    #[test]
    fn ties_break_by_lowest_member() {
        // Two sources (1 and 0) both feeding 2: equal ancestor counts.
        let (g, n) = graph(3, &[(1, 2), (0, 2)]);
        let c = Condensation::build(&g, &n);
        assert_eq!(c.scc_index_of(n[0]), Some(0));
        assert_eq!(c.scc_index_of(n[1]), Some(1));
        assert_eq!(c.scc_index_of(n[2]), Some(2));
    }

    #[test]
    fn parallel_crossings_give_one_dag_edge() {
        // {0,1} cycle, both members point at 2.
        let (g, n) = graph(3, &[(0, 1), (1, 0), (0, 2), (1, 2)]);
        let c = Condensation::build(&g, &n);
        assert_eq!(c.scc_count(), 2);
        assert_eq!(c.dag.edge_count(), 1);
    }

    #[test]
    fn order_is_topological() {
        let (g, n) = graph(6, &[(0, 1), (1, 2), (0, 3), (3, 2), (4, 5), (5, 4), (2, 4)]);
        let c = Condensation::build(&g, &n);
        for edge in c.dag.edge_references() {
            let from = c.order.iter().position(|&i| i == edge.source());
            let to = c.order.iter().position(|&i| i == edge.target());
            assert!(from < to, "edge must point forward in the order");
        }
    }

    #[test]
    fn ancestor_counts_are_transitive() {
        let (g, n) = graph(3, &[(0, 1), (1, 2)]);
        let c = Condensation::build(&g, &n);
        let mut counts: Vec<usize> = c
            .order
            .iter()
            .map(|idx| c.ancestor_counts[idx.index()])
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![0, 1, 2]);
    }
}
