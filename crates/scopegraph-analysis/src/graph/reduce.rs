//! Minimum equivalent graph of a condensation.
//!
//! A cross-SCC dependency survives pruning only if the SCC-level edge it
//! crosses belongs to the transitive reduction of its component's
//! condensation. On a DAG that edge set is unique: it is the smallest set
//! with the same reachability.
//!
//! # Algorithm
//!
//! Works on SCC indices (topological positions), not on DAG node indices.
//! Positions are visited from last to first, and each one records the
//! positions it can reach in a bitset. A position's successors are taken in
//! ascending order. Anything that reaches a successor sits before it in the
//! order, so when a successor is already in the bitset it is reachable
//! through an earlier one and its edge is dropped. Otherwise the edge is
//! kept and the successor's reach is merged in.

use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;
use petgraph::visit::EdgeRef;

use super::condense::Condensation;

/// A condensation edge `from → to` (SCC indices) with `from >= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackwardEdge {
    pub from: usize,
    pub to: usize,
}

/// SCC-level edges kept by the reduction, keyed by SCC index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reduction {
    kept: BTreeSet<(usize, usize)>,
}

impl Reduction {
    /// Return `true` if the edge between SCCs `from` and `to` is needed.
    #[must_use]
    pub fn keeps(&self, from: usize, to: usize) -> bool {
        self.kept.contains(&(from, to))
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.kept.len()
    }

    /// Kept edges as `(from, to)` SCC indices, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.kept.iter().copied()
    }
}

/// Reduce `condensation` to its minimum equivalent graph.
///
/// # Errors
///
/// Returns the first [`BackwardEdge`] found if `condensation.order` is not
/// a topological order of `condensation.dag`.
pub fn minimum_equivalent_graph(condensation: &Condensation) -> Result<Reduction, BackwardEdge> {
    let n = condensation.scc_count();

    let mut position = vec![0; n];
    for (p, idx) in condensation.order.iter().enumerate() {
        position[idx.index()] = p;
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for edge in condensation.dag.edge_references() {
        let from = position[edge.source().index()];
        let to = position[edge.target().index()];
        if from >= to {
            return Err(BackwardEdge { from, to });
        }
        successors[from].push(to);
    }

    let mut reach = vec![FixedBitSet::with_capacity(n); n];
    let mut kept = BTreeSet::new();
    for from in (0..n).rev() {
        let targets = &mut successors[from];
        targets.sort_unstable();
        targets.dedup();

        let mut reached = FixedBitSet::with_capacity(n);
        for &to in &*targets {
            if reached.contains(to) {
                continue;
            }
            kept.insert((from, to));
            reached.insert(to);
            reached.union_with(&reach[to]);
        }
        reach[from] = reached;
    }

    Ok(Reduction { kept })
}
