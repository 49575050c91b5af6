//! Scope-level dependency graphs and the algorithms that annotate them.
//!
//! # Overview
//!
//! Each artifact that owns parts has a [`ScopeGraph`] over those parts. Once
//! cross-scope references have been projected onto it, the graph is run
//! through the per-scope pipeline:
//!
//! ```text
//! ScopeGraph (weighted, may contain cycles)
//!        ↓  components::find_components()
//! weakly connected components (partition of the parts)
//!        ↓  condense::Condensation::build()      (per component)
//! condensation DAG + topological SCC order
//!        ↓  reduce::minimum_equivalent_graph()
//! minimum equivalent DAG over SCC indices
//!        ↓  crate::analyze::ScopeAnalysis::prune()
//! ScopeGraph with redundant cross-SCC edges removed
//!        ↓  stats::ScopeStats
//! ```
//!
//! Acyclicity is only ever assumed of the condensation, never of the scope
//! graph itself.

pub mod components;
pub mod condense;
pub mod reduce;
pub mod scope;
pub mod stats;

pub use components::find_components;
pub use condense::{Condensation, SccNode};
pub use reduce::{BackwardEdge, Reduction, minimum_equivalent_graph};
pub use scope::{Dependency, ScopeGraph};
pub use stats::ScopeStats;
