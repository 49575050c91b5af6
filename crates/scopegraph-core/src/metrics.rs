//! Per-artifact dependency metrics and the run-scoped store that holds them.
//!
//! # Visibility
//!
//! [`MetricsStore`] is a key→value map from [`ArtifactId`] to [`Metrics`]
//! backed by a [`DashMap`], so scopes analyzed on different threads contend
//! only on the shard holding each key. Records are inserted and read whole: a
//! reader sees either no record or a complete one, never a record with
//! some fields assigned and others pending.
//!
//! The store is created per analysis run and passed through the pipeline by
//! reference. There is no process-wide instance.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;

/// Dependency metrics of one artifact within its enclosing scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub lines_of_code: usize,
    /// Rank of the artifact's component in its scope; 0 is the largest by LOC.
    pub component_rank: usize,
    /// Position of the artifact's SCC in its component's topological order.
    pub scc_index_topologically_sorted: usize,
    pub is_in_a_cycle: bool,
    pub ingoing_dependencies_in_scope: usize,
    pub outgoing_dependencies_in_scope: usize,
}

/// Thread-safe metrics map for one analysis run.
#[derive(Debug, Default)]
pub struct MetricsStore {
    records: DashMap<ArtifactId, Metrics>,
}

impl MetricsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `id`. Returns the previous record, if any.
    pub fn insert(&self, id: ArtifactId, metrics: Metrics) -> Option<Metrics> {
        self.records.insert(id, metrics)
    }

    #[must_use]
    pub fn get(&self, id: &ArtifactId) -> Option<Metrics> {
        self.records.get(id).map(|entry| *entry.value())
    }

    #[must_use]
    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.records.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered copy of every record, for output and comparison.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ArtifactId, Metrics> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
