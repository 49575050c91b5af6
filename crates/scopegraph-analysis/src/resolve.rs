//! Projection of raw references onto scope graphs.
//!
//! # Placement
//!
//! A reference `S → T` becomes an edge in the graph of the deepest scope
//! that contains both endpoints. With the root-first scope paths
//!
//! ```text
//! path(S) = [root, …, scope(S)]
//! path(T) = [root, …, scope(T)]
//! ```
//!
//! the common scope is the last index `k` where the paths agree. The edge
//! joins the two parts of that scope that lead to `S` and `T`: `path[k+1]`
//! on each side, or the endpoint itself when its path ends at `k`.
//!
//! So a reference from a symbol in `d/f1` to a symbol in `d/f2` lands on
//! folder `d` as `f1 → f2`, and a reference between two symbols of the same
//! file lands on that file's graph.
//!
//! # Skipped references
//!
//! A reference is skipped (and reported, never fatal) when an endpoint is
//! unknown, when the paths start at different roots, or when both endpoints
//! resolve to the same part. The latter covers references from an artifact
//! into its own subtree.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use scopegraph_core::{AnalysisError, ArtifactId, Hierarchy, Reference};

use crate::graph::ScopeGraph;

/// Where a reference lands: an edge between two parts of one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    pub scope: ArtifactId,
    pub source_part: ArtifactId,
    pub target_part: ArtifactId,
}

/// A reference that was not projected, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedReference {
    pub source: ArtifactId,
    pub target: ArtifactId,
    /// Stable error code (`E####`).
    pub code: String,
    pub reason: String,
}

impl SkippedReference {
    #[must_use]
    pub fn new(reference: &Reference, error: &AnalysisError) -> Self {
        Self {
            source: reference.source.clone(),
            target: reference.target.clone(),
            code: error.code().code().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Find the scope and sibling parts a reference should connect.
///
/// # Errors
///
/// Returns a recoverable [`AnalysisError`] if the reference cannot be placed.
pub fn place(hierarchy: &Hierarchy, reference: &Reference) -> Result<Placement, AnalysisError> {
    let (source, target) = (&reference.source, &reference.target);
    for id in [source, target] {
        if !hierarchy.contains_id(id) {
            return Err(AnalysisError::UnknownArtifact { id: id.clone() });
        }
    }

    let source_path = hierarchy.scope_path(source);
    let target_path = hierarchy.scope_path(target);

    // The root is an endpoint: everything lies within it.
    let (Some(source_root), Some(target_root)) = (source_path.first(), target_path.first()) else {
        return Err(AnalysisError::SameSiblingPart {
            from: source.clone(),
            to: target.clone(),
            part: hierarchy.root().id.clone(),
        });
    };
    if source_root != target_root {
        return Err(AnalysisError::DisjointRoots {
            from: source.clone(),
            to: target.clone(),
        });
    }

    let common = source_path
        .iter()
        .zip(target_path.iter())
        .take_while(|(s, t)| s == t)
        .count()
        - 1;

    let source_part = source_path.get(common + 1).copied().unwrap_or(source);
    let target_part = target_path.get(common + 1).copied().unwrap_or(target);

    if source_part == target_part {
        return Err(AnalysisError::SameSiblingPart {
            from: source.clone(),
            to: target.clone(),
            part: source_part.clone(),
        });
    }

    Ok(Placement {
        scope: source_path[common].clone(),
        source_part: source_part.clone(),
        target_part: target_part.clone(),
    })
}

/// Project every reference onto its scope graph.
///
/// References are applied bottom-up: grouped by source in depth-first
/// post-order of the hierarchy (symbols before their files, files before
/// their folders), with unknown sources last. All projection completes
/// before any scope graph is analyzed.
///
/// Returns the skipped references in application order.
#[instrument(skip_all, fields(references = references.len()))]
pub fn project_references(
    hierarchy: &Hierarchy,
    references: &[Reference],
    graphs: &mut BTreeMap<ArtifactId, ScopeGraph>,
) -> Vec<SkippedReference> {
    let position: HashMap<&ArtifactId, usize> = hierarchy
        .post_order()
        .into_iter()
        .enumerate()
        .map(|(i, a)| (&a.id, i))
        .collect();

    let mut ordered: Vec<&Reference> = references.iter().collect();
    ordered.sort_by_key(|r| position.get(&r.source).copied().unwrap_or(usize::MAX));

    let mut skipped = Vec::new();
    for reference in ordered {
        if let Err(error) = project_one(hierarchy, reference, graphs) {
            warn!(
                source = %reference.source,
                target = %reference.target,
                code = %error.code(),
                "skipping reference: {error}"
            );
            skipped.push(SkippedReference::new(reference, &error));
        }
    }
    skipped
}

fn project_one(
    hierarchy: &Hierarchy,
    reference: &Reference,
    graphs: &mut BTreeMap<ArtifactId, ScopeGraph>,
) -> Result<(), AnalysisError> {
    let placement = place(hierarchy, reference)?;
    let graph = graphs
        .get_mut(&placement.scope)
        .ok_or_else(|| AnalysisError::UnknownArtifact {
            id: placement.scope.clone(),
        })?;
    graph.add_dependency(&placement.source_part, &placement.target_part)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scopegraph_core::{Artifact, ArtifactKind, HierarchyBuilder};

    fn id(s: &str) -> ArtifactId {
        ArtifactId::from(s)
    }

    /// root/
    ///   D/
    ///     F1 { S1 { S1a } , S3 }
    ///     F2 { S2 }
    ///   E/
    ///     F3 { S4 }
    fn sample() -> Hierarchy {
        let mut b = HierarchyBuilder::new();
        let mut add = |parent: Option<&str>, a: Artifact| {
            b.add(parent.map(ArtifactId::from).as_ref(), a).unwrap();
        };
        add(None, Artifact::new("root", "root", ArtifactKind::folder()));
        add(Some("root"), Artifact::new("D", "D", ArtifactKind::folder()));
        add(Some("root"), Artifact::new("E", "E", ArtifactKind::folder()));
        add(Some("D"), Artifact::new("F1", "f1", ArtifactKind::file()));
        add(Some("D"), Artifact::new("F2", "f2", ArtifactKind::file()));
        add(Some("E"), Artifact::new("F3", "f3", ArtifactKind::file()));
        add(Some("F1"), Artifact::new("S1", "s1", ArtifactKind::symbol("Class")));
        add(Some("S1"), Artifact::new("S1a", "s1a", ArtifactKind::symbol("Method")));
        add(Some("F1"), Artifact::new("S3", "s3", ArtifactKind::symbol("Function")));
        add(Some("F2"), Artifact::new("S2", "s2", ArtifactKind::symbol("Function")));
        add(Some("F3"), Artifact::new("S4", "s4", ArtifactKind::symbol("Function")));
        b.build().unwrap()
    }

    fn graphs(h: &Hierarchy) -> BTreeMap<ArtifactId, ScopeGraph> {
        h.scopes()
            .map(|a| (a.id.clone(), ScopeGraph::for_artifact(a)))
            .collect()
    }

    #[test]
    fn sibling_files_meet_at_folder() {
        let h = sample();
        let p = place(&h, &Reference::new("S1", "S2")).unwrap();
        assert_eq!(p.scope, id("D"));
        assert_eq!(p.source_part, id("F1"));
        assert_eq!(p.target_part, id("F2"));
    }

    #[test]
    fn sibling_symbols_meet_at_file() {
        let h = sample();
        let p = place(&h, &Reference::new("S3", "S1")).unwrap();
        assert_eq!(p.scope, id("F1"));
        assert_eq!(p.source_part, id("S3"));
        assert_eq!(p.target_part, id("S1"));
    }

    #[test]
    fn nested_symbol_projects_through_its_parent() {
        let h = sample();
        let p = place(&h, &Reference::new("S1a", "S3")).unwrap();
        assert_eq!(p.scope, id("F1"));
        assert_eq!(p.source_part, id("S1"));
        assert_eq!(p.target_part, id("S3"));
    }

    #[test]
    fn different_folders_meet_at_root() {
        let h = sample();
        let p = place(&h, &Reference::new("S4", "S1a")).unwrap();
        assert_eq!(p.scope, id("root"));
        assert_eq!(p.source_part, id("E"));
        assert_eq!(p.target_part, id("D"));
    }

    #[test]
    fn reference_into_own_subtree_is_same_part() {
        let h = sample();
        let err = place(&h, &Reference::new("S1", "S1a")).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::SameSiblingPart {
                from: id("S1"),
                to: id("S1a"),
                part: id("S1"),
            }
        );
    }

    #[test]
    fn self_reference_is_same_part() {
        let h = sample();
        let err = place(&h, &Reference::new("S2", "S2")).unwrap_err();
        assert!(matches!(err, AnalysisError::SameSiblingPart { .. }));
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let h = sample();
        let err = place(&h, &Reference::new("S2", "ghost")).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownArtifact { id: id("ghost") });
    }

    #[test]
    fn root_endpoint_is_same_part() {
        let h = sample();
        let err = place(&h, &Reference::new("root", "S2")).unwrap_err();
        assert!(matches!(err, AnalysisError::SameSiblingPart { part, .. } if part == id("root")));
    }

    #[test]
    fn projection_aggregates_weights_and_reports_skips() {
        let h = sample();
        let mut g = graphs(&h);
        let refs = vec![
            Reference::new("S1", "S2"),
            Reference::new("S3", "S2"),
            Reference::new("S1a", "S3"),
            Reference::new("S2", "missing"),
        ];

        let skipped = project_references(&h, &refs, &mut g);

        assert_eq!(g[&id("D")].weight(&id("F1"), &id("F2")), Some(2));
        assert_eq!(g[&id("F1")].weight(&id("S1"), &id("S3")), Some(1));
        assert_eq!(g[&id("F2")].edge_count(), 0, "nothing at symbol level");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].code, "E3001");
        assert_eq!(skipped[0].target, id("missing"));
    }
}
