//! Arena-backed artifact hierarchy.
//!
//! # Overview
//!
//! The hierarchy owns every [`Artifact`] in a flat arena. Scope links and
//! part lists are plain [`ArtifactId`] values looked up through the arena,
//! so the tree holds no reference cycles and can be shared freely between
//! threads once built.
//!
//! The tree is assembled with [`HierarchyBuilder`], which enforces:
//!
//! - identifiers are unique across the whole tree,
//! - a part's parent is added before the part (so the scope relation is
//!   acyclic by construction),
//! - containment follows the artifact kinds (folders hold folders and
//!   files, files hold symbols, symbols hold symbols),
//! - exactly one artifact has no scope.
//!
//! After [`HierarchyBuilder::build`] the hierarchy is read-only.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use crate::artifact::{Artifact, ArtifactId};
use crate::error::HierarchyError;

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// Immutable tree of artifacts indexed by identifier.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    artifacts: Vec<Artifact>,
    index: HashMap<ArtifactId, usize>,
    root: usize,
}

impl Hierarchy {
    /// The single artifact without a scope.
    #[must_use]
    pub fn root(&self) -> &Artifact {
        &self.artifacts[self.root]
    }

    #[must_use]
    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.index.get(id).map(|&i| &self.artifacts[i])
    }

    #[must_use]
    pub fn contains_id(&self, id: &ArtifactId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// All artifacts in insertion order (parents before their parts).
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    /// Artifacts that own at least one part, i.e. that have a scope graph.
    pub fn scopes(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| a.is_scope())
    }

    /// Enclosing artifacts of `id`, root first, excluding `id` itself.
    ///
    /// Returns an empty path for the root and for unknown identifiers.
    #[must_use]
    pub fn scope_path(&self, id: &ArtifactId) -> Vec<&ArtifactId> {
        let mut path = Vec::new();
        let mut cursor = self.get(id).and_then(|a| a.scope.as_ref());
        while let Some(scope_id) = cursor {
            path.push(scope_id);
            cursor = self.get(scope_id).and_then(|a| a.scope.as_ref());
        }
        path.reverse();
        path
    }

    /// Number of enclosing scopes (root has depth 0).
    #[must_use]
    pub fn depth(&self, id: &ArtifactId) -> usize {
        self.scope_path(id).len()
    }

    /// Return `true` if `other` is `ancestor` itself or lies anywhere below it.
    #[must_use]
    pub fn contains(&self, ancestor: &ArtifactId, other: &ArtifactId) -> bool {
        if ancestor == other {
            return self.contains_id(other);
        }
        self.scope_path(other).contains(&ancestor)
    }

    /// Visit every artifact depth-first, parts before the artifact itself.
    pub fn traverse_depth_first<'a>(&'a self, mut visit: impl FnMut(&'a Artifact)) {
        for artifact in self.post_order() {
            visit(artifact);
        }
    }

    /// Artifacts in depth-first post-order starting at the root.
    ///
    /// Iterative so that deeply nested symbol trees cannot exhaust the stack.
    #[must_use]
    pub fn post_order(&self) -> Vec<&Artifact> {
        let mut out = Vec::with_capacity(self.artifacts.len());
        let mut stack: Vec<(&Artifact, bool)> = vec![(self.root(), false)];

        while let Some((artifact, expanded)) = stack.pop() {
            if expanded {
                out.push(artifact);
                continue;
            }
            stack.push((artifact, true));
            let parts: Vec<&Artifact> = artifact.parts().filter_map(|p| self.get(p)).collect();
            for part in parts.into_iter().rev() {
                stack.push((part, false));
            }
        }

        out
    }

    /// Rolled-up size of every artifact: its own size when present,
    /// otherwise the sum over its parts.
    ///
    /// Built over [`Self::post_order`], so each part is tabled before its
    /// scope.
    #[must_use]
    pub fn rolled_up_lines_of_code(&self) -> HashMap<ArtifactId, usize> {
        let mut table: HashMap<ArtifactId, usize> = HashMap::with_capacity(self.len());
        for artifact in self.post_order() {
            let value = artifact.intrinsic_size_in_lines_of_code.unwrap_or_else(|| {
                artifact
                    .parts()
                    .map(|p| table.get(p).copied().unwrap_or(0))
                    .sum()
            });
            table.insert(artifact.id.clone(), value);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// HierarchyBuilder
// ---------------------------------------------------------------------------

/// Incremental constructor for a [`Hierarchy`].
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    artifacts: Vec<Artifact>,
    index: HashMap<ArtifactId, usize>,
    root: Option<usize>,
}

impl HierarchyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `artifact` as the last part of `parent`, or as the root when
    /// `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if the identifier is already taken, the
    /// parent is unknown, the parent's kind cannot hold this artifact, or a
    /// second root is added.
    pub fn add(
        &mut self,
        parent: Option<&ArtifactId>,
        mut artifact: Artifact,
    ) -> Result<&mut Self, HierarchyError> {
        if self.index.contains_key(&artifact.id) {
            return Err(HierarchyError::DuplicateArtifact(artifact.id));
        }

        let slot = self.artifacts.len();

        match parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(HierarchyError::MultipleRoots {
                        first: self.artifacts[existing].id.clone(),
                        second: artifact.id,
                    });
                }
                artifact.scope = None;
                self.root = Some(slot);
            }
            Some(parent_id) => {
                let Some(&parent_slot) = self.index.get(parent_id) else {
                    return Err(HierarchyError::UnknownParent {
                        child: artifact.id,
                        parent: parent_id.clone(),
                    });
                };
                let parent_artifact = &mut self.artifacts[parent_slot];
                if !parent_artifact.kind.can_contain(&artifact.kind) {
                    return Err(HierarchyError::IllegalContainment {
                        parent: parent_artifact.id.clone(),
                        parent_kind: parent_artifact.kind.label(),
                        child: artifact.id,
                        child_kind: artifact.kind.label(),
                    });
                }
                parent_artifact.push_part(artifact.id.clone(), &artifact.kind);
                artifact.scope = Some(parent_id.clone());
            }
        }

        self.index.insert(artifact.id.clone(), slot);
        self.artifacts.push(artifact);
        Ok(self)
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::MissingRoot`] if nothing was added.
    pub fn build(self) -> Result<Hierarchy, HierarchyError> {
        let root = self.root.ok_or(HierarchyError::MissingRoot)?;
        Ok(Hierarchy {
            artifacts: self.artifacts,
            index: self.index,
            root,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
