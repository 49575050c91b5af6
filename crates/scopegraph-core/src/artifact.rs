//! Code artifacts: folders, files, and symbols.
//!
//! An [`Artifact`] carries the fields every kind shares (identity, name,
//! optional source text and size, scope link) plus a closed
//! [`ArtifactKind`] variant holding the kind-specific part lists. The part
//! lists are identifiers into the owning [`crate::hierarchy::Hierarchy`]
//! arena, never owning pointers.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArtifactId
// ---------------------------------------------------------------------------

/// Stable identifier of an artifact, unique within one hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// Kind-specific payload of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Folder {
        subfolders: Vec<ArtifactId>,
        files: Vec<ArtifactId>,
    },
    File {
        symbols: Vec<ArtifactId>,
    },
    Symbol {
        /// Backend-reported kind, e.g. `"Function"` or `"Struct"`.
        kind_name: String,
        subsymbols: Vec<ArtifactId>,
    },
}

impl ArtifactKind {
    #[must_use]
    pub const fn folder() -> Self {
        Self::Folder {
            subfolders: Vec::new(),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub const fn file() -> Self {
        Self::File {
            symbols: Vec::new(),
        }
    }

    #[must_use]
    pub fn symbol(kind_name: impl Into<String>) -> Self {
        Self::Symbol {
            kind_name: kind_name.into(),
            subsymbols: Vec::new(),
        }
    }

    /// Coarse label used in diagnostics (`folder`, `file`, `symbol`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Folder { .. } => "folder",
            Self::File { .. } => "file",
            Self::Symbol { .. } => "symbol",
        }
    }

    /// Return `true` if an artifact of this kind may own a part of kind `child`.
    #[must_use]
    pub const fn can_contain(&self, child: &Self) -> bool {
        matches!(
            (self, child),
            (Self::Folder { .. }, Self::Folder { .. } | Self::File { .. })
                | (Self::File { .. } | Self::Symbol { .. }, Self::Symbol { .. })
        )
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// One node of the codebase hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    pub kind: ArtifactKind,
    pub code: Option<String>,
    pub intrinsic_size_in_lines_of_code: Option<usize>,
    /// Enclosing artifact; `None` only for the root.
    pub scope: Option<ArtifactId>,
}

impl Artifact {
    #[must_use]
    pub fn new(id: impl Into<ArtifactId>, name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            code: None,
            intrinsic_size_in_lines_of_code: None,
            scope: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub const fn with_lines_of_code(mut self, loc: usize) -> Self {
        self.intrinsic_size_in_lines_of_code = Some(loc);
        self
    }

    /// Display kind: `Folder`, `File`, or the backend's symbol kind.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            ArtifactKind::Folder { .. } => "Folder",
            ArtifactKind::File { .. } => "File",
            ArtifactKind::Symbol { kind_name, .. } => kind_name,
        }
    }

    /// Immediate parts in order. Folders list subfolders before files.
    pub fn parts(&self) -> impl Iterator<Item = &ArtifactId> {
        let (first, second): (&[ArtifactId], &[ArtifactId]) = match &self.kind {
            ArtifactKind::Folder { subfolders, files } => (subfolders.as_slice(), files.as_slice()),
            ArtifactKind::File { symbols } => (symbols.as_slice(), &[]),
            ArtifactKind::Symbol { subsymbols, .. } => (subsymbols.as_slice(), &[]),
        };
        first.iter().chain(second.iter())
    }

    /// Return `true` if this artifact owns at least one part (and is a scope).
    #[must_use]
    pub fn is_scope(&self) -> bool {
        self.parts().next().is_some()
    }

    /// Own size, zero when the backend reported none.
    #[must_use]
    pub fn lines_of_code(&self) -> usize {
        self.intrinsic_size_in_lines_of_code.unwrap_or(0)
    }

    pub(crate) fn push_part(&mut self, part: ArtifactId, part_kind: &ArtifactKind) {
        match (&mut self.kind, part_kind) {
            (ArtifactKind::Folder { subfolders, .. }, ArtifactKind::Folder { .. }) => {
                subfolders.push(part);
            }
            (ArtifactKind::Folder { files, .. }, _) => files.push(part),
            (ArtifactKind::File { symbols }, _) => symbols.push(part),
            (ArtifactKind::Symbol { subsymbols, .. }, _) => subsymbols.push(part),
        }
    }
}
