//! Serialized input tree handed over by the symbol-retrieval backend.
//!
//! # Format
//!
//! ```json
//! {
//!   "root": {
//!     "id": "src", "name": "src",
//!     "subfolders": [],
//!     "files": [{
//!       "id": "src/a.rs", "name": "a.rs", "linesOfCode": 40,
//!       "symbols": [{ "id": "src/a.rs#run", "name": "run", "kindName": "Function" }]
//!     }]
//!   },
//!   "references": [{ "source": "src/a.rs#run", "target": "src/b.rs#Config" }]
//! }
//! ```
//!
//! Every list defaults to empty and every size/code field is optional.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifact::{Artifact, ArtifactId, ArtifactKind};
use crate::error::HierarchyError;
use crate::hierarchy::{Hierarchy, HierarchyBuilder};

/// A raw symbol-level reference, not yet placed in any scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub source: ArtifactId,
    pub target: ArtifactId,
}

impl Reference {
    #[must_use]
    pub fn new(source: impl Into<ArtifactId>, target: impl Into<ArtifactId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputTree {
    pub root: FolderNode,
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: ArtifactId,
    pub name: String,
    #[serde(default)]
    pub lines_of_code: Option<usize>,
    #[serde(default)]
    pub subfolders: Vec<FolderNode>,
    #[serde(default)]
    pub files: Vec<FileNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: ArtifactId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub lines_of_code: Option<usize>,
    #[serde(default)]
    pub symbols: Vec<SymbolNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolNode {
    pub id: ArtifactId,
    pub name: String,
    pub kind_name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub lines_of_code: Option<usize>,
    #[serde(default)]
    pub subsymbols: Vec<SymbolNode>,
}

impl InputTree {
    /// Parse an input tree from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid input tree.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse input tree JSON")
    }

    /// Read and parse an input tree file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Build the artifact arena and hand back the raw references.
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if identifiers collide.
    pub fn into_hierarchy(self) -> Result<(Hierarchy, Vec<Reference>), HierarchyError> {
        let mut builder = HierarchyBuilder::new();
        add_folder(&mut builder, None, self.root)?;
        let hierarchy = builder.build()?;
        debug!(
            artifacts = hierarchy.len(),
            references = self.references.len(),
            "built artifact hierarchy"
        );
        Ok((hierarchy, self.references))
    }
}

fn add_folder(
    builder: &mut HierarchyBuilder,
    parent: Option<&ArtifactId>,
    node: FolderNode,
) -> Result<(), HierarchyError> {
    let mut artifact = Artifact::new(node.id.clone(), node.name, ArtifactKind::folder());
    artifact.intrinsic_size_in_lines_of_code = node.lines_of_code;
    builder.add(parent, artifact)?;

    for sub in node.subfolders {
        add_folder(builder, Some(&node.id), sub)?;
    }
    for file in node.files {
        add_file(builder, &node.id, file)?;
    }
    Ok(())
}

fn add_file(
    builder: &mut HierarchyBuilder,
    parent: &ArtifactId,
    node: FileNode,
) -> Result<(), HierarchyError> {
    let mut artifact = Artifact::new(node.id.clone(), node.name, ArtifactKind::file());
    artifact.code = node.code;
    artifact.intrinsic_size_in_lines_of_code = node.lines_of_code;
    builder.add(Some(parent), artifact)?;

    for symbol in node.symbols {
        add_symbol(builder, &node.id, symbol)?;
    }
    Ok(())
}

fn add_symbol(
    builder: &mut HierarchyBuilder,
    parent: &ArtifactId,
    node: SymbolNode,
) -> Result<(), HierarchyError> {
    let mut artifact = Artifact::new(
        node.id.clone(),
        node.name,
        ArtifactKind::symbol(node.kind_name),
    );
    artifact.code = node.code;
    artifact.intrinsic_size_in_lines_of_code = node.lines_of_code;
    builder.add(Some(parent), artifact)?;

    for sub in node.subsymbols {
        add_symbol(builder, &node.id, sub)?;
    }
    Ok(())
}
