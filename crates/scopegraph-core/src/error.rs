use std::fmt;

use crate::artifact::ArtifactId;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputParseError,
    DuplicateArtifact,
    UnknownParent,
    IllegalContainment,
    MissingRoot,
    MultipleRoots,
    UnknownArtifact,
    DisjointRoots,
    SameSiblingPart,
    SelfDependency,
    OrderingViolation,
    NotAcyclic,
}

/// Whether a run can continue after an error of this class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The offending reference is skipped and reported as a warning.
    Recoverable,
    /// The run is aborted.
    Fatal,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputParseError => "E1002",
            Self::DuplicateArtifact => "E2001",
            Self::UnknownParent => "E2002",
            Self::IllegalContainment => "E2003",
            Self::MissingRoot => "E2004",
            Self::MultipleRoots => "E2005",
            Self::UnknownArtifact => "E3001",
            Self::DisjointRoots => "E3002",
            Self::SameSiblingPart => "E3003",
            Self::SelfDependency => "E3004",
            Self::OrderingViolation => "E9001",
            Self::NotAcyclic => "E9002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Input tree parse error",
            Self::DuplicateArtifact => "Duplicate artifact identifier",
            Self::UnknownParent => "Parent artifact not found",
            Self::IllegalContainment => "Artifact kind cannot contain this part",
            Self::MissingRoot => "Hierarchy has no root artifact",
            Self::MultipleRoots => "Hierarchy has more than one root",
            Self::UnknownArtifact => "Referenced artifact not found",
            Self::DisjointRoots => "Reference endpoints share no root",
            Self::SameSiblingPart => "Reference resolves within a single part",
            Self::SelfDependency => "Dependency from a part onto itself",
            Self::OrderingViolation => "Analysis pass ran out of order",
            Self::NotAcyclic => "Condensation graph contains a cycle",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in scopegraph.toml and retry."),
            Self::InputParseError => Some("Regenerate the input tree with the symbol backend."),
            Self::DuplicateArtifact => Some("Artifact identifiers must be unique across the tree."),
            Self::UnknownParent | Self::MissingRoot | Self::MultipleRoots => {
                Some("Build the hierarchy from a single root folder.")
            }
            Self::IllegalContainment => {
                Some("Folders hold folders and files, files hold symbols, symbols hold symbols.")
            }
            Self::UnknownArtifact => Some("The reference is stale; re-run symbol retrieval."),
            Self::DisjointRoots | Self::SameSiblingPart | Self::SelfDependency => None,
            Self::OrderingViolation | Self::NotAcyclic => {
                Some("This is a bug in the analysis pipeline. Report it with logs.")
            }
        }
    }

    /// Recovery class of errors carrying this code.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnknownArtifact
            | Self::DisjointRoots
            | Self::SameSiblingPart
            | Self::SelfDependency => Severity::Recoverable,
            Self::ConfigParseError
            | Self::InputParseError
            | Self::DuplicateArtifact
            | Self::UnknownParent
            | Self::IllegalContainment
            | Self::MissingRoot
            | Self::MultipleRoots
            | Self::OrderingViolation
            | Self::NotAcyclic => Severity::Fatal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Hierarchy construction errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling the artifact arena.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("artifact id {0} appears more than once")]
    DuplicateArtifact(ArtifactId),

    #[error("artifact {child} names unknown parent {parent}")]
    UnknownParent { child: ArtifactId, parent: ArtifactId },

    #[error("{parent_kind} {parent} cannot contain {child_kind} {child}")]
    IllegalContainment {
        parent: ArtifactId,
        parent_kind: &'static str,
        child: ArtifactId,
        child_kind: &'static str,
    },

    #[error("hierarchy has no root artifact")]
    MissingRoot,

    #[error("hierarchy has more than one root: {first} and {second}")]
    MultipleRoots { first: ArtifactId, second: ArtifactId },
}

impl HierarchyError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateArtifact(_) => ErrorCode::DuplicateArtifact,
            Self::UnknownParent { .. } => ErrorCode::UnknownParent,
            Self::IllegalContainment { .. } => ErrorCode::IllegalContainment,
            Self::MissingRoot => ErrorCode::MissingRoot,
            Self::MultipleRoots { .. } => ErrorCode::MultipleRoots,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Phase of a single scope graph's analysis.
///
/// Passes must run in declaration order; each one requires the previous
/// phase to be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopePhase {
    Unanalyzed,
    ComponentsFound,
    SccsAssigned,
    Pruned,
    MetricsWritten,
}

impl fmt::Display for ScopePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unanalyzed => "unanalyzed",
            Self::ComponentsFound => "components-found",
            Self::SccsAssigned => "sccs-assigned",
            Self::Pruned => "pruned",
            Self::MetricsWritten => "metrics-written",
        };
        f.write_str(name)
    }
}

/// Errors produced by the analysis engine.
///
/// Use [`AnalysisError::severity`] to decide whether the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A pass ran before the pass it depends on.
    #[error(
        "internal error: `{operation}` on scope {scope} requires phase {required}, found {actual}"
    )]
    OrderingViolation {
        scope: ArtifactId,
        operation: &'static str,
        required: ScopePhase,
        actual: ScopePhase,
    },

    /// The condensation of a component was expected to be a DAG.
    #[error("internal error: condensation of scope {scope} is not acyclic")]
    NotAcyclic { scope: ArtifactId },

    /// A reference endpoint does not exist in the hierarchy or scope graph.
    #[error("unknown artifact {id}")]
    UnknownArtifact { id: ArtifactId },

    /// The scope paths of source and target start at different roots.
    #[error("reference {from} -> {to} crosses disjoint roots")]
    DisjointRoots { from: ArtifactId, to: ArtifactId },

    /// Source and target resolve to the same part of their common scope.
    #[error("reference {from} -> {to} stays within part {part}")]
    SameSiblingPart {
        from: ArtifactId,
        to: ArtifactId,
        part: ArtifactId,
    },

    /// An edge from a scope-graph node onto itself was requested.
    #[error("self dependency on {id} in scope {scope}")]
    SelfDependency { scope: ArtifactId, id: ArtifactId },
}

impl AnalysisError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OrderingViolation { .. } => ErrorCode::OrderingViolation,
            Self::NotAcyclic { .. } => ErrorCode::NotAcyclic,
            Self::UnknownArtifact { .. } => ErrorCode::UnknownArtifact,
            Self::DisjointRoots { .. } => ErrorCode::DisjointRoots,
            Self::SameSiblingPart { .. } => ErrorCode::SameSiblingPart,
            Self::SelfDependency { .. } => ErrorCode::SelfDependency,
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code().severity()
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.severity(), Severity::Recoverable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 13] = [
        ErrorCode::ConfigParseError,
        ErrorCode::InputParseError,
        ErrorCode::DuplicateArtifact,
        ErrorCode::UnknownParent,
        ErrorCode::IllegalContainment,
        ErrorCode::MissingRoot,
        ErrorCode::MultipleRoots,
        ErrorCode::UnknownArtifact,
        ErrorCode::DisjointRoots,
        ErrorCode::SameSiblingPart,
        ErrorCode::SelfDependency,
        ErrorCode::OrderingViolation,
        ErrorCode::NotAcyclic,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn ordering_violations_are_fatal() {
        let err = AnalysisError::OrderingViolation {
            scope: ArtifactId::from("src"),
            operation: "prune",
            required: ScopePhase::SccsAssigned,
            actual: ScopePhase::ComponentsFound,
        };
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(err.to_string().starts_with("internal error"));
        assert!(err.to_string().contains("sccs-assigned"));
    }

    #[test]
    fn topology_and_lookup_errors_are_recoverable() {
        let stale = AnalysisError::UnknownArtifact {
            id: ArtifactId::from("gone"),
        };
        let same = AnalysisError::SameSiblingPart {
            from: ArtifactId::from("a"),
            to: ArtifactId::from("b"),
            part: ArtifactId::from("f"),
        };
        assert!(stale.is_recoverable());
        assert!(same.is_recoverable());
        assert_eq!(same.code().code(), "E3003");
    }

    #[test]
    fn phases_are_ordered() {
        assert!(ScopePhase::Unanalyzed < ScopePhase::ComponentsFound);
        assert!(ScopePhase::SccsAssigned < ScopePhase::Pruned);
        assert!(ScopePhase::Pruned < ScopePhase::MetricsWritten);
    }
}
