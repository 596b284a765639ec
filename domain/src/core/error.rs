//! Domain error types
//!
//! Every variant here is a configuration error: it is raised before any
//! branch executes and leaves no partial state behind.

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("branch count must be between 0 and 1024, got {0}")]
    InvalidBranchCount(i64),

    #[error("branch count 0 requires a preset that declares universes")]
    NoDeclaredUniverses,

    #[error("universe[{0}] is missing an id")]
    MissingUniverseId(usize),

    #[error("duplicate universe id {0:?}")]
    DuplicateUniverseId(String),

    #[error("duplicate universe label {0:?}")]
    DuplicateUniverseLabel(String),

    #[error("universe {universe:?} depends on unknown universe {reference:?}")]
    UnknownDependency { universe: String, reference: String },

    #[error("universe {0:?} cannot depend on itself")]
    SelfDependency(String),

    #[error("universe dependency cycle detected")]
    DependencyCycle,

    #[error("invalid merge policy {0:?} (expected \"append\" or \"latest\")")]
    InvalidMergePolicy(String),
}

impl DomainError {
    /// Check if this error was produced by cycle detection
    pub fn is_cycle(&self) -> bool {
        matches!(self, DomainError::DependencyCycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_display() {
        let error = DomainError::DependencyCycle;
        assert!(error.to_string().contains("cycle"));
        assert!(error.is_cycle());
    }

    #[test]
    fn test_unknown_dependency_names_both_sides() {
        let error = DomainError::UnknownDependency {
            universe: "synth (u3)".to_string(),
            reference: "ghost".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("synth (u3)"));
        assert!(msg.contains("ghost"));
        assert!(!error.is_cycle());
    }
}
