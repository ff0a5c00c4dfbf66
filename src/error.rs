//! Error types for equation solving.

use thiserror::Error;

/// Errors that can occur while rearranging an equation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The target leaf occurs on neither side of the equation
    #[error("'{name}' does not occur in the equation")]
    TargetAbsent { name: String },

    /// The target leaf occurs more than once across both sides
    #[error("'{name}' occurs {count} times in the equation, it must occur exactly once")]
    TargetRepeated { name: String, count: usize },

    /// An operator on the path to the target has no inverse (e.g. `abs`)
    #[error("cannot isolate '{name}': an operator on its path has no inverse")]
    NoIsolation { name: String },

    /// Safety limit configured on the solve builder
    #[error("expression depth {depth} exceeds the limit of {limit}")]
    MaxDepthExceeded { depth: usize, limit: usize },
}

impl SolveError {
    /// Name of the leaf that was being solved for, when the error concerns it
    pub fn target(&self) -> Option<&str> {
        match self {
            SolveError::TargetAbsent { name }
            | SolveError::TargetRepeated { name, .. }
            | SolveError::NoIsolation { name } => Some(name),
            SolveError::MaxDepthExceeded { .. } => None,
        }
    }
}
