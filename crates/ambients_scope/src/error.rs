//! Error types for scope management.

use thiserror::Error;

/// Errors that can occur when opening or releasing an ambient scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// An identifier passed to a scope constructor is empty or blank.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The scope would nest inside a scope it may not nest inside.
    #[error("Conflicting scope: {0}")]
    ConflictingScope(String),

    /// The scope is not the one in effect on this branch, or was already
    /// released.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ScopeError {
    /// Creates an [`InvalidInput`](Self::InvalidInput).
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a [`ConflictingScope`](Self::ConflictingScope).
    pub fn conflicting_scope(msg: impl Into<String>) -> Self {
        Self::ConflictingScope(msg.into())
    }

    /// Creates an [`InvalidState`](Self::InvalidState).
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Checks that `value` has at least one non-whitespace character.
    pub(crate) fn require_non_blank(what: &str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::invalid_input(format!("{what} cannot be empty")));
        }
        Ok(())
    }
}
