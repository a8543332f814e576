//! Error types for type tokens.

use thiserror::Error;

/// Structured error types for token construction and resolution.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TokenError {
    /// No construction metadata is available for the type.
    ///
    /// Raised when the mapper needs to build a value of a type that was
    /// composed at runtime (or never registered) and therefore carries no
    /// monomorphized hooks. Registering the concrete type, or a resolver
    /// mapping to one, fixes it.
    #[error("type metadata unavailable for {name}")]
    TypeUnavailable { name: String },

    /// `parameterize` was called on a token that takes no arguments
    #[error("{name} is not a parameterizable type")]
    NotParameterizable { name: String },

    /// `parameterize` was called with the wrong number of arguments
    #[error("{name} takes {expected} type argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl TokenError {
    /// Check if this error means type metadata was missing
    pub fn is_type_unavailable(&self) -> bool {
        matches!(self, TokenError::TypeUnavailable { .. })
    }
}

impl From<TokenError> for crate::Error {
    fn from(err: TokenError) -> Self {
        crate::Error::Token(err)
    }
}
