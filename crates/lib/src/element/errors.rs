//! Error types for element access.

use thiserror::Error;

/// Structured error types for configuration element access.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ElementError {
    /// An element had a different variant than the caller required
    #[error("element type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A node lookup failed
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
}

impl ElementError {
    /// Check if this error is a variant mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ElementError::TypeMismatch { .. })
    }
}

impl From<ElementError> for crate::Error {
    fn from(err: ElementError) -> Self {
        crate::Error::Element(err)
    }
}
