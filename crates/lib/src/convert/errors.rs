//! Error types for scalar and dynamic-value conversion.

use thiserror::Error;

/// Structured error types for value conversion.
///
/// These cover the scalar boundary of the mapper: turning element scalars
/// into typed values and back, and moving values in and out of the dynamic
/// object layer.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A value had a different type than the conversion required
    #[error("conversion mismatch: expected {expected}, found {actual}")]
    Mismatch { expected: String, actual: String },

    /// A numeric value does not fit in the target type
    #[error("numeric overflow: {value} does not fit in {target}")]
    NumericOverflow { value: String, target: String },

    /// A string did not name any variant of a registered enum
    #[error("unknown variant '{value}' for enum {ty}")]
    UnknownVariant { value: String, ty: String },

    /// A null scalar was mapped into a target that cannot absent itself
    #[error("null value cannot be converted to {target}")]
    NullValue { target: String },

    /// No scalar handler is registered for the target type
    #[error("no scalar handler registered for {ty}")]
    NoHandler { ty: String },
}

impl ConversionError {
    pub(crate) fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ConversionError::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check if this error is a numeric overflow
    pub fn is_numeric_overflow(&self) -> bool {
        matches!(self, ConversionError::NumericOverflow { .. })
    }

    /// Check if this error is a type mismatch
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ConversionError::Mismatch { .. })
    }

    /// Check if this error is an unknown enum variant
    pub fn is_unknown_variant(&self) -> bool {
        matches!(self, ConversionError::UnknownVariant { .. })
    }
}

impl From<ConversionError> for crate::Error {
    fn from(err: ConversionError) -> Self {
        crate::Error::Conversion(err)
    }
}
