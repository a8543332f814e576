//! Error types for the mapping processor.

use thiserror::Error;

use crate::convert::ConversionError;
use crate::element::ElementError;
use crate::signature::SignatureError;
use crate::token::TokenError;

/// Structured error types for mapping runs.
///
/// Whatever fails inside a traversal surfaces from the top-level call as
/// a single [`MapperError::Process`] wrapping the cause chain and naming
/// the path that failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapperError {
    /// A mapping run failed; `path` locates the failing value
    #[error("mapping failed at {path} (target {target})")]
    Process {
        path: String,
        target: String,
        #[source]
        source: Box<crate::Error>,
    },

    /// A cyclic input reached a signature that cannot prebuild.
    ///
    /// The signature never observes a value before construction finishes,
    /// so the self-reference cannot be resolved; switching the target to
    /// a field-strategy schema or a growable container fixes it.
    #[error("cycle detected while mapping into {target}, which cannot prebuild its values")]
    CycleRequiresPrebuilt { target: String },

    /// A resolver registration maps across element shapes
    #[error("type implementation {concrete} does not fit the shape of {abstract_type}")]
    IncompatibleImplementation {
        abstract_type: String,
        concrete: String,
    },

    /// Signature selection or construction failed
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Scalar or dynamic-value conversion failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Type metadata was missing
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Element access failed
    #[error(transparent)]
    Element(#[from] ElementError),
}

impl MapperError {
    /// Check if this error reports an unresolvable cycle
    pub fn is_cycle_error(&self) -> bool {
        match self {
            MapperError::CycleRequiresPrebuilt { .. } => true,
            MapperError::Process { source, .. } => source.is_cycle_error(),
            _ => false,
        }
    }

    /// Check if this error means no signature matched
    pub fn is_no_match(&self) -> bool {
        match self {
            MapperError::Signature(err) => err.is_no_match(),
            MapperError::Process { source, .. } => source.is_no_matching_signature(),
            _ => false,
        }
    }

    /// Check if this error is a conversion failure
    pub fn is_conversion(&self) -> bool {
        match self {
            MapperError::Conversion(_) => true,
            MapperError::Signature(SignatureError::Conversion(_)) => true,
            MapperError::Process { source, .. } => source.is_conversion_error(),
            _ => false,
        }
    }

    /// Check if this error means type metadata was missing
    pub fn is_type_unavailable(&self) -> bool {
        match self {
            MapperError::Token(err) => err.is_type_unavailable(),
            MapperError::Signature(SignatureError::Token(err)) => err.is_type_unavailable(),
            MapperError::Process { source, .. } => source.is_type_unavailable(),
            _ => false,
        }
    }
}

impl From<MapperError> for crate::Error {
    fn from(err: MapperError) -> Self {
        crate::Error::Mapper(err)
    }
}
