//! Error types for codecs.

use thiserror::Error;

/// Structured error types for format codecs.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the underlying stream failed
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input was not valid in the codec's format
    #[error("{format} parse error: {reason}")]
    Parse { format: &'static str, reason: String },

    /// The element could not be represented in the codec's format
    #[error("{format} emit error: {reason}")]
    Emit { format: &'static str, reason: String },

    /// Wire formats are trees; self-referential elements cannot encode
    #[error("cannot encode a self-referential element")]
    CyclicElement,

    /// No registered codec claims the extension
    #[error("no codec registered for extension '{extension}'")]
    UnknownExtension { extension: String },
}

impl CodecError {
    /// Check if this error came from the underlying stream
    pub fn is_io(&self) -> bool {
        matches!(self, CodecError::Io(_))
    }

    /// Check if this error is a parse failure
    pub fn is_parse(&self) -> bool {
        matches!(self, CodecError::Parse { .. })
    }

    /// Check if this error rejected a self-referential element
    pub fn is_cyclic(&self) -> bool {
        matches!(self, CodecError::CyclicElement)
    }
}

impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
