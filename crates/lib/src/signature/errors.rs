//! Error types for signature declaration and matching.

use thiserror::Error;

use crate::convert::ConversionError;
use crate::token::TokenError;

/// Structured error types for signatures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SignatureError {
    /// A signature was declared with an invalid shape.
    ///
    /// Raised eagerly at registration: mixed named/unnamed arguments, a
    /// field strategy without a default constructor, and similar
    /// declaration mistakes.
    #[error("invalid signature for {target}: {reason}")]
    Shape { target: String, reason: String },

    /// Every candidate signature was tried and none matched
    #[error("no matching signature for {target} from {input}")]
    NoMatchingSignature { target: String, input: String },

    /// `build` was given a prebuilt object the signature cannot accept
    #[error("signature for {target} does not support pre-initialized building objects")]
    UnsupportedPrebuilt { target: String },

    /// A signature was invoked with the wrong number of arguments.
    ///
    /// The matcher guarantees lengths, so this indicates a custom
    /// signature breaking its own declared length.
    #[error("signature for {target} expected {expected} argument(s), got {actual}")]
    ArgumentCount {
        target: String,
        expected: usize,
        actual: usize,
    },

    /// A value failed to convert while building or introspecting
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Type metadata was missing while building
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl SignatureError {
    pub(crate) fn shape(target: impl Into<String>, reason: impl Into<String>) -> Self {
        SignatureError::Shape {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means no candidate matched
    pub fn is_no_match(&self) -> bool {
        matches!(self, SignatureError::NoMatchingSignature { .. })
    }

    /// Check if this error is a declaration-shape problem
    pub fn is_shape(&self) -> bool {
        matches!(self, SignatureError::Shape { .. })
    }

    /// Check if this error is an unsupported prebuilt object
    pub fn is_unsupported_prebuilt(&self) -> bool {
        matches!(self, SignatureError::UnsupportedPrebuilt { .. })
    }
}

impl From<SignatureError> for crate::Error {
    fn from(err: SignatureError) -> Self {
        crate::Error::Signature(err)
    }
}
