//! Format codecs: byte streams to element trees and back.
//!
//! The mapping core is codec-agnostic; everything it needs from a format
//! is the [`Codec`] contract: decode a stream into a [`ConfigElement`],
//! encode an element into a stream, and claim a set of file extensions.
//! JSON and TOML codecs ship in-tree; a [`CodecRegistry`] routes by
//! extension.

mod errors;
mod json;
#[cfg(test)]
mod tests;
mod toml;

use std::io;
use std::sync::Arc;

pub use errors::CodecError;
pub use json::JsonCodec;
pub use self::toml::TomlCodec;

use crate::element::ConfigElement;

/// A format-specific encoder/decoder for element trees.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// The file extensions this codec claims, lowercase, without dots
    fn extensions(&self) -> &[&str];

    /// Decodes a byte stream into an element tree
    fn decode(&self, input: &mut dyn io::Read) -> Result<ConfigElement, CodecError>;

    /// Encodes an element tree into a byte stream.
    ///
    /// Wire formats are trees: encoding a self-referential element fails
    /// with [`CodecError::CyclicElement`].
    fn encode(&self, element: &ConfigElement, output: &mut dyn io::Write)
    -> Result<(), CodecError>;
}

/// Routes elements to codecs by file extension.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the in-tree codecs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonCodec));
        registry.register(Arc::new(TomlCodec));
        registry
    }

    /// Registers a codec; later registrations win on extension clashes
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        self.codecs.push(codec);
    }

    /// The codec claiming `extension`, matched case-insensitively
    pub fn by_extension(&self, extension: &str) -> Result<Arc<dyn Codec>, CodecError> {
        let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
        self.codecs
            .iter()
            .rev()
            .find(|codec| codec.extensions().contains(&wanted.as_str()))
            .cloned()
            .ok_or(CodecError::UnknownExtension { extension: wanted })
    }
}

/// Returns true when the element graph contains a cycle.
///
/// Codecs check this up front so the failure is a clean
/// [`CodecError::CyclicElement`] instead of a format-library error
/// surfaced mid-write.
pub(crate) fn is_cyclic(element: &ConfigElement) -> bool {
    fn walk(element: &ConfigElement, in_progress: &mut Vec<usize>) -> bool {
        let Some(id) = element.ptr_id() else {
            return false;
        };
        if in_progress.contains(&id) {
            return true;
        }
        in_progress.push(id);
        let cyclic = element
            .children()
            .iter()
            .any(|(_, child)| walk(child, in_progress));
        in_progress.pop();
        cyclic
    }

    walk(element, &mut Vec::new())
}
