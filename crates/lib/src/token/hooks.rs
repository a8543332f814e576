//! Monomorphized construction hooks captured into tokens.
//!
//! Rust has no runtime reflection, so the ability to build and walk a
//! `Vec<String>` through a dynamically chosen token has to be captured at
//! the point where the static type is still in scope. The [`Reflect`]
//! implementations in this module's sibling do exactly that: each
//! container token carries a small vtable of plain `fn` pointers,
//! monomorphized for the concrete element type.
//!
//! [`Reflect`]: super::Reflect

use crate::convert::ConversionError;
use crate::object::ObjectRef;

/// Construction vtable variants a token can carry.
#[derive(Clone, Copy)]
pub(crate) enum Hooks {
    /// No construction metadata: scalars, records, abstract tokens
    None,
    /// List/set/array construction and introspection
    Sequence(SequenceHooks),
    /// String-keyed map construction and introspection
    Map(MapHooks),
    /// `Option` wrapping and unwrapping
    Optional(OptionalHooks),
}

/// Hooks for sequence-shaped containers.
///
/// `new` and `push` are absent for fixed-size sequences (arrays), which
/// cannot be preallocated empty and grown; such sequences only support
/// `collect`, and consequently cannot participate in cycles.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SequenceHooks {
    pub new: Option<fn(usize) -> ObjectRef>,
    pub push: Option<fn(&ObjectRef, ObjectRef) -> Result<(), ConversionError>>,
    pub collect: fn(Vec<ObjectRef>) -> Result<ObjectRef, ConversionError>,
    pub items: fn(&ObjectRef) -> Result<Vec<ObjectRef>, ConversionError>,
    pub len: fn(&ObjectRef) -> Result<usize, ConversionError>,
}

/// Hooks for string-keyed maps.
#[derive(Clone, Copy)]
pub(crate) struct MapHooks {
    pub new: fn(usize) -> ObjectRef,
    pub insert: fn(&ObjectRef, String, ObjectRef) -> Result<(), ConversionError>,
    pub entries: fn(&ObjectRef) -> Result<Vec<(String, ObjectRef)>, ConversionError>,
    pub len: fn(&ObjectRef) -> Result<usize, ConversionError>,
}

/// Hooks for `Option<T>`.
#[derive(Clone, Copy)]
pub(crate) struct OptionalHooks {
    pub none: fn() -> ObjectRef,
    pub some: fn(ObjectRef) -> Result<ObjectRef, ConversionError>,
    pub unwrap: fn(&ObjectRef) -> Result<Option<ObjectRef>, ConversionError>,
}
