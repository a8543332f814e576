//! Construction signatures.
//!
//! A [`Signature`] is a callable recipe for building values of one target
//! type from a sequence of arguments, together with the inverse
//! introspection that flattens a value back into typed parts. Signatures
//! come in several variants (constructor and field signatures derived
//! from registered [`RecordSchema`]s, container signatures driven by token
//! hooks, and fully custom ones), but the matcher and the mapping
//! processor only ever see the trait.

mod container;
mod custom;
mod errors;
mod matcher;
mod record;
mod schema;
mod source;
#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use container::{MapSignature, SequenceSignature};
pub use custom::{CustomSignature, CustomSignatureBuilder};
pub use errors::SignatureError;
pub use matcher::{ElementMatch, ObjectMatch, SignatureMatcher};
pub use record::{ConstructorSignature, FieldSignature};
pub use schema::{Args, RecordSchema, SchemaBuilder};
pub use source::SignatureSource;

use crate::element::{ConfigElement, ConfigList, ConfigNode};
use crate::object::ObjectRef;
use crate::token::Token;

/// The declared argument count of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Exactly this many arguments
    Exact(usize),
    /// Any number of arguments (containers)
    Unbounded,
}

impl Length {
    /// Whether an input with `count` children satisfies this length
    pub fn admits(self, count: usize) -> bool {
        match self {
            Length::Exact(expected) => expected == count,
            Length::Unbounded => true,
        }
    }
}

/// One declared argument of a signature.
#[derive(Debug, Clone)]
pub struct Argument {
    /// The matching name; `None` for positional arguments
    pub name: Option<String>,
    /// The declared argument type
    pub ty: Token,
}

/// The argument list of a signature.
#[derive(Debug, Clone, Copy)]
pub enum Arguments<'a> {
    /// A fixed, ordered argument list (records, custom signatures)
    Fixed(&'a [Argument]),
    /// A uniform component type repeated per child (containers)
    Variable(&'a Token),
}

impl Arguments<'_> {
    /// The declared type of the argument at `index`
    pub fn type_at(&self, index: usize) -> Option<&Token> {
        match self {
            Arguments::Fixed(args) => args.get(index).map(|arg| &arg.ty),
            Arguments::Variable(ty) => Some(ty),
        }
    }
}

/// An argument resolved against an input, carrying its matching name when
/// the signature is named or the input was a node.
#[derive(Debug, Clone)]
pub struct BoundArgument {
    /// The element key or argument name this value was bound under
    pub name: Option<String>,
    /// The resolved value
    pub value: ObjectRef,
}

/// One introspected part of an object: its name (if any), declared type,
/// and value.
#[derive(Debug, Clone)]
pub struct TypedObject {
    /// The matching name; `None` for positional parts
    pub name: Option<String>,
    /// The declared type of the part
    pub ty: Token,
    /// The part's value
    pub value: ObjectRef,
}

/// The element shape a signature serializes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    /// An ordered list (positional signatures)
    List,
    /// A string-keyed node (named signatures)
    Node,
}

/// The record construction strategy a schema selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Build through the schema's construct closure (the default)
    #[default]
    Constructor,
    /// Build through the default constructor, then assign fields
    Field,
}

/// A callable construction recipe for one target type.
///
/// Implementations are shared across calls and threads; per-call state
/// lives in the mapping processor.
pub trait Signature: Send + Sync {
    /// The type this signature constructs
    fn return_type(&self) -> &Token;

    /// The declared argument list
    fn arguments(&self) -> Arguments<'_>;

    /// True when the matcher should bind arguments by name.
    ///
    /// Named signatures only match node elements.
    fn matches_argument_names(&self) -> bool;

    /// True when the matcher should check element/type compatibility per
    /// argument
    fn matches_type_hints(&self) -> bool;

    /// Tie-breaker among candidates; higher wins
    fn priority(&self) -> i32 {
        0
    }

    /// The expected argument count, possibly depending on the input
    /// element (container signatures size themselves from it)
    fn length(&self, element: Option<&ConfigElement>) -> Length;

    /// Whether this signature can populate a preallocated object.
    ///
    /// Prebuilt support is what lets cyclic inputs terminate: the
    /// processor registers the empty object in its cycle table before
    /// recursing into children.
    fn supports_prebuilt(&self) -> bool {
        false
    }

    /// Allocates the empty building object for prebuilt construction
    fn make_prebuilt(&self, element: &ConfigElement) -> Result<ObjectRef, SignatureError> {
        let _ = element;
        Err(SignatureError::UnsupportedPrebuilt {
            target: self.return_type().name().to_string(),
        })
    }

    /// Builds the target value from resolved arguments.
    ///
    /// `prebuilt` must only be passed when [`supports_prebuilt`] is true;
    /// signatures without prebuilt support fail with
    /// [`SignatureError::UnsupportedPrebuilt`].
    ///
    /// [`supports_prebuilt`]: Signature::supports_prebuilt
    fn build(
        &self,
        prebuilt: Option<ObjectRef>,
        args: Vec<BoundArgument>,
    ) -> Result<ObjectRef, SignatureError>;

    /// Flattens a value into its typed parts, the inverse of [`build`].
    ///
    /// [`build`]: Signature::build
    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError>;

    /// The element container this signature serializes into
    fn init_container(&self, size_hint: usize) -> ConfigElement {
        match self.preferred_shape() {
            ContainerShape::List => ConfigElement::List(ConfigList::with_capacity(size_hint)),
            ContainerShape::Node => ConfigElement::Node(ConfigNode::with_capacity(size_hint)),
        }
    }

    /// Whether this signature serializes to a list or a node
    fn preferred_shape(&self) -> ContainerShape;
}

/// Shared handle to a signature.
pub type SignatureRef = Arc<dyn Signature>;

pub(crate) fn check_argument_count(
    target: &Token,
    expected: usize,
    actual: usize,
) -> Result<(), SignatureError> {
    if expected != actual {
        return Err(SignatureError::ArgumentCount {
            target: target.name().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validates the all-named-or-all-unnamed rule for a fixed argument list.
pub(crate) fn validate_naming(target: &Token, args: &[Argument]) -> Result<bool, SignatureError> {
    let mut named = 0usize;
    for arg in args {
        if arg.name.is_some() {
            named += 1;
        }
    }
    if named != 0 && named != args.len() {
        return Err(SignatureError::shape(
            target.name(),
            "arguments must be all named or all unnamed",
        ));
    }
    Ok(named != 0)
}
