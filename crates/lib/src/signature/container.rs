//! Built-in signatures for generic containers.
//!
//! Containers do not need registered schemas: their construction hooks
//! were captured into the token when it was reflected. Growable sequences
//! and maps support prebuilt construction and can therefore participate
//! in cycles; fixed-size sequences build in one shot and cannot.

use crate::element::ConfigElement;
use crate::object::ObjectRef;
use crate::token::{MapHooks, SequenceHooks, Token, TokenError};

use super::{
    Arguments, BoundArgument, ContainerShape, Length, Signature, SignatureError, TypedObject,
};

/// Signature for list-, set-, and array-shaped containers.
pub struct SequenceSignature {
    token: Token,
    component: Token,
    hooks: SequenceHooks,
}

impl SequenceSignature {
    /// Derives the signature from a sequence token's hooks.
    ///
    /// Fails with `TypeUnavailable` for abstract tokens, which carry no
    /// hooks; the type resolver has to map those to a concrete backing
    /// first.
    pub fn from_token(token: &Token) -> Result<Self, SignatureError> {
        let Some(hooks) = token.sequence_hooks().copied() else {
            return Err(TokenError::TypeUnavailable {
                name: token.name().to_string(),
            }
            .into());
        };
        let Some(component) = token.arg(0).cloned() else {
            return Err(SignatureError::shape(
                token.name(),
                "sequence token has no component type",
            ));
        };
        Ok(Self {
            token: token.clone(),
            component,
            hooks,
        })
    }
}

impl Signature for SequenceSignature {
    fn return_type(&self) -> &Token {
        &self.token
    }

    fn arguments(&self) -> Arguments<'_> {
        Arguments::Variable(&self.component)
    }

    fn matches_argument_names(&self) -> bool {
        false
    }

    fn matches_type_hints(&self) -> bool {
        true
    }

    fn length(&self, element: Option<&ConfigElement>) -> Length {
        match element {
            Some(element) => Length::Exact(element.child_count()),
            None => Length::Unbounded,
        }
    }

    fn supports_prebuilt(&self) -> bool {
        self.hooks.new.is_some() && self.hooks.push.is_some()
    }

    fn make_prebuilt(&self, element: &ConfigElement) -> Result<ObjectRef, SignatureError> {
        match self.hooks.new {
            Some(new) => Ok(new(element.child_count())),
            None => Err(SignatureError::UnsupportedPrebuilt {
                target: self.token.name().to_string(),
            }),
        }
    }

    fn build(
        &self,
        prebuilt: Option<ObjectRef>,
        args: Vec<BoundArgument>,
    ) -> Result<ObjectRef, SignatureError> {
        if let Some(object) = prebuilt {
            let Some(push) = self.hooks.push else {
                return Err(SignatureError::UnsupportedPrebuilt {
                    target: self.token.name().to_string(),
                });
            };
            for arg in args {
                push(&object, arg.value)?;
            }
            return Ok(object);
        }

        let values = args.into_iter().map(|arg| arg.value).collect();
        Ok((self.hooks.collect)(values)?)
    }

    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError> {
        let items = (self.hooks.items)(object)?;
        Ok(items
            .into_iter()
            .map(|value| TypedObject {
                name: None,
                ty: self.component.clone(),
                value,
            })
            .collect())
    }

    fn preferred_shape(&self) -> ContainerShape {
        ContainerShape::List
    }
}

/// Signature for string-keyed maps.
///
/// The element model's node keys are strings, so a map's entries are the
/// node's (key, value) pairs directly; the argument type is the value
/// type, repeated per entry.
pub struct MapSignature {
    token: Token,
    value: Token,
    hooks: MapHooks,
}

impl MapSignature {
    /// Derives the signature from a map token's hooks
    pub fn from_token(token: &Token) -> Result<Self, SignatureError> {
        let Some(hooks) = token.map_hooks().copied() else {
            return Err(TokenError::TypeUnavailable {
                name: token.name().to_string(),
            }
            .into());
        };
        let Some(value) = token.arg(0).cloned() else {
            return Err(SignatureError::shape(
                token.name(),
                "map token has no value type",
            ));
        };
        Ok(Self {
            token: token.clone(),
            value,
            hooks,
        })
    }
}

impl Signature for MapSignature {
    fn return_type(&self) -> &Token {
        &self.token
    }

    fn arguments(&self) -> Arguments<'_> {
        Arguments::Variable(&self.value)
    }

    // Entries bind under their node keys; reporting name matching keeps
    // the matcher from offering list elements to a map.
    fn matches_argument_names(&self) -> bool {
        true
    }

    fn matches_type_hints(&self) -> bool {
        true
    }

    fn length(&self, element: Option<&ConfigElement>) -> Length {
        match element {
            Some(element) => Length::Exact(element.child_count()),
            None => Length::Unbounded,
        }
    }

    fn supports_prebuilt(&self) -> bool {
        true
    }

    fn make_prebuilt(&self, element: &ConfigElement) -> Result<ObjectRef, SignatureError> {
        Ok((self.hooks.new)(element.child_count()))
    }

    fn build(
        &self,
        prebuilt: Option<ObjectRef>,
        args: Vec<BoundArgument>,
    ) -> Result<ObjectRef, SignatureError> {
        let object = match prebuilt {
            Some(object) => object,
            None => (self.hooks.new)(args.len()),
        };
        for arg in args {
            let Some(key) = arg.name else {
                return Err(SignatureError::shape(
                    self.token.name(),
                    "map entries require keys",
                ));
            };
            (self.hooks.insert)(&object, key, arg.value)?;
        }
        Ok(object)
    }

    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError> {
        let entries = (self.hooks.entries)(object)?;
        Ok(entries
            .into_iter()
            .map(|(key, value)| TypedObject {
                name: Some(key),
                ty: self.value.clone(),
                value,
            })
            .collect())
    }

    fn preferred_shape(&self) -> ContainerShape {
        ContainerShape::Node
    }
}

impl std::fmt::Debug for SequenceSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceSignature")
            .field("token", &self.token)
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}
