//! The type resolver: abstract tokens to concrete implementations.

use indexmap::IndexMap;

use std::collections::HashMap;

use crate::element::ConfigElement;
use crate::hint::TypeHinter;
use crate::object::ObjectRef;
use crate::token::Token;

use super::MapperError;

/// Maps abstract tokens to concrete, constructible ones.
///
/// Two kinds of resolution happen here. Registered mappings turn
/// hook-less tokens (runtime-parameterized containers, user-declared
/// abstract types) into registered concrete instantiations. `Any` targets
/// resolve from the element's shape instead: scalars to their natural
/// Rust types, lists and nodes to the dynamic containers
/// (`Vec<ObjectRef>` and `IndexMap<String, ObjectRef>` unless remapped).
#[derive(Default)]
pub struct TypeResolver {
    impls: HashMap<Token, Token>,
}

impl TypeResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a concrete implementation for an abstract token.
    ///
    /// The implementation must classify to the same element shape as the
    /// token it stands in for.
    pub(crate) fn register(
        &mut self,
        abstract_token: Token,
        concrete: Token,
        hinter: &TypeHinter,
    ) -> Result<(), MapperError> {
        if hinter.classify(&abstract_token) != hinter.classify(&concrete) {
            return Err(MapperError::IncompatibleImplementation {
                abstract_type: abstract_token.name().to_string(),
                concrete: concrete.name().to_string(),
            });
        }
        self.impls.insert(abstract_token, concrete);
        Ok(())
    }

    /// Resolves a declared token to the one construction goes through
    pub fn resolve(&self, token: &Token) -> Token {
        self.impls.get(token).cloned().unwrap_or_else(|| token.clone())
    }

    /// Resolves the `Any` target against an element's shape
    pub fn resolve_any(&self, element: &ConfigElement) -> Token {
        match element {
            ConfigElement::Scalar(scalar) => {
                use crate::element::Scalar;
                match scalar {
                    Scalar::Null => Token::any(),
                    Scalar::Bool(_) => Token::of::<bool>(),
                    Scalar::Int(_) => Token::of::<i64>(),
                    Scalar::Float(_) => Token::of::<f64>(),
                    Scalar::Text(_) => Token::of::<String>(),
                }
            }
            ConfigElement::List(_) => {
                let declared = Token::list_of(Token::any());
                self.impls
                    .get(&declared)
                    .cloned()
                    .unwrap_or_else(Token::of::<Vec<ObjectRef>>)
            }
            ConfigElement::Node(_) => {
                let declared = Token::map_of(Token::any());
                self.impls
                    .get(&declared)
                    .cloned()
                    .unwrap_or_else(Token::of::<IndexMap<String, ObjectRef>>)
            }
        }
    }
}
