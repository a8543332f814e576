//! Type hinting: classification of tokens and elements into the three
//! element shapes, and the compatibility test the signature matcher uses
//! to gate candidates.

use std::sync::Arc;

use crate::convert::ScalarTable;
use crate::element::{ConfigElement, Scalar};
use crate::token::{ContainerKind, Token};

/// The three shapes a type or element can take on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementHint {
    /// Terminal value
    Scalar,
    /// Ordered sequence
    List,
    /// String-keyed mapping (also the record fallback)
    Node,
}

/// Classifies types and elements and tests their compatibility.
///
/// The hinter is total: every token classifies to exactly one
/// [`ElementHint`] and `assignable` never fails, it only answers.
#[derive(Clone)]
pub struct TypeHinter {
    scalars: Arc<ScalarTable>,
}

impl std::fmt::Debug for TypeHinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHinter").finish_non_exhaustive()
    }
}

impl TypeHinter {
    pub(crate) fn new(scalars: Arc<ScalarTable>) -> Self {
        Self { scalars }
    }

    /// Classifies a token.
    ///
    /// Rules, in order: sequence-shaped containers are LIST; map-shaped
    /// containers are NODE; types with a registered scalar handler are
    /// SCALAR; everything else is treated as a record, NODE. `Option`
    /// classifies as its payload.
    pub fn classify(&self, token: &Token) -> ElementHint {
        if token.is_optional() {
            return match token.arg(0) {
                Some(inner) => self.classify(inner),
                None => ElementHint::Node,
            };
        }

        match token.container_kind() {
            Some(ContainerKind::List | ContainerKind::Set | ContainerKind::Array) => {
                return ElementHint::List;
            }
            Some(ContainerKind::Map) => return ElementHint::Node,
            None => {}
        }

        match token.type_id() {
            Some(id) if self.scalars.contains(id) => ElementHint::Scalar,
            _ => ElementHint::Node,
        }
    }

    /// Classifies an element by its runtime variant
    pub fn classify_element(&self, element: &ConfigElement) -> ElementHint {
        match element {
            ConfigElement::Scalar(_) => ElementHint::Scalar,
            ConfigElement::List(_) => ElementHint::List,
            ConfigElement::Node(_) => ElementHint::Node,
        }
    }

    /// Whether `element` could map into the target type.
    ///
    /// `Any` targets accept everything. A null scalar is assignable only
    /// to targets that can express absence (`Option`, `Any`). For scalar
    /// targets the handler's kind-level acceptance is consulted, so
    /// numeric scalars are mutually assignable across numeric targets
    /// while text never assigns to a number; narrowing is checked later,
    /// at conversion.
    pub fn assignable(&self, element: &ConfigElement, token: &Token) -> bool {
        if token.is_any() {
            return true;
        }
        if token.is_optional() {
            return match (element, token.arg(0)) {
                (ConfigElement::Scalar(Scalar::Null), _) => true,
                (_, Some(inner)) => self.assignable(element, inner),
                (_, None) => false,
            };
        }

        match element {
            ConfigElement::Scalar(Scalar::Null) => false,
            ConfigElement::Scalar(scalar) => {
                if self.classify(token) != ElementHint::Scalar {
                    return false;
                }
                match token.type_id().and_then(|id| self.scalars.get(id)) {
                    Some(handler) => handler.accepts(scalar),
                    None => false,
                }
            }
            ConfigElement::List(_) => self.classify(token) == ElementHint::List,
            ConfigElement::Node(_) => self.classify(token) == ElementHint::Node,
        }
    }
}
