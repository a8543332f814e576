//! Candidate iteration: choosing a signature for one target type.

use tracing::trace;

use crate::element::ConfigElement;
use crate::hint::TypeHinter;
use crate::object::ObjectRef;
use crate::token::Token;

use super::{Arguments, SignatureError, SignatureRef, TypedObject};

/// A chosen signature paired with the input's children in argument order.
pub struct ElementMatch {
    /// The winning signature
    pub signature: SignatureRef,
    /// The element's children, reordered by argument name for named
    /// signatures, in natural order otherwise
    pub children: Vec<(Option<String>, ConfigElement)>,
}

/// A chosen signature paired with the object's introspected parts in
/// argument order.
pub struct ObjectMatch {
    /// The winning signature
    pub signature: SignatureRef,
    /// The introspected parts, projected to argument order
    pub objects: Vec<TypedObject>,
}

/// Matches inputs against the candidate signatures of one target type.
///
/// Candidates are tried in descending priority; candidates of equal
/// priority keep their registration order. A candidate failing any check
/// is skipped, never raised; exhaustion is the only failure.
pub struct SignatureMatcher {
    signatures: Vec<SignatureRef>,
    hinter: TypeHinter,
}

impl SignatureMatcher {
    /// Creates a matcher over the given candidates
    pub fn new(mut signatures: Vec<SignatureRef>, hinter: TypeHinter) -> Self {
        signatures.sort_by_key(|signature| std::cmp::Reverse(signature.priority()));
        Self { signatures, hinter }
    }

    /// Selects a signature for deserializing `element` into `target`.
    pub fn match_element(
        &self,
        target: &Token,
        element: &ConfigElement,
    ) -> Result<ElementMatch, SignatureError> {
        for signature in &self.signatures {
            if signature.return_type() != target {
                continue;
            }

            let named = signature.matches_argument_names();
            if named && !element.is_node() {
                trace!(ty = target.name(), "skipping named candidate: input is not a node");
                continue;
            }
            if !element.is_container() {
                continue;
            }

            let natural = element.children();
            if !signature.length(Some(element)).admits(natural.len()) {
                trace!(ty = target.name(), "skipping candidate: length mismatch");
                continue;
            }

            let hints = signature.matches_type_hints();
            if !named && !hints {
                return Ok(ElementMatch {
                    signature: signature.clone(),
                    children: natural,
                });
            }

            let bound = if named {
                match signature.arguments() {
                    Arguments::Fixed(args) => {
                        // Walking the signature's own argument list is what
                        // makes binding independent of the input key order.
                        let Some(node) = element.as_node() else {
                            continue;
                        };
                        let mut bound = Vec::with_capacity(args.len());
                        let mut complete = true;
                        for arg in args {
                            let child = arg.name.as_deref().and_then(|name| node.get(name));
                            match child {
                                Some(child) => bound.push((arg.name.clone(), child)),
                                None => {
                                    complete = false;
                                    break;
                                }
                            }
                        }
                        if !complete {
                            trace!(
                                ty = target.name(),
                                "skipping candidate: missing named argument"
                            );
                            continue;
                        }
                        bound
                    }
                    // Variable named signatures (maps) bind every entry
                    // under its own key.
                    Arguments::Variable(_) => natural,
                }
            } else {
                natural
            };

            if hints {
                let arguments = signature.arguments();
                let compatible = bound.iter().enumerate().all(|(index, (_, child))| {
                    arguments
                        .type_at(index)
                        .is_some_and(|ty| self.hinter.assignable(child, ty))
                });
                if !compatible {
                    trace!(ty = target.name(), "skipping candidate: type hint mismatch");
                    continue;
                }
            }

            return Ok(ElementMatch {
                signature: signature.clone(),
                children: bound,
            });
        }

        Err(SignatureError::NoMatchingSignature {
            target: target.name().to_string(),
            input: element.digest(),
        })
    }

    /// Selects a signature for serializing `object` as a `target`.
    pub fn match_object(
        &self,
        target: &Token,
        object: &ObjectRef,
    ) -> Result<ObjectMatch, SignatureError> {
        for signature in &self.signatures {
            if signature.return_type() != target {
                continue;
            }

            let data = match signature.object_data(object) {
                Ok(data) => data,
                Err(error) => {
                    trace!(
                        ty = target.name(),
                        %error,
                        "skipping candidate: introspection failed"
                    );
                    continue;
                }
            };

            if !signature.length(None).admits(data.len()) {
                continue;
            }

            let named = signature.matches_argument_names();
            let hints = signature.matches_type_hints();
            if !named && !hints {
                return Ok(ObjectMatch {
                    signature: signature.clone(),
                    objects: data,
                });
            }

            let ordered = if named {
                match signature.arguments() {
                    Arguments::Fixed(args) => {
                        let mut by_name: std::collections::HashMap<&str, &TypedObject> = data
                            .iter()
                            .filter_map(|part| part.name.as_deref().map(|name| (name, part)))
                            .collect();
                        let mut ordered = Vec::with_capacity(args.len());
                        let mut complete = true;
                        for arg in args {
                            let part = arg.name.as_deref().and_then(|name| by_name.remove(name));
                            match part {
                                Some(part) => ordered.push(part.clone()),
                                None => {
                                    complete = false;
                                    break;
                                }
                            }
                        }
                        if !complete {
                            continue;
                        }
                        ordered
                    }
                    Arguments::Variable(_) => data,
                }
            } else {
                data
            };

            if hints {
                let arguments = signature.arguments();
                let compatible = ordered.iter().enumerate().all(|(index, part)| {
                    arguments.type_at(index).is_some_and(|ty| {
                        ty.is_any() || self.hinter.classify(&part.ty) == self.hinter.classify(ty)
                    })
                });
                if !compatible {
                    continue;
                }
            }

            return Ok(ObjectMatch {
                signature: signature.clone(),
                objects: ordered,
            });
        }

        Err(SignatureError::NoMatchingSignature {
            target: target.name().to_string(),
            input: format!("object of type {}", object.token().name()),
        })
    }
}

impl std::fmt::Debug for ElementMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementMatch")
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SignatureMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureMatcher")
            .field("hinter", &self.hinter)
            .finish_non_exhaustive()
    }
}
