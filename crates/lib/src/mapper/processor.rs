//! The recursive mapping driver.
//!
//! Both directions run depth-first over an explicit work stack rather
//! than the call stack: deep inputs cannot overflow, and the
//! register-prebuilt-before-recursing step that makes cyclic inputs
//! terminate is a visible line of code instead of an ordering accident.
//!
//! Child visitation order is deterministic: list children in insertion
//! order, node children in the matched signature's argument order.

use std::collections::HashSet;

use tracing::trace;

use crate::convert::{ConversionError, ScalarTable};
use crate::element::ConfigElement;
use crate::hint::{ElementHint, TypeHinter};
use crate::object::ObjectRef;
use crate::signature::{BoundArgument, SignatureError, SignatureRef, SignatureSource, TypedObject};
use crate::token::{Token, TokenError};

use super::MapperError;
use super::cycle::IdentityTable;
use super::resolver::TypeResolver;

pub(crate) struct MappingProcessor<'m> {
    pub source: &'m SignatureSource,
    pub hinter: &'m TypeHinter,
    pub resolver: &'m TypeResolver,
    pub scalars: &'m ScalarTable,
}

// ---------------------------------------------------------------------
// Element → object
// ---------------------------------------------------------------------

enum DeStep {
    Done(ObjectRef),
    Recurse(Box<DeFrame>),
}

enum DeCompletion {
    /// Build through the matched signature once all children resolved
    Build {
        signature: SignatureRef,
        prebuilt: Option<ObjectRef>,
        /// Whether this element was marked in-progress for cycle
        /// detection (non-prebuilt signatures only)
        tracked: bool,
    },
    /// Wrap the single resolved child in `Some` via the optional hooks
    WrapOptional,
}

struct DeFrame {
    target: Token,
    element: ConfigElement,
    completion: DeCompletion,
    pending: std::vec::IntoIter<(Option<String>, Token, ConfigElement)>,
    args: Vec<BoundArgument>,
    /// Name this frame's result binds under in the parent's argument list
    bind_name: Option<String>,
}

impl MappingProcessor<'_> {
    /// Maps an element into an object of the target type.
    pub fn element_to_object(
        &self,
        target: &Token,
        element: &ConfigElement,
    ) -> Result<ObjectRef, MapperError> {
        // Breadcrumbs mirror the work stack plus the child in flight, so
        // a failure anywhere names its full path.
        let mut breadcrumbs: Vec<String> = Vec::new();
        self.drive_element(target, element, &mut breadcrumbs)
            .map_err(|source| MapperError::Process {
                path: join_path(&breadcrumbs),
                target: target.name().to_string(),
                source: Box::new(source.into()),
            })
    }

    fn drive_element(
        &self,
        target: &Token,
        element: &ConfigElement,
        breadcrumbs: &mut Vec<String>,
    ) -> Result<ObjectRef, MapperError> {
        let mut stack: Vec<DeFrame> = Vec::new();
        let mut table = IdentityTable::new();
        let mut in_progress = HashSet::new();

        match self.step_element(target, element, &mut table, &mut in_progress)? {
            DeStep::Done(object) => return Ok(object),
            DeStep::Recurse(frame) => stack.push(*frame),
        }

        while !stack.is_empty() {
            let top = stack.len() - 1;
            if let Some((name, child_ty, child_el)) = stack[top].pending.next() {
                breadcrumbs.push(slot_label(name.as_deref(), stack[top].args.len()));
                let step = self.step_element(&child_ty, &child_el, &mut table, &mut in_progress)?;
                match step {
                    DeStep::Done(object) => {
                        breadcrumbs.pop();
                        stack[top].args.push(BoundArgument { name, value: object });
                    }
                    DeStep::Recurse(mut next) => {
                        next.bind_name = name;
                        stack.push(*next);
                    }
                }
                continue;
            }

            let Some(finished) = stack.pop() else { break };
            let bind_name = finished.bind_name.clone();
            let object = self.complete_element(finished, &mut table, &mut in_progress)?;
            match stack.last_mut() {
                Some(parent) => {
                    breadcrumbs.pop();
                    parent.args.push(BoundArgument {
                        name: bind_name,
                        value: object,
                    });
                }
                None => return Ok(object),
            }
        }

        unreachable!("mapping loop ended without producing a result");
    }

    fn step_element(
        &self,
        target: &Token,
        element: &ConfigElement,
        table: &mut IdentityTable<ObjectRef>,
        in_progress: &mut HashSet<usize>,
    ) -> Result<DeStep, MapperError> {
        let resolved = if target.is_any() {
            self.resolver.resolve_any(element)
        } else {
            self.resolver.resolve(target)
        };

        // Only the null scalar resolves back to Any.
        if resolved.is_any() {
            return Ok(DeStep::Done(ObjectRef::null()));
        }

        if resolved.is_optional() {
            let Some(hooks) = resolved.optional_hooks().copied() else {
                return Err(TokenError::TypeUnavailable {
                    name: resolved.name().to_string(),
                }
                .into());
            };
            if element.is_null() {
                return Ok(DeStep::Done((hooks.none)()));
            }
            let Some(inner) = resolved.arg(0).cloned() else {
                return Err(TokenError::TypeUnavailable {
                    name: resolved.name().to_string(),
                }
                .into());
            };
            return Ok(DeStep::Recurse(Box::new(DeFrame {
                target: resolved.clone(),
                element: element.clone(),
                completion: DeCompletion::WrapOptional,
                pending: vec![(None, inner, element.clone())].into_iter(),
                args: Vec::new(),
                bind_name: None,
            })));
        }

        if self.hinter.classify(&resolved) == ElementHint::Scalar {
            let ConfigElement::Scalar(scalar) = element else {
                return Err(
                    ConversionError::mismatch(resolved.name(), element.type_name()).into(),
                );
            };
            let Some(handler) = resolved.type_id().and_then(|id| self.scalars.get(id)) else {
                return Err(ConversionError::NoHandler {
                    ty: resolved.name().to_string(),
                }
                .into());
            };
            return Ok(DeStep::Done(handler.from_scalar(scalar)?));
        }

        if let Some(id) = element.ptr_id() {
            if let Some(existing) = table.get(id) {
                trace!(ty = resolved.name(), "cycle table hit");
                return Ok(DeStep::Done(existing));
            }
            if in_progress.contains(&id) {
                return Err(MapperError::CycleRequiresPrebuilt {
                    target: resolved.name().to_string(),
                });
            }
        }

        let matcher = self.source.matcher_for(&resolved)?;
        let matched = matcher.match_element(&resolved, element)?;
        let signature = matched.signature;

        let mut pending = Vec::with_capacity(matched.children.len());
        {
            let arguments = signature.arguments();
            for (index, (name, child)) in matched.children.into_iter().enumerate() {
                let Some(child_ty) = arguments.type_at(index).cloned() else {
                    return Err(SignatureError::ArgumentCount {
                        target: resolved.name().to_string(),
                        expected: index,
                        actual: index + 1,
                    }
                    .into());
                };
                pending.push((name, child_ty, child));
            }
        }

        let mut prebuilt = None;
        let mut tracked = false;
        if let Some(id) = element.ptr_id() {
            if signature.supports_prebuilt() {
                // Binding the empty value before any child resolves is
                // what lets self-references find it.
                let building = signature.make_prebuilt(element)?;
                table.insert(id, building.clone());
                prebuilt = Some(building);
            } else {
                in_progress.insert(id);
                tracked = true;
            }
        }

        Ok(DeStep::Recurse(Box::new(DeFrame {
            target: resolved,
            element: element.clone(),
            completion: DeCompletion::Build {
                signature,
                prebuilt,
                tracked,
            },
            pending: pending.into_iter(),
            args: Vec::new(),
            bind_name: None,
        })))
    }

    fn complete_element(
        &self,
        frame: DeFrame,
        table: &mut IdentityTable<ObjectRef>,
        in_progress: &mut HashSet<usize>,
    ) -> Result<ObjectRef, MapperError> {
        match frame.completion {
            DeCompletion::WrapOptional => {
                let Some(hooks) = frame.target.optional_hooks().copied() else {
                    return Err(TokenError::TypeUnavailable {
                        name: frame.target.name().to_string(),
                    }
                    .into());
                };
                let mut args = frame.args;
                let Some(inner) = args.pop() else {
                    return Err(ConversionError::mismatch(
                        "a resolved optional payload",
                        "an empty argument list",
                    )
                    .into());
                };
                Ok((hooks.some)(inner.value)?)
            }
            DeCompletion::Build {
                signature,
                prebuilt,
                tracked,
            } => {
                let object = signature.build(prebuilt, frame.args)?;
                if let Some(id) = frame.element.ptr_id() {
                    if tracked {
                        in_progress.remove(&id);
                    }
                    table.insert(id, object.clone());
                }
                Ok(object)
            }
        }
    }
}

// ---------------------------------------------------------------------
// Object → element
// ---------------------------------------------------------------------

enum SerStep {
    Done(ConfigElement),
    Recurse(Box<SerFrame>),
}

struct SerFrame {
    target: Token,
    container: ConfigElement,
    pending: std::vec::IntoIter<TypedObject>,
    /// Name this frame's container binds under in the parent container
    bind_name: Option<String>,
}

impl MappingProcessor<'_> {
    /// Maps an object into an element.
    pub fn object_to_element(
        &self,
        target: &Token,
        object: &ObjectRef,
    ) -> Result<ConfigElement, MapperError> {
        let mut breadcrumbs: Vec<String> = Vec::new();
        self.drive_object(target, object, &mut breadcrumbs)
            .map_err(|source| MapperError::Process {
                path: join_path(&breadcrumbs),
                target: target.name().to_string(),
                source: Box::new(source.into()),
            })
    }

    fn drive_object(
        &self,
        target: &Token,
        object: &ObjectRef,
        breadcrumbs: &mut Vec<String>,
    ) -> Result<ConfigElement, MapperError> {
        let mut stack: Vec<SerFrame> = Vec::new();
        let mut table = IdentityTable::new();

        match self.step_object(target, object, &mut table)? {
            SerStep::Done(element) => return Ok(element),
            SerStep::Recurse(frame) => stack.push(*frame),
        }

        while !stack.is_empty() {
            let top = stack.len() - 1;
            if let Some(part) = stack[top].pending.next() {
                breadcrumbs.push(slot_label(
                    part.name.as_deref(),
                    stack[top].container.child_count(),
                ));
                let step = self.step_object(&part.ty, &part.value, &mut table)?;
                match step {
                    SerStep::Done(element) => {
                        breadcrumbs.pop();
                        append_child(&stack[top].target, &stack[top].container, part.name, element)?;
                    }
                    SerStep::Recurse(mut next) => {
                        next.bind_name = part.name;
                        stack.push(*next);
                    }
                }
                continue;
            }

            let Some(finished) = stack.pop() else { break };
            match stack.last_mut() {
                Some(parent) => {
                    breadcrumbs.pop();
                    append_child(
                        &parent.target,
                        &parent.container,
                        finished.bind_name,
                        finished.container,
                    )?;
                }
                None => return Ok(finished.container),
            }
        }

        unreachable!("mapping loop ended without producing a result");
    }

    fn step_object(
        &self,
        target: &Token,
        object: &ObjectRef,
        table: &mut IdentityTable<ConfigElement>,
    ) -> Result<SerStep, MapperError> {
        if object.is_null() {
            return Ok(SerStep::Done(ConfigElement::null()));
        }

        let resolved = if target.is_any() {
            object.token().clone()
        } else {
            self.resolver.resolve(target)
        };

        if resolved.is_optional() {
            let Some(hooks) = resolved.optional_hooks().copied() else {
                return Err(TokenError::TypeUnavailable {
                    name: resolved.name().to_string(),
                }
                .into());
            };
            return match (hooks.unwrap)(object)? {
                None => Ok(SerStep::Done(ConfigElement::null())),
                // The optional layer is invisible on the wire.
                Some(inner) => {
                    let Some(inner_ty) = resolved.arg(0) else {
                        return Err(TokenError::TypeUnavailable {
                            name: resolved.name().to_string(),
                        }
                        .into());
                    };
                    self.step_object(inner_ty, &inner, table)
                }
            };
        }

        if self.hinter.classify(&resolved) == ElementHint::Scalar {
            let Some(handler) = resolved.type_id().and_then(|id| self.scalars.get(id)) else {
                return Err(ConversionError::NoHandler {
                    ty: resolved.name().to_string(),
                }
                .into());
            };
            return Ok(SerStep::Done(ConfigElement::Scalar(
                handler.to_scalar(object)?,
            )));
        }

        if let Some(existing) = table.get(object.ptr_id()) {
            trace!(ty = resolved.name(), "cycle table hit");
            return Ok(SerStep::Done(existing));
        }

        let matcher = self.source.matcher_for(&resolved)?;
        let matched = matcher.match_object(&resolved, object)?;

        let container = matched.signature.init_container(matched.objects.len());
        // Bound before recursing so self-references resolve to it.
        table.insert(object.ptr_id(), container.clone());

        Ok(SerStep::Recurse(Box::new(SerFrame {
            target: resolved,
            container,
            pending: matched.objects.into_iter(),
            bind_name: None,
        })))
    }
}

fn append_child(
    target: &Token,
    container: &ConfigElement,
    name: Option<String>,
    child: ConfigElement,
) -> Result<(), MapperError> {
    match container {
        ConfigElement::List(list) => {
            list.push(child);
            Ok(())
        }
        ConfigElement::Node(node) => match name {
            Some(name) => {
                node.insert(name, child);
                Ok(())
            }
            None => Err(SignatureError::shape(
                target.name(),
                "node containers require named parts",
            )
            .into()),
        },
        ConfigElement::Scalar(_) => Err(SignatureError::shape(
            target.name(),
            "signature produced a scalar container",
        )
        .into()),
    }
}

fn slot_label(name: Option<&str>, index: usize) -> String {
    match name {
        Some(name) => format!(".{name}"),
        None => format!("[{index}]"),
    }
}

fn join_path(breadcrumbs: &[String]) -> String {
    let mut path = String::from("$");
    for crumb in breadcrumbs {
        path.push_str(crumb);
    }
    path
}
