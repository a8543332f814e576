//! User-supplied signatures.

use std::sync::Arc;

use crate::element::ConfigElement;
use crate::object::ObjectRef;
use crate::token::Token;

use super::{
    Argument, Arguments, BoundArgument, ContainerShape, Length, Signature, SignatureError,
    TypedObject, validate_naming,
};

type BuildFn =
    Arc<dyn Fn(Option<ObjectRef>, Vec<BoundArgument>) -> Result<ObjectRef, SignatureError> + Send + Sync>;
type DataFn = Arc<dyn Fn(&ObjectRef) -> Result<Vec<TypedObject>, SignatureError> + Send + Sync>;
type PrebuiltFn = Arc<dyn Fn(&ConfigElement) -> Result<ObjectRef, SignatureError> + Send + Sync>;

/// A signature assembled from user closures.
///
/// Custom signatures take precedence over everything the source would
/// otherwise derive for their target type, and several can be registered
/// for one type with priorities deciding the order they are tried in.
pub struct CustomSignature {
    token: Token,
    args: Vec<Argument>,
    named: bool,
    hints: bool,
    priority: i32,
    build_fn: BuildFn,
    data_fn: Option<DataFn>,
    prebuilt_fn: Option<PrebuiltFn>,
}

impl CustomSignature {
    /// Starts building a custom signature for the given target type
    pub fn builder(token: Token) -> CustomSignatureBuilder {
        CustomSignatureBuilder {
            token,
            args: Vec::new(),
            hints: true,
            priority: 0,
            build_fn: None,
            data_fn: None,
            prebuilt_fn: None,
        }
    }
}

impl Signature for CustomSignature {
    fn return_type(&self) -> &Token {
        &self.token
    }

    fn arguments(&self) -> Arguments<'_> {
        Arguments::Fixed(&self.args)
    }

    fn matches_argument_names(&self) -> bool {
        self.named
    }

    fn matches_type_hints(&self) -> bool {
        self.hints
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn length(&self, element: Option<&ConfigElement>) -> Length {
        match element {
            Some(ConfigElement::Node(node)) if self.named => Length::Exact(node.len()),
            _ => Length::Exact(self.args.len()),
        }
    }

    fn supports_prebuilt(&self) -> bool {
        self.prebuilt_fn.is_some()
    }

    fn make_prebuilt(&self, element: &ConfigElement) -> Result<ObjectRef, SignatureError> {
        match &self.prebuilt_fn {
            Some(prebuilt) => prebuilt(element),
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
        if prebuilt.is_some() && self.prebuilt_fn.is_none() {
            return Err(SignatureError::UnsupportedPrebuilt {
                target: self.token.name().to_string(),
            });
        }
        (self.build_fn)(prebuilt, args)
    }

    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError> {
        match &self.data_fn {
            Some(data) => data(object),
            None => Err(SignatureError::shape(
                self.token.name(),
                "custom signature declares no introspection",
            )),
        }
    }

    fn preferred_shape(&self) -> ContainerShape {
        if self.named {
            ContainerShape::Node
        } else {
            ContainerShape::List
        }
    }
}

/// Builder for [`CustomSignature`].
pub struct CustomSignatureBuilder {
    token: Token,
    args: Vec<Argument>,
    hints: bool,
    priority: i32,
    build_fn: Option<BuildFn>,
    data_fn: Option<DataFn>,
    prebuilt_fn: Option<PrebuiltFn>,
}

impl CustomSignatureBuilder {
    /// Declares a named argument
    pub fn param(mut self, name: impl Into<String>, ty: Token) -> Self {
        self.args.push(Argument {
            name: Some(name.into()),
            ty,
        });
        self
    }

    /// Declares a positional argument
    pub fn param_unnamed(mut self, ty: Token) -> Self {
        self.args.push(Argument { name: None, ty });
        self
    }

    /// Disables per-argument type-hint checks during matching
    pub fn without_type_hints(mut self) -> Self {
        self.hints = false;
        self
    }

    /// Sets the candidate priority; higher is tried first
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Provides the build closure
    pub fn build_with<F>(mut self, build: F) -> Self
    where
        F: Fn(Option<ObjectRef>, Vec<BoundArgument>) -> Result<ObjectRef, SignatureError>
            + Send
            + Sync
            + 'static,
    {
        self.build_fn = Some(Arc::new(build));
        self
    }

    /// Provides the introspection closure used for serialization
    pub fn introspect_with<F>(mut self, data: F) -> Self
    where
        F: Fn(&ObjectRef) -> Result<Vec<TypedObject>, SignatureError> + Send + Sync + 'static,
    {
        self.data_fn = Some(Arc::new(data));
        self
    }

    /// Provides the prebuilt allocator, enabling cycle participation
    pub fn prebuilt_with<F>(mut self, prebuilt: F) -> Self
    where
        F: Fn(&ConfigElement) -> Result<ObjectRef, SignatureError> + Send + Sync + 'static,
    {
        self.prebuilt_fn = Some(Arc::new(prebuilt));
        self
    }

    /// Validates and finishes the signature
    pub fn build(self) -> Result<CustomSignature, SignatureError> {
        let named = validate_naming(&self.token, &self.args)?;
        let Some(build_fn) = self.build_fn else {
            return Err(SignatureError::shape(
                self.token.name(),
                "custom signature declares no build closure",
            ));
        };
        Ok(CustomSignature {
            token: self.token,
            args: self.args,
            named,
            hints: self.hints,
            priority: self.priority,
            build_fn,
            data_fn: self.data_fn,
            prebuilt_fn: self.prebuilt_fn,
        })
    }
}
