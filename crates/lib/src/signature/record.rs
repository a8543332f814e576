//! Construction signatures derived from record schemas.

use crate::element::ConfigElement;
use crate::object::ObjectRef;
use crate::token::Token;

use super::schema::{ConstructFn, DefaultFn, FieldSpec, RecordSchema};
use super::{
    Argument, Arguments, BoundArgument, ContainerShape, Length, Signature, SignatureError,
    TypedObject, check_argument_count,
};

/// Builds records by invoking the schema's construct closure.
///
/// Does not support prebuilt objects: a value under construction cannot
/// be observed before its constructor runs, so cyclic inputs that pass
/// through this signature are reported rather than resolved.
pub struct ConstructorSignature {
    token: Token,
    params: Vec<Argument>,
    named: bool,
    construct: ConstructFn,
    fields: Vec<FieldSpec>,
    priority: i32,
}

impl ConstructorSignature {
    /// Derives the constructor signature of a schema.
    ///
    /// Fails when the schema declares no construct closure.
    pub fn from_schema(schema: &RecordSchema) -> Result<Self, SignatureError> {
        let Some(spec) = schema.constructor() else {
            return Err(SignatureError::shape(
                schema.token().name(),
                "schema declares no construct closure",
            ));
        };
        Ok(Self {
            token: schema.token().clone(),
            params: spec.params.clone(),
            named: spec.named,
            construct: spec.construct.clone(),
            fields: schema.fields().to_vec(),
            priority: schema.priority(),
        })
    }

    fn field_for_param(&self, index: usize) -> Option<&FieldSpec> {
        let param = self.params.get(index)?;
        match &param.name {
            Some(name) => self.fields.iter().find(|field| &field.name == name),
            None => self.fields.get(index),
        }
    }
}

impl Signature for ConstructorSignature {
    fn return_type(&self) -> &Token {
        &self.token
    }

    fn arguments(&self) -> Arguments<'_> {
        Arguments::Fixed(&self.params)
    }

    fn matches_argument_names(&self) -> bool {
        self.named
    }

    fn matches_type_hints(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn length(&self, element: Option<&ConfigElement>) -> Length {
        // Named signatures bind by key, so surplus keys on the input node
        // are ignored; positional ones need an exact child count.
        match element {
            Some(ConfigElement::Node(node)) if self.named => Length::Exact(node.len()),
            _ => Length::Exact(self.params.len()),
        }
    }

    fn build(
        &self,
        prebuilt: Option<ObjectRef>,
        args: Vec<BoundArgument>,
    ) -> Result<ObjectRef, SignatureError> {
        if prebuilt.is_some() {
            return Err(SignatureError::UnsupportedPrebuilt {
                target: self.token.name().to_string(),
            });
        }
        check_argument_count(&self.token, self.params.len(), args.len())?;

        let values = args.into_iter().map(|arg| arg.value).collect();
        Ok((self.construct)(values)?)
    }

    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError> {
        let mut data = Vec::with_capacity(self.params.len());
        for (index, param) in self.params.iter().enumerate() {
            let Some(field) = self.field_for_param(index) else {
                return Err(SignatureError::shape(
                    self.token.name(),
                    match &param.name {
                        Some(name) => format!("no readable field matching parameter '{name}'"),
                        None => format!("no readable field for parameter {index}"),
                    },
                ));
            };
            data.push(TypedObject {
                name: param.name.clone(),
                ty: field.ty.clone(),
                value: (field.get)(object)?,
            });
        }
        Ok(data)
    }

    fn preferred_shape(&self) -> ContainerShape {
        if self.named {
            ContainerShape::Node
        } else {
            ContainerShape::List
        }
    }
}

/// Builds records by invoking the default constructor, then assigning
/// fields.
///
/// Supports prebuilt objects, which is what lets self-referential records
/// round-trip: the empty value is registered in the cycle table before
/// any field resolves.
pub struct FieldSignature {
    token: Token,
    args: Vec<Argument>,
    fields: Vec<FieldSpec>,
    default_fn: DefaultFn,
    priority: i32,
}

impl FieldSignature {
    /// Derives the field signature of a schema.
    ///
    /// Fails when the schema declares no default constructor or a field
    /// without a setter.
    pub fn from_schema(schema: &RecordSchema) -> Result<Self, SignatureError> {
        let Some(default_fn) = schema.default_fn() else {
            return Err(SignatureError::shape(
                schema.token().name(),
                "schema declares no default constructor",
            ));
        };
        for field in schema.fields() {
            if field.set.is_none() {
                return Err(SignatureError::shape(
                    schema.token().name(),
                    format!("field '{}' is not assignable", field.name),
                ));
            }
        }

        let args = schema
            .fields()
            .iter()
            .map(|field| Argument {
                name: Some(field.name.clone()),
                ty: field.ty.clone(),
            })
            .collect();

        Ok(Self {
            token: schema.token().clone(),
            args,
            fields: schema.fields().to_vec(),
            default_fn: default_fn.clone(),
            priority: schema.priority(),
        })
    }
}

impl Signature for FieldSignature {
    fn return_type(&self) -> &Token {
        &self.token
    }

    fn arguments(&self) -> Arguments<'_> {
        Arguments::Fixed(&self.args)
    }

    fn matches_argument_names(&self) -> bool {
        true
    }

    fn matches_type_hints(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn length(&self, element: Option<&ConfigElement>) -> Length {
        // Surplus keys on the input node are ignored; every declared
        // field must still be present for the name walk to succeed.
        match element {
            Some(ConfigElement::Node(node)) => Length::Exact(node.len()),
            _ => Length::Exact(self.fields.len()),
        }
    }

    fn supports_prebuilt(&self) -> bool {
        true
    }

    fn make_prebuilt(&self, _element: &ConfigElement) -> Result<ObjectRef, SignatureError> {
        Ok((self.default_fn)())
    }

    fn build(
        &self,
        prebuilt: Option<ObjectRef>,
        args: Vec<BoundArgument>,
    ) -> Result<ObjectRef, SignatureError> {
        check_argument_count(&self.token, self.fields.len(), args.len())?;

        let object = prebuilt.unwrap_or_else(|| (self.default_fn)());
        for (field, arg) in self.fields.iter().zip(args) {
            let Some(set) = &field.set else {
                return Err(SignatureError::shape(
                    self.token.name(),
                    format!("field '{}' is not assignable", field.name),
                ));
            };
            set(&object, arg.value)?;
        }
        Ok(object)
    }

    fn object_data(&self, object: &ObjectRef) -> Result<Vec<TypedObject>, SignatureError> {
        let mut data = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            data.push(TypedObject {
                name: Some(field.name.clone()),
                ty: field.ty.clone(),
                value: (field.get)(object)?,
            });
        }
        Ok(data)
    }

    fn preferred_shape(&self) -> ContainerShape {
        ContainerShape::Node
    }
}
