//! Record schemas: registration-time type descriptions.
//!
//! Rust keeps field access private to the defining module and offers no
//! runtime reflection, so record types describe themselves to the mapper
//! once, at registration. A [`RecordSchema`] carries the pieces both
//! construction strategies draw from: an ordered parameter list with a
//! construct closure, and/or a default constructor with typed field
//! getters and setters. The schema builder is also where the annotation
//! semantics live: the wire name of a parameter or field is whatever name
//! is declared here (overriding the Rust name), explicit ordering keys
//! reorder fields, and declaring or omitting a field is what includes or
//! excludes it from mapping.

use std::sync::Arc;

use crate::convert::ConversionError;
use crate::object::ObjectRef;
use crate::token::{Reflect, Token};

use super::{Argument, SignatureError, Strategy, validate_naming};

pub(crate) type ConstructFn =
    Arc<dyn Fn(Vec<ObjectRef>) -> Result<ObjectRef, ConversionError> + Send + Sync>;
pub(crate) type DefaultFn = Arc<dyn Fn() -> ObjectRef + Send + Sync>;
pub(crate) type GetFn = Arc<dyn Fn(&ObjectRef) -> Result<ObjectRef, ConversionError> + Send + Sync>;
pub(crate) type SetFn =
    Arc<dyn Fn(&ObjectRef, ObjectRef) -> Result<(), ConversionError> + Send + Sync>;

/// Typed argument extractor handed to construct closures.
pub struct Args {
    items: std::vec::IntoIter<ObjectRef>,
}

impl Args {
    /// Extracts the next argument as a `P`
    pub fn next<P: Reflect>(&mut self) -> Result<P, ConversionError> {
        match self.items.next() {
            Some(object) => object.take::<P>(),
            None => Err(ConversionError::mismatch(
                "another argument",
                "end of argument list",
            )),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConstructorSpec {
    pub params: Vec<Argument>,
    pub named: bool,
    pub construct: ConstructFn,
}

#[derive(Clone)]
pub(crate) struct FieldSpec {
    pub name: String,
    pub ty: Token,
    pub order: Option<i32>,
    pub get: GetFn,
    pub set: Option<SetFn>,
}

/// A registered description of a record type.
///
/// Built with [`SchemaBuilder`] and registered on the mapper builder; the
/// signature source derives construction signatures from it.
#[derive(Clone)]
pub struct RecordSchema {
    token: Token,
    strategy: Option<Strategy>,
    priority: i32,
    constructor: Option<ConstructorSpec>,
    default_fn: Option<DefaultFn>,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub(crate) fn token(&self) -> &Token {
        &self.token
    }

    pub(crate) fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub(crate) fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn constructor(&self) -> Option<&ConstructorSpec> {
        self.constructor.as_ref()
    }

    pub(crate) fn default_fn(&self) -> Option<&DefaultFn> {
        self.default_fn.as_ref()
    }

    pub(crate) fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// Builder for [`RecordSchema`]s.
///
/// ```
/// # use graft::signature::SchemaBuilder;
/// # use graft::token::{Reflect, Token};
/// #[derive(Clone, Default)]
/// struct Server {
///     host: String,
///     port: i64,
/// }
///
/// impl Reflect for Server {
///     fn token() -> Token {
///         Token::concrete::<Server>("Server")
///     }
/// }
///
/// let schema = SchemaBuilder::<Server>::new()
///     .param::<String>("host")
///     .param::<i64>("port")
///     .construct(|args| {
///         Ok(Server {
///             host: args.next()?,
///             port: args.next()?,
///         })
///     })
///     .field::<String>("host", |s| s.host.clone())
///     .field::<i64>("port", |s| s.port)
///     .build()
///     .unwrap();
/// # let _ = schema;
/// ```
pub struct SchemaBuilder<T: Reflect> {
    token: Token,
    strategy: Option<Strategy>,
    priority: i32,
    params: Vec<Argument>,
    construct: Option<ConstructFn>,
    default_fn: Option<DefaultFn>,
    fields: Vec<FieldSpec>,
    error: Option<SignatureError>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Reflect> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reflect> SchemaBuilder<T> {
    /// Starts a schema for `T`
    pub fn new() -> Self {
        Self {
            token: T::token(),
            strategy: None,
            priority: 0,
            params: Vec::new(),
            construct: None,
            default_fn: None,
            fields: Vec::new(),
            error: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Selects the construction strategy explicitly.
    ///
    /// Without this the mapper's default strategy applies.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the priority of signatures derived from this schema
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Declares a named constructor parameter.
    ///
    /// The name is the wire name; it does not have to match any Rust
    /// field name.
    pub fn param<P: Reflect>(mut self, name: impl Into<String>) -> Self {
        self.params.push(Argument {
            name: Some(name.into()),
            ty: Token::of::<P>(),
        });
        self
    }

    /// Declares a positional constructor parameter
    pub fn param_unnamed<P: Reflect>(mut self) -> Self {
        self.params.push(Argument {
            name: None,
            ty: Token::of::<P>(),
        });
        self
    }

    /// Provides the construct closure consuming the declared parameters
    /// in order
    pub fn construct<F>(mut self, construct: F) -> Self
    where
        F: Fn(&mut Args) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(move |values: Vec<ObjectRef>| {
            let mut args = Args {
                items: values.into_iter(),
            };
            construct(&mut args).map(ObjectRef::new)
        }));
        self
    }

    /// Provides the default constructor used by the field strategy
    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_fn = Some(Arc::new(move || ObjectRef::new(default())));
        self
    }

    /// Declares a readable field.
    ///
    /// Readable fields back serialization: the constructor strategy reads
    /// the field whose declared name equals each parameter name.
    pub fn field<P: Reflect>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> P + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: Token::of::<P>(),
            order: None,
            get: Arc::new(move |object: &ObjectRef| {
                object.with_ref(|value: &T| ObjectRef::wrap(get(value)))
            }),
            set: None,
        });
        self
    }

    /// Declares a readable and assignable field, as the field strategy
    /// requires
    pub fn field_mut<P: Reflect>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> P + Send + Sync + 'static,
        set: impl Fn(&mut T, P) + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: Token::of::<P>(),
            order: None,
            get: Arc::new(move |object: &ObjectRef| {
                object.with_ref(|value: &T| ObjectRef::wrap(get(value)))
            }),
            set: Some(Arc::new(move |object: &ObjectRef, value: ObjectRef| {
                let value = value.take::<P>()?;
                object.with_mut(|target: &mut T| set(target, value))
            })),
        });
        self
    }

    /// Assigns an explicit ordering key to the most recently declared
    /// field. When any field carries one, fields are ordered by key
    /// ascending instead of declaration order.
    pub fn order(mut self, order: i32) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.order = Some(order),
            None => {
                self.error.get_or_insert(SignatureError::shape(
                    self.token.name(),
                    "order() must follow a field declaration",
                ));
            }
        }
        self
    }

    /// Validates and finishes the schema
    pub fn build(self) -> Result<RecordSchema, SignatureError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.token.type_id().is_none() {
            return Err(SignatureError::shape(
                self.token.name(),
                "record schemas require a concrete non-container type",
            ));
        }

        let named = validate_naming(&self.token, &self.params)?;

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SignatureError::shape(
                    self.token.name(),
                    format!("duplicate field name '{}'", field.name),
                ));
            }
        }

        if let Some(Strategy::Constructor) = self.strategy
            && self.construct.is_none()
        {
            return Err(SignatureError::shape(
                self.token.name(),
                "constructor strategy requires a construct closure",
            ));
        }
        if let Some(Strategy::Field) = self.strategy {
            if self.default_fn.is_none() {
                return Err(SignatureError::shape(
                    self.token.name(),
                    "field strategy requires a default constructor",
                ));
            }
            if self.fields.iter().any(|field| field.set.is_none()) {
                return Err(SignatureError::shape(
                    self.token.name(),
                    "field strategy requires every field to be assignable",
                ));
            }
        }

        let mut fields = self.fields;
        if fields.iter().any(|field| field.order.is_some()) {
            fields.sort_by_key(|field| field.order.unwrap_or(0));
        }

        let constructor = self.construct.map(|construct| ConstructorSpec {
            params: self.params,
            named,
            construct,
        });

        Ok(RecordSchema {
            token: self.token,
            strategy: self.strategy,
            priority: self.priority,
            constructor,
            default_fn: self.default_fn,
            fields,
        })
    }
}

impl std::fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("token", &self.token)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
