//! The mapper: configuration elements to object graphs and back.
//!
//! A [`Mapper`] is assembled once through [`MapperBuilder`]; schemas,
//! custom signatures, enums, and resolver mappings all register before
//! [`build`](MapperBuilder::build), and the result is an immutable snapshot
//! that can be shared and used concurrently. Each top-level call runs the
//! mapping processor with call-local state.

mod cycle;
mod errors;
mod processor;
mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

pub use errors::MapperError;
pub use resolver::TypeResolver;

use crate::convert::ScalarTable;
use crate::element::ConfigElement;
use crate::hint::TypeHinter;
use crate::object::ObjectRef;
use crate::signature::{
    RecordSchema, Signature, SignatureRef, SignatureSource, Strategy,
};
use crate::token::{Reflect, Token};

use processor::MappingProcessor;

struct MapperInner {
    source: SignatureSource,
    hinter: TypeHinter,
    resolver: TypeResolver,
    scalars: Arc<ScalarTable>,
}

/// The bidirectional object mapper.
///
/// ```
/// # use graft::element::{ConfigElement, ConfigNode};
/// # use graft::mapper::Mapper;
/// # use graft::signature::SchemaBuilder;
/// # use graft::token::{Reflect, Token};
/// #[derive(Clone, Debug, PartialEq)]
/// struct Limits {
///     retries: i64,
///     verbose: bool,
/// }
///
/// impl Reflect for Limits {
///     fn token() -> Token {
///         Token::concrete::<Limits>("Limits")
///     }
/// }
///
/// let mapper = Mapper::builder()
///     .register_schema(
///         SchemaBuilder::<Limits>::new()
///             .param::<i64>("retries")
///             .param::<bool>("verbose")
///             .construct(|args| {
///                 Ok(Limits {
///                     retries: args.next()?,
///                     verbose: args.next()?,
///                 })
///             })
///             .field::<i64>("retries", |l| l.retries)
///             .field::<bool>("verbose", |l| l.verbose)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// let node: ConfigNode = [
///     ("retries", ConfigElement::from(3)),
///     ("verbose", ConfigElement::from(true)),
/// ]
/// .into_iter()
/// .collect();
///
/// let limits: Limits = mapper.data_from_element(&node.into()).unwrap();
/// assert_eq!(limits, Limits { retries: 3, verbose: true });
///
/// let back = mapper.element_from_data(&limits).unwrap();
/// assert_eq!(back.as_node().unwrap().keys(), vec!["retries", "verbose"]);
/// ```
#[derive(Clone)]
pub struct Mapper {
    inner: Arc<MapperInner>,
}

impl Mapper {
    /// Starts assembling a mapper
    pub fn builder() -> MapperBuilder {
        MapperBuilder::new()
    }

    /// Maps an element into a value of `T`.
    ///
    /// The typed result is extracted by value. Cyclic data is better
    /// observed through [`object_from_element`](Mapper::object_from_element),
    /// which hands back the identity-bearing handle.
    pub fn data_from_element<T: Reflect>(&self, element: &ConfigElement) -> crate::Result<T> {
        let object = self.object_from_element(&Token::of::<T>(), element)?;
        Ok(object.take::<T>()?)
    }

    /// Maps a value of `T` into an element
    pub fn element_from_data<T: Reflect>(&self, value: &T) -> crate::Result<ConfigElement> {
        self.element_from_object(&ObjectRef::new(value.clone()))
    }

    /// Maps an element into a dynamically typed object of the target type
    pub fn object_from_element(
        &self,
        target: &Token,
        element: &ConfigElement,
    ) -> crate::Result<ObjectRef> {
        Ok(self.processor().element_to_object(target, element)?)
    }

    /// Maps a dynamically typed object into an element
    pub fn element_from_object(&self, object: &ObjectRef) -> crate::Result<ConfigElement> {
        let target = object.token().clone();
        Ok(self.processor().object_to_element(&target, object)?)
    }

    /// The hinter this mapper classifies with
    pub fn hinter(&self) -> &TypeHinter {
        &self.inner.hinter
    }

    /// The resolver this mapper resolves declared types with
    pub fn resolver(&self) -> &TypeResolver {
        &self.inner.resolver
    }

    fn processor(&self) -> MappingProcessor<'_> {
        MappingProcessor {
            source: &self.inner.source,
            hinter: &self.inner.hinter,
            resolver: &self.inner.resolver,
            scalars: &self.inner.scalars,
        }
    }
}

/// Builder for [`Mapper`].
///
/// Registration happens here, at configuration time; the built mapper is
/// immutable, so concurrent readers always observe a consistent candidate
/// set.
pub struct MapperBuilder {
    scalars: ScalarTable,
    schemas: HashMap<Token, Arc<RecordSchema>>,
    custom: HashMap<Token, Vec<SignatureRef>>,
    implementations: Vec<(Token, Token)>,
    default_strategy: Strategy,
}

impl Default for MapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperBuilder {
    /// Starts with the built-in scalar handlers and an empty registry
    pub fn new() -> Self {
        Self {
            scalars: ScalarTable::builtin(),
            schemas: HashMap::new(),
            custom: HashMap::new(),
            implementations: Vec::new(),
            default_strategy: Strategy::Constructor,
        }
    }

    /// Registers a record schema
    pub fn register_schema(mut self, schema: RecordSchema) -> Self {
        self.schemas
            .insert(schema.token().clone(), Arc::new(schema));
        self
    }

    /// Registers a custom signature for its return type.
    ///
    /// Custom signatures take precedence over derived ones; several may
    /// be registered per type and are tried by priority, then
    /// registration order.
    pub fn register_signature(mut self, signature: impl Signature + 'static) -> Self {
        let target = signature.return_type().clone();
        self.custom
            .entry(target)
            .or_default()
            .push(Arc::new(signature));
        self
    }

    /// Registers an enum mapped by variant name, case-sensitive
    pub fn register_enum<T>(self, variants: impl IntoIterator<Item = (&'static str, T)>) -> Self
    where
        T: Reflect + PartialEq + Send + Sync,
    {
        self.register_enum_with(variants, true)
    }

    /// Registers an enum with explicit case sensitivity
    pub fn register_enum_with<T>(
        mut self,
        variants: impl IntoIterator<Item = (&'static str, T)>,
        case_sensitive: bool,
    ) -> Self
    where
        T: Reflect + PartialEq + Send + Sync,
    {
        let variants = variants
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        self.scalars.insert_enum(variants, case_sensitive);
        self
    }

    /// Registers a concrete implementation for an abstract token,
    /// validated against the token's element shape at build time
    pub fn register_implementation(mut self, abstract_token: Token, concrete: Token) -> Self {
        self.implementations.push((abstract_token, concrete));
        self
    }

    /// Sets the record strategy used when a schema declares none
    pub fn default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Validates registrations and produces the shared mapper
    pub fn build(self) -> crate::Result<Mapper> {
        let scalars = Arc::new(self.scalars);
        let hinter = TypeHinter::new(scalars.clone());

        let mut resolver = TypeResolver::new();
        for (abstract_token, concrete) in self.implementations {
            resolver.register(abstract_token, concrete, &hinter)?;
        }

        let source = SignatureSource::new(
            hinter.clone(),
            self.default_strategy,
            self.schemas,
            self.custom,
        );

        Ok(Mapper {
            inner: Arc::new(MapperInner {
                source,
                hinter,
                resolver,
                scalars,
            }),
        })
    }
}
