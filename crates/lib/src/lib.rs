//!
//! Graft: a configuration-data mapping engine.
//! This library converts between self-describing configuration trees and
//! arbitrary Rust object graphs, driven by reified type information.
//!
//! ## Core Concepts
//!
//! * **Elements (`element::ConfigElement`)**: The untyped configuration tree of scalars, ordered lists, and insertion-ordered string-keyed nodes. Containers are shared handles, so trees may reference themselves.
//! * **Tokens (`token::Token`)**: Reified type handles. `Token::of::<T>()` captures construction hooks for containers at compile time, which is what stands in for runtime reflection.
//! * **Schemas (`signature::SchemaBuilder`)**: Registration-time descriptions of record types: constructor parameters, field accessors, ordering, and strategy.
//! * **Signatures (`signature::Signature`)**: Callable construction recipes matched against inputs by name, length, and type hints, with priorities breaking ties.
//! * **Mapper (`mapper::Mapper`)**: The recursive driver. Built once, shared freely; each call keeps a cycle table so self-referential data terminates and round-trips.
//! * **Codecs (`codec::Codec`)**: Format adapters (JSON, TOML in-tree) between byte streams and element trees, routed by file extension.
//!
//! ## Example
//!
//! ```
//! use graft::element::ConfigElement;
//! use graft::mapper::Mapper;
//! use graft::signature::SchemaBuilder;
//! use graft::token::{Reflect, Token};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Profile {
//!     name: String,
//!     retries: i64,
//! }
//!
//! impl Reflect for Profile {
//!     fn token() -> Token {
//!         Token::concrete::<Profile>("Profile")
//!     }
//! }
//!
//! let mapper = Mapper::builder()
//!     .register_schema(
//!         SchemaBuilder::<Profile>::new()
//!             .param::<String>("name")
//!             .param::<i64>("retries")
//!             .construct(|args| {
//!                 Ok(Profile {
//!                     name: args.next()?,
//!                     retries: args.next()?,
//!                 })
//!             })
//!             .field::<String>("name", |p| p.name.clone())
//!             .field::<i64>("retries", |p| p.retries)
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let element: ConfigElement = serde_json::from_str(r#"{"retries": 3, "name": "primary"}"#)?;
//! let profile: Profile = mapper.data_from_element(&element)?;
//! assert_eq!(profile.name, "primary");
//!
//! let back = mapper.element_from_data(&profile)?;
//! // Output keys follow the schema's argument order, not input order.
//! assert_eq!(back.as_node().unwrap().keys(), vec!["name", "retries"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod convert;
pub mod element;
pub mod hint;
pub mod mapper;
pub mod object;
pub mod signature;
pub mod token;

pub use element::{ConfigElement, ConfigList, ConfigNode, Scalar};
pub use mapper::{Mapper, MapperBuilder};
pub use object::ObjectRef;
pub use token::{Reflect, Token};

/// Result type used throughout the graft library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the graft library.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Element access errors
    #[error(transparent)]
    Element(element::ElementError),

    /// Type token errors
    #[error(transparent)]
    Token(token::TokenError),

    /// Scalar and dynamic-value conversion errors
    #[error(transparent)]
    Conversion(convert::ConversionError),

    /// Signature declaration and matching errors
    #[error(transparent)]
    Signature(signature::SignatureError),

    /// Mapping processor errors
    #[error(transparent)]
    Mapper(mapper::MapperError),

    /// Codec errors
    #[error(transparent)]
    Codec(codec::CodecError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Element(_) => "element",
            Error::Token(_) => "token",
            Error::Conversion(_) => "convert",
            Error::Signature(_) => "signature",
            Error::Mapper(_) => "mapper",
            Error::Codec(_) => "codec",
        }
    }

    /// Check if this error means no signature matched the input.
    pub fn is_no_matching_signature(&self) -> bool {
        match self {
            Error::Signature(err) => err.is_no_match(),
            Error::Mapper(err) => err.is_no_match(),
            _ => false,
        }
    }

    /// Check if this error reports an unresolvable cycle.
    pub fn is_cycle_error(&self) -> bool {
        match self {
            Error::Mapper(err) => err.is_cycle_error(),
            _ => false,
        }
    }

    /// Check if this error is a conversion failure.
    pub fn is_conversion_error(&self) -> bool {
        match self {
            Error::Conversion(_) => true,
            Error::Signature(signature::SignatureError::Conversion(_)) => true,
            Error::Mapper(err) => err.is_conversion(),
            _ => false,
        }
    }

    /// Check if this error means type metadata was missing.
    pub fn is_type_unavailable(&self) -> bool {
        match self {
            Error::Token(err) => err.is_type_unavailable(),
            Error::Signature(signature::SignatureError::Token(err)) => err.is_type_unavailable(),
            Error::Mapper(err) => err.is_type_unavailable(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Codec(err) => err.is_io(),
            _ => false,
        }
    }
}
