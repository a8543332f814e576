//! Reified type tokens.
//!
//! A [`Token`] is an immutable, shared handle describing a possibly
//! parameterized type: its raw (unparameterized) component, its type
//! arguments, and a stable display name used in diagnostics and as a cache
//! key. Tokens for concrete Rust types are obtained through
//! [`Token::of`] and the [`Reflect`] trait, which additionally captures
//! monomorphized construction hooks for containers; tokens may also be
//! composed at runtime with [`Token::parameterize`], in which case they
//! carry no hooks and must be resolved to a registered concrete type
//! before anything can be built from them.
//!
//! Token equality is structural: two independently constructed tokens for
//! `Vec<String>` are equal and hash alike, which is what lets the
//! signature source key its caches on tokens.

mod errors;
mod hooks;
mod reflect;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use errors::TokenError;
pub use reflect::Reflect;

pub(crate) use hooks::{Hooks, MapHooks, OptionalHooks, SequenceHooks};

/// The container family of a container-shaped token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Growable ordered sequence
    List,
    /// Unordered/sorted unique collection; still list-shaped on the wire
    Set,
    /// Fixed-size sequence, built in one shot
    Array,
    /// String-keyed mapping
    Map,
}

impl ContainerKind {
    /// The abstract raw name for this family
    pub fn raw_name(self) -> &'static str {
        match self {
            ContainerKind::List => "List",
            ContainerKind::Set => "Set",
            ContainerKind::Array => "Array",
            ContainerKind::Map => "Map",
        }
    }
}

/// The unparameterized component of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RawKind {
    /// The dynamic target: accepts any element, yields `ObjectRef`
    Any,
    /// `Option` of the single argument
    Optional,
    /// A container family; `name` distinguishes concrete backings
    /// (`"Vec"`, `"BTreeSet"`, …) from the abstract family name
    Container {
        kind: ContainerKind,
        name: &'static str,
    },
    /// A concrete non-container Rust type (scalar, record, enum)
    Concrete { id: TypeId, name: &'static str },
}

struct TokenInner {
    name: String,
    raw: RawKind,
    args: Vec<Token>,
    hooks: Hooks,
}

/// A reified, possibly parameterized type handle.
///
/// Tokens are cheap to clone and compare structurally:
///
/// ```
/// # use graft::token::Token;
/// let a = Token::of::<Vec<String>>();
/// let b = Token::of::<Vec<String>>();
/// assert_eq!(a, b);
/// assert_eq!(a.name(), "Vec<String>");
/// assert_ne!(a, Token::of::<Vec<i64>>());
/// ```
#[derive(Clone)]
pub struct Token {
    inner: Arc<TokenInner>,
}

impl Token {
    /// The token of a reflectable type
    pub fn of<T: Reflect>() -> Token {
        T::token()
    }

    /// The dynamic `Any` token.
    ///
    /// `Any` targets accept every element; the mapped value is an
    /// [`ObjectRef`](crate::object::ObjectRef) whose concrete type is
    /// chosen by the type resolver from the element's shape.
    pub fn any() -> Token {
        Token::build("Any".to_string(), RawKind::Any, Vec::new(), Hooks::None)
    }

    /// A token for a concrete non-container type.
    ///
    /// This is the constructor `Reflect` implementations on user record
    /// and enum types use:
    ///
    /// ```
    /// # use graft::token::{Reflect, Token};
    /// #[derive(Clone)]
    /// struct Server {
    ///     host: String,
    /// }
    ///
    /// impl Reflect for Server {
    ///     fn token() -> Token {
    ///         Token::concrete::<Server>("Server")
    ///     }
    /// }
    /// # assert_eq!(Server::token().name(), "Server");
    /// ```
    pub fn concrete<T: 'static>(name: &'static str) -> Token {
        Token::build(
            name.to_string(),
            RawKind::Concrete {
                id: TypeId::of::<T>(),
                name,
            },
            Vec::new(),
            Hooks::None,
        )
    }

    /// The abstract `List` raw token; parameterize to use
    pub fn list_raw() -> Token {
        Token::abstract_container(ContainerKind::List, Vec::new())
    }

    /// The abstract `Set` raw token
    pub fn set_raw() -> Token {
        Token::abstract_container(ContainerKind::Set, Vec::new())
    }

    /// The abstract `Array` raw token
    pub fn array_raw() -> Token {
        Token::abstract_container(ContainerKind::Array, Vec::new())
    }

    /// The abstract `Map` raw token (keys are strings, the single
    /// argument is the value type)
    pub fn map_raw() -> Token {
        Token::abstract_container(ContainerKind::Map, Vec::new())
    }

    /// An abstract list-of-`component` token
    pub fn list_of(component: Token) -> Token {
        Token::abstract_container(ContainerKind::List, vec![component])
    }

    /// An abstract set-of-`component` token
    pub fn set_of(component: Token) -> Token {
        Token::abstract_container(ContainerKind::Set, vec![component])
    }

    /// An abstract string-keyed map token with the given value type
    pub fn map_of(value: Token) -> Token {
        Token::abstract_container(ContainerKind::Map, vec![value])
    }

    fn abstract_container(kind: ContainerKind, args: Vec<Token>) -> Token {
        let name = container_name(kind.raw_name(), kind, &args);
        Token::build(
            name,
            RawKind::Container {
                kind,
                name: kind.raw_name(),
            },
            args,
            Hooks::None,
        )
    }

    /// Applies type arguments to a raw token, producing `Raw<args…>`.
    ///
    /// Only container raws are parameterizable. The result carries no
    /// construction hooks; the type resolver must map it to a registered
    /// concrete token before it can be built.
    pub fn parameterize(&self, args: Vec<Token>) -> Result<Token, TokenError> {
        let RawKind::Container { kind, name } = &self.inner.raw else {
            return Err(TokenError::NotParameterizable {
                name: self.name().to_string(),
            });
        };
        if !self.inner.args.is_empty() {
            return Err(TokenError::NotParameterizable {
                name: self.name().to_string(),
            });
        }
        if args.len() != 1 {
            return Err(TokenError::ArityMismatch {
                name: self.name().to_string(),
                expected: 1,
                actual: args.len(),
            });
        }

        let display = container_name(name, *kind, &args);
        Ok(Token::build(
            display,
            self.inner.raw.clone(),
            args,
            Hooks::None,
        ))
    }

    /// The stable display name, e.g. `"Vec<String>"`
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The raw component's name, e.g. `"Vec"`
    pub fn raw_name(&self) -> &str {
        match &self.inner.raw {
            RawKind::Any => "Any",
            RawKind::Optional => "Option",
            RawKind::Container { name, .. } => name,
            RawKind::Concrete { name, .. } => name,
        }
    }

    /// The actual type arguments
    pub fn args(&self) -> &[Token] {
        &self.inner.args
    }

    /// The type argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&Token> {
        self.inner.args.get(index)
    }

    /// Returns true for the dynamic `Any` token
    pub fn is_any(&self) -> bool {
        matches!(self.inner.raw, RawKind::Any)
    }

    /// Returns true for `Option` tokens
    pub fn is_optional(&self) -> bool {
        matches!(self.inner.raw, RawKind::Optional)
    }

    /// The container family, for container-shaped tokens
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match &self.inner.raw {
            RawKind::Container { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The `TypeId` of concrete non-container tokens
    pub fn type_id(&self) -> Option<TypeId> {
        match &self.inner.raw {
            RawKind::Concrete { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Returns true when the token carries construction hooks.
    ///
    /// Hook-less container tokens are abstract: they describe a shape but
    /// cannot build anything.
    pub fn has_hooks(&self) -> bool {
        !matches!(self.inner.hooks, Hooks::None)
    }

    pub(crate) fn sequence_hooks(&self) -> Option<&SequenceHooks> {
        match &self.inner.hooks {
            Hooks::Sequence(hooks) => Some(hooks),
            _ => None,
        }
    }

    pub(crate) fn map_hooks(&self) -> Option<&MapHooks> {
        match &self.inner.hooks {
            Hooks::Map(hooks) => Some(hooks),
            _ => None,
        }
    }

    pub(crate) fn optional_hooks(&self) -> Option<&OptionalHooks> {
        match &self.inner.hooks {
            Hooks::Optional(hooks) => Some(hooks),
            _ => None,
        }
    }

    pub(crate) fn sequence(
        kind: ContainerKind,
        raw_name: &'static str,
        component: Token,
        hooks: SequenceHooks,
    ) -> Token {
        let args = vec![component];
        Token::build(
            container_name(raw_name, kind, &args),
            RawKind::Container {
                kind,
                name: raw_name,
            },
            args,
            Hooks::Sequence(hooks),
        )
    }

    pub(crate) fn mapping(raw_name: &'static str, value: Token, hooks: MapHooks) -> Token {
        let args = vec![value];
        Token::build(
            container_name(raw_name, ContainerKind::Map, &args),
            RawKind::Container {
                kind: ContainerKind::Map,
                name: raw_name,
            },
            args,
            Hooks::Map(hooks),
        )
    }

    pub(crate) fn optional_of(inner: Token, hooks: OptionalHooks) -> Token {
        let name = format!("Option<{}>", inner.name());
        Token::build(
            name,
            RawKind::Optional,
            vec![inner],
            Hooks::Optional(hooks),
        )
    }

    fn build(name: String, raw: RawKind, args: Vec<Token>, hooks: Hooks) -> Token {
        Token {
            inner: Arc::new(TokenInner {
                name,
                raw,
                args,
                hooks,
            }),
        }
    }
}

fn container_name(raw_name: &str, kind: ContainerKind, args: &[Token]) -> String {
    match args {
        [] => raw_name.to_string(),
        [component] if kind == ContainerKind::Map => {
            format!("{raw_name}<String, {}>", component.name())
        }
        // Boxed slices read as their Rust spelling.
        [component] if raw_name == "Box" => format!("Box<[{}]>", component.name()),
        [component] => format!("{raw_name}<{}>", component.name()),
        _ => {
            let names: Vec<&str> = args.iter().map(Token::name).collect();
            format!("{raw_name}<{}>", names.join(", "))
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.raw == other.inner.raw && self.inner.args == other.inner.args
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.raw.hash(state);
        self.inner.args.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.inner.name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
