//! Scalar conversion between element scalars and typed values.
//!
//! Every SCALAR-classified type has a [`ScalarHandler`] registered in the
//! [`ScalarTable`]: the built-in primitives and `String`/`char` are
//! present from the start, enum handlers are added per registration. A
//! handler answers three questions: does a given scalar fit at all
//! (consulted by the type hinter during signature matching), how does a
//! scalar become a typed value, and how does a typed value become a
//! scalar. Narrowing is checked here, not at hint time.

mod errors;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use errors::ConversionError;

use crate::element::Scalar;
use crate::object::ObjectRef;
use crate::token::Reflect;

type AcceptsFn = Arc<dyn Fn(&Scalar) -> bool + Send + Sync>;
type FromScalarFn = Arc<dyn Fn(&Scalar) -> Result<ObjectRef, ConversionError> + Send + Sync>;
type ToScalarFn = Arc<dyn Fn(&ObjectRef) -> Result<Scalar, ConversionError> + Send + Sync>;

/// Bidirectional conversion for one scalar-classified type.
#[derive(Clone)]
pub struct ScalarHandler {
    name: String,
    accepts: AcceptsFn,
    from_scalar: FromScalarFn,
    to_scalar: ToScalarFn,
}

impl ScalarHandler {
    /// The display name of the handled type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `scalar` could convert to the handled type.
    ///
    /// This is the hint-level check: it looks at scalar kinds only, so a
    /// numeric scalar is accepted by every numeric handler even when the
    /// value would later overflow.
    pub fn accepts(&self, scalar: &Scalar) -> bool {
        (self.accepts)(scalar)
    }

    /// Converts a scalar into a typed value
    pub fn from_scalar(&self, scalar: &Scalar) -> Result<ObjectRef, ConversionError> {
        (self.from_scalar)(scalar)
    }

    /// Converts a typed value back into a scalar
    pub fn to_scalar(&self, object: &ObjectRef) -> Result<Scalar, ConversionError> {
        (self.to_scalar)(object)
    }
}

impl fmt::Debug for ScalarHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarHandler")
            .field("name", &self.name)
            .finish()
    }
}

/// The registry of scalar handlers, keyed by `TypeId`.
#[derive(Clone, Debug, Default)]
pub struct ScalarTable {
    handlers: HashMap<TypeId, ScalarHandler>,
}

impl ScalarTable {
    /// A table holding the built-in handlers
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert::<bool>(ScalarHandler {
            name: "bool".to_string(),
            accepts: Arc::new(|scalar| matches!(scalar, Scalar::Bool(_))),
            from_scalar: Arc::new(|scalar| match scalar {
                Scalar::Bool(b) => Ok(ObjectRef::new(*b)),
                Scalar::Null => Err(ConversionError::NullValue {
                    target: "bool".to_string(),
                }),
                other => Err(ConversionError::mismatch("bool", other.type_name())),
            }),
            to_scalar: Arc::new(|object| object.with_ref(|b: &bool| Scalar::Bool(*b))),
        });

        table.insert_integer::<i8>("i8");
        table.insert_integer::<i16>("i16");
        table.insert_integer::<i32>("i32");
        table.insert_integer::<i64>("i64");
        table.insert_integer::<u8>("u8");
        table.insert_integer::<u16>("u16");
        table.insert_integer::<u32>("u32");
        table.insert_integer::<u64>("u64");

        table.insert_float::<f32>("f32");
        table.insert_float::<f64>("f64");

        table.insert::<char>(ScalarHandler {
            name: "char".to_string(),
            accepts: Arc::new(|scalar| matches!(scalar, Scalar::Text(_))),
            from_scalar: Arc::new(|scalar| match scalar {
                Scalar::Text(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(ObjectRef::new(c)),
                        _ => Err(ConversionError::mismatch(
                            "single-character text",
                            format!("text of {} characters", s.chars().count()),
                        )),
                    }
                }
                Scalar::Null => Err(ConversionError::NullValue {
                    target: "char".to_string(),
                }),
                other => Err(ConversionError::mismatch("char", other.type_name())),
            }),
            to_scalar: Arc::new(|object| object.with_ref(|c: &char| Scalar::Text(c.to_string()))),
        });

        table.insert::<String>(ScalarHandler {
            name: "String".to_string(),
            accepts: Arc::new(|scalar| matches!(scalar, Scalar::Text(_))),
            from_scalar: Arc::new(|scalar| match scalar {
                Scalar::Text(s) => Ok(ObjectRef::new(s.clone())),
                Scalar::Null => Err(ConversionError::NullValue {
                    target: "String".to_string(),
                }),
                other => Err(ConversionError::mismatch("text", other.type_name())),
            }),
            to_scalar: Arc::new(|object| object.with_ref(|s: &String| Scalar::Text(s.clone()))),
        });

        table
    }

    /// Registers an enum handler matching variants by name.
    ///
    /// `case_sensitive` controls string matching on the element side;
    /// emission always uses the registered spelling.
    pub fn insert_enum<T>(&mut self, variants: Vec<(String, T)>, case_sensitive: bool)
    where
        T: Reflect + PartialEq + Send + Sync,
    {
        let ty = crate::token::Token::of::<T>().name().to_string();
        let lookup = variants.clone();
        let reverse = variants;
        let from_ty = ty.clone();
        self.insert::<T>(ScalarHandler {
            name: ty.clone(),
            accepts: Arc::new(|scalar| matches!(scalar, Scalar::Text(_))),
            from_scalar: Arc::new(move |scalar| match scalar {
                Scalar::Text(s) => {
                    let found = lookup.iter().find(|(name, _)| {
                        if case_sensitive {
                            name == s
                        } else {
                            name.eq_ignore_ascii_case(s)
                        }
                    });
                    match found {
                        Some((_, value)) => Ok(ObjectRef::new(value.clone())),
                        None => Err(ConversionError::UnknownVariant {
                            value: s.clone(),
                            ty: from_ty.clone(),
                        }),
                    }
                }
                Scalar::Null => Err(ConversionError::NullValue {
                    target: from_ty.clone(),
                }),
                other => Err(ConversionError::mismatch(from_ty.clone(), other.type_name())),
            }),
            to_scalar: Arc::new(move |object| {
                object.with_ref(|value: &T| {
                    reverse
                        .iter()
                        .find(|(_, variant)| variant == value)
                        .map(|(name, _)| Scalar::Text(name.clone()))
                        .ok_or_else(|| ConversionError::UnknownVariant {
                            value: "<unregistered variant>".to_string(),
                            ty: ty.clone(),
                        })
                })?
            }),
        });
    }

    /// Looks up the handler for a type
    pub fn get(&self, id: TypeId) -> Option<&ScalarHandler> {
        self.handlers.get(&id)
    }

    /// Returns true if a handler is registered for the type
    pub fn contains(&self, id: TypeId) -> bool {
        self.handlers.contains_key(&id)
    }

    fn insert<T: 'static>(&mut self, handler: ScalarHandler) {
        self.handlers.insert(TypeId::of::<T>(), handler);
    }

    fn insert_integer<T>(&mut self, name: &'static str)
    where
        T: Reflect + Copy + TryFrom<i64> + TryInto<i64>,
    {
        self.insert::<T>(ScalarHandler {
            name: name.to_string(),
            accepts: Arc::new(|scalar| scalar.is_number()),
            from_scalar: Arc::new(move |scalar| {
                let wide = match scalar {
                    Scalar::Int(n) => *n,
                    // Fractional parts truncate; magnitude is still checked.
                    Scalar::Float(x) if x.is_finite() && in_i64_range(*x) => *x as i64,
                    Scalar::Float(x) => {
                        return Err(ConversionError::NumericOverflow {
                            value: x.to_string(),
                            target: name.to_string(),
                        });
                    }
                    Scalar::Null => {
                        return Err(ConversionError::NullValue {
                            target: name.to_string(),
                        });
                    }
                    other => {
                        return Err(ConversionError::mismatch(name, other.type_name()));
                    }
                };
                T::try_from(wide)
                    .map(ObjectRef::new)
                    .map_err(|_| ConversionError::NumericOverflow {
                        value: wide.to_string(),
                        target: name.to_string(),
                    })
            }),
            to_scalar: Arc::new(move |object| {
                let value = object.with_ref(|v: &T| *v)?;
                value
                    .try_into()
                    .map(Scalar::Int)
                    .map_err(|_| ConversionError::NumericOverflow {
                        value: format!("a {name} out of i64 range"),
                        target: "i64".to_string(),
                    })
            }),
        });
    }

    fn insert_float<T>(&mut self, name: &'static str)
    where
        T: Reflect + Copy + Into<f64> + FromF64,
    {
        self.insert::<T>(ScalarHandler {
            name: name.to_string(),
            accepts: Arc::new(|scalar| scalar.is_number()),
            from_scalar: Arc::new(move |scalar| match scalar {
                Scalar::Float(x) => Ok(ObjectRef::new(T::from_f64(*x))),
                Scalar::Int(n) => Ok(ObjectRef::new(T::from_f64(*n as f64))),
                Scalar::Null => Err(ConversionError::NullValue {
                    target: name.to_string(),
                }),
                other => Err(ConversionError::mismatch(name, other.type_name())),
            }),
            to_scalar: Arc::new(|object| {
                let value = object.with_ref(|v: &T| *v)?;
                Ok(Scalar::Float(value.into()))
            }),
        });
    }
}

fn in_i64_range(x: f64) -> bool {
    x >= i64::MIN as f64 && x <= i64::MAX as f64
}

trait FromF64 {
    fn from_f64(x: f64) -> Self;
}

impl FromF64 for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }
}

impl FromF64 for f32 {
    fn from_f64(x: f64) -> Self {
        x as f32
    }
}
