//! The `Reflect` trait and its implementations for the mapped type
//! universe: scalars, `Option`, the standard containers, and the dynamic
//! `ObjectRef`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::object::ObjectRef;

use super::hooks::{MapHooks, OptionalHooks, SequenceHooks};
use super::{ContainerKind, Token};

/// A type the mapping engine can reflect over.
///
/// `Reflect` produces the [`Token`] describing the type. For containers
/// the token additionally captures monomorphized construction hooks, which
/// is what stands in for runtime reflection: the hooks are ordinary `fn`
/// pointers instantiated while the static type is in scope.
///
/// Mapped types are `Clone` because typed extraction from the dynamic
/// value layer clones values out of their shared cells.
///
/// Implementations exist for the scalar primitives, `String`, `char`,
/// `Option<T>`, `Vec<T>`, `Box<[T]>`, the standard sets and string-keyed
/// maps, and [`ObjectRef`] itself. User record and enum types implement
/// it with [`Token::concrete`].
pub trait Reflect: Clone + 'static {
    /// The token describing this type
    fn token() -> Token;
}

macro_rules! scalar_reflect {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn token() -> Token {
                    Token::concrete::<$ty>($name)
                }
            }
        )*
    };
}

scalar_reflect! {
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
    char => "char",
    String => "String",
}

impl Reflect for ObjectRef {
    fn token() -> Token {
        Token::any()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn token() -> Token {
        Token::optional_of(
            T::token(),
            OptionalHooks {
                none: || ObjectRef::new(Option::<T>::None),
                some: |inner| Ok(ObjectRef::new(Some(inner.take::<T>()?))),
                unwrap: |object| {
                    object.with_ref(|option: &Option<T>| {
                        option.as_ref().map(|value| ObjectRef::wrap(value.clone()))
                    })
                },
            },
        )
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn token() -> Token {
        Token::sequence(
            ContainerKind::List,
            "Vec",
            T::token(),
            SequenceHooks {
                new: Some(|capacity| ObjectRef::new(Vec::<T>::with_capacity(capacity))),
                push: Some(|object, item| {
                    let value = item.take::<T>()?;
                    object.with_mut(|vec: &mut Vec<T>| vec.push(value))
                }),
                collect: |items| {
                    let mut vec = Vec::with_capacity(items.len());
                    for item in items {
                        vec.push(item.take::<T>()?);
                    }
                    Ok(ObjectRef::new(vec))
                },
                items: |object| {
                    object.with_ref(|vec: &Vec<T>| {
                        vec.iter()
                            .map(|item| ObjectRef::wrap(item.clone()))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|vec: &Vec<T>| vec.len()),
            },
        )
    }
}

// Fixed-size sequences build in one shot: no incremental hooks, and
// therefore no prebuilt path and no cycle participation.
impl<T: Reflect> Reflect for Box<[T]> {
    fn token() -> Token {
        Token::sequence(
            ContainerKind::Array,
            "Box",
            T::token(),
            SequenceHooks {
                new: None,
                push: None,
                collect: |items| {
                    let mut vec = Vec::with_capacity(items.len());
                    for item in items {
                        vec.push(item.take::<T>()?);
                    }
                    Ok(ObjectRef::new(vec.into_boxed_slice()))
                },
                items: |object| {
                    object.with_ref(|slice: &Box<[T]>| {
                        slice
                            .iter()
                            .map(|item| ObjectRef::wrap(item.clone()))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|slice: &Box<[T]>| slice.len()),
            },
        )
    }
}

impl<T: Reflect + Ord> Reflect for BTreeSet<T> {
    fn token() -> Token {
        Token::sequence(
            ContainerKind::Set,
            "BTreeSet",
            T::token(),
            SequenceHooks {
                new: Some(|_capacity| ObjectRef::new(BTreeSet::<T>::new())),
                push: Some(|object, item| {
                    let value = item.take::<T>()?;
                    object.with_mut(|set: &mut BTreeSet<T>| {
                        set.insert(value);
                    })
                }),
                collect: |items| {
                    let mut set = BTreeSet::new();
                    for item in items {
                        set.insert(item.take::<T>()?);
                    }
                    Ok(ObjectRef::new(set))
                },
                items: |object| {
                    object.with_ref(|set: &BTreeSet<T>| {
                        set.iter()
                            .map(|item| ObjectRef::wrap(item.clone()))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|set: &BTreeSet<T>| set.len()),
            },
        )
    }
}

impl<T: Reflect + Eq + Hash> Reflect for HashSet<T> {
    fn token() -> Token {
        Token::sequence(
            ContainerKind::Set,
            "HashSet",
            T::token(),
            SequenceHooks {
                new: Some(|capacity| ObjectRef::new(HashSet::<T>::with_capacity(capacity))),
                push: Some(|object, item| {
                    let value = item.take::<T>()?;
                    object.with_mut(|set: &mut HashSet<T>| {
                        set.insert(value);
                    })
                }),
                collect: |items| {
                    let mut set = HashSet::with_capacity(items.len());
                    for item in items {
                        set.insert(item.take::<T>()?);
                    }
                    Ok(ObjectRef::new(set))
                },
                items: |object| {
                    object.with_ref(|set: &HashSet<T>| {
                        set.iter()
                            .map(|item| ObjectRef::wrap(item.clone()))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|set: &HashSet<T>| set.len()),
            },
        )
    }
}

impl<V: Reflect> Reflect for IndexMap<String, V> {
    fn token() -> Token {
        Token::mapping(
            "IndexMap",
            V::token(),
            MapHooks {
                new: |capacity| ObjectRef::new(IndexMap::<String, V>::with_capacity(capacity)),
                insert: |object, key, value| {
                    let value = value.take::<V>()?;
                    object.with_mut(|map: &mut IndexMap<String, V>| {
                        map.insert(key, value);
                    })
                },
                entries: |object| {
                    object.with_ref(|map: &IndexMap<String, V>| {
                        map.iter()
                            .map(|(key, value)| (key.clone(), ObjectRef::wrap(value.clone())))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|map: &IndexMap<String, V>| map.len()),
            },
        )
    }
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn token() -> Token {
        Token::mapping(
            "BTreeMap",
            V::token(),
            MapHooks {
                new: |_capacity| ObjectRef::new(BTreeMap::<String, V>::new()),
                insert: |object, key, value| {
                    let value = value.take::<V>()?;
                    object.with_mut(|map: &mut BTreeMap<String, V>| {
                        map.insert(key, value);
                    })
                },
                entries: |object| {
                    object.with_ref(|map: &BTreeMap<String, V>| {
                        map.iter()
                            .map(|(key, value)| (key.clone(), ObjectRef::wrap(value.clone())))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|map: &BTreeMap<String, V>| map.len()),
            },
        )
    }
}

impl<V: Reflect> Reflect for HashMap<String, V> {
    fn token() -> Token {
        Token::mapping(
            "HashMap",
            V::token(),
            MapHooks {
                new: |capacity| ObjectRef::new(HashMap::<String, V>::with_capacity(capacity)),
                insert: |object, key, value| {
                    let value = value.take::<V>()?;
                    object.with_mut(|map: &mut HashMap<String, V>| {
                        map.insert(key, value);
                    })
                },
                entries: |object| {
                    object.with_ref(|map: &HashMap<String, V>| {
                        map.iter()
                            .map(|(key, value)| (key.clone(), ObjectRef::wrap(value.clone())))
                            .collect()
                    })
                },
                len: |object| object.with_ref(|map: &HashMap<String, V>| map.len()),
            },
        )
    }
}
