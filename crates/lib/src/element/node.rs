//! String-keyed node container for configuration elements.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::ConfigElement;
use super::eq::elements_equal;

/// An insertion-ordered mapping from string keys to configuration elements.
///
/// Like [`ConfigList`](super::ConfigList), `ConfigNode` is a shared handle:
/// clones alias the same underlying map, identity is preserved across reads
/// of the same position, and self-references are permitted.
///
/// Keys keep their insertion order when iterated, which is what gives
/// serialized output a stable key order.
#[derive(Clone, Default)]
pub struct ConfigNode {
    entries: Rc<RefCell<IndexMap<String, ConfigElement>>>,
}

impl ConfigNode {
    /// Creates a new empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty node with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Rc::new(RefCell::new(IndexMap::with_capacity(capacity))),
        }
    }

    /// Returns the number of entries in the node
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the node contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns true if the node contains the given key
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.entries.borrow().contains_key(key.as_ref())
    }

    /// Returns the element stored under `key`, if present.
    ///
    /// The returned element shares identity with the stored one.
    pub fn get(&self, key: impl AsRef<str>) -> Option<ConfigElement> {
        self.entries.borrow().get(key.as_ref()).cloned()
    }

    /// Inserts an element under `key`, returning the previous element if
    /// the key was already present. A replaced key keeps its original
    /// position in the insertion order.
    pub fn insert(&self, key: impl Into<String>, element: ConfigElement) -> Option<ConfigElement> {
        self.entries.borrow_mut().insert(key.into(), element)
    }

    /// Returns a snapshot of the node's keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Returns a snapshot of the node's entries in insertion order.
    ///
    /// The values are handle clones and stay shared with the node.
    pub fn entries(&self) -> Vec<(String, ConfigElement)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns true if both handles refer to the same underlying node
    pub fn ptr_eq(&self, other: &ConfigNode) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// Stable identity of the underlying storage, used by cycle tables
    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.entries) as *const () as usize
    }
}

impl FromIterator<(String, ConfigElement)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (String, ConfigElement)>>(iter: I) -> Self {
        Self {
            entries: Rc::new(RefCell::new(iter.into_iter().collect())),
        }
    }
}

impl<'a> FromIterator<(&'a str, ConfigElement)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (&'a str, ConfigElement)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        elements_equal(
            &ConfigElement::Node(self.clone()),
            &ConfigElement::Node(other.clone()),
        )
    }
}

impl fmt::Debug for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::fmt_element(&ConfigElement::Node(self.clone()), f, &mut Vec::new())
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
