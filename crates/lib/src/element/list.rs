//! Ordered list container for configuration elements.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::ConfigElement;
use super::eq::elements_equal;

/// An ordered sequence of configuration elements.
///
/// `ConfigList` is a shared handle: cloning it clones the handle, not the
/// contents, so the same list observed from two positions in a tree stays
/// the same list. This is what allows a decoded tree to be a
/// DAG-with-cycles rather than a copy-on-read snapshot; a list may even
/// contain itself.
///
/// ```
/// # use graft::element::{ConfigElement, ConfigList};
/// let list = ConfigList::new();
/// list.push("a".into());
/// list.push(ConfigElement::List(list.clone()));
/// assert_eq!(list.len(), 2);
/// assert!(list.get(1).unwrap().as_list().unwrap().ptr_eq(&list));
/// ```
#[derive(Clone, Default)]
pub struct ConfigList {
    items: Rc<RefCell<Vec<ConfigElement>>>,
}

impl ConfigList {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty list with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::with_capacity(capacity))),
        }
    }

    /// Returns the number of elements in the list
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns true if the list contains no elements
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Returns the element at `index`, if present.
    ///
    /// The returned element shares identity with the stored one.
    pub fn get(&self, index: usize) -> Option<ConfigElement> {
        self.items.borrow().get(index).cloned()
    }

    /// Appends an element to the back of the list
    pub fn push(&self, element: ConfigElement) {
        self.items.borrow_mut().push(element);
    }

    /// Replaces the element at `index`, returning the previous element.
    ///
    /// Returns `None` without modifying the list when `index` is out of
    /// bounds.
    pub fn set(&self, index: usize, element: ConfigElement) -> Option<ConfigElement> {
        let mut items = self.items.borrow_mut();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, element))
    }

    /// Returns a snapshot of the list's elements.
    ///
    /// The elements are handle clones; mutating the list afterwards does
    /// not affect the snapshot's length, but the elements themselves stay
    /// shared.
    pub fn elements(&self) -> Vec<ConfigElement> {
        self.items.borrow().clone()
    }

    /// Returns true if both handles refer to the same underlying list
    pub fn ptr_eq(&self, other: &ConfigList) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Stable identity of the underlying storage, used by cycle tables
    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.items) as *const () as usize
    }
}

impl FromIterator<ConfigElement> for ConfigList {
    fn from_iter<I: IntoIterator<Item = ConfigElement>>(iter: I) -> Self {
        Self {
            items: Rc::new(RefCell::new(iter.into_iter().collect())),
        }
    }
}

impl PartialEq for ConfigList {
    fn eq(&self, other: &Self) -> bool {
        elements_equal(
            &ConfigElement::List(self.clone()),
            &ConfigElement::List(other.clone()),
        )
    }
}

// Debug must not recurse into self-referential lists.
impl fmt::Debug for ConfigList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::fmt_element(&ConfigElement::List(self.clone()), f, &mut Vec::new())
    }
}

impl fmt::Display for ConfigList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
