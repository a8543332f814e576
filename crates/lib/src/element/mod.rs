//! The configuration element tree.
//!
//! A [`ConfigElement`] is a node in the untyped configuration tree that
//! codecs decode into and the mapper consumes: a [`Scalar`] leaf, an
//! ordered [`ConfigList`], or an insertion-ordered, string-keyed
//! [`ConfigNode`]. Containers are shared handles, so the same element can
//! appear in several positions (including inside itself) and keeps its
//! identity across reads. Equality is content-based and cycle-aware.

mod eq;
mod errors;
mod list;
mod node;
mod scalar;
mod serde;
#[cfg(test)]
mod tests;

use std::fmt;

pub use errors::ElementError;
pub use list::ConfigList;
pub use node::ConfigNode;
pub use scalar::Scalar;

/// A node in the untyped configuration tree.
///
/// Every element is exactly one of three variants. Cloning an element is
/// cheap: scalars are copied, containers are handle clones that alias the
/// same storage.
///
/// ```
/// # use graft::element::{ConfigElement, ConfigNode, ConfigList};
/// let node: ConfigNode = [
///     ("name", ConfigElement::from("example")),
///     ("retries", ConfigElement::from(3)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(node.get("retries").unwrap().as_int(), Some(3));
/// ```
#[derive(Clone, PartialEq)]
pub enum ConfigElement {
    /// A terminal value
    Scalar(Scalar),
    /// An ordered sequence of elements
    List(ConfigList),
    /// A string-keyed, insertion-ordered mapping
    Node(ConfigNode),
}

impl ConfigElement {
    /// The null scalar element
    pub fn null() -> Self {
        ConfigElement::Scalar(Scalar::Null)
    }

    /// Returns true if this is a scalar element
    pub fn is_scalar(&self) -> bool {
        matches!(self, ConfigElement::Scalar(_))
    }

    /// Returns true if this is the null scalar
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigElement::Scalar(Scalar::Null))
    }

    /// Returns true if this is a list element
    pub fn is_list(&self) -> bool {
        matches!(self, ConfigElement::List(_))
    }

    /// Returns true if this is a node element
    pub fn is_node(&self) -> bool {
        matches!(self, ConfigElement::Node(_))
    }

    /// Returns true if this is a container (list or node)
    pub fn is_container(&self) -> bool {
        matches!(self, ConfigElement::List(_) | ConfigElement::Node(_))
    }

    /// Returns the variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigElement::Scalar(s) => s.type_name(),
            ConfigElement::List(_) => "list",
            ConfigElement::Node(_) => "node",
        }
    }

    /// Attempts to view this element as a scalar
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigElement::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this element as a list
    pub fn as_list(&self) -> Option<&ConfigList> {
        match self {
            ConfigElement::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to view this element as a node
    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            ConfigElement::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Shorthand for a boolean scalar's value
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar()?.as_bool()
    }

    /// Shorthand for an integer scalar's value
    pub fn as_int(&self) -> Option<i64> {
        self.as_scalar()?.as_int()
    }

    /// Shorthand for a float scalar's value
    pub fn as_float(&self) -> Option<f64> {
        self.as_scalar()?.as_float()
    }

    /// Shorthand for a text scalar's value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigElement::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Views this element as a scalar or reports the actual variant
    pub fn require_scalar(&self) -> Result<&Scalar, ElementError> {
        self.as_scalar().ok_or(ElementError::TypeMismatch {
            expected: "scalar",
            actual: self.type_name(),
        })
    }

    /// Views this element as a list or reports the actual variant
    pub fn require_list(&self) -> Result<&ConfigList, ElementError> {
        self.as_list().ok_or(ElementError::TypeMismatch {
            expected: "list",
            actual: self.type_name(),
        })
    }

    /// Views this element as a node or reports the actual variant
    pub fn require_node(&self) -> Result<&ConfigNode, ElementError> {
        self.as_node().ok_or(ElementError::TypeMismatch {
            expected: "node",
            actual: self.type_name(),
        })
    }

    /// Number of children for containers, zero for scalars
    pub fn child_count(&self) -> usize {
        match self {
            ConfigElement::Scalar(_) => 0,
            ConfigElement::List(list) => list.len(),
            ConfigElement::Node(node) => node.len(),
        }
    }

    /// Children of a container in natural order, with node keys attached.
    ///
    /// Scalars have no children and return an empty vector.
    pub fn children(&self) -> Vec<(Option<String>, ConfigElement)> {
        match self {
            ConfigElement::Scalar(_) => Vec::new(),
            ConfigElement::List(list) => {
                list.elements().into_iter().map(|e| (None, e)).collect()
            }
            ConfigElement::Node(node) => node
                .entries()
                .into_iter()
                .map(|(k, v)| (Some(k), v))
                .collect(),
        }
    }

    /// Stable identity for containers, used by cycle tables.
    ///
    /// Scalars are values and carry no identity.
    pub(crate) fn ptr_id(&self) -> Option<usize> {
        match self {
            ConfigElement::Scalar(_) => None,
            ConfigElement::List(list) => Some(list.ptr_id()),
            ConfigElement::Node(node) => Some(node.ptr_id()),
        }
    }

    /// A short single-level description used in diagnostics.
    ///
    /// Only the top level is described, so self-referential elements
    /// stay printable.
    pub fn digest(&self) -> String {
        match self {
            ConfigElement::Scalar(s) => format!("{} scalar", s.type_name()),
            ConfigElement::List(list) => format!("list of {} elements", list.len()),
            ConfigElement::Node(node) => {
                format!("node with keys [{}]", node.keys().join(", "))
            }
        }
    }
}

// Debug/Display print container contents but cut recursion at the first
// revisited container, so self-referential elements stay printable.
pub(crate) fn fmt_element(
    element: &ConfigElement,
    f: &mut fmt::Formatter<'_>,
    in_progress: &mut Vec<usize>,
) -> fmt::Result {
    match element {
        ConfigElement::Scalar(Scalar::Text(s)) => write!(f, "{s:?}"),
        ConfigElement::Scalar(s) => write!(f, "{s}"),
        ConfigElement::List(list) => {
            if in_progress.contains(&list.ptr_id()) {
                return write!(f, "[...]");
            }
            in_progress.push(list.ptr_id());
            write!(f, "[")?;
            for (i, item) in list.elements().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_element(item, f, in_progress)?;
            }
            in_progress.pop();
            write!(f, "]")
        }
        ConfigElement::Node(node) => {
            if in_progress.contains(&node.ptr_id()) {
                return write!(f, "{{...}}");
            }
            in_progress.push(node.ptr_id());
            write!(f, "{{")?;
            for (i, (key, value)) in node.entries().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}: ")?;
                fmt_element(value, f, in_progress)?;
            }
            in_progress.pop();
            write!(f, "}}")
        }
    }
}

impl fmt::Debug for ConfigElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_element(self, f, &mut Vec::new())
    }
}

impl fmt::Display for ConfigElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_element(self, f, &mut Vec::new())
    }
}

impl From<Scalar> for ConfigElement {
    fn from(value: Scalar) -> Self {
        ConfigElement::Scalar(value)
    }
}

impl From<bool> for ConfigElement {
    fn from(value: bool) -> Self {
        ConfigElement::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ConfigElement {
    fn from(value: i64) -> Self {
        ConfigElement::Scalar(Scalar::Int(value))
    }
}

impl From<i32> for ConfigElement {
    fn from(value: i32) -> Self {
        ConfigElement::Scalar(Scalar::Int(value as i64))
    }
}

impl From<u32> for ConfigElement {
    fn from(value: u32) -> Self {
        ConfigElement::Scalar(Scalar::Int(value as i64))
    }
}

impl From<f64> for ConfigElement {
    fn from(value: f64) -> Self {
        ConfigElement::Scalar(Scalar::Float(value))
    }
}

impl From<String> for ConfigElement {
    fn from(value: String) -> Self {
        ConfigElement::Scalar(Scalar::Text(value))
    }
}

impl From<&str> for ConfigElement {
    fn from(value: &str) -> Self {
        ConfigElement::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<ConfigList> for ConfigElement {
    fn from(value: ConfigList) -> Self {
        ConfigElement::List(value)
    }
}

impl From<ConfigNode> for ConfigElement {
    fn from(value: ConfigNode) -> Self {
        ConfigElement::Node(value)
    }
}

impl FromIterator<ConfigElement> for ConfigElement {
    fn from_iter<I: IntoIterator<Item = ConfigElement>>(iter: I) -> Self {
        ConfigElement::List(iter.into_iter().collect())
    }
}
