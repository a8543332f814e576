//! Identity-aware structural equality for configuration elements.
//!
//! Elements form graphs, not trees: a list or node may contain itself. A
//! naive recursive comparison would never terminate on such inputs, so
//! equality is computed as a bisimulation: two elements are equal iff their
//! cycle structures match under some bijection of container identities.

use std::collections::HashSet;

use super::ConfigElement;

/// Compares two elements structurally with cycle awareness.
///
/// The `visited` set holds pairs of container identities currently being
/// compared higher up the stack. Re-encountering a pair means both sides
/// closed a cycle at the same point; the pair is presumed equal, which is
/// exactly the coinductive reading of graph equality.
pub(crate) fn elements_equal(a: &ConfigElement, b: &ConfigElement) -> bool {
    elements_equal_inner(a, b, &mut HashSet::new())
}

fn elements_equal_inner(
    a: &ConfigElement,
    b: &ConfigElement,
    visited: &mut HashSet<(usize, usize)>,
) -> bool {
    match (a, b) {
        (ConfigElement::Scalar(x), ConfigElement::Scalar(y)) => x == y,
        (ConfigElement::List(x), ConfigElement::List(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if !visited.insert((x.ptr_id(), y.ptr_id())) {
                return true;
            }
            let xs = x.elements();
            let ys = y.elements();
            let equal = xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(xe, ye)| elements_equal_inner(xe, ye, visited));
            visited.remove(&(x.ptr_id(), y.ptr_id()));
            equal
        }
        (ConfigElement::Node(x), ConfigElement::Node(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if !visited.insert((x.ptr_id(), y.ptr_id())) {
                return true;
            }
            // Key sets must agree; insertion order is not significant for
            // content equality.
            let equal = x.len() == y.len()
                && x.entries().iter().all(|(key, xe)| match y.get(key) {
                    Some(ye) => elements_equal_inner(xe, &ye, visited),
                    None => false,
                });
            visited.remove(&(x.ptr_id(), y.ptr_id()));
            equal
        }
        _ => false,
    }
}
