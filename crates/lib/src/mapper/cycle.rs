//! The cycle table: identity bindings for one traversal.

use std::collections::HashMap;

/// An identity map from container identities to their already-produced
/// counterparts, scoped to one top-level mapping call.
///
/// During element→object this binds element identities to objects; during
/// object→element the other way around. Looking an identity up before
/// descending, and binding prebuilt values before recursing, is what
/// makes traversal of cyclic inputs terminate.
pub(crate) struct IdentityTable<V> {
    entries: HashMap<usize, V>,
}

impl<V: Clone> IdentityTable<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: usize) -> Option<V> {
        self.entries.get(&id).cloned()
    }

    pub fn insert(&mut self, id: usize, value: V) {
        self.entries.insert(id, value);
    }
}
