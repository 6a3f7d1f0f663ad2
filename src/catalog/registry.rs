//! Named child mappings
//!
//! A [`Registry`] maps child names to shared node handles. It carries no lock
//! of its own: every registry lives inside its parent node's state and is
//! guarded by the parent's lock, which also covers the parent's attributes.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Child name to node mapping
#[derive(Debug)]
pub(crate) struct Registry<T> {
    entries: IndexMap<String, Arc<T>>,
}

impl<T> Registry<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).cloned()
    }

    /// Return the existing child, or insert the one built by `make`.
    /// The flag is true when this call inserted the child.
    pub(crate) fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> (Arc<T>, bool)
    where
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.entries.get(name) {
            return (existing.clone(), false);
        }
        let child = Arc::new(make());
        self.entries.insert(name.to_string(), child.clone());
        (child, true)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Arc<T>> {
        self.entries.shift_remove(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Child names, sorted
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Child handles, sorted by name
    pub(crate) fn values(&self) -> Vec<Arc<T>> {
        let mut entries: Vec<(&String, &Arc<T>)> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Get-or-create a child held in one of a node's registries.
///
/// Existing children are found under the parent's read lock. Creation takes
/// the parent's write lock and checks again, so concurrent callers racing on
/// the same new name all receive the single node that won the insert.
pub(crate) fn get_or_create<S, T, F>(
    lock: &RwLock<S>,
    select: fn(&S) -> &Registry<T>,
    select_mut: fn(&mut S) -> &mut Registry<T>,
    name: &str,
    make: F,
) -> (Arc<T>, bool)
where
    F: FnOnce() -> T,
{
    if let Some(existing) = select(&*lock.read()).get(name) {
        return (existing, false);
    }
    let mut state = lock.write();
    select_mut(&mut *state).get_or_insert_with(name, make)
}

/// Look up a child without creating it
pub(crate) fn get_if_exists<S, T>(
    lock: &RwLock<S>,
    select: fn(&S) -> &Registry<T>,
    name: &str,
) -> Option<Arc<T>> {
    select(&*lock.read()).get(name)
}

/// Detach a child from its parent. The returned node stays usable.
pub(crate) fn remove<S, T>(
    lock: &RwLock<S>,
    select_mut: fn(&mut S) -> &mut Registry<T>,
    name: &str,
) -> Option<Arc<T>> {
    select_mut(&mut *lock.write()).remove(name)
}
