//! Loading caches for resolved children.
//!
//! A [`LoadingCache`] computes a value on first request and hands the same
//! value to every later caller until it is invalidated. Each key owns a
//! `OnceLock` cell: callers racing on an empty cell block on the single
//! initializer instead of running the loader themselves.
//!
//! Invalidation drops the cells from the table. A caller that already
//! holds a dropped cell still finishes with it, but any call that starts
//! after `invalidate_all` returns gets a fresh cell.

use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use permgraph_core::PermissionKey;

use crate::resolved::ResolvedChildren;
use crate::resolver::{resolve_children, DefinitionLookup};

/// A concurrent memoization table with at most one load in flight per key.
pub struct LoadingCache<K, V> {
    cells: DashMap<K, Arc<OnceLock<V>>>,
}

impl<K, V> LoadingCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    /// The cached value for `key`, computing it with `load` if absent.
    ///
    /// `load` runs without any table lock held, so it may be slow or read
    /// other shared state. Concurrent callers for the same key wait for the
    /// first loader and receive its result.
    pub fn get_or_load<F>(&self, key: &K, load: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        // Bind first so the read guard is released before `entry` locks the
        // same shard for writing.
        let existing = self.cells.get(key).map(|cell| Arc::clone(cell.value()));
        let cell = match existing {
            Some(cell) => cell,
            None => Arc::clone(self.cells.entry(key.clone()).or_default().value()),
        };

        cell.get_or_init(|| load(key)).clone()
    }

    /// The cached value for `key`, if one has been computed.
    pub fn get_if_present(&self, key: &K) -> Option<V> {
        self.cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.cells.clear();
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for LoadingCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of caches behind `children_of`: one for keys granted `true`,
/// one for keys granted `false`.
#[derive(Default)]
pub struct ChildCache {
    granted: LoadingCache<PermissionKey, Arc<ResolvedChildren>>,
    denied: LoadingCache<PermissionKey, Arc<ResolvedChildren>>,
}

impl ChildCache {
    /// Create empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, value: bool) -> &LoadingCache<PermissionKey, Arc<ResolvedChildren>> {
        if value {
            &self.granted
        } else {
            &self.denied
        }
    }

    /// Resolved children of `key` granted with `value`, resolving through
    /// `lookup` on a miss.
    pub fn children_of<L>(&self, lookup: &L, key: &PermissionKey, value: bool) -> Arc<ResolvedChildren>
    where
        L: DefinitionLookup + ?Sized,
    {
        self.side(value)
            .get_or_load(key, |key| Arc::new(resolve_children(lookup, key, value)))
    }

    /// The memoized result, without computing.
    pub fn cached(&self, key: &PermissionKey, value: bool) -> Option<Arc<ResolvedChildren>> {
        self.side(value).get_if_present(key)
    }

    /// Clear both caches.
    pub fn invalidate_all(&self) {
        self.granted.invalidate_all();
        self.denied.invalidate_all();
    }

    /// Number of memoized closures across both caches.
    pub fn len(&self) -> usize {
        self.granted.len() + self.denied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
