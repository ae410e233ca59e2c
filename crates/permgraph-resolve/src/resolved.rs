//! The resolved child map.

use std::collections::hash_map;
use std::collections::HashMap;

use permgraph_core::PermissionKey;

/// Every permission implied by a root grant, with its effective value.
///
/// Never contains the root key mapped to the root value. Immutable once
/// built; the cache shares one instance per (key, value) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedChildren {
    children: HashMap<PermissionKey, bool>,
}

impl ResolvedChildren {
    /// An empty closure.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Effective value of `key`, if implied. The key is normalized first.
    pub fn get(&self, key: &str) -> Option<bool> {
        let key = PermissionKey::parse(key)?;
        self.children.get(&key).copied()
    }

    /// Effective value of an already normalized key.
    pub fn get_key(&self, key: &PermissionKey) -> Option<bool> {
        self.children.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&PermissionKey, bool)> {
        self.children.iter().map(|(k, v)| (k, *v))
    }

    /// Keys that resolve to `true`.
    pub fn granted(&self) -> impl Iterator<Item = &PermissionKey> {
        self.children.iter().filter(|(_, v)| **v).map(|(k, _)| k)
    }

    /// Keys that resolve to `false`.
    pub fn denied(&self) -> impl Iterator<Item = &PermissionKey> {
        self.children.iter().filter(|(_, v)| !**v).map(|(k, _)| k)
    }

    /// Entries sorted by key, for stable output.
    pub fn to_sorted_vec(&self) -> Vec<(PermissionKey, bool)> {
        let mut entries: Vec<_> = self.children.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &HashMap<PermissionKey, bool> {
        &self.children
    }
}

impl From<HashMap<PermissionKey, bool>> for ResolvedChildren {
    fn from(children: HashMap<PermissionKey, bool>) -> Self {
        Self { children }
    }
}

impl FromIterator<(PermissionKey, bool)> for ResolvedChildren {
    fn from_iter<I: IntoIterator<Item = (PermissionKey, bool)>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResolvedChildren {
    type Item = (PermissionKey, bool);
    type IntoIter = hash_map::IntoIter<PermissionKey, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}
