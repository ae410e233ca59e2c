//! In-memory registry.
//!
//! Keeps every recorded key in a sorted set so that prefix queries are a
//! range scan. Thread-safe via RwLock.

use std::collections::BTreeSet;
use std::ops::Bound;

use parking_lot::RwLock;

use permgraph_core::PermissionKey;

use crate::traits::Registry;

/// Sorted, thread-safe set of known permission keys.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RwLock<BTreeSet<PermissionKey>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has been recorded.
    pub fn contains(&self, key: &str) -> bool {
        match PermissionKey::parse(key) {
            Some(key) => self.keys.read().contains(&key),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// All recorded keys, sorted.
    pub fn keys(&self) -> Vec<PermissionKey> {
        self.keys.read().iter().cloned().collect()
    }

    /// Recorded keys starting with `prefix`, sorted.
    ///
    /// The prefix is matched case-insensitively. An empty prefix returns
    /// every key.
    pub fn complete(&self, prefix: &str) -> Vec<PermissionKey> {
        let prefix = prefix.to_lowercase();
        let keys = self.keys.read();

        keys.range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|k| k.as_str().starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Distinct segments directly below `node` in the dotted hierarchy.
    ///
    /// With keys `a.b.c`, `a.b.d` and `a.e`, `child_segments("a")` yields
    /// `["b", "e"]` and `child_segments("")` yields `["a"]`.
    pub fn child_segments(&self, node: &str) -> Vec<String> {
        let node = node.trim_end_matches('.').to_lowercase();
        let prefix = if node.is_empty() {
            String::new()
        } else {
            format!("{node}.")
        };

        let mut segments = BTreeSet::new();
        for key in self.complete(&prefix) {
            let rest = &key.as_str()[prefix.len()..];
            if let Some(segment) = rest.split('.').find(|s| !s.is_empty()) {
                segments.insert(segment.to_string());
            }
        }
        segments.into_iter().collect()
    }
}

impl Registry for MemoryRegistry {
    fn insert(&self, key: &PermissionKey) {
        let inserted = self.keys.write().insert(key.clone());
        if inserted {
            tracing::trace!(key = %key, "recorded permission key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PermissionKey {
        PermissionKey::new(s).unwrap()
    }

    fn registry(keys: &[&str]) -> MemoryRegistry {
        let registry = MemoryRegistry::new();
        for k in keys {
            registry.insert(&key(k));
        }
        registry
    }

    #[test]
    fn test_insert_is_idempotent() {
        let registry = registry(&["a.b", "A.B", "a.b"]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a.B"));
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_complete_prefix() {
        let registry = registry(&["essentials.home", "essentials.warp", "worldedit.wand", "essentials"]);

        let names: Vec<_> = registry
            .complete("Essentials.")
            .into_iter()
            .map(PermissionKey::into_string)
            .collect();
        assert_eq!(names, vec!["essentials.home", "essentials.warp"]);

        assert_eq!(registry.complete("").len(), 4);
        assert!(registry.complete("zzz").is_empty());
    }

    #[test]
    fn test_prefix_whitespace_is_not_trimmed() {
        let registry = registry(&["a.b", " a.c"]);

        assert_eq!(registry.complete("a").len(), 1);
        assert_eq!(registry.complete(" A")[0].as_str(), " a.c");
        assert_eq!(registry.child_segments(" a"), vec!["c"]);
        assert_eq!(registry.child_segments("a"), vec!["b"]);
    }

    #[test]
    fn test_child_segments() {
        let registry = registry(&["a.b.c", "a.b.d", "a.e", "f"]);

        assert_eq!(registry.child_segments(""), vec!["a", "f"]);
        assert_eq!(registry.child_segments("a"), vec!["b", "e"]);
        assert_eq!(registry.child_segments("a.b."), vec!["c", "d"]);
        assert!(registry.child_segments("a.e").is_empty());
    }

    proptest::proptest! {
        #[test]
        fn test_complete_matches_filter(
            names in proptest::collection::vec("[a-c]{1,3}(\\.[a-c]{1,3}){0,2}", 0..20),
            prefix in "[a-c]{0,2}",
        ) {
            let registry = MemoryRegistry::new();
            for name in &names {
                registry.insert(&key(name));
            }

            let mut expected: Vec<_> = registry
                .keys()
                .into_iter()
                .filter(|k| k.as_str().starts_with(&prefix))
                .collect();
            expected.sort();

            proptest::prop_assert_eq!(registry.complete(&prefix), expected);
        }
    }
}
