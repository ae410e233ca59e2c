//! The permission map: concurrent definition store plus child caches.
//!
//! Every mutation records the key with the registry collaborator and
//! clears both child caches. Reads never take a global lock.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;

use permgraph_core::{Descriptor, Permission, PermissionKey};
use permgraph_registry::{MemoryRegistry, Registry};
use permgraph_resolve::{resolve_children, ChildCache, DefinitionLookup, ResolvedChildren};

use crate::error::{MapError, Result};

/// Configuration for a [`PermissionMap`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Memoize resolved children. When off, every query walks the graph.
    pub cache_enabled: bool,
    /// Reject registrations whose key differs from the definition's key.
    pub strict_keys: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            strict_keys: false,
        }
    }
}

impl MapConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(MapError::Config)
    }
}

/// Concurrent map of permission definitions with cached child resolution.
///
/// Provides:
/// - Registering, replacing and removing definitions
/// - Case-insensitive lookups
/// - Memoized transitive child resolution per (key, value)
/// - Bulk loading from descriptor documents
pub struct PermissionMap<R: Registry = MemoryRegistry> {
    /// Definitions keyed by normalized key.
    definitions: DashMap<PermissionKey, Arc<Permission>>,
    /// Resolved children for keys granted true and false.
    children: ChildCache,
    /// Collaborator told about every registered key.
    registry: R,
    /// Configuration.
    config: MapConfig,
}

impl<R: Registry> PermissionMap<R> {
    /// Create an empty map with the default config.
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, MapConfig::default())
    }

    /// Create an empty map.
    pub fn with_config(registry: R, config: MapConfig) -> Self {
        Self {
            definitions: DashMap::new(),
            children: ChildCache::new(),
            registry,
            config,
        }
    }

    /// Create a map seeded with existing definitions, registered in order.
    pub fn with_existing<I, K>(registry: R, config: MapConfig, existing: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Permission)>,
        K: AsRef<str>,
    {
        let map = Self::with_config(registry, config);
        map.register_all(existing)?;
        Ok(map)
    }

    /// The registry collaborator.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Register `permission` under `key`, replacing any previous definition.
    ///
    /// Returns the replaced definition, if there was one.
    pub fn register(&self, key: &str, permission: Permission) -> Result<Option<Arc<Permission>>> {
        let key = self.registration_key(key, &permission)?;

        self.registry.insert(&key);
        let previous = self.definitions.insert(key.clone(), Arc::new(permission));
        self.invalidate_all();

        tracing::debug!(key = %key, replaced = previous.is_some(), "registered permission");
        Ok(previous)
    }

    /// Register a definition under its own key.
    pub fn register_permission(&self, permission: Permission) -> Result<Option<Arc<Permission>>> {
        let key = permission.key().clone();
        self.register(key.as_str(), permission)
    }

    /// Register each entry in order.
    ///
    /// Not atomic: stops at the first invalid entry and leaves earlier
    /// entries registered.
    pub fn register_all<I, K>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Permission)>,
        K: AsRef<str>,
    {
        for (key, permission) in entries {
            self.register(key.as_ref(), permission)?;
        }
        Ok(())
    }

    /// Register `permission` only if `key` has no definition yet.
    ///
    /// The key is recorded with the registry either way. Returns the
    /// existing definition when nothing was inserted.
    pub fn register_if_absent(
        &self,
        key: &str,
        permission: Permission,
    ) -> Result<Option<Arc<Permission>>> {
        let key = self.registration_key(key, &permission)?;

        self.registry.insert(&key);
        match self.definitions.entry(key.clone()) {
            Entry::Occupied(existing) => return Ok(Some(Arc::clone(existing.get()))),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(permission));
            }
        }
        self.invalidate_all();

        tracing::debug!(key = %key, "registered absent permission");
        Ok(None)
    }

    /// Remove the definition for `key`. An empty key removes nothing.
    pub fn remove(&self, key: &str) -> Option<Arc<Permission>> {
        let key = PermissionKey::parse(key)?;
        let (_, removed) = self.definitions.remove(&key)?;
        self.invalidate_all();

        tracing::debug!(key = %key, "removed permission");
        Some(removed)
    }

    /// Remove the definition for `key` only if it equals `permission`.
    pub fn remove_if(&self, key: &str, permission: &Permission) -> bool {
        let Some(key) = PermissionKey::parse(key) else {
            return false;
        };

        let removed = self
            .definitions
            .remove_if(&key, |_, current| **current == *permission)
            .is_some();

        if removed {
            self.invalidate_all();
            tracing::debug!(key = %key, "removed matching permission");
        }
        removed
    }

    /// Remove every definition.
    pub fn clear(&self) {
        self.definitions.clear();
        self.invalidate_all();
        tracing::debug!("cleared permission map");
    }

    /// Load a JSON descriptor and register its definitions in order.
    ///
    /// Returns the number of definitions registered.
    pub fn load_descriptor(&self, text: &str) -> Result<usize> {
        let descriptor = Descriptor::from_json(text)?;
        self.register_descriptor(descriptor)
    }

    /// Load a JSON descriptor from a file.
    pub fn load_descriptor_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let descriptor = Descriptor::from_reader(BufReader::new(file))?;

        tracing::debug!(path = %path.display(), count = descriptor.len(), "loaded descriptor");
        self.register_descriptor(descriptor)
    }

    fn register_descriptor(&self, descriptor: Descriptor) -> Result<usize> {
        let count = descriptor.len();
        for permission in descriptor.into_permissions() {
            self.register_permission(permission)?;
        }
        Ok(count)
    }

    fn registration_key(&self, key: &str, permission: &Permission) -> Result<PermissionKey> {
        let key = PermissionKey::new(key)
            .map_err(|_| MapError::InvalidArgument("permission key is empty".into()))?;

        if self.config.strict_keys && key != *permission.key() {
            return Err(MapError::KeyMismatch {
                key: key.into_string(),
                definition: permission.key().to_string(),
            });
        }

        if permission.is_self_referential() {
            tracing::warn!(key = %permission.key(), "permission declares itself as a child");
        }

        Ok(key)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The definition for `key`. An empty key finds nothing.
    pub fn lookup(&self, key: &str) -> Option<Arc<Permission>> {
        let key = PermissionKey::parse(key)?;
        self.definition(&key)
    }

    /// Whether `key` has a definition.
    pub fn contains_key(&self, key: &str) -> bool {
        PermissionKey::parse(key).is_some_and(|key| self.definitions.contains_key(&key))
    }

    /// Whether any registered definition equals `permission`.
    pub fn contains_value(&self, permission: &Permission) -> bool {
        self.definitions
            .iter()
            .any(|entry| **entry.value() == *permission)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<PermissionKey> {
        let mut keys: Vec<_> = self.definitions.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Everything `key` implies when granted with `value`.
    ///
    /// Memoized per (key, value) until the next mutation. An empty key
    /// yields an empty result.
    pub fn children_of(&self, key: &str, value: bool) -> Arc<ResolvedChildren> {
        let Some(key) = PermissionKey::parse(key) else {
            return Arc::new(ResolvedChildren::empty());
        };

        if self.config.cache_enabled {
            self.children.children_of(self, &key, value)
        } else {
            Arc::new(resolve_children(self, &key, value))
        }
    }

    /// The value `child` receives when `key` is granted with `value`, or
    /// `None` if `key` does not imply `child`.
    pub fn implied_value(&self, key: &str, value: bool, child: &str) -> Option<bool> {
        self.children_of(key, value).get(child)
    }

    /// Drop every memoized resolution.
    pub fn invalidate_all(&self) {
        self.children.invalidate_all();
        tracing::trace!("invalidated child caches");
    }

    /// Number of memoized resolutions currently held.
    pub fn cached_resolutions(&self) -> usize {
        self.children.len()
    }
}

impl<R: Registry> DefinitionLookup for PermissionMap<R> {
    fn definition(&self, key: &PermissionKey) -> Option<Arc<Permission>> {
        self.definitions.get(key).map(|entry| Arc::clone(entry.value()))
    }
}

impl<R: Registry + Default> Default for PermissionMap<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permgraph_registry::NoopRegistry;

    fn perm(key: &str, children: &[(&str, bool)]) -> Permission {
        Permission::with_children(key, children).unwrap()
    }

    #[test]
    fn test_register_returns_previous() {
        let map = PermissionMap::new(NoopRegistry);

        assert!(map.register("a", perm("a", &[])).unwrap().is_none());
        let previous = map.register("A", perm("a", &[("b", true)])).unwrap();
        assert_eq!(previous.as_deref(), Some(&perm("a", &[])));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_register_empty_key_is_invalid() {
        let map = PermissionMap::new(NoopRegistry);
        let err = map.register("", perm("a", &[])).unwrap_err();
        assert!(matches!(err, MapError::InvalidArgument(_)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_strict_keys() {
        let config = MapConfig {
            strict_keys: true,
            ..MapConfig::default()
        };
        let map = PermissionMap::with_config(NoopRegistry, config);

        let err = map.register("b", perm("a", &[])).unwrap_err();
        assert!(matches!(err, MapError::KeyMismatch { .. }));
        assert!(map.register("A", perm("a", &[])).is_ok());
    }

    #[test]
    fn test_register_all_stops_at_first_error() {
        let map = PermissionMap::new(NoopRegistry);
        let entries = vec![
            ("a", perm("a", &[])),
            ("", perm("b", &[])),
            ("c", perm("c", &[])),
        ];

        assert!(map.register_all(entries).is_err());
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("c"));
    }

    #[test]
    fn test_register_if_absent() {
        let registry = MemoryRegistry::new();
        let map = PermissionMap::new(&registry);

        assert!(map.register_if_absent("a", perm("a", &[("x", true)])).unwrap().is_none());
        let _ = map.children_of("a", true);
        assert_eq!(map.cached_resolutions(), 1);

        let existing = map.register_if_absent("a", perm("a", &[])).unwrap();
        assert_eq!(existing.as_deref(), Some(&perm("a", &[("x", true)])));
        // Nothing changed, so the memoized closure survives.
        assert_eq!(map.cached_resolutions(), 1);
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_null_safe_queries() {
        let map = PermissionMap::new(NoopRegistry);
        map.register("a", perm("a", &[])).unwrap();

        assert!(map.lookup("").is_none());
        assert!(map.remove("").is_none());
        assert!(!map.remove_if("", &perm("a", &[])));
        assert!(!map.contains_key(""));
        assert!(map.children_of("", true).is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_if_requires_equal_definition() {
        let map = PermissionMap::new(NoopRegistry);
        map.register("a", perm("a", &[("b", true)])).unwrap();

        assert!(!map.remove_if("a", &perm("a", &[("b", false)])));
        assert!(map.contains_key("a"));
        assert!(map.remove_if("A", &perm("a", &[("b", true)])));
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_contains_value() {
        let map = PermissionMap::new(NoopRegistry);
        map.register("a", perm("a", &[("b", true)])).unwrap();

        assert!(map.contains_value(&perm("a", &[("b", true)])));
        assert!(!map.contains_value(&perm("a", &[])));
    }

    #[test]
    fn test_remove_invalidates() {
        let map = PermissionMap::new(NoopRegistry);
        map.register("a", perm("a", &[("b", true)])).unwrap();
        map.register("b", perm("b", &[("c", true)])).unwrap();

        assert_eq!(map.children_of("a", true).len(), 2);
        assert!(map.remove("b").is_some());
        assert_eq!(map.cached_resolutions(), 0);

        let children = map.children_of("a", true);
        assert_eq!(children.get("b"), Some(true));
        assert!(!children.contains("c"));
    }

    #[test]
    fn test_uncached_config_recomputes() {
        let config = MapConfig {
            cache_enabled: false,
            ..MapConfig::default()
        };
        let map = PermissionMap::with_config(NoopRegistry, config);
        map.register("a", perm("a", &[("b", true)])).unwrap();

        let first = map.children_of("a", true);
        let second = map.children_of("a", true);
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(map.cached_resolutions(), 0);
    }

    #[test]
    fn test_config_from_json() {
        let config = MapConfig::from_json(r#"{ "strict_keys": true }"#).unwrap();
        assert!(config.strict_keys);
        assert!(config.cache_enabled);

        assert!(matches!(
            MapConfig::from_json("{ \"cache_enabled\": 1 }"),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_clear() {
        let map = PermissionMap::new(NoopRegistry);
        map.register("a", perm("a", &[("b", true)])).unwrap();
        let _ = map.children_of("a", true);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.cached_resolutions(), 0);
        assert_eq!(map.children_of("a", true).get("b"), None);
    }
}
