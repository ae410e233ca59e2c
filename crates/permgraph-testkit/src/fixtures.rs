//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use permgraph::{MapConfig, MemoryRegistry, Permission, PermissionMap};

/// A test fixture with a permission map and the registry it reports to.
pub struct TestFixture {
    pub registry: Arc<MemoryRegistry>,
    pub map: PermissionMap<Arc<MemoryRegistry>>,
}

impl TestFixture {
    /// Create a fixture with the default config.
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    /// Create a fixture with an explicit config.
    pub fn with_config(config: MapConfig) -> Self {
        let registry = Arc::new(MemoryRegistry::new());
        let map = PermissionMap::with_config(Arc::clone(&registry), config);
        Self { registry, map }
    }

    /// Register `key` with the given children.
    ///
    /// # Panics
    ///
    /// On an empty key; fixtures are written by hand.
    pub fn define(&self, key: &str, children: &[(&str, bool)]) -> &Self {
        let permission = Permission::with_children(key, children).expect("valid fixture permission");
        self.map.register(key, permission).expect("fixture registration");
        self
    }

    /// Register every definition in `permissions` under its own key.
    pub fn define_all(&self, permissions: impl IntoIterator<Item = Permission>) -> &Self {
        for permission in permissions {
            self.map
                .register_permission(permission)
                .expect("fixture registration");
        }
        self
    }

    /// The closure of `key` as sorted `(name, value)` pairs.
    pub fn closure(&self, key: &str, value: bool) -> Vec<(String, bool)> {
        self.map
            .children_of(key, value)
            .to_sorted_vec()
            .into_iter()
            .map(|(k, v)| (k.into_string(), v))
            .collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// `prefix.0 -> prefix.1 -> ... -> prefix.{len-1}`, every link `true`.
pub fn chain(prefix: &str, len: usize) -> Vec<Permission> {
    (0..len.saturating_sub(1))
        .map(|i| {
            let child = format!("{prefix}.{}", i + 1);
            Permission::with_children(&format!("{prefix}.{i}"), &[(child.as_str(), true)])
                .expect("chain permission")
        })
        .collect()
}

/// A chain whose last node links back to the first.
pub fn ring(prefix: &str, len: usize) -> Vec<Permission> {
    (0..len)
        .map(|i| {
            let child = format!("{prefix}.{}", (i + 1) % len);
            Permission::with_children(&format!("{prefix}.{i}"), &[(child.as_str(), true)])
                .expect("ring permission")
        })
        .collect()
}

/// `top -> [left:true, right:false]`, both sides pointing at `bottom:true`.
pub fn diamond() -> Vec<Permission> {
    vec![
        Permission::with_children("top", &[("left", true), ("right", false)]).expect("diamond"),
        Permission::with_children("left", &[("bottom", true)]).expect("diamond"),
        Permission::with_children("right", &[("bottom", true)]).expect("diamond"),
    ]
}
