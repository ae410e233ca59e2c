//! Registry trait: the narrow interface the permission map talks to.
//!
//! The map records every key it sees so that other parts of the host can
//! enumerate and complete permission names. Nothing else flows through here.

use std::sync::Arc;

use permgraph_core::PermissionKey;

/// Sink for permission keys that are known to exist.
///
/// Called on every registration, including re-registration of a key that
/// is already recorded, so implementations must be idempotent.
pub trait Registry: Send + Sync {
    /// Record that `key` exists.
    fn insert(&self, key: &PermissionKey);
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    fn insert(&self, key: &PermissionKey) {
        (**self).insert(key)
    }
}

impl<R: Registry + ?Sized> Registry for &R {
    fn insert(&self, key: &PermissionKey) {
        (**self).insert(key)
    }
}

/// A registry that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistry;

impl Registry for NoopRegistry {
    fn insert(&self, _key: &PermissionKey) {}
}
