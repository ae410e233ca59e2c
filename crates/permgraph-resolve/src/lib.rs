//! # permgraph resolve
//!
//! Computes what a permission implies and memoizes the answer.
//!
//! ## Overview
//!
//! A permission definition declares children, each with the value the child
//! receives when the parent is granted. Children can declare children of
//! their own, and the graph may contain cycles. [`resolve_children`] walks
//! the graph from a root grant and produces a [`ResolvedChildren`]: every
//! reachable key with its effective value, the root itself excluded.
//!
//! ## Value Inversion
//!
//! A child's effective value is its declared value XOR an inversion flag.
//! The flag is the negation of the parent's effective value, so a subtree
//! reached through a `false` link is resolved as if granted negatively.
//!
//! ## Caching
//!
//! [`ChildCache`] keeps one [`LoadingCache`] per granted value. At most one
//! resolution runs per (key, value) at a time; everyone else waits for it
//! and shares the result. The owner of the definitions calls
//! [`ChildCache::invalidate_all`] after every change.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use permgraph_core::{Permission, PermissionKey};
//! use permgraph_resolve::ChildCache;
//!
//! let admin = Permission::with_children("admin", &[("kick", true), ("ban", true)]).unwrap();
//! let mut definitions = HashMap::new();
//! definitions.insert(admin.key().clone(), Arc::new(admin));
//!
//! let cache = ChildCache::new();
//! let children = cache.children_of(&definitions, &PermissionKey::new("Admin").unwrap(), true);
//! assert_eq!(children.get("kick"), Some(true));
//! ```

pub mod cache;
pub mod resolved;
pub mod resolver;

pub use cache::{ChildCache, LoadingCache};
pub use resolved::ResolvedChildren;
pub use resolver::{resolve_children, DefinitionLookup};
