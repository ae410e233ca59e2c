//! # permgraph
//!
//! A permission map for multi-user servers that knows which permissions
//! imply which.
//!
//! ## Overview
//!
//! Permissions are dotted, case-insensitive names. A permission definition
//! may declare children: other permissions that are implied, with a value,
//! whenever the parent is granted. [`PermissionMap`] stores definitions and
//! answers "what does holding X with value V imply?" from a memoized
//! closure that is rebuilt after any change.
//!
//! ## Key Concepts
//!
//! - **Definition**: A key plus ordered child declarations
//! - **Closure**: Every key reachable from a root grant, with the value it
//!   ends up with, the root excluded
//! - **Inversion**: A subtree reached through a `false` link resolves with
//!   its values flipped
//! - **Registry**: A collaborator told about every registered key
//!
//! ## Usage
//!
//! ```rust
//! use permgraph::{Permission, PermissionMap, MemoryRegistry};
//!
//! let map = PermissionMap::new(MemoryRegistry::new());
//! map.register("mod.*", Permission::with_children("mod.*", &[("mod.kick", true), ("mod.ban", true)]).unwrap())
//!     .unwrap();
//! map.register("mod.ban", Permission::with_children("mod.ban", &[("mod.ban.ip", false)]).unwrap())
//!     .unwrap();
//!
//! let children = map.children_of("Mod.*", true);
//! assert_eq!(children.get("mod.kick"), Some(true));
//! assert_eq!(children.get("mod.ban.ip"), Some(false));
//! assert!(map.registry().contains("mod.ban"));
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `permgraph::core` - Keys, definitions, descriptors
//! - `permgraph::registry` - Registry collaborator
//! - `permgraph::resolve` - Resolver and loading caches

pub mod error;
pub mod map;

// Re-export component crates
pub use permgraph_core as core;
pub use permgraph_registry as registry;
pub use permgraph_resolve as resolve;

// Re-export main types for convenience
pub use error::{MapError, Result};
pub use map::{MapConfig, PermissionMap};

pub use permgraph_core::{Descriptor, Permission, PermissionBuilder, PermissionDefault, PermissionKey};
pub use permgraph_registry::{MemoryRegistry, NoopRegistry, Registry};
pub use permgraph_resolve::ResolvedChildren;
