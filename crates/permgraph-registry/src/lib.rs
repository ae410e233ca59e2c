//! # permgraph registry
//!
//! The collaborator that records which permission keys exist. The
//! permission map calls [`Registry::insert`] on every registration; the
//! registry is then used for enumeration and tab-completion.
//!
//! ## Key Types
//!
//! - [`Registry`] - The single-method trait the map depends on
//! - [`MemoryRegistry`] - Sorted in-memory set with prefix queries
//! - [`NoopRegistry`] - Discards everything
//!
//! ## Usage
//!
//! ```rust
//! use permgraph_core::PermissionKey;
//! use permgraph_registry::{MemoryRegistry, Registry};
//!
//! let registry = MemoryRegistry::new();
//! registry.insert(&PermissionKey::new("essentials.home").unwrap());
//! registry.insert(&PermissionKey::new("essentials.warp").unwrap());
//!
//! assert_eq!(registry.complete("essentials.h").len(), 1);
//! ```

pub mod memory;
pub mod traits;

pub use memory::MemoryRegistry;
pub use traits::{NoopRegistry, Registry};
