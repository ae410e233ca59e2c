//! # permgraph core
//!
//! Pure data types for permgraph: permission keys, permission definitions
//! and descriptor documents.
//!
//! This crate contains no shared state and no caching. The resolver lives in
//! `permgraph-resolve` and the concurrent map in `permgraph`.
//!
//! ## Key Types
//!
//! - [`PermissionKey`] - Case-insensitive permission identifier
//! - [`Permission`] - A definition with ordered child declarations
//! - [`PermissionDefault`] - Default holder policy of a permission
//! - [`Descriptor`] - A parsed JSON permission descriptor

pub mod descriptor;
pub mod error;
pub mod permission;
pub mod types;

pub use descriptor::Descriptor;
pub use error::{CoreError, Result};
pub use permission::{Permission, PermissionBuilder, PermissionDefault};
pub use types::PermissionKey;
