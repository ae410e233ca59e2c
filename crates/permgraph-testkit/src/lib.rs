//! # permgraph testkit
//!
//! Testing utilities for permgraph.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden closures**: Hand-checked graphs with the closure they must resolve to
//! - **Generators**: Proptest strategies for random permission graphs, plus a
//!   recursive reference resolver to compare against
//! - **Fixtures**: A map wired to an inspectable registry, and canned graphs
//!
//! ## Golden Closures
//!
//! ```rust
//! use permgraph_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual:?}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use permgraph_testkit::generators::{GraphParams, lookup_table, permissions_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn resolution_terminates(params: GraphParams) {
//!         let table = lookup_table(&permissions_from_params(&params));
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use permgraph_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.define("a", &[("b", true)]);
//! assert_eq!(fixture.closure("a", true), vec![("b".to_string(), true)]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{chain, diamond, ring, TestFixture};
pub use generators::{lookup_table, permissions_from_params, random_graph, reference_resolve, GraphParams};
pub use vectors::{all_vectors, resolve_vector, verify_all_vectors, GoldenClosure};
