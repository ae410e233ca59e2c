//! Golden closures.
//!
//! Small hand-checked graphs with the closure each one must produce. Any
//! change to traversal order, inversion or root stripping shows up here.

use permgraph::{MapConfig, NoopRegistry, Permission, PermissionMap};

/// A golden resolution case.
#[derive(Debug, Clone)]
pub struct GoldenClosure {
    /// Human-readable name for the case.
    pub name: &'static str,
    /// Definitions to register, in order.
    pub definitions: &'static [(&'static str, &'static [(&'static str, bool)])],
    /// Key to resolve.
    pub root: &'static str,
    /// Value the root is granted with.
    pub value: bool,
    /// Expected closure, sorted by key.
    pub expected: &'static [(&'static str, bool)],
}

/// Get all golden closures.
pub fn all_vectors() -> Vec<GoldenClosure> {
    vec![
        GoldenClosure {
            name: "childless root",
            definitions: &[("a", &[])],
            root: "a",
            value: true,
            expected: &[],
        },
        GoldenClosure {
            name: "undeclared root",
            definitions: &[],
            root: "ghost",
            value: false,
            expected: &[],
        },
        GoldenClosure {
            name: "chain with false grandchild",
            definitions: &[("a", &[("b", true)]), ("b", &[("c", false)])],
            root: "a",
            value: true,
            expected: &[("b", true), ("c", false)],
        },
        GoldenClosure {
            name: "chain granted false",
            definitions: &[("a", &[("b", true)]), ("b", &[("c", false)])],
            root: "a",
            value: false,
            // b = true ^ true = false; c = false ^ true = true
            expected: &[("b", false), ("c", true)],
        },
        GoldenClosure {
            name: "negated link",
            definitions: &[("a", &[("b", false)]), ("b", &[("c", true), ("d", false)])],
            root: "a",
            value: true,
            expected: &[("b", false), ("c", false), ("d", true)],
        },
        GoldenClosure {
            name: "two node cycle",
            definitions: &[("a", &[("b", true)]), ("b", &[("a", true)])],
            root: "a",
            value: true,
            expected: &[("b", true)],
        },
        GoldenClosure {
            name: "self loop",
            definitions: &[("a", &[("a", true), ("b", true)])],
            root: "a",
            value: true,
            expected: &[("b", true)],
        },
        GoldenClosure {
            name: "mixed case keys",
            definitions: &[("Foo.Bar", &[("Foo.Baz", true)]), ("FOO.BAZ", &[("foo.qux", false)])],
            root: "foo.bar",
            value: true,
            expected: &[("foo.baz", true), ("foo.qux", false)],
        },
        GoldenClosure {
            name: "first path wins",
            definitions: &[
                ("top", &[("left", true), ("right", false)]),
                ("left", &[("bottom", true)]),
                ("right", &[("bottom", true)]),
            ],
            root: "top",
            value: true,
            expected: &[("bottom", true), ("left", true), ("right", false)],
        },
        GoldenClosure {
            name: "undeclared leaf is recorded",
            definitions: &[("kit", &[("kit.tools", true), ("kit.armor", false)])],
            root: "kit",
            value: true,
            expected: &[("kit.armor", false), ("kit.tools", true)],
        },
    ]
}

/// Build a map holding the case's definitions.
pub fn map_for_vector(vector: &GoldenClosure) -> PermissionMap<NoopRegistry> {
    let map = PermissionMap::with_config(NoopRegistry, MapConfig::default());
    for (key, children) in vector.definitions {
        let permission = Permission::with_children(key, children).expect("golden permission");
        map.register(key, permission).expect("golden registration");
    }
    map
}

/// Resolve a case, returning the closure sorted by key.
pub fn resolve_vector(vector: &GoldenClosure) -> Vec<(String, bool)> {
    map_for_vector(vector)
        .children_of(vector.root, vector.value)
        .to_sorted_vec()
        .into_iter()
        .map(|(k, v)| (k.into_string(), v))
        .collect()
}

/// Check every golden closure.
///
/// Returns `(name, matches, actual)` per case.
pub fn verify_all_vectors() -> Vec<(String, bool, Vec<(String, bool)>)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = resolve_vector(v);
            let matches = actual.len() == v.expected.len()
                && actual
                    .iter()
                    .zip(v.expected)
                    .all(|((k, val), (ek, ev))| k == ek && val == ev);
            (v.name.to_string(), matches, actual)
        })
        .collect()
}
