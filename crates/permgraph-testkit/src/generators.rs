//! Proptest generators for property-based testing.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use permgraph_core::{Permission, PermissionBuilder, PermissionKey};

/// A permission name drawn from a small alphabet, so that generated graphs
/// share nodes and form cycles.
pub fn key_name() -> impl Strategy<Value = String> {
    "[a-fA-F]{1,2}".prop_map(String::from)
}

/// Declared children of one node.
pub fn children(max: usize) -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec((key_name(), any::<bool>()), 0..=max)
}

/// Parameters for generating a permission graph.
#[derive(Debug, Clone)]
pub struct GraphParams {
    pub definitions: Vec<(String, Vec<(String, bool)>)>,
}

impl Arbitrary for GraphParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec((key_name(), children(4)), 0..12)
            .prop_map(|definitions| GraphParams { definitions })
            .boxed()
    }
}

impl GraphParams {
    /// Every name mentioned anywhere in the graph.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .definitions
            .iter()
            .flat_map(|(key, children)| {
                std::iter::once(key.to_lowercase())
                    .chain(children.iter().map(|(child, _)| child.to_lowercase()))
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Build definitions from parameters. A repeated key keeps the last
/// definition, matching what registering them in order would leave behind.
pub fn permissions_from_params(params: &GraphParams) -> Vec<Permission> {
    let mut by_key: Vec<Permission> = Vec::new();
    for (key, children) in &params.definitions {
        let mut builder = PermissionBuilder::new(PermissionKey::new(key).expect("generated key"));
        for (child, value) in children {
            builder = builder.child(PermissionKey::new(child).expect("generated key"), *value);
        }
        let permission = builder.build();

        match by_key.iter_mut().find(|p| p.key() == permission.key()) {
            Some(existing) => *existing = permission,
            None => by_key.push(permission),
        }
    }
    by_key
}

/// Index definitions by key for use as a `DefinitionLookup`.
pub fn lookup_table(permissions: &[Permission]) -> HashMap<PermissionKey, Arc<Permission>> {
    permissions
        .iter()
        .map(|p| (p.key().clone(), Arc::new(p.clone())))
        .collect()
}

/// Straight recursive rendition of child resolution, used as an oracle.
pub fn reference_resolve(
    definitions: &HashMap<PermissionKey, Arc<Permission>>,
    root: &PermissionKey,
    value: bool,
) -> HashMap<PermissionKey, bool> {
    fn walk(
        definitions: &HashMap<PermissionKey, Arc<Permission>>,
        accumulator: &mut HashMap<PermissionKey, bool>,
        children: &[(PermissionKey, bool)],
        invert: bool,
    ) {
        for (key, declared) in children {
            if accumulator.contains_key(key) {
                continue;
            }
            let effective = *declared ^ invert;
            accumulator.insert(key.clone(), effective);
            if let Some(definition) = definitions.get(key) {
                walk(definitions, accumulator, definition.children(), !effective);
            }
        }
    }

    let mut accumulator = HashMap::new();
    walk(definitions, &mut accumulator, &[(root.clone(), value)], false);
    if accumulator.get(root) == Some(&value) {
        accumulator.remove(root);
    }
    accumulator
}

/// A random graph of `nodes` permissions named `node.N`, each declaring up
/// to `fanout` children picked uniformly. Used by benchmarks.
pub fn random_graph<R: Rng>(rng: &mut R, nodes: usize, fanout: usize) -> Vec<Permission> {
    let names: Vec<PermissionKey> = (0..nodes)
        .map(|i| PermissionKey::new(&format!("node.{i}")).expect("generated key"))
        .collect();

    names
        .iter()
        .map(|name| {
            let count = rng.gen_range(0..=fanout);
            let mut builder = PermissionBuilder::new(name.clone());
            for child in names.choose_multiple(rng, count) {
                builder = builder.child(child.clone(), rng.gen_bool(0.8));
            }
            builder.build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use permgraph::{NoopRegistry, PermissionMap};
    use permgraph_resolve::resolve_children;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn test_iterative_matches_recursive(params: GraphParams, value: bool) {
            let permissions = permissions_from_params(&params);
            let table = lookup_table(&permissions);

            for name in params.names() {
                let root = PermissionKey::new(&name).unwrap();
                let resolved = resolve_children(&table, &root, value);
                let expected = reference_resolve(&table, &root, value);
                prop_assert_eq!(resolved.as_map(), &expected);
            }
        }

        #[test]
        fn test_root_never_maps_to_root_value(params: GraphParams, value: bool) {
            let permissions = permissions_from_params(&params);
            let table = lookup_table(&permissions);

            for name in params.names() {
                let root = PermissionKey::new(&name).unwrap();
                let resolved = resolve_children(&table, &root, value);
                prop_assert_ne!(resolved.get_key(&root), Some(value));
            }
        }

        #[test]
        fn test_closure_only_contains_declared_children(params: GraphParams, value: bool) {
            let permissions = permissions_from_params(&params);
            let table = lookup_table(&permissions);
            let names = params.names();

            for name in &names {
                let resolved = resolve_children(&table, &PermissionKey::new(name).unwrap(), value);
                for (key, _) in resolved.iter() {
                    prop_assert!(names.iter().any(|n| n == key.as_str()));
                }
            }
        }

        #[test]
        fn test_map_cache_matches_direct_resolution(params: GraphParams, value: bool) {
            let permissions = permissions_from_params(&params);
            let table = lookup_table(&permissions);
            let map = PermissionMap::new(NoopRegistry);
            for permission in permissions {
                map.register_permission(permission).unwrap();
            }

            for name in params.names() {
                let cached = map.children_of(&name.to_uppercase(), value);
                let direct = resolve_children(&table, &PermissionKey::new(&name).unwrap(), value);
                prop_assert_eq!(&*cached, &direct);

                let again = map.children_of(&name, value);
                prop_assert!(Arc::ptr_eq(&cached, &again));
            }
        }
    }

    #[test]
    fn test_random_graph_is_deterministic_for_seed() {
        let a = random_graph(&mut StdRng::seed_from_u64(7), 50, 4);
        let b = random_graph(&mut StdRng::seed_from_u64(7), 50, 4);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.iter().all(|p| p.children().len() <= 4));
    }
}
