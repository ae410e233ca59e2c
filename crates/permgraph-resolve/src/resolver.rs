//! Child permission resolution.
//!
//! Given a root key and the value it is granted with, walk the declared
//! children depth-first and record the effective value of every reachable
//! key.
//!
//! Rules:
//! 1. A key already recorded during this walk is skipped. The first value
//!    seen for a key wins, and cycles terminate.
//! 2. A child's effective value is `declared XOR invert`, where `invert` is
//!    the negation of its parent's effective value. The root is visited
//!    with `invert = false`.
//! 3. When the walk is done, the root is removed if it still maps to the
//!    value it was granted with.

use std::collections::HashMap;
use std::sync::Arc;

use permgraph_core::{Permission, PermissionKey};

use crate::resolved::ResolvedChildren;

/// Read access to permission definitions.
///
/// The resolver only ever reads; it never holds on to what it is given
/// beyond a single resolution.
pub trait DefinitionLookup {
    /// The definition registered for `key`, if any.
    fn definition(&self, key: &PermissionKey) -> Option<Arc<Permission>>;
}

impl<L: DefinitionLookup + ?Sized> DefinitionLookup for &L {
    fn definition(&self, key: &PermissionKey) -> Option<Arc<Permission>> {
        (**self).definition(key)
    }
}

impl DefinitionLookup for HashMap<PermissionKey, Arc<Permission>> {
    fn definition(&self, key: &PermissionKey) -> Option<Arc<Permission>> {
        self.get(key).cloned()
    }
}

/// A definition whose children are being walked.
struct Frame {
    definition: Arc<Permission>,
    next: usize,
    invert: bool,
}

/// Resolve everything `root` implies when granted with `value`.
///
/// Walks with an explicit stack so that deep chains cannot overflow the
/// call stack. Visit order is the same pre-order a recursive walk over the
/// declaration order would produce.
pub fn resolve_children<L>(lookup: &L, root: &PermissionKey, value: bool) -> ResolvedChildren
where
    L: DefinitionLookup + ?Sized,
{
    let mut accumulator: HashMap<PermissionKey, bool> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();

    visit(lookup, &mut accumulator, &mut stack, root, value, false);

    while let Some(frame) = stack.last_mut() {
        let definition = Arc::clone(&frame.definition);
        let Some((child, declared)) = definition.children().get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let invert = frame.invert;

        visit(lookup, &mut accumulator, &mut stack, child, *declared, invert);
    }

    // Strip the root only if it still carries the granted value.
    if accumulator.get(root) == Some(&value) {
        accumulator.remove(root);
    }

    tracing::trace!(
        root = %root,
        value,
        size = accumulator.len(),
        "resolved child permissions"
    );

    ResolvedChildren::from(accumulator)
}

fn visit<L>(
    lookup: &L,
    accumulator: &mut HashMap<PermissionKey, bool>,
    stack: &mut Vec<Frame>,
    key: &PermissionKey,
    declared: bool,
    invert: bool,
) where
    L: DefinitionLookup + ?Sized,
{
    if accumulator.contains_key(key) {
        return;
    }

    let effective = declared ^ invert;
    accumulator.insert(key.clone(), effective);

    if let Some(definition) = lookup.definition(key) {
        stack.push(Frame {
            definition,
            next: 0,
            invert: !effective,
        });
    }
}
