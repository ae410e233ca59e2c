//! Permission descriptor documents.
//!
//! Plugins declare their permissions up front in a descriptor. The JSON
//! shape mirrors the `permissions` section of a plugin descriptor:
//!
//! ```json
//! {
//!   "permissions": {
//!     "foo.*": {
//!       "description": "All foo commands",
//!       "default": "op",
//!       "children": { "foo.bar": true, "foo.baz": false }
//!     },
//!     "foo.list": { "children": ["foo.bar"] }
//!   }
//! }
//! ```
//!
//! Entry order and child order are preserved; resolution depends on child
//! order. `children` may also be a plain list, where every child is `true`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, Result};
use crate::permission::{Permission, PermissionBuilder, PermissionDefault};
use crate::types::PermissionKey;

/// Parsed descriptor: definitions in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    permissions: Vec<Permission>,
}

impl Descriptor {
    /// Parse a descriptor from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawDescriptor = serde_json::from_str(text)?;
        raw.into_descriptor()
    }

    /// Parse a descriptor from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let raw: RawDescriptor = serde_json::from_reader(reader)?;
        raw.into_descriptor()
    }

    /// Definitions in document order.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Take the definitions.
    pub fn into_permissions(self) -> Vec<Permission> {
        self.permissions
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default, deserialize_with = "ordered_entries")]
    permissions: Vec<(String, RawPermission)>,
}

#[derive(Deserialize)]
struct RawPermission {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default: Option<PermissionDefault>,
    #[serde(default)]
    children: RawChildren,
}

impl RawDescriptor {
    fn into_descriptor(self) -> Result<Descriptor> {
        let mut permissions = Vec::with_capacity(self.permissions.len());

        for (name, raw) in self.permissions {
            let mut builder = PermissionBuilder::new(PermissionKey::new(&name)?);
            if let Some(description) = raw.description {
                builder = builder.description(description);
            }
            if let Some(default) = raw.default {
                builder = builder.default_value(default);
            }
            for (child, value) in raw.children.0 {
                let child_key = PermissionKey::new(&child).map_err(|e| CoreError::InvalidChild {
                    key: name.clone(),
                    reason: e.to_string(),
                })?;
                builder = builder.child(child_key, value);
            }
            permissions.push(builder.build());
        }

        Ok(Descriptor { permissions })
    }
}

/// Children as either `{ "key": bool }` or `["key", ...]`.
#[derive(Default)]
struct RawChildren(Vec<(String, bool)>);

impl<'de> Deserialize<'de> for RawChildren {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ChildrenVisitor;

        impl<'de> Visitor<'de> for ChildrenVisitor {
            type Value = RawChildren;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of permission to bool or a list of permissions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut children = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, bool>()? {
                    children.push((key, value));
                }
                Ok(RawChildren(children))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
                let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(key) = seq.next_element::<String>()? {
                    children.push((key, true));
                }
                Ok(RawChildren(children))
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(RawChildren::default())
            }
        }

        deserializer.deserialize_any(ChildrenVisitor)
    }
}

/// Deserialize a map into a vector, keeping source order.
fn ordered_entries<'de, D, V>(deserializer: D) -> std::result::Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of permission definitions")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, V>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}
