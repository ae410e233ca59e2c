//! Permission definitions.
//!
//! A [`Permission`] names a key and declares which other permissions it
//! implies. Each declared child carries the value it receives when the
//! parent is granted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, Result};
use crate::types::PermissionKey;

/// Who holds a permission when nothing has been assigned explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PermissionDefault {
    /// Everyone.
    True,
    /// Nobody.
    False,
    /// Operators only.
    #[default]
    Op,
    /// Everyone except operators.
    NotOp,
}

impl PermissionDefault {
    /// The default value for a subject with the given operator status.
    pub fn value(self, is_op: bool) -> bool {
        match self {
            PermissionDefault::True => true,
            PermissionDefault::False => false,
            PermissionDefault::Op => is_op,
            PermissionDefault::NotOp => !is_op,
        }
    }
}

impl FromStr for PermissionDefault {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "true" => Ok(PermissionDefault::True),
            "false" => Ok(PermissionDefault::False),
            "op" | "isop" | "operator" | "isoperator" | "admin" | "isadmin" => {
                Ok(PermissionDefault::Op)
            }
            "!op" | "notop" | "!operator" | "notoperator" | "!admin" | "notadmin" => {
                Ok(PermissionDefault::NotOp)
            }
            _ => Err(CoreError::UnknownDefault(s.to_string())),
        }
    }
}

impl fmt::Display for PermissionDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionDefault::True => "true",
            PermissionDefault::False => "false",
            PermissionDefault::Op => "op",
            PermissionDefault::NotOp => "notop",
        };
        f.write_str(s)
    }
}

impl<'de> Deserialize<'de> for PermissionDefault {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Descriptors write both `default: true` and `default: "op"`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(true) => Ok(PermissionDefault::True),
            Raw::Bool(false) => Ok(PermissionDefault::False),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A permission definition.
///
/// Children are kept in declaration order. Resolution walks them in that
/// order, so the order decides which value wins when two paths reach the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    key: PermissionKey,
    description: Option<String>,
    default: PermissionDefault,
    children: Vec<(PermissionKey, bool)>,
}

impl Permission {
    /// A definition with no children and the default settings.
    pub fn new(key: PermissionKey) -> Self {
        PermissionBuilder::new(key).build()
    }

    /// Shorthand for tests and fixtures: build from raw strings.
    pub fn with_children(key: &str, children: &[(&str, bool)]) -> Result<Self> {
        let mut builder = PermissionBuilder::new(PermissionKey::new(key)?);
        for (child, value) in children {
            let child_key = PermissionKey::new(child).map_err(|e| CoreError::InvalidChild {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            builder = builder.child(child_key, *value);
        }
        Ok(builder.build())
    }

    /// The normalized key.
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Human readable description, if declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Default holder policy.
    pub fn default_value(&self) -> PermissionDefault {
        self.default
    }

    /// Declared children in declaration order.
    pub fn children(&self) -> &[(PermissionKey, bool)] {
        &self.children
    }

    /// The declared value for `child`, if declared.
    pub fn child_value(&self, child: &PermissionKey) -> Option<bool> {
        self.children
            .iter()
            .find(|(k, _)| k == child)
            .map(|(_, v)| *v)
    }

    /// Whether this definition lists its own key as a child.
    pub fn is_self_referential(&self) -> bool {
        self.child_value(&self.key).is_some()
    }
}

/// Builder for [`Permission`].
#[derive(Debug, Clone)]
pub struct PermissionBuilder {
    key: PermissionKey,
    description: Option<String>,
    default: PermissionDefault,
    children: Vec<(PermissionKey, bool)>,
}

impl PermissionBuilder {
    /// Start building a definition for `key`.
    pub fn new(key: PermissionKey) -> Self {
        Self {
            key,
            description: None,
            default: PermissionDefault::default(),
            children: Vec::new(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default holder policy.
    pub fn default_value(mut self, default: PermissionDefault) -> Self {
        self.default = default;
        self
    }

    /// Declare a child. Declaring the same child twice keeps its original
    /// position and takes the newer value.
    pub fn child(mut self, key: PermissionKey, value: bool) -> Self {
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.children.push((key, value)),
        }
        self
    }

    /// Finish the definition.
    pub fn build(self) -> Permission {
        Permission {
            key: self.key,
            description: self.description,
            default: self.default,
            children: self.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PermissionKey {
        PermissionKey::new(s).unwrap()
    }

    #[test]
    fn test_children_keep_declaration_order() {
        let perm = PermissionBuilder::new(key("kit.*"))
            .child(key("kit.tools"), true)
            .child(key("kit.armor"), false)
            .child(key("kit.food"), true)
            .build();

        let names: Vec<_> = perm.children().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["kit.tools", "kit.armor", "kit.food"]);
    }

    #[test]
    fn test_duplicate_child_replaces_in_place() {
        let perm = PermissionBuilder::new(key("a"))
            .child(key("b"), true)
            .child(key("c"), true)
            .child(key("B"), false)
            .build();

        assert_eq!(perm.children().len(), 2);
        assert_eq!(perm.children()[0], (key("b"), false));
    }

    #[test]
    fn test_with_children_rejects_empty_child() {
        let err = Permission::with_children("a", &[("", true)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidChild { .. }));
    }

    #[test]
    fn test_self_referential() {
        let perm = Permission::with_children("a", &[("A", true)]).unwrap();
        assert!(perm.is_self_referential());

        let perm = Permission::with_children("a", &[("b", true)]).unwrap();
        assert!(!perm.is_self_referential());
    }

    #[test]
    fn test_default_parsing() {
        assert_eq!("true".parse::<PermissionDefault>().unwrap(), PermissionDefault::True);
        assert_eq!("OP".parse::<PermissionDefault>().unwrap(), PermissionDefault::Op);
        assert_eq!("is_admin".parse::<PermissionDefault>().unwrap(), PermissionDefault::Op);
        assert_eq!("!op".parse::<PermissionDefault>().unwrap(), PermissionDefault::NotOp);
        assert_eq!("not op".parse::<PermissionDefault>().unwrap(), PermissionDefault::NotOp);
        assert!("sometimes".parse::<PermissionDefault>().is_err());
    }

    #[test]
    fn test_default_value() {
        assert!(PermissionDefault::True.value(false));
        assert!(!PermissionDefault::False.value(true));
        assert!(PermissionDefault::Op.value(true));
        assert!(!PermissionDefault::Op.value(false));
        assert!(PermissionDefault::NotOp.value(false));
        assert!(!PermissionDefault::NotOp.value(true));
    }

    #[test]
    fn test_default_deserializes_from_bool_or_string() {
        let d: PermissionDefault = serde_json::from_str("false").unwrap();
        assert_eq!(d, PermissionDefault::False);
        let d: PermissionDefault = serde_json::from_str("\"notop\"").unwrap();
        assert_eq!(d, PermissionDefault::NotOp);
    }
}
