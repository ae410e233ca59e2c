//! Strong type definitions for permgraph.
//!
//! Permission names are wrapped in a newtype so that an unnormalized string
//! can never be used as a map key by accident.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, Result};

/// A case-insensitive permission identifier, stored in lowercase.
///
/// Two keys built from `"Foo.Bar"` and `"foo.bar"` are equal and hash the
/// same. Only case is normalized: `" a"` and `"a"` are different keys.
/// An empty key cannot be built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Normalize `raw` into a key.
    pub fn new(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(CoreError::EmptyKey);
        }
        Ok(Self(raw.to_lowercase()))
    }

    /// Normalize `raw`, returning `None` for an empty key.
    ///
    /// Lookup-style operations use this so that a missing key reads as
    /// "not present" instead of an error.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    /// The normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionKey({})", self.0)
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PermissionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PermissionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for PermissionKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for PermissionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
