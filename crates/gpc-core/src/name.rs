//! # Name Validation — POD Identifiers
//!
//! Entry names, object aliases, membership-list names, and tuple names all
//! share one identifier grammar: a letter or underscore followed by
//! letters, digits, or underscores. Validating at the type boundary keeps
//! every downstream map key well-formed and keeps serialized configs
//! unambiguous (the `alias.entry` reference syntax depends on names never
//! containing a dot).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error for a malformed POD identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid POD name {0:?}: names must match [A-Za-z_][A-Za-z0-9_]*")]
pub struct InvalidPodName(pub String);

/// A validated POD identifier.
///
/// Ordered and hashable so it can key the `BTreeMap`s that give configs
/// their canonical ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PodName(String);

impl PodName {
    /// Validate and wrap an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidPodName> {
        let name = name.into();
        if is_valid_name(&name) {
            Ok(Self(name))
        } else {
            Err(InvalidPodName(name))
        }
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PodName {
    type Err = InvalidPodName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for PodName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PodName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
