//! Typed strategy identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique name of a registered strategy. The same string keys the
/// in-memory registry, the belief cache and the persisted registry row.
///
/// Just a string underneath; no format is enforced.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyName(pub String);

impl StrategyName {
    /// Create a new name from anything that converts to String.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StrategyName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for StrategyName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StrategyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
