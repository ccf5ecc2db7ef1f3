//! Advertisement identifier.
//!
//! Ids are opaque and assigned by whichever store holds the records; the
//! engine only passes them through.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned advertisement id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdId(String);

impl AdId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AdId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AdId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AdId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
