//! Run correlation ids.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifies one job run across all of its log entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a new run ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let now = Utc::now();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "run-{}-{:x}{:04x}",
            now.format("%Y%m%dT%H%M%S"),
            now.timestamp_subsec_micros(),
            seq & 0xffff
        ))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("run-"));
    }

    #[test]
    fn test_from_string() {
        assert_eq!(RunId::from_string("nightly").to_string(), "nightly");
    }
}
