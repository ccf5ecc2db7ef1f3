//! Tier levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service level of an advertisement.
///
/// Ordered from highest to lowest placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Premium VIP.
    N1,
    /// Featured.
    N3,
    /// Standard; absorbs everything past the other quotas.
    N7,
}

impl Tier {
    /// Every tier, in assignment order.
    pub const ALL: [Tier; 3] = [Tier::N1, Tier::N3, Tier::N7];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::N1 => "N1",
            Tier::N3 => "N3",
            Tier::N7 => "N7",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "N1" => Some(Tier::N1),
            "N3" => Some(Tier::N3),
            "N7" => Some(Tier::N7),
            _ => None,
        }
    }

    /// Shown in the featured strip.
    pub fn is_featured(&self) -> bool {
        matches!(self, Tier::N1 | Tier::N3)
    }

    /// Premium placement.
    pub fn is_premium(&self) -> bool {
        *self == Tier::N1
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert!(Tier::N1.is_featured() && Tier::N1.is_premium());
        assert!(Tier::N3.is_featured() && !Tier::N3.is_premium());
        assert!(!Tier::N7.is_featured() && !Tier::N7.is_premium());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Tier::from_str("n3"), Some(Tier::N3));
        assert_eq!(Tier::from_str("N2"), None);
    }
}
