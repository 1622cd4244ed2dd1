//! Order identifier.

use std::fmt;

use alloy_primitives::U256;

/// Order identifier assigned by the order ledger - newtype for type safety.
///
/// Ordered so that snapshots of the active set iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(U256);

impl OrderId {
    /// Create a new `OrderId` from its on-chain value.
    #[must_use]
    pub const fn new(id: U256) -> Self {
        Self(id)
    }

    /// Get the raw on-chain value.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<U256> for OrderId {
    fn from(id: U256) -> Self {
        Self::new(id)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self::new(U256::from(id))
    }
}
