//! Read-only mirror of an order held by the order ledger.

use alloy_primitives::{Address, U256};

/// Full order state as returned by `getOrder`.
///
/// The keeper never caches this across passes; every decision re-reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub owner: Address,
    pub recipient: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub total_amount_in: U256,
    /// Input still to be sold. Reaches zero exactly when the order completes.
    pub remaining_amount_in: U256,
    /// Fixed at creation, 1..=20.
    pub num_slices: u8,
    pub executed_slices: u8,
    /// Slippage ceiling chosen by the owner, in basis points.
    pub max_slippage_bps: u16,
    pub max_impact_bps: u16,
    /// Minimum spacing between slice executions.
    pub interval_sec: u64,
    /// Earliest unix time the next slice may run.
    pub next_execution_time: u64,
    pub deadline: u64,
    /// False once cancelled or completed.
    pub active: bool,
}

impl Order {
    /// Whether the next slice's time gate has opened.
    #[must_use]
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.next_execution_time
    }

    /// Whether no input remains to be sold.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_amount_in.is_zero()
    }

    /// An order may run a slice iff it is active, has input left and is due.
    #[must_use]
    pub fn is_eligible(&self, now: u64) -> bool {
        self.active && !self.is_exhausted() && self.is_due(now)
    }

    /// One-based ordinal of the slice that would execute next.
    #[must_use]
    pub fn next_slice(&self) -> u8 {
        self.executed_slices.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            owner: Address::repeat_byte(0x01),
            recipient: Address::repeat_byte(0x01),
            token_in: Address::repeat_byte(0xaa),
            token_out: Address::repeat_byte(0xbb),
            total_amount_in: U256::from(100),
            remaining_amount_in: U256::from(100),
            num_slices: 4,
            executed_slices: 0,
            max_slippage_bps: 100,
            max_impact_bps: 300,
            interval_sec: 60,
            next_execution_time: 1_000,
            deadline: 10_000,
            active: true,
        }
    }

    #[test]
    fn eligible_when_active_funded_and_due() {
        let order = order();
        assert!(order.is_eligible(1_000));
        assert!(order.is_eligible(5_000));
    }

    #[test]
    fn not_eligible_before_next_execution_time() {
        assert!(!order().is_eligible(999));
    }

    #[test]
    fn not_eligible_when_inactive() {
        let mut order = order();
        order.active = false;
        assert!(!order.is_eligible(5_000));
    }

    #[test]
    fn not_eligible_when_exhausted() {
        let mut order = order();
        order.remaining_amount_in = U256::ZERO;
        assert!(order.is_exhausted());
        assert!(!order.is_eligible(5_000));
    }

    #[test]
    fn next_slice_is_one_based() {
        let mut order = order();
        assert_eq!(order.next_slice(), 1);
        order.executed_slices = 3;
        assert_eq!(order.next_slice(), 4);
    }
}
