//! Builders for domain values used across tests.

use alloy_primitives::{Address, U256};

use crate::domain::{Order, OrderId};

/// Input token used by [`order`].
pub fn token_in() -> Address {
    Address::repeat_byte(0xa1)
}

/// Output token used by [`order`].
pub fn token_out() -> Address {
    Address::repeat_byte(0xb2)
}

/// Create an [`OrderId`] from an integer.
pub fn id(n: u64) -> OrderId {
    OrderId::from(n)
}

/// A single-slice order of 100 units that is due immediately, with a
/// 100 bps slippage ceiling.
pub fn order() -> Order {
    Order {
        owner: Address::repeat_byte(0x01),
        recipient: Address::repeat_byte(0x02),
        token_in: token_in(),
        token_out: token_out(),
        total_amount_in: U256::from(100u64),
        remaining_amount_in: U256::from(100u64),
        num_slices: 1,
        executed_slices: 0,
        max_slippage_bps: 100,
        max_impact_bps: 300,
        interval_sec: 60,
        next_execution_time: 0,
        deadline: u64::MAX,
        active: true,
    }
}

/// An order split into `slices` equal slices of `per_slice` units.
pub fn sliced_order(slices: u8, per_slice: u64) -> Order {
    let total = U256::from(per_slice) * U256::from(slices);
    Order {
        total_amount_in: total,
        remaining_amount_in: total,
        num_slices: slices,
        ..order()
    }
}
