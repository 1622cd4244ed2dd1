//! Chain-agnostic domain types and pure order math.

mod active_set;
mod event;
mod id;
mod order;
mod slippage;
mod units;

pub use active_set::ActiveOrderSet;
pub use event::{BlockRange, OrderEvent, OrderEventKind};
pub use id::OrderId;
pub use order::Order;
pub use slippage::{
    effective_slippage_bps, min_out, SlippageBound, BPS_DENOMINATOR, MAX_EFFECTIVE_SLIPPAGE_BPS,
};
pub use units::format_amount;
