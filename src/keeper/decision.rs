//! Per-order slice eligibility and execution parameters.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};

use super::bounded;
use crate::domain::{Order, OrderId, SlippageBound};
use crate::error::Result;
use crate::port::{OrderLedger, PriceVenue};

/// Why an order stopped being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The ledger reports the order inactive (cancelled or completed).
    Inactive,
    /// No input remains.
    Exhausted,
}

/// Everything needed to submit and log one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    pub order_id: OrderId,
    pub token_in: Address,
    pub token_out: Address,
    /// One-based ordinal of this slice.
    pub slice: u8,
    pub num_slices: u8,
    pub amount_in: U256,
    pub quoted_out: U256,
    pub effective_slippage_bps: u32,
    /// On-chain slippage guard passed to `executeSlice`.
    pub min_out: U256,
}

impl SlicePlan {
    /// Bound `quoted_out` for the next slice of `order`.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        order: &Order,
        amount_in: U256,
        quoted_out: U256,
        margin_bps: u32,
    ) -> Self {
        let bound = SlippageBound::compute(quoted_out, order.max_slippage_bps, margin_bps);
        Self {
            order_id,
            token_in: order.token_in,
            token_out: order.token_out,
            slice: order.next_slice(),
            num_slices: order.num_slices,
            amount_in,
            quoted_out,
            effective_slippage_bps: bound.effective_slippage_bps,
            min_out: bound.min_out,
        }
    }
}

/// What to do with one tracked order this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Stop tracking the order.
    Drop(DropReason),
    /// Not yet due; nothing changes.
    NotDue { next_execution_time: u64 },
    /// Due, but the ledger sizes the next slice at zero.
    NothingToExecute,
    /// Submit this slice.
    Execute(SlicePlan),
}

/// Decides, from fresh ledger state, whether an order's next slice runs.
pub struct SliceDecisionEngine {
    ledger: Arc<dyn OrderLedger>,
    venue: Arc<dyn PriceVenue>,
    margin_bps: u32,
    timeout: Duration,
}

impl SliceDecisionEngine {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        venue: Arc<dyn PriceVenue>,
        margin_bps: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            venue,
            margin_bps,
            timeout,
        }
    }

    /// The checks that need only the order itself, in the order they apply.
    ///
    /// Returns `None` when the order passes and the slice should be sized.
    #[must_use]
    pub fn gate(order: &Order, now: u64) -> Option<Decision> {
        if !order.active {
            return Some(Decision::Drop(DropReason::Inactive));
        }
        if !order.is_due(now) {
            return Some(Decision::NotDue {
                next_execution_time: order.next_execution_time,
            });
        }
        if order.is_exhausted() {
            return Some(Decision::Drop(DropReason::Exhausted));
        }
        None
    }

    /// Read the order, size its next slice, quote it, and bound the output.
    ///
    /// No quote is requested unless the slice amount is non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if any read or the quote fails.
    pub async fn evaluate(&self, id: OrderId, now: u64) -> Result<Decision> {
        let order = bounded("getOrder", self.timeout, self.ledger.get_order(id)).await?;

        if let Some(decision) = Self::gate(&order, now) {
            return Ok(decision);
        }

        let amount_in = bounded(
            "estimateNextSliceAmount",
            self.timeout,
            self.ledger.estimate_next_slice_amount(id),
        )
        .await?;
        if amount_in.is_zero() {
            return Ok(Decision::NothingToExecute);
        }

        let quoted_out = bounded(
            "quoteOut",
            self.timeout,
            self.venue.quote_out(order.token_in, amount_in),
        )
        .await?;

        Ok(Decision::Execute(SlicePlan::new(
            id,
            &order,
            amount_in,
            quoted_out,
            self.margin_bps,
        )))
    }
}
