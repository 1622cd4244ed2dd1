//! Order ledger contract port.

use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;

use crate::domain::{BlockRange, Order, OrderEvent, OrderEventKind, OrderId};
use crate::error::Result;

/// Mined result of an `executeSlice` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,

    /// Block the transaction was included in, when reported.
    pub block_number: Option<u64>,

    /// Whether the transaction succeeded (`false` means it reverted).
    pub success: bool,
}

/// Port for the on-chain order ledger.
///
/// The ledger is the source of truth for whether a slice was consumed; it
/// rejects double execution atomically. The keeper only reads it to avoid
/// sending transactions that are known to fail.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Fetch all events of one kind emitted in `range` (inclusive).
    ///
    /// # Errors
    ///
    /// Returns an error if the log query fails or a log cannot be decoded.
    async fn events(&self, kind: OrderEventKind, range: BlockRange) -> Result<Vec<OrderEvent>>;

    /// Read full order state (`getOrder`).
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn get_order(&self, id: OrderId) -> Result<Order>;

    /// Input amount of the next slice (`estimateNextSliceAmount`).
    ///
    /// Zero means there is nothing to execute yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn estimate_next_slice_amount(&self, id: OrderId) -> Result<U256>;

    /// Submit `executeSlice(id, min_out)` with an explicit gas limit and wait
    /// for one confirmation.
    ///
    /// A mined but reverted transaction is `Ok` with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be sent or its receipt
    /// cannot be fetched.
    async fn execute_slice(&self, id: OrderId, min_out: U256, gas_limit: u64)
        -> Result<SliceReceipt>;
}
