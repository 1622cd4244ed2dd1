//! Order lifecycle events and the block ranges they are scanned over.

use std::fmt;

use alloy_primitives::{Address, U256};

use super::OrderId;

/// The three lifecycle events the keeper tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderEventKind {
    Created,
    Cancelled,
    Completed,
}

impl OrderEventKind {
    /// Order in which a scanned range is fetched and applied.
    ///
    /// Creations come first so a create and cancel landing in the same
    /// range leaves the order untracked.
    pub const SCAN_ORDER: [OrderEventKind; 3] = [
        OrderEventKind::Created,
        OrderEventKind::Cancelled,
        OrderEventKind::Completed,
    ];

    /// Solidity event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            OrderEventKind::Created => "OrderCreated",
            OrderEventKind::Cancelled => "OrderCancelled",
            OrderEventKind::Completed => "OrderCompleted",
        }
    }
}

impl fmt::Display for OrderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded order lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    Created {
        order_id: OrderId,
        owner: Address,
        recipient: Address,
        token_in: Address,
        token_out: Address,
        total_amount_in: U256,
        num_slices: u8,
        interval_sec: u64,
    },
    Cancelled {
        order_id: OrderId,
        refunded_amount: U256,
    },
    Completed {
        order_id: OrderId,
        total_amount_out: U256,
    },
}

impl OrderEvent {
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::Created { order_id, .. }
            | OrderEvent::Cancelled { order_id, .. }
            | OrderEvent::Completed { order_id, .. } => *order_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> OrderEventKind {
        match self {
            OrderEvent::Created { .. } => OrderEventKind::Created,
            OrderEvent::Cancelled { .. } => OrderEventKind::Cancelled,
            OrderEvent::Completed { .. } => OrderEventKind::Completed,
        }
    }

    /// Whether this event ends the order's lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderEvent::Created { .. })
    }
}

/// Inclusive block range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    /// The range still to scan after `cursor`, given the chain head.
    ///
    /// Returns `None` when the head has not moved past the cursor. When
    /// `max_blocks` is set the range is truncated to that many blocks.
    #[must_use]
    pub fn after(cursor: u64, head: u64, max_blocks: Option<u64>) -> Option<Self> {
        if head <= cursor {
            return None;
        }
        let from = cursor + 1;
        let to = match max_blocks {
            Some(max) if max > 0 => head.min(from.saturating_add(max - 1)),
            _ => head,
        };
        Some(Self { from, to })
    }

    /// Number of blocks in the range.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}
