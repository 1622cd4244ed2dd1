//! Incremental lifecycle event scanning.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{bounded, KeeperState, ScanSummary};
use crate::domain::{BlockRange, OrderEventKind};
use crate::error::Result;
use crate::port::{ChainClient, OrderLedger};

/// Advances the scan cursor and keeps the active order set in step with
/// the ledger's lifecycle events.
pub struct EventScanner {
    chain: Arc<dyn ChainClient>,
    ledger: Arc<dyn OrderLedger>,
    timeout: Duration,
    max_blocks: Option<u64>,
}

impl EventScanner {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        ledger: Arc<dyn OrderLedger>,
        timeout: Duration,
        max_blocks: Option<u64>,
    ) -> Self {
        Self {
            chain,
            ledger,
            timeout,
            max_blocks,
        }
    }

    /// Scan `[cursor + 1, head]` and apply what was found.
    ///
    /// All three event kinds are fetched before anything is applied. If any
    /// query fails the error is returned with the state untouched, so the
    /// next pass fetches the identical range again. Returns `None` when the
    /// head has not moved past the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the head or any event query cannot be fetched.
    pub async fn scan(&self, state: &mut KeeperState) -> Result<Option<ScanSummary>> {
        let head = bounded("eth_blockNumber", self.timeout, self.chain.block_number()).await?;

        let Some(range) = BlockRange::after(state.cursor(), head, self.max_blocks) else {
            return Ok(None);
        };

        let mut batches = Vec::with_capacity(OrderEventKind::SCAN_ORDER.len());
        for kind in OrderEventKind::SCAN_ORDER {
            let events = bounded("eth_getLogs", self.timeout, self.ledger.events(kind, range)).await?;
            batches.push(events);
        }

        // Earlier ranges are never rescanned; only this batch needs tombstones.
        state.orders_mut().forget_retired();

        let mut summary = ScanSummary::new(range);
        for event in batches.iter().flatten() {
            let changed = state.orders_mut().apply(event);
            summary.record(event);
            debug!(
                order_id = %event.order_id(),
                event = %event.kind(),
                changed,
                "Applied order event"
            );
        }

        state.advance_cursor(range.to);

        debug!(
            from_block = range.from,
            to_block = range.to,
            head,
            events = summary.events(),
            tracked = state.orders().len(),
            "Scanned block range"
        );

        Ok(Some(summary))
    }
}
