//! The scheduling loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::{
    bounded, Decision, EventScanner, ExecutionSubmitter, KeeperSettings, KeeperState, PassReport,
    SliceDecisionEngine, SlicePlan, TokenDirectory,
};
use crate::error::Result;
use crate::port::{ChainClient, CursorStore, OrderLedger, PriceVenue, TokenMetadata};

/// The chain-facing ports the keeper needs.
#[derive(Clone)]
pub struct KeeperPorts {
    pub chain: Arc<dyn ChainClient>,
    pub ledger: Arc<dyn OrderLedger>,
    pub venue: Arc<dyn PriceVenue>,
    pub tokens: Arc<dyn TokenMetadata>,
}

impl KeeperPorts {
    /// Use one value for every port.
    pub fn from_chain<T>(chain: Arc<T>) -> Self
    where
        T: ChainClient + OrderLedger + PriceVenue + TokenMetadata + 'static,
    {
        Self {
            chain: chain.clone(),
            ledger: chain.clone(),
            venue: chain.clone(),
            tokens: chain,
        }
    }
}

/// Where the first scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPosition {
    /// The stored cursor if there is one, otherwise the current head.
    /// Orders created before the head are not backfilled.
    #[default]
    Resume,
    /// Scan from this block onwards, ignoring any stored cursor.
    ///
    /// The block itself is the first one scanned, so it must be at least 1;
    /// the cursor can only express block 0 as already scanned.
    FromBlock(u64),
}

/// Owns the keeper state and runs passes over it.
pub struct Keeper {
    state: KeeperState,
    scanner: EventScanner,
    engine: SliceDecisionEngine,
    submitter: ExecutionSubmitter,
    tokens: TokenDirectory,
    cursor_store: Option<Arc<dyn CursorStore>>,
    poll_interval: Duration,
}

impl Keeper {
    /// Build a keeper around existing state.
    pub fn new(ports: KeeperPorts, settings: &KeeperSettings, state: KeeperState) -> Self {
        Self {
            state,
            scanner: EventScanner::new(
                ports.chain,
                ports.ledger.clone(),
                settings.rpc_timeout,
                settings.max_scan_blocks,
            ),
            engine: SliceDecisionEngine::new(
                ports.ledger.clone(),
                ports.venue,
                settings.min_out_extra_bps,
                settings.rpc_timeout,
            ),
            submitter: ExecutionSubmitter::new(
                ports.ledger,
                settings.gas_limit,
                settings.confirmation_timeout,
                settings.dry_run,
            ),
            tokens: TokenDirectory::new(ports.tokens, settings.rpc_timeout),
            cursor_store: None,
            poll_interval: settings.poll_interval,
        }
    }

    /// Persist the cursor to `store` after every advance.
    #[must_use]
    pub fn with_cursor_store(mut self, store: Arc<dyn CursorStore>) -> Self {
        self.cursor_store = Some(store);
        self
    }

    /// Resolve the initial cursor and build the keeper.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cursor cannot be read or the chain
    /// head cannot be fetched.
    pub async fn start(
        ports: KeeperPorts,
        settings: &KeeperSettings,
        start: StartPosition,
        cursor_store: Option<Arc<dyn CursorStore>>,
    ) -> Result<Self> {
        let cursor = match start {
            StartPosition::FromBlock(block) => {
                info!(from_block = block, "Starting scan from requested block");
                block.saturating_sub(1)
            }
            StartPosition::Resume => {
                let stored = match &cursor_store {
                    Some(store) => store.load()?,
                    None => None,
                };
                match stored {
                    Some(cursor) => {
                        info!(cursor, "Resuming from stored scan cursor");
                        cursor
                    }
                    None => {
                        let head = bounded(
                            "eth_blockNumber",
                            settings.rpc_timeout,
                            ports.chain.block_number(),
                        )
                        .await?;
                        info!(head, "Starting scan at chain head");
                        head
                    }
                }
            }
        };

        let keeper = Self::new(ports, settings, KeeperState::new(cursor));
        Ok(match cursor_store {
            Some(store) => keeper.with_cursor_store(store),
            None => keeper,
        })
    }

    #[must_use]
    pub fn state(&self) -> &KeeperState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut KeeperState {
        &mut self.state
    }

    /// One pass at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns an error only if the scan fails; see [`Keeper::run_once_at`].
    pub async fn run_once(&mut self) -> Result<PassReport> {
        self.run_once_at(unix_now()).await
    }

    /// One pass: scan, then decide and submit for every tracked order.
    ///
    /// A scan failure aborts the pass before any order is touched, so no
    /// order is attempted on data older than the unscanned range. Failures
    /// while handling one order are counted and never stop the others.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails.
    pub async fn run_once_at(&mut self, now: u64) -> Result<PassReport> {
        let mut report = PassReport::default();

        let cursor_before = self.state.cursor();
        report.scan = self.scanner.scan(&mut self.state).await?;
        if self.state.cursor() != cursor_before {
            self.persist_cursor();
        }

        for id in self.state.orders().snapshot() {
            report.evaluated += 1;

            let decision = match self.engine.evaluate(id, now).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(order_id = %id, error = %e, "Failed to evaluate order");
                    report.errors += 1;
                    continue;
                }
            };

            match decision {
                Decision::Drop(reason) => {
                    self.state.orders_mut().retire(id);
                    report.dropped += 1;
                    info!(order_id = %id, ?reason, "Stopped tracking order");
                }
                Decision::NotDue {
                    next_execution_time,
                } => {
                    report.not_due += 1;
                    debug!(order_id = %id, next_execution_time, now, "Order not yet due");
                }
                Decision::NothingToExecute => {
                    report.nothing_to_execute += 1;
                    debug!(order_id = %id, "Next slice amount is zero");
                }
                Decision::Execute(plan) => {
                    self.log_plan(&plan).await;
                    let outcome = self.submitter.submit(&plan).await;
                    report.record_outcome(&outcome);
                }
            }
        }

        report.tracked = self.state.orders().len();
        Ok(report)
    }

    /// Run passes forever, sleeping the poll interval between them.
    ///
    /// Only process shutdown stops the loop; an in-flight submission may be
    /// abandoned, the ledger stays the source of truth.
    pub async fn run(mut self) {
        info!(
            poll_interval_ms = u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX),
            cursor = self.state.cursor(),
            "Keeper loop started"
        );

        loop {
            match self.run_once().await {
                Ok(report) => report.log(),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, cursor = self.state.cursor(), "Pass aborted, retrying next poll");
                }
                Err(e) => {
                    error!(error = %e, cursor = self.state.cursor(), "Pass failed");
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn log_plan(&mut self, plan: &SlicePlan) {
        let amount_in = self.tokens.describe(plan.token_in, plan.amount_in).await;
        info!(
            order_id = %plan.order_id,
            slice = %format!("{}/{}", plan.slice, plan.num_slices),
            amount_in = %amount_in,
            quoted_out = %plan.quoted_out,
            min_out = %plan.min_out,
            slippage_bps = plan.effective_slippage_bps,
            "Executing slice"
        );
    }

    fn persist_cursor(&self) {
        let Some(store) = &self.cursor_store else {
            return;
        };
        let cursor = self.state.cursor();
        if let Err(e) = store.save(cursor) {
            warn!(error = %e, cursor, "Failed to persist scan cursor");
        }
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
