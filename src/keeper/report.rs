//! Per-pass accounting.

use alloy_primitives::TxHash;
use tracing::{debug, info};

use crate::domain::{BlockRange, OrderEvent};

/// What one scan applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub range: BlockRange,
    pub created: usize,
    pub cancelled: usize,
    pub completed: usize,
}

impl ScanSummary {
    #[must_use]
    pub fn new(range: BlockRange) -> Self {
        Self {
            range,
            created: 0,
            cancelled: 0,
            completed: 0,
        }
    }

    pub(crate) fn record(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::Created { .. } => self.created += 1,
            OrderEvent::Cancelled { .. } => self.cancelled += 1,
            OrderEvent::Completed { .. } => self.completed += 1,
        }
    }

    #[must_use]
    pub fn events(&self) -> usize {
        self.created + self.cancelled + self.completed
    }
}

/// Result of handing one slice to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceOutcome {
    /// Mined and succeeded.
    Executed {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
    /// Mined but reverted, e.g. stale `min_out` or slice already taken.
    Reverted { tx_hash: TxHash },
    /// Never confirmed: send failure, RPC error or timeout.
    Failed { reason: String },
    /// Dry-run mode; nothing was sent.
    DryRun,
}

impl SliceOutcome {
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, SliceOutcome::Executed { .. })
    }
}

/// Counters for one keeper pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Scan applied this pass, `None` when the head had not moved.
    pub scan: Option<ScanSummary>,
    /// Tracked orders examined.
    pub evaluated: usize,
    pub not_due: usize,
    /// Due orders whose next slice amount was zero.
    pub nothing_to_execute: usize,
    /// Orders dropped from tracking after a fresh read.
    pub dropped: usize,
    /// Orders whose evaluation failed (read or quote error).
    pub errors: usize,
    pub executed: usize,
    pub reverted: usize,
    pub failed: usize,
    pub dry_run: usize,
    /// Orders still tracked at the end of the pass.
    pub tracked: usize,
}

impl PassReport {
    pub(crate) fn record_outcome(&mut self, outcome: &SliceOutcome) {
        match outcome {
            SliceOutcome::Executed { .. } => self.executed += 1,
            SliceOutcome::Reverted { .. } => self.reverted += 1,
            SliceOutcome::Failed { .. } => self.failed += 1,
            SliceOutcome::DryRun => self.dry_run += 1,
        }
    }

    /// Transactions actually sent this pass.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.executed + self.reverted + self.failed
    }

    /// Whether the pass changed nothing and attempted nothing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scan.as_ref().map_or(true, |s| s.events() == 0)
            && self.dropped == 0
            && self.errors == 0
            && self.submitted() == 0
            && self.dry_run == 0
    }

    pub fn log(&self) {
        let (from_block, to_block) = self
            .scan
            .as_ref()
            .map_or((None, None), |s| (Some(s.range.from), Some(s.range.to)));

        if self.is_idle() {
            debug!(
                ?to_block,
                tracked = self.tracked,
                not_due = self.not_due,
                "Pass complete"
            );
        } else {
            info!(
                ?from_block,
                ?to_block,
                events = self.scan.as_ref().map_or(0, ScanSummary::events),
                tracked = self.tracked,
                evaluated = self.evaluated,
                dropped = self.dropped,
                executed = self.executed,
                reverted = self.reverted,
                failed = self.failed,
                errors = self.errors,
                dry_run = self.dry_run,
                "Pass complete"
            );
        }
    }
}
