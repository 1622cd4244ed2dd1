//! Slice transaction submission.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{bounded, SliceOutcome, SlicePlan};
use crate::port::OrderLedger;

/// Sends `executeSlice` and waits for one confirmation.
///
/// There is no retry here: a failed slice stays tracked and the next pass
/// re-evaluates it from fresh ledger state.
pub struct ExecutionSubmitter {
    ledger: Arc<dyn OrderLedger>,
    gas_limit: u64,
    timeout: Duration,
    dry_run: bool,
}

impl ExecutionSubmitter {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        gas_limit: u64,
        timeout: Duration,
        dry_run: bool,
    ) -> Self {
        Self {
            ledger,
            gas_limit,
            timeout,
            dry_run,
        }
    }

    /// Submit `plan`. Never fails; every failure mode becomes an outcome.
    pub async fn submit(&self, plan: &SlicePlan) -> SliceOutcome {
        if self.dry_run {
            info!(
                order_id = %plan.order_id,
                min_out = %plan.min_out,
                "Dry run - not submitting slice"
            );
            return SliceOutcome::DryRun;
        }

        let result = bounded(
            "executeSlice",
            self.timeout,
            self.ledger
                .execute_slice(plan.order_id, plan.min_out, self.gas_limit),
        )
        .await;

        match result {
            Ok(receipt) if receipt.success => {
                info!(
                    order_id = %plan.order_id,
                    tx_hash = %receipt.tx_hash,
                    block_number = ?receipt.block_number,
                    status = 1,
                    "Slice executed"
                );
                SliceOutcome::Executed {
                    tx_hash: receipt.tx_hash,
                    block_number: receipt.block_number,
                }
            }
            Ok(receipt) => {
                warn!(
                    order_id = %plan.order_id,
                    tx_hash = %receipt.tx_hash,
                    status = 0,
                    "Slice transaction reverted"
                );
                SliceOutcome::Reverted {
                    tx_hash: receipt.tx_hash,
                }
            }
            Err(e) => {
                warn!(order_id = %plan.order_id, error = %e, "Slice submission failed");
                SliceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
