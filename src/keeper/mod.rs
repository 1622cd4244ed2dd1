//! The keeper: scan lifecycle events, decide which slices are due, submit
//! them.
//!
//! One pass is `scan → (decide → submit)*`, strictly sequential. The
//! [`Keeper`] owns all in-process state; the components below borrow it.
//!
//! - [`EventScanner`] advances the block cursor and maintains the active set.
//! - [`SliceDecisionEngine`] re-reads each tracked order and plans a slice.
//! - [`ExecutionSubmitter`] sends `executeSlice` and records the outcome.

mod decision;
mod report;
mod scanner;
mod scheduler;
mod state;
mod submitter;
mod tokens;

use std::future::Future;
use std::time::Duration;

pub use decision::{Decision, DropReason, SliceDecisionEngine, SlicePlan};
pub use report::{PassReport, ScanSummary, SliceOutcome};
pub use scanner::EventScanner;
pub use scheduler::{Keeper, KeeperPorts, StartPosition};
pub use state::KeeperState;
pub use submitter::ExecutionSubmitter;
pub use tokens::{TokenDirectory, TokenLabel};

use crate::error::{ChainError, Result};

/// Scheduling and execution parameters for the keeper loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperSettings {
    /// Sleep between passes.
    pub poll_interval: Duration,
    /// Gas-limit ceiling for `executeSlice`.
    pub gas_limit: u64,
    /// Safety margin added to each order's slippage ceiling, in bps.
    pub min_out_extra_bps: u32,
    /// Bound on any single read call.
    pub rpc_timeout: Duration,
    /// Bound on sending a slice and waiting for one confirmation.
    pub confirmation_timeout: Duration,
    /// Largest block range fetched per pass.
    pub max_scan_blocks: Option<u64>,
    /// Plan and log slices without submitting.
    pub dry_run: bool,
}

impl Default for KeeperSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(7_000),
            gas_limit: 700_000,
            min_out_extra_bps: 20,
            rpc_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(120),
            max_scan_blocks: None,
            dry_run: false,
        }
    }
}

/// Await `fut`, giving up after `limit`.
pub(crate) async fn bounded<T, F>(call: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ChainError::Timeout {
            call,
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
        .into()),
    }
}
