//! Slicekeeper - off-chain keeper for sliced on-chain orders.
//!
//! An order ledger contract holds orders whose input is split into a fixed
//! number of slices, each executable once its interval has elapsed. This
//! crate watches the ledger's lifecycle events, decides which tracked
//! orders have a slice due, quotes the slice on the price venue, and
//! submits `executeSlice` with a slippage floor derived in exact integer
//! arithmetic.
//!
//! # Architecture
//!
//! - [`domain`] - Value types and pure math: orders, events, the active
//!   order set, the min-out bound
//! - [`port`] - Async traits at every I/O seam
//! - [`adapter`] - Alloy-backed chain access and the JSON cursor store
//! - [`keeper`] - Event scanner, slice decision engine, execution
//!   submitter and the polling scheduler
//! - [`config`] - Layered configuration and logging setup
//! - [`cli`] - Command definitions and handlers (requires the `evm` feature)
//!
//! # Features
//!
//! - `evm` (default) - JSON-RPC chain access through alloy
//! - `testkit` - In-memory fake chain for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use slicekeeper::adapter::EvmChain;
//! use slicekeeper::config::Config;
//! use slicekeeper::keeper::{Keeper, KeeperPorts, StartPosition};
//!
//! # async fn example() -> slicekeeper::error::Result<()> {
//! let config = Config::load("keeper.toml")?;
//! let chain = Arc::new(EvmChain::connect(&config.targets()?, config.private_key()?)?);
//! let keeper = Keeper::start(
//!     KeeperPorts::from_chain(chain),
//!     &config.keeper_settings(),
//!     StartPosition::Resume,
//!     None,
//! )
//! .await?;
//! keeper.run().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod keeper;
pub mod port;

#[cfg(feature = "evm")]
pub mod cli;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
