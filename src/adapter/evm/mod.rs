//! EVM chain access over JSON-RPC.
//!
//! [`EvmChain`] implements every chain-facing port with one HTTP provider
//! and one local signer, used sequentially by the keeper loop.

mod client;
mod contracts;

pub use client::EvmChain;
