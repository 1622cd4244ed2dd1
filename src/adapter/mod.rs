//! Implementations of ports (hexagonal adapters).
//!
//! - [`evm`] - Alloy-backed chain access (requires the `evm` feature)
//! - [`cursor`] - JSON file scan cursor store

pub mod cursor;

#[cfg(feature = "evm")]
pub mod evm;

pub use cursor::JsonCursorStore;
#[cfg(feature = "evm")]
pub use evm::EvmChain;
