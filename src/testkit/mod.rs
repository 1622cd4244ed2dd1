//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - [`FakeChain`], an in-memory chain implementing every
//!   chain-facing port with scriptable failures, reverts and hangs.
//! - [`cursor`] - [`MemoryCursorStore`].
//! - [`domain`] - Builders for orders and ids.

pub mod chain;
pub mod cursor;
pub mod domain;

pub use chain::{FakeCall, FakeChain, RecordedCall};
pub use cursor::MemoryCursorStore;
