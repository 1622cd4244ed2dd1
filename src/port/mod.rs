//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the keeper and the outside world. The
//! keeper only ever talks to the chain through these traits, so tests can
//! drive it with an in-memory fake.
//!
//! # Architecture
//!
//! ```text
//!                  ┌─────────────────────────┐
//!                  │         Keeper          │
//!                  │  scan → decide → submit │
//!                  └────────────┬────────────┘
//!                               │
//!     ┌────────────┬────────────┼─────────────┬─────────────┐
//!     ▼            ▼            ▼             ▼             ▼
//! ┌────────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌──────────┐
//! │ Chain  │  │  Order  │  │  Price  │  │  Token   │  │  Cursor  │
//! │ Client │  │ Ledger  │  │  Venue  │  │ Metadata │  │  Store   │
//! └────────┘  └─────────┘  └─────────┘  └──────────┘  └──────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ChainClient`] - Block height
//! - [`OrderLedger`] - Lifecycle events, order reads, slice execution
//! - [`PriceVenue`] - Read-only swap quotes
//! - [`TokenMetadata`] - ERC-20 symbol and decimals for log output
//! - [`CursorStore`] - Durable scan cursor

mod chain;
mod cursor;
mod ledger;
mod token;
mod venue;

pub use chain::ChainClient;
pub use cursor::CursorStore;
pub use ledger::{OrderLedger, SliceReceipt};
pub use token::TokenMetadata;
pub use venue::PriceVenue;
