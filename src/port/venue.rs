//! Price venue port.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Port for the AMM the slices trade against.
#[async_trait]
pub trait PriceVenue: Send + Sync {
    /// Output the venue would give right now for `amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// Returns an error if the quote call fails.
    async fn quote_out(&self, token_in: Address, amount_in: U256) -> Result<U256>;
}
