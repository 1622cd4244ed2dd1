//! ERC-20 metadata port.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::error::Result;

/// Port for token display metadata. Only used to make logs readable.
#[async_trait]
pub trait TokenMetadata: Send + Sync {
    /// Token symbol, e.g. `"USDC"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn symbol(&self, token: Address) -> Result<String>;

    /// Token decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn decimals(&self, token: Address) -> Result<u8>;
}
