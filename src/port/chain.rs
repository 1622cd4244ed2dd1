//! Chain head port.

use async_trait::async_trait;

use crate::error::Result;

/// Port for basic chain queries.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current block height.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be reached.
    async fn block_number(&self) -> Result<u64>;
}
