//! Scan cursor persistence port.

use crate::error::Result;

/// Port for persisting the last fully scanned block across restarts.
pub trait CursorStore: Send + Sync {
    /// Load the stored cursor, `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<u64>>;

    /// Persist the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&self, cursor: u64) -> Result<()>;
}
