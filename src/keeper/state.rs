//! In-process keeper state.

use crate::domain::ActiveOrderSet;

/// Everything the keeper remembers between passes.
///
/// Owned by the [`Keeper`](super::Keeper) and lent to the scanner.
#[derive(Debug, Clone)]
pub struct KeeperState {
    cursor: u64,
    orders: ActiveOrderSet,
}

impl KeeperState {
    /// Start with `cursor` as the last fully processed block.
    #[must_use]
    pub fn new(cursor: u64) -> Self {
        Self {
            cursor,
            orders: ActiveOrderSet::new(),
        }
    }

    /// Last block whose events have been fully applied.
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    #[must_use]
    pub fn orders(&self) -> &ActiveOrderSet {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut ActiveOrderSet {
        &mut self.orders
    }

    /// Move the cursor forward to `to`. Never moves it backwards.
    pub(crate) fn advance_cursor(&mut self, to: u64) -> bool {
        if to > self.cursor {
            self.cursor = to;
            true
        } else {
            false
        }
    }
}
