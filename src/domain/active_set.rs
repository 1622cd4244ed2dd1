//! The set of orders the keeper is tracking.

use std::collections::{BTreeSet, HashSet};

use super::{OrderEvent, OrderId};

/// Ids of orders believed to be live.
///
/// Only the id is tracked; full state is re-read on every decision pass.
/// Ids retired (cancelled, completed, or observed inactive) since the last
/// [`forget_retired`](Self::forget_retired) are remembered so a creation
/// seen later in the same batch can never bring them back. Scanned ranges
/// never overlap, so the scanner forgets them before each new range.
#[derive(Debug, Default, Clone)]
pub struct ActiveOrderSet {
    active: BTreeSet<OrderId>,
    retired: HashSet<OrderId>,
}

impl ActiveOrderSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an order. Returns `true` if it was newly added.
    pub fn track(&mut self, id: OrderId) -> bool {
        if self.retired.contains(&id) {
            return false;
        }
        self.active.insert(id)
    }

    /// Stop tracking an order for good. Returns `true` if it was tracked.
    pub fn retire(&mut self, id: OrderId) -> bool {
        self.retired.insert(id);
        self.active.remove(&id)
    }

    /// Apply a lifecycle event. Returns `true` if the set changed.
    pub fn apply(&mut self, event: &OrderEvent) -> bool {
        if event.is_terminal() {
            self.retire(event.order_id())
        } else {
            self.track(event.order_id())
        }
    }

    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.active.contains(id)
    }

    #[must_use]
    pub fn is_retired(&self, id: &OrderId) -> bool {
        self.retired.contains(id)
    }

    /// Number of retirements remembered since the last [`forget_retired`](Self::forget_retired).
    #[must_use]
    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    /// Drop remembered retirements. Tracked ids are unaffected.
    pub fn forget_retired(&mut self) {
        self.retired.clear();
    }

    /// Copy of the tracked ids, in ascending id order.
    ///
    /// Passes iterate over a snapshot so the set can be mutated meanwhile.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OrderId> {
        self.active.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
