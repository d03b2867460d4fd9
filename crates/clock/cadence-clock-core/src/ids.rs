//! Subscription identifiers and their allocator.

use serde::{Deserialize, Serialize};

/// Opaque identity of one clock subscription.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Monotonic allocator. Ids are never reused within one clock.
#[derive(Default, Debug)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    #[inline]
    pub(crate) fn alloc(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
