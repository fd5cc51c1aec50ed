//! Bounded hand-off queues
//!
//! The link worker and the control loop exchange telemetry lines and command
//! tokens through these queues. Both sides only ever `try_push` / `try_pop`;
//! nothing waits on a queue. A full queue resolves the push according to its
//! [`OverflowPolicy`] and reports the loss as a [`QueueError::Overflow`].

use bmshv_core::config::OverflowPolicy;
use bmshv_core::{Discarded, QueueError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Fixed-capacity FIFO shared between threads
///
/// Cloning yields another handle to the same queue.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    name: &'static str,
    capacity: usize,
    policy: OverflowPolicy,
    items: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            capacity: self.capacity,
            policy: self.policy,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (at least one)
    pub fn new(name: &'static str, capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            capacity,
            policy,
            items: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    /// Add an item without blocking
    ///
    /// On overflow the item is still accepted under
    /// [`OverflowPolicy::DisplaceOldest`]; the error says which item was lost.
    pub fn try_push(&self, item: T) -> Result<(), QueueError> {
        let mut items = self.items.lock();
        if items.len() < self.capacity {
            items.push_back(item);
            return Ok(());
        }

        let discarded = match self.policy {
            OverflowPolicy::DropNewest => Discarded::Incoming,
            OverflowPolicy::DisplaceOldest => {
                items.pop_front();
                items.push_back(item);
                Discarded::Stale
            }
        };

        Err(QueueError::Overflow {
            queue: self.name.to_string(),
            capacity: self.capacity,
            discarded,
        })
    }

    /// Remove the oldest item, if any
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.lock().len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let queue: BoundedQueue<u8> = BoundedQueue::new("test", 0, OverflowPolicy::DropNewest);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.try_push(1).is_ok());
        assert!(queue.is_full());
    }
}
