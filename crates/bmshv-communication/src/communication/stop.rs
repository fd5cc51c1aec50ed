//! Cooperative stop signal for the link worker

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct StopInner {
    raised: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// One-shot flag that wakes sleepers when raised
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every waiter
    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::Release);
        let _guard = self.inner.lock.lock();
        self.inner.wake.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Sleep for `duration` or until the signal is raised
    ///
    /// Returns whether the signal is raised.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self.inner.lock.lock();
        while !self.is_raised() {
            if self.inner.wake.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
        self.is_raised()
    }
}
