#![forbid(unsafe_code)]

//! In-process refresh callback queue.
//!
//! Stands in for the platform's per-refresh callback registry. A posted
//! callback fires once on the next refresh; the queue records every
//! registration so liveness of a self-re-arming loop can be checked.

use surfswitch_backend::FrameScheduler;

/// Pending refresh callbacks plus a registration counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameCallbackQueue {
    pending: bool,
    registrations: u64,
    dispatched: u64,
}

impl FrameCallbackQueue {
    pub const fn new() -> Self {
        Self {
            pending: false,
            registrations: 0,
            dispatched: 0,
        }
    }

    /// Whether a callback is waiting for the next refresh.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of `post_frame_callback` calls.
    #[inline]
    pub const fn registrations(&self) -> u64 {
        self.registrations
    }

    /// Callbacks handed out by [`take_pending`](Self::take_pending).
    #[inline]
    pub const fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Consume the pending callback for this refresh, if any.
    pub fn take_pending(&mut self) -> bool {
        if std::mem::take(&mut self.pending) {
            self.dispatched += 1;
            true
        } else {
            false
        }
    }

    /// Drop a pending callback without running it.
    pub fn cancel_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for FrameCallbackQueue {
    fn post_frame_callback(&mut self) {
        // The overlay loop is the only client, so one pending slot suffices.
        self.pending = true;
        self.registrations += 1;
    }
}
