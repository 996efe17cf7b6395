//! Explicit stop signal for the overlay loop.
//!
//! The overlay loop re-arms itself on every refresh, so it needs a flag to
//! know when to quit. It holds a [`LoopStopToken`] and checks it before
//! re-arming. The harness owns a [`LoopStopSource`] and fires it on teardown.
//! Sources are cloneable so a second owner, such as a signal-forwarding
//! thread, can fire the same stop from outside the render context.
//!
//! A paced refresh driver sleeps between frames with
//! [`LoopStopToken::sleep`], which returns early once a stop is requested.
//!
//! # Example
//!
//! ```
//! use surfswitch_runtime::cancellation::LoopStopSource;
//!
//! let source = LoopStopSource::new();
//! let token = source.token();
//! assert!(!token.is_stopped());
//! source.stop();
//! assert!(token.is_stopped());
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use web_time::Duration;

#[derive(Default)]
struct Shared {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl Shared {
    // A poisoned flag is still a valid bool.
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fires the stop. Clones fire the same stop.
///
/// Dropping every source does not stop the loop; call [`stop`](Self::stop).
#[derive(Clone, Default)]
pub struct LoopStopSource {
    shared: Arc<Shared>,
}

/// Observes the stop.
#[derive(Clone)]
pub struct LoopStopToken {
    shared: Arc<Shared>,
}

impl LoopStopSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> LoopStopToken {
        LoopStopToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Request the stop and wake every sleeping token. Idempotent.
    pub fn stop(&self) {
        let mut stopped = self.shared.flag();
        *stopped = true;
        self.shared.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.shared.flag()
    }
}

impl LoopStopToken {
    pub fn is_stopped(&self) -> bool {
        *self.shared.flag()
    }

    /// Sleep for `duration` unless a stop arrives first.
    ///
    /// Returns `true` when woken by a stop (or already stopped).
    pub fn sleep(&self, duration: Duration) -> bool {
        let guard = self.shared.flag();
        let (stopped, _) = self
            .shared
            .wake
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stopped
    }
}

impl fmt::Debug for LoopStopSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoopStopSource({})", state(self.is_stopped()))
    }
}

impl fmt::Debug for LoopStopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoopStopToken({})", state(self.is_stopped()))
    }
}

fn state(stopped: bool) -> &'static str {
    if stopped { "stopped" } else { "live" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use web_time::Instant;

    #[test]
    fn fresh_source_is_live() {
        let source = LoopStopSource::new();
        assert!(!source.is_stopped());
        assert!(!source.token().is_stopped());
    }

    #[test]
    fn cloned_source_fires_shared_stop() {
        let source = LoopStopSource::new();
        let token = source.token();
        let remote = source.clone();
        remote.stop();
        remote.stop();
        assert!(token.is_stopped());
        assert!(source.is_stopped());
    }

    #[test]
    fn dropping_sources_leaves_token_live() {
        let source = LoopStopSource::new();
        let token = source.token();
        drop(source);
        assert!(!token.is_stopped());
        assert!(!token.sleep(Duration::from_millis(1)));
    }

    #[test]
    fn sleep_after_stop_returns_at_once() {
        let source = LoopStopSource::new();
        source.stop();
        let start = Instant::now();
        assert!(source.token().sleep(Duration::from_secs(30)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn sleep_runs_full_duration_when_live() {
        let token = LoopStopSource::new().token();
        let start = Instant::now();
        assert!(!token.sleep(Duration::from_millis(15)));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn stop_from_another_thread_cuts_sleep_short() {
        let source = LoopStopSource::new();
        let token = source.token();
        let sleeper = thread::spawn(move || {
            let start = Instant::now();
            (token.sleep(Duration::from_secs(30)), start.elapsed())
        });
        thread::sleep(std::time::Duration::from_millis(20));
        source.stop();
        let (woken, slept) = sleeper.join().unwrap();
        assert!(woken);
        assert!(slept < Duration::from_secs(5));
    }

    #[test]
    fn debug_names_state() {
        let source = LoopStopSource::new();
        assert_eq!(format!("{:?}", source.token()), "LoopStopToken(live)");
        source.stop();
        assert_eq!(format!("{source:?}"), "LoopStopSource(stopped)");
    }
}
