#![forbid(unsafe_code)]

//! Forward SIGINT/SIGTERM to a session's stop source.
//!
//! A realtime run sleeps between refreshes on the session's
//! [`LoopStopToken`](surfswitch_runtime::LoopStopToken). While a
//! [`StopOnSignal`] guard is alive, a termination signal fires the stop, the
//! sleep returns early, and the runner tears the session down normally so
//! the summary still gets printed.

use std::io;

use surfswitch_runtime::LoopStopSource;

/// Keeps a signal-forwarding thread alive; dropping it uninstalls it.
#[derive(Debug)]
pub struct StopOnSignal {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: Option<std::thread::JoinHandle<()>>,
}

impl StopOnSignal {
    #[cfg(unix)]
    pub fn install(source: LoopStopSource) -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                tracing::warn!(signal, "termination signal received, stopping session");
                source.stop();
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Signals are not forwarded on this platform.
    #[cfg(not(unix))]
    pub fn install(source: LoopStopSource) -> io::Result<Self> {
        drop(source);
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for StopOnSignal {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
