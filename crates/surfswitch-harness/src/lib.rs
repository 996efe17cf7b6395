#![forbid(unsafe_code)]

//! Scripted headless driver for surfswitch.
//!
//! Runs a harness session against the in-memory platform: surfaces are
//! created and destroyed, the operator button is pressed and refresh
//! signals are delivered as a [`Script`](script::Script) dictates. The run
//! ends with a summary of what the overlay loop drew and where the renderer
//! was pointed.
//!
//! ```sh
//! surfswitch-harness -e "create output; create a; create b; tick 60; press; tick 60"
//! surfswitch-harness --script scenarios/lost-input.txt --json
//! RUST_LOG=surfswitch_runtime=trace surfswitch-harness --realtime
//! ```

pub mod cli;
pub mod error;
pub mod script;
pub mod session;
pub mod signals;

pub use cli::{Cli, execute};
pub use error::{CliError, Result};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides `verbose`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
