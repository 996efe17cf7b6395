#![forbid(unsafe_code)]

//! surfswitch runtime
//!
//! Ties the core types, the overlay painter and the backend seams together
//! into a running harness session.
//!
//! # Key Components
//!
//! - [`Harness`] - Session glue driven by the hosting view's lifecycle
//! - [`InputSelector`] - Cyclic A → B → none selection, forwarded to the renderer
//! - [`OverlayRenderLoop`] - Self-re-arming per-refresh marker painter
//! - [`FrameCallbackQueue`] - Single-slot refresh callback queue
//! - [`LoopStopSource`] - Teardown signal for the overlay loop
//! - [`HarnessConfig`] - Asset root, marker styling and renderer policy
//!
//! # Role in surfswitch
//! `surfswitch-runtime` is the orchestrator. Platforms feed it surface
//! lifecycle events, operator presses and refresh signals; it decides which
//! input the renderer consumes and keeps both inputs painted.

pub mod cancellation;
pub mod config;
pub mod error;
pub mod harness;
pub mod overlay;
pub mod scheduler;
pub mod selector;
pub mod simulator;

pub use cancellation::{LoopStopSource, LoopStopToken};
pub use config::{ConfigError, HarnessConfig, OverlayConfig, UnsupportedRendererPolicy};
pub use error::{HarnessError, Result};
pub use harness::{Harness, Phase};
pub use overlay::{
    DrawOutcome, OverlayRenderLoop, OverlayStats, SkipReason, SlotStats, TickContext, TickReport,
};
pub use scheduler::FrameCallbackQueue;
pub use selector::{InputSelector, Transition};
pub use simulator::{HeadlessError, HeadlessHost, ManualClock, RecordingRenderer, SystemClock};
