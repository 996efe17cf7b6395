#![forbid(unsafe_code)]

//! Overlay render loop.
//!
//! Once per refresh the loop paints a marker and the current wall-clock
//! timestamp onto both input surfaces, whichever one is selected. That keeps
//! the unselected surface visibly alive and lets an operator tell from the
//! renderer output which source it is consuming (red for A, blue for B).
//!
//! # Tick contract
//!
//! 1. Re-arm for the next refresh first, unless the stop token is set.
//! 2. Draw A, then B. A missing surface is skipped without touching the host.
//! 3. A failed lock or post skips that surface for this tick only. Nothing is
//!    retried or propagated, and the other surface is still drawn.
//!
//! The draws share no mutable state, so their order is not observable.

use std::fmt;

use surfswitch_backend::{FrameScheduler, SurfaceHost};
use surfswitch_core::registry::SurfaceRegistry;
use surfswitch_core::surface::{InputSlot, SurfaceHandle};
use surfswitch_render::marker::{MarkerStyle, paint_marker};
use web_time::Duration;

use crate::cancellation::LoopStopToken;

/// Per-frame inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Monotonic time of the refresh signal.
    pub frame_time: Duration,
    /// Wall clock in Unix milliseconds, drawn as the timestamp.
    pub wall_millis: u64,
}

impl TickContext {
    pub const fn new(frame_time: Duration, wall_millis: u64) -> Self {
        Self {
            frame_time,
            wall_millis,
        }
    }
}

/// Why a surface was not drawn this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No valid handle on file.
    NotReady,
    /// The host refused to hand out a canvas.
    LockFailed,
    /// The canvas was drawn but could not be published.
    PostFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotReady => "not-ready",
            Self::LockFailed => "lock-failed",
            Self::PostFailed => "post-failed",
        })
    }
}

/// Result of drawing one surface for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(SurfaceHandle),
    Skipped(SkipReason),
}

impl DrawOutcome {
    #[inline]
    pub const fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub a: DrawOutcome,
    pub b: DrawOutcome,
    /// Whether the loop posted a callback for the next refresh.
    pub rearmed: bool,
}

impl TickReport {
    pub const fn outcome(&self, slot: InputSlot) -> DrawOutcome {
        match slot {
            InputSlot::A => self.a,
            InputSlot::B => self.b,
        }
    }
}

/// Per-slot draw counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    pub drawn: u64,
    pub not_ready: u64,
    pub lock_failed: u64,
    pub post_failed: u64,
}

impl SlotStats {
    /// All skipped draws regardless of reason.
    pub const fn skipped(&self) -> u64 {
        self.not_ready + self.lock_failed + self.post_failed
    }

    fn record(&mut self, outcome: DrawOutcome) {
        match outcome {
            DrawOutcome::Drawn(_) => self.drawn += 1,
            DrawOutcome::Skipped(SkipReason::NotReady) => self.not_ready += 1,
            DrawOutcome::Skipped(SkipReason::LockFailed) => self.lock_failed += 1,
            DrawOutcome::Skipped(SkipReason::PostFailed) => self.post_failed += 1,
        }
    }
}

/// Cumulative loop counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayStats {
    pub ticks: u64,
    pub a: SlotStats,
    pub b: SlotStats,
}

impl OverlayStats {
    pub const fn slot(&self, slot: InputSlot) -> &SlotStats {
        match slot {
            InputSlot::A => &self.a,
            InputSlot::B => &self.b,
        }
    }
}

/// Self-re-arming overlay painter for the two input surfaces.
#[derive(Debug)]
pub struct OverlayRenderLoop {
    style_a: MarkerStyle,
    style_b: MarkerStyle,
    stop: LoopStopToken,
    started: bool,
    stats: OverlayStats,
}

impl OverlayRenderLoop {
    pub fn new(style_a: MarkerStyle, style_b: MarkerStyle, stop: LoopStopToken) -> Self {
        Self {
            style_a,
            style_b,
            stop,
            started: false,
            stats: OverlayStats::default(),
        }
    }

    /// Whether [`start`](Self::start) has armed the loop.
    #[inline]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub const fn stats(&self) -> &OverlayStats {
        &self.stats
    }

    pub const fn style(&self, slot: InputSlot) -> &MarkerStyle {
        match slot {
            InputSlot::A => &self.style_a,
            InputSlot::B => &self.style_b,
        }
    }

    /// Arm the loop by posting the first frame callback.
    ///
    /// The loop sustains itself afterwards, so this only acts once. Returns
    /// `false` if the loop was already started or has been stopped.
    pub fn start<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        if self.started || self.stop.is_stopped() {
            return false;
        }
        self.started = true;
        scheduler.post_frame_callback();
        tracing::debug!("overlay loop armed");
        true
    }

    /// Run one tick. Called from the refresh callback.
    pub fn do_frame<H, S>(
        &mut self,
        ctx: TickContext,
        registry: &SurfaceRegistry,
        host: &mut H,
        scheduler: &mut S,
    ) -> TickReport
    where
        H: SurfaceHost + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let rearmed = !self.stop.is_stopped();
        if rearmed {
            scheduler.post_frame_callback();
        } else {
            tracing::debug!(tick = self.stats.ticks, "overlay loop stopped, not re-arming");
        }

        let a = self.draw_slot(InputSlot::A, ctx, registry, host);
        let b = self.draw_slot(InputSlot::B, ctx, registry, host);

        self.stats.ticks += 1;
        self.stats.a.record(a);
        self.stats.b.record(b);

        tracing::trace!(
            tick = self.stats.ticks,
            frame_time_us = ctx.frame_time.as_micros() as u64,
            a = ?a,
            b = ?b,
            "overlay tick"
        );
        TickReport { a, b, rearmed }
    }

    fn draw_slot<H>(
        &self,
        slot: InputSlot,
        ctx: TickContext,
        registry: &SurfaceRegistry,
        host: &mut H,
    ) -> DrawOutcome
    where
        H: SurfaceHost + ?Sized,
    {
        let Some(handle) = registry.get(slot) else {
            return DrawOutcome::Skipped(SkipReason::NotReady);
        };

        let mut canvas = match host.lock_canvas(handle) {
            Ok(canvas) => canvas,
            Err(err) => {
                tracing::debug!(slot = slot.name(), surface = %handle, error = %err, "lock failed, skipping frame");
                return DrawOutcome::Skipped(SkipReason::LockFailed);
            }
        };

        paint_marker(&mut canvas, self.style(slot), ctx.wall_millis);

        match host.unlock_canvas_and_post(handle, canvas) {
            Ok(()) => DrawOutcome::Drawn(handle),
            Err(err) => {
                tracing::debug!(slot = slot.name(), surface = %handle, error = %err, "post failed, skipping frame");
                DrawOutcome::Skipped(SkipReason::PostFailed)
            }
        }
    }
}
