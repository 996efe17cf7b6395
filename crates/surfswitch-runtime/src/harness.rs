#![forbid(unsafe_code)]

//! Harness session: the hosting view's side of the wiring.
//!
//! [`Harness`] owns the registry, selector, overlay loop and refresh queue,
//! and exposes the calls a hosting view makes:
//!
//! | view event | harness call |
//! |---|---|
//! | created | [`on_create`](Harness::on_create): probe renderer, hand it assets |
//! | view created | [`on_create_view`](Harness::on_create_view): start renderer |
//! | surface callbacks | [`handle_surface_event`](Harness::handle_surface_event) |
//! | button press | [`advance`](Harness::advance), [`label`](Harness::label) |
//! | refresh signal | [`on_refresh`](Harness::on_refresh) |
//! | stopped | [`on_stop`](Harness::on_stop): stop renderer |
//! | destroyed | [`on_destroy`](Harness::on_destroy): stop loop, drop references |
//!
//! Everything runs on one execution context; the harness takes `&mut self`
//! everywhere and holds no locks.

use surfswitch_backend::{AssetSource, RendererFacade, SurfaceHost, WallClock};
use surfswitch_core::registry::SurfaceRegistry;
use surfswitch_core::selection::SelectionState;
use surfswitch_core::surface::{InputSlot, SurfaceEvent, SurfaceRole};
use surfswitch_render::marker::MarkerStyle;
use web_time::Duration;

use crate::cancellation::{LoopStopSource, LoopStopToken};
use crate::config::{HarnessConfig, UnsupportedRendererPolicy};
use crate::error::{HarnessError, Result};
use crate::overlay::{OverlayRenderLoop, OverlayStats, TickContext, TickReport};
use crate::scheduler::FrameCallbackQueue;
use crate::selector::{InputSelector, Transition};

/// Lifecycle phase of the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructed, `on_create` not yet called.
    Initialized,
    Created,
    Running,
    Stopped,
    Destroyed,
}

/// One harness session bound to a renderer, a surface host and a clock.
#[derive(Debug)]
pub struct Harness<R, H, C> {
    config: HarnessConfig,
    renderer: R,
    host: H,
    clock: C,
    registry: SurfaceRegistry,
    selector: InputSelector,
    overlay: OverlayRenderLoop,
    frames: FrameCallbackQueue,
    stop: LoopStopSource,
    phase: Phase,
    degraded: bool,
}

impl<R, H, C> Harness<R, H, C>
where
    R: RendererFacade,
    H: SurfaceHost,
    C: WallClock,
{
    /// Build a session. Fails if `config` does not validate.
    pub fn new(config: HarnessConfig, renderer: R, host: H, clock: C) -> Result<Self> {
        let config = config.validated()?;
        let stop = LoopStopSource::new();
        let overlay = OverlayRenderLoop::new(
            config.overlay.style(InputSlot::A),
            config.overlay.style(InputSlot::B),
            stop.token(),
        );
        Ok(Self {
            config,
            renderer,
            host,
            clock,
            registry: SurfaceRegistry::new(),
            selector: InputSelector::new(),
            overlay,
            frames: FrameCallbackQueue::new(),
            stop,
            phase: Phase::Initialized,
            degraded: false,
        })
    }

    /// Probe the renderer and hand it the asset source.
    ///
    /// An unsupported renderer either aborts setup or marks the session
    /// degraded, per [`HarnessConfig::unsupported_renderer`].
    ///
    /// Ignored once the session has been destroyed.
    pub fn on_create(&mut self) -> Result<()> {
        if self.phase == Phase::Destroyed {
            tracing::debug!("create after teardown ignored");
            return Ok(());
        }
        let supported = self.renderer.is_supported();
        tracing::info!(supported, "renderer capability probe");
        if !supported {
            match self.config.unsupported_renderer {
                UnsupportedRendererPolicy::Abort => {
                    tracing::error!("renderer unsupported, aborting setup");
                    return Err(HarnessError::RendererUnsupported);
                }
                UnsupportedRendererPolicy::Degrade => {
                    tracing::warn!("renderer unsupported, continuing in degraded mode");
                    self.degraded = true;
                }
            }
        }
        let source = AssetSource::new(self.config.asset_root.clone());
        tracing::debug!(assets = %source, "setting renderer asset source");
        self.renderer.set_asset_source(source);
        self.phase = Phase::Created;
        Ok(())
    }

    /// Surface callbacks are wired; start the renderer.
    pub fn on_create_view(&mut self) {
        if matches!(self.phase, Phase::Running | Phase::Destroyed) {
            return;
        }
        self.renderer.start_running();
        self.phase = Phase::Running;
        tracing::debug!("renderer started");
    }

    /// The hosting view is no longer active.
    pub fn on_stop(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.renderer.stop_running();
        self.phase = Phase::Stopped;
        tracing::debug!("renderer stopped");
    }

    /// Tear down: stop the overlay loop, drop surface references.
    pub fn on_destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.on_stop();
        self.stop.stop();
        self.frames.cancel_pending();
        self.registry.clear();
        self.phase = Phase::Destroyed;
        tracing::info!(ticks = self.overlay.stats().ticks, "harness destroyed");
    }

    /// Apply a platform surface lifecycle event.
    pub fn handle_surface_event(&mut self, role: SurfaceRole, event: SurfaceEvent) {
        if self.phase == Phase::Destroyed {
            tracing::debug!(%role, ?event, "surface event after teardown ignored");
            return;
        }
        match event {
            SurfaceEvent::Created(handle) => {
                tracing::debug!(%role, surface = %handle, "surface created");
                self.registry.set_role(role, Some(handle));
                match role {
                    SurfaceRole::Output => {
                        self.renderer.set_output_surface(self.registry.output());
                    }
                    SurfaceRole::Input(InputSlot::A) => {
                        self.selector.prime(&self.registry, &mut self.renderer);
                        self.overlay.start(&mut self.frames);
                    }
                    SurfaceRole::Input(InputSlot::B) => {}
                }
            }
            SurfaceEvent::Changed { handle, size } => {
                tracing::trace!(%role, surface = %handle, width = size.width, height = size.height, "surface changed");
            }
            SurfaceEvent::Destroyed(handle) => {
                if !self.registry.revoke(role, handle) {
                    tracing::debug!(%role, surface = %handle, "stale destroy ignored");
                    return;
                }
                tracing::debug!(%role, surface = %handle, "surface destroyed");
                // The renderer keeps a destroyed input until the next advance.
                if role == SurfaceRole::Output {
                    self.renderer.set_output_surface(None);
                }
            }
        }
    }

    /// Operator trigger: cycle the input selection.
    ///
    /// After teardown the selection holds and the renderer is not touched;
    /// the returned transition has `from == to` and no input.
    pub fn advance(&mut self) -> Transition {
        if self.phase == Phase::Destroyed {
            tracing::debug!("advance after teardown ignored");
            let state = self.selector.state();
            return Transition {
                from: state,
                to: state,
                input: None,
            };
        }
        self.selector.advance(&self.registry, &mut self.renderer)
    }

    /// Refresh signal. Runs the overlay tick if a callback is pending.
    pub fn on_refresh(&mut self, frame_time: Duration) -> Option<TickReport> {
        if !self.frames.take_pending() {
            return None;
        }
        let ctx = TickContext::new(frame_time, self.clock.now_millis());
        Some(
            self.overlay
                .do_frame(ctx, &self.registry, &mut self.host, &mut self.frames),
        )
    }

    /// Operator-facing label for the current selection.
    pub fn label(&self) -> &'static str {
        self.selector.label()
    }

    pub fn selection(&self) -> SelectionState {
        self.selector.state()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when the renderer probe failed and setup continued anyway.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for platforms that create surfaces on demand.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn overlay_stats(&self) -> &OverlayStats {
        self.overlay.stats()
    }

    pub fn marker_style(&self, slot: InputSlot) -> &MarkerStyle {
        self.overlay.style(slot)
    }

    pub fn frame_callbacks(&self) -> &FrameCallbackQueue {
        &self.frames
    }

    /// Token that observes teardown of this session.
    pub fn stop_token(&self) -> LoopStopToken {
        self.stop.token()
    }

    /// A second handle on this session's stop, for firing it from another
    /// thread.
    pub fn stop_source(&self) -> LoopStopSource {
        self.stop.clone()
    }

    /// Stop the overlay loop without tearing the session down.
    pub fn stop_overlay(&mut self) {
        self.stop.stop();
    }
}
