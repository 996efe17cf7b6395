#![forbid(unsafe_code)]

//! Runs a [`Script`] against a headless harness session.

use std::collections::HashMap;
use std::fmt;

use surfswitch_backend::WallClock;
use surfswitch_core::surface::{InputSlot, SurfaceEvent, SurfaceHandle, SurfaceRole};
use surfswitch_runtime::{
    DrawOutcome, Harness, HarnessConfig, HeadlessHost, LoopStopToken, ManualClock, OverlayStats,
    RecordingRenderer, SystemClock,
};
use web_time::{Duration, Instant};

use crate::error::{CliError, Result};
use crate::script::{Script, Step};

/// Unix millis the simulated clock starts at (2023-11-14T22:13:20Z).
pub const SIMULATED_EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// How refresh signals are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub interval: Duration,
    /// Sleep between refreshes and stamp frames with the real clock.
    pub realtime: bool,
}

impl Pacing {
    /// `fps` is clamped to at least 1.
    pub fn from_fps(fps: u32, realtime: bool) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            realtime,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_fps(60, false)
    }
}

/// Wall clock for a scripted run: simulated unless pacing is realtime.
#[derive(Debug)]
pub enum ScriptClock {
    Simulated(ManualClock),
    System(SystemClock),
}

impl ScriptClock {
    pub fn for_pacing(pacing: Pacing) -> Self {
        if pacing.realtime {
            Self::System(SystemClock)
        } else {
            Self::Simulated(ManualClock::new(SIMULATED_EPOCH_MILLIS))
        }
    }

    /// Move a simulated clock to `elapsed` past its epoch.
    fn sync(&self, elapsed: Duration) {
        if let Self::Simulated(clock) = self {
            let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            clock.set(SIMULATED_EPOCH_MILLIS.saturating_add(millis));
        }
    }
}

impl WallClock for ScriptClock {
    fn now_millis(&self) -> u64 {
        match self {
            Self::Simulated(clock) => clock.now_millis(),
            Self::System(clock) => clock.now_millis(),
        }
    }
}

/// Options that are not part of [`HarnessConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub pacing: Pacing,
    /// Make the recording renderer fail its capability probe.
    pub unsupported_renderer: bool,
}

type HeadlessHarness = Harness<RecordingRenderer, HeadlessHost, ScriptClock>;

/// Drives one headless session through a script.
pub struct ScriptRunner {
    harness: HeadlessHarness,
    handles: HashMap<SurfaceRole, SurfaceHandle>,
    pacing: Pacing,
    started: Instant,
    steps: usize,
    refreshes: u64,
    presses: u64,
    /// Simulated time since the first refresh was due.
    elapsed_nanos: u64,
}

impl ScriptRunner {
    /// Set the session up the way a hosting view would: create, then create
    /// the view. Fails if the config is invalid or the renderer is
    /// unsupported under the abort policy.
    pub fn new(config: HarnessConfig, options: RunOptions) -> Result<Self> {
        let renderer = if options.unsupported_renderer {
            RecordingRenderer::unsupported()
        } else {
            RecordingRenderer::new()
        };
        let clock = ScriptClock::for_pacing(options.pacing);
        let mut harness = Harness::new(config, renderer, HeadlessHost::new(), clock)?;
        harness.on_create()?;
        harness.on_create_view();
        Ok(Self {
            harness,
            handles: HashMap::new(),
            pacing: options.pacing,
            started: Instant::now(),
            steps: 0,
            refreshes: 0,
            presses: 0,
            elapsed_nanos: 0,
        })
    }

    pub fn harness(&self) -> &HeadlessHarness {
        &self.harness
    }

    pub fn stop_token(&self) -> LoopStopToken {
        self.harness.stop_token()
    }

    /// Run every step in order. Stops at the first failing step, or quietly
    /// once the session's stop has been fired.
    pub fn run(&mut self, script: &Script) -> Result<()> {
        for (i, step) in script.steps().iter().enumerate() {
            if self.stop_token().is_stopped() {
                tracing::info!(step = i + 1, "stop requested, skipping remaining steps");
                break;
            }
            tracing::debug!(step = i + 1, action = %step, "script step");
            self.apply(i + 1, *step)?;
            self.steps += 1;
        }
        Ok(())
    }

    fn apply(&mut self, index: usize, step: Step) -> Result<()> {
        match step {
            Step::Create(role, size) => {
                let handle = self.harness.host_mut().create_surface(size);
                self.handles.insert(role, handle);
                self.harness
                    .handle_surface_event(role, SurfaceEvent::Created(handle));
            }
            Step::Change(role, size) => {
                let handle = self.handle(index, step, role)?;
                self.harness
                    .handle_surface_event(role, SurfaceEvent::Changed { handle, size });
            }
            Step::Destroy(role) => {
                let handle = self.handle(index, step, role)?;
                self.harness.host_mut().revoke(handle);
                self.harness
                    .handle_surface_event(role, SurfaceEvent::Destroyed(handle));
            }
            Step::Press(n) => {
                for _ in 0..n {
                    let t = self.harness.advance();
                    self.presses += 1;
                    tracing::info!(
                        from = t.from.label(),
                        to = t.to.label(),
                        input = ?t.input,
                        "operator press"
                    );
                }
            }
            Step::Tick(n) => {
                for _ in 0..n {
                    if !self.refresh() {
                        break;
                    }
                }
            }
            Step::FailLock(slot) => {
                let handle = self.handle(index, step, SurfaceRole::Input(slot))?;
                self.harness.host_mut().fail_next_lock(handle);
            }
            Step::FailPost(slot) => {
                let handle = self.handle(index, step, SurfaceRole::Input(slot))?;
                self.harness.host_mut().fail_next_post(handle);
            }
            Step::Stop => self.harness.on_stop(),
            Step::Start => self.harness.on_create_view(),
            Step::Expect(expected) => {
                let actual = self.harness.label();
                if actual != expected {
                    return Err(CliError::Expectation {
                        step: index,
                        action: step.to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    fn handle(&self, index: usize, step: Step, role: SurfaceRole) -> Result<SurfaceHandle> {
        self.handles
            .get(&role)
            .copied()
            .ok_or_else(|| CliError::NoSurface {
                step: index,
                action: step.to_string(),
                role,
            })
    }

    /// Deliver one refresh signal. Returns `false` once the loop has been
    /// stopped from elsewhere.
    fn refresh(&mut self) -> bool {
        let frame_time = if self.pacing.realtime {
            if self.stop_token().sleep(self.pacing.interval) {
                return false;
            }
            self.started.elapsed()
        } else {
            let step = u64::try_from(self.pacing.interval.as_nanos()).unwrap_or(u64::MAX);
            self.elapsed_nanos = self.elapsed_nanos.saturating_add(step);
            let elapsed = Duration::from_nanos(self.elapsed_nanos);
            self.harness.clock().sync(elapsed);
            elapsed
        };
        self.refreshes += 1;
        if let Some(report) = self.harness.on_refresh(frame_time) {
            tracing::debug!(
                tick = self.harness.overlay_stats().ticks,
                a = %outcome_name(report.a),
                b = %outcome_name(report.b),
                "refresh"
            );
        }
        true
    }

    /// Tear the session down and summarize it.
    pub fn finish(mut self) -> RunSummary {
        let label = self.harness.label();
        self.harness.on_destroy();
        let renderer = self.harness.renderer();
        let summary = RunSummary {
            steps: self.steps,
            refreshes: self.refreshes,
            presses: self.presses,
            label,
            degraded: self.harness.is_degraded(),
            input: renderer.input_surface(),
            output: renderer.output_surface(),
            stats: *self.harness.overlay_stats(),
            registrations: self.harness.frame_callbacks().registrations(),
        };
        tracing::info!(
            ticks = summary.stats.ticks,
            presses = summary.presses,
            label = summary.label,
            "session finished"
        );
        summary
    }
}

fn outcome_name(outcome: DrawOutcome) -> String {
    match outcome {
        DrawOutcome::Drawn(handle) => format!("drawn:{handle}"),
        DrawOutcome::Skipped(reason) => reason.to_string(),
    }
}

/// What a scripted run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    /// Refresh signals delivered, whether or not a tick was pending.
    pub refreshes: u64,
    pub presses: u64,
    /// Operator label at the end of the script.
    pub label: &'static str,
    pub degraded: bool,
    /// Renderer input at teardown.
    pub input: Option<SurfaceHandle>,
    /// Renderer output at teardown.
    pub output: Option<SurfaceHandle>,
    pub stats: OverlayStats,
    pub registrations: u64,
}

fn handle_json(handle: Option<SurfaceHandle>) -> serde_json::Value {
    handle.map_or(serde_json::Value::Null, |h| h.raw().into())
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Value {
        let slot = |slot: InputSlot| {
            let s = self.stats.slot(slot);
            serde_json::json!({
                "drawn": s.drawn,
                "not_ready": s.not_ready,
                "lock_failed": s.lock_failed,
                "post_failed": s.post_failed,
            })
        };
        serde_json::json!({
            "status": "ok",
            "steps": self.steps,
            "refreshes": self.refreshes,
            "presses": self.presses,
            "label": self.label,
            "degraded": self.degraded,
            "renderer_input": handle_json(self.input),
            "renderer_output": handle_json(self.output),
            "ticks": self.stats.ticks,
            "frame_registrations": self.registrations,
            "a": slot(InputSlot::A),
            "b": slot(InputSlot::B),
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |h: Option<SurfaceHandle>| h.map_or_else(|| "none".to_string(), |h| h.to_string());
        writeln!(
            f,
            "steps={} refreshes={} ticks={} presses={}",
            self.steps, self.refreshes, self.stats.ticks, self.presses
        )?;
        writeln!(
            f,
            "label={} input={} output={}{}",
            self.label,
            show(self.input),
            show(self.output),
            if self.degraded { " (degraded)" } else { "" }
        )?;
        for slot in InputSlot::ALL {
            let s = self.stats.slot(slot);
            writeln!(
                f,
                "{slot}: drawn={} not-ready={} lock-failed={} post-failed={}",
                s.drawn, s.not_ready, s.lock_failed, s.post_failed
            )?;
        }
        Ok(())
    }
}
