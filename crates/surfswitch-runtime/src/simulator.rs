#![forbid(unsafe_code)]

//! Headless platform for tests and the CLI.
//!
//! - [`HeadlessHost`]: in-memory surfaces that can be revoked or told to fail
//! - [`RecordingRenderer`]: a renderer stand-in that records every call
//! - [`ManualClock`] / [`SystemClock`]: wall clocks for timestamps

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use surfswitch_backend::{AssetSource, RendererFacade, SurfaceHost, WallClock};
use surfswitch_core::geometry::Size;
use surfswitch_core::surface::SurfaceHandle;
use surfswitch_render::canvas::Canvas;
use thiserror::Error;

/// Why the headless host refused a lock or post.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeadlessError {
    #[error("{0} does not exist")]
    Unknown(SurfaceHandle),
    #[error("{0} was destroyed")]
    Revoked(SurfaceHandle),
    #[error("{0} is already locked")]
    AlreadyLocked(SurfaceHandle),
    #[error("{0} is not locked")]
    NotLocked(SurfaceHandle),
    #[error("injected failure on {0}")]
    Injected(SurfaceHandle),
}

#[derive(Debug)]
struct HeadlessSurface {
    size: Size,
    front: Canvas,
    posts: u64,
    lock_attempts: u64,
    locked: bool,
    revoked: bool,
}

/// In-memory surface host.
///
/// Locking hands out a fresh canvas; posting makes it the surface's front
/// buffer. Revoked surfaces refuse both.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_id: u64,
    surfaces: HashMap<SurfaceHandle, HeadlessSurface>,
    fail_lock: HashSet<SurfaceHandle>,
    fail_post: HashSet<SurfaceHandle>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new surface and return its handle.
    pub fn create_surface(&mut self, size: Size) -> SurfaceHandle {
        self.next_id += 1;
        let handle = SurfaceHandle::new(self.next_id);
        self.surfaces.insert(
            handle,
            HeadlessSurface {
                size,
                front: Canvas::new(size),
                posts: 0,
                lock_attempts: 0,
                locked: false,
                revoked: false,
            },
        );
        handle
    }

    /// Mark a surface destroyed. Its last posted frame stays inspectable.
    pub fn revoke(&mut self, handle: SurfaceHandle) {
        if let Some(surface) = self.surfaces.get_mut(&handle) {
            surface.revoked = true;
        }
    }

    /// Make the next lock of `handle` fail.
    pub fn fail_next_lock(&mut self, handle: SurfaceHandle) {
        self.fail_lock.insert(handle);
    }

    /// Make the next post of `handle` fail.
    pub fn fail_next_post(&mut self, handle: SurfaceHandle) {
        self.fail_post.insert(handle);
    }

    /// Last frame posted to `handle`.
    pub fn front_buffer(&self, handle: SurfaceHandle) -> Option<&Canvas> {
        self.surfaces.get(&handle).map(|s| &s.front)
    }

    /// Number of successful posts to `handle`.
    pub fn post_count(&self, handle: SurfaceHandle) -> u64 {
        self.surfaces.get(&handle).map_or(0, |s| s.posts)
    }

    /// Number of lock attempts on `handle`, successful or not.
    pub fn lock_attempts(&self, handle: SurfaceHandle) -> u64 {
        self.surfaces.get(&handle).map_or(0, |s| s.lock_attempts)
    }

    pub fn is_revoked(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.get(&handle).is_some_and(|s| s.revoked)
    }
}

impl SurfaceHost for HeadlessHost {
    type Error = HeadlessError;

    fn lock_canvas(&mut self, handle: SurfaceHandle) -> Result<Canvas, HeadlessError> {
        let injected = self.fail_lock.remove(&handle);
        let surface = self
            .surfaces
            .get_mut(&handle)
            .ok_or(HeadlessError::Unknown(handle))?;
        surface.lock_attempts += 1;
        if surface.revoked {
            return Err(HeadlessError::Revoked(handle));
        }
        if injected {
            return Err(HeadlessError::Injected(handle));
        }
        if surface.locked {
            return Err(HeadlessError::AlreadyLocked(handle));
        }
        surface.locked = true;
        Ok(Canvas::new(surface.size))
    }

    fn unlock_canvas_and_post(
        &mut self,
        handle: SurfaceHandle,
        canvas: Canvas,
    ) -> Result<(), HeadlessError> {
        let injected = self.fail_post.remove(&handle);
        let surface = self
            .surfaces
            .get_mut(&handle)
            .ok_or(HeadlessError::Unknown(handle))?;
        if !surface.locked {
            return Err(HeadlessError::NotLocked(handle));
        }
        surface.locked = false;
        if surface.revoked {
            return Err(HeadlessError::Revoked(handle));
        }
        if injected {
            return Err(HeadlessError::Injected(handle));
        }
        surface.front = canvas;
        surface.posts += 1;
        Ok(())
    }
}

/// Renderer stand-in that records what it was told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingRenderer {
    unsupported: bool,
    asset_source: Option<AssetSource>,
    output: Option<SurfaceHandle>,
    input: Option<SurfaceHandle>,
    running: bool,
    start_calls: u32,
    stop_calls: u32,
    input_calls: Vec<Option<SurfaceHandle>>,
    output_calls: Vec<Option<SurfaceHandle>>,
}

impl RecordingRenderer {
    /// A renderer whose capability probe succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose capability probe fails.
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn asset_source(&self) -> Option<&AssetSource> {
        self.asset_source.as_ref()
    }

    pub fn output_surface(&self) -> Option<SurfaceHandle> {
        self.output
    }

    pub fn input_surface(&self) -> Option<SurfaceHandle> {
        self.input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start_calls(&self) -> u32 {
        self.start_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }

    /// Every `set_input_surface` argument, in call order.
    pub fn input_calls(&self) -> &[Option<SurfaceHandle>] {
        &self.input_calls
    }

    /// Every `set_output_surface` argument, in call order.
    pub fn output_calls(&self) -> &[Option<SurfaceHandle>] {
        &self.output_calls
    }
}

impl RendererFacade for RecordingRenderer {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn set_asset_source(&mut self, source: AssetSource) {
        self.asset_source = Some(source);
    }

    fn set_output_surface(&mut self, handle: Option<SurfaceHandle>) {
        self.output = handle;
        self.output_calls.push(handle);
    }

    fn set_input_surface(&mut self, handle: Option<SurfaceHandle>) {
        self.input = handle;
        self.input_calls.push(handle);
    }

    fn start_running(&mut self) {
        self.running = true;
        self.start_calls += 1;
    }

    fn stop_running(&mut self) {
        self.running = false;
        self.stop_calls += 1;
    }
}

/// Settable wall clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: Cell<u64>,
}

impl ManualClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Cell::new(millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.set(self.millis.get().saturating_add(millis));
    }
}

impl WallClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.get()
    }
}

/// The host's real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_millis(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::SystemTime::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
