#![forbid(unsafe_code)]
#![doc = "Boundary traits for surfswitch: platform surfaces, the refresh signal, time, and the native renderer."]
#![doc = ""]
#![doc = "The runtime never touches a platform API directly. Surfaces are locked and posted"]
#![doc = "through [`SurfaceHost`], refresh callbacks are requested through [`FrameScheduler`],"]
#![doc = "timestamps come from [`WallClock`], and the native pixel-transform engine sits"]
#![doc = "behind [`RendererFacade`]."]

use core::fmt;
use std::path::{Path, PathBuf};

use surfswitch_core::surface::SurfaceHandle;
use surfswitch_render::canvas::Canvas;

/// Where the renderer loads shaders and other assets from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource {
    root: PathBuf,
}

impl AssetSource {
    /// Asset source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the asset tree.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

/// Wall-clock time used for overlay timestamps.
pub trait WallClock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Drawable side of platform surfaces.
///
/// Locking hands out an exclusive [`Canvas`]; posting returns it for display.
/// Either step may fail when the surface was revoked underneath the caller.
pub trait SurfaceHost {
    /// Platform-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// Acquire the drawable target for `handle`.
    fn lock_canvas(&mut self, handle: SurfaceHandle) -> Result<Canvas, Self::Error>;

    /// Release the target and publish it for display.
    fn unlock_canvas_and_post(
        &mut self,
        handle: SurfaceHandle,
        canvas: Canvas,
    ) -> Result<(), Self::Error>;
}

/// The display refresh signal.
///
/// A posted callback fires once, on the next refresh. Anything that wants to
/// run every frame has to post again from inside its callback.
pub trait FrameScheduler {
    /// Request one callback on the next refresh.
    fn post_frame_callback(&mut self);
}

/// The native pixel-transform engine.
///
/// `None` input means "pause consuming input"; it is never an error. The
/// engine may read the selected input out of band and must tolerate it being
/// swapped to `None` at any time.
pub trait RendererFacade {
    /// Capability probe. Queried once at setup, no side effects.
    fn is_supported(&self) -> bool;

    /// Supply the resource-loading context.
    fn set_asset_source(&mut self, source: AssetSource);

    /// Where composited frames are presented.
    fn set_output_surface(&mut self, handle: Option<SurfaceHandle>);

    /// Which surface is consumed as source content.
    fn set_input_surface(&mut self, handle: Option<SurfaceHandle>);

    fn start_running(&mut self);

    fn stop_running(&mut self);
}

impl<T: RendererFacade + ?Sized> RendererFacade for Box<T> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn set_asset_source(&mut self, source: AssetSource) {
        (**self).set_asset_source(source);
    }

    fn set_output_surface(&mut self, handle: Option<SurfaceHandle>) {
        (**self).set_output_surface(handle);
    }

    fn set_input_surface(&mut self, handle: Option<SurfaceHandle>) {
        (**self).set_input_surface(handle);
    }

    fn start_running(&mut self) {
        (**self).start_running();
    }

    fn stop_running(&mut self) {
        (**self).stop_running();
    }
}
