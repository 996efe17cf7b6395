#![forbid(unsafe_code)]

//! Software rendering for surfswitch overlays.
//!
//! - [`Canvas`]: the pixel grid a locked surface lends out
//! - [`Rgba`]: colors, hex-string parsable
//! - [`font`]: a 5x7 bitmap font good enough for timestamps
//! - [`paint_marker`]: the per-surface overlay frame

pub mod canvas;
pub mod color;
pub mod font;
pub mod marker;

pub use canvas::Canvas;
pub use color::{ParseColorError, Rgba};
pub use marker::{MarkerLayout, MarkerStyle, paint_marker};
