#![forbid(unsafe_code)]

//! The overlay marker: a colored square with a live timestamp under it.
//!
//! Each input surface gets its own marker color so an operator watching the
//! renderer output can tell which source is being consumed.

use surfswitch_core::geometry::{Rect, Size};

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::font;

/// Appearance of one overlay marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerStyle {
    /// Fill for the whole canvas before the marker is drawn.
    pub background: Rgba,
    /// Marker square and text color.
    pub color: Rgba,
    /// Marker square dimensions, anchored at the canvas origin.
    pub marker_size: Size,
    /// Timestamp glyph height in pixels.
    pub text_size: u32,
}

impl MarkerStyle {
    pub const DEFAULT_MARKER_SIZE: Size = Size::new(100, 100);
    pub const DEFAULT_TEXT_SIZE: u32 = 30;

    /// Default style on a white background with the given marker color.
    #[must_use]
    pub const fn with_color(color: Rgba) -> Self {
        Self {
            background: Rgba::WHITE,
            color,
            marker_size: Self::DEFAULT_MARKER_SIZE,
            text_size: Self::DEFAULT_TEXT_SIZE,
        }
    }
}

/// Where a painted marker landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLayout {
    pub marker: Rect,
    pub text: Rect,
}

/// Paint one overlay frame: clear, marker square, then the timestamp with its
/// top edge on the marker's bottom edge.
pub fn paint_marker(canvas: &mut Canvas, style: &MarkerStyle, timestamp_millis: u64) -> MarkerLayout {
    canvas.clear(style.background);
    let marker = Rect::from_size(style.marker_size);
    canvas.fill_rect(marker, style.color);
    let label = timestamp_millis.to_string();
    let text = font::draw_text(
        canvas,
        marker.x,
        marker.bottom(),
        &label,
        style.color,
        style.text_size,
    );
    MarkerLayout { marker, text }
}
