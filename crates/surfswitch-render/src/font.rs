#![forbid(unsafe_code)]

//! 5x7 bitmap font for timestamp text.
//!
//! Only digits, `-`, `:` and space have real glyphs; anything else renders as
//! a hollow box so unexpected input stays visible. Glyphs are scaled by an
//! integer factor derived from the requested text size.

use surfswitch_core::geometry::{Rect, Size};

use crate::canvas::Canvas;
use crate::color::Rgba;

/// Glyph width in font units.
pub const GLYPH_COLS: u32 = 5;
/// Glyph height in font units.
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance in font units (glyph plus one column of spacing).
pub const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

type Glyph = [u8; GLYPH_ROWS as usize];

const BOX: Glyph = [
    0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
];

fn glyph(ch: char) -> Glyph {
    match ch {
        '0' => [
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ],
        '1' => [
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ],
        '2' => [
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ],
        '3' => [
            0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110,
        ],
        '4' => [
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ],
        '5' => [
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ],
        '6' => [
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ],
        '7' => [
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ],
        '8' => [
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ],
        '9' => [
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        ':' => [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0],
        ' ' => [0; GLYPH_ROWS as usize],
        _ => BOX,
    }
}

/// Integer scale factor for a text size given in pixels.
///
/// The text size is the rendered glyph height; it is rounded down to a
/// multiple of [`GLYPH_ROWS`], never below one font unit per pixel.
#[inline]
#[must_use]
pub const fn scale_for(text_size: u32) -> u32 {
    let scale = text_size / GLYPH_ROWS;
    if scale == 0 { 1 } else { scale }
}

/// Pixel extent of `text` at `text_size`.
#[must_use]
pub fn text_extent(text: &str, text_size: u32) -> Size {
    let scale = scale_for(text_size);
    let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if count == 0 {
        return Size::new(0, 0);
    }
    let width = count
        .saturating_mul(GLYPH_ADVANCE)
        .saturating_sub(1)
        .saturating_mul(scale);
    Size::new(width, GLYPH_ROWS.saturating_mul(scale))
}

/// Draw `text` with its top-left corner at (x, y).
///
/// Returns the rectangle the text occupies (before clipping).
pub fn draw_text(canvas: &mut Canvas, x: u32, y: u32, text: &str, color: Rgba, text_size: u32) -> Rect {
    let scale = scale_for(text_size);
    let mut pen_x = x;
    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) != 0 {
                    let px = pen_x.saturating_add(col.saturating_mul(scale));
                    let py = y.saturating_add((row as u32).saturating_mul(scale));
                    canvas.fill_rect(Rect::new(px, py, scale, scale), color);
                }
            }
        }
        pen_x = pen_x.saturating_add(GLYPH_ADVANCE.saturating_mul(scale));
    }
    let extent = text_extent(text, text_size);
    Rect::new(x, y, extent.width, extent.height)
}
