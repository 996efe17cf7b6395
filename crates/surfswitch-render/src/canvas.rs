#![forbid(unsafe_code)]

//! Canvas = pixel grid handed out by a locked surface.
//!
//! A surface host lends a [`Canvas`] when a surface is locked and takes it
//! back when the surface is posted. All drawing clips to the canvas bounds;
//! out-of-range writes are dropped rather than reported.
//!
//! ```
//! use surfswitch_core::{Rect, Size};
//! use surfswitch_render::{Canvas, Rgba};
//!
//! let mut canvas = Canvas::new(Size::new(64, 64));
//! canvas.clear(Rgba::WHITE);
//! canvas.fill_rect(Rect::new(0, 0, 16, 16), Rgba::RED);
//! assert_eq!(canvas.get(3, 3), Some(Rgba::RED));
//! assert_eq!(canvas.get(20, 3), Some(Rgba::WHITE));
//! ```

use surfswitch_core::geometry::{Rect, Size};

use crate::color::Rgba;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(size: Size) -> Self {
        let len = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; len],
        }
    }

    /// Canvas dimensions.
    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The whole canvas as a rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Raw pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Ignored when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill `rect`, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(clip) = rect.intersection(&self.bounds()) else {
            return;
        };
        let width = self.size.width as usize;
        for y in clip.y..clip.bottom() {
            let row = y as usize * width;
            self.pixels[row + clip.x as usize..row + clip.right() as usize].fill(color);
        }
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Number of pixels equal to `color` inside `rect`.
    pub fn count_in(&self, rect: Rect, color: Rgba) -> usize {
        let Some(clip) = rect.intersection(&self.bounds()) else {
            return 0;
        };
        (clip.y..clip.bottom())
            .flat_map(|y| (clip.x..clip.right()).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y) == Some(color))
            .count()
    }
}
