//! Drawing interop: a mutable surface view over the live buffer.
//!
//! [`Canvas`] is handed to an injected callback by
//! [`ImageEngine::render_onto`](crate::ImageEngine::render_onto) so external
//! drawing code can rasterize directly into the storage the engine owns,
//! inside one history bracket.

use crate::buffer::PixelBuffer;
use crate::color::Color;

/// A borrowed drawable view over a pixel buffer.
///
/// All access follows the buffer's bounds contract: reads outside the
/// resolution return the sentinel color, writes are silent no-ops, so
/// primitives never need to clip explicitly.
pub struct Canvas<'a> {
    buffer: &'a mut PixelBuffer,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer }
    }

    /// Get the surface width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the surface height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Read the pixel at `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.buffer.get(x, y)
    }

    /// Write the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, color: Color, x: i32, y: i32) {
        self.buffer.set(color, x, y);
    }

    /// Fill an axis-aligned rectangle given by its top-left corner and size.
    pub fn fill_rect(&mut self, color: Color, x: i32, y: i32, width: u32, height: u32) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.buffer.set(color, x + dx, y + dy);
            }
        }
    }

    /// Draw a straight line segment between two points (Bresenham).
    pub fn draw_line(&mut self, color: Color, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.buffer.set(color, x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}
