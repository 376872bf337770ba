//! The mutable pixel buffer at the heart of the engine.
//!
//! [`PixelBuffer`] owns a resolution and one contiguous array of pixel
//! records in a single [`PixelFormat`]. All access goes through [`Color`]
//! values decoded at the boundary; the storage precision never leaks into
//! the editing API.
//!
//! # Bounds contract
//!
//! Reads outside the resolution return the format's fixed sentinel color
//! (opaque black for 3-channel formats, transparent for 4-channel formats)
//! instead of failing. Writes outside the resolution are silent no-ops.
//! Out-of-bounds coordinates are never errors anywhere in the engine.
//!
//! # Example
//!
//! ```
//! use horizon_raster::{Color, PixelBuffer, PixelFormat};
//!
//! let mut buffer = PixelBuffer::filled(4, 4, PixelFormat::Rgba32F, Color::WHITE)?;
//! buffer.set(Color::RED, 1, 2);
//! assert_eq!(buffer.get(1, 2), Color::RED);
//! assert_eq!(buffer.get(-1, 0), Color::TRANSPARENT);
//! # Ok::<(), horizon_raster::RasterError>(())
//! ```

use crate::color::Color;
use crate::error::{RasterError, RasterResult};
use crate::format::PixelFormat;

/// One contiguous array of pixel records in a fixed format.
///
/// Precision lives here; every variant decodes to and from [`Color`] at the
/// access boundary.
#[derive(Debug, Clone, PartialEq)]
enum PixelStorage {
    PackedArgb8(Vec<u32>),
    Rgb32F(Vec<[f32; 3]>),
    Rgb64F(Vec<[f64; 3]>),
    Rgba32F(Vec<[f32; 4]>),
    Rgba64F(Vec<[f64; 4]>),
}

impl PixelStorage {
    fn filled(format: PixelFormat, len: usize, color: Color) -> Self {
        match format {
            PixelFormat::PackedArgb8 => Self::PackedArgb8(vec![color.to_argb8_word(); len]),
            PixelFormat::Rgb32F => {
                Self::Rgb32F(vec![[color.r as f32, color.g as f32, color.b as f32]; len])
            }
            PixelFormat::Rgb64F => Self::Rgb64F(vec![[color.r, color.g, color.b]; len]),
            PixelFormat::Rgba32F => Self::Rgba32F(vec![
                [
                    color.r as f32,
                    color.g as f32,
                    color.b as f32,
                    color.a as f32
                ];
                len
            ]),
            PixelFormat::Rgba64F => Self::Rgba64F(vec![[color.r, color.g, color.b, color.a]; len]),
        }
    }

    fn format(&self) -> PixelFormat {
        match self {
            Self::PackedArgb8(_) => PixelFormat::PackedArgb8,
            Self::Rgb32F(_) => PixelFormat::Rgb32F,
            Self::Rgb64F(_) => PixelFormat::Rgb64F,
            Self::Rgba32F(_) => PixelFormat::Rgba32F,
            Self::Rgba64F(_) => PixelFormat::Rgba64F,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::PackedArgb8(v) => v.len(),
            Self::Rgb32F(v) => v.len(),
            Self::Rgb64F(v) => v.len(),
            Self::Rgba32F(v) => v.len(),
            Self::Rgba64F(v) => v.len(),
        }
    }

    /// Decode the record at `i`. Caller guarantees `i` is in range.
    fn get(&self, i: usize) -> Color {
        match self {
            Self::PackedArgb8(v) => Color::from_argb8_word(v[i]),
            Self::Rgb32F(v) => {
                let [r, g, b] = v[i];
                Color::from_rgb(r as f64, g as f64, b as f64)
            }
            Self::Rgb64F(v) => {
                let [r, g, b] = v[i];
                Color::from_rgb(r, g, b)
            }
            Self::Rgba32F(v) => {
                let [r, g, b, a] = v[i];
                Color::new(r as f64, g as f64, b as f64, a as f64)
            }
            Self::Rgba64F(v) => {
                let [r, g, b, a] = v[i];
                Color::new(r, g, b, a)
            }
        }
    }

    /// Encode `color` into the record at `i`. Caller guarantees `i` is in
    /// range. 3-channel variants drop alpha.
    fn set(&mut self, i: usize, color: Color) {
        match self {
            Self::PackedArgb8(v) => v[i] = color.to_argb8_word(),
            Self::Rgb32F(v) => v[i] = [color.r as f32, color.g as f32, color.b as f32],
            Self::Rgb64F(v) => v[i] = [color.r, color.g, color.b],
            Self::Rgba32F(v) => {
                v[i] = [
                    color.r as f32,
                    color.g as f32,
                    color.b as f32,
                    color.a as f32,
                ]
            }
            Self::Rgba64F(v) => v[i] = [color.r, color.g, color.b, color.a],
        }
    }

    /// Exchange the raw records at `i` and `j` without decoding.
    fn swap(&mut self, i: usize, j: usize) {
        match self {
            Self::PackedArgb8(v) => v.swap(i, j),
            Self::Rgb32F(v) => v.swap(i, j),
            Self::Rgb64F(v) => v.swap(i, j),
            Self::Rgba32F(v) => v.swap(i, j),
            Self::Rgba64F(v) => v.swap(i, j),
        }
    }
}

/// A mutable in-memory raster with one fixed storage format.
///
/// The buffer has value semantics: [`Clone`] produces an independent deep
/// copy with its own storage, never an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    storage: PixelStorage,
}

impl PixelBuffer {
    /// Create a buffer of `width` x `height` pixels filled with `color`.
    ///
    /// Fails with [`RasterError::InvalidDimensions`] before any allocation
    /// if either dimension is zero or the pixel count overflows.
    pub fn filled(
        width: u32,
        height: u32,
        format: PixelFormat,
        color: Color,
    ) -> RasterResult<Self> {
        let len = Self::checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            storage: PixelStorage::filled(format, len, color),
        })
    }

    fn checked_len(width: u32, height: u32) -> RasterResult<usize> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(RasterError::InvalidDimensions { width, height })
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the storage format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.storage.format()
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.storage.len()
    }

    /// The fixed color returned for out-of-bounds reads on this buffer.
    #[inline]
    pub fn sentinel(&self) -> Color {
        self.format().sentinel()
    }

    /// Whether `(x, y)` lies inside the resolution.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Flat index of an in-bounds coordinate: `y * width + x`.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the color at `(x, y)`, or the sentinel when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Color {
        if self.contains(x, y) {
            self.storage.get(self.index_of(x, y))
        } else {
            self.sentinel()
        }
    }

    /// Get the color at a flat index, or the sentinel when out of range.
    pub fn get_index(&self, index: usize) -> Color {
        if index < self.storage.len() {
            self.storage.get(index)
        } else {
            self.sentinel()
        }
    }

    /// Set the color at `(x, y)`. Out of bounds is a silent no-op.
    ///
    /// 3-channel formats store the color opaque, dropping alpha.
    pub fn set(&mut self, color: Color, x: i32, y: i32) {
        if self.contains(x, y) {
            let index = self.index_of(x, y);
            self.storage.set(index, color);
        }
    }

    /// Set the color at a flat index. Out of range is a silent no-op.
    pub fn set_index(&mut self, color: Color, index: usize) {
        if index < self.storage.len() {
            self.storage.set(index, color);
        }
    }

    /// Exchange the raw pixel records at two flat indices.
    ///
    /// Bypasses color decoding entirely, O(1). Out-of-range indices are a
    /// no-op.
    pub fn swap(&mut self, i: usize, j: usize) {
        if i < self.storage.len() && j < self.storage.len() && i != j {
            self.storage.swap(i, j);
        }
    }

    /// Sample the buffer at real-valued coordinates.
    ///
    /// When both `x` and `y` are mathematical integers this is exactly
    /// `get(x as i32, y as i32)`. Otherwise the four neighboring cells are
    /// read (each under the bounds contract) and blended bilinearly.
    pub fn sample(&self, x: f64, y: f64) -> Color {
        if x.fract() == 0.0 && y.fract() == 0.0 {
            return self.get(x as i32, y as i32);
        }
        let x0f = x.floor();
        let y0f = y.floor();
        let tx = x - x0f;
        let ty = y - y0f;
        let x0 = x0f as i32;
        let y0 = y0f as i32;

        let c00 = self.get(x0, y0);
        let c10 = self.get(x0 + 1, y0);
        let c01 = self.get(x0, y0 + 1);
        let c11 = self.get(x0 + 1, y0 + 1);

        c00.lerp(c10, tx).lerp(c01.lerp(c11, tx), ty)
    }

    /// Replace this buffer wholesale with another one.
    ///
    /// Resolution, format, and storage are all taken from `other`. This is
    /// the only way a buffer's format changes after construction.
    pub fn replace(&mut self, other: PixelBuffer) {
        *self = other;
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        for i in 0..self.storage.len() {
            self.storage.set(i, color);
        }
    }

    /// Mirror the buffer along the vertical axis using raw record swaps.
    pub fn flip_horizontal(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        for y in 0..h {
            let row = y * w;
            for x in 0..w / 2 {
                self.storage.swap(row + x, row + (w - 1 - x));
            }
        }
    }

    /// Mirror the buffer along the horizontal axis using raw record swaps.
    pub fn flip_vertical(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        for y in 0..h / 2 {
            let top = y * w;
            let bottom = (h - 1 - y) * w;
            for x in 0..w {
                self.storage.swap(top + x, bottom + x);
            }
        }
    }
}
