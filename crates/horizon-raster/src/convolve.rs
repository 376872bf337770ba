//! Kernel convolution over a pixel buffer.
//!
//! A convolution pass reads from a read-only copy of the buffer taken
//! before the pass begins and writes into the live buffer, so no pixel's
//! newly convolved value leaks into a neighbor's computation. The result is
//! therefore independent of visitation order. Taps that fall outside the
//! buffer contribute the format's sentinel color, an edge-clamp-to-
//! background policy.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{RasterError, RasterResult};

/// A convolution kernel: a `width` x `height` grid of weights anchored at
/// its center cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: u32,
    height: u32,
    weights: Vec<f64>,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidArgument`] when either dimension is zero, the
    /// weight count does not equal `width * height`, or any weight is
    /// non-finite.
    pub fn new(width: u32, height: u32, weights: Vec<f64>) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidArgument(
                "kernel dimensions must be at least 1x1",
            ));
        }
        if weights.len() != width as usize * height as usize {
            return Err(RasterError::InvalidArgument(
                "kernel weight count must equal width * height",
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(RasterError::InvalidArgument(
                "kernel weights must be finite",
            ));
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// The 1x1 identity kernel.
    pub fn identity() -> Self {
        Self {
            width: 1,
            height: 1,
            weights: vec![1.0],
        }
    }

    /// A `size` x `size` uniform box-blur kernel.
    pub fn box_blur(size: u32) -> RasterResult<Self> {
        Self::new(size, size, vec![1.0; size as usize * size as usize])
    }

    /// Get the kernel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Offset of the anchor (center) cell.
    fn anchor(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }

    fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Evaluate `filter` once per pixel over the original buffer and collect
/// the flat indices it accepts.
///
/// An accept-all filter yields the identity index range; anything else
/// yields a compacted subset.
pub fn select_targets<F>(buffer: &PixelBuffer, mut filter: F) -> Vec<usize>
where
    F: FnMut(Color, i32, i32) -> bool,
{
    let width = buffer.width() as usize;
    (0..buffer.pixel_count())
        .filter(|&i| {
            let x = (i % width) as i32;
            let y = (i / width) as i32;
            filter(buffer.get_index(i), x, y)
        })
        .collect()
}

/// Convolve the buffer with `kernel`, writing only the pixels in `targets`.
///
/// `targets` is a precomputed index set (see [`select_targets`]); indices
/// out of range are skipped. The accumulated sum is divided by the kernel's
/// weight sum when that sum is non-zero.
///
/// # Errors
///
/// [`RasterError::InvalidOperatorResult`] when an accumulated color is
/// non-finite; pixels already written remain written.
pub fn convolve(buffer: &mut PixelBuffer, kernel: &Kernel, targets: &[usize]) -> RasterResult<()> {
    // All reads come from the pre-pass state.
    let source = buffer.clone();
    let width = source.width() as usize;
    let (anchor_x, anchor_y) = kernel.anchor();
    let norm = kernel.weight_sum();

    for &index in targets {
        if index >= source.pixel_count() {
            continue;
        }
        let x = (index % width) as i32;
        let y = (index / width) as i32;

        let mut acc = [0.0f64; 4];
        for ky in 0..kernel.height() as i32 {
            for kx in 0..kernel.width() as i32 {
                let weight = kernel.weights()[(ky * kernel.width() as i32 + kx) as usize];
                let tap = source.get(x + kx - anchor_x, y + ky - anchor_y);
                acc[0] += weight * tap.r;
                acc[1] += weight * tap.g;
                acc[2] += weight * tap.b;
                acc[3] += weight * tap.a;
            }
        }

        let color = if norm != 0.0 {
            Color::new(acc[0] / norm, acc[1] / norm, acc[2] / norm, acc[3] / norm)
        } else {
            Color::new(acc[0], acc[1], acc[2], acc[3])
        };
        if !color.is_finite() {
            return Err(RasterError::InvalidOperatorResult { x, y });
        }
        buffer.set(color, x, y);
    }

    Ok(())
}
