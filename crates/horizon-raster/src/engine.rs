//! The image editing facade.
//!
//! [`ImageEngine`] composes a [`PixelBuffer`] with a [`ChangeHistory`] and
//! exposes the public editing surface: point, shape, and region edits,
//! convolution, flips, resampling, drawing interop, and file codec
//! delegation. Every public edit operation brackets its body in exactly one
//! history begin/end pair, so each call is one undo/redo unit regardless of
//! how many pixels it touches.
//!
//! # Example
//!
//! ```
//! use horizon_raster::{Color, ImageEngine, Kernel, PixelFormat, RectShape};
//!
//! let mut engine = ImageEngine::new(8, 8, PixelFormat::PackedArgb8, Color::WHITE)?;
//! engine.set_history_enabled(true);
//!
//! // One bracket per call: the whole outline is a single undo unit.
//! engine.draw_shape(&RectShape::new(0, 0, 7, 7), |_, _, _| Color::BLACK)?;
//! engine.convolve(&Kernel::box_blur(3)?)?;
//!
//! assert!(engine.undo()); // un-blur
//! assert!(engine.undo()); // un-draw
//! assert_eq!(engine.buffer().get(0, 0), Color::WHITE);
//! # Ok::<(), horizon_raster::RasterError>(())
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::buffer::PixelBuffer;
use crate::canvas::Canvas;
use crate::codec::{self, OutputFormat};
use crate::color::Color;
use crate::convolve::{self, Kernel};
use crate::error::{RasterError, RasterResult};
use crate::flood;
use crate::format::PixelFormat;
use crate::history::ChangeHistory;
use crate::resample::{self, AngleUnit};
use crate::shape::{
    boundary_complement_points, boundary_points, complement_points, interior_points, Region, Shape,
};

/// A mutable raster image with transactional editing.
///
/// The engine exclusively owns its pixel storage; [`Clone`] produces a
/// fully independent copy. It is synchronous and single-threaded: every
/// operation runs to completion on the calling thread, and callers needing
/// concurrent access must serialize externally.
#[derive(Debug, Clone)]
pub struct ImageEngine {
    buffer: PixelBuffer,
    history: ChangeHistory,
}

impl ImageEngine {
    /// Create an engine over a new buffer filled with `color`.
    ///
    /// Fails with [`RasterError::InvalidDimensions`] if either dimension is
    /// zero or the pixel count overflows.
    pub fn new(width: u32, height: u32, format: PixelFormat, color: Color) -> RasterResult<Self> {
        let buffer = PixelBuffer::filled(width, height, format, color)?;
        info!(width, height, ?format, "created image engine");
        Ok(Self::from_buffer(buffer))
    }

    /// Create an engine over an existing buffer.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            history: ChangeHistory::new(),
        }
    }

    /// Decode an image file into a new engine.
    pub fn load(path: impl AsRef<Path>, format: PixelFormat) -> RasterResult<Self> {
        Ok(Self::from_buffer(codec::load(path, format)?))
    }

    /// Get the buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get the buffer's storage format.
    pub fn format(&self) -> PixelFormat {
        self.buffer.format()
    }

    /// Read access to the underlying buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    /// Enable or disable undo/redo recording. Both directions discard all
    /// existing snapshots.
    pub fn set_history_enabled(&mut self, enabled: bool) {
        self.history.set_enabled(enabled);
    }

    /// Whether undo/redo recording is active.
    pub fn history_enabled(&self) -> bool {
        self.history.is_enabled()
    }

    /// Revert the most recent edit operation. Returns whether an undo
    /// occurred.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.buffer)
    }

    /// Reapply the most recently undone operation. Returns whether a redo
    /// occurred.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.buffer)
    }

    /// Run one bracketed edit against the buffer.
    fn edit<T>(&mut self, f: impl FnOnce(&mut PixelBuffer) -> RasterResult<T>) -> RasterResult<T> {
        self.history.begin(&self.buffer);
        let result = f(&mut self.buffer);
        self.history.end();
        result
    }

    // ========================================================================
    // POINT EDITS
    // ========================================================================

    /// Set a single pixel. Out of bounds is a no-op, still one undo unit.
    pub fn set_color(&mut self, color: Color, x: i32, y: i32) -> RasterResult<()> {
        self.edit(|buffer| {
            buffer.set(color, x, y);
            Ok(())
        })
    }

    /// Set a single pixel by flat index. Out of range is a no-op.
    pub fn set_color_at(&mut self, color: Color, index: usize) -> RasterResult<()> {
        self.edit(|buffer| {
            buffer.set_index(color, index);
            Ok(())
        })
    }

    // ========================================================================
    // SHAPE EDITS
    // ========================================================================

    /// Rewrite every pixel in the shape's interior through `operator`.
    ///
    /// Returns the number of pixels written.
    pub fn fill_shape<O>(&mut self, shape: &dyn Shape, operator: O) -> RasterResult<usize>
    where
        O: FnMut(Color, i32, i32) -> Color,
    {
        let region = Region::of_buffer(&self.buffer);
        self.edit(|buffer| apply_operator(buffer, interior_points(shape, region), operator))
    }

    /// Rewrite every pixel of the buffer *not* covered by the shape.
    pub fn fill_shape_complement<O>(
        &mut self,
        shape: &dyn Shape,
        operator: O,
    ) -> RasterResult<usize>
    where
        O: FnMut(Color, i32, i32) -> Color,
    {
        let region = Region::of_buffer(&self.buffer);
        self.edit(|buffer| apply_operator(buffer, complement_points(shape, region), operator))
    }

    /// Rewrite every pixel on the shape's boundary through `operator`.
    pub fn draw_shape<O>(&mut self, shape: &dyn Shape, operator: O) -> RasterResult<usize>
    where
        O: FnMut(Color, i32, i32) -> Color,
    {
        let region = Region::of_buffer(&self.buffer);
        self.edit(|buffer| apply_operator(buffer, boundary_points(shape, region), operator))
    }

    /// Rewrite every pixel of the buffer *not* on the shape's boundary.
    pub fn draw_shape_complement<O>(
        &mut self,
        shape: &dyn Shape,
        operator: O,
    ) -> RasterResult<usize>
    where
        O: FnMut(Color, i32, i32) -> Color,
    {
        let region = Region::of_buffer(&self.buffer);
        self.edit(|buffer| {
            apply_operator(buffer, boundary_complement_points(shape, region), operator)
        })
    }

    // ========================================================================
    // REGION EDITS
    // ========================================================================

    /// Flood-fill the region 4-connected to `(x, y)`.
    ///
    /// `filter` decides which visited pixels are rewritten; `operator`
    /// produces the replacement color. Returns the number of pixels
    /// written. See [`flood_fill`](crate::flood_fill) for the full
    /// contract.
    pub fn fill_region<O, F>(
        &mut self,
        x: i32,
        y: i32,
        operator: O,
        filter: F,
    ) -> RasterResult<usize>
    where
        O: FnMut(Color, i32, i32) -> Color,
        F: FnMut(Color, i32, i32) -> bool,
    {
        let written = self.edit(|buffer| flood::flood_fill(buffer, x, y, operator, filter))?;
        debug!(x, y, written, "flood fill");
        Ok(written)
    }

    // ========================================================================
    // CONVOLUTION
    // ========================================================================

    /// Convolve the whole buffer with `kernel`.
    pub fn convolve(&mut self, kernel: &Kernel) -> RasterResult<()> {
        self.convolve_where(kernel, |_, _, _| true)
    }

    /// Convolve the pixels accepted by `filter`.
    ///
    /// The filter runs once per pixel over the original buffer before any
    /// mutation; the selected target set is then convolved against a
    /// read-only copy, so results are independent of visitation order.
    pub fn convolve_where<F>(&mut self, kernel: &Kernel, filter: F) -> RasterResult<()>
    where
        F: FnMut(Color, i32, i32) -> bool,
    {
        let targets = convolve::select_targets(&self.buffer, filter);
        debug!(
            kernel_width = kernel.width(),
            kernel_height = kernel.height(),
            targets = targets.len(),
            "convolve"
        );
        self.edit(|buffer| convolve::convolve(buffer, kernel, &targets))
    }

    // ========================================================================
    // GEOMETRY
    // ========================================================================

    /// Mirror the image along the vertical axis.
    pub fn flip_horizontal(&mut self) -> RasterResult<()> {
        self.edit(|buffer| {
            buffer.flip_horizontal();
            Ok(())
        })
    }

    /// Mirror the image along the horizontal axis.
    pub fn flip_vertical(&mut self) -> RasterResult<()> {
        self.edit(|buffer| {
            buffer.flip_vertical();
            Ok(())
        })
    }

    /// Resample the image to a new resolution.
    ///
    /// Invalid target dimensions leave the image unchanged and record no
    /// undo unit.
    pub fn scale(&mut self, new_width: u32, new_height: u32) -> RasterResult<()> {
        if new_width == 0
            || new_height == 0
            || (new_width as usize)
                .checked_mul(new_height as usize)
                .is_none()
        {
            debug!(new_width, new_height, "ignoring scale to invalid dimensions");
            return Ok(());
        }
        debug!(new_width, new_height, "scale");
        self.edit(|buffer| {
            resample::scale(buffer, new_width, new_height);
            Ok(())
        })
    }

    /// Rotate the image about its center.
    ///
    /// A non-finite angle leaves the image unchanged and records no undo
    /// unit.
    pub fn rotate(&mut self, angle: f64, unit: AngleUnit) -> RasterResult<()> {
        let radians = match unit {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        };
        if !radians.is_finite() {
            debug!(angle, "ignoring rotation by non-finite angle");
            return Ok(());
        }
        debug!(angle, ?unit, "rotate");
        self.edit(|buffer| {
            resample::rotate(buffer, angle, unit);
            Ok(())
        })
    }

    // ========================================================================
    // DRAWING INTEROP
    // ========================================================================

    /// Expose the live buffer as a drawable surface to `callback`.
    ///
    /// External drawing primitives rasterize directly into the storage the
    /// engine owns; the whole callback is one undo unit.
    pub fn render_onto<T>(&mut self, callback: impl FnOnce(&mut Canvas<'_>) -> T) -> T {
        self.history.begin(&self.buffer);
        let out = callback(&mut Canvas::new(&mut self.buffer));
        self.history.end();
        out
    }

    // ========================================================================
    // FILE INTEROP
    // ========================================================================

    /// Encode the image to bytes in the given format.
    pub fn encode(&self, format: OutputFormat, opaque: bool) -> RasterResult<Vec<u8>> {
        codec::encode(&self.buffer, format, opaque)
    }

    /// Encode the image and write it to a file.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        format: OutputFormat,
        opaque: bool,
    ) -> RasterResult<()> {
        codec::save(&self.buffer, path, format, opaque)
    }
}

/// Read-modify-write a point sequence through a per-pixel operator.
///
/// Aborts with [`RasterError::InvalidOperatorResult`] on the first
/// non-finite result; pixels already written remain written.
fn apply_operator<O>(
    buffer: &mut PixelBuffer,
    points: impl Iterator<Item = (i32, i32)>,
    mut operator: O,
) -> RasterResult<usize>
where
    O: FnMut(Color, i32, i32) -> Color,
{
    let mut written = 0usize;
    for (x, y) in points {
        let next = operator(buffer.get(x, y), x, y);
        if !next.is_finite() {
            return Err(RasterError::InvalidOperatorResult { x, y });
        }
        buffer.set(next, x, y);
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::RectShape;

    fn engine(width: u32, height: u32, color: Color) -> ImageEngine {
        ImageEngine::new(width, height, PixelFormat::Rgba64F, color).unwrap()
    }

    #[test]
    fn test_set_color_is_one_undo_unit() {
        let mut engine = engine(3, 3, Color::WHITE);
        engine.set_history_enabled(true);

        engine.set_color(Color::RED, 1, 1).unwrap();
        assert_eq!(engine.buffer().get(1, 1), Color::RED);
        assert!(engine.undo());
        assert_eq!(engine.buffer().get(1, 1), Color::WHITE);
    }

    #[test]
    fn test_fill_shape_and_complement_partition_buffer() {
        let mut engine = engine(4, 4, Color::WHITE);
        let rect = RectShape::new(0, 0, 1, 1);

        let inside = engine.fill_shape(&rect, |_, _, _| Color::RED).unwrap();
        let outside = engine
            .fill_shape_complement(&rect, |_, _, _| Color::BLUE)
            .unwrap();
        assert_eq!(inside + outside, 16);
        assert_eq!(engine.buffer().get(0, 0), Color::RED);
        assert_eq!(engine.buffer().get(3, 3), Color::BLUE);
    }

    #[test]
    fn test_draw_shape_complement_spares_boundary() {
        let mut engine = engine(3, 3, Color::WHITE);
        let rect = RectShape::new(0, 0, 2, 2);

        engine
            .draw_shape_complement(&rect, |_, _, _| Color::RED)
            .unwrap();
        // Only the center cell is off the rect's boundary.
        assert_eq!(engine.buffer().get(1, 1), Color::RED);
        assert_eq!(engine.buffer().get(0, 0), Color::WHITE);
        assert_eq!(engine.buffer().get(2, 1), Color::WHITE);
    }

    #[test]
    fn test_operator_abort_leaves_partial_writes() {
        let mut engine = engine(3, 1, Color::WHITE);
        let rect = RectShape::new(0, 0, 2, 0);
        let mut calls = 0usize;

        let result = engine.fill_shape(&rect, |_, _, _| {
            calls += 1;
            if calls == 3 {
                Color::new(f64::NAN, 0.0, 0.0, 1.0)
            } else {
                Color::RED
            }
        });

        assert!(matches!(
            result,
            Err(RasterError::InvalidOperatorResult { x: 2, y: 0 })
        ));
        assert_eq!(engine.buffer().get(0, 0), Color::RED);
        assert_eq!(engine.buffer().get(1, 0), Color::RED);
        assert_eq!(engine.buffer().get(2, 0), Color::WHITE);
    }

    #[test]
    fn test_failed_edit_still_undoable() {
        let mut engine = engine(3, 1, Color::WHITE);
        engine.set_history_enabled(true);
        let rect = RectShape::new(0, 0, 2, 0);
        let mut calls = 0usize;

        let _ = engine.fill_shape(&rect, |_, _, _| {
            calls += 1;
            if calls == 2 {
                Color::new(f64::NAN, 0.0, 0.0, 1.0)
            } else {
                Color::RED
            }
        });

        // The bracket opened before the abort, so the partial write can be
        // rolled back by the caller.
        assert!(engine.undo());
        assert_eq!(engine.buffer().get(0, 0), Color::WHITE);
    }

    #[test]
    fn test_flips_are_undoable() {
        let mut engine = engine(3, 1, Color::WHITE);
        engine.set_history_enabled(true);
        engine.set_color(Color::RED, 0, 0).unwrap();

        engine.flip_horizontal().unwrap();
        assert_eq!(engine.buffer().get(2, 0), Color::RED);
        assert!(engine.undo());
        assert_eq!(engine.buffer().get(0, 0), Color::RED);
    }

    #[test]
    fn test_scale_undo_restores_resolution() {
        let mut engine = engine(4, 4, Color::WHITE);
        engine.set_history_enabled(true);

        engine.scale(8, 8).unwrap();
        assert_eq!(engine.width(), 8);
        assert!(engine.undo());
        assert_eq!(engine.width(), 4);
        assert_eq!(engine.height(), 4);
    }

    #[test]
    fn test_invalid_scale_records_no_undo_unit() {
        let mut engine = engine(4, 4, Color::WHITE);
        engine.set_history_enabled(true);

        engine.scale(0, 9).unwrap();
        assert_eq!(engine.width(), 4);
        assert!(!engine.undo());
    }

    #[test]
    fn test_render_onto_is_one_undo_unit() {
        let mut engine = engine(4, 4, Color::WHITE);
        engine.set_history_enabled(true);

        engine.render_onto(|canvas| {
            canvas.draw_line(Color::BLACK, 0, 0, 3, 3);
            canvas.set_pixel(Color::RED, 0, 3);
        });
        assert_eq!(engine.buffer().get(2, 2), Color::BLACK);
        assert_eq!(engine.buffer().get(0, 3), Color::RED);

        assert!(engine.undo());
        assert_eq!(engine.buffer().get(2, 2), Color::WHITE);
        assert_eq!(engine.buffer().get(0, 3), Color::WHITE);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut engine = engine(2, 2, Color::WHITE);
        let copy = engine.clone();
        engine.set_color(Color::RED, 0, 0).unwrap();
        assert_eq!(copy.buffer().get(0, 0), Color::WHITE);
    }
}
