//! 4-connected flood fill.
//!
//! Region growth starts at a seed pixel and spreads through the
//! up/down/left/right neighbors whose color equals the seed's original
//! color. The boundary test always compares against that fixed original
//! value, never against colors rewritten earlier in the same call, and the
//! traversal is iterative so stack depth is bounded by the pixel count.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{RasterError, RasterResult};

/// Flood-fill the region connected to `(start_x, start_y)`.
///
/// Every visited pixel is passed to `filter`; when it accepts, the pixel is
/// rewritten with the result of `operator`. Region growth is independent of
/// the filter: neighbors are followed whenever their pre-fill color equals
/// the seed's original color.
///
/// Returns the number of pixels written. An out-of-bounds seed is a no-op.
///
/// # Errors
///
/// [`RasterError::InvalidOperatorResult`] when `operator` returns a color
/// with a non-finite component; pixels already written remain written.
pub fn flood_fill<O, F>(
    buffer: &mut PixelBuffer,
    start_x: i32,
    start_y: i32,
    mut operator: O,
    mut filter: F,
) -> RasterResult<usize>
where
    O: FnMut(Color, i32, i32) -> Color,
    F: FnMut(Color, i32, i32) -> bool,
{
    if !buffer.contains(start_x, start_y) {
        return Ok(0);
    }

    // The fill boundary is defined by the seed color as it was before any
    // mutation in this call.
    let target = buffer.get(start_x, start_y);

    let mut visited = vec![false; buffer.pixel_count()];
    let mut stack = Vec::new();
    visited[buffer.index_of(start_x, start_y)] = true;
    stack.push((start_x, start_y));

    let mut written = 0usize;
    while let Some((cx, cy)) = stack.pop() {
        let current = buffer.get(cx, cy);
        if filter(current, cx, cy) {
            let next = operator(current, cx, cy);
            if !next.is_finite() {
                return Err(RasterError::InvalidOperatorResult { x: cx, y: cy });
            }
            buffer.set(next, cx, cy);
            written += 1;
        }

        for (nx, ny) in [(cx - 1, cy), (cx + 1, cy), (cx, cy - 1), (cx, cy + 1)] {
            if !buffer.contains(nx, ny) {
                continue;
            }
            let index = buffer.index_of(nx, ny);
            // Marking on push keeps each pixel in the stack at most once,
            // and a visited pixel is exactly a written-or-pending one, so
            // the color test below never sees a rewritten value.
            if !visited[index] && buffer.get(nx, ny) == target {
                visited[index] = true;
                stack.push((nx, ny));
            }
        }
    }

    Ok(written)
}
