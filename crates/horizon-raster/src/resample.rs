//! Geometric resampling: scale and arbitrary-angle rotation.
//!
//! Both operations inverse-map each destination pixel center into source
//! space and bilinearly sample the original buffer, then replace the buffer
//! atomically. Destination pixels that map outside the source rectangle
//! receive the format's sentinel color.

use glam::DVec2;

use crate::buffer::PixelBuffer;

/// Unit of a rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// Tolerance absorbed before rounding a rotated extent up to whole pixels,
/// so exact multiples of 360 degrees reproduce the original resolution.
const EXTENT_EPSILON: f64 = 1e-9;

/// Resample the buffer to `new_width` x `new_height`.
///
/// Each destination pixel center is inverse-mapped into source space
/// (`src = (dst + 0.5) * old / new - 0.5`) and bilinearly sampled. A zero
/// dimension or an overflowing pixel count leaves the buffer unchanged.
pub fn scale(buffer: &mut PixelBuffer, new_width: u32, new_height: u32) {
    if new_width == 0 || new_height == 0 {
        return;
    }
    if (new_width as usize).checked_mul(new_height as usize).is_none() {
        return;
    }
    let Ok(mut dst) = PixelBuffer::filled(new_width, new_height, buffer.format(), buffer.sentinel())
    else {
        return;
    };

    let ratio_x = buffer.width() as f64 / new_width as f64;
    let ratio_y = buffer.height() as f64 / new_height as f64;
    for y in 0..new_height {
        for x in 0..new_width {
            let src_x = (x as f64 + 0.5) * ratio_x - 0.5;
            let src_y = (y as f64 + 0.5) * ratio_y - 0.5;
            dst.set(buffer.sample(src_x, src_y), x as i32, y as i32);
        }
    }
    buffer.replace(dst);
}

/// Rotate the buffer about its center.
///
/// The new resolution is the axis-aligned bounding box of the four source
/// corners after rotation, rounded up to whole pixels; an exact 0 (or 360)
/// degree rotation reproduces the original resolution. Each destination
/// pixel center is inverse-rotated into source space and sampled;
/// locations outside the source rectangle receive the sentinel color.
/// Rotations that are not a multiple of 90 degrees blend edge pixels with
/// the sentinel, which shows up as resampling blur.
///
/// A non-finite angle leaves the buffer unchanged.
pub fn rotate(buffer: &mut PixelBuffer, angle: f64, unit: AngleUnit) {
    let radians = match unit {
        AngleUnit::Degrees => angle.to_radians(),
        AngleUnit::Radians => angle,
    };
    if !radians.is_finite() {
        return;
    }
    let (sin, cos) = radians.sin_cos();

    let src_half = DVec2::new(buffer.width() as f64, buffer.height() as f64) * 0.5;
    let rotate_fwd = |p: DVec2| DVec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);

    // Bounding box of the source corners rotated about the image center.
    let corners = [
        DVec2::new(0.0, 0.0),
        DVec2::new(buffer.width() as f64, 0.0),
        DVec2::new(0.0, buffer.height() as f64),
        DVec2::new(buffer.width() as f64, buffer.height() as f64),
    ]
    .map(|c| rotate_fwd(c - src_half));
    let min = corners[0].min(corners[1]).min(corners[2]).min(corners[3]);
    let max = corners[0].max(corners[1]).max(corners[2]).max(corners[3]);
    let extent = max - min;

    let new_width = ((extent.x - EXTENT_EPSILON).ceil().max(1.0)) as u32;
    let new_height = ((extent.y - EXTENT_EPSILON).ceil().max(1.0)) as u32;
    let Ok(mut dst) = PixelBuffer::filled(new_width, new_height, buffer.format(), buffer.sentinel())
    else {
        return;
    };

    let dst_half = DVec2::new(new_width as f64, new_height as f64) * 0.5;
    for y in 0..new_height {
        for x in 0..new_width {
            let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - dst_half;
            // Inverse rotation back into source space.
            let src = DVec2::new(p.x * cos + p.y * sin, -p.x * sin + p.y * cos) + src_half;
            dst.set(
                buffer.sample(src.x - 0.5, src.y - 0.5),
                x as i32,
                y as i32,
            );
        }
    }
    buffer.replace(dst);
}
