//! File interop for pixel buffers.
//!
//! Encoding and decoding of raster file formats is delegated to the
//! `image` crate; this module only moves pixel data between a
//! [`PixelBuffer`] and the codec's raw byte layout. An `opaque` flag on the
//! encode paths selects 3- versus 4-channel output.
//!
//! All failures surface as structured [`RasterError::Codec`] /
//! [`RasterError::Io`] values; there are no boolean success paths.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat as ImgFormat, RgbImage, RgbaImage};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{RasterError, RasterResult};
use crate::format::PixelFormat;

/// Output format for image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy, 3-channel only; encode with `opaque = true`).
    Jpeg,
    /// BMP format.
    Bmp,
    /// TIFF format.
    Tiff,
}

impl OutputFormat {
    fn to_image_format(self) -> ImgFormat {
        match self {
            OutputFormat::Png => ImgFormat::Png,
            OutputFormat::Jpeg => ImgFormat::Jpeg,
            OutputFormat::Bmp => ImgFormat::Bmp,
            OutputFormat::Tiff => ImgFormat::Tiff,
        }
    }
}

/// Encode the buffer to bytes in the given format.
///
/// With `opaque` set the alpha channel is dropped and a 3-channel image is
/// produced; otherwise all four channels are written.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat, opaque: bool) -> RasterResult<Vec<u8>> {
    let img = to_dynamic_image(buffer, opaque)?;
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format.to_image_format())
        .map_err(|e| RasterError::Codec(format!("failed to encode image: {e}")))?;
    Ok(cursor.into_inner())
}

/// Encode the buffer and write it to a file.
pub fn save(
    buffer: &PixelBuffer,
    path: impl AsRef<Path>,
    format: OutputFormat,
    opaque: bool,
) -> RasterResult<()> {
    let img = to_dynamic_image(buffer, opaque)?;
    img.save_with_format(path.as_ref(), format.to_image_format())
        .map_err(|e| RasterError::Codec(format!("failed to save image: {e}")))?;
    debug!(path = %path.as_ref().display(), ?format, opaque, "saved buffer");
    Ok(())
}

/// Decode an image file into a buffer with the given storage format.
pub fn load(path: impl AsRef<Path>, format: PixelFormat) -> RasterResult<PixelBuffer> {
    let img = image::open(path.as_ref())
        .map_err(|e| RasterError::Codec(format!("failed to decode image: {e}")))?;
    let buffer = from_dynamic_image(&img, format)?;
    debug!(
        path = %path.as_ref().display(),
        width = buffer.width(),
        height = buffer.height(),
        "loaded buffer"
    );
    Ok(buffer)
}

/// Decode in-memory image bytes into a buffer with the given storage format.
pub fn decode(bytes: &[u8], format: PixelFormat) -> RasterResult<PixelBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| RasterError::Codec(format!("failed to decode image: {e}")))?;
    from_dynamic_image(&img, format)
}

fn to_dynamic_image(buffer: &PixelBuffer, opaque: bool) -> RasterResult<DynamicImage> {
    let (width, height) = (buffer.width(), buffer.height());
    if opaque {
        let mut bytes = Vec::with_capacity(buffer.pixel_count() * 3);
        for i in 0..buffer.pixel_count() {
            let [r, g, b, _] = buffer.get_index(i).to_rgba8();
            bytes.extend_from_slice(&[r, g, b]);
        }
        let img = RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| RasterError::Codec("pixel data does not match resolution".into()))?;
        Ok(DynamicImage::ImageRgb8(img))
    } else {
        let mut bytes = Vec::with_capacity(buffer.pixel_count() * 4);
        for i in 0..buffer.pixel_count() {
            bytes.extend_from_slice(&buffer.get_index(i).to_rgba8());
        }
        let img = RgbaImage::from_raw(width, height, bytes)
            .ok_or_else(|| RasterError::Codec("pixel data does not match resolution".into()))?;
        Ok(DynamicImage::ImageRgba8(img))
    }
}

fn from_dynamic_image(img: &DynamicImage, format: PixelFormat) -> RasterResult<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut buffer = PixelBuffer::filled(width, height, format, format.sentinel())?;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        buffer.set(Color::from_rgba8(r, g, b, a), x as i32, y as i32);
    }
    Ok(buffer)
}
