//! Mutable in-memory raster editing for Horizon applications.
//!
//! This crate provides a CPU-side pixel buffer engine: interchangeable
//! pixel storage formats behind one color value, point/shape/region edit
//! operations, flood fill, kernel convolution, snapshot-based undo/redo,
//! and affine resampling (scale and arbitrary-angle rotate).
//!
//! # Getting Started
//!
//! All editing goes through the [`ImageEngine`] facade, which owns the
//! pixel storage and the undo/redo history:
//!
//! ```
//! use horizon_raster::{Color, ImageEngine, PixelFormat};
//!
//! let mut engine = ImageEngine::new(320, 200, PixelFormat::PackedArgb8, Color::WHITE)?;
//! engine.set_history_enabled(true);
//!
//! engine.set_color(Color::RED, 10, 10)?;
//! assert_eq!(engine.buffer().get(10, 10), Color::RED);
//!
//! engine.undo();
//! assert_eq!(engine.buffer().get(10, 10), Color::WHITE);
//! # Ok::<(), horizon_raster::RasterError>(())
//! ```
//!
//! # Shape and Region Edits
//!
//! Shape operations consume point sets from a [`Shape`] implementation and
//! rewrite each point through an injected per-pixel operator. Region fills
//! grow a 4-connected region from a seed pixel:
//!
//! ```
//! use horizon_raster::{Color, ImageEngine, PixelFormat, RectShape};
//!
//! let mut engine = ImageEngine::new(7, 7, PixelFormat::PackedArgb8, Color::WHITE)?;
//!
//! // Outline a rectangle, then flood the outside with red.
//! engine.draw_shape(&RectShape::new(1, 1, 5, 5), |_, _, _| Color::BLACK)?;
//! engine.fill_region(0, 0, |_, _, _| Color::RED, |_, _, _| true)?;
//!
//! assert_eq!(engine.buffer().get(0, 0), Color::RED);
//! assert_eq!(engine.buffer().get(1, 1), Color::BLACK);
//! assert_eq!(engine.buffer().get(3, 3), Color::WHITE);
//! # Ok::<(), horizon_raster::RasterError>(())
//! ```
//!
//! # Convolution and Resampling
//!
//! ```
//! use horizon_raster::{AngleUnit, Color, ImageEngine, Kernel, PixelFormat};
//!
//! let mut engine = ImageEngine::new(16, 16, PixelFormat::Rgba32F, Color::GRAY)?;
//! engine.convolve(&Kernel::box_blur(3)?)?;
//! engine.scale(32, 32)?;
//! engine.rotate(45.0, AngleUnit::Degrees)?;
//! # Ok::<(), horizon_raster::RasterError>(())
//! ```
//!
//! # Threading
//!
//! The engine is synchronous and single-threaded: no operation suspends or
//! blocks, and nothing is shared between instances. Concurrent mutation of
//! one engine must be serialized by the caller.

mod buffer;
mod canvas;
mod codec;
mod color;
mod convolve;
mod engine;
mod error;
mod flood;
mod format;
mod history;
mod resample;
mod shape;

// Core types
pub use buffer::PixelBuffer;
pub use color::Color;
pub use error::{RasterError, RasterResult};
pub use format::PixelFormat;

// Editing facade and history
pub use engine::ImageEngine;
pub use history::{ChangeHistory, DEFAULT_MAX_SNAPSHOTS};

// Algorithms
pub use convolve::{convolve, select_targets, Kernel};
pub use flood::flood_fill;
pub use resample::{rotate, scale, AngleUnit};

// Shape and drawing interop
pub use canvas::Canvas;
pub use shape::{
    boundary_complement_points, boundary_points, complement_points, interior_points, EllipseShape,
    RectShape, Region, Shape,
};

// File interop
pub use codec::{decode, encode, load, save, OutputFormat};
