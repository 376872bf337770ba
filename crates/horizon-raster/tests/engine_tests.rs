//! Integration tests for the editing facade.
//!
//! These exercise whole edit operations end to end: shape drawing, flood
//! fills bounded by drawn outlines, convolution at buffer edges, resampling,
//! and the undo/redo bracketing around each of them.

use horizon_raster::{
    AngleUnit, Color, ImageEngine, Kernel, PixelFormat, RectShape, Shape,
};

const MID_GRAY: Color = Color::from_rgb(0.5, 0.5, 0.5);

fn engine(width: u32, height: u32, color: Color) -> ImageEngine {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    ImageEngine::new(width, height, PixelFormat::Rgba64F, color).unwrap()
}

#[test]
fn blur_on_tiny_buffer_pulls_every_pixel_off_gray() {
    // On a 2x2 buffer every 3x3 tap ring reaches out of bounds, so the
    // edge-clamped sentinel drags all four pixels away from mid-gray.
    let mut engine = engine(2, 2, MID_GRAY);
    engine.convolve(&Kernel::box_blur(3).unwrap()).unwrap();

    for y in 0..2 {
        for x in 0..2 {
            let c = engine.buffer().get(x, y);
            assert!(
                (c.r - 0.5).abs() > 1e-9,
                "pixel ({x}, {y}) still mid-gray: {c:?}"
            );
        }
    }
}

#[test]
fn rectangle_outline_draw_and_undo() {
    let mut engine = engine(3, 3, Color::WHITE);
    engine.set_history_enabled(true);

    let rect = RectShape::new(0, 0, 2, 2);
    let written = engine.draw_shape(&rect, |_, _, _| Color::BLACK).unwrap();
    assert_eq!(written, 8);

    for i in 0..9 {
        let expected = if i == 4 { Color::WHITE } else { Color::BLACK };
        assert_eq!(engine.buffer().get_index(i), expected, "cell {i}");
    }

    assert!(engine.undo());
    for i in 0..9 {
        assert_eq!(engine.buffer().get_index(i), Color::WHITE, "cell {i}");
    }
}

#[test]
fn region_fill_stops_at_drawn_outline() {
    let mut engine = engine(7, 7, Color::WHITE);
    let outline = RectShape::new(1, 1, 5, 5);
    engine.draw_shape(&outline, |_, _, _| Color::BLACK).unwrap();

    let written = engine
        .fill_region(0, 0, |_, _, _| Color::RED, |_, _, _| true)
        .unwrap();

    // The fill floods exactly the 24-cell ring outside the outline.
    assert_eq!(written, 24);
    for y in 0..7 {
        for x in 0..7 {
            let c = engine.buffer().get(x, y);
            let on_ring = x == 0 || x == 6 || y == 0 || y == 6;
            let on_outline = outline.on_boundary(x, y);
            if on_ring {
                assert_eq!(c, Color::RED, "ring cell ({x}, {y})");
            } else if on_outline {
                assert_eq!(c, Color::BLACK, "outline cell ({x}, {y})");
            } else {
                assert_eq!(c, Color::WHITE, "interior cell ({x}, {y})");
            }
        }
    }
}

#[test]
fn region_fill_on_uniform_buffer_rewrites_everything() {
    let mut engine = engine(7, 7, Color::WHITE);
    let written = engine
        .fill_region(0, 0, |_, _, _| Color::RED, |_, _, _| true)
        .unwrap();

    assert_eq!(written, 49);
    for i in 0..49 {
        assert_eq!(engine.buffer().get_index(i), Color::RED, "cell {i}");
    }
}

#[test]
fn undo_redo_restore_bit_identical_states() {
    let mut engine = engine(5, 5, Color::WHITE);
    engine.set_history_enabled(true);

    let pristine = engine.buffer().clone();
    engine
        .fill_shape(&RectShape::new(1, 1, 3, 3), |_, _, _| Color::BLUE)
        .unwrap();
    let mutated = engine.buffer().clone();

    assert!(engine.undo());
    assert_eq!(engine.buffer(), &pristine);
    assert!(engine.redo());
    assert_eq!(engine.buffer(), &mutated);
}

#[test]
fn each_operation_is_exactly_one_undo_unit() {
    let mut engine = engine(4, 4, Color::WHITE);
    engine.set_history_enabled(true);

    engine.set_color(Color::RED, 0, 0).unwrap();
    engine
        .fill_shape(&RectShape::new(2, 2, 3, 3), |_, _, _| Color::BLUE)
        .unwrap();
    engine.flip_vertical().unwrap();

    // Three operations, three undo steps, then nothing.
    assert!(engine.undo());
    assert!(engine.undo());
    assert!(engine.undo());
    assert!(!engine.undo());
    assert_eq!(engine.buffer().get(0, 0), Color::WHITE);
}

#[test]
fn rotate_identity_preserves_resolution_and_values() {
    let mut engine = engine(6, 4, Color::WHITE);
    engine.set_color(Color::RED, 2, 1).unwrap();
    let before = engine.buffer().clone();

    engine.rotate(0.0, AngleUnit::Degrees).unwrap();
    assert_eq!(engine.buffer(), &before);
}

#[test]
fn resample_round_trip_is_undoable_across_formats() {
    for format in [
        PixelFormat::PackedArgb8,
        PixelFormat::Rgb32F,
        PixelFormat::Rgba32F,
    ] {
        let mut engine = ImageEngine::new(4, 4, format, Color::WHITE).unwrap();
        engine.set_history_enabled(true);
        let before = engine.buffer().clone();

        engine.scale(9, 3).unwrap();
        engine.rotate(30.0, AngleUnit::Degrees).unwrap();
        assert_ne!(engine.width(), 4);

        assert!(engine.undo());
        assert!(engine.undo());
        assert_eq!(engine.buffer(), &before, "{format:?}");
    }
}

#[test]
fn convolve_filtered_only_touches_selected_pixels() {
    let mut engine = engine(5, 5, Color::WHITE);
    engine.set_color(Color::BLACK, 2, 2).unwrap();

    // Only convolve the left half of the buffer.
    engine
        .convolve_where(&Kernel::box_blur(3).unwrap(), |_, x, _| x < 2)
        .unwrap();

    // The untouched right half keeps its original values exactly.
    assert_eq!(engine.buffer().get(4, 4), Color::WHITE);
    assert_eq!(engine.buffer().get(2, 2), Color::BLACK);
    // The left edge blended with the sentinel.
    assert!(engine.buffer().get(0, 0).a < 1.0);
}
