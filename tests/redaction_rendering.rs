use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use eframe_redact::element::{factory, FreehandGeometry, RedactionMode, RedactionObject, Shape, StyleParams};
use eframe_redact::geometry::{bounds_of, resize_by_handle, ResizeHandle};
use eframe_redact::image_model::ImageModel;
use eframe_redact::renderer::{compose, export_raster, Compositor};
use eframe_redact::{Document, RenderKind};
use egui::{pos2, Pos2};
use image::{Rgba, RgbaImage};

/// Deterministic, non-uniform test pattern
fn pattern(width: u32, height: u32) -> ImageModel {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 + y * 3) as u8, (x * x + y) as u8, (y * 11) as u8, 255])
    });
    ImageModel::from_image(pixels, "pattern.png").unwrap()
}

fn pixelate(shape: Shape, block_size: u32, alpha: f32) -> RedactionObject {
    let mut style = StyleParams::default();
    style.mode = RedactionMode::Pixelate;
    style.pixelate.block_size = block_size;
    style.pixelate.alpha = alpha;
    factory::create_object(shape, style)
}

/// Per-channel mean over a pixel box, rounding half up
fn mean(pixels: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> Rgba<u8> {
    let mut sums = [0u32; 4];
    let mut count = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = pixels.get_pixel(x, y);
            for channel in 0..4 {
                sums[channel] += u32::from(pixel[channel]);
            }
            count += 1;
        }
    }
    Rgba(sums.map(|sum| ((sum + count / 2) / count) as u8))
}

#[test]
fn test_pixelate_produces_uniform_block_means() {
    let image = pattern(100, 100);
    let object = pixelate(Shape::rect(0.0, 0.0, 100.0, 100.0), 10, 1.0);
    let output = compose(&image, &[object]);

    for by in 0..10 {
        for bx in 0..10 {
            let (x0, y0) = (bx * 10, by * 10);
            let expected = mean(image.pixels(), x0, y0, x0 + 10, y0 + 10);
            for y in y0..y0 + 10 {
                for x in x0..x0 + 10 {
                    assert_eq!(*output.get_pixel(x, y), expected, "block ({bx}, {by}) at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn test_interior_pixelate_blocks_follow_shape_lattice() {
    let image = pattern(200, 200);
    let object = pixelate(Shape::rect(13.0, 17.0, 100.0, 100.0), 10, 1.0);
    let output = compose(&image, &[object]);

    for by in 0..10 {
        for bx in 0..10 {
            let (x0, y0) = (13 + bx * 10, 17 + by * 10);
            let expected = mean(image.pixels(), x0, y0, x0 + 10, y0 + 10);
            for y in y0..y0 + 10 {
                for x in x0..x0 + 10 {
                    assert_eq!(*output.get_pixel(x, y), expected, "block ({bx}, {by}) at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn test_padding_ring_outside_mask_is_untouched() {
    let image = pattern(200, 200);
    let object = pixelate(Shape::rect(13.0, 17.0, 100.0, 100.0), 10, 1.0);
    let output = compose(&image, &[object]);

    // Columns and rows sampled as padding but outside the rect
    for y in 15..119 {
        for x in [11, 12, 113, 114] {
            assert_eq!(output.get_pixel(x, y), image.pixels().get_pixel(x, y), "({x}, {y})");
        }
    }
    for x in 11..115 {
        for y in [15, 16, 117, 118] {
            assert_eq!(output.get_pixel(x, y), image.pixels().get_pixel(x, y), "({x}, {y})");
        }
    }
}

#[test]
fn test_large_mark_shapes_compose_quickly() {
    let image = pattern(1000, 1000);
    let mut style = StyleParams::default();
    style.mode = RedactionMode::Mark;

    let ellipse = factory::create_object(Shape::ellipse(500.0, 500.0, 480.0, 480.0), style.clone());
    let points: Vec<Pos2> = (0..1500)
        .map(|step| {
            let angle = step as f32 / 1500.0 * TAU;
            let radius = 400.0 + 40.0 * (angle * 9.0).sin();
            pos2(500.0 + radius * angle.cos(), 500.0 + radius * angle.sin())
        })
        .collect();
    let freehand = factory::create_object(Shape::Freehand(FreehandGeometry { points, closed: true }), style);

    let started = Instant::now();
    let output = compose(&image, &[ellipse, freehand]);
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(2), "compose took {elapsed:?}");
    assert_eq!(*output.get_pixel(980, 500), Rgba([0xff, 0x3b, 0x30, 255]));
    assert_eq!(output.get_pixel(500, 500), image.pixels().get_pixel(500, 500));
}

#[test]
fn test_edge_block_averages_only_existing_pixels() {
    let image = pattern(25, 10);
    let object = pixelate(Shape::rect(0.0, 0.0, 25.0, 10.0), 10, 1.0);
    let output = compose(&image, &[object]);

    let expected = mean(image.pixels(), 20, 0, 25, 10);
    assert_eq!(*output.get_pixel(20, 0), expected);
    assert_eq!(*output.get_pixel(24, 9), expected);
}

#[test]
fn test_export_matches_base_surface() {
    let image = pattern(64, 48).into_ref();
    let mut fill = StyleParams::default();
    fill.mode = RedactionMode::Fill;
    let objects = vec![
        pixelate(Shape::ellipse(20.0, 20.0, 15.0, 10.0), 6, 0.8),
        factory::create_object(Shape::line(pos2(0.0, 40.0), pos2(60.0, 5.0), 4.0), fill),
    ];

    let mut document = Document::with_image(image.clone());
    document.objects = objects.clone();
    let mut compositor = Compositor::new();
    compositor.render(RenderKind::Full, &document);

    let png = export_raster(&image, &objects).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(&decoded, compositor.base().pixels());
}

#[test]
fn test_pixelate_alpha_blends_with_original() {
    let image = pattern(20, 20);
    let object = pixelate(Shape::rect(0.0, 0.0, 20.0, 20.0), 20, 0.5);
    let output = compose(&image, &[object]);
    let average = mean(image.pixels(), 0, 0, 20, 20);
    let original = image.pixels().get_pixel(3, 3);
    let blended = output.get_pixel(3, 3);

    // One step of slack for 8-bit blending
    for channel in 0..3 {
        let low = original[channel].min(average[channel]).saturating_sub(1);
        let high = original[channel].max(average[channel]).saturating_add(1);
        assert!((low..=high).contains(&blended[channel]));
    }
    assert_eq!(blended[3], 255);
}

#[test]
fn test_resize_never_collapses_below_minimum() {
    let shape = Shape::rect(10.0, 10.0, 50.0, 50.0);
    for (handle, point) in [
        (ResizeHandle::Se, pos2(-100.0, -100.0)),
        (ResizeHandle::Nw, pos2(500.0, 500.0)),
        (ResizeHandle::E, pos2(10.0, 30.0)),
        (ResizeHandle::N, pos2(30.0, 60.0)),
    ] {
        let bounds = bounds_of(&resize_by_handle(&shape, handle, point));
        assert!(bounds.width() >= 2.0, "{handle:?} width {}", bounds.width());
        assert!(bounds.height() >= 2.0, "{handle:?} height {}", bounds.height());
    }
}
