//! Masked mosaic effect.
//!
//! The padded shape region is averaged block by block on a lattice anchored at
//! the shape's top-left pixel. The averaged patch is clipped to the shape mask
//! and drawn back at the style's opacity. Blocks cut by the image edge average
//! only the pixels that exist.

use image::{Rgba, RgbaImage};
use log::debug;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::raster::{self, PixelRect};
use crate::element::{clamp_alpha, clamp_block_size, RedactionObject, Shape};
use crate::geometry::bounds_of;

const BASE_PADDING: f32 = 2.0;

/// Buffers reused across objects and renders.
///
/// Every use overwrites the full extent it reads, so nothing leaks between calls.
#[derive(Debug)]
pub struct ScratchPool {
    /// Working composition
    pub(crate) canvas: Option<Pixmap>,
    samples: RgbaImage,
    averaged: RgbaImage,
    patch: Option<Pixmap>,
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self {
            canvas: None,
            samples: RgbaImage::new(0, 0),
            averaged: RgbaImage::new(0, 0),
            patch: None,
        }
    }
}

/// Extra pixels sampled around the shape so the stroke edge is never clipped
pub fn pixelate_padding(shape: &Shape) -> f32 {
    match shape {
        Shape::Line(line) => BASE_PADDING.max((line.width / 2.0).ceil() + BASE_PADDING),
        _ => BASE_PADDING,
    }
}

/// Replaces every pixel of `region` in `out` with the mean of its block.
///
/// Blocks are `block`-sized cells of a lattice whose origin is `anchor`; each
/// cell is intersected with `region` and averaged per channel over the
/// intersection only, rounding half up.
pub fn block_average(source: &RgbaImage, region: PixelRect, anchor: (i64, i64), block: u32, out: &mut RgbaImage) {
    let block = i64::from(block.max(1));
    let (left, top) = (i64::from(region.x), i64::from(region.y));
    let (right, bottom) = (i64::from(region.right()), i64::from(region.bottom()));

    let first_column = (left - anchor.0).div_euclid(block);
    let last_column = (right - 1 - anchor.0).div_euclid(block);
    let first_row = (top - anchor.1).div_euclid(block);
    let last_row = (bottom - 1 - anchor.1).div_euclid(block);

    for row in first_row..=last_row {
        let y0 = (anchor.1 + row * block).max(top);
        let y1 = (anchor.1 + (row + 1) * block).min(bottom);

        for column in first_column..=last_column {
            let x0 = (anchor.0 + column * block).max(left);
            let x1 = (anchor.0 + (column + 1) * block).min(right);

            let mut sum = [0u64; 4];
            let mut count = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    let pixel = source.get_pixel(x as u32, y as u32);
                    for (total, value) in sum.iter_mut().zip(pixel.0) {
                        *total += u64::from(value);
                    }
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }

            let mean = Rgba(sum.map(|total| ((total + count / 2) / count) as u8));
            for y in y0..y1 {
                for x in x0..x1 {
                    out.put_pixel((x - left) as u32, (y - top) as u32, mean);
                }
            }
        }
    }
}

/// Pixelates the area under `object` in place. The mosaic is sampled from
/// `canvas` itself, so objects drawn earlier show through.
pub fn apply_pixelate(canvas: &mut Pixmap, object: &RedactionObject, scratch: &mut ScratchPool) {
    let shape_bounds = bounds_of(&object.shape);
    let padded = shape_bounds.expand(pixelate_padding(&object.shape));

    let Some(region) = PixelRect::clamped(padded, canvas.width(), canvas.height()) else {
        debug!("Skipping pixelate for {}: region lies outside the image", object.id);
        return;
    };
    let Some(mask) = raster::shape_mask(&object.shape, object.stroke_width(), region) else {
        debug!("Skipping pixelate for {}: shape has no area", object.id);
        return;
    };

    let block = clamp_block_size(object.style.pixelate.block_size);
    let alpha = clamp_alpha(object.style.pixelate.alpha);
    let anchor = (
        shape_bounds.min.x.floor() as i64 - i64::from(region.x),
        shape_bounds.min.y.floor() as i64 - i64::from(region.y),
    );
    let local = PixelRect {
        x: 0,
        y: 0,
        ..region
    };

    raster::copy_region(canvas, region, &mut scratch.samples);
    raster::resize_rgba(&mut scratch.averaged, region.width, region.height);
    block_average(&scratch.samples, local, anchor, block, &mut scratch.averaged);

    let Some(mut patch) = raster::pixmap_from_rgba(&scratch.averaged, scratch.patch.take()) else {
        return;
    };
    patch.apply_mask(&mask);

    let paint = PixmapPaint {
        opacity: alpha,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Nearest,
    };
    canvas.draw_pixmap(region.x as i32, region.y as i32, patch.as_ref(), &paint, Transform::identity(), None);
    scratch.patch = Some(patch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{factory, StyleParams};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8, 255]))
    }

    fn pixelate_image(image: &mut RgbaImage, object: &RedactionObject) {
        let mut canvas = raster::pixmap_from_rgba(image, None).unwrap();
        apply_pixelate(&mut canvas, object, &mut ScratchPool::default());
        raster::rgba_from_pixmap(&canvas, image);
    }

    fn pixelate_object(shape: Shape, block_size: u32, alpha: f32) -> RedactionObject {
        let mut style = StyleParams::default();
        style.pixelate.block_size = block_size;
        style.pixelate.alpha = alpha;
        factory::create_object(shape, style)
    }

    #[test]
    fn test_uniform_block_keeps_its_color() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([40, 80, 120, 255]));
        let object = pixelate_object(Shape::rect(0.0, 0.0, 20.0, 20.0), 10, 1.0);
        pixelate_image(&mut image, &object);
        assert!(image.pixels().all(|p| *p == Rgba([40, 80, 120, 255])));
    }

    #[test]
    fn test_edge_block_averages_present_pixels_only() {
        // 5 valid columns in the last block: values 20..=24 average to 22
        let source = RgbaImage::from_fn(25, 10, |x, _| Rgba([x as u8, 0, 0, 255]));
        let region = PixelRect { x: 0, y: 0, width: 25, height: 10 };
        let mut out = RgbaImage::new(25, 10);
        block_average(&source, region, (0, 0), 10, &mut out);

        assert_eq!(out.get_pixel(22, 3), &Rgba([22, 0, 0, 255]));
        // Full block 10..=19 averages to 14.5, rounded up
        assert_eq!(out.get_pixel(10, 0), &Rgba([15, 0, 0, 255]));
    }

    #[test]
    fn test_lattice_anchor_is_respected() {
        let source = RgbaImage::from_fn(10, 1, |x, _| Rgba([x as u8 * 10, 0, 0, 255]));
        let region = PixelRect { x: 0, y: 0, width: 10, height: 1 };
        let mut out = RgbaImage::new(10, 1);
        block_average(&source, region, (3, 0), 4, &mut out);

        // Cells: [0,3) [3,7) [7,10)
        assert_eq!(out.get_pixel(0, 0)[0], 10);
        assert_eq!(out.get_pixel(3, 0)[0], 45);
        assert_eq!(out.get_pixel(9, 0)[0], 80);
    }

    #[test]
    fn test_pixels_outside_mask_are_untouched() {
        let original = gradient(60, 60);
        let mut image = original.clone();
        let object = pixelate_object(Shape::ellipse(30.0, 30.0, 20.0, 10.0), 6, 1.0);
        pixelate_image(&mut image, &object);

        assert_eq!(image.get_pixel(0, 0), original.get_pixel(0, 0));
        assert_eq!(image.get_pixel(30, 5), original.get_pixel(30, 5));
        assert_ne!(image, original);
    }

    #[test]
    fn test_region_outside_image_is_skipped() {
        let original = gradient(20, 20);
        let mut image = original.clone();
        let object = pixelate_object(Shape::rect(100.0, 100.0, 20.0, 20.0), 4, 1.0);
        pixelate_image(&mut image, &object);
        assert_eq!(image, original);
    }

    #[test]
    fn test_line_padding_covers_half_width() {
        let line = Shape::line(egui::pos2(0.0, 0.0), egui::pos2(10.0, 0.0), 9.0);
        assert_eq!(pixelate_padding(&line), 7.0);
        assert_eq!(pixelate_padding(&Shape::rect(0.0, 0.0, 4.0, 4.0)), 2.0);
    }
}
