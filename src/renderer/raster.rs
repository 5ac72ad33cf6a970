//! Shape rasterization on tiny-skia pixmaps, plus conversion between the
//! premultiplied pixmaps and the straight-alpha `image` buffers used elsewhere.

use egui::{Color32, Rect};
use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, FillRule, IntSize, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::element::Shape;
use crate::geometry::bounds_of;

/// Integer pixel rectangle inside a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Snaps `rect` outwards to whole pixels and clips it to a `width`×`height`
    /// raster. Returns `None` when less than one pixel remains.
    pub fn clamped(rect: Rect, width: u32, height: u32) -> Option<Self> {
        let clip = |value: f32, max: u32| value.clamp(0.0, max as f32) as u32;

        let min_x = clip(rect.min.x.floor(), width);
        let min_y = clip(rect.min.y.floor(), height);
        let max_x = clip(rect.max.x.ceil(), width);
        let max_y = clip(rect.max.y.ceil(), height);

        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Round caps and joins, as lines are drawn
fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn solid_paint(color: Color32, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), 255);
    paint.anti_alias = anti_alias;
    paint
}

/// The outline of a shape in image space
pub fn path_of(shape: &Shape) -> Option<Path> {
    match shape {
        Shape::Rect(_) => {
            let bounds = bounds_of(shape);
            tiny_skia::Rect::from_ltrb(bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y)
                .map(PathBuilder::from_rect)
        }
        Shape::Ellipse(ellipse) => tiny_skia::Rect::from_xywh(
            ellipse.cx - ellipse.rx,
            ellipse.cy - ellipse.ry,
            ellipse.rx * 2.0,
            ellipse.ry * 2.0,
        )
        .and_then(PathBuilder::from_oval),
        Shape::Line(line) => {
            let mut builder = PathBuilder::new();
            builder.move_to(line.from.x, line.from.y);
            builder.line_to(line.to.x, line.to.y);
            builder.finish()
        }
        Shape::Freehand(freehand) => {
            let (first, rest) = freehand.points.split_first()?;
            let mut builder = PathBuilder::new();
            builder.move_to(first.x, first.y);
            for point in rest {
                builder.line_to(point.x, point.y);
            }
            if freehand.closed {
                builder.close();
            }
            builder.finish()
        }
    }
}

/// The area a shape covers when filled or pixelated: its interior, or a
/// round-capped band `line_width` wide for lines.
pub fn coverage_path(shape: &Shape, line_width: f32) -> Option<Path> {
    let path = path_of(shape)?;
    match shape {
        Shape::Line(_) => path.stroke(&round_stroke(line_width), 1.0),
        _ => Some(path),
    }
}

/// Binary mask of the shape's coverage over `region`, in region-local pixels
pub fn shape_mask(shape: &Shape, line_width: f32, region: PixelRect) -> Option<Mask> {
    let path = coverage_path(shape, line_width)?;
    let mut mask = Mask::new(region.width, region.height)?;
    let offset = Transform::from_translate(-(region.x as f32), -(region.y as f32));
    mask.fill_path(&path, FillRule::Winding, false, offset);
    Some(mask)
}

/// Paints the shape's coverage opaquely. Edges are not anti-aliased so nothing
/// of the original shows through.
pub fn fill_shape(pixmap: &mut Pixmap, shape: &Shape, line_width: f32, color: Color32) {
    let Some(path) = coverage_path(shape, line_width) else {
        return;
    };
    pixmap.fill_path(&path, &solid_paint(color, false), FillRule::Winding, Transform::identity(), None);
}

/// Strokes the shape's outline
pub fn stroke_shape(pixmap: &mut Pixmap, shape: &Shape, width: f32, color: Color32) {
    let Some(path) = path_of(shape) else {
        return;
    };
    pixmap.stroke_path(&path, &solid_paint(color, true), &round_stroke(width), Transform::identity(), None);
}

/// Premultiplies `source` into a pixmap, reusing the allocation of `reuse`
pub fn pixmap_from_rgba(source: &RgbaImage, reuse: Option<Pixmap>) -> Option<Pixmap> {
    let size = IntSize::from_wh(source.width(), source.height())?;
    let mut data = reuse.map(Pixmap::take).unwrap_or_default();
    data.clear();
    data.reserve(source.as_raw().len());

    for pixel in source.pixels() {
        let [r, g, b, a] = pixel.0;
        let color = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

/// Demultiplies `region` of `pixmap` into `out`, which is resized to the region
pub fn copy_region(pixmap: &Pixmap, region: PixelRect, out: &mut RgbaImage) {
    resize_rgba(out, region.width, region.height);
    let stride = pixmap.width() as usize;
    let pixels = pixmap.pixels();

    for (j, row) in out.rows_mut().enumerate() {
        let start = (region.y as usize + j) * stride + region.x as usize;
        for (target, source) in row.zip(&pixels[start..start + region.width as usize]) {
            let color = source.demultiply();
            *target = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
    }
}

/// Demultiplies the whole pixmap into `out`
pub fn rgba_from_pixmap(pixmap: &Pixmap, out: &mut RgbaImage) {
    let region = PixelRect {
        x: 0,
        y: 0,
        width: pixmap.width(),
        height: pixmap.height(),
    };
    copy_region(pixmap, region, out);
}

/// Gives `buffer` the requested size, reusing its allocation. Contents are
/// unspecified afterwards.
pub fn resize_rgba(buffer: &mut RgbaImage, width: u32, height: u32) {
    if buffer.dimensions() == (width, height) {
        return;
    }
    let mut raw = std::mem::replace(buffer, RgbaImage::new(0, 0)).into_raw();
    raw.clear();
    raw.resize(width as usize * height as usize * 4, 0);
    *buffer = RgbaImage::from_raw(width, height, raw).unwrap_or_else(|| RgbaImage::new(width, height));
}
