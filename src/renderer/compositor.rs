use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use log::{debug, info};

use super::pixelate::{self, ScratchPool};
use super::raster;
use super::schedule::RenderKind;
use crate::document::Document;
use crate::element::{RedactionMode, RedactionObject};
use crate::error::ExportError;
use crate::image_model::ImageModel;

/// A raster plus a version number that changes whenever its pixels do
#[derive(Debug)]
pub struct Surface {
    pixels: RgbaImage,
    version: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
            version: 0,
        }
    }
}

impl Surface {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn clear(&mut self) {
        if !self.is_empty() {
            self.pixels = RgbaImage::new(0, 0);
            self.touch();
        }
    }
}

/// Composites every visible object onto `target` in z-order.
///
/// `target` is resized to the image and fully overwritten.
pub fn compose_into(target: &mut RgbaImage, image: &ImageModel, objects: &[RedactionObject], scratch: &mut ScratchPool) {
    let source = image.pixels();
    let mut visible = objects.iter().filter(|object| object.visible).peekable();

    let canvas = match visible.peek() {
        Some(_) => raster::pixmap_from_rgba(source, scratch.canvas.take()),
        None => None,
    };
    let Some(mut canvas) = canvas else {
        if target.dimensions() == source.dimensions() {
            let raw: &mut [u8] = target;
            raw.copy_from_slice(source);
        } else {
            *target = source.clone();
        }
        return;
    };

    for object in visible {
        match object.style.mode {
            RedactionMode::Pixelate => pixelate::apply_pixelate(&mut canvas, object, scratch),
            RedactionMode::Fill => {
                raster::fill_shape(&mut canvas, &object.shape, object.stroke_width(), object.style.fill_color());
            }
            RedactionMode::Mark => {
                raster::stroke_shape(&mut canvas, &object.shape, object.stroke_width(), object.style.mark_color());
            }
        }
    }

    raster::rgba_from_pixmap(&canvas, target);
    scratch.canvas = Some(canvas);
}

/// The redacted image at native resolution
pub fn compose(image: &ImageModel, objects: &[RedactionObject]) -> RgbaImage {
    let mut target = RgbaImage::new(0, 0);
    compose_into(&mut target, image, objects, &mut ScratchPool::default());
    target
}

/// Encodes a composited raster as PNG
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    pixels.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Composites at 1:1 and encodes losslessly
pub fn export_raster(image: &ImageModel, objects: &[RedactionObject]) -> Result<Vec<u8>, ExportError> {
    let composed = compose(image, objects);
    let bytes = encode_png(&composed)?;
    info!("Exported {}x{} image ({} bytes)", composed.width(), composed.height(), bytes.len());
    Ok(bytes)
}

/// Owns the base surface and the scratch buffers shared by renders.
///
/// The base surface holds the composition at image resolution; the canvas scales
/// it with the viewport transform at draw time. Selection and draft indicators
/// are not part of it and are painted separately every frame.
#[derive(Debug, Default)]
pub struct Compositor {
    base: Surface,
    scratch: ScratchPool,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&self) -> &Surface {
        &self.base
    }

    /// Recomposites the base surface when `kind` asks for it. Without an image the
    /// surface is cleared and nothing else happens.
    pub fn render(&mut self, kind: RenderKind, document: &Document) {
        let Some(image) = document.image.as_deref() else {
            self.base.clear();
            return;
        };

        if kind == RenderKind::Full || self.base.is_empty() {
            self.render_base(image, &document.objects);
        }
    }

    pub fn render_base(&mut self, image: &ImageModel, objects: &[RedactionObject]) {
        compose_into(&mut self.base.pixels, image, objects, &mut self.scratch);
        self.base.touch();
        debug!("Base surface v{} composed from {} objects", self.base.version, objects.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{factory, Shape, StyleParams};
    use image::Rgba;

    fn image(width: u32, height: u32) -> ImageModel {
        let pixels = RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 3) as u8, (y * 5) as u8, 90, 255]));
        ImageModel::from_image(pixels, "test.png").unwrap()
    }

    fn styled(shape: Shape, mode: RedactionMode) -> RedactionObject {
        let mut style = StyleParams::default();
        style.mode = mode;
        factory::create_object(shape, style)
    }

    #[test]
    fn test_fill_replaces_pixels() {
        let image = image(40, 40);
        let object = styled(Shape::rect(10.0, 10.0, 10.0, 10.0), RedactionMode::Fill);
        let composed = compose(&image, &[object]);

        assert_eq!(*composed.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
        assert_eq!(composed.get_pixel(5, 5), image.pixels().get_pixel(5, 5));
    }

    #[test]
    fn test_mark_strokes_outline_only() {
        let image = image(60, 60);
        let object = styled(Shape::rect(10.0, 10.0, 40.0, 40.0), RedactionMode::Mark);
        let composed = compose(&image, &[object]);

        assert_eq!(*composed.get_pixel(10, 30), Rgba([0xff, 0x3b, 0x30, 255]));
        assert_eq!(composed.get_pixel(30, 30), image.pixels().get_pixel(30, 30));
    }

    #[test]
    fn test_invisible_objects_are_skipped() {
        let image = image(20, 20);
        let object = styled(Shape::rect(0.0, 0.0, 20.0, 20.0), RedactionMode::Fill).with_visibility(false);
        assert_eq!(&compose(&image, &[object]), image.pixels());
    }

    #[test]
    fn test_later_objects_draw_on_top() {
        let image = image(20, 20);
        let mut white = StyleParams::default();
        white.mode = RedactionMode::Fill;
        white.fill.color = "#ffffff".to_owned();
        let below = styled(Shape::rect(0.0, 0.0, 20.0, 20.0), RedactionMode::Fill);
        let above = factory::create_object(Shape::rect(0.0, 0.0, 10.0, 20.0), white);

        let composed = compose(&image, &[below, above]);
        assert_eq!(*composed.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
        assert_eq!(*composed.get_pixel(15, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_without_image_clears_surfaces() {
        let mut compositor = Compositor::new();
        let mut document = Document::with_image(image(10, 10).into_ref());
        compositor.render(RenderKind::Full, &document);
        assert!(!compositor.base().is_empty());

        document.image = None;
        compositor.render(RenderKind::Full, &document);
        assert!(compositor.base().is_empty());
    }

    #[test]
    fn test_overlay_only_keeps_base_version() {
        let mut compositor = Compositor::new();
        let document = Document::with_image(image(10, 10).into_ref());
        compositor.render(RenderKind::Full, &document);
        let base_version = compositor.base().version();

        compositor.render(RenderKind::OverlayOnly, &document);
        assert_eq!(compositor.base().version(), base_version);

        compositor.render(RenderKind::Full, &document);
        assert!(compositor.base().version() > base_version);
    }

    #[test]
    fn test_base_matches_export_composition() {
        let image = image(32, 32);
        let objects = vec![
            styled(Shape::ellipse(16.0, 16.0, 10.0, 6.0), RedactionMode::Pixelate),
            styled(Shape::rect(2.0, 2.0, 6.0, 6.0), RedactionMode::Fill),
        ];
        let mut compositor = Compositor::new();
        compositor.render_base(&image, &objects);
        assert_eq!(compositor.base().pixels(), &compose(&image, &objects));
    }
}
