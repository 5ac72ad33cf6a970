use std::sync::Arc;

use image::RgbaImage;
use log::info;

use crate::error::ImportError;

/// Decoded source bitmap. Immutable once created and shared between
/// document snapshots through [`ImageRef`].
#[derive(Clone, PartialEq)]
pub struct ImageModel {
    pixels: RgbaImage,
    name: String,
}

// Custom Debug implementation so pixel buffers are not dumped into logs
impl std::fmt::Debug for ImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageModel")
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

pub type ImageRef = Arc<ImageModel>;

impl ImageModel {
    /// Decode any format supported by the `image` crate into RGBA8
    pub fn from_bytes(bytes: &[u8], name: impl Into<String>) -> Result<Self, ImportError> {
        let decoded = image::load_from_memory(bytes)?;
        let model = Self::from_image(decoded.to_rgba8(), name)?;
        info!("Decoded image {}: {}x{}", model.name, model.width(), model.height());
        Ok(model)
    }

    pub fn from_image(pixels: RgbaImage, name: impl Into<String>) -> Result<Self, ImportError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImportError::EmptyImage {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(Self {
            pixels,
            name: name.into(),
        })
    }

    /// Wrap raw unmultiplied RGBA bytes, e.g. from a clipboard image event
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, name: impl Into<String>) -> Result<Self, ImportError> {
        let len = data.len();
        let pixels = RgbaImage::from_raw(width, height, data)
            .ok_or(ImportError::BufferSize { width, height, len })?;
        Self::from_image(pixels, name)
    }

    pub fn into_ref(self) -> ImageRef {
        Arc::new(self)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png_bytes() {
        let source = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let model = ImageModel::from_bytes(&bytes, "shot.png").unwrap();
        assert_eq!((model.width(), model.height()), (3, 2));
        assert_eq!(model.name(), "shot.png");
        assert_eq!(model.pixels(), &source);
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(matches!(
            ImageModel::from_bytes(b"not an image", "x"),
            Err(ImportError::Decode(_))
        ));
    }

    #[test]
    fn test_empty_and_mismatched_buffers_are_rejected() {
        assert!(matches!(
            ImageModel::from_image(RgbaImage::new(0, 4), "empty"),
            Err(ImportError::EmptyImage { .. })
        ));
        assert!(matches!(
            ImageModel::from_rgba(2, 2, vec![0; 3], "short"),
            Err(ImportError::BufferSize { .. })
        ));
    }
}
