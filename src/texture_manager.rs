use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::renderer::Surface;

/// Errors that can occur during texture generation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Convert a render surface into an egui image
pub fn color_image_from_surface(surface: &Surface) -> Result<ColorImage, TextureGenerationError> {
    if surface.is_empty() {
        return Err(TextureGenerationError::InvalidDimensions {
            width: surface.width(),
            height: surface.height(),
        });
    }
    let size = [surface.width() as usize, surface.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, surface.pixels().as_raw()))
}

/// Holds the GPU texture for the newest version of the base surface.
///
/// Uploading a new version frees the previous texture.
#[derive(Default)]
pub struct TextureManager {
    current: Option<(u64, TextureHandle)>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the texture for `version`, uploading it when it is not the cached one
    pub fn get_or_create_texture<F>(
        &mut self,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        if let Some((cached, handle)) = &self.current {
            if *cached == version {
                return Ok(handle.id());
            }
        }

        let image = generator()?;
        // The base is resampled to fit the canvas
        let handle = ctx.load_texture(format!("surface_base_v{version}"), image, TextureOptions::LINEAR);
        let id = handle.id();
        self.current = Some((version, handle));
        Ok(id)
    }

    /// Upload (or reuse) the texture for a surface
    pub fn texture_for_surface(&mut self, surface: &Surface, ctx: &Context) -> Result<TextureId, TextureGenerationError> {
        self.get_or_create_texture(surface.version(), || color_image_from_surface(surface), ctx)
    }

    pub fn cached_version(&self) -> Option<u64> {
        self.current.as_ref().map(|(version, _)| *version)
    }

    pub fn clear_cache(&mut self) {
        self.current = None;
    }
}
