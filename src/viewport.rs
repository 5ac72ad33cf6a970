use egui::{Pos2, Rect, Vec2};

/// Uniform "contain" fit of the image inside the canvas container.
///
/// Maps between container (screen) coordinates and image pixel coordinates.
/// The aspect ratio is never distorted; the scaled image is centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Rendered image width in container pixels
    pub width: f32,
    /// Rendered image height in container pixels
    pub height: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewportTransform {
    /// Identity transform, used for exporting at native resolution
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Contain-fit transform. Container sizes below one pixel are treated as one.
    pub fn compute(container_width: f32, container_height: f32, image_width: u32, image_height: u32) -> Self {
        let base_width = container_width.max(1.0);
        let base_height = container_height.max(1.0);
        let image_width = image_width.max(1) as f32;
        let image_height = image_height.max(1) as f32;

        let scale = (base_width / image_width).min(base_height / image_height);
        let width = image_width * scale;
        let height = image_height * scale;

        Self {
            scale,
            offset_x: (base_width - width) / 2.0,
            offset_y: (base_height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// Container rectangle covered by the rendered image
    pub fn image_rect(&self) -> Rect {
        Rect::from_min_size(self.offset().to_pos2(), Vec2::new(self.width, self.height))
    }

    pub fn to_image_point(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    pub fn to_screen_point(&self, image: Pos2) -> Pos2 {
        Pos2::new(self.offset_x + image.x * self.scale, self.offset_y + image.y * self.scale)
    }
}
