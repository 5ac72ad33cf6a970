use eframe::egui;
use log::{info, warn};

use crate::error::ImportError;
use crate::image_model::ImageModel;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff"];

/// Turns files dropped onto the window into decoded images
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files were queued
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                return false;
            }
            self.dropped_files = i.raw.dropped_files.clone();
            true
        })
    }

    /// Decodes the first dropped image file. Other files are skipped with a warning.
    pub fn take_dropped_image(&mut self) -> Option<ImageModel> {
        let files = std::mem::take(&mut self.dropped_files);

        for file in &files {
            let file_name = display_name(file);
            if !is_image_file(file) {
                warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            match load_dropped_file(file, &file_name) {
                Ok(image) => return Some(image),
                Err(err) => warn!("Failed to load {}: {}", file_name, err),
            }
        }
        None
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to start redacting",
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// File name without directories, used as the image name
fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(name) = file.path.as_ref().and_then(|path| path.file_name()) {
        name.to_string_lossy().into_owned()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "image".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let extension = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));

    extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn load_dropped_file(file: &egui::DroppedFile, file_name: &str) -> Result<ImageModel, ImportError> {
    if let Some(bytes) = &file.bytes {
        info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
        return ImageModel::from_bytes(bytes, file_name);
    }

    if let Some(path) = &file.path {
        info!("Processing image from path: {}", path.display());
        let bytes = std::fs::read(path)?;
        return ImageModel::from_bytes(&bytes, file_name);
    }

    Err(ImportError::NoData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dropped(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            path: Some(PathBuf::from(format!("/tmp/{name}"))),
            name: name.to_owned(),
            mime: mime.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_detection() {
        assert!(is_image_file(&dropped("a.PNG", "")));
        assert!(is_image_file(&dropped("scan", "image/tiff")));
        assert!(!is_image_file(&dropped("notes.txt", "")));
        assert!(!is_image_file(&dropped("a.png", "text/plain")));
    }

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name(&dropped("shot.png", "")), "shot.png");
    }

    #[test]
    fn test_non_images_are_skipped() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![dropped("notes.txt", "")];
        assert!(handler.take_dropped_image().is_none());
        assert!(handler.dropped_files.is_empty());
    }
}
