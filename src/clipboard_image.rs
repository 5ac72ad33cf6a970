//! Image import from the system clipboard.

use crate::error::ImportError;
use crate::image_model::ImageModel;

/// Name given to pasted images; exports become `image-redacted.png`
pub const CLIPBOARD_IMAGE_NAME: &str = "image.png";

/// Reads raw image data from the system clipboard. A clipboard holding only
/// text, or nothing, yields `Ok(None)`.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_image() -> Result<Option<ImageModel>, ImportError> {
    let mut clipboard = arboard::Clipboard::new()?;
    let data = match clipboard.get_image() {
        Ok(data) => data,
        Err(arboard::Error::ContentNotAvailable) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let image = ImageModel::from_rgba(
        data.width as u32,
        data.height as u32,
        data.bytes.into_owned(),
        CLIPBOARD_IMAGE_NAME,
    )?;
    Ok(Some(image))
}

/// Browsers only hand images to paste events, which egui does not forward
#[cfg(target_arch = "wasm32")]
pub fn read_image() -> Result<Option<ImageModel>, ImportError> {
    Ok(None)
}
