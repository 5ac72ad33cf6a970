use thiserror::Error;

/// Errors that can occur while turning external bytes into an image model
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, len: usize },

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dropped file has no accessible data")]
    NoData,

    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to read the clipboard: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Errors that can occur while encoding the composited raster
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write exported image: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading or saving preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to (de)serialize preferences: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported preferences version {0}")]
    UnsupportedVersion(u32),
}

/// Errors that can occur during gesture state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Attempted to transition between incompatible states
    #[error("Cannot transition from {from} to {to}")]
    InvalidStateTransition { from: &'static str, to: &'static str },

    /// Gesture needs an image and a viewport
    #[error("No image loaded")]
    NoImage,
}
