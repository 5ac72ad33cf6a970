#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod clipboard;
pub mod clipboard_image;
pub mod command;
pub mod components;
pub mod document;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod image_model;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod viewport;

pub use app::RedactApp;
pub use command::{CommandHistory, CommandType};
pub use document::Document;
pub use element::{RedactionObject, Shape, StyleParams};
pub use image_model::{ImageModel, ImageRef};
pub use input::{CanvasEvent, InputHandler};
pub use renderer::{Compositor, RenderKind};
pub use state::{EditorContext, EditorState, PasteOutcome, Preferences};
pub use tools::ToolType;
pub use viewport::ViewportTransform;
