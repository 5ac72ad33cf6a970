//! Compositing of the redacted image (base surface), the egui shapes for the
//! interaction indicators drawn over it, and the scheduler that coalesces
//! render requests.

pub mod compositor;
pub mod overlay;
pub mod pixelate;
pub mod raster;
pub mod schedule;

pub use compositor::{compose, encode_png, export_raster, Compositor, Surface};
pub use overlay::{draft_shapes, selection_shapes};
pub use pixelate::{apply_pixelate, block_average, ScratchPool};
pub use raster::PixelRect;
pub use schedule::{RenderKind, RenderScheduler};
