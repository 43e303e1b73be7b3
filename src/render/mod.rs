//! Raster output.
//!
//! Provides the [`Canvas`] the drawing is inked onto and the ARGB colour
//! constants it uses.

mod canvas;

pub use canvas::{Canvas, DEFAULT_CANVAS_SIZE};

/// Packed ARGB colours.
pub mod colors {
    pub const WHITE: u32 = 0xFFFF_FFFF;
    pub const BLACK: u32 = 0xFF00_0000;
}
