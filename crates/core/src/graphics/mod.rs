//! Colour and palette helpers shared by the screen post-processing code.
//!
//! Framebuffers handed out by an [`EmulationCore`](crate::EmulationCore) hold
//! palette indices, not RGB. This module maps those indices to RGB and back.

pub mod color;
pub mod palette;

pub use color::ColorOps;
pub use palette::{IndexedPalette, NtscPalette};
