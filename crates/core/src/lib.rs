//! Core primitives and traits shared by the learning environment.
//!
//! The emulator itself lives behind [`EmulationCore`]: the environment only
//! needs to advance it, peek at memory, read the raw framebuffer and move its
//! opaque state blob in and out.

pub mod archive;
pub mod graphics;
pub mod input;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// Bytes of console RAM visible to the environment.
    pub const RAM_SIZE: usize = 128;

    /// Row-major screen of palette indices.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Screen {
        height: usize,
        width: usize,
        pixels: Vec<u8>,
    }

    impl Screen {
        pub fn new(height: usize, width: usize) -> Self {
            Self {
                height,
                width,
                pixels: vec![0; height * width],
            }
        }

        /// Build a screen from an existing buffer.
        ///
        /// # Panics
        /// If `pixels.len() != height * width`.
        pub fn from_pixels(height: usize, width: usize, pixels: Vec<u8>) -> Self {
            assert_eq!(
                pixels.len(),
                height * width,
                "screen buffer does not match {}x{}",
                height,
                width
            );
            Self {
                height,
                width,
                pixels,
            }
        }

        pub fn height(&self) -> usize {
            self.height
        }

        pub fn width(&self) -> usize {
            self.width
        }

        /// Pixel at (row, column).
        ///
        /// # Panics
        /// If the coordinate lies outside the screen.
        pub fn pixel(&self, row: usize, col: usize) -> u8 {
            self.pixels[self.index(row, col)]
        }

        pub fn pixels(&self) -> &[u8] {
            &self.pixels
        }

        fn index(&self, row: usize, col: usize) -> usize {
            assert!(
                row < self.height && col < self.width,
                "pixel ({}, {}) outside {}x{} screen",
                row,
                col,
                self.height,
                self.width
            );
            row * self.width + col
        }
    }

    /// Console RAM view. Indices wrap around the 128 bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ram {
        bytes: [u8; RAM_SIZE],
    }

    impl Default for Ram {
        fn default() -> Self {
            Self {
                bytes: [0; RAM_SIZE],
            }
        }
    }

    impl Ram {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get(&self, index: usize) -> u8 {
            self.bytes[index & (RAM_SIZE - 1)]
        }

        pub fn set(&mut self, index: usize, value: u8) {
            self.bytes[index & (RAM_SIZE - 1)] = value;
        }

        pub fn as_bytes(&self) -> &[u8; RAM_SIZE] {
            &self.bytes
        }

        pub fn len(&self) -> usize {
            RAM_SIZE
        }

        pub fn is_empty(&self) -> bool {
            false
        }
    }
}

use input::{AnalogInput, DigitalInput};

/// Read-only access to the emulated address space.
pub trait MemoryView {
    fn peek(&self, address: u16) -> u8;
}

/// The emulation core driven by the environment.
///
/// Implementations own the CPU, video chip and cartridge. The framebuffer holds
/// one palette index per pixel, `screen_height() * screen_width()` bytes.
pub trait EmulationCore: MemoryView {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Power-cycle the machine, keeping the loaded cartridge.
    fn reset(&mut self);

    /// Run the machine for `ticks` frames with the currently latched inputs.
    fn advance(&mut self, ticks: u32);

    /// Current raw framebuffer.
    fn framebuffer(&self) -> &[u8];

    fn screen_height(&self) -> usize;

    fn screen_width(&self) -> usize;

    /// Serialize the complete machine state.
    fn capture_state(&self) -> Vec<u8>;

    /// Restore a blob produced by [`EmulationCore::capture_state`]. On error
    /// the machine must keep its previous state.
    fn restore_state(&mut self, blob: &[u8]) -> Result<(), Self::Error>;

    /// MD5 of the loaded cartridge image.
    fn cartridge_md5(&self) -> &str;

    fn set_digital_input(&mut self, input: &DigitalInput);

    fn set_analog_input(&mut self, input: &AnalogInput);

    /// Whether the cartridge expects paddles instead of joysticks.
    fn uses_paddles(&self) -> bool {
        false
    }

    /// Swap the left and right controller ports.
    fn swap_ports(&mut self) {}
}
