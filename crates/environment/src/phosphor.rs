//! Screen post-processing.
//!
//! Old CRT phosphors keep glowing for a moment after the beam has moved on,
//! and several titles rely on that to show sprites that are only drawn on
//! every other frame. [`PhosphorBlend`] simulates it by blending each incoming
//! pixel with the previously produced screen and mapping the result back onto
//! the NTSC palette.

use crate::config::EnvironmentConfig;
use ale_core::graphics::{ColorOps, IndexedPalette, NtscPalette};
use ale_core::types::Screen;

/// Side of the quantized RGB cube (6 bits per channel).
const CUBE_SIDE: usize = 64;

/// Precomputed tables for phosphor blending.
#[derive(Clone)]
pub struct PhosphorBlend {
    ratio: u8,
    /// Palette index nearest to each quantized RGB value.
    rgb_to_index: Vec<u8>,
    /// Blended RGB keyed by `incoming * 256 + previous`.
    average: Vec<u32>,
}

impl std::fmt::Debug for PhosphorBlend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhosphorBlend")
            .field("ratio", &self.ratio)
            .finish_non_exhaustive()
    }
}

impl PhosphorBlend {
    /// Build both lookup tables. `ratio` is clamped to 100.
    pub fn new(ratio: u8) -> Self {
        let ratio = ratio.min(100);
        let palette = NtscPalette;

        let mut rgb_to_index = vec![0u8; CUBE_SIDE * CUBE_SIDE * CUBE_SIDE];
        for r in 0..CUBE_SIDE {
            for g in 0..CUBE_SIDE {
                for b in 0..CUBE_SIDE {
                    let rgb = ColorOps::from_rgb((r << 2) as u8, (g << 2) as u8, (b << 2) as u8);
                    rgb_to_index[cube_index(r, g, b)] = palette.nearest_index(rgb) as u8;
                }
            }
        }

        let size = NtscPalette::SIZE;
        let mut average = vec![0u32; size * size];
        for incoming in 0..size {
            let c1 = palette.get_color(incoming);
            for previous in 0..size {
                average[incoming * size + previous] =
                    ColorOps::blend(c1, palette.get_color(previous), ratio);
            }
        }

        log::debug!("built phosphor tables with blend ratio {}", ratio);
        Self {
            ratio,
            rgb_to_index,
            average,
        }
    }

    pub fn ratio(&self) -> u8 {
        self.ratio
    }

    /// Nearest palette index for an RGB colour, after quantizing each channel
    /// to six bits.
    pub fn rgb_to_index(&self, rgb: u32) -> u8 {
        let r = (ColorOps::red(rgb) >> 2) as usize;
        let g = (ColorOps::green(rgb) >> 2) as usize;
        let b = (ColorOps::blue(rgb) >> 2) as usize;
        self.rgb_to_index[cube_index(r, g, b)]
    }

    /// Blend one incoming pixel with the previous output pixel.
    #[inline]
    pub fn blend_pixel(&self, incoming: u8, previous: u8) -> u8 {
        let rgb = self.average[usize::from(incoming) * NtscPalette::SIZE + usize::from(previous)];
        self.rgb_to_index(rgb)
    }
}

fn cube_index(r: usize, g: usize, b: usize) -> usize {
    (r * CUBE_SIDE + g) * CUBE_SIDE + b
}

/// Turns the core's raw framebuffer into the observed screen.
#[derive(Debug, Clone)]
pub enum ScreenProcessor {
    Passthrough,
    Phosphor(PhosphorBlend),
}

impl ScreenProcessor {
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        if config.color_averaging {
            ScreenProcessor::Phosphor(PhosphorBlend::new(config.phosphor_blend_ratio))
        } else {
            ScreenProcessor::Passthrough
        }
    }

    /// Produce the next screen from `raw` and the previously produced screen.
    ///
    /// # Panics
    /// If `raw` does not have the same number of pixels as `previous`.
    pub fn process(&self, raw: &[u8], previous: &Screen) -> Screen {
        assert_eq!(
            raw.len(),
            previous.pixels().len(),
            "framebuffer size does not match the screen"
        );
        let pixels = match self {
            ScreenProcessor::Passthrough => raw.to_vec(),
            ScreenProcessor::Phosphor(blend) => raw
                .iter()
                .zip(previous.pixels())
                .map(|(&incoming, &prev)| blend.blend_pixel(incoming, prev))
                .collect(),
        };
        Screen::from_pixels(previous.height(), previous.width(), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(PhosphorBlend::new(250).ratio(), 100);
        assert_eq!(PhosphorBlend::new(77).ratio(), 77);
    }

    #[test]
    fn test_identical_pixels_stay_put() {
        let blend = PhosphorBlend::new(77);
        for index in (0..=254u8).step_by(2) {
            assert_eq!(blend.blend_pixel(index, index), index);
        }
    }

    #[test]
    fn test_odd_indices_are_black() {
        let blend = PhosphorBlend::new(77);
        assert_eq!(blend.blend_pixel(1, 0), 0);
        assert_eq!(blend.blend_pixel(3, 5), 0);
    }

    #[test]
    fn test_full_ratio_keeps_brighter_pixel() {
        let blend = PhosphorBlend::new(100);
        // 0x0E is the brightest grey, 0x00 black.
        assert_eq!(blend.blend_pixel(0x00, 0x0E), 0x0E);
        assert_eq!(blend.blend_pixel(0x0E, 0x00), 0x0E);
    }

    #[test]
    fn test_zero_ratio_keeps_darker_pixel() {
        let blend = PhosphorBlend::new(0);
        assert_eq!(blend.blend_pixel(0x00, 0x0E), 0x00);
        assert_eq!(blend.blend_pixel(0x0E, 0x00), 0x00);
    }

    #[test]
    fn test_rgb_to_index_quantizes() {
        let blend = PhosphorBlend::new(77);
        // 0xececec quantizes onto itself and 0x010101 onto black.
        assert_eq!(blend.rgb_to_index(0xececec), 0x0E);
        assert_eq!(blend.rgb_to_index(0x010101), 0x00);
    }

    #[test]
    fn test_passthrough_copies_raw() {
        let previous = Screen::new(2, 2);
        let out = ScreenProcessor::Passthrough.process(&[2, 4, 6, 8], &previous);
        assert_eq!(out.pixels(), &[2, 4, 6, 8]);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_phosphor_mixes_with_previous() {
        let processor = ScreenProcessor::Phosphor(PhosphorBlend::new(77));
        let previous = Screen::from_pixels(1, 2, vec![0x0E, 0x00]);
        let out = processor.process(&[0x00, 0x00], &previous);
        // The lit pixel fades but is not black yet; the dark one stays dark.
        assert_ne!(out.pixel(0, 0), 0x00);
        assert_eq!(out.pixel(0, 1), 0x00);
    }

    #[test]
    fn test_from_config() {
        let config = EnvironmentConfig::default();
        assert!(matches!(
            ScreenProcessor::from_config(&config),
            ScreenProcessor::Passthrough
        ));
        let config = EnvironmentConfig {
            color_averaging: true,
            ..Default::default()
        };
        assert!(matches!(
            ScreenProcessor::from_config(&config),
            ScreenProcessor::Phosphor(_)
        ));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_size_mismatch_panics() {
        ScreenProcessor::Passthrough.process(&[0; 3], &Screen::new(2, 2));
    }
}
