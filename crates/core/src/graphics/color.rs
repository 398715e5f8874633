//! Color operation utilities for screen post-processing
//!
//! Colors are packed as RGB888 (`0x00RRGGBB`), the layout used by the NTSC
//! palette table.

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Decay-blend two channel intensities.
    ///
    /// The brighter value decays towards the darker one: `ratio` is the
    /// percentage of the difference that survives (0 = darker value,
    /// 100 = brighter value). Argument order does not matter.
    ///
    /// # Example
    ///
    /// ```
    /// use ale_core::graphics::ColorOps;
    ///
    /// assert_eq!(ColorOps::phosphor(200, 100, 77), 177);
    /// assert_eq!(ColorOps::phosphor(100, 200, 77), 177);
    /// ```
    #[inline]
    pub fn phosphor(v1: u8, v2: u8, ratio: u8) -> u8 {
        let (hi, lo) = if v1 >= v2 { (v1, v2) } else { (v2, v1) };
        let blended = (u32::from(hi - lo) * u32::from(ratio)) / 100 + u32::from(lo);
        blended.min(255) as u8
    }

    /// Channel-wise [`ColorOps::phosphor`] of two RGB colors.
    #[inline]
    pub fn blend(c1: u32, c2: u32, ratio: u8) -> u32 {
        Self::from_rgb(
            Self::phosphor(Self::red(c1), Self::red(c2), ratio),
            Self::phosphor(Self::green(c1), Self::green(c2), ratio),
            Self::phosphor(Self::blue(c1), Self::blue(c2), ratio),
        )
    }

    /// Manhattan distance between two RGB colors.
    #[inline]
    pub fn distance(c1: u32, c2: u32) -> u32 {
        let d = |a: u8, b: u8| u32::from(a.abs_diff(b));
        d(Self::red(c1), Self::red(c2))
            + d(Self::green(c1), Self::green(c2))
            + d(Self::blue(c1), Self::blue(c2))
    }

    /// Extract red channel from RGB color
    #[inline]
    pub fn red(color: u32) -> u8 {
        ((color >> 16) & 0xFF) as u8
    }

    /// Extract green channel from RGB color
    #[inline]
    pub fn green(color: u32) -> u8 {
        ((color >> 8) & 0xFF) as u8
    }

    /// Extract blue channel from RGB color
    #[inline]
    pub fn blue(color: u32) -> u8 {
        (color & 0xFF) as u8
    }

    /// Construct RGB color from components
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }
}
