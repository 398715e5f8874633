//! Indexed palettes mapping framebuffer values to RGB.
//!
//! The video chip emits 8-bit colour values whose low bit is unused, so the
//! NTSC palette only carries 128 distinct colours, on the even indices. Odd
//! indices resolve to black.

/// Generic indexed palette that maps color indices to RGB values.
pub trait IndexedPalette {
    /// Get the RGB color (`0x00RRGGBB`) for a palette index.
    fn get_color(&self, index: usize) -> u32;

    /// Get the number of addressable indices in this palette.
    fn len(&self) -> usize;

    /// Check if the palette is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the index whose colour is closest (Manhattan RGB distance) to
    /// `rgb`. Ties resolve to the lowest index.
    fn nearest_index(&self, rgb: u32) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for index in 0..self.len() {
            let dist = super::ColorOps::distance(self.get_color(index), rgb);
            if dist < best_dist {
                best_dist = dist;
                best = index;
            }
        }
        best
    }
}

/// Standard NTSC palette, indexed by the raw framebuffer value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NtscPalette;

impl NtscPalette {
    /// Number of addressable indices (one byte of colour value).
    pub const SIZE: usize = 256;
}

impl IndexedPalette for NtscPalette {
    fn get_color(&self, index: usize) -> u32 {
        if index % 2 == 1 {
            return 0x000000;
        }
        NTSC_COLORS.get(index / 2).copied().unwrap_or(0x000000)
    }

    fn len(&self) -> usize {
        Self::SIZE
    }

    fn nearest_index(&self, rgb: u32) -> usize {
        // Odd entries duplicate black at index 0, so only even ones can win.
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (slot, &color) in NTSC_COLORS.iter().enumerate() {
            let dist = super::ColorOps::distance(color, rgb);
            if dist < best_dist {
                best_dist = dist;
                best = slot * 2;
            }
        }
        best
    }
}

#[rustfmt::skip]
const NTSC_COLORS: [u32; 128] = [
    0x000000, 0x4a4a4a, 0x6f6f6f, 0x8e8e8e, 0xaaaaaa, 0xc0c0c0, 0xd6d6d6, 0xececec,
    0x484800, 0x69690f, 0x86861d, 0xa2a22a, 0xbbbb35, 0xd2d240, 0xe8e84a, 0xfcfc54,
    0x7c2c00, 0x904811, 0xa26221, 0xb47a30, 0xc3903d, 0xd2a44a, 0xdfb755, 0xecc860,
    0x901c00, 0xa33915, 0xb55328, 0xc66c3a, 0xd5824a, 0xe39759, 0xf0aa67, 0xfcbc74,
    0x940000, 0xa71a1a, 0xb83232, 0xc84848, 0xd65c5c, 0xe46f6f, 0xf08080, 0xfc9090,
    0x840064, 0x97197a, 0xa8308f, 0xb846a2, 0xc659b3, 0xd46cc3, 0xe07cd2, 0xec8ce0,
    0x500084, 0x68199a, 0x7d30ad, 0x9246c0, 0xa459d0, 0xb56ce0, 0xc57cee, 0xd48cfc,
    0x140090, 0x331aa3, 0x4e32b5, 0x6848c6, 0x7f5cd5, 0x956fe3, 0xa980f0, 0xbc90fc,
    0x000094, 0x181aa7, 0x2d32b8, 0x4248c8, 0x545cd6, 0x656fe4, 0x7580f0, 0x8490fc,
    0x001c88, 0x183b9d, 0x2d57b0, 0x4272c2, 0x548ad2, 0x65a0e1, 0x75b5ef, 0x84c8fc,
    0x003064, 0x185080, 0x2d6d98, 0x4288b0, 0x54a0c5, 0x65b7d9, 0x75cceb, 0x84e0fc,
    0x004030, 0x18624e, 0x2d8169, 0x429e82, 0x54b899, 0x65d1ae, 0x75e7c2, 0x84fcd4,
    0x004400, 0x1a661a, 0x328432, 0x48a048, 0x5cba5c, 0x6fd26f, 0x80e880, 0x90fc90,
    0x143c00, 0x355f18, 0x527e2d, 0x6e9c42, 0x87b754, 0x9ed065, 0xb4e775, 0xc8fc84,
    0x303800, 0x505916, 0x6d762b, 0x88923e, 0xa0ab4f, 0xb7c25f, 0xccd86e, 0xe0ec7c,
    0x482c00, 0x694d14, 0x866a26, 0xa28638, 0xbb9f47, 0xd2b656, 0xe8cc63, 0xfce070,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntsc_palette_size() {
        let palette = NtscPalette;
        assert_eq!(palette.len(), 256);
        assert!(!palette.is_empty());
    }

    #[test]
    fn test_ntsc_even_and_odd_entries() {
        let palette = NtscPalette;
        assert_eq!(palette.get_color(0), 0x000000);
        assert_eq!(palette.get_color(2), 0x4a4a4a);
        assert_eq!(palette.get_color(3), 0x000000);
        assert_eq!(palette.get_color(254), 0xfce070);
    }

    #[test]
    fn test_nearest_index_exact_match() {
        let palette = NtscPalette;
        for index in (0..256).step_by(2) {
            let color = palette.get_color(index);
            let nearest = palette.nearest_index(color);
            assert_eq!(palette.get_color(nearest), color);
        }
    }

    #[test]
    fn test_nearest_index_prefers_even_black() {
        assert_eq!(NtscPalette.nearest_index(0x010101), 0);
    }
}
