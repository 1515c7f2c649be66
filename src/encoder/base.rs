//! Fixed function patterns and reserved cells
//!
//! Every symbol starts from a `base` bitmap holding its finder, timing and
//! alignment patterns, and a `used` bitmap marking every cell that data
//! placement and masking must leave alone (function patterns plus the
//! format/version information areas). Both are pure functions of the
//! version and are built once per process.

use std::sync::OnceLock;

use rayon::prelude::*;

use crate::models::{Bitmap, MaskPattern, Version};

/// Mask bitmaps cover the largest symbol of every family
pub const MASK_WIDTH: usize = 184;
/// Height of the shared mask bitmaps
pub const MASK_HEIGHT: usize = 177;

const TIMING_OFFSET: i32 = 6;

/// Alignment pattern centre coordinates per QR version (index 0 unused)
pub const ALIGNMENT_POSITIONS: [&[i32]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 46, 78, 102, 126, 150],
    &[6, 24, 48, 70, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// Function-pattern image plus the reserved-cell mask of one symbol version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolBase {
    /// Function pattern pixels
    pub base: Bitmap,
    /// Cells that placement and masking must skip
    pub used: Bitmap,
}

impl SymbolBase {
    /// Empty base of the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            base: Bitmap::with_size(width, height),
            used: Bitmap::with_size(width, height),
        }
    }

    /// Paint a function module and reserve it
    pub fn put(&mut self, x: i32, y: i32, dark: bool) {
        self.base.set(x, y, dark);
        self.used.set(x, y, true);
    }

    /// Reserve a cell without painting it (format/version information)
    pub fn reserve(&mut self, x: i32, y: i32) {
        self.used.set(x, y, true);
    }

    /// 7x7 finder pattern plus its one-module separator, drawn as an 8x8
    /// block growing from `(x0, y0)` in the direction `(sx, sy)`
    pub fn finder(&mut self, x0: i32, y0: i32, sx: i32, sy: i32) {
        for y in 0..8i32 {
            for x in 0..8i32 {
                let d = (x - 3).abs().max((y - 3).abs());
                self.put(x0 + sx * x, y0 + sy * y, d != 2 && d != 4);
            }
        }
    }

    /// Concentric square pattern of the given radius centred on `(cx, cy)`.
    /// The outer ring is dark and colours alternate inwards.
    pub fn alignment(&mut self, cx: i32, cy: i32, radius: i32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d = dx.abs().max(dy.abs());
                self.put(cx + dx, cy + dy, (radius - d) % 2 == 0);
            }
        }
    }
}

// ============== Standard QR ==============

fn build_qr_base(version: Version) -> SymbolBase {
    let size = version.size();
    let w = size as i32 - 1;
    let mut sb = SymbolBase::new(size, size);

    for i in 0..=w {
        sb.put(i, TIMING_OFFSET, i % 2 == 0);
        sb.put(TIMING_OFFSET, i, i % 2 == 0);
    }

    sb.finder(0, 0, 1, 1);
    sb.finder(w, 0, -1, 1);
    sb.finder(0, w, 1, -1);

    let positions = ALIGNMENT_POSITIONS[version.number() as usize];
    let last = positions.len().saturating_sub(1);
    for (j, &y) in positions.iter().enumerate() {
        for (i, &x) in positions.iter().enumerate() {
            let on_finder = (i == 0 && j == 0) || (i == last && j == 0) || (i == 0 && j == last);
            if !on_finder {
                sb.alignment(x, y, 2);
            }
        }
    }

    // format information, both copies
    for i in 0..8 {
        sb.reserve(i, 8);
        sb.reserve(8, i);
        sb.reserve(8, w - i);
        sb.reserve(w - i, 8);
    }
    sb.reserve(8, 8);

    if version.number() >= 7 {
        for i in 0..6 {
            for k in 8..=10 {
                sb.reserve(i, w - k);
                sb.reserve(w - k, i);
            }
        }
    }
    sb
}

static QR_BASES: OnceLock<Vec<SymbolBase>> = OnceLock::new();

/// Base and used bitmaps of a standard QR version
pub fn qr_base(version: Version) -> &'static SymbolBase {
    let bases = QR_BASES.get_or_init(|| {
        (1..=40u8)
            .into_par_iter()
            .filter_map(Version::new)
            .map(build_qr_base)
            .collect()
    });
    &bases[version.number() as usize - 1]
}

// ============== Masks ==============

fn build_mask(pattern: MaskPattern) -> Bitmap {
    let mut img = Bitmap::with_size(MASK_WIDTH, MASK_HEIGHT);
    for i in 0..MASK_HEIGHT {
        for j in 0..MASK_WIDTH {
            if pattern.is_masked(i, j) {
                img.set(j as i32, i as i32, true);
            }
        }
    }
    img
}

static MASKS: OnceLock<Vec<Bitmap>> = OnceLock::new();

/// Shared bitmap of a mask predicate, set where the module is flipped
pub fn mask_bitmap(pattern: MaskPattern) -> &'static Bitmap {
    let masks = MASKS.get_or_init(|| MaskPattern::ALL.par_iter().map(|&p| build_mask(p)).collect());
    &masks[pattern.bits() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tables::raw_data_modules;

    fn free_cells(sb: &SymbolBase) -> usize {
        sb.used.width() * sb.used.height() - sb.used.popcount()
    }

    #[test]
    fn test_finder_corners() {
        let sb = qr_base(Version::MIN);
        // outer ring, white ring, dark core, separator
        assert!(sb.base.get(0, 0));
        assert!(!sb.base.get(1, 1));
        assert!(sb.base.get(3, 3));
        assert!(!sb.base.get(7, 0));
        assert!(sb.base.get(20, 0));
        assert!(!sb.base.get(13, 0));
        assert!(sb.base.get(0, 20));
        assert!(sb.used.get(7, 7));
        assert!(sb.used.get(13, 7));
        assert!(!sb.used.get(12, 12));
    }

    #[test]
    fn test_finder_mirrored() {
        let mut sb = SymbolBase::new(10, 10);
        sb.finder(9, 9, -1, -1);
        for d in 0..7 {
            assert!(sb.base.get(9 - d, 9) && sb.base.get(9, 9 - d));
        }
        assert!(!sb.base.get(8, 8) && sb.base.get(6, 6) && sb.base.get(7, 7));
        assert!(!sb.base.get(2, 9) && !sb.base.get(2, 2));
        assert!(sb.used.get(2, 2) && !sb.used.get(1, 1));
    }

    #[test]
    fn test_timing_pattern() {
        let sb = qr_base(Version::new(5).unwrap());
        for i in 8..29 {
            assert_eq!(sb.base.get(i, 6), i % 2 == 0, "row timing at {i}");
            assert_eq!(sb.base.get(6, i), i % 2 == 0, "column timing at {i}");
        }
    }

    #[test]
    fn test_alignment_skips_finders() {
        let sb = qr_base(Version::new(7).unwrap());
        assert!(sb.base.get(22, 22));
        assert!(!sb.base.get(21, 22));
        assert!(sb.base.get(20, 22));
        // centre on the timing row
        assert!(sb.used.get(22, 5));
        assert!(!sb.base.get(22, 5));
        assert!(sb.base.get(22, 4));
        assert!(sb.base.get(38, 38));
        assert!(!sb.base.get(38, 37));
        assert!(sb.used.get(38, 37));
        // finder white ring, no alignment drawn over it
        assert!(!sb.base.get(5, 5));
    }

    #[test]
    fn test_free_cells_match_capacity() {
        for version in Version::all() {
            let sb = qr_base(version);
            assert_eq!(free_cells(sb), raw_data_modules(version), "version {version}");
        }
    }

    #[test]
    fn test_version_info_reserved() {
        let sb = qr_base(Version::new(7).unwrap());
        let w = 44;
        assert!(sb.used.get(0, w - 10));
        assert!(sb.used.get(5, w - 8));
        assert!(sb.used.get(w - 10, 5));
        assert!(!sb.base.get(w - 10, 5));
        assert!(!qr_base(Version::new(6).unwrap()).used.get(0, 30));
    }

    #[test]
    fn test_mask_bitmaps() {
        let m0 = mask_bitmap(MaskPattern::Pattern0);
        assert_eq!(m0.width(), MASK_WIDTH);
        assert!(m0.get(0, 0));
        assert!(!m0.get(1, 0));
        let m2 = mask_bitmap(MaskPattern::Pattern2);
        // column predicate
        assert!(m2.get(3, 5));
        assert!(!m2.get(4, 5));
    }
}
