//! Format and version information writers
//!
//! All writers paint into reserved cells only, so they may run before or
//! after masking.

use crate::encoder::bch::{MICRO_FORMAT, QR_FORMAT, QR_VERSION, RMQR_FORMAT_FINDER, RMQR_FORMAT_SUB};
use crate::models::{Bitmap, ECLevel, MaskPattern, MicroMask, RmqrVersion, Version};

fn bit(bits: u32, i: u32) -> bool {
    (bits >> i) & 1 == 1
}

/// 15-bit QR format information for a level and mask
pub fn qr_format_bits(level: ECLevel, mask: MaskPattern) -> u32 {
    QR_FORMAT.encode(u32::from(level.format_bits()) << 3 | u32::from(mask.bits()))
}

/// 18-bit QR version information
pub fn qr_version_bits(version: Version) -> u32 {
    QR_VERSION.encode(u32::from(version.number()))
}

/// Write both copies of the format information and the dark module
pub fn write_qr_format(img: &mut Bitmap, level: ECLevel, mask: MaskPattern) {
    let bits = qr_format_bits(level, mask);
    let size = img.width() as i32;

    // around the top-left finder
    for i in 0..6 {
        img.set(8, i, bit(bits, i as u32));
    }
    img.set(8, 7, bit(bits, 6));
    img.set(8, 8, bit(bits, 7));
    img.set(7, 8, bit(bits, 8));
    for i in 9..15 {
        img.set(14 - i, 8, bit(bits, i as u32));
    }

    // split between the top-right and bottom-left finders
    for i in 0..8 {
        img.set(size - 1 - i, 8, bit(bits, i as u32));
    }
    for i in 8..15 {
        img.set(8, size - 15 + i, bit(bits, i as u32));
    }
    img.set(8, size - 8, true);
}

/// Write both version information blocks (versions 7 and up)
pub fn write_qr_version(img: &mut Bitmap, version: Version) {
    if version.number() < 7 {
        return;
    }
    let bits = qr_version_bits(version);
    let size = img.width() as i32;
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        let dark = bit(bits, i as u32);
        img.set(a, b, dark);
        img.set(b, a, dark);
    }
}

/// 15-bit Micro QR format information for a symbol number (0-7) and mask
pub fn micro_format_bits(symbol_number: u8, mask: MicroMask) -> u32 {
    MICRO_FORMAT.encode(u32::from(symbol_number) << 2 | u32::from(mask.bits()))
}

/// Write the Micro QR format information next to the finder
pub fn write_micro_format(img: &mut Bitmap, symbol_number: u8, mask: MicroMask) {
    let bits = micro_format_bits(symbol_number, mask);
    for i in 0..8 {
        img.set(8, i + 1, bit(bits, i as u32));
        img.set(i + 1, 8, bit(bits, 14 - i as u32));
    }
}

/// Unmasked 18-bit rMQR format payload for a shape and level bit
fn rmqr_format_data(version: RmqrVersion, level: ECLevel) -> u32 {
    let level_bit = u32::from(level == ECLevel::H);
    level_bit << 5 | version.index() as u32
}

/// rMQR format information next to the finder and next to the sub-finder
pub fn rmqr_format_bits(version: RmqrVersion, level: ECLevel) -> (u32, u32) {
    let data = rmqr_format_data(version, level);
    (RMQR_FORMAT_FINDER.encode(data), RMQR_FORMAT_SUB.encode(data))
}

/// Cells of the finder-side rMQR format information, LSB first
pub fn rmqr_finder_format_cells() -> impl Iterator<Item = (i32, i32)> {
    (0..18).map(|n| (8 + n / 5, 1 + n % 5))
}

/// Cells of the sub-finder-side rMQR format information, LSB first
pub fn rmqr_sub_format_cells(width: usize, height: usize) -> impl Iterator<Item = (i32, i32)> {
    let (w, h) = (width as i32, height as i32);
    (0..15)
        .map(move |n| (w - 8 + n / 5, h - 6 + n % 5))
        .chain((0..3).map(move |n| (w - 5 + n, h - 6)))
}

/// Write both copies of the rMQR format information
pub fn write_rmqr_format(img: &mut Bitmap, version: RmqrVersion, level: ECLevel) {
    let (finder, sub) = rmqr_format_bits(version, level);
    for (n, (x, y)) in rmqr_finder_format_cells().enumerate() {
        img.set(x, y, bit(finder, n as u32));
    }
    for (n, (x, y)) in rmqr_sub_format_cells(version.width(), version.height()).enumerate() {
        img.set(x, y, bit(sub, n as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_first_copy(img: &Bitmap) -> u32 {
        let mut cells: Vec<(i32, i32)> = (0..6).map(|i| (8, i)).collect();
        cells.extend([(8, 7), (8, 8), (7, 8)]);
        cells.extend((9..15).map(|i| (14 - i, 8)));
        cells
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &(x, y))| acc | (u32::from(img.get(x, y)) << i))
    }

    fn read_second_copy(img: &Bitmap) -> u32 {
        let size = img.width() as i32;
        let mut cells: Vec<(i32, i32)> = (0..8).map(|i| (size - 1 - i, 8)).collect();
        cells.extend((8..15).map(|i| (8, size - 15 + i)));
        cells
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &(x, y))| acc | (u32::from(img.get(x, y)) << i))
    }

    #[test]
    fn test_qr_format_copies_agree() {
        for level in ECLevel::ALL {
            for mask in MaskPattern::ALL {
                let mut img = Bitmap::with_size(21, 21);
                write_qr_format(&mut img, level, mask);
                let expected = qr_format_bits(level, mask);
                assert_eq!(read_first_copy(&img), expected);
                assert_eq!(read_second_copy(&img), expected);
                assert!(img.get(8, 13));
            }
        }
    }

    #[test]
    fn test_qr_version_blocks() {
        let version = Version::new(7).unwrap();
        let mut img = Bitmap::with_size(45, 45);
        write_qr_version(&mut img, version);
        let bits = qr_version_bits(version);
        assert_eq!(bits, 0x07C94);
        for i in 0..18 {
            let (a, b) = (34 + i % 3, i / 3);
            assert_eq!(img.get(a, b), bit(bits, i as u32));
            assert_eq!(img.get(b, a), bit(bits, i as u32));
        }

        let mut small = Bitmap::with_size(41, 41);
        write_qr_version(&mut small, Version::new(6).unwrap());
        assert_eq!(small.popcount(), 0);
    }

    #[test]
    fn test_micro_format() {
        // M1, mask 0: symbol number 0
        assert_eq!(micro_format_bits(0, MicroMask::Pattern0), 0x4445);
        let mut img = Bitmap::with_size(11, 11);
        write_micro_format(&mut img, 3, MicroMask::Pattern2);
        let bits = micro_format_bits(3, MicroMask::Pattern2);
        for i in 0..8 {
            assert_eq!(img.get(8, i + 1), bit(bits, i as u32));
            assert_eq!(img.get(i + 1, 8), bit(bits, 14 - i as u32));
        }
    }

    #[test]
    fn test_rmqr_format_cells() {
        let finder: Vec<_> = rmqr_finder_format_cells().collect();
        assert_eq!(finder[0], (8, 1));
        assert_eq!(finder[4], (8, 5));
        assert_eq!(finder[5], (9, 1));
        assert_eq!(finder[17], (11, 3));

        let sub: Vec<_> = rmqr_sub_format_cells(43, 7).collect();
        assert_eq!(sub.len(), 18);
        assert_eq!(sub[0], (35, 1));
        assert_eq!(sub[14], (37, 5));
        assert_eq!(sub[15..], [(38, 1), (39, 1), (40, 1)]);
    }

    #[test]
    fn test_rmqr_format_bits() {
        let (finder, sub) = rmqr_format_bits(RmqrVersion::R7x43, ECLevel::M);
        assert_eq!(finder ^ sub, 0x1FAB2 ^ 0x20A7B);
        assert!(RMQR_FORMAT_FINDER.check(finder));
        let (finder_h, _) = rmqr_format_bits(RmqrVersion::R7x43, ECLevel::H);
        assert_eq!(RMQR_FORMAT_FINDER.data(finder_h), 0b100000);
    }
}
