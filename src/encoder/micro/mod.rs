//! Micro QR symbols (M1-M4)
//!
//! Micro QR uses a single finder, variable-width mode indicators and a
//! half-length final data codeword in M1 and M3. Only four masks exist and
//! the one with the most dark modules along the right and bottom edges wins.

mod tables;

pub use tables::{free_modules, micro_base, micro_capacity, symbol_number};

use crate::encoder::base::mask_bitmap;
use crate::encoder::config::EncodeOptions;
use crate::encoder::error::EncodeError;
use crate::encoder::format::write_micro_format;
use crate::encoder::interleave::interleave;
use crate::encoder::mask::{micro_score, select_mask};
use crate::encoder::placement::{Zigzag, place};
use crate::encoder::segment::{ModeHeader, SegmentLayout, encode_segment};
use crate::encoder::segmenter::select_version;
use crate::models::{Bitmap, ECLevel, MicroMask, MicroVersion, Mode, Segment};
use crate::utils::BitBuffer;

impl SegmentLayout for MicroVersion {
    fn header(&self, mode: Mode) -> Option<ModeHeader> {
        let n = u32::from(self.number());
        let count_bits = match (mode, n) {
            (Mode::Numeric, _) => n + 2,
            (Mode::Alphanumeric, 2..) => n + 1,
            (Mode::Bytes, 3..) => n + 1,
            (Mode::Kanji, 4) => 4,
            _ => return None,
        };
        Some(ModeHeader {
            indicator: mode as u64,
            indicator_bits: n - 1,
            count_bits,
        })
    }

    fn terminator_bits(&self) -> usize {
        2 * self.number() as usize + 1
    }
}

fn invalid_pair(version: MicroVersion, level: ECLevel) -> EncodeError {
    EncodeError::InvalidVersion(format!("{version}-{level} is not a Micro QR symbol"))
}

/// Micro QR symbol description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroQrCode {
    /// Symbol version
    pub version: MicroVersion,
    /// Error correction level (L for M1)
    pub level: ECLevel,
    /// Mask; `None` picks the highest edge score
    pub mask: Option<MicroMask>,
    /// Payload segments in order
    pub segments: Vec<Segment>,
}

impl MicroQrCode {
    /// Describe a symbol with explicit version and segments
    pub fn with_segments(version: MicroVersion, level: ECLevel, segments: Vec<Segment>) -> Self {
        Self {
            version,
            level,
            mask: None,
            segments,
        }
    }

    /// Segment `data` and pick the smallest version that offers `level` and holds it
    pub fn new(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Self, EncodeError> {
        Self::new_with(data, &EncodeOptions::with_level(level))
    }

    /// Like [`MicroQrCode::new`], with mask and Kanji settings taken from `options`
    pub fn new_with(data: impl AsRef<[u8]>, options: &EncodeOptions) -> Result<Self, EncodeError> {
        let level = options.level;
        let mask = match options.mask {
            Some(bits) => Some(MicroMask::from_bits(bits).ok_or_else(|| {
                EncodeError::InvalidVersion(format!("Micro QR mask {bits} outside 0-3"))
            })?),
            None => None,
        };
        let candidates: Vec<_> = MicroVersion::ALL
            .iter()
            .filter_map(|&v| micro_capacity(v, level).map(|c| (v, c.data_bits)))
            .collect();
        if candidates.is_empty() {
            return Err(EncodeError::InvalidVersion(format!(
                "no Micro QR version offers level {level}"
            )));
        }
        let (version, segments) = select_version(data.as_ref(), candidates, options.kanji)?;
        Ok(Self {
            version,
            level,
            mask,
            segments,
        })
    }

    fn symbol_number(&self) -> Result<u8, EncodeError> {
        symbol_number(self.version, self.level).ok_or_else(|| invalid_pair(self.version, self.level))
    }

    /// Padded data bits of the symbol, rounded up to whole bytes
    pub fn data_codewords(&self) -> Result<BitBuffer, EncodeError> {
        let capacity = micro_capacity(self.version, self.level)
            .ok_or_else(|| invalid_pair(self.version, self.level))?;
        let mut buf = BitBuffer::with_capacity(capacity.data_bits);
        for segment in &self.segments {
            encode_segment(&self.version, segment, &mut buf)?;
        }
        if buf.len() > capacity.data_bits {
            return Err(EncodeError::DataTooLong {
                bits: buf.len(),
                capacity: capacity.data_bits,
            });
        }
        let terminator = self.version.terminator_bits().min(capacity.data_bits - buf.len());
        buf.append_zeros(terminator);
        buf.byte_align_with_padding(capacity.data_bits)?;
        Ok(buf)
    }

    /// Render the symbol
    pub fn encode(&self) -> Result<Bitmap, EncodeError> {
        self.encode_with_mask().map(|(img, _)| img)
    }

    /// Render the symbol and report the mask that was applied
    pub fn encode_with_mask(&self) -> Result<(Bitmap, MicroMask), EncodeError> {
        let number = self.symbol_number()?;
        let capacity = micro_capacity(self.version, self.level)
            .ok_or_else(|| invalid_pair(self.version, self.level))?;
        let data = self.data_codewords()?;
        // a half codeword sits in the high nibble of its byte
        let codewords = interleave(data.bytes(), capacity)?;

        let mut bits = BitBuffer::with_capacity(free_modules(self.version));
        bits.append_prefix(&data, capacity.data_bits);
        bits.append_bytes(&codewords[capacity.data..]);
        bits.append_zeros(capacity.remainder_bits);

        let sb = micro_base(self.version);
        let mut img = sb.base.clone();
        place(&mut img, &sb.used, Zigzag::micro(self.version.size()), &mut bits);

        let render = |mask: MicroMask| {
            let mut candidate = img.clone();
            candidate.mask(&sb.used, mask_bitmap(mask.pattern()));
            write_micro_format(&mut candidate, number, mask);
            candidate
        };
        match self.mask {
            Some(mask) => Ok((render(mask), mask)),
            None => select_mask(&MicroMask::ALL, render, |img| -micro_score(img))
                .map(|(mask, img)| (img, mask))
                .ok_or_else(|| EncodeError::InternalCapacity("no mask candidates".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_widths() {
        let m1 = MicroVersion::M1;
        assert_eq!(
            m1.header(Mode::Numeric),
            Some(ModeHeader {
                indicator: 0,
                indicator_bits: 0,
                count_bits: 3
            })
        );
        assert!(m1.header(Mode::Alphanumeric).is_none());
        assert!(MicroVersion::M2.header(Mode::Bytes).is_none());
        assert!(MicroVersion::M3.header(Mode::Kanji).is_none());
        let m4 = MicroVersion::M4.header(Mode::Kanji).unwrap();
        assert_eq!((m4.indicator, m4.indicator_bits, m4.count_bits), (3, 3, 4));
        assert_eq!(MicroVersion::M3.header(Mode::Bytes).unwrap().count_bits, 4);
        assert_eq!(
            MicroVersion::ALL.map(|v| v.terminator_bits()),
            [3, 5, 7, 9]
        );
    }

    #[test]
    fn test_m1_numeric_codewords() {
        let code = MicroQrCode::with_segments(MicroVersion::M1, ECLevel::L, vec![Segment::numeric("12345")]);
        let data = code.data_codewords().unwrap();
        // 101 + 0001111011 + 0101101 fills all 20 bits, no room for a terminator
        assert_eq!(data.len(), 20);
        assert_eq!(data.bytes(), &[0b1010_0011, 0b1101_1010, 0b1101_0000]);
    }

    #[test]
    fn test_m2_numeric_symbol() {
        let mut code =
            MicroQrCode::with_segments(MicroVersion::M2, ECLevel::L, vec![Segment::numeric("01234567")]);
        code.mask = Some(MicroMask::Pattern1);
        let data = code.data_codewords().unwrap();
        assert_eq!(data.bytes(), &[0x40, 0x18, 0xAC, 0xC3, 0x00]);

        let expected: [u8; 10] = [0x40, 0x18, 0xAC, 0xC3, 0x00, 0x86, 0x0D, 0x22, 0xAE, 0x30];
        let capacity = micro_capacity(MicroVersion::M2, ECLevel::L).unwrap();
        assert_eq!(interleave(data.bytes(), capacity).unwrap(), expected);

        // unmask the data cells and read them back in placement order
        let img = code.encode().unwrap();
        let sb = micro_base(MicroVersion::M2);
        let mask = mask_bitmap(MicroMask::Pattern1.pattern());
        let read: Vec<bool> = Zigzag::micro(13)
            .cells(&sb.used)
            .map(|(x, y)| img.get(x, y) ^ mask.get(x, y))
            .collect();
        let bits: Vec<bool> = expected
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
            .collect();
        assert_eq!(read, bits);

        // function patterns and format information survive masking
        for (x, y) in [(0, 0), (6, 6), (8, 0), (12, 0), (0, 12)] {
            assert_eq!(img.get(x, y), sb.base.get(x, y), "({x}, {y})");
        }
        let format = crate::encoder::format::micro_format_bits(1, MicroMask::Pattern1);
        for i in 0..8 {
            assert_eq!(img.get(i + 1, 8), (format >> (14 - i)) & 1 == 1);
        }
    }

    #[test]
    fn test_auto_version() {
        let code = MicroQrCode::new("12345", ECLevel::L).unwrap();
        assert_eq!(code.version, MicroVersion::M1);
        let code = MicroQrCode::new("HELLO", ECLevel::L).unwrap();
        assert_eq!(code.version, MicroVersion::M2);
        let code = MicroQrCode::new("hello", ECLevel::M).unwrap();
        assert_eq!(code.version, MicroVersion::M3);
        assert!(matches!(
            MicroQrCode::new("1", ECLevel::H),
            Err(EncodeError::InvalidVersion(_))
        ));
        assert!(matches!(
            MicroQrCode::new("x".repeat(40), ECLevel::L),
            Err(EncodeError::DataTooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_level_pair() {
        let code = MicroQrCode::with_segments(MicroVersion::M2, ECLevel::Q, vec![Segment::numeric("1")]);
        assert!(matches!(code.encode(), Err(EncodeError::InvalidVersion(_))));
    }

    #[test]
    fn test_bytes_rejected_by_m2() {
        let code = MicroQrCode::with_segments(MicroVersion::M2, ECLevel::L, vec![Segment::bytes("a")]);
        assert!(matches!(code.encode(), Err(EncodeError::InvalidMode { .. })));
    }

    #[test]
    fn test_encode_layout() {
        for (data, level) in [("01234567", ECLevel::L), ("MICRO QR", ECLevel::M), ("micro", ECLevel::Q)] {
            let code = MicroQrCode::new(data, level).unwrap();
            let (img, mask) = code.encode_with_mask().unwrap();
            let size = code.version.size();
            assert_eq!((img.width(), img.height()), (size, size));
            assert!(img.get(0, 0) && img.get(3, 3) && !img.get(1, 1));
            assert!(!img.get(7, 7));

            let best = micro_score(&img);
            for other in MicroMask::ALL {
                let mut fixed = code.clone();
                fixed.mask = Some(other);
                assert!(micro_score(&fixed.encode().unwrap()) <= best, "{other:?} beats {mask:?}");
            }
        }
    }

    #[test]
    fn test_format_cells_carry_symbol_number() {
        let mut code = MicroQrCode::new("HELLO", ECLevel::L).unwrap();
        code.mask = Some(MicroMask::Pattern2);
        let img = code.encode().unwrap();
        let bits = crate::encoder::format::micro_format_bits(1, MicroMask::Pattern2);
        for i in 0..8 {
            assert_eq!(img.get(8, i + 1), (bits >> i) & 1 == 1);
        }
    }
}
