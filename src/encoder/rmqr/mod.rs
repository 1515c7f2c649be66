//! Rectangular Micro QR symbols (rMQR)
//!
//! 32 shapes from R7x43 to R17x139, levels M and H only. The mask is fixed
//! to pattern 4, so there is no penalty evaluation.

mod tables;

pub use tables::{alignment_columns, rmqr_base, rmqr_capacity};

use crate::encoder::base::mask_bitmap;
use crate::encoder::config::EncodeOptions;
use crate::encoder::error::EncodeError;
use crate::encoder::format::write_rmqr_format;
use crate::encoder::interleave::interleave;
use crate::encoder::placement::{Zigzag, place};
use crate::encoder::segment::{ModeHeader, SegmentLayout, encode_segment};
use crate::encoder::segmenter::select_version;
use crate::models::{Bitmap, ECLevel, MaskPattern, Mode, RmqrVersion, Segment};
use crate::utils::BitBuffer;

/// The only mask rMQR uses
pub const RMQR_MASK: MaskPattern = MaskPattern::Pattern4;

impl SegmentLayout for RmqrVersion {
    fn header(&self, mode: Mode) -> Option<ModeHeader> {
        Some(ModeHeader {
            indicator: mode as u64 + 1,
            indicator_bits: 3,
            count_bits: tables::COUNT_BITS[self.index()][mode as usize],
        })
    }

    fn terminator_bits(&self) -> usize {
        3
    }
}

fn unsupported_level(version: RmqrVersion, level: ECLevel) -> EncodeError {
    EncodeError::InvalidVersion(format!("{version}-{level}: rMQR supports levels M and H only"))
}

/// rMQR symbol description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmqrCode {
    /// Symbol shape
    pub version: RmqrVersion,
    /// Error correction level (M or H)
    pub level: ECLevel,
    /// Payload segments in order
    pub segments: Vec<Segment>,
}

impl RmqrCode {
    /// Describe a symbol with explicit shape and segments
    pub fn with_segments(version: RmqrVersion, level: ECLevel, segments: Vec<Segment>) -> Self {
        Self {
            version,
            level,
            segments,
        }
    }

    /// Segment `data` and pick the first shape, in version indicator order,
    /// that holds it
    pub fn new(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Self, EncodeError> {
        Self::new_with(data, &EncodeOptions::with_level(level))
    }

    /// Like [`RmqrCode::new`], with Kanji settings taken from `options`.
    /// The mask setting is ignored.
    pub fn new_with(data: impl AsRef<[u8]>, options: &EncodeOptions) -> Result<Self, EncodeError> {
        let level = options.level;
        if rmqr_capacity(RmqrVersion::R7x43, level).is_none() {
            return Err(unsupported_level(RmqrVersion::R7x43, level));
        }
        let candidates = RmqrVersion::ALL
            .iter()
            .filter_map(|&v| rmqr_capacity(v, level).map(|c| (v, c.data_bits)));
        let (version, segments) = select_version(data.as_ref(), candidates, options.kanji)?;
        Ok(Self {
            version,
            level,
            segments,
        })
    }

    /// Padded data codewords of the symbol
    pub fn data_codewords(&self) -> Result<BitBuffer, EncodeError> {
        let capacity = rmqr_capacity(self.version, self.level)
            .ok_or_else(|| unsupported_level(self.version, self.level))?;
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
        let capacity = rmqr_capacity(self.version, self.level)
            .ok_or_else(|| unsupported_level(self.version, self.level))?;
        let data = self.data_codewords()?;
        let codewords = interleave(data.bytes(), capacity)?;

        let mut bits = BitBuffer::from_bytes(&codewords);
        bits.append_zeros(capacity.remainder_bits);

        let sb = rmqr_base(self.version);
        let mut img = sb.base.clone();
        place(&mut img, &sb.used, Zigzag::rmqr(self.version.width()), &mut bits);
        img.mask(&sb.used, mask_bitmap(RMQR_MASK));
        write_rmqr_format(&mut img, self.version, self.level);

        #[cfg(debug_assertions)]
        if cfg!(debug_assertions) && crate::debug::debug_enabled() {
            eprintln!(
                "RMQR: {}-{} {} codewords, {} dark modules",
                self.version,
                self.level,
                codewords.len(),
                img.popcount()
            );
        }

        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let h = RmqrVersion::R7x43.header(Mode::Bytes).unwrap();
        assert_eq!((h.indicator, h.indicator_bits, h.count_bits), (3, 3, 3));
        let h = RmqrVersion::R17x139.header(Mode::Kanji).unwrap();
        assert_eq!((h.indicator, h.count_bits), (4, 7));
        assert_eq!(RmqrVersion::R11x27.header(Mode::Numeric).unwrap().count_bits, 4);
    }

    #[test]
    fn test_level_restriction() {
        assert!(matches!(
            RmqrCode::new("1", ECLevel::L),
            Err(EncodeError::InvalidVersion(_))
        ));
        let code = RmqrCode::with_segments(RmqrVersion::R7x43, ECLevel::Q, vec![Segment::numeric("1")]);
        assert!(matches!(code.encode(), Err(EncodeError::InvalidVersion(_))));
    }

    #[test]
    fn test_auto_selection_uses_table_order() {
        let code = RmqrCode::new("123456789012", ECLevel::M).unwrap();
        assert_eq!(code.version, RmqrVersion::R7x43);
        assert_eq!(code.segments, vec![Segment::numeric("123456789012")]);

        // 13 digits overflow R7x43 (48 bits) and land in R7x59
        let code = RmqrCode::new("1234567890123", ECLevel::M).unwrap();
        assert_eq!(code.version, RmqrVersion::R7x59);

        assert!(matches!(
            RmqrCode::new(vec![b'a'; 400], ECLevel::H),
            Err(EncodeError::DataTooLong { .. })
        ));
    }

    #[test]
    fn test_dimensions() {
        let code = RmqrCode::new("HELLO", ECLevel::H).unwrap();
        let img = code.encode().unwrap();
        assert_eq!(img.width(), code.version.width());
        assert_eq!(img.height(), code.version.height());
    }
}
