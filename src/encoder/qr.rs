use crate::encoder::base::{mask_bitmap, qr_base};
use crate::encoder::config::EncodeOptions;
use crate::encoder::error::EncodeError;
use crate::encoder::format::{write_qr_format, write_qr_version};
use crate::encoder::interleave::interleave;
use crate::encoder::mask::{qr_penalty, select_mask};
use crate::encoder::placement::{Zigzag, place};
use crate::encoder::segment::{ModeHeader, SegmentLayout, encode_segment};
use crate::encoder::segmenter::select_version;
use crate::encoder::tables::qr_capacity;
use crate::models::{Bitmap, ECLevel, MaskPattern, Mode, Segment, Version};
use crate::utils::BitBuffer;

impl SegmentLayout for Version {
    fn header(&self, mode: Mode) -> Option<ModeHeader> {
        let group = match self.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let (indicator, widths) = match mode {
            Mode::Numeric => (0b0001, [10, 12, 14]),
            Mode::Alphanumeric => (0b0010, [9, 11, 13]),
            Mode::Bytes => (0b0100, [8, 16, 16]),
            Mode::Kanji => (0b1000, [8, 10, 12]),
        };
        Some(ModeHeader {
            indicator,
            indicator_bits: 4,
            count_bits: widths[group],
        })
    }

    fn terminator_bits(&self) -> usize {
        4
    }
}

/// Standard QR symbol description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    /// Symbol version (1-40)
    pub version: Version,
    /// Error correction level
    pub level: ECLevel,
    /// Mask pattern; `None` picks the lowest-penalty mask
    pub mask: Option<MaskPattern>,
    /// Payload segments in order
    pub segments: Vec<Segment>,
}

impl QrCode {
    /// Describe a symbol with explicit version and segments
    pub fn with_segments(version: Version, level: ECLevel, segments: Vec<Segment>) -> Self {
        Self {
            version,
            level,
            mask: None,
            segments,
        }
    }

    /// Segment `data` automatically and pick the smallest version that holds it
    pub fn new(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Self, EncodeError> {
        Self::new_with(data, &EncodeOptions::with_level(level))
    }

    /// Like [`QrCode::new`], with mask and Kanji settings taken from `options`
    pub fn new_with(data: impl AsRef<[u8]>, options: &EncodeOptions) -> Result<Self, EncodeError> {
        let mask = match options.mask {
            Some(bits) => Some(MaskPattern::from_bits(bits).ok_or_else(|| {
                EncodeError::InvalidVersion(format!("QR mask {bits} outside 0-7"))
            })?),
            None => None,
        };
        let level = options.level;
        let candidates = Version::all().map(|v| (v, qr_capacity(v, level).data_bits));
        let (version, segments) = select_version(data.as_ref(), candidates, options.kanji)?;
        Ok(Self {
            version,
            level,
            mask,
            segments,
        })
    }

    /// Padded data codewords of the symbol
    pub fn data_codewords(&self) -> Result<BitBuffer, EncodeError> {
        let capacity = qr_capacity(self.version, self.level);
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
    pub fn encode_with_mask(&self) -> Result<(Bitmap, MaskPattern), EncodeError> {
        let capacity = qr_capacity(self.version, self.level);
        let data = self.data_codewords()?;
        let codewords = interleave(data.bytes(), capacity)?;

        let mut bits = BitBuffer::from_bytes(&codewords);
        bits.append_zeros(capacity.remainder_bits);

        let sb = qr_base(self.version);
        let mut img = sb.base.clone();
        place(&mut img, &sb.used, Zigzag::qr(self.version.size()), &mut bits);
        write_qr_version(&mut img, self.version);

        let render = |mask: MaskPattern| {
            let mut candidate = img.clone();
            write_qr_format(&mut candidate, self.level, mask);
            candidate.mask(&sb.used, mask_bitmap(mask));
            candidate
        };
        match self.mask {
            Some(mask) => Ok((render(mask), mask)),
            None => select_mask(&MaskPattern::ALL, render, qr_penalty)
                .map(|(mask, img)| (img, mask))
                .ok_or_else(|| EncodeError::InternalCapacity("no mask candidates".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_count_widths_by_group() {
        let widths = |v: u8| {
            Mode::ALL.map(|m| version(v).header(m).map(|h| h.count_bits).unwrap_or(0))
        };
        assert_eq!(widths(1), [10, 9, 8, 8]);
        assert_eq!(widths(9), [10, 9, 8, 8]);
        assert_eq!(widths(10), [12, 11, 16, 10]);
        assert_eq!(widths(27), [14, 13, 16, 12]);
    }

    #[test]
    fn test_hello_world_codewords() {
        let qr = QrCode::with_segments(
            version(1),
            ECLevel::M,
            vec![Segment::alphanumeric("HELLO WORLD")],
        );
        let data = qr.data_codewords().unwrap();
        assert_eq!(
            data.bytes(),
            &[32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
        );
    }

    #[test]
    fn test_auto_version() {
        let qr = QrCode::new("HELLO WORLD", ECLevel::Q).unwrap();
        assert_eq!(qr.version.number(), 1);
        assert_eq!(qr.segments, vec![Segment::alphanumeric("HELLO WORLD")]);

        let long = "A".repeat(500);
        let qr = QrCode::new(&long, ECLevel::L).unwrap();
        assert!(qr.version.number() > 10);
        assert!(QrCode::new(vec![0u8; 3000], ECLevel::L).is_err());
    }

    #[test]
    fn test_encode_dimensions_and_dark_module() {
        let qr = QrCode::new("https://example.com/", ECLevel::M).unwrap();
        let img = qr.encode().unwrap();
        let size = qr.version.size();
        assert_eq!((img.width(), img.height()), (size, size));
        assert!(img.get(8, size as i32 - 8));
        // finder patterns are untouched by masking
        assert!(img.get(0, 0) && img.get(3, 3) && !img.get(1, 1));
    }

    #[test]
    fn test_explicit_mask_is_honoured() {
        let mut qr = QrCode::new("12345", ECLevel::H).unwrap();
        qr.mask = Some(MaskPattern::Pattern5);
        let (_, mask) = qr.encode_with_mask().unwrap();
        assert_eq!(mask, MaskPattern::Pattern5);

        let opts = EncodeOptions::with_level(ECLevel::L).mask(9);
        assert!(matches!(
            QrCode::new_with("1", &opts),
            Err(EncodeError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_auto_mask_has_lowest_penalty() {
        let qr = QrCode::new("MASK SELECTION 0123456789", ECLevel::M).unwrap();
        let (img, chosen) = qr.encode_with_mask().unwrap();
        let best = qr_penalty(&img);
        for mask in MaskPattern::ALL {
            let mut fixed = qr.clone();
            fixed.mask = Some(mask);
            let penalty = qr_penalty(&fixed.encode().unwrap());
            assert!(penalty >= best, "{mask:?} beats {chosen:?}");
        }
    }

    #[test]
    fn test_data_too_long() {
        let qr = QrCode::with_segments(version(1), ECLevel::H, vec![Segment::bytes(vec![0; 10])]);
        assert!(matches!(
            qr.encode(),
            Err(EncodeError::DataTooLong {
                bits: 92,
                capacity: 72
            })
        ));
    }
}
