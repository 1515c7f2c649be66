use std::fmt;

use crate::encoder::error::EncodeError;
use crate::models::segment::{alphanumeric_value, kanji_value};
use crate::models::{Mode, Segment};
use crate::utils::BitBuffer;

/// Mode indicator and character-count widths of one mode in one version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeHeader {
    /// Mode indicator value
    pub indicator: u64,
    /// Mode indicator width (0 for M1)
    pub indicator_bits: u32,
    /// Character-count indicator width
    pub count_bits: u32,
}

impl ModeHeader {
    /// Header width in bits
    pub fn bits(&self) -> usize {
        (self.indicator_bits + self.count_bits) as usize
    }

    /// Largest character count the count indicator can hold
    pub fn max_count(&self) -> usize {
        (1usize << self.count_bits) - 1
    }
}

/// Per-version bit-stream rules of a symbol family
pub trait SegmentLayout: Copy + fmt::Display {
    /// Header for `mode`, `None` when the version cannot carry it
    fn header(&self, mode: Mode) -> Option<ModeHeader>;

    /// Width of the all-zero terminator
    fn terminator_bits(&self) -> usize;
}

/// Bits a segment of `count` characters occupies, header included
pub fn segment_bits<L: SegmentLayout>(layout: &L, mode: Mode, count: usize) -> Option<usize> {
    let header = layout.header(mode)?;
    if count > header.max_count() {
        return None;
    }
    Some(header.bits() + mode.payload_bits(count))
}

/// Bits all segments occupy, `None` if any of them cannot be encoded
pub fn total_bits<L: SegmentLayout>(layout: &L, segments: &[Segment]) -> Option<usize> {
    segments
        .iter()
        .map(|s| segment_bits(layout, s.mode, s.char_count()))
        .sum()
}

fn invalid_byte(segment: &Segment) -> Option<u8> {
    match segment.mode {
        Mode::Numeric => segment.data.iter().copied().find(|b| !b.is_ascii_digit()),
        Mode::Alphanumeric => segment
            .data
            .iter()
            .copied()
            .find(|&b| alphanumeric_value(b).is_none()),
        Mode::Bytes => None,
        Mode::Kanji => {
            let mut pairs = segment.data.chunks(2);
            pairs.find_map(|pair| match pair {
                [hi, lo] if kanji_value(*hi, *lo).is_some() => None,
                [hi, ..] => Some(*hi),
                [] => None,
            })
        }
    }
}

/// Append one segment (header and payload) to `buf`
pub fn encode_segment<L: SegmentLayout>(
    layout: &L,
    segment: &Segment,
    buf: &mut BitBuffer,
) -> Result<(), EncodeError> {
    let header = layout.header(segment.mode).ok_or_else(|| EncodeError::InvalidMode {
        mode: segment.mode,
        version: layout.to_string(),
    })?;
    if let Some(byte) = invalid_byte(segment) {
        return Err(EncodeError::InvalidCharacter {
            mode: segment.mode,
            byte,
        });
    }
    let count = segment.char_count();
    if count > header.max_count() {
        return Err(EncodeError::DataTooLong {
            bits: header.bits() + segment.mode.payload_bits(count),
            capacity: header.bits() + segment.mode.payload_bits(header.max_count()),
        });
    }

    buf.append(header.indicator, header.indicator_bits)?;
    buf.append(count as u64, header.count_bits)?;

    let data = &segment.data;
    match segment.mode {
        Mode::Numeric => {
            for chunk in data.chunks(3) {
                let value = chunk
                    .iter()
                    .fold(0u64, |acc, &b| acc * 10 + u64::from(b - b'0'));
                let bits = [0, 4, 7, 10][chunk.len()];
                buf.append(value, bits)?;
            }
        }
        Mode::Alphanumeric => {
            for chunk in data.chunks(2) {
                let values: Vec<u64> = chunk
                    .iter()
                    .filter_map(|&b| alphanumeric_value(b))
                    .map(u64::from)
                    .collect();
                match values[..] {
                    [a, b] => buf.append(a * 45 + b, 11)?,
                    [a] => buf.append(a, 6)?,
                    _ => {}
                }
            }
        }
        Mode::Bytes => buf.append_bytes(data),
        Mode::Kanji => {
            for pair in data.chunks_exact(2) {
                if let Some(value) = kanji_value(pair[0], pair[1]) {
                    buf.append(u64::from(value), 13)?;
                }
            }
        }
    }
    Ok(())
}
