//! Append-only bit stream, MSB-first within each byte

use crate::encoder::error::EncodeError;

/// Pad codewords appended after the terminator, alternating
pub const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Growable bit buffer with a separate read cursor.
///
/// Bits past `len` in the last byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    len: usize,
    cursor: usize,
}

impl BitBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
            cursor: 0,
        }
    }

    /// Buffer holding whole bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            len: bytes.len() * 8,
            cursor: 0,
        }
    }

    /// Length in bits
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no bits were appended
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the low `bits` bits of `value`, MSB first.
    ///
    /// Fails when `bits > 64` or `value >= 2^bits`.
    pub fn append(&mut self, value: u64, bits: u32) -> Result<(), EncodeError> {
        if bits > 64 || (bits < 64 && value >> bits != 0) {
            return Err(EncodeError::BitOverflow { value, bits });
        }
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Append one bit
    pub fn push_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Append `count` zero bits
    pub fn append_zeros(&mut self, count: usize) {
        for _ in 0..count {
            self.push_bit(false);
        }
    }

    /// Append whole bytes
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if self.len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.len += bytes.len() * 8;
            return;
        }
        for &b in bytes {
            for i in (0..8).rev() {
                self.push_bit((b >> i) & 1 == 1);
            }
        }
    }

    /// Append the first `bits` bits of `other`
    pub fn append_prefix(&mut self, other: &BitBuffer, bits: usize) {
        for i in 0..bits.min(other.len) {
            self.push_bit(other.bit(i));
        }
    }

    /// Bit at absolute position `index`
    pub fn bit(&self, index: usize) -> bool {
        index < self.len && (self.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Read the next bit, `None` at end of stream
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.cursor >= self.len {
            return None;
        }
        let bit = self.bit(self.cursor);
        self.cursor += 1;
        Some(bit)
    }

    /// Bits not yet consumed by `read_bit`
    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    /// Move the read cursor back to the start
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Backing bytes, `ceil(len / 8)` long
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Zero-fill to the next byte boundary
    pub fn byte_align(&mut self) {
        let pad = (8 - self.len % 8) % 8;
        self.append_zeros(pad);
    }

    /// Fill the data region up to `data_bits`.
    ///
    /// Zero-fills to a byte boundary, appends alternating [`PAD_BYTES`] while a
    /// whole byte still fits, then zero-fills any trailing half codeword.
    pub fn byte_align_with_padding(&mut self, data_bits: usize) -> Result<(), EncodeError> {
        if self.len > data_bits {
            return Err(EncodeError::DataTooLong {
                bits: self.len,
                capacity: data_bits,
            });
        }
        let aligned = self.len.next_multiple_of(8).min(data_bits);
        self.append_zeros(aligned - self.len);
        let mut i = 0;
        while self.len + 8 <= data_bits {
            self.append_bytes(&[PAD_BYTES[i % 2]]);
            i += 1;
        }
        self.append_zeros(data_bits - self.len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_msb_first() {
        let mut buf = BitBuffer::new();
        buf.append(0b101, 3).unwrap();
        buf.append(0b1, 1).unwrap();
        buf.append(0xFF, 8).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.bytes(), &[0b1011_1111, 0b1111_0000]);
    }

    #[test]
    fn test_append_rejects_wide_values() {
        let mut buf = BitBuffer::new();
        assert_eq!(
            buf.append(8, 3),
            Err(EncodeError::BitOverflow { value: 8, bits: 3 })
        );
        assert!(buf.append(0, 65).is_err());
        assert!(buf.append(u64::MAX, 64).is_ok());
        assert_eq!(buf.len(), 64);
    }

    #[test]
    fn test_read_bits() {
        let mut buf = BitBuffer::from_bytes(&[0b1010_0000]);
        buf.append(1, 1).unwrap();
        let bits: Vec<bool> = std::iter::from_fn(|| buf.read_bit()).collect();
        assert_eq!(bits.len(), 9);
        assert_eq!(&bits[..4], &[true, false, true, false]);
        assert!(bits[8]);
        assert_eq!(buf.read_bit(), None);
        buf.rewind();
        assert_eq!(buf.remaining(), 9);
    }

    #[test]
    fn test_padding_alternates() {
        let mut buf = BitBuffer::new();
        buf.append(0b1, 1).unwrap();
        buf.byte_align_with_padding(32).unwrap();
        assert_eq!(buf.bytes(), &[0x80, 0xEC, 0x11, 0xEC]);
    }

    #[test]
    fn test_padding_half_codeword() {
        // M1 style: 20 data bits, last codeword is 4 bits
        let mut buf = BitBuffer::new();
        buf.append(0b111, 3).unwrap();
        buf.byte_align_with_padding(20).unwrap();
        assert_eq!(buf.len(), 20);
        assert_eq!(buf.bytes(), &[0xE0, 0xEC, 0x00]);
    }

    #[test]
    fn test_padding_overflow() {
        let mut buf = BitBuffer::new();
        buf.append(0, 10).unwrap();
        assert_eq!(
            buf.byte_align_with_padding(8),
            Err(EncodeError::DataTooLong {
                bits: 10,
                capacity: 8
            })
        );
    }
}
