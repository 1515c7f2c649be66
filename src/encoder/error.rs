use std::fmt;

use crate::models::Mode;

/// Everything that can go wrong while building a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A segment byte is outside its mode's alphabet
    InvalidCharacter {
        /// Mode of the offending segment
        mode: Mode,
        /// First offending byte
        byte: u8,
    },
    /// The bit stream does not fit the data capacity
    DataTooLong {
        /// Bits required
        bits: usize,
        /// Bits available (0 when no version fits at all)
        capacity: usize,
    },
    /// Version outside the family, or incompatible with the level
    InvalidVersion(String),
    /// Mode not supported by the family/version
    InvalidMode {
        /// Requested mode
        mode: Mode,
        /// Symbol version the mode was requested for
        version: String,
    },
    /// Capacity tables disagree with their block sums
    InternalCapacity(String),
    /// A value does not fit the requested bit width
    BitOverflow {
        /// Value to append
        value: u64,
        /// Requested width
        bits: u32,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidCharacter { mode, byte } => {
                write!(f, "invalid character 0x{byte:02x} in {mode:?} mode")
            }
            EncodeError::DataTooLong { bits, capacity } => {
                write!(f, "data too long: {bits} bits, capacity {capacity} bits")
            }
            EncodeError::InvalidVersion(msg) => write!(f, "invalid version: {msg}"),
            EncodeError::InvalidMode { mode, version } => {
                write!(f, "{mode:?} mode is not available in version {version}")
            }
            EncodeError::InternalCapacity(msg) => write!(f, "inconsistent capacity table: {msg}"),
            EncodeError::BitOverflow { value, bits } => {
                write!(f, "value {value} does not fit in {bits} bits")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = EncodeError::InvalidCharacter {
            mode: Mode::Numeric,
            byte: b'a',
        };
        assert_eq!(err.to_string(), "invalid character 0x61 in Numeric mode");

        let err = EncodeError::DataTooLong {
            bits: 50,
            capacity: 48,
        };
        assert_eq!(err.to_string(), "data too long: 50 bits, capacity 48 bits");
    }
}
