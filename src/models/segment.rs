/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
pub const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const fn build_alphanumeric_lookup() -> [i8; 256] {
    let mut lookup = [-1i8; 256];
    let mut i = 0;
    while i < ALPHANUMERIC_TABLE.len() {
        lookup[ALPHANUMERIC_TABLE[i] as usize] = i as i8;
        i += 1;
    }
    lookup
}

static ALPHANUMERIC_LOOKUP: [i8; 256] = build_alphanumeric_lookup();

/// Index of `byte` in the alphanumeric table
pub fn alphanumeric_value(byte: u8) -> Option<u16> {
    let v = ALPHANUMERIC_LOOKUP[byte as usize];
    (v >= 0).then_some(v as u16)
}

/// Convert a Shift-JIS double-byte character to its 13-bit Kanji value
pub fn kanji_value(hi: u8, lo: u8) -> Option<u16> {
    if !(0x40..=0xFC).contains(&lo) || lo == 0x7F {
        return None;
    }
    let code = u16::from(hi) << 8 | u16::from(lo);
    let offset = match code {
        0x8140..=0x9FFC => code - 0x8140,
        0xE040..=0xEBBF => code - 0xC140,
        _ => return None,
    };
    Some((offset >> 8) * 0xC0 + (offset & 0xFF))
}

/// Data mode of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Digits 0-9, three per 10 bits
    Numeric = 0,
    /// 45-character set, two per 11 bits
    Alphanumeric = 1,
    /// Raw 8-bit bytes
    Bytes = 2,
    /// Shift-JIS double-byte characters, 13 bits each
    Kanji = 3,
}

impl Mode {
    /// All modes in tie-break order
    pub const ALL: [Mode; 4] = [Mode::Numeric, Mode::Alphanumeric, Mode::Bytes, Mode::Kanji];

    /// Whether `data` is a valid payload for this mode
    pub fn accepts(&self, data: &[u8]) -> bool {
        match self {
            Mode::Numeric => data.iter().all(u8::is_ascii_digit),
            Mode::Alphanumeric => data.iter().all(|&b| alphanumeric_value(b).is_some()),
            Mode::Bytes => true,
            Mode::Kanji => {
                data.len() % 2 == 0 && data.chunks(2).all(|c| kanji_value(c[0], c[1]).is_some())
            }
        }
    }

    /// Number of characters `data` holds in this mode
    pub fn char_count(&self, data: &[u8]) -> usize {
        match self {
            Mode::Kanji => data.len() / 2,
            _ => data.len(),
        }
    }

    /// Payload bits (without header) for `count` characters
    pub fn payload_bits(&self, count: usize) -> usize {
        match self {
            Mode::Numeric => 10 * (count / 3) + [0, 4, 7][count % 3],
            Mode::Alphanumeric => 11 * (count / 2) + 6 * (count % 2),
            Mode::Bytes => 8 * count,
            Mode::Kanji => 13 * count,
        }
    }
}

/// Typed run of payload bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Encoding mode
    pub mode: Mode,
    /// Raw bytes (ASCII digits, alphanumerics, bytes or Shift-JIS pairs)
    pub data: Vec<u8>,
}

impl Segment {
    /// Create a segment
    pub fn new(mode: Mode, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mode,
            data: data.into(),
        }
    }

    /// Numeric segment
    pub fn numeric(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Mode::Numeric, data)
    }

    /// Alphanumeric segment
    pub fn alphanumeric(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Mode::Alphanumeric, data)
    }

    /// Byte segment
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Mode::Bytes, data)
    }

    /// Kanji segment (Shift-JIS encoded)
    pub fn kanji(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Mode::Kanji, data)
    }

    /// Number of characters in the segment
    pub fn char_count(&self) -> usize {
        self.mode.char_count(&self.data)
    }
}
