use std::sync::OnceLock;

use rayon::prelude::*;

use crate::encoder::base::SymbolBase;
use crate::encoder::tables::{Block, Capacity};
use crate::models::{ECLevel, MicroVersion};

/// (version, level, total codewords, data codewords, data bits)
const MICRO_CAPACITY: [(MicroVersion, ECLevel, usize, usize, usize); 8] = [
    (MicroVersion::M1, ECLevel::L, 5, 3, 20),
    (MicroVersion::M2, ECLevel::L, 10, 5, 40),
    (MicroVersion::M2, ECLevel::M, 10, 4, 32),
    (MicroVersion::M3, ECLevel::L, 17, 11, 84),
    (MicroVersion::M3, ECLevel::M, 17, 9, 68),
    (MicroVersion::M4, ECLevel::L, 24, 16, 128),
    (MicroVersion::M4, ECLevel::M, 24, 14, 112),
    (MicroVersion::M4, ECLevel::Q, 24, 10, 80),
];

/// Symbol number (format information field) of a version/level pair.
/// M1 is error detection only and is addressed as level L.
pub fn symbol_number(version: MicroVersion, level: ECLevel) -> Option<u8> {
    MICRO_CAPACITY
        .iter()
        .position(|&(v, l, ..)| v == version && l == level)
        .map(|i| i as u8)
}

fn build_capacity(index: usize) -> Capacity {
    let (version, _, total, data, data_bits) = MICRO_CAPACITY[index];
    let free = free_modules(version);
    let ecc_bits = (total - data) * 8;
    let mut capacity = Capacity::new(total, &[Block::new(1, total, data)], free - data_bits - ecc_bits);
    capacity.data_bits = data_bits;
    capacity
}

static CAPACITIES: OnceLock<Vec<Capacity>> = OnceLock::new();

/// Codeword budget of a version/level pair, `None` when the pair does not exist
pub fn micro_capacity(version: MicroVersion, level: ECLevel) -> Option<&'static Capacity> {
    let capacities =
        CAPACITIES.get_or_init(|| (0..MICRO_CAPACITY.len()).map(build_capacity).collect());
    symbol_number(version, level).map(|n| &capacities[n as usize])
}

/// Cells left for codewords once function patterns are reserved
pub fn free_modules(version: MicroVersion) -> usize {
    let size = version.size();
    // finder + separator (64), two timing tails, 15 format cells
    size * size - 64 - 2 * (size - 8) - 15
}

fn build_micro_base(version: MicroVersion) -> SymbolBase {
    let size = version.size();
    let mut sb = SymbolBase::new(size, size);
    for i in 0..size as i32 {
        sb.put(i, 0, i % 2 == 0);
        sb.put(0, i, i % 2 == 0);
    }
    sb.finder(0, 0, 1, 1);
    for i in 1..=8 {
        sb.reserve(8, i);
        sb.reserve(i, 8);
    }
    sb
}

static MICRO_BASES: OnceLock<Vec<SymbolBase>> = OnceLock::new();

/// Base and used bitmaps of a Micro QR version
pub fn micro_base(version: MicroVersion) -> &'static SymbolBase {
    let bases = MICRO_BASES
        .get_or_init(|| MicroVersion::ALL.par_iter().map(|&v| build_micro_base(v)).collect());
    &bases[version.number() as usize - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_numbers() {
        assert_eq!(symbol_number(MicroVersion::M1, ECLevel::L), Some(0));
        assert_eq!(symbol_number(MicroVersion::M3, ECLevel::M), Some(4));
        assert_eq!(symbol_number(MicroVersion::M4, ECLevel::Q), Some(7));
        assert_eq!(symbol_number(MicroVersion::M1, ECLevel::M), None);
        assert_eq!(symbol_number(MicroVersion::M4, ECLevel::H), None);
    }

    #[test]
    fn test_free_modules_match_base() {
        for version in MicroVersion::ALL {
            let sb = micro_base(version);
            let free = version.size() * version.size() - sb.used.popcount();
            assert_eq!(free, free_modules(version), "{version}");
        }
        assert_eq!(
            MicroVersion::ALL.map(free_modules),
            [36, 80, 132, 192]
        );
    }

    #[test]
    fn test_capacities_fill_symbol() {
        for &(version, level, ..) in &MICRO_CAPACITY {
            let cap = micro_capacity(version, level).unwrap();
            cap.validate().unwrap();
            let ecc = (cap.total - cap.data) * 8;
            assert_eq!(cap.data_bits + ecc + cap.remainder_bits, free_modules(version));
            assert_eq!(cap.remainder_bits, 0);
        }
        assert_eq!(micro_capacity(MicroVersion::M1, ECLevel::L).unwrap().data_bits, 20);
    }

    #[test]
    fn test_base_layout() {
        let sb = micro_base(MicroVersion::M2);
        assert!(sb.base.get(0, 0));
        assert!(!sb.base.get(7, 0));
        assert!(sb.base.get(8, 0));
        assert!(!sb.base.get(9, 0));
        assert!(sb.base.get(0, 12));
        assert!(sb.used.get(8, 8));
        assert!(!sb.used.get(9, 9));
    }
}
