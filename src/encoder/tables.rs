use std::sync::OnceLock;

use crate::encoder::error::EncodeError;
use crate::models::{ECLevel, Version};

/// A run of identically-sized RS blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Number of blocks in the run
    pub num: usize,
    /// Codewords per block (data + parity)
    pub total: usize,
    /// Data codewords per block
    pub data: usize,
}

impl Block {
    /// `num` blocks of `total` codewords, `data` of them data
    pub const fn new(num: usize, total: usize, data: usize) -> Self {
        Self { num, total, data }
    }

    /// Parity codewords per block
    pub fn ecc(&self) -> usize {
        self.total - self.data
    }
}

/// Codeword budget of one symbol version at one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capacity {
    /// Total codewords
    pub total: usize,
    /// Data codewords
    pub data: usize,
    /// Data bits; less than `8 * data` when the last codeword is a half (M1, M3)
    pub data_bits: usize,
    /// RS block layout, shorter blocks first
    pub blocks: Vec<Block>,
    /// Zero bits placed after the last codeword
    pub remainder_bits: usize,
}

impl Capacity {
    /// Capacity whose data region is whole codewords
    pub fn new(total: usize, blocks: &[Block], remainder_bits: usize) -> Self {
        let data = blocks.iter().map(|b| b.num * b.data).sum();
        Self {
            total,
            data,
            data_bits: data * 8,
            blocks: blocks.to_vec(),
            remainder_bits,
        }
    }

    /// Number of RS blocks
    pub fn num_blocks(&self) -> usize {
        self.blocks.iter().map(|b| b.num).sum()
    }

    /// Verify the block layout adds up to the declared totals
    pub fn validate(&self) -> Result<(), EncodeError> {
        let total: usize = self.blocks.iter().map(|b| b.num * b.total).sum();
        let data: usize = self.blocks.iter().map(|b| b.num * b.data).sum();
        if total != self.total || data != self.data {
            return Err(EncodeError::InternalCapacity(format!(
                "blocks sum to {total}/{data} codewords, table says {}/{}",
                self.total, self.data
            )));
        }
        if self.data_bits > self.data * 8 || self.data_bits + 8 <= self.data * 8 {
            return Err(EncodeError::InternalCapacity(format!(
                "{} data bits do not match {} data codewords",
                self.data_bits, self.data
            )));
        }
        Ok(())
    }
}

// Tables from the QR Code specification (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Modules available for codewords (everything but function patterns and
/// format/version information)
pub fn raw_data_modules(version: Version) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

fn build_capacity(version: Version, level: ECLevel) -> Capacity {
    let v = version.number() as usize;
    let ecc = ECC_CODEWORDS_PER_BLOCK[level.ordinal()][v] as usize;
    let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[level.ordinal()][v] as usize;
    let raw = raw_data_modules(version);
    let total = raw / 8;
    let short_total = total / num_blocks;
    let num_long = total % num_blocks;

    let mut blocks = vec![Block::new(
        num_blocks - num_long,
        short_total,
        short_total - ecc,
    )];
    if num_long > 0 {
        blocks.push(Block::new(num_long, short_total + 1, short_total + 1 - ecc));
    }
    Capacity::new(total, &blocks, raw % 8)
}

static QR_CAPACITY: OnceLock<Vec<[Capacity; 4]>> = OnceLock::new();

/// Capacity of a standard QR symbol
pub fn qr_capacity(version: Version, level: ECLevel) -> &'static Capacity {
    let table = QR_CAPACITY.get_or_init(|| {
        Version::all()
            .map(|v| ECLevel::ALL.map(|level| build_capacity(v, level)))
            .collect()
    });
    &table[version.number() as usize - 1][level.ordinal()]
}
