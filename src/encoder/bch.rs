/// BCH codes protecting format and version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BchCode {
    generator: u32,
    degree: u32,
    xor_mask: u32,
}

/// QR format information, BCH(15,5)
pub const QR_FORMAT: BchCode = BchCode::new(0x537, 0x5412);
/// QR version information, BCH(18,6), unmasked
pub const QR_VERSION: BchCode = BchCode::new(0x1F25, 0);
/// Micro QR format information, BCH(15,5)
pub const MICRO_FORMAT: BchCode = BchCode::new(0x537, 0x4445);
/// rMQR format information next to the finder pattern, BCH(18,6)
pub const RMQR_FORMAT_FINDER: BchCode = BchCode::new(0x1F25, 0x1FAB2);
/// rMQR format information next to the finder sub-pattern, BCH(18,6)
pub const RMQR_FORMAT_SUB: BchCode = BchCode::new(0x1F25, 0x20A7B);

impl BchCode {
    /// Code with the given generator polynomial and output XOR mask
    pub const fn new(generator: u32, xor_mask: u32) -> Self {
        Self {
            generator,
            degree: 31 - generator.leading_zeros(),
            xor_mask,
        }
    }

    /// Remainder of `value` divided by the generator polynomial
    pub const fn remainder(&self, value: u32) -> u32 {
        let mut r = value;
        while r != 0 && 31 - r.leading_zeros() >= self.degree {
            let shift = 31 - r.leading_zeros() - self.degree;
            r ^= self.generator << shift;
        }
        r
    }

    /// Systematic codeword for `data`, XOR mask applied
    pub const fn encode(&self, data: u32) -> u32 {
        let shifted = data << self.degree;
        (shifted | self.remainder(shifted)) ^ self.xor_mask
    }
}

#[cfg(test)]
impl BchCode {
    pub(crate) fn check(&self, codeword: u32) -> bool {
        self.remainder(codeword ^ self.xor_mask) == 0
    }

    pub(crate) fn data(&self, codeword: u32) -> u32 {
        (codeword ^ self.xor_mask) >> self.degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_known_values() {
        // level M (00), mask 0
        assert_eq!(QR_FORMAT.encode(0b00_000), 0x5412);
        // level L (01), mask 0
        assert_eq!(QR_FORMAT.encode(0b01_000), 0x77C4);
        // level H (10), mask 7
        assert_eq!(QR_FORMAT.encode(0b10_111), 0x083B);
    }

    #[test]
    fn test_version_known_values() {
        assert_eq!(QR_VERSION.encode(7), 0x07C94);
        assert_eq!(QR_VERSION.encode(8), 0x085BC);
        assert_eq!(QR_VERSION.encode(40), 0x28C69);
    }

    #[test]
    fn test_codewords_check() {
        for code in [QR_FORMAT, MICRO_FORMAT] {
            for data in 0..32 {
                let cw = code.encode(data);
                assert!(cw < 1 << 15);
                assert!(code.check(cw));
                assert!(!code.check(cw ^ 1));
                assert_eq!(code.data(cw), data);
            }
        }
        for code in [QR_VERSION, RMQR_FORMAT_FINDER, RMQR_FORMAT_SUB] {
            for data in 0..64 {
                let cw = code.encode(data);
                assert!(cw < 1 << 18);
                assert!(code.check(cw));
                assert_eq!(code.data(cw), data);
            }
        }
    }

    #[test]
    fn test_minimum_distance() {
        // BCH(15,5) corrects up to three errors: distance >= 7
        let words: Vec<u32> = (0..32).map(|d| QR_FORMAT.encode(d)).collect();
        for (i, a) in words.iter().enumerate() {
            for b in &words[i + 1..] {
                assert!((a ^ b).count_ones() >= 7);
            }
        }
    }
}
