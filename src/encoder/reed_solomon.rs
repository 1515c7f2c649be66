//! Reed-Solomon parity for QR codes
//!
//! RS over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.

/// GF(256) field operations using log/exp tables
pub struct Gf256;

const PRIMITIVE: u16 = 0x11D;

const fn build_tables() -> ([u8; 512], [u8; 256]) {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // exp[i] == exp[i - 255] so sums of two logs never need a modulo
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 512], [u8; 256]) = build_tables();
static EXP_TABLE: [u8; 512] = TABLES.0;
static LOG_TABLE: [u8; 256] = TABLES.1;

impl Gf256 {
    /// Field multiplication
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// alpha^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }
}

/// Multiply two polynomials, coefficients highest degree first
pub fn poly_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0u8; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] ^= Gf256::mul(x, y);
        }
    }
    out
}

/// Generator polynomial prod_{i<degree} (x - alpha^i).
///
/// Coefficients are stored highest degree first, so the leading 1 is at
/// index 0 and the constant term is last.
pub fn generator_poly(degree: usize) -> Vec<u8> {
    let mut g = vec![1u8];
    for i in 0..degree {
        g = poly_mul(&g, &[1, Gf256::exp(i)]);
    }
    g
}

/// Systematic Reed-Solomon encoder producing a fixed number of parity bytes
pub struct ReedSolomonEncoder {
    generator: Vec<u8>,
}

impl ReedSolomonEncoder {
    /// Encoder for `num_ecc_codewords` parity bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self {
            generator: generator_poly(num_ecc_codewords),
        }
    }

    /// Number of parity bytes per block
    pub fn degree(&self) -> usize {
        self.generator.len() - 1
    }

    /// Remainder of `data(x) * x^n` divided by the generator, leading zeros kept
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let n = self.degree();
        let mut remainder = vec![0u8; n];
        if n == 0 {
            return remainder;
        }
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            remainder[n - 1] = 0;
            if factor != 0 {
                for (r, &g) in remainder.iter_mut().zip(&self.generator[1..]) {
                    *r ^= Gf256::mul(g, factor);
                }
            }
        }
        remainder
    }
}
