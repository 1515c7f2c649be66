use std::fmt;

/// Rectangular Micro QR symbol shape, named `R{height}x{width}`.
///
/// Variant order is the version indicator order (R7x43 = 0 ... R17x139 = 31).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RmqrVersion {
    R7x43,
    R7x59,
    R7x77,
    R7x99,
    R7x139,
    R9x43,
    R9x59,
    R9x77,
    R9x99,
    R9x139,
    R11x27,
    R11x43,
    R11x59,
    R11x77,
    R11x99,
    R11x139,
    R13x27,
    R13x43,
    R13x59,
    R13x77,
    R13x99,
    R13x139,
    R15x43,
    R15x59,
    R15x77,
    R15x99,
    R15x139,
    R17x43,
    R17x59,
    R17x77,
    R17x99,
    R17x139,
}

use RmqrVersion::*;

const SHAPES: [(usize, usize); 32] = [
    (7, 43),
    (7, 59),
    (7, 77),
    (7, 99),
    (7, 139),
    (9, 43),
    (9, 59),
    (9, 77),
    (9, 99),
    (9, 139),
    (11, 27),
    (11, 43),
    (11, 59),
    (11, 77),
    (11, 99),
    (11, 139),
    (13, 27),
    (13, 43),
    (13, 59),
    (13, 77),
    (13, 99),
    (13, 139),
    (15, 43),
    (15, 59),
    (15, 77),
    (15, 99),
    (15, 139),
    (17, 43),
    (17, 59),
    (17, 77),
    (17, 99),
    (17, 139),
];

impl RmqrVersion {
    /// All shapes in version indicator order
    pub const ALL: [RmqrVersion; 32] = [
        R7x43, R7x59, R7x77, R7x99, R7x139, R9x43, R9x59, R9x77, R9x99, R9x139, R11x27, R11x43,
        R11x59, R11x77, R11x99, R11x139, R13x27, R13x43, R13x59, R13x77, R13x99, R13x139, R15x43,
        R15x59, R15x77, R15x99, R15x139, R17x43, R17x59, R17x77, R17x99, R17x139,
    ];

    /// Five-bit version indicator written into the format information
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look a shape up by its version indicator
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look a shape up by its dimensions
    pub fn from_size(width: usize, height: usize) -> Option<Self> {
        SHAPES
            .iter()
            .position(|&(h, w)| h == height && w == width)
            .and_then(Self::from_index)
    }

    /// Width in modules
    pub fn width(&self) -> usize {
        SHAPES[self.index()].1
    }

    /// Height in modules
    pub fn height(&self) -> usize {
        SHAPES[self.index()].0
    }
}

impl fmt::Display for RmqrVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}x{}", self.height(), self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, v) in RmqrVersion::ALL.iter().enumerate() {
            assert_eq!(v.index(), i);
            assert_eq!(RmqrVersion::from_index(i), Some(*v));
        }
        assert_eq!(RmqrVersion::from_index(32), None);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!((R7x43.height(), R7x43.width()), (7, 43));
        assert_eq!((R11x27.height(), R11x27.width()), (11, 27));
        assert_eq!((R17x139.height(), R17x139.width()), (17, 139));
        assert_eq!(RmqrVersion::from_size(59, 15), Some(R15x59));
        assert_eq!(RmqrVersion::from_size(27, 7), None);
        assert_eq!(R13x77.to_string(), "R13x77");
    }
}
