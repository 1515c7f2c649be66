use std::sync::OnceLock;

use rayon::prelude::*;

use crate::encoder::base::SymbolBase;
use crate::encoder::format::{rmqr_finder_format_cells, rmqr_sub_format_cells};
use crate::encoder::tables::{Block, Capacity};
use crate::models::{ECLevel, RmqrVersion};

/// Total codewords and (M, H) data codewords, in version indicator order.
///
/// Every rMQR symbol carries its parity as one RS block over all data
/// codewords.
const RMQR_CODEWORDS: [(usize, [usize; 2]); 32] = [
    (13, [6, 3]),
    (21, [12, 7]),
    (32, [20, 10]),
    (44, [28, 14]),
    (68, [44, 24]),
    (21, [12, 7]),
    (33, [21, 11]),
    (49, [31, 17]),
    (66, [42, 22]),
    (99, [63, 33]),
    (15, [7, 5]),
    (31, [19, 11]),
    (47, [31, 15]),
    (67, [43, 23]),
    (89, [57, 29]),
    (132, [84, 42]),
    (21, [12, 7]),
    (41, [27, 13]),
    (60, [38, 20]),
    (85, [53, 29]),
    (113, [73, 35]),
    (166, [106, 54]),
    (51, [33, 15]),
    (74, [48, 26]),
    (103, [67, 31]),
    (136, [88, 48]),
    (199, [127, 69]),
    (61, [39, 21]),
    (88, [56, 28]),
    (122, [78, 38]),
    (160, [100, 56]),
    (232, [152, 76]),
];

/// Zero bits left over after the last codeword
const REMAINDER_BITS: [usize; 32] = [
    0, 3, 5, 6, 1, 2, 3, 1, 4, 5, 2, 1, 0, 2, 7, 6, 4, 1, 6, 4, 3, 0, 1, 4, 6, 7, 2, 1, 2, 0, 3, 4,
];

/// Character count indicator widths (numeric, alphanumeric, bytes, Kanji)
pub(super) const COUNT_BITS: [[u32; 4]; 32] = [
    [4, 3, 3, 2],
    [5, 5, 4, 3],
    [6, 5, 5, 4],
    [7, 6, 5, 5],
    [7, 6, 6, 5],
    [5, 5, 4, 3],
    [6, 5, 5, 4],
    [7, 6, 5, 5],
    [7, 6, 6, 5],
    [8, 7, 6, 6],
    [4, 4, 3, 2],
    [6, 5, 5, 4],
    [7, 6, 5, 5],
    [7, 6, 6, 5],
    [8, 7, 6, 6],
    [8, 7, 7, 6],
    [5, 5, 4, 3],
    [6, 6, 5, 5],
    [7, 6, 6, 5],
    [7, 7, 6, 6],
    [8, 7, 7, 6],
    [8, 8, 7, 7],
    [7, 6, 6, 5],
    [7, 7, 6, 5],
    [8, 7, 7, 6],
    [8, 7, 7, 6],
    [9, 8, 7, 7],
    [7, 6, 6, 5],
    [8, 7, 6, 6],
    [8, 7, 7, 6],
    [8, 8, 7, 6],
    [9, 8, 8, 7],
];

/// Alignment pattern centre columns for a symbol width
pub fn alignment_columns(width: usize) -> &'static [i32] {
    match width {
        43 => &[21],
        59 => &[19, 39],
        77 => &[25, 51],
        99 => &[23, 49, 75],
        139 => &[27, 55, 83, 111],
        _ => &[],
    }
}

fn level_index(level: ECLevel) -> Option<usize> {
    match level {
        ECLevel::M => Some(0),
        ECLevel::H => Some(1),
        _ => None,
    }
}

static CAPACITIES: OnceLock<Vec<[Capacity; 2]>> = OnceLock::new();

/// Codeword budget of a shape; `None` for levels other than M and H
pub fn rmqr_capacity(version: RmqrVersion, level: ECLevel) -> Option<&'static Capacity> {
    let capacities = CAPACITIES.get_or_init(|| {
        RMQR_CODEWORDS
            .iter()
            .zip(REMAINDER_BITS)
            .map(|(&(total, data), rem)| {
                data.map(|d| Capacity::new(total, &[Block::new(1, total, d)], rem))
            })
            .collect()
    });
    level_index(level).map(|l| &capacities[version.index()][l])
}

fn build_rmqr_base(version: RmqrVersion) -> SymbolBase {
    let (width, height) = (version.width(), version.height());
    let (w, h) = (width as i32, height as i32);
    let columns = alignment_columns(width);
    let mut sb = SymbolBase::new(width, height);

    for x in 0..w {
        sb.put(x, 0, x % 2 == 0);
        sb.put(x, h - 1, x % 2 == 0);
    }
    for y in 0..h {
        sb.put(0, y, y % 2 == 0);
        sb.put(w - 1, y, y % 2 == 0);
        for &x in columns {
            sb.put(x, y, y % 2 == 0);
        }
    }

    sb.finder(0, 0, 1, 1);
    sb.alignment(w - 3, h - 3, 2);
    for &x in columns {
        sb.alignment(x, 1, 1);
        sb.alignment(x, h - 2, 1);
    }

    // corner finder sub-patterns
    sb.put(w - 1, 0, true);
    sb.put(w - 2, 0, true);
    sb.put(w - 3, 0, true);
    sb.put(w - 2, 1, false);
    sb.put(w - 1, 1, true);
    sb.put(0, h - 1, true);
    sb.put(1, h - 1, true);
    sb.put(2, h - 1, true);
    if h >= 11 {
        sb.put(0, h - 2, true);
        sb.put(1, h - 2, false);
    }

    for (x, y) in rmqr_finder_format_cells().chain(rmqr_sub_format_cells(width, height)) {
        sb.reserve(x, y);
    }
    sb
}

static RMQR_BASES: OnceLock<Vec<SymbolBase>> = OnceLock::new();

/// Base and used bitmaps of an rMQR shape
pub fn rmqr_base(version: RmqrVersion) -> &'static SymbolBase {
    let bases = RMQR_BASES
        .get_or_init(|| RmqrVersion::ALL.par_iter().map(|&v| build_rmqr_base(v)).collect());
    &bases[version.index()]
}
