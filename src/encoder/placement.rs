use crate::models::Bitmap;
use crate::utils::BitBuffer;

/// Column used by the vertical timing pattern of standard QR
const QR_TIMING_COLUMN: i32 = 6;

/// Two-column zigzag walk through the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zigzag {
    /// Right-hand column of the first column pair
    pub start_x: i32,
    /// Step over the standard QR timing column when a pair would straddle it
    pub skip_timing_column: bool,
}

impl Zigzag {
    /// Standard QR: start at the right edge, step over column 6
    pub fn qr(size: usize) -> Self {
        Self {
            start_x: size as i32 - 1,
            skip_timing_column: true,
        }
    }

    /// Micro QR: start at the right edge, no column skip
    pub fn micro(size: usize) -> Self {
        Self {
            start_x: size as i32 - 1,
            skip_timing_column: false,
        }
    }

    /// rMQR: the right edge is all function pattern, start one column in
    pub fn rmqr(width: usize) -> Self {
        Self {
            start_x: width as i32 - 2,
            skip_timing_column: false,
        }
    }

    /// Data cells of `used`'s rectangle in placement order
    pub fn cells<'a>(&self, used: &'a Bitmap) -> DataCells<'a> {
        let rect = used.rect();
        DataCells {
            used,
            x: self.start_x,
            y: rect.max_y - 1,
            upward: true,
            second: false,
            skip_timing_column: self.skip_timing_column,
        }
    }
}

/// Iterator over free cells in zigzag order
pub struct DataCells<'a> {
    used: &'a Bitmap,
    x: i32,
    y: i32,
    upward: bool,
    /// Whether the next cell is the left one of the pair
    second: bool,
    skip_timing_column: bool,
}

impl DataCells<'_> {
    /// Advance to the next cell of the walk, ignoring `used`
    fn step(&mut self) {
        if !self.second {
            self.second = true;
            return;
        }
        self.second = false;
        let rect = self.used.rect();
        let next_y = if self.upward { self.y - 1 } else { self.y + 1 };
        if next_y < rect.min_y || next_y >= rect.max_y {
            self.upward = !self.upward;
            self.x -= 2;
            if self.skip_timing_column && self.x == QR_TIMING_COLUMN {
                self.x -= 1;
            }
        } else {
            self.y = next_y;
        }
    }
}

impl Iterator for DataCells<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        let min_x = self.used.rect().min_x;
        while self.x >= min_x {
            let x = if self.second { self.x - 1 } else { self.x };
            let y = self.y;
            self.step();
            if x >= min_x && !self.used.get(x, y) {
                return Some((x, y));
            }
        }
        None
    }
}

/// Write `bits` into the free cells of `img`; cells past the end of the
/// stream are written light. Returns the number of cells written.
pub fn place(img: &mut Bitmap, used: &Bitmap, zigzag: Zigzag, bits: &mut BitBuffer) -> usize {
    let mut written = 0;
    for (x, y) in zigzag.cells(used) {
        let bit = bits.read_bit().unwrap_or(false);
        img.set(x, y, bit);
        written += 1;
    }
    written
}
