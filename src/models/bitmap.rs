/// Axis-aligned pixel rectangle, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive)
    pub min_x: i32,
    /// Top edge (inclusive)
    pub min_y: i32,
    /// Right edge (exclusive)
    pub max_x: i32,
    /// Bottom edge (exclusive)
    pub max_y: i32,
}

impl Rect {
    /// Create a rectangle from its corners
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle anchored at the origin
    pub const fn with_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Width in pixels (0 for an empty rectangle)
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x).max(0) as usize
    }

    /// Height in pixels (0 for an empty rectangle)
    pub fn height(&self) -> usize {
        (self.max_y - self.min_y).max(0) as usize
    }

    /// Whether (x, y) lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// Packed monochrome raster.
///
/// Rows are stored MSB-first, eight pixels per byte, `stride` bytes per row.
/// Bits past the right edge of a row are always zero, so the packed bytes can
/// be compared directly against golden vectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    rect: Rect,
    stride: usize,
    pix: Vec<u8>,
}

impl Bitmap {
    /// Create an all-light bitmap covering `rect`
    pub fn new(rect: Rect) -> Self {
        let stride = rect.width().div_ceil(8);
        Self {
            rect,
            stride,
            pix: vec![0; stride * rect.height()],
        }
    }

    /// Create an all-light bitmap anchored at the origin
    pub fn with_size(width: usize, height: usize) -> Self {
        Self::new(Rect::with_size(width, height))
    }

    /// Logical rectangle
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.rect.width()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.rect.height()
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Packed pixel rows
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    /// One packed row, relative to `rect.min_y`
    pub fn row(&self, row: usize) -> &[u8] {
        &self.pix[row * self.stride..(row + 1) * self.stride]
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> (usize, u8) {
        let dx = (x - self.rect.min_x) as usize;
        let dy = (y - self.rect.min_y) as usize;
        (dy * self.stride + dx / 8, 0x80 >> (dx % 8))
    }

    /// Pixel at (x, y); false outside the rectangle
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.rect.contains(x, y) {
            return false;
        }
        let (index, bit) = self.offset(x, y);
        self.pix[index] & bit != 0
    }

    /// Set pixel at (x, y); no-op outside the rectangle
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if !self.rect.contains(x, y) {
            return;
        }
        let (index, bit) = self.offset(x, y);
        if value {
            self.pix[index] |= bit;
        } else {
            self.pix[index] &= !bit;
        }
    }

    /// Toggle pixel at (x, y); no-op outside the rectangle
    pub fn toggle(&mut self, x: i32, y: i32) {
        if !self.rect.contains(x, y) {
            return;
        }
        let (index, bit) = self.offset(x, y);
        self.pix[index] ^= bit;
    }

    /// Number of dark pixels
    pub fn popcount(&self) -> usize {
        self.pix.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.pix.fill(0);
    }

    /// XOR `pattern` into every pixel that is not set in `used`.
    ///
    /// Equivalent to `mask_from(self.clone(), used, pattern)` without the copy.
    pub fn mask(&mut self, used: &Bitmap, pattern: &Bitmap) {
        let tail = self.tail_mask();
        for row in 0..self.height() {
            let y = self.rect.min_y + row as i32;
            for col in 0..self.stride {
                let x = self.rect.min_x + (col * 8) as i32;
                let flip = pattern.byte_at(x, y) & !used.byte_at(x, y);
                let byte = &mut self.pix[row * self.stride + col];
                *byte ^= flip;
                if col + 1 == self.stride {
                    *byte &= tail;
                }
            }
        }
    }

    /// Set every pixel to `base XOR (pattern AND NOT used)`.
    ///
    /// `base` must cover the same rectangle as `self`.
    pub fn mask_from(&mut self, base: &Bitmap, used: &Bitmap, pattern: &Bitmap) {
        debug_assert_eq!(self.rect, base.rect);
        self.pix.copy_from_slice(&base.pix);
        self.mask(used, pattern);
    }

    /// Eight pixels starting at (x, y), packed MSB-first; pixels outside are 0
    fn byte_at(&self, x: i32, y: i32) -> u8 {
        if y < self.rect.min_y || y >= self.rect.max_y {
            return 0;
        }
        let dx = x - self.rect.min_x;
        if dx >= 0 && dx % 8 == 0 {
            let col = dx as usize / 8;
            if col < self.stride {
                return self.pix[(y - self.rect.min_y) as usize * self.stride + col];
            }
            return 0;
        }
        let mut byte = 0u8;
        for i in 0..8 {
            if self.get(x + i, y) {
                byte |= 0x80 >> i;
            }
        }
        byte
    }

    fn tail_mask(&self) -> u8 {
        match self.width() % 8 {
            0 => 0xFF,
            r => 0xFFu8 << (8 - r),
        }
    }
}
