//! Mask evaluation and selection
//!
//! Standard QR masks are scored with the four penalty rules (lower is
//! better). Micro QR masks are scored on the dark modules along the right
//! and bottom edges (higher is better). Both go through [`select_mask`],
//! which keeps the first candidate on ties.

use std::fmt;

use crate::models::Bitmap;

const PENALTY_N1: i64 = 3;
const PENALTY_N2: i64 = 3;
const PENALTY_N3: i64 = 40;
const PENALTY_N4: i64 = 10;

/// Last seven run lengths of a row or column, newest first, used to spot
/// 1:1:3:1:1 finder-like patterns with four modules of light margin
struct FinderPenalty {
    size: i64,
    run_history: [i64; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            size: size as i64,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut run: i64) {
        if self.run_history[0] == 0 {
            // light border before the first run
            run += self.size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = run;
    }

    fn count_patterns(&self) -> i64 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i64::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i64::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, dark: bool, mut run: i64) -> i64 {
        if dark {
            self.add_history(run);
            run = 0;
        }
        run += self.size;
        self.add_history(run);
        self.count_patterns()
    }
}

/// Penalty of one line of modules: N1 runs plus N3 finder-like patterns
fn line_penalty(len: usize, module: impl Fn(usize) -> bool) -> i64 {
    let mut result = 0;
    let mut color = false;
    let mut run = 0i64;
    let mut history = FinderPenalty::new(len);
    for i in 0..len {
        if module(i) == color {
            run += 1;
            if run == 5 {
                result += PENALTY_N1;
            } else if run > 5 {
                result += 1;
            }
        } else {
            history.add_history(run);
            if !color {
                result += history.count_patterns() * PENALTY_N3;
            }
            color = module(i);
            run = 1;
        }
    }
    result + history.terminate_and_count(color, run) * PENALTY_N3
}

/// Standard QR penalty score of a fully masked symbol
pub fn qr_penalty(img: &Bitmap) -> i64 {
    let (w, h) = (img.width(), img.height());
    let at = |x: usize, y: usize| img.get(x as i32, y as i32);
    let mut result = 0;

    for y in 0..h {
        result += line_penalty(w, |x| at(x, y));
    }
    for x in 0..w {
        result += line_penalty(h, |y| at(x, y));
    }

    for y in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
            let c = at(x, y);
            if c == at(x + 1, y) && c == at(x, y + 1) && c == at(x + 1, y + 1) {
                result += PENALTY_N2;
            }
        }
    }

    let total = (w * h) as i64;
    if total > 0 {
        let dark = img.popcount() as i64;
        // smallest k with |dark/total - 1/2| <= (k + 1) * 5%
        let k = (((dark * 20 - total * 10).abs() + total - 1) / total - 1).max(0);
        result += k * PENALTY_N4;
    }
    result
}

/// Micro QR edge score of a fully masked symbol
pub fn micro_score(img: &Bitmap) -> i64 {
    let last = img.width() as i32 - 1;
    let sum_right = (1..=last).filter(|&y| img.get(last, y)).count() as i64;
    let sum_bottom = (1..=last).filter(|&x| img.get(x, last)).count() as i64;
    sum_right.min(sum_bottom) * 16 + sum_right.max(sum_bottom)
}

/// Render every candidate and keep the one with the lowest penalty
pub fn select_mask<M, R, P>(candidates: &[M], render: R, penalty: P) -> Option<(M, Bitmap)>
where
    M: Copy + fmt::Debug,
    R: Fn(M) -> Bitmap,
    P: Fn(&Bitmap) -> i64,
{
    let mut best: Option<(i64, M, Bitmap)> = None;
    for &mask in candidates {
        let img = render(mask);
        let score = penalty(&img);

        #[cfg(debug_assertions)]
        if cfg!(debug_assertions) && crate::debug::debug_enabled() {
            eprintln!("MASK: {:?} penalty={}", mask, score);
        }

        if best.as_ref().is_none_or(|(s, _, _)| score < *s) {
            best = Some((score, mask, img));
        }
    }

    #[cfg(debug_assertions)]
    if cfg!(debug_assertions) && crate::debug::debug_enabled() {
        if let Some((score, mask, _)) = &best {
            eprintln!("MASK: selected {:?} penalty={}", mask, score);
        }
    }

    best.map(|(_, mask, img)| (mask, img))
}
