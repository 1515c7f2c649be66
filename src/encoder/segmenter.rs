//! Automatic segmentation and version selection
//!
//! Costs are tracked in sixths of a bit so that the fractional per-character
//! widths of Numeric (10/3) and Alphanumeric (11/2) stay integral.

use crate::encoder::error::EncodeError;
use crate::encoder::segment::{SegmentLayout, total_bits};
use crate::models::segment::kanji_value;
use crate::models::{Mode, Segment};

const UNIT: usize = 6;

/// Cost in sixths of a bit of one character
fn char_cost(mode: Mode) -> usize {
    match mode {
        Mode::Numeric => 20,
        Mode::Alphanumeric => 33,
        Mode::Bytes => 48,
        Mode::Kanji => 78,
    }
}

/// Bytes consumed by one character of `mode` at `data[i..]`
fn char_width(mode: Mode, data: &[u8], i: usize) -> Option<usize> {
    match mode {
        Mode::Kanji => {
            let (&hi, &lo) = (data.get(i)?, data.get(i + 1)?);
            kanji_value(hi, lo).map(|_| 2)
        }
        _ => mode.accepts(&data[i..i + 1]).then_some(1),
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    cost: usize,
    segments: usize,
    /// Mode of the previous character, `None` at the start of the data
    prev: Option<Mode>,
    /// Byte offset where this character starts
    from: usize,
}

impl State {
    fn better_than(&self, other: &State) -> bool {
        (self.cost, self.segments) < (other.cost, other.segments)
    }
}

fn round_up(cost: usize) -> usize {
    cost.div_ceil(UNIT) * UNIT
}

/// Minimum-cost partition of `data` into segments for one version.
///
/// Returns `None` when some byte cannot be carried by any mode the version
/// offers. Runs longer than a count indicator can express are split.
pub fn segment<L: SegmentLayout>(layout: &L, data: &[u8], kanji: bool) -> Option<Vec<Segment>> {
    let modes: Vec<(Mode, usize)> = Mode::ALL
        .iter()
        .filter(|&&m| m != Mode::Kanji || kanji)
        .filter_map(|&m| layout.header(m).map(|h| (m, h.bits() * UNIT)))
        .collect();

    let n = data.len();
    // best[i][k]: cheapest encoding of data[..i] whose last character uses modes[k]
    let mut best: Vec<Vec<Option<State>>> = vec![vec![None; modes.len()]; n + 1];

    for i in 0..n {
        let starts: Vec<(Option<Mode>, usize, usize)> = if i == 0 {
            vec![(None, 0, 0)]
        } else {
            modes
                .iter()
                .zip(&best[i])
                .filter_map(|(&(m, _), s)| s.map(|s| (Some(m), s.cost, s.segments)))
                .collect()
        };
        for (k, &(mode, header_cost)) in modes.iter().enumerate() {
            let Some(width) = char_width(mode, data, i) else {
                continue;
            };
            for &(prev, cost, segments) in &starts {
                let candidate = if prev == Some(mode) {
                    State {
                        cost: cost + char_cost(mode),
                        segments,
                        prev,
                        from: i,
                    }
                } else {
                    State {
                        cost: round_up(cost) + header_cost + char_cost(mode),
                        segments: segments + 1,
                        prev,
                        from: i,
                    }
                };
                let slot = &mut best[i + width][k];
                if slot.is_none_or(|s| candidate.better_than(&s)) {
                    *slot = Some(candidate);
                }
            }
        }
    }

    if n == 0 {
        return Some(Vec::new());
    }

    let (mut k, _) = best[n]
        .iter()
        .enumerate()
        .filter_map(|(k, s)| s.map(|s| (k, s)))
        .min_by_key(|(_, s)| (round_up(s.cost), s.segments))?;

    // Walk back, collecting the mode of every character
    let mut runs: Vec<(Mode, usize, usize)> = Vec::new();
    let mut end = n;
    while end > 0 {
        let state = best[end][k]?;
        let mode = modes[k].0;
        match runs.last_mut() {
            Some((m, start, _)) if *m == mode => *start = state.from,
            _ => runs.push((mode, state.from, end)),
        }
        end = state.from;
        if let Some(prev) = state.prev {
            k = modes.iter().position(|&(m, _)| m == prev)?;
        }
    }
    runs.reverse();

    let mut segments = Vec::new();
    for (mode, start, end) in runs {
        let max_count = layout.header(mode)?.max_count();
        let step = match mode {
            Mode::Kanji => max_count * 2,
            _ => max_count,
        };
        if step == 0 {
            return None;
        }
        for chunk in data[start..end].chunks(step) {
            segments.push(Segment::new(mode, chunk));
        }
    }

    #[cfg(debug_assertions)]
    if cfg!(debug_assertions) && crate::debug::debug_enabled() {
        let summary: Vec<String> = segments
            .iter()
            .map(|s| format!("{:?}x{}", s.mode, s.char_count()))
            .collect();
        eprintln!("SEGMENT: {} -> [{}]", layout, summary.join(", "));
    }

    Some(segments)
}

/// Pick the first layout in `candidates` whose data capacity (in bits)
/// holds the optimally segmented `data`.
pub fn select_version<L, I>(
    data: &[u8],
    candidates: I,
    kanji: bool,
) -> Result<(L, Vec<Segment>), EncodeError>
where
    L: SegmentLayout,
    I: IntoIterator<Item = (L, usize)>,
{
    let mut needed = 0;
    let mut largest = 0;
    for (layout, capacity) in candidates {
        largest = largest.max(capacity);
        let Some(segments) = segment(&layout, data, kanji) else {
            #[cfg(debug_assertions)]
            if cfg!(debug_assertions) && crate::debug::debug_enabled() {
                eprintln!("VERSION: {} cannot carry the payload", layout);
            }
            continue;
        };
        let Some(bits) = total_bits(&layout, &segments) else {
            continue;
        };
        if bits <= capacity {
            #[cfg(debug_assertions)]
            if cfg!(debug_assertions) && crate::debug::debug_enabled() {
                eprintln!("VERSION: selected {} ({} of {} bits)", layout, bits, capacity);
            }
            return Ok((layout, segments));
        }
        #[cfg(debug_assertions)]
        if cfg!(debug_assertions) && crate::debug::debug_enabled() {
            eprintln!("VERSION: {} too small ({} > {} bits)", layout, bits, capacity);
        }
        needed = bits;
    }
    Err(EncodeError::DataTooLong {
        bits: needed,
        capacity: largest,
    })
}
