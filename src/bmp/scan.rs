//! Run-length scanning over one row of palette indices.
//!
//! Both scanners return the length of the run of identical bytes at the start
//! of `row`, capped at `max`. They must agree on every input.

/// Lane width of the vectorized comparison.
pub(crate) const LANES: usize = 16;

/// Byte-at-a-time run length.
pub(crate) fn run_length_scalar(row: &[u8], max: usize) -> usize {
    let Some((&first, rest)) = row.split_first() else {
        return 0;
    };
    let limit = row.len().min(max).max(1);
    1 + rest[..limit - 1].iter().take_while(|&&b| b == first).count()
}

/// Bit `i` is set when `a[i] == b[i]`.
#[inline(always)]
fn eq_mask(a: &[u8; LANES], b: &[u8; LANES]) -> u16 {
    let mut mask = 0u16;
    for i in 0..LANES {
        mask |= u16::from(a[i] == b[i]) << i;
    }
    mask
}

/// Run length using 16-byte windows compared against the window shifted by
/// one byte. The first clear bit of the equality mask ends the run.
pub(crate) fn run_length_lanes(row: &[u8], max: usize) -> usize {
    if row.is_empty() {
        return 0;
    }
    let limit = row.len().min(max);
    // invariant: row[..run] are all equal
    let mut run = 1;
    while run + LANES <= limit {
        let (Some(cur), Some(next)) = (
            row[run - 1..].first_chunk::<LANES>(),
            row[run..].first_chunk::<LANES>(),
        ) else {
            break;
        };
        let mask = eq_mask(cur, next);
        if mask != u16::MAX {
            return run + mask.trailing_ones() as usize;
        }
        run += LANES;
    }
    while run < limit && row[run] == row[run - 1] {
        run += 1;
    }
    run
}
