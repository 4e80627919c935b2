//! RLE8 encoder for bottom-up 8bpp pixel planes.
//!
//! Each stored row is scanned left to right. Runs of three or more identical
//! indices become encoded records `(count, value)`; shorter runs are folded
//! into a literal that is flushed as an absolute record `00 n <bytes> [00]`.
//! Literals of one or two bytes cannot be expressed in absolute mode and are
//! flushed as encoded records instead. Rows end with `00 00`, the last row
//! with `00 01`. Padding bytes never take part in comparisons or output.

use enough::Stop;

use super::header::row_stride;
use super::scan::{run_length_lanes, run_length_scalar};
use super::writer::{MAX_COUNT, RleWriter};
use crate::error::BitmapError;

/// Shortest run that is emitted as its own encoded record.
const MIN_ENCODED_RUN: usize = 3;

/// How run lengths are found while scanning a row.
///
/// Both strategies produce byte-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Rle8Strategy {
    /// Compare one byte at a time.
    #[default]
    Scalar,
    /// Compare 16-byte windows against the window shifted by one byte.
    ///
    /// The window compare is a plain safe loop over the lanes; it becomes
    /// SIMD only where the compiler auto-vectorizes it.
    Lanes,
}

type Scanner = fn(&[u8], usize) -> usize;

impl Rle8Strategy {
    fn scanner(self) -> Scanner {
        match self {
            Self::Scalar => run_length_scalar,
            Self::Lanes => run_length_lanes,
        }
    }
}

/// Worst-case encoded length for a `width` x `height` plane: every pixel
/// costs at most two bytes, plus a two-byte terminator per row.
pub fn max_encoded_len(width: usize, height: usize) -> Option<usize> {
    width
        .checked_mul(height)?
        .checked_add(height)?
        .checked_mul(2)
}

/// RLE8 encoder with a strategy fixed at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rle8Encoder {
    strategy: Rle8Strategy,
}

impl Rle8Encoder {
    pub fn new(strategy: Rle8Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Rle8Strategy {
        self.strategy
    }

    /// Encode a padded, bottom-up pixel plane into `out`.
    ///
    /// `pixels` starts at the first stored row; rows are `row_stride(width)`
    /// bytes apart and the final row may omit its padding. Returns the number
    /// of bytes written. `out` should hold [`max_encoded_len`] bytes; a
    /// smaller buffer fails with [`BitmapError::BufferTooSmall`] once it runs
    /// out, leaving `out` partially written.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        out: &mut [u8],
        stop: impl Stop,
    ) -> Result<usize, BitmapError> {
        self.encode_plane(pixels, width, height, out, &stop)
    }

    pub(crate) fn encode_plane(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        out: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<usize, BitmapError> {
        let mut writer = RleWriter::new(out);
        if width == 0 || height == 0 {
            writer.write_end_of_bitmap()?;
            return Ok(writer.position());
        }

        let stride = row_stride(width);
        let needed = stride
            .checked_mul(height - 1)
            .and_then(|n| n.checked_add(width))
            .ok_or(BitmapError::DimensionsTooLarge {
                width: u32::try_from(width).unwrap_or(u32::MAX),
                height: u32::try_from(height).unwrap_or(u32::MAX),
            })?;
        if pixels.len() < needed {
            return Err(BitmapError::TruncatedPixelData {
                needed,
                actual: pixels.len(),
            });
        }

        let scan = self.strategy.scanner();
        for row in 0..height {
            if row % 16 == 0 {
                stop.check()?;
            }
            let start = row * stride;
            encode_row(&pixels[start..start + width], &mut writer, scan)?;
            if row + 1 == height {
                writer.write_end_of_bitmap()?;
            } else {
                writer.write_end_of_line()?;
            }
        }

        Ok(writer.position())
    }
}

/// Encode with the default strategy and no cancellation.
pub fn encode_rle8(
    pixels: &[u8],
    width: usize,
    height: usize,
    out: &mut [u8],
) -> Result<usize, BitmapError> {
    Rle8Encoder::default().encode_plane(pixels, width, height, out, &enough::Unstoppable)
}

fn encode_row(row: &[u8], writer: &mut RleWriter<'_>, scan: Scanner) -> Result<(), BitmapError> {
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < row.len() {
        let run = scan(&row[pos..], MAX_COUNT);

        if run >= MIN_ENCODED_RUN {
            flush_literal(writer, &row[literal_start..pos])?;
            writer.write_run(run, row[pos])?;
            pos += run;
            literal_start = pos;
            continue;
        }

        if pos - literal_start + run > MAX_COUNT {
            flush_literal(writer, &row[literal_start..pos])?;
            literal_start = pos;
        }
        pos += run;
        if pos - literal_start == MAX_COUNT {
            flush_literal(writer, &row[literal_start..pos])?;
            literal_start = pos;
        }
    }

    flush_literal(writer, &row[literal_start..])
}

fn flush_literal(writer: &mut RleWriter<'_>, literal: &[u8]) -> Result<(), BitmapError> {
    match *literal {
        [] => Ok(()),
        [a] => writer.write_run(1, a),
        [a, b] if a == b => writer.write_run(2, a),
        [a, b] => {
            writer.write_run(1, a)?;
            writer.write_run(1, b)
        }
        _ => writer.write_literal_run(literal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    fn encode_with(strategy: Rle8Strategy, pixels: &[u8], w: usize, h: usize) -> Vec<u8> {
        let mut out = vec![0u8; max_encoded_len(w, h).unwrap()];
        let n = Rle8Encoder::new(strategy)
            .encode(pixels, w, h, &mut out, Unstoppable)
            .unwrap();
        out.truncate(n);
        out
    }

    fn encode(pixels: &[u8], w: usize, h: usize) -> Vec<u8> {
        let scalar = encode_with(Rle8Strategy::Scalar, pixels, w, h);
        let lanes = encode_with(Rle8Strategy::Lanes, pixels, w, h);
        assert_eq!(scalar, lanes, "strategies disagree");
        scalar
    }

    fn alternating(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 2) as u8 + 10).collect()
    }

    #[test]
    fn five_by_two_worked_example() {
        let pixels = [
            1, 3, 3, 3, 4, 0, 0, 0, //
            1, 3, 3, 3, 4, 0, 0, 0,
        ];
        assert_eq!(
            encode(&pixels, 5, 2),
            [
                0x01, 0x01, 0x03, 0x03, 0x01, 0x04, 0x00, 0x00, //
                0x01, 0x01, 0x03, 0x03, 0x01, 0x04, 0x00, 0x01,
            ]
        );
    }

    #[test]
    fn width_one_only_encoded_runs() {
        let pixels = [7, 0, 0, 0, 7, 0, 0, 0, 9, 0, 0, 0];
        assert_eq!(
            encode(&pixels, 1, 3),
            [1, 7, 0, 0, 1, 7, 0, 0, 1, 9, 0, 1]
        );
    }

    #[test]
    fn long_run_splits_at_255() {
        let pixels = vec![42u8; 300];
        assert_eq!(encode(&pixels, 300, 1), [255, 42, 45, 42, 0, 1]);
    }

    #[test]
    fn long_literal_splits_at_255_with_pad() {
        let pixels = alternating(300);
        let out = encode(&pixels, 300, 1);

        let mut expected = vec![0, 255];
        expected.extend_from_slice(&pixels[..255]);
        expected.push(0);
        expected.extend_from_slice(&[0, 45]);
        expected.extend_from_slice(&pixels[255..]);
        expected.push(0);
        expected.extend_from_slice(&[0, 1]);
        assert_eq!(out, expected);
    }

    #[test]
    fn literal_flushed_before_run() {
        let pixels = [1, 2, 3, 7, 7, 7, 7, 0];
        assert_eq!(
            encode(&pixels, 7, 1),
            [0, 3, 1, 2, 3, 0, 4, 7, 0, 1]
        );
    }

    #[test]
    fn short_trailing_literals_use_encoded_mode() {
        // run of 4, then two distinct pixels
        let pixels = [5, 5, 5, 5, 6, 8, 0, 0];
        assert_eq!(encode(&pixels, 6, 1), [4, 5, 1, 6, 1, 8, 0, 1]);
        // pair of equal pixels becomes a single run of 2
        let pixels = [5, 5, 0, 0];
        assert_eq!(encode(&pixels, 2, 1), [2, 5, 0, 1]);
    }

    #[test]
    fn pair_inside_literal_stays_literal() {
        let pixels = [1, 2, 2, 3];
        assert_eq!(encode(&pixels, 4, 1), [0, 4, 1, 2, 2, 3, 0, 1]);
    }

    #[test]
    fn literal_flushes_before_exceeding_255() {
        // 254 alternating bytes, then a pair that would push the literal to 256
        let mut pixels = alternating(254);
        pixels.extend_from_slice(&[99, 99]);
        let out = encode(&pixels, 256, 1);

        let mut expected = vec![0, 254];
        expected.extend_from_slice(&pixels[..254]);
        expected.extend_from_slice(&[2, 99, 0, 1]);
        assert_eq!(out, expected);
    }

    #[test]
    fn padding_never_extends_runs() {
        // width 3: pad byte equals the row's pixels and the next row's first
        let pixels = [8, 8, 8, 8, 8, 8, 8, 8];
        assert_eq!(encode(&pixels, 3, 2), [3, 8, 0, 0, 3, 8, 0, 1]);
    }

    #[test]
    fn last_row_may_omit_padding() {
        let pixels = [1, 1, 1, 0, 2, 2, 2];
        assert_eq!(encode(&pixels, 3, 2), [3, 1, 0, 0, 3, 2, 0, 1]);
    }

    #[test]
    fn truncated_plane_is_rejected() {
        let pixels = [1, 1, 1, 0, 2, 2];
        let mut out = [0u8; 64];
        let err = encode_rle8(&pixels, 3, 2, &mut out).unwrap_err();
        assert!(matches!(
            err,
            BitmapError::TruncatedPixelData {
                needed: 7,
                actual: 6
            }
        ));
    }

    #[test]
    fn undersized_output_is_rejected() {
        let pixels = alternating(8);
        let mut out = [0u8; 6];
        let err = encode_rle8(&pixels, 8, 1, &mut out).unwrap_err();
        assert!(matches!(err, BitmapError::BufferTooSmall { .. }));
    }

    #[test]
    fn alternating_fits_worst_case_bound() {
        for w in [1usize, 2, 3, 4, 5, 6, 7, 255, 256, 257, 511] {
            let stride = row_stride(w);
            let h = 3;
            let pixels: Vec<u8> = (0..stride * h).map(|i| (i % 2) as u8).collect();
            let out = encode(&pixels, w, h);
            assert!(out.len() <= max_encoded_len(w, h).unwrap(), "width {w}");
        }
    }

    #[test]
    fn empty_plane_is_just_end_of_bitmap() {
        let mut out = [0u8; 2];
        assert_eq!(encode_rle8(&[], 0, 0, &mut out).unwrap(), 2);
        assert_eq!(out, [0, 1]);
    }
}
