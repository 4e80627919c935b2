//! Bounds-checked RLE8 output cursor.

use crate::error::BitmapError;

/// Longest run or literal a single RLE8 record can carry.
pub(crate) const MAX_COUNT: usize = 255;
/// Shortest literal expressible in absolute mode; 1 and 2 are escape codes.
pub(crate) const MIN_ABSOLUTE: usize = 3;

const ESCAPE: u8 = 0x00;
const END_OF_LINE: u8 = 0x00;
const END_OF_BITMAP: u8 = 0x01;

/// Writes RLE8 records into a caller-provided slice.
///
/// Every write checks the remaining capacity first and fails with
/// [`BitmapError::BufferTooSmall`] without writing anything.
pub(crate) struct RleWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl<'a> RleWriter<'a> {
    pub(crate) fn new(out: &'a mut [u8]) -> Self {
        Self { out, pos: 0 }
    }

    /// Bytes written so far.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Hand out the next `n` bytes and advance past them.
    fn claim(&mut self, n: usize) -> Result<&mut [u8], BitmapError> {
        let end = self.pos + n;
        if end > self.out.len() {
            return Err(BitmapError::BufferTooSmall {
                needed: end,
                actual: self.out.len(),
            });
        }
        let start = self.pos;
        self.pos = end;
        Ok(&mut self.out[start..end])
    }

    /// Encoded run: `count` copies of `value`.
    pub(crate) fn write_run(&mut self, count: usize, value: u8) -> Result<(), BitmapError> {
        debug_assert!((1..=MAX_COUNT).contains(&count));
        let dst = self.claim(2)?;
        dst[0] = count as u8;
        dst[1] = value;
        Ok(())
    }

    /// Absolute run: `00 n <n bytes> [00]`, padded to an even length.
    pub(crate) fn write_literal_run(&mut self, literal: &[u8]) -> Result<(), BitmapError> {
        let n = literal.len();
        debug_assert!((MIN_ABSOLUTE..=MAX_COUNT).contains(&n));
        let pad = n & 1;
        let dst = self.claim(2 + n + pad)?;
        dst[0] = ESCAPE;
        dst[1] = n as u8;
        dst[2..2 + n].copy_from_slice(literal);
        if pad == 1 {
            dst[2 + n] = 0;
        }
        Ok(())
    }

    pub(crate) fn write_end_of_line(&mut self) -> Result<(), BitmapError> {
        self.claim(2)?.copy_from_slice(&[ESCAPE, END_OF_LINE]);
        Ok(())
    }

    pub(crate) fn write_end_of_bitmap(&mut self) -> Result<(), BitmapError> {
        self.claim(2)?.copy_from_slice(&[ESCAPE, END_OF_BITMAP]);
        Ok(())
    }
}
