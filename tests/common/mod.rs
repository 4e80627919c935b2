//! Shared fixtures and a strict RLE8 decoder used as a test oracle.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{Stop, StopReason};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Core,
    Info,
    V4,
    V5,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Core, Shape::Info, Shape::V4, Shape::V5];

    pub fn header_size(self) -> usize {
        match self {
            Shape::Core => 12,
            Shape::Info => 40,
            Shape::V4 => 108,
            Shape::V5 => 124,
        }
    }

    pub fn entry_size(self) -> usize {
        if self == Shape::Core { 3 } else { 4 }
    }
}

pub fn stride(width: usize) -> usize {
    (width + 3) & !3
}

/// Build an uncompressed 8bpp bottom-up BMP.
///
/// `rows` holds `width * height` indices in storage order (first row is the
/// bottom of the image). Padding bytes are filled with `pad`.
pub fn build_bmp(
    shape: Shape,
    width: usize,
    height: usize,
    palette_entries: usize,
    rows: &[u8],
    pad: u8,
) -> Vec<u8> {
    assert_eq!(rows.len(), width * height);
    let off_bits = 14 + shape.header_size() + palette_entries * shape.entry_size();
    let len = off_bits + stride(width) * height;

    let mut b = vec![0u8; off_bits];
    b[0..2].copy_from_slice(b"BM");
    b[2..6].copy_from_slice(&(len as u32).to_le_bytes());
    b[10..14].copy_from_slice(&(off_bits as u32).to_le_bytes());
    b[14..18].copy_from_slice(&(shape.header_size() as u32).to_le_bytes());
    if shape == Shape::Core {
        b[18..20].copy_from_slice(&(width as u16).to_le_bytes());
        b[20..22].copy_from_slice(&(height as u16).to_le_bytes());
        b[22..24].copy_from_slice(&1u16.to_le_bytes());
        b[24..26].copy_from_slice(&8u16.to_le_bytes());
    } else {
        b[18..22].copy_from_slice(&(width as u32).to_le_bytes());
        b[22..26].copy_from_slice(&(height as u32).to_le_bytes());
        b[26..28].copy_from_slice(&1u16.to_le_bytes());
        b[28..30].copy_from_slice(&8u16.to_le_bytes());
        // 72 DPI
        b[38..42].copy_from_slice(&2835u32.to_le_bytes());
        b[42..46].copy_from_slice(&2835u32.to_le_bytes());
        b[46..50].copy_from_slice(&(palette_entries as u32).to_le_bytes());
        // fill V4/V5 extension fields with something recognizable
        for (i, byte) in b[54..14 + shape.header_size()].iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(13).wrapping_add(1);
        }
    }

    let palette_start = 14 + shape.header_size();
    for i in 0..palette_entries {
        let at = palette_start + i * shape.entry_size();
        b[at] = i as u8;
        b[at + 1] = (i as u8).wrapping_mul(3);
        b[at + 2] = 255 - i as u8;
    }

    for row in rows.chunks_exact(width) {
        b.extend_from_slice(row);
        b.extend(std::iter::repeat_n(pad, stride(width) - width));
    }
    assert_eq!(b.len(), len);
    b
}

/// Write a little-endian u32 at `at`.
pub fn put_u32(b: &mut [u8], at: usize, v: u32) {
    b[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub fn put_u16(b: &mut [u8], at: usize, v: u16) {
    b[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

pub fn u32_at(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// Decode an RLE8 stream produced for a `width` x `height` plane.
///
/// Strict: rejects delta escapes, absolute runs shorter than 3, rows that are
/// too long or incomplete at a terminator, a missing end-of-bitmap and
/// trailing bytes after it. Returns the pixels in storage order, unpadded.
pub fn decode_rle8(stream: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    let mut pixels = Vec::with_capacity(width * height);
    let mut row_len = 0usize;
    let mut rows = 0usize;
    let mut pos = 0usize;

    let mut next = |pos: &mut usize| -> Result<u8, String> {
        let b = *stream
            .get(*pos)
            .ok_or_else(|| format!("stream ended at {pos}"))?;
        *pos += 1;
        Ok(b)
    };

    loop {
        let count = next(&mut pos)?;
        let value = next(&mut pos)?;
        if count != 0 {
            row_len += usize::from(count);
            if row_len > width {
                return Err(format!("row {rows} overflows at byte {pos}"));
            }
            pixels.extend(std::iter::repeat_n(value, usize::from(count)));
            continue;
        }
        match value {
            0 | 1 => {
                if row_len != width {
                    return Err(format!("row {rows} has {row_len} pixels, expected {width}"));
                }
                rows += 1;
                row_len = 0;
                if value == 1 {
                    break;
                }
                if rows == height {
                    return Err("end-of-line on the last row".into());
                }
            }
            2 => return Err(format!("unexpected delta at byte {pos}")),
            n => {
                let n = usize::from(n);
                row_len += n;
                if row_len > width {
                    return Err(format!("absolute run overflows row {rows}"));
                }
                for _ in 0..n {
                    pixels.push(next(&mut pos)?);
                }
                if n % 2 == 1 && next(&mut pos)? != 0 {
                    return Err(format!("non-zero pad at byte {pos}"));
                }
            }
        }
    }

    if rows != height {
        return Err(format!("end-of-bitmap after {rows} rows, expected {height}"));
    }
    if pos != stream.len() {
        return Err(format!("{} trailing bytes", stream.len() - pos));
    }
    Ok(pixels)
}

pub fn noise(len: usize, seed: u32, alphabet: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % alphabet) as u8
        })
        .collect()
}

pub fn checkerboard(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            pixels[y * w + x] = if (x + y) % 2 == 0 { 200 } else { 10 };
        }
    }
    pixels
}

/// Adjacent pixels always differ.
pub fn distinct(w: usize, h: usize) -> Vec<u8> {
    (0..w * h).map(|i| (i % 251) as u8).collect()
}

/// Runs of assorted lengths (1..=300) mixed with noise.
pub fn mixed(w: usize, h: usize, seed: u32) -> Vec<u8> {
    let lengths = noise(w * h, seed, 7);
    let values = noise(w * h, seed ^ 0x5A5A_5A5A, 256);
    let mut pixels = Vec::with_capacity(w * h);
    let mut i = 0;
    while pixels.len() < w * h {
        let run = match lengths[i % lengths.len()] {
            0 => 300,
            1 => 3,
            2 => 2,
            3 => 255,
            4 => 17,
            _ => 1,
        };
        let v = values[i % values.len()];
        for _ in 0..run {
            if pixels.len() == w * h {
                break;
            }
            pixels.push(v);
        }
        i += 1;
    }
    pixels
}

/// Stop token that allows `allowed` checks, then reports cancellation.
pub struct StopAfter {
    allowed: usize,
    calls: AtomicUsize,
}

impl StopAfter {
    pub fn new(allowed: usize) -> Self {
        Self {
            allowed,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `check` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Stop for StopAfter {
    fn check(&self) -> Result<(), StopReason> {
        if self.calls.fetch_add(1, Ordering::Relaxed) < self.allowed {
            Ok(())
        } else {
            Err(StopReason::Cancelled)
        }
    }
}
