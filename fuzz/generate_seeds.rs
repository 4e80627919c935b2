#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

/// Uncompressed 8bpp BMP with `header_size` bytes of info header.
fn bmp(header_size: u32, width: u32, height: u32, entries: u32, pixels: &[u8]) -> Vec<u8> {
    let core = header_size == 12;
    let entry = if core { 3 } else { 4 };
    let off_bits = 14 + header_size + entries * entry;
    let stride = (width + 3) & !3;
    let len = off_bits + stride * height;

    let mut b = vec![0u8; off_bits as usize];
    b[0] = b'B';
    b[1] = b'M';
    b[2..6].copy_from_slice(&len.to_le_bytes());
    b[10..14].copy_from_slice(&off_bits.to_le_bytes());
    b[14..18].copy_from_slice(&header_size.to_le_bytes());
    if core {
        b[18..20].copy_from_slice(&(width as u16).to_le_bytes());
        b[20..22].copy_from_slice(&(height as u16).to_le_bytes());
        b[22..24].copy_from_slice(&1u16.to_le_bytes());
        b[24..26].copy_from_slice(&8u16.to_le_bytes());
    } else {
        b[18..22].copy_from_slice(&width.to_le_bytes());
        b[22..26].copy_from_slice(&height.to_le_bytes());
        b[26..28].copy_from_slice(&1u16.to_le_bytes());
        b[28..30].copy_from_slice(&8u16.to_le_bytes());
        b[46..50].copy_from_slice(&entries.to_le_bytes());
    }
    for row in pixels.chunks_exact(width as usize) {
        b.extend_from_slice(row);
        b.resize(b.len() + (stride - width) as usize, 0);
    }
    b
}

fn main() {
    use std::fs;
    for dir in ["fuzz/corpus/fuzz_validate", "fuzz/corpus/fuzz_compress"] {
        fs::create_dir_all(dir).unwrap();

        fs::write(format!("{dir}/core_1x1.bmp"), bmp(12, 1, 1, 1, &[0])).unwrap();
        fs::write(format!("{dir}/info_5x2.bmp"), bmp(40, 5, 2, 2, &[1, 3, 3, 3, 4, 7, 7, 7, 7, 7]))
            .unwrap();
        let runs: Vec<u8> = (0..64 * 4).map(|i| (i / 20) as u8).collect();
        fs::write(format!("{dir}/v4_64x4_runs.bmp"), bmp(108, 64, 4, 16, &runs)).unwrap();
        let literal: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
        fs::write(format!("{dir}/v5_300x1_literal.bmp"), bmp(124, 300, 1, 256, &literal)).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
        let mut top_down = bmp(40, 2, 2, 1, &[1, 2, 3, 4]);
        top_down[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        fs::write(format!("{dir}/top_down.bin"), top_down).unwrap();
        let mut compressed = bmp(40, 2, 2, 1, &[1, 2, 3, 4]);
        compressed[30..34].copy_from_slice(&1u32.to_le_bytes());
        fs::write(format!("{dir}/already_rle8.bin"), compressed).unwrap();
    }

    println!("Generated seed corpus in fuzz/corpus/");
}
