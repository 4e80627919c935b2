//! Header transcoding for RLE8 output.
//!
//! RLE8 is only expressible in the compression field of a modern header, so
//! core headers are rewritten as a 40-byte info header with RGB-quad palette
//! entries. Modern headers are copied verbatim.

use super::header::*;
use crate::error::{BitmapError, ValidationError};

/// Pixel-data offset of the RLE8 output for this input.
///
/// `None` if a core palette is too large for the widened offset to fit in
/// 32 bits, which validated inputs never are.
pub fn rle8_off_bits(header: &HeaderView<'_>) -> Option<u32> {
    if header.is_core_header() {
        let entries = header.palette_entries().unwrap_or(0);
        entries
            .checked_mul(4)?
            .checked_add(FILE_HEADER_SIZE + INFO_HEADER_SIZE)
    } else {
        Some(header.off_bits())
    }
}

/// Write the file header, info header and palette of the RLE8 output into
/// `out`, with compression set to RLE8 and the new off-bits.
///
/// `header` must have passed [`crate::validate`]. File size and image size
/// are left for [`super::sizing::finalize_sizes`]. Returns the output
/// off-bits, i.e. where encoded pixel data starts in `out`.
pub fn write_rle8_header(header: &HeaderView<'_>, out: &mut [u8]) -> Result<u32, BitmapError> {
    let off_bits =
        rle8_off_bits(header).ok_or(ValidationError::InvalidColorPaletteSize)?;
    let top = off_bits as usize;
    if out.len() < top {
        return Err(BitmapError::BufferTooSmall {
            needed: top,
            actual: out.len(),
        });
    }

    if header.is_core_header() {
        write_from_core(header, &mut out[..top])?;
    } else {
        let src = header.bytes();
        if src.len() < top {
            return Err(BitmapError::TruncatedPixelData {
                needed: top,
                actual: src.len(),
            });
        }
        out[..top].copy_from_slice(&src[..top]);
    }

    let mut fields = HeaderMut::new(out)?;
    fields.set_off_bits(off_bits);
    fields.set_compression(BI_RLE8);
    Ok(off_bits)
}

fn write_from_core(header: &HeaderView<'_>, out: &mut [u8]) -> Result<(), BitmapError> {
    let src = header.bytes();
    let triples = header.palette();
    let headers_end = (FILE_HEADER_SIZE + CORE_HEADER_SIZE) as usize;
    if src.len() < headers_end || triples.len() != header.palette_size().unwrap_or(0) as usize {
        return Err(BitmapError::TruncatedPixelData {
            needed: header.off_bits() as usize,
            actual: src.len(),
        });
    }

    // file header, info size and the 16-bit core width
    out[..offset::CORE_HEIGHT].copy_from_slice(&src[..offset::CORE_HEIGHT]);
    let quads_start = (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as usize;
    {
        let mut fields = HeaderMut::new(out)?;
        fields.set_info_header_size(INFO_HEADER_SIZE);
        // core dimensions are unsigned 16-bit, so zero extension is exact
        fields.set_width(header.width() as u32);
        fields.set_height(header.height() as u32);
        fields.set_planes_and_bit_count(header.planes(), header.bit_count());
        fields.set_image_size(0);
        fields.clear_extension_fields();
    }

    for (quad, triple) in out[quads_start..]
        .chunks_exact_mut(4)
        .zip(triples.chunks_exact(3))
    {
        quad[..3].copy_from_slice(triple);
        quad[3] = 0;
    }
    Ok(())
}
