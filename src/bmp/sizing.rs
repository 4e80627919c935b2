//! Output buffer sizing and final size back-patching.

use super::header::*;
use super::transcode::rle8_off_bits;
use crate::error::BitmapError;

fn too_large(header: &HeaderView<'_>) -> BitmapError {
    BitmapError::DimensionsTooLarge {
        width: header.width().unsigned_abs(),
        height: header.height().unsigned_abs(),
    }
}

/// Upper bound on the RLE8 output for a validated input:
/// `off_bits + 2 * (pixel_data_size - padding * height + height)`.
///
/// In the worst case every pixel costs two bytes and each row adds a two-byte
/// terminator. Padding is subtracted because it is never encoded. The input
/// must hold `row_stride(width) * height` pixel bytes for the bound to be
/// sufficient; the compression pipeline checks that first.
pub fn max_output_size(header: &HeaderView<'_>) -> Result<usize, BitmapError> {
    let width = header.width().unsigned_abs() as usize;
    let height = header.height().unsigned_abs() as usize;
    let pixel_data_size = header.file_size().saturating_sub(header.off_bits()) as usize;

    let padding = row_padding(width).checked_mul(height);
    let off_bits = rle8_off_bits(header);

    padding
        .and_then(|p| pixel_data_size.checked_sub(p))
        .and_then(|n| n.checked_add(height))
        .and_then(|n| n.checked_mul(2))
        .and_then(|n| n.checked_add(off_bits? as usize))
        .ok_or_else(|| too_large(header))
}

/// Write the final file size (`off_bits + encoded_len`) and image size
/// (`encoded_len`) into the output header. Returns the total size.
pub fn finalize_sizes(
    out: &mut [u8],
    off_bits: u32,
    encoded_len: usize,
) -> Result<usize, BitmapError> {
    let image_size = u32::try_from(encoded_len).map_err(|_| {
        BitmapError::LimitExceeded(alloc::format!(
            "encoded size {encoded_len} does not fit the 32-bit size field"
        ))
    })?;
    let total = off_bits.checked_add(image_size).ok_or_else(|| {
        BitmapError::LimitExceeded(alloc::format!(
            "file size {off_bits} + {encoded_len} does not fit the 32-bit size field"
        ))
    })?;

    let mut fields = HeaderMut::new(out)?;
    fields.set_file_size(total);
    fields.set_image_size(image_size);
    Ok(total as usize)
}
