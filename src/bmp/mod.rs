//! 8bpp BMP header model, validation and RLE8 encoding (internal).
//!
//! Use top-level [`crate::compress`], [`crate::validate`], etc.

mod encode;
pub mod header;
mod scan;
mod sizing;
mod transcode;
mod validate;
mod writer;

pub use encode::{Rle8Encoder, Rle8Strategy, encode_rle8, max_encoded_len};
pub use sizing::{finalize_sizes, max_output_size};
pub use transcode::{rle8_off_bits, write_rle8_header};
pub use validate::validate;

use crate::compress::CompressedBitmap;
use crate::error::BitmapError;
use crate::limits::Limits;
use alloc::vec;
use enough::Stop;
use header::{HeaderView, row_stride};

/// Validate, transcode the header, encode and back-patch sizes.
pub(crate) fn compress(
    data: &[u8],
    limits: Option<&Limits>,
    strategy: Rle8Strategy,
    stop: &dyn Stop,
) -> Result<CompressedBitmap, BitmapError> {
    let header = match validate(data) {
        Ok(header) => header,
        Err(kind) => {
            #[cfg(feature = "debug-logging")]
            log::debug!("rle8: rejected input ({} bytes): {kind}", data.len());
            return Err(kind.into());
        }
    };

    // validated: 1..=7680 on both axes
    let width = header.width() as u32;
    let height = header.height() as u32;
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }

    let pixels = pixel_plane(&header)?;
    let bound = max_output_size(&header)?;
    if let Some(limits) = limits {
        limits.check_memory(bound)?;
    }

    #[cfg(feature = "debug-logging")]
    log::debug!(
        "rle8: {:?} header, {width}x{height}, output bound {bound} bytes, {strategy:?}",
        header.kind()
    );

    stop.check()?;
    let mut out = vec![0u8; bound];
    let off_bits = write_rle8_header(&header, &mut out)?;
    let encoded_len = Rle8Encoder::new(strategy).encode_plane(
        pixels,
        width as usize,
        height as usize,
        &mut out[off_bits as usize..],
        stop,
    )?;
    let total = finalize_sizes(&mut out, off_bits, encoded_len)?;
    out.truncate(total);

    #[cfg(feature = "debug-logging")]
    log::debug!(
        "rle8: {} -> {total} bytes ({encoded_len} bytes of pixel data)",
        data.len()
    );

    Ok(CompressedBitmap::new(out, off_bits, width, height))
}

/// The stored pixel rows of a validated input, padding included.
fn pixel_plane<'a>(header: &HeaderView<'a>) -> Result<&'a [u8], BitmapError> {
    let width = header.width() as usize;
    let height = header.height() as usize;
    let needed = row_stride(width)
        .checked_mul(height)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: width as u32,
            height: height as u32,
        })?;
    let pixels = header.pixel_data();
    if pixels.len() < needed {
        return Err(BitmapError::TruncatedPixelData {
            needed,
            actual: pixels.len(),
        });
    }
    Ok(&pixels[..needed])
}
