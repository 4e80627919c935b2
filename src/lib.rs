//! # zenrle8
//!
//! RLE8 compression for uncompressed 8-bit palette BMP images.
//!
//! Takes a bottom-up, 8bpp, uncompressed bitmap with either the legacy 12-byte
//! core header or a modern 40/108/124-byte info header and produces the same
//! image with `BI_RLE8` compression, byte-exact and ready to write to disk.
//!
//! ## Pipeline
//!
//! 1. [`validate`] runs ordered structural checks; the first failing
//!    [`ValidationError`] kind is returned.
//! 2. The header is transcoded: modern headers are copied verbatim, core
//!    headers are rewritten as a 40-byte info header with 4-byte palette
//!    entries. Compression is set to RLE8.
//! 3. The output is allocated once at a worst-case bound
//!    ([`max_output_size`]) so encoding never reallocates.
//! 4. [`Rle8Encoder`] encodes each row into encoded runs (`count, value`) and
//!    absolute runs (`00 count bytes.. [pad]`), ending rows with `00 00` and
//!    the image with `00 01`.
//! 5. File size and image size are back-patched ([`finalize_sizes`]).
//!
//! ## Non-Goals
//!
//! - Decoding RLE8
//! - Top-down or already compressed input
//! - Bit depths other than 8
//!
//! ## Usage
//!
//! ```no_run
//! use zenrle8::{CompressRequest, Rle8Strategy, ValidationError};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your 8bpp BMP bytes
//!
//! // Validate only
//! match zenrle8::validate(data) {
//!     Ok(header) => println!("{}x{} {:?}", header.width(), header.height(), header.kind()),
//!     Err(kind) => eprintln!("error {}: {kind}", kind.code()),
//! }
//!
//! // Compress
//! let out = CompressRequest::new(data)
//!     .with_strategy(Rle8Strategy::Lanes)
//!     .compress(Unstoppable)?;
//! std::fs::write("out.bmp", out.bytes()).unwrap();
//! # Ok::<(), zenrle8::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod compress;
mod error;
mod limits;

pub mod bmp;

// Re-exports
pub use bmp::header::{HeaderMut, HeaderView, InfoHeaderKind, row_padding, row_stride};
pub use bmp::{
    Rle8Encoder, Rle8Strategy, encode_rle8, finalize_sizes, max_encoded_len, max_output_size,
    rle8_off_bits, validate, write_rle8_header,
};
pub use compress::{CompressRequest, CompressedBitmap};
pub use enough::{Stop, Unstoppable};
pub use error::{BitmapError, ValidationError};
pub use limits::Limits;

/// Compress an uncompressed 8bpp BMP to RLE8 with default settings.
pub fn compress(data: &[u8], stop: impl Stop) -> Result<CompressedBitmap, BitmapError> {
    CompressRequest::new(data).compress(stop)
}
