use alloc::vec::Vec;
use enough::Stop;

use crate::bmp::Rle8Strategy;
use crate::error::BitmapError;
use crate::limits::Limits;

/// A finished RLE8 bitmap: headers, palette and encoded pixel data.
#[derive(Clone, Debug)]
pub struct CompressedBitmap {
    data: Vec<u8>,
    off_bits: u32,
    pub width: u32,
    pub height: u32,
}

impl CompressedBitmap {
    pub(crate) fn new(data: Vec<u8>, off_bits: u32, width: u32, height: u32) -> Self {
        Self {
            data,
            off_bits,
            width,
            height,
        }
    }

    /// The complete output file.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the output file.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total file size, equal to the header's file-size field.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset of the encoded pixel data.
    pub fn off_bits(&self) -> u32 {
        self.off_bits
    }

    /// Length of the encoded pixel data, equal to the header's image-size field.
    pub fn image_size(&self) -> usize {
        self.data.len() - self.off_bits as usize
    }

    /// The RLE8 stream, ending with the end-of-bitmap escape.
    pub fn pixel_data(&self) -> &[u8] {
        &self.data[self.off_bits as usize..]
    }
}

/// Builder for compressing an uncompressed 8bpp BMP to RLE8.
///
/// ```no_run
/// use zenrle8::{CompressRequest, Limits, Rle8Strategy};
/// use enough::Unstoppable;
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits {
///     max_pixels: Some(4096 * 4096),
///     ..Default::default()
/// };
/// let out = CompressRequest::new(data)
///     .with_limits(&limits)
///     .with_strategy(Rle8Strategy::Lanes)
///     .compress(Unstoppable)?;
/// println!("{} -> {} bytes", data.len(), out.len());
/// # Ok::<(), zenrle8::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CompressRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    strategy: Rle8Strategy,
}

impl<'a> CompressRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            strategy: Rle8Strategy::default(),
        }
    }

    /// Reject inputs whose dimensions or output allocation exceed `limits`.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Select the run scanning strategy. Output is identical for all of them.
    pub fn with_strategy(mut self, strategy: Rle8Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn compress(self, stop: impl Stop) -> Result<CompressedBitmap, BitmapError> {
        crate::bmp::compress(self.data, self.limits, self.strategy, &stop)
    }
}
