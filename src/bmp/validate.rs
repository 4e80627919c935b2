//! Structural validation of uncompressed 8bpp bitmaps.

use super::header::*;
use crate::error::ValidationError;

/// Validate a raw bitmap for RLE8 compression.
///
/// Checks run in a fixed order and the first failure is returned; no later
/// check is evaluated. On success the parsed [`HeaderView`] is returned.
pub fn validate(data: &[u8]) -> Result<HeaderView<'_>, ValidationError> {
    if (data.len() as u64) < u64::from(MIN_BITMAP_SIZE) {
        return Err(ValidationError::TooSmall);
    }
    let header = HeaderView::new(data);

    if header.file_type() != BITMAP_SIGNATURE {
        return Err(ValidationError::WrongFileType);
    }
    if u64::from(header.file_size()) != data.len() as u64 {
        return Err(ValidationError::InvalidFileSize);
    }

    let width = header.width();
    if !(1..=MAX_DIMENSION).contains(&width) {
        return Err(ValidationError::WrongWidth);
    }
    let height = header.height();
    if height == 0 || height > MAX_DIMENSION {
        return Err(ValidationError::WrongHeight);
    }
    if height < 0 {
        return Err(ValidationError::NoTopDown);
    }
    if header.planes() != 1 {
        return Err(ValidationError::WrongPlanes);
    }
    if header.bit_count() != BITS_PER_PIXEL {
        return Err(ValidationError::BitsPerPixel);
    }

    if header.is_core_header() {
        validate_core(&header)?;
    } else {
        validate_info(&header)?;
    }
    Ok(header)
}

fn validate_core(header: &HeaderView<'_>) -> Result<(), ValidationError> {
    // file size was already matched against the buffer length
    if !(MIN_CORE_OFF_BITS..=MAX_CORE_OFF_BITS).contains(&header.off_bits()) {
        return Err(ValidationError::WrongOffBits);
    }
    check_palette(header, 3, MIN_CORE_PALETTE_SIZE, MAX_CORE_PALETTE_SIZE)
}

fn validate_info(header: &HeaderView<'_>) -> Result<(), ValidationError> {
    if header.file_size() < MIN_INFO_BITMAP_SIZE {
        return Err(ValidationError::TooSmall);
    }
    if !(MIN_INFO_OFF_BITS..=MAX_INFO_OFF_BITS).contains(&header.off_bits()) {
        return Err(ValidationError::WrongOffBits);
    }
    if let InfoHeaderKind::Unknown(_) = header.kind() {
        return Err(ValidationError::InvalidInfoHeaderSize);
    }
    if header.compression() != BI_RGB {
        return Err(ValidationError::AlreadyCompressed);
    }
    if header.colors_used() > 256 {
        return Err(ValidationError::ClrUsed);
    }
    if header.colors_important() > 256 {
        return Err(ValidationError::ClrImportant);
    }
    check_palette(header, 4, MIN_INFO_PALETTE_SIZE, MAX_INFO_PALETTE_SIZE)
}

fn check_palette(
    header: &HeaderView<'_>,
    entry: u32,
    min: u32,
    max: u32,
) -> Result<(), ValidationError> {
    match header.palette_size() {
        Some(size) if size % entry == 0 && (min..=max).contains(&size) => Ok(()),
        _ => Err(ValidationError::InvalidColorPaletteSize),
    }
}
