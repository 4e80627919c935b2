use alloc::string::String;
use enough::StopReason;

/// Structural problems found by [`crate::validate`].
///
/// Checks run in a fixed order and the first failure wins, so each malformed
/// input maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("bitmap file is too small")]
    TooSmall,

    #[error("the file is not a bitmap")]
    WrongFileType,

    #[error("the bitmap declares a wrong file size")]
    InvalidFileSize,

    #[error("bitmap width must be between 1 and 7680")]
    WrongWidth,

    #[error("bitmap height must be between 1 and 7680")]
    WrongHeight,

    #[error("top-down bitmaps are not supported")]
    NoTopDown,

    #[error("invalid plane count, expected 1")]
    WrongPlanes,

    #[error("bits per pixel must be 8")]
    BitsPerPixel,

    #[error("pixel data offset (off-bits) out of range")]
    WrongOffBits,

    #[error("color palette size is invalid for this header")]
    InvalidColorPaletteSize,

    #[error("invalid information header size")]
    InvalidInfoHeaderSize,

    #[error("bitmap is already compressed, expected uncompressed input")]
    AlreadyCompressed,

    #[error("invalid number of colors used")]
    ClrUsed,

    #[error("invalid number of important colors")]
    ClrImportant,
}

impl ValidationError {
    /// Stable numeric code for this kind, suitable as a process exit status.
    pub fn code(self) -> u8 {
        match self {
            Self::TooSmall => 1,
            Self::WrongFileType => 2,
            Self::WrongWidth => 3,
            Self::WrongHeight => 4,
            Self::AlreadyCompressed => 5,
            Self::BitsPerPixel => 6,
            Self::WrongPlanes => 7,
            Self::InvalidFileSize => 8,
            Self::InvalidInfoHeaderSize => 9,
            Self::ClrUsed => 10,
            Self::ClrImportant => 11,
            Self::WrongOffBits => 12,
            Self::NoTopDown => 13,
            Self::InvalidColorPaletteSize => 14,
        }
    }
}

/// Errors from RLE8 compression.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("invalid bitmap: {0}")]
    Invalid(#[from] ValidationError),

    #[error("pixel data truncated: need {needed} bytes, got {actual}")]
    TruncatedPixelData { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}

impl BitmapError {
    /// The validation kind, when this error came from [`crate::validate`].
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Invalid(kind) => Some(*kind),
            _ => None,
        }
    }
}
