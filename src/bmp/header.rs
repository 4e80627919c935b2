//! Fixed-offset header model for 8bpp bitmaps.
//!
//! Two on-disk shapes share the 14-byte file header: the legacy 12-byte core
//! header (16-bit width/height, 3-byte palette entries) and the modern
//! 40/108/124-byte info headers (32-bit width/height, 4-byte palette entries).
//! The field layout is picked once when a [`HeaderView`] is built.

// ── Sizes and tags ──────────────────────────────────────────────────

pub const FILE_HEADER_SIZE: u32 = 14;
pub const CORE_HEADER_SIZE: u32 = 12;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const V4_HEADER_SIZE: u32 = 108;
pub const V5_HEADER_SIZE: u32 = 124;

/// `"BM"` file type tag.
pub const BITMAP_SIGNATURE: [u8; 2] = *b"BM";

pub const BI_RGB: u32 = 0;
pub const BI_RLE8: u32 = 1;

pub const BITS_PER_PIXEL: u16 = 8;

/// Largest accepted width or height (8K).
pub const MAX_DIMENSION: i32 = 7680;

pub const MIN_CORE_PALETTE_SIZE: u32 = 3;
pub const MAX_CORE_PALETTE_SIZE: u32 = 256 * 3;
pub const MIN_INFO_PALETTE_SIZE: u32 = 4;
pub const MAX_INFO_PALETTE_SIZE: u32 = 256 * 4;

pub const MIN_CORE_OFF_BITS: u32 = FILE_HEADER_SIZE + CORE_HEADER_SIZE + MIN_CORE_PALETTE_SIZE;
pub const MAX_CORE_OFF_BITS: u32 = FILE_HEADER_SIZE + CORE_HEADER_SIZE + MAX_CORE_PALETTE_SIZE;
pub const MIN_INFO_OFF_BITS: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE + MIN_INFO_PALETTE_SIZE;
pub const MAX_INFO_OFF_BITS: u32 = FILE_HEADER_SIZE + V5_HEADER_SIZE + MAX_INFO_PALETTE_SIZE;

/// Smallest legal file: core header, one palette entry, one pixel.
pub const MIN_BITMAP_SIZE: u32 = MIN_CORE_OFF_BITS + 1;
/// Smallest legal file with a modern header.
pub const MIN_INFO_BITMAP_SIZE: u32 = MIN_INFO_OFF_BITS + 1;

/// Byte offsets from the start of the file.
pub mod offset {
    pub const FILE_TYPE: usize = 0;
    pub const FILE_SIZE: usize = 2;
    pub const OFF_BITS: usize = 10;
    pub const INFO_SIZE: usize = 14;
    pub const WIDTH: usize = 18;
    pub const HEIGHT: usize = 22;
    pub const PLANES: usize = 26;
    pub const BIT_COUNT: usize = 28;
    pub const COMPRESSION: usize = 30;
    pub const SIZE_IMAGE: usize = 34;
    pub const X_PELS_PER_METER: usize = 38;
    pub const CLR_USED: usize = 46;
    pub const CLR_IMPORTANT: usize = 50;
    pub const CORE_WIDTH: usize = 18;
    pub const CORE_HEIGHT: usize = 20;
    pub const CORE_PLANES: usize = 22;
    pub const CORE_BIT_COUNT: usize = 24;
}

/// Padding bytes after each row so rows start on a 4-byte boundary.
pub fn row_padding(width: usize) -> usize {
    (4 - width % 4) % 4
}

/// Bytes per stored row, padding included.
pub fn row_stride(width: usize) -> usize {
    width + row_padding(width)
}

// ── Header shape ────────────────────────────────────────────────────

/// Info header shape, selected by the info-header size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoHeaderKind {
    /// `BITMAPCOREHEADER` (12 bytes).
    Core,
    /// `BITMAPINFOHEADER` (40 bytes).
    Info,
    /// `BITMAPV4HEADER` (108 bytes).
    V4,
    /// `BITMAPV5HEADER` (124 bytes).
    V5,
    /// Any other size. Read with the modern layout; rejected by validation.
    Unknown(u32),
}

impl InfoHeaderKind {
    pub fn from_size(size: u32) -> Self {
        match size {
            CORE_HEADER_SIZE => Self::Core,
            INFO_HEADER_SIZE => Self::Info,
            V4_HEADER_SIZE => Self::V4,
            V5_HEADER_SIZE => Self::V5,
            other => Self::Unknown(other),
        }
    }

    pub fn size(self) -> u32 {
        match self {
            Self::Core => CORE_HEADER_SIZE,
            Self::Info => INFO_HEADER_SIZE,
            Self::V4 => V4_HEADER_SIZE,
            Self::V5 => V5_HEADER_SIZE,
            Self::Unknown(size) => size,
        }
    }

    pub fn is_core(self) -> bool {
        self == Self::Core
    }

    /// Bytes per palette entry: RGB triple for core, RGB quad otherwise.
    pub fn palette_entry_size(self) -> u32 {
        if self.is_core() { 3 } else { 4 }
    }
}

/// Where the shape-dependent fields live.
#[derive(Debug)]
struct DibLayout {
    width: usize,
    height: usize,
    planes: usize,
    bit_count: usize,
    /// 32-bit width/height (modern) vs 16-bit (core).
    wide: bool,
}

static CORE_LAYOUT: DibLayout = DibLayout {
    width: offset::CORE_WIDTH,
    height: offset::CORE_HEIGHT,
    planes: offset::CORE_PLANES,
    bit_count: offset::CORE_BIT_COUNT,
    wide: false,
};

static MODERN_LAYOUT: DibLayout = DibLayout {
    width: offset::WIDTH,
    height: offset::HEIGHT,
    planes: offset::PLANES,
    bit_count: offset::BIT_COUNT,
    wide: true,
};

fn u16_at(data: &[u8], off: usize) -> u16 {
    match data.get(off..off + 2) {
        Some(b) => u16::from_le_bytes([b[0], b[1]]),
        None => 0,
    }
}

fn u32_at(data: &[u8], off: usize) -> u32 {
    match data.get(off..off + 4) {
        Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        None => 0,
    }
}

// ── Read view ───────────────────────────────────────────────────────

/// Read-only view over a raw bitmap buffer.
///
/// Accessors read fixed little-endian offsets. Fields that lie beyond the end
/// of a short buffer read as zero; [`crate::validate`] rejects such buffers
/// before those fields are consulted.
#[derive(Clone, Copy)]
pub struct HeaderView<'a> {
    data: &'a [u8],
    kind: InfoHeaderKind,
    layout: &'static DibLayout,
}

impl core::fmt::Debug for HeaderView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeaderView")
            .field("len", &self.data.len())
            .field("kind", &self.kind)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("off_bits", &self.off_bits())
            .finish()
    }
}

impl<'a> HeaderView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let kind = InfoHeaderKind::from_size(u32_at(data, offset::INFO_SIZE));
        let layout = if kind.is_core() {
            &CORE_LAYOUT
        } else {
            &MODERN_LAYOUT
        };
        Self { data, kind, layout }
    }

    /// The whole underlying buffer.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn kind(&self) -> InfoHeaderKind {
        self.kind
    }

    pub fn is_core_header(&self) -> bool {
        self.kind.is_core()
    }

    pub fn file_type(&self) -> [u8; 2] {
        match self.data.get(offset::FILE_TYPE..offset::FILE_TYPE + 2) {
            Some(b) => [b[0], b[1]],
            None => [0; 2],
        }
    }

    pub fn file_size(&self) -> u32 {
        u32_at(self.data, offset::FILE_SIZE)
    }

    pub fn off_bits(&self) -> u32 {
        u32_at(self.data, offset::OFF_BITS)
    }

    pub fn info_header_size(&self) -> u32 {
        self.kind.size()
    }

    /// Signed width. Core headers store an unsigned 16-bit value.
    pub fn width(&self) -> i32 {
        if self.layout.wide {
            u32_at(self.data, self.layout.width) as i32
        } else {
            i32::from(u16_at(self.data, self.layout.width))
        }
    }

    /// Signed height; negative means top-down row order.
    pub fn height(&self) -> i32 {
        if self.layout.wide {
            u32_at(self.data, self.layout.height) as i32
        } else {
            i32::from(u16_at(self.data, self.layout.height))
        }
    }

    pub fn planes(&self) -> u16 {
        u16_at(self.data, self.layout.planes)
    }

    pub fn bit_count(&self) -> u16 {
        u16_at(self.data, self.layout.bit_count)
    }

    /// Compression mode. Core headers cannot express compression and always
    /// report [`BI_RGB`].
    pub fn compression(&self) -> u32 {
        if self.is_core_header() {
            BI_RGB
        } else {
            u32_at(self.data, offset::COMPRESSION)
        }
    }

    pub fn image_size(&self) -> u32 {
        if self.is_core_header() {
            0
        } else {
            u32_at(self.data, offset::SIZE_IMAGE)
        }
    }

    pub fn colors_used(&self) -> u32 {
        if self.is_core_header() {
            0
        } else {
            u32_at(self.data, offset::CLR_USED)
        }
    }

    pub fn colors_important(&self) -> u32 {
        if self.is_core_header() {
            0
        } else {
            u32_at(self.data, offset::CLR_IMPORTANT)
        }
    }

    /// Palette length in bytes: `off_bits - info_header_size - 14`.
    ///
    /// `None` if off-bits points inside the headers.
    pub fn palette_size(&self) -> Option<u32> {
        self.off_bits()
            .checked_sub(self.info_header_size())?
            .checked_sub(FILE_HEADER_SIZE)
    }

    /// Number of palette entries.
    pub fn palette_entries(&self) -> Option<u32> {
        Some(self.palette_size()? / self.kind.palette_entry_size())
    }

    /// Raw palette bytes, empty if the header does not describe a palette
    /// that fits in the buffer.
    pub fn palette(&self) -> &'a [u8] {
        let start = (FILE_HEADER_SIZE + self.info_header_size()) as usize;
        self.palette_size()
            .and_then(|len| self.data.get(start..start + len as usize))
            .unwrap_or(&[])
    }

    /// Everything from off-bits to the end of the buffer.
    pub fn pixel_data(&self) -> &'a [u8] {
        self.data.get(self.off_bits() as usize..).unwrap_or(&[])
    }
}

// ── Write view ──────────────────────────────────────────────────────

/// Mutable view over an output buffer that holds a modern (info) header.
///
/// Setters write little-endian values at the modern offsets. The buffer must
/// be at least 54 bytes (file header plus a 40-byte info header).
pub struct HeaderMut<'a> {
    data: &'a mut [u8],
}

impl<'a> HeaderMut<'a> {
    /// Minimum buffer length for the modern header fields.
    pub const MIN_LEN: usize = (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as usize;

    pub fn new(data: &'a mut [u8]) -> Result<Self, crate::BitmapError> {
        if data.len() < Self::MIN_LEN {
            return Err(crate::BitmapError::BufferTooSmall {
                needed: Self::MIN_LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    fn put_u16(&mut self, off: usize, value: u16) {
        self.data[off..off + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, off: usize, value: u32) {
        self.data[off..off + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn set_file_size(&mut self, size: u32) {
        self.put_u32(offset::FILE_SIZE, size);
    }

    pub fn set_off_bits(&mut self, off_bits: u32) {
        self.put_u32(offset::OFF_BITS, off_bits);
    }

    pub fn set_info_header_size(&mut self, size: u32) {
        self.put_u32(offset::INFO_SIZE, size);
    }

    pub fn set_width(&mut self, width: u32) {
        self.put_u32(offset::WIDTH, width);
    }

    pub fn set_height(&mut self, height: u32) {
        self.put_u32(offset::HEIGHT, height);
    }

    pub fn set_planes_and_bit_count(&mut self, planes: u16, bit_count: u16) {
        self.put_u16(offset::PLANES, planes);
        self.put_u16(offset::BIT_COUNT, bit_count);
    }

    pub fn set_compression(&mut self, compression: u32) {
        self.put_u32(offset::COMPRESSION, compression);
    }

    pub fn set_image_size(&mut self, size: u32) {
        self.put_u32(offset::SIZE_IMAGE, size);
    }

    /// Zero pels-per-meter, colors-used and colors-important.
    pub fn clear_extension_fields(&mut self) {
        self.data[offset::X_PELS_PER_METER..offset::CLR_IMPORTANT + 4].fill(0);
    }
}
