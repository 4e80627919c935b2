/// Resource limits for compression.
///
/// All fields default to `None` (no limit). Limits are checked after
/// validation and before the output buffer is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the output buffer allocation (the worst-case bound,
    /// not the final compressed size).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), crate::BitmapError> {
        if let Some(max_w) = self.max_width
            && u64::from(width) > max_w
        {
            return Err(crate::BitmapError::LimitExceeded(alloc::format!(
                "width {width} exceeds limit {max_w}"
            )));
        }
        if let Some(max_h) = self.max_height
            && u64::from(height) > max_h
        {
            return Err(crate::BitmapError::LimitExceeded(alloc::format!(
                "height {height} exceeds limit {max_h}"
            )));
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(crate::BitmapError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that the output allocation is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::BitmapError> {
        if let Some(max_mem) = self.max_memory_bytes
            && bytes as u64 > max_mem
        {
            return Err(crate::BitmapError::LimitExceeded(alloc::format!(
                "output allocation {bytes} bytes exceeds memory limit {max_mem}"
            )));
        }
        Ok(())
    }
}
