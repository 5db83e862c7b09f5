use crate::error::{GdiError, Result};

/// Pre-rasterized 1-bpp glyph.
///
/// Rows are padded to whole bytes, most significant bit leftmost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Glyph {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let oversized = GdiError::Allocation {
            width,
            height,
            bytes: usize::MAX,
        };
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(oversized);
        }
        let expected = Self::stride_for(width)
            .checked_mul(height as usize)
            .ok_or(oversized)?;
        if data.len() != expected {
            return Err(GdiError::InvalidImageData {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    pub fn bounds(&self) -> crate::math::Rect {
        crate::math::Rect::from_size(self.width as i32, self.height as i32)
    }

    /// Whether the glyph covers (x, y); false outside the bitmap
    #[inline]
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        let byte = y as usize * self.stride() + x as usize / 8;
        self.data[byte] & (0x80 >> (x % 8)) != 0
    }
}
