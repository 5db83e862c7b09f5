use crate::error::{GdiError, Result};
use crate::math::{depth_mask, Rect};

/// Bytes per pixel for a supported colour depth
pub fn bytes_per_pixel(bits_per_pixel: u32) -> Result<usize> {
    match bits_per_pixel {
        8 => Ok(1),
        15 | 16 => Ok(2),
        24 => Ok(3),
        32 => Ok(4),
        other => Err(GdiError::UnsupportedDepth(other)),
    }
}

/// Contiguous pixel storage at a fixed size and depth.
///
/// Holds exactly `width * height * bytes_per_pixel` bytes and is never
/// resized; a new buffer replaces it when the dimensions change. Storage
/// is word-backed so 32-bpp buffers are addressed as one native-endian
/// `u32` per pixel; shallower depths are packed little-endian.
#[derive(Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
    bytes_per_pixel: usize,
    len: usize,
    words: Vec<u32>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer.
    ///
    /// Each dimension must fit the `i32` coordinate space of [`Rect`].
    pub fn new(width: u32, height: u32, bits_per_pixel: u32) -> Result<Self> {
        let bpp = bytes_per_pixel(bits_per_pixel)?;
        let overflow = GdiError::Allocation { width, height, bytes: usize::MAX };
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(overflow);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(bpp))
            .ok_or(overflow)?;

        let word_count = len.div_ceil(4);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| GdiError::Allocation { width, height, bytes: len })?;
        words.resize(word_count, 0);

        Ok(Self {
            width,
            height,
            bits_per_pixel,
            bytes_per_pixel: bpp,
            len,
            words,
        })
    }

    /// Allocate a buffer and fill it from already-converted pixel bytes
    pub fn from_bytes(width: u32, height: u32, bits_per_pixel: u32, data: &[u8]) -> Result<Self> {
        let mut buffer = Self::new(width, height, bits_per_pixel)?;
        if data.len() != buffer.len {
            return Err(GdiError::InvalidImageData {
                expected: buffer.len,
                actual: data.len(),
            });
        }
        buffer.bytes_mut().copy_from_slice(data);
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Full extent as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width as i32, self.height as i32)
    }

    /// Mask of the bits a pixel value may occupy
    pub fn mask(&self) -> u32 {
        depth_mask(self.bits_per_pixel)
    }

    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.words)[..self.len]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.words)[..len]
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel value at (x, y), `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.bounds().contains_point(glam::IVec2::new(x, y)) {
            return None;
        }
        let mut value = [0u32; 1];
        self.read_span(x, y, &mut value);
        Some(value[0])
    }

    /// Store a pixel; writes outside the buffer are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u32) {
        if self.bounds().contains_point(glam::IVec2::new(x, y)) {
            self.write_span(x, y, &[value]);
        }
    }

    /// Read `out.len()` pixels of row `y` starting at column `x`.
    ///
    /// The span must lie inside the buffer.
    pub fn read_span(&self, x: i32, y: i32, out: &mut [u32]) {
        debug_assert!(x >= 0 && y >= 0 && (x as usize + out.len()) <= self.width as usize);
        let start = self.index(x, y);

        if self.bytes_per_pixel == 4 {
            out.copy_from_slice(&self.words[start..start + out.len()]);
            return;
        }

        let bpp = self.bytes_per_pixel;
        let bytes = self.bytes();
        for (i, px) in out.iter_mut().enumerate() {
            let at = (start + i) * bpp;
            *px = match bpp {
                1 => bytes[at] as u32,
                2 => u16::from_le_bytes([bytes[at], bytes[at + 1]]) as u32,
                _ => u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], 0]),
            };
        }
    }

    /// Write `src.len()` pixels into row `y` starting at column `x`
    pub fn write_span(&mut self, x: i32, y: i32, src: &[u32]) {
        debug_assert!(x >= 0 && y >= 0 && (x as usize + src.len()) <= self.width as usize);
        let start = self.index(x, y);

        if self.bytes_per_pixel == 4 {
            self.words[start..start + src.len()].copy_from_slice(src);
            return;
        }

        let bpp = self.bytes_per_pixel;
        let mask = self.mask();
        let bytes = self.bytes_mut();
        for (i, px) in src.iter().enumerate() {
            let at = (start + i) * bpp;
            let le = (px & mask).to_le_bytes();
            bytes[at..at + bpp].copy_from_slice(&le[..bpp]);
        }
    }

    /// Fill a rectangle (already inside the buffer) with one value
    pub fn fill_rect(&mut self, rect: Rect, value: u32) {
        if rect.is_empty() {
            return;
        }
        let row = vec![value; rect.width as usize];
        for y in rect.y..rect.bottom() {
            self.write_span(rect.x, y, &row);
        }
    }

    /// Fill the whole buffer with one value
    pub fn fill(&mut self, value: u32) {
        self.fill_rect(self.bounds(), value);
    }

    /// Copy a rectangle (inside the buffer) out as row-major pixels
    pub fn read_rect(&self, rect: Rect) -> Vec<u32> {
        if rect.is_empty() {
            return Vec::new();
        }
        let width = rect.width as usize;
        let mut pixels = vec![0u32; width * rect.height as usize];
        for (row, chunk) in pixels.chunks_exact_mut(width).enumerate() {
            self.read_span(rect.x, rect.y + row as i32, chunk);
        }
        pixels
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bits_per_pixel", &self.bits_per_pixel)
            .finish()
    }
}
