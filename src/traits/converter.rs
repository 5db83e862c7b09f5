use crate::core::Palette;
use crate::error::Result;

/// Colour and pixel-format conversion between the server depth and the
/// local destination depth
pub trait ColorConverter {
    /// Convert a top-down, tightly packed image.
    ///
    /// A 1→1 conversion passes monochrome data (rows padded to whole
    /// bytes) through unchanged.
    fn convert_image(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        src_bpp: u32,
        dst_bpp: u32,
        palette: &Palette,
    ) -> Result<Vec<u8>>;

    /// Convert one remote colour value to a destination pixel value
    fn convert_color(&self, color: u32, src_bpp: u32, dst_bpp: u32, palette: &Palette) -> Result<u32>;
}
