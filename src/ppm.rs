// ppm.rs - Binary PPM export of a surface region

use crate::core::PixelBuffer;
use crate::math::{unpack_rgb, Rect};

/// Encode `rect` of a native 32-bpp buffer as a binary (P6) PPM image.
///
/// The rectangle is truncated to the buffer; an empty result encodes a
/// 0×0 image.
pub fn encode_ppm(buffer: &PixelBuffer, rect: Rect) -> Vec<u8> {
    let rect = rect.intersection(&buffer.bounds()).unwrap_or_default();
    let mut out = format!("P6\n{} {}\n255\n", rect.width, rect.height).into_bytes();
    out.reserve(rect.area() as usize * 3);
    for pixel in buffer.read_rect(rect) {
        let (r, g, b) = unpack_rgb(pixel);
        out.extend_from_slice(&[r, g, b]);
    }
    out
}
