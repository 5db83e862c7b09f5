// convert.rs - Default colour converter

use crate::core::Palette;
use crate::error::{GdiError, Result};
use crate::math::{expand5, expand6, pack_argb};
use crate::traits::ColorConverter;

/// Converts the common remote depths to 16, 24 or 32 bpp.
///
/// Native 32-bpp pixels are `0xFFRRGGBB` words, 24-bpp pixels are stored
/// as B, G, R bytes and 16-bpp as little-endian RGB565.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConverter;

type Rgb = (u8, u8, u8);

fn decode_pixel(bytes: &[u8], src_bpp: u32, palette: &Palette) -> Rgb {
    match src_bpp {
        8 => {
            let entry = palette.entry(bytes[0]);
            (entry.red, entry.green, entry.blue)
        }
        15 => {
            let v = u16::from_le_bytes([bytes[0], bytes[1]]) as u32;
            (expand5(v >> 10), expand5(v >> 5), expand5(v))
        }
        16 => {
            let v = u16::from_le_bytes([bytes[0], bytes[1]]) as u32;
            (expand5(v >> 11), expand6(v >> 5), expand5(v))
        }
        // 24 and 32: blue first, padding byte ignored
        _ => (bytes[2], bytes[1], bytes[0]),
    }
}

fn decode_color(color: u32, src_bpp: u32, palette: &Palette) -> Rgb {
    match src_bpp {
        8 | 15 | 16 => decode_pixel(&color.to_le_bytes(), src_bpp, palette),
        // Red in the low byte
        _ => (color as u8, (color >> 8) as u8, (color >> 16) as u8),
    }
}

fn encode_color((r, g, b): Rgb, dst_bpp: u32) -> u32 {
    match dst_bpp {
        16 => ((r as u32 >> 3) << 11) | ((g as u32 >> 2) << 5) | (b as u32 >> 3),
        24 => (r as u32) << 16 | (g as u32) << 8 | b as u32,
        _ => pack_argb(r, g, b),
    }
}

fn check_depths(src_bpp: u32, dst_bpp: u32) -> Result<()> {
    let src_ok = matches!(src_bpp, 8 | 15 | 16 | 24 | 32);
    let dst_ok = matches!(dst_bpp, 16 | 24 | 32);
    if src_ok && dst_ok {
        Ok(())
    } else {
        Err(GdiError::UnsupportedConversion { src_bpp, dst_bpp })
    }
}

/// `width * height * bytes`, or an allocation error when it overflows
fn image_len(width: u32, height: u32, row_bytes: usize, step: usize) -> Result<usize> {
    row_bytes
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(step))
        .ok_or(GdiError::Allocation {
            width,
            height,
            bytes: usize::MAX,
        })
}

fn expect_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(GdiError::InvalidImageData {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

impl ColorConverter for StandardConverter {
    fn convert_image(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        src_bpp: u32,
        dst_bpp: u32,
        palette: &Palette,
    ) -> Result<Vec<u8>> {
        if src_bpp == 1 && dst_bpp == 1 {
            expect_len(data, image_len(width, height, (width as usize).div_ceil(8), 1)?)?;
            return Ok(data.to_vec());
        }
        check_depths(src_bpp, dst_bpp)?;

        let src_step = (src_bpp as usize).div_ceil(8);
        expect_len(data, image_len(width, height, width as usize, src_step)?)?;
        let decoded = data.chunks_exact(src_step).map(|px| decode_pixel(px, src_bpp, palette));

        Ok(match dst_bpp {
            32 => {
                let words: Vec<u32> = decoded.map(|rgb| encode_color(rgb, 32)).collect();
                bytemuck::cast_slice::<u32, u8>(&words).to_vec()
            }
            24 => decoded.flat_map(|(r, g, b)| [b, g, r]).collect(),
            _ => decoded
                .flat_map(|rgb| (encode_color(rgb, 16) as u16).to_le_bytes())
                .collect(),
        })
    }

    fn convert_color(&self, color: u32, src_bpp: u32, dst_bpp: u32, palette: &Palette) -> Result<u32> {
        check_depths(src_bpp, dst_bpp)?;
        Ok(encode_color(decode_color(color, src_bpp, palette), dst_bpp))
    }
}
