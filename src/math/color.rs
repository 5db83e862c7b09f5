/// Pack 8-bit channels into a native 32-bpp pixel (`0xFFRRGGBB`)
pub const fn pack_argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split a native 32-bpp pixel into (r, g, b)
pub const fn unpack_rgb(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

/// Widen a 5-bit channel to 8 bits, replicating the high bits into the low ones
pub const fn expand5(v: u32) -> u8 {
    let v = v & 0x1F;
    ((v << 3) | (v >> 2)) as u8
}

/// Widen a 6-bit channel to 8 bits
pub const fn expand6(v: u32) -> u8 {
    let v = v & 0x3F;
    ((v << 2) | (v >> 4)) as u8
}

/// Bit mask covering every bit of a pixel at the given depth
pub const fn depth_mask(bits_per_pixel: u32) -> u32 {
    if bits_per_pixel >= 32 {
        u32::MAX
    } else {
        (1u32 << bits_per_pixel) - 1
    }
}
