//! The blit compositor.
//!
//! Writes the result of a raster operation over a destination rectangle.
//! Callers clip first: every rectangle handed in here lies inside the
//! destination buffer, and pixel operands are already in its format.

use glam::IVec2;

use super::brush::{Brush, PenStyle};
use super::glyph::Glyph;
use super::pixel_buffer::PixelBuffer;
use super::rop::{Rop2, Rop3, Shortcut};
use crate::math::Rect;

/// Source operand of a blit, addressed relative to the blit's top-left
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Row-major pixels in destination format
    Pixels { data: &'a [u32], stride: usize },
    /// 1-bpp glyph starting at `origin`; set bits read as all ones
    Mono { glyph: &'a Glyph, origin: IVec2 },
}

impl Operand<'_> {
    #[inline]
    fn sample(&self, i: usize, j: usize) -> u32 {
        match self {
            Operand::Pixels { data, stride } => data[j * stride + i],
            Operand::Mono { glyph, origin } => {
                if glyph.is_set(origin.x + i as i32, origin.y + j as i32) {
                    u32::MAX
                } else {
                    0
                }
            }
        }
    }
}

/// Apply `rop` over `rect` of `dst`.
///
/// Missing operands read as zero. Panics if `rect` is not inside `dst`.
pub fn composite(
    dst: &mut PixelBuffer,
    rect: Rect,
    rop: Rop3,
    src: Option<&Operand<'_>>,
    pattern: Option<&Brush>,
) {
    if rect.is_empty() {
        return;
    }
    assert!(
        dst.bounds().contains_rect(&rect),
        "blit rectangle {rect:?} outside {}x{} destination",
        dst.width(),
        dst.height()
    );

    match rop.shortcut() {
        Shortcut::Noop => return,
        Shortcut::Constant(set) => {
            dst.fill_rect(rect, if set { u32::MAX } else { 0 });
            return;
        }
        Shortcut::InvertDestination => {
            map_rows(dst, rect, |_, _, d| !d);
            return;
        }
        Shortcut::CopySource => {
            if let Some(Operand::Pixels { data, stride }) = src {
                for j in 0..rect.height as usize {
                    let start = j * stride;
                    dst.write_span(rect.x, rect.y + j as i32, &data[start..start + rect.width as usize]);
                }
                return;
            }
        }
        Shortcut::CopyPattern => {
            if let Some(Brush::Solid(color)) = pattern {
                dst.fill_rect(rect, *color);
                return;
            }
            if let Some(brush) = pattern {
                map_rows(dst, rect, |x, y, _| brush.sample(x, y));
                return;
            }
        }
        Shortcut::General => {}
    }

    map_rows(dst, rect, |x, y, d| {
        let s = src.map_or(0, |op| op.sample((x - rect.x) as usize, (y - rect.y) as usize));
        let p = pattern.map_or(0, |brush| brush.sample(x, y));
        rop.apply(d, s, p)
    });
}

/// Rewrite every pixel of `rect` from its coordinates and current value
fn map_rows(dst: &mut PixelBuffer, rect: Rect, mut f: impl FnMut(i32, i32, u32) -> u32) {
    let mut row = vec![0u32; rect.width as usize];
    for y in rect.y..rect.bottom() {
        dst.read_span(rect.x, y, &mut row);
        for (i, d) in row.iter_mut().enumerate() {
            *d = f(rect.x + i as i32, y, *d);
        }
        dst.write_span(rect.x, y, &row);
    }
}

/// Draw a one-pixel line from `start` towards `end` through a binary ROP.
///
/// The end point itself is not drawn, so chained segments touch each shared
/// vertex once. Only the steps whose major-axis coordinate falls inside `dst`
/// are visited, and pixels outside it are dropped; the geometry is never
/// clipped, so the slope is exact.
pub fn draw_line(dst: &mut PixelBuffer, start: IVec2, end: IVec2, rop: Rop2, color: u32, style: PenStyle) {
    if style == PenStyle::Null {
        return;
    }
    let rop = rop.to_rop3();
    let dashes = style.dashes();
    let period: u64 = dashes.map_or(1, |d| d.iter().map(|run| *run as u64).sum());

    let delta = end.as_i64vec2() - start.as_i64vec2();
    let x_major = delta.x.abs() >= delta.y.abs();
    let (major_start, major_delta, minor_start, minor_delta, extent) = if x_major {
        (start.x as i64, delta.x, start.y as i64, delta.y, dst.width() as i64)
    } else {
        (start.y as i64, delta.y, start.x as i64, delta.x, dst.height() as i64)
    };
    let steps = major_delta.abs();
    let forward = major_delta > 0;

    // Steps whose major coordinate lies inside the buffer
    let (first, last) = if forward {
        (-major_start, extent - major_start)
    } else {
        (major_start - extent + 1, major_start + 1)
    };

    for step in first.max(0)..last.min(steps) {
        if let Some(runs) = dashes {
            if !dash_is_on(runs, (step as u64 % period) as u32) {
                continue;
            }
        }
        let major = if forward { major_start + step } else { major_start - step };
        let minor = minor_start + rounded_div(step as i128 * minor_delta as i128, steps as i128);
        let (x, y) = if x_major { (major, minor) } else { (minor, major) };
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            continue;
        };
        if let Some(d) = dst.pixel(x, y) {
            dst.set_pixel(x, y, rop.apply(d, 0, color));
        }
    }
}

/// `numerator / denominator` rounded to the nearest integer, halves up
fn rounded_div(numerator: i128, denominator: i128) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator) as i64
}

fn dash_is_on(runs: &[u32], mut position: u32) -> bool {
    for (i, run) in runs.iter().enumerate() {
        if position < *run {
            return i % 2 == 0;
        }
        position -= run;
    }
    true
}
