use glam::IVec2;

use crate::core::{FillMode, Glyph, Palette, PaletteEntry, Pen, RemoteBrush, SurfaceHandle};
use crate::error::Result;
use crate::math::Rect;

/// Drawing operations as they arrive from the remote session.
///
/// Opcodes, colours and pixel data are remote-side values; implementors
/// convert them. Calls are made from one thread, one at a time.
pub trait DrawingPrimitives {
    /// Copy a rectangle of the drawing surface into the desktop save buffer
    /// at a pixel offset
    fn desktop_save(&mut self, offset: u32, rect: Rect) -> Result<()>;

    /// Write a previously saved rectangle back
    fn desktop_restore(&mut self, offset: u32, rect: Rect) -> Result<()>;

    fn create_glyph(&mut self, width: u32, height: u32, data: &[u8]) -> Result<Glyph>;

    /// Select the text colour for the following glyphs
    fn start_draw_glyphs(&mut self, bg_color: u32, fg_color: u32);

    fn draw_glyph(&mut self, rect: Rect, glyph: &Glyph);

    /// Restore the text colour replaced by `start_draw_glyphs`
    fn end_draw_glyphs(&mut self);

    /// Register server-depth pixel data as an off-screen bitmap
    fn create_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<SurfaceHandle>;

    /// Paste server-depth pixel data opaquely at `rect`
    fn paint_bitmap(&mut self, rect: Rect, width: u32, height: u32, data: &[u8]) -> Result<()>;

    fn destroy_bitmap(&mut self, bitmap: SurfaceHandle);

    fn line(&mut self, opcode: u8, start: IVec2, end: IVec2, pen: &Pen);

    /// Opaque solid rectangle
    fn rect(&mut self, rect: Rect, color: u32);

    fn polygon(
        &mut self,
        opcode: u8,
        fill_mode: FillMode,
        points: &[IVec2],
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()>;

    fn polyline(&mut self, opcode: u8, points: &[IVec2], pen: &Pen);

    fn ellipse(
        &mut self,
        opcode: u8,
        fill_mode: FillMode,
        rect: Rect,
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()>;

    fn dst_blt(&mut self, opcode: u8, rect: Rect);

    fn pat_blt(&mut self, opcode: u8, rect: Rect, brush: &RemoteBrush, bg_color: u32, fg_color: u32) -> Result<()>;

    /// Screen-to-screen copy from the primary surface
    fn scr_blt(&mut self, opcode: u8, rect: Rect, src: IVec2);

    fn mem_blt(&mut self, opcode: u8, rect: Rect, bitmap: SurfaceHandle, src: IVec2);

    #[allow(clippy::too_many_arguments)]
    fn mem3_blt(
        &mut self,
        opcode: u8,
        rect: Rect,
        bitmap: SurfaceHandle,
        src: IVec2,
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()>;

    fn create_palette(&mut self, colors: &[PaletteEntry]) -> Palette;

    fn set_palette(&mut self, palette: Palette);

    fn set_clip(&mut self, rect: Rect);

    fn reset_clip(&mut self);

    /// Allocate an off-screen surface, replacing `old` if given
    fn create_surface(&mut self, width: u32, height: u32, old: Option<SurfaceHandle>) -> Result<SurfaceHandle>;

    /// Select the drawing surface; `None` selects the primary surface
    fn switch_surface(&mut self, surface: Option<SurfaceHandle>);

    fn destroy_surface(&mut self, surface: SurfaceHandle);
}
