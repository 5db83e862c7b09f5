// context.rs - Rendering context tying clipping, compositing, surfaces and
// dirty tracking together

use std::ops::Range;

use glam::IVec2;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::convert::StandardConverter;
use crate::core::{
    clip_source, clip_to, composite, draw_line, ellipse_spans, polygon_spans, Brush, ClipRegion, Clipped,
    DirtyRegion, FillMode, Glyph, Operand, Palette, PaletteEntry, Pattern, Pen, PenStyle, PixelBuffer,
    RemoteBrush, Rop2, Rop3, SurfaceHandle, SurfaceManager,
};
use crate::error::{GdiError, Result};
use crate::math::{pack_argb, Rect};
use crate::overlay::VideoFrame;
use crate::traits::{ColorConverter, DrawingPrimitives};

/// Depth of every local surface
pub const DST_BPP: u32 = 32;

/// Capacity of the desktop save buffer in pixels (480×480)
pub const DESKTOP_SAVE_PIXELS: usize = 480 * 480;

/// Session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GdiConfig {
    pub width: u32,
    pub height: u32,
    /// Colour depth of remote pixel data and colours
    pub server_depth: u32,
}

impl Default for GdiConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            server_depth: 16,
        }
    }
}

impl GdiConfig {
    pub fn validate(&self) -> Result<()> {
        match self.server_depth {
            8 | 15 | 16 | 24 | 32 => Ok(()),
            other => Err(GdiError::UnsupportedDepth(other)),
        }
    }
}

/// Where a blit reads its source operand from
#[derive(Debug, Clone, Copy)]
pub enum BlitSource<'a> {
    None,
    Surface { handle: SurfaceHandle, origin: IVec2 },
    Buffer { buffer: &'a PixelBuffer, origin: IVec2 },
    Glyph { glyph: &'a Glyph, origin: IVec2 },
}

impl BlitSource<'_> {
    fn origin(&self) -> Option<IVec2> {
        match self {
            BlitSource::None => None,
            BlitSource::Surface { origin, .. }
            | BlitSource::Buffer { origin, .. }
            | BlitSource::Glyph { origin, .. } => Some(*origin),
        }
    }
}

/// One remote session's drawing state
#[derive(Debug)]
pub struct GdiContext<C = StandardConverter> {
    config: GdiConfig,
    surfaces: SurfaceManager,
    clip: ClipRegion,
    dirty: DirtyRegion,
    palette: Palette,
    text_color: u32,
    saved_text_color: Option<u32>,
    brush: Brush,
    converter: C,
    saved_desktop: Vec<u32>,
}

impl GdiContext<StandardConverter> {
    pub fn new(config: GdiConfig) -> Result<Self> {
        Self::with_converter(config, StandardConverter)
    }
}

impl<C: ColorConverter> GdiContext<C> {
    /// Allocate the primary surface at [`DST_BPP`]
    pub fn with_converter(config: GdiConfig, converter: C) -> Result<Self> {
        config.validate()?;
        let surfaces = SurfaceManager::new(config.width, config.height, DST_BPP)?;
        let extent = surfaces.primary().bounds();
        debug!(
            "gdi init {}x{} server depth {}",
            config.width, config.height, config.server_depth
        );
        Ok(Self {
            config,
            surfaces,
            clip: ClipRegion::new(extent),
            dirty: DirtyRegion::new(),
            palette: Palette::default(),
            text_color: pack_argb(0, 0, 0),
            saved_text_color: None,
            brush: Brush::Solid(pack_argb(0xFF, 0xFF, 0xFF)),
            converter,
            saved_desktop: vec![0; DESKTOP_SAVE_PIXELS],
        })
    }

    pub fn config(&self) -> &GdiConfig {
        &self.config
    }

    pub fn surfaces(&self) -> &SurfaceManager {
        &self.surfaces
    }

    /// Direct surface access; writes made here are not tracked as dirty
    pub fn surfaces_mut(&mut self) -> &mut SurfaceManager {
        &mut self.surfaces
    }

    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    pub fn clip_region(&self) -> &ClipRegion {
        &self.clip
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn text_color(&self) -> u32 {
        self.text_color
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Convert a remote colour to a native pixel value
    pub fn convert_color(&self, color: u32) -> u32 {
        match self
            .converter
            .convert_color(color, self.config.server_depth, DST_BPP, &self.palette)
        {
            Ok(pixel) => pixel,
            Err(err) => {
                warn!("colour {color:#x}: {err}");
                0
            }
        }
    }

    /// Convert server-depth pixel data into a destination buffer
    fn convert_image(&self, width: u32, height: u32, data: &[u8]) -> Result<PixelBuffer> {
        let bytes = self.converter.convert_image(
            data,
            width,
            height,
            self.config.server_depth,
            DST_BPP,
            &self.palette,
        )?;
        PixelBuffer::from_bytes(width, height, DST_BPP, &bytes)
    }

    /// Run `f` with `brush` selected, then restore the previous brush
    pub fn with_brush<R>(&mut self, brush: Brush, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.brush, brush);
        let result = f(self);
        self.brush = previous;
        result
    }

    /// Run `f` with `color` as text colour, then restore the previous one
    pub fn with_text_color<R>(&mut self, color: u32, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.text_color, color);
        let result = f(self);
        self.text_color = previous;
        result
    }

    fn invalidate(&mut self, rect: Rect) {
        if self.surfaces.is_primary_active() {
            self.dirty.invalidate(rect);
        }
    }

    /// Invalidate the part of `footprint` that lies on the drawing surface
    fn invalidate_footprint(&mut self, footprint: Rect) {
        let bounds = self.surfaces.active_surface().bounds();
        if let Some(rect) = footprint.intersection(&bounds) {
            self.invalidate(rect);
        }
    }

    /// Part of the drawing surface inside the clip region
    fn drawable_area(&self) -> Option<Rect> {
        let bounds = self.surfaces.active_surface().bounds();
        if self.clip.is_set() {
            self.clip.bounds().intersection(&bounds)
        } else {
            Some(bounds)
        }
    }

    /// Invalidate the bounding box of line vertices on the drawing surface.
    ///
    /// Vertices are pulled to one pixel outside the surface first, which keeps
    /// the visible part of the box while its size stays within `i32`.
    fn invalidate_vertices(&mut self, points: &[IVec2]) {
        let bounds = self.surfaces.active_surface().bounds();
        let (lo, hi) = (bounds.origin() - IVec2::ONE, IVec2::new(bounds.right(), bounds.bottom()));
        let footprint = points
            .iter()
            .map(|p| {
                let p = p.clamp(lo, hi);
                Rect::spanning(p, p)
            })
            .reduce(|a, b| a.union(&b));
        if let Some(footprint) = footprint {
            self.invalidate_footprint(footprint);
        }
    }

    /// Clip against the clip region, then the drawing surface
    fn clip_to_active(&self, rect: Rect, src: Option<IVec2>) -> Option<Clipped> {
        let clipped = self.clip.clip(rect, src)?;
        clip_to(&self.surfaces.active_surface().bounds(), clipped.rect, clipped.src)
    }

    /// Composite `rop` over `rect` of the drawing surface with the selected
    /// brush as pattern.
    ///
    /// Returns the rectangle actually written, `None` when fully clipped.
    pub fn bit_blt(&mut self, rect: Rect, source: BlitSource<'_>, rop: Rop3) -> Option<Rect> {
        let Some(mut target) = self.clip_to_active(rect, source.origin()) else {
            trace!("{rect:?} clipped away");
            return None;
        };

        let src_bounds = match source {
            BlitSource::None => None,
            BlitSource::Surface { handle, .. } => Some(self.surfaces.surface(handle).bounds()),
            BlitSource::Buffer { buffer, .. } => Some(buffer.bounds()),
            BlitSource::Glyph { glyph, .. } => Some(glyph.bounds()),
        };
        if let (Some(bounds), Some(origin)) = (src_bounds, target.src) {
            let Some(shifted) = clip_source(target.rect, origin, &bounds) else {
                trace!("{rect:?} source outside its surface");
                return None;
            };
            target = shifted;
        }

        let rect = target.rect;
        let src = target.src.unwrap_or(IVec2::ZERO);
        let src_rect = Rect::new(src.x, src.y, rect.width, rect.height);
        let stride = rect.width as usize;

        let pixels: Vec<u32>;
        let operand = match source {
            BlitSource::None => None,
            BlitSource::Surface { handle, .. } => {
                pixels = self.surfaces.surface(handle).read_rect(src_rect);
                Some(Operand::Pixels { data: &pixels, stride })
            }
            BlitSource::Buffer { buffer, .. } => {
                pixels = buffer.read_rect(src_rect);
                Some(Operand::Pixels { data: &pixels, stride })
            }
            BlitSource::Glyph { glyph, .. } => Some(Operand::Mono { glyph, origin: src }),
        };

        composite(
            self.surfaces.active_surface_mut(),
            rect,
            rop,
            operand.as_ref(),
            Some(&self.brush),
        );
        self.invalidate(rect);
        Some(rect)
    }

    /// Opaque fill with a native colour
    pub fn fill(&mut self, rect: Rect, color: u32) -> Option<Rect> {
        self.with_brush(Brush::Solid(color), |ctx| ctx.bit_blt(rect, BlitSource::None, Rop3::PATCOPY))
    }

    /// Composite each span with the selected brush
    pub fn fill_spans(&mut self, spans: &[Rect], rop: Rop3) {
        for span in spans {
            self.bit_blt(*span, BlitSource::None, rop);
        }
    }

    /// Draw an unclipped line on the drawing surface with a native colour
    pub fn draw_line(&mut self, start: IVec2, end: IVec2, rop: Rop2, color: u32, style: PenStyle) {
        draw_line(self.surfaces.active_surface_mut(), start, end, rop, color, style);
        if style != PenStyle::Null {
            self.invalidate_vertices(&[start, end]);
        }
    }

    /// Tile the top-left corner of a surface as a pattern brush
    pub fn pattern_brush_from_surface(&self, handle: SurfaceHandle) -> Brush {
        Brush::Pattern(Pattern::from_buffer(self.surfaces.surface(handle)))
    }

    /// Turn a remote brush description into a native brush
    pub fn realize_brush(&self, brush: &RemoteBrush, bg_color: u32, fg_color: u32) -> Result<Brush> {
        let fg = self.convert_color(fg_color);
        Ok(match brush {
            RemoteBrush::Solid => Brush::Solid(fg),
            RemoteBrush::Pattern { data } => {
                let tile = self.convert_image(crate::core::BRUSH_SIZE, crate::core::BRUSH_SIZE, data)?;
                Brush::Pattern(Pattern::from_buffer(&tile))
            }
            RemoteBrush::Mono { rows } => {
                Brush::Pattern(Pattern::from_mono(rows, fg, self.convert_color(bg_color)))
            }
            RemoteBrush::Hatched { hatch } => Brush::Pattern(Pattern::from_mono(
                &hatch.mono_rows(),
                fg,
                self.convert_color(bg_color),
            )),
        })
    }

    /// Hand the dirty part of the primary surface to `f` and empty the
    /// dirty region. Nothing happens while the region is empty.
    pub fn present<F>(&mut self, f: F) -> Option<Rect>
    where
        F: FnOnce(Rect, &PixelBuffer),
    {
        let rect = self.dirty.take()?;
        f(rect, self.surfaces.primary());
        Some(rect)
    }

    /// Reallocate the primary surface for a new desktop size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surfaces.resize_primary(width, height)?;
        self.config.width = width;
        self.config.height = height;
        self.clip.reset(self.surfaces.primary().bounds());
        self.dirty.clear();
        debug!("resized primary surface to {width}x{height}");
        Ok(())
    }

    /// Punch the overlay colour key into the primary surface under every
    /// visible rectangle of `frame`
    pub fn paint_color_key(&mut self, frame: &VideoFrame, key: u32) {
        let bounds = self.surfaces.primary().bounds();
        for rect in frame.screen_rects() {
            if let Some(rect) = rect.intersection(&bounds) {
                self.surfaces.primary_mut().fill_rect(rect, key);
                self.dirty.invalidate(rect);
            }
        }
    }

    fn desktop_range(&self, offset: u32, rect: Rect) -> Result<Range<usize>> {
        let len = rect.area() as usize;
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.saved_desktop.len() => Ok(start..end),
            _ => Err(GdiError::DesktopSaveOverflow {
                offset,
                len,
                capacity: self.saved_desktop.len(),
            }),
        }
    }
}

impl<C: ColorConverter> DrawingPrimitives for GdiContext<C> {
    fn desktop_save(&mut self, offset: u32, rect: Rect) -> Result<()> {
        debug!("desktop_save offset {offset} {rect:?}");
        let range = self.desktop_range(offset, rect)?;
        let surface = self.surfaces.active_surface();
        let points = (rect.y..rect.bottom()).flat_map(|y| (rect.x..rect.right()).map(move |x| (x, y)));
        for (slot, (x, y)) in self.saved_desktop[range].iter_mut().zip(points) {
            *slot = surface.pixel(x, y).unwrap_or(0);
        }
        Ok(())
    }

    fn desktop_restore(&mut self, offset: u32, rect: Rect) -> Result<()> {
        debug!("desktop_restore offset {offset} {rect:?}");
        let range = self.desktop_range(offset, rect)?;
        if rect.is_empty() {
            return Ok(());
        }
        let saved = PixelBuffer::from_bytes(
            rect.width as u32,
            rect.height as u32,
            DST_BPP,
            bytemuck::cast_slice::<u32, u8>(&self.saved_desktop[range]),
        )?;
        let source = BlitSource::Buffer {
            buffer: &saved,
            origin: IVec2::ZERO,
        };
        self.bit_blt(rect, source, Rop3::SRCCOPY);
        Ok(())
    }

    fn create_glyph(&mut self, width: u32, height: u32, data: &[u8]) -> Result<Glyph> {
        debug!("create_glyph {width}x{height}");
        let bits = self
            .converter
            .convert_image(data, width, height, 1, 1, &self.palette)?;
        Glyph::new(width, height, bits)
    }

    fn start_draw_glyphs(&mut self, _bg_color: u32, fg_color: u32) {
        let color = self.convert_color(fg_color);
        self.saved_text_color = Some(std::mem::replace(&mut self.text_color, color));
    }

    fn draw_glyph(&mut self, rect: Rect, glyph: &Glyph) {
        let brush = Brush::Solid(self.text_color);
        let source = BlitSource::Glyph {
            glyph,
            origin: IVec2::ZERO,
        };
        self.with_brush(brush, |ctx| ctx.bit_blt(rect, source, Rop3::GLYPH));
    }

    fn end_draw_glyphs(&mut self) {
        if let Some(color) = self.saved_text_color.take() {
            self.text_color = color;
        }
    }

    fn create_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<SurfaceHandle> {
        debug!("create_bitmap {width}x{height}");
        let buffer = self.convert_image(width, height, data)?;
        Ok(self.surfaces.insert(buffer))
    }

    fn paint_bitmap(&mut self, rect: Rect, width: u32, height: u32, data: &[u8]) -> Result<()> {
        debug!("paint_bitmap {rect:?} from {width}x{height}");
        let buffer = self.convert_image(width, height, data)?;
        let source = BlitSource::Buffer {
            buffer: &buffer,
            origin: IVec2::ZERO,
        };
        self.bit_blt(rect, source, Rop3::SRCCOPY);
        Ok(())
    }

    fn destroy_bitmap(&mut self, bitmap: SurfaceHandle) {
        self.surfaces.destroy_surface(bitmap);
    }

    fn line(&mut self, opcode: u8, start: IVec2, end: IVec2, pen: &Pen) {
        let rop = Rop2::from_opcode(opcode);
        debug!("line {start} -> {end} rop2 {}", rop.opcode() + 1);
        let color = self.convert_color(pen.color);
        self.draw_line(start, end, rop, color, pen.style);
    }

    fn rect(&mut self, rect: Rect, color: u32) {
        debug!("rect {rect:?}");
        let color = self.convert_color(color);
        self.fill(rect, color);
    }

    fn polygon(
        &mut self,
        opcode: u8,
        fill_mode: FillMode,
        points: &[IVec2],
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()> {
        let rop = Rop2::from_opcode(opcode).to_rop3();
        debug!("polygon {} points {fill_mode:?} rop {rop}", points.len());
        let brush = self.realize_brush(brush, bg_color, fg_color)?;
        let Some(limit) = self.drawable_area() else {
            return Ok(());
        };
        let spans = polygon_spans(points, fill_mode, limit);
        self.with_brush(brush, |ctx| ctx.fill_spans(&spans, rop));
        Ok(())
    }

    fn polyline(&mut self, opcode: u8, points: &[IVec2], pen: &Pen) {
        let rop = Rop2::from_opcode(opcode);
        debug!("polyline {} points rop2 {}", points.len(), rop.opcode() + 1);
        if points.len() < 2 || pen.style == PenStyle::Null {
            return;
        }
        let color = self.convert_color(pen.color);
        let surface = self.surfaces.active_surface_mut();
        for segment in points.windows(2) {
            draw_line(surface, segment[0], segment[1], rop, color, pen.style);
        }
        self.invalidate_vertices(points);
    }

    fn ellipse(
        &mut self,
        opcode: u8,
        fill_mode: FillMode,
        rect: Rect,
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()> {
        let rop = Rop2::from_opcode(opcode).to_rop3();
        debug!("ellipse {rect:?} {fill_mode:?} rop {rop}");
        let brush = self.realize_brush(brush, bg_color, fg_color)?;
        let Some(limit) = self.drawable_area() else {
            return Ok(());
        };
        let spans = ellipse_spans(rect, limit);
        self.with_brush(brush, |ctx| ctx.fill_spans(&spans, rop));
        Ok(())
    }

    fn dst_blt(&mut self, opcode: u8, rect: Rect) {
        let rop = Rop3::from_opcode(opcode);
        debug!("dst_blt {rect:?} rop {rop}");
        self.bit_blt(rect, BlitSource::None, rop);
    }

    fn pat_blt(&mut self, opcode: u8, rect: Rect, brush: &RemoteBrush, bg_color: u32, fg_color: u32) -> Result<()> {
        let rop = Rop3::from_opcode(opcode);
        debug!("pat_blt {rect:?} rop {rop}");
        match brush {
            RemoteBrush::Solid => {
                let color = self.convert_color(fg_color);
                self.with_text_color(color, |ctx| {
                    let solid = Brush::Solid(ctx.text_color);
                    ctx.with_brush(solid, |ctx| ctx.bit_blt(rect, BlitSource::None, rop))
                });
            }
            other => {
                let brush = self.realize_brush(other, bg_color, fg_color)?;
                self.with_brush(brush, |ctx| ctx.bit_blt(rect, BlitSource::None, rop));
            }
        }
        Ok(())
    }

    fn scr_blt(&mut self, opcode: u8, rect: Rect, src: IVec2) {
        let rop = Rop3::from_opcode(opcode);
        debug!("scr_blt {rect:?} from {src} rop {rop}");
        let source = BlitSource::Surface {
            handle: SurfaceHandle::PRIMARY,
            origin: src,
        };
        self.bit_blt(rect, source, rop);
    }

    fn mem_blt(&mut self, opcode: u8, rect: Rect, bitmap: SurfaceHandle, src: IVec2) {
        let rop = Rop3::from_opcode(opcode);
        debug!("mem_blt {rect:?} from {bitmap} at {src} rop {rop}");
        let source = BlitSource::Surface {
            handle: bitmap,
            origin: src,
        };
        self.bit_blt(rect, source, rop);
    }

    fn mem3_blt(
        &mut self,
        opcode: u8,
        rect: Rect,
        bitmap: SurfaceHandle,
        src: IVec2,
        brush: &RemoteBrush,
        bg_color: u32,
        fg_color: u32,
    ) -> Result<()> {
        let rop = Rop3::from_opcode(opcode);
        debug!("mem3_blt {rect:?} from {bitmap} at {src} rop {rop}");
        let brush = self.realize_brush(brush, bg_color, fg_color)?;
        let source = BlitSource::Surface {
            handle: bitmap,
            origin: src,
        };
        self.with_brush(brush, |ctx| ctx.bit_blt(rect, source, rop));
        Ok(())
    }

    fn create_palette(&mut self, colors: &[PaletteEntry]) -> Palette {
        debug!("create_palette {} colours", colors.len());
        Palette::new(colors)
    }

    fn set_palette(&mut self, palette: Palette) {
        debug!("set_palette");
        self.palette = palette;
    }

    fn set_clip(&mut self, rect: Rect) {
        trace!("set_clip {rect:?}");
        self.clip.set(rect);
    }

    fn reset_clip(&mut self) {
        trace!("reset_clip");
        self.clip.reset(self.surfaces.primary().bounds());
    }

    fn create_surface(&mut self, width: u32, height: u32, old: Option<SurfaceHandle>) -> Result<SurfaceHandle> {
        debug!("create_surface {width}x{height} replacing {old:?}");
        let buffer = PixelBuffer::new(width, height, DST_BPP)?;
        Ok(match old {
            Some(old) => self.surfaces.replace(old, buffer),
            None => self.surfaces.insert(buffer),
        })
    }

    fn switch_surface(&mut self, surface: Option<SurfaceHandle>) {
        debug!("switch_surface {surface:?}");
        self.surfaces.switch_surface(surface);
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        debug!("destroy_surface {surface}");
        self.surfaces.destroy_surface(surface);
    }
}
