// script.rs - Recorded drawing sessions and their replay
//
// A script is a JSON list of drawing primitives with surfaces, bitmaps,
// glyphs and palettes addressed by numeric slots. The replayer maps the
// slots to live objects and drives any `DrawingPrimitives` implementation.

use std::collections::HashMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::context::GdiConfig;
use crate::core::{FillMode, Glyph, Palette, PaletteEntry, Pen, RemoteBrush, SurfaceHandle};
use crate::error::GdiError;
use crate::math::Rect;
use crate::traits::DrawingPrimitives;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: GdiConfig,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    DesktopSave {
        offset: u32,
        rect: Rect,
    },
    DesktopRestore {
        offset: u32,
        rect: Rect,
    },
    CreateGlyph {
        slot: u32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    DestroyGlyph {
        slot: u32,
    },
    StartDrawGlyphs {
        #[serde(default)]
        bg: u32,
        fg: u32,
    },
    DrawGlyph {
        rect: Rect,
        glyph: u32,
    },
    EndDrawGlyphs,
    CreateBitmap {
        slot: u32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    PaintBitmap {
        rect: Rect,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    DestroyBitmap {
        slot: u32,
    },
    Line {
        opcode: u8,
        start: IVec2,
        end: IVec2,
        pen: Pen,
    },
    Rect {
        rect: Rect,
        color: u32,
    },
    Polygon {
        opcode: u8,
        #[serde(default)]
        fill_mode: FillMode,
        points: Vec<IVec2>,
        brush: RemoteBrush,
        #[serde(default)]
        bg: u32,
        fg: u32,
    },
    Polyline {
        opcode: u8,
        points: Vec<IVec2>,
        pen: Pen,
    },
    Ellipse {
        opcode: u8,
        #[serde(default)]
        fill_mode: FillMode,
        rect: Rect,
        brush: RemoteBrush,
        #[serde(default)]
        bg: u32,
        fg: u32,
    },
    DstBlt {
        opcode: u8,
        rect: Rect,
    },
    PatBlt {
        opcode: u8,
        rect: Rect,
        brush: RemoteBrush,
        #[serde(default)]
        bg: u32,
        fg: u32,
    },
    ScrBlt {
        opcode: u8,
        rect: Rect,
        src: IVec2,
    },
    MemBlt {
        opcode: u8,
        rect: Rect,
        bitmap: u32,
        src: IVec2,
    },
    Mem3Blt {
        opcode: u8,
        rect: Rect,
        bitmap: u32,
        src: IVec2,
        brush: RemoteBrush,
        #[serde(default)]
        bg: u32,
        fg: u32,
    },
    CreatePalette {
        slot: u32,
        colors: Vec<PaletteEntry>,
    },
    SetPalette {
        slot: u32,
    },
    SetClip {
        rect: Rect,
    },
    ResetClip,
    CreateSurface {
        slot: u32,
        width: u32,
        height: u32,
        #[serde(default)]
        replace: Option<u32>,
    },
    SwitchSurface {
        #[serde(default)]
        slot: Option<u32>,
    },
    DestroySurface {
        slot: u32,
    },
}

impl DrawCommand {
    /// Short operation name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DrawCommand::DesktopSave { .. } => "desktop_save",
            DrawCommand::DesktopRestore { .. } => "desktop_restore",
            DrawCommand::CreateGlyph { .. } => "create_glyph",
            DrawCommand::DestroyGlyph { .. } => "destroy_glyph",
            DrawCommand::StartDrawGlyphs { .. } => "start_draw_glyphs",
            DrawCommand::DrawGlyph { .. } => "draw_glyph",
            DrawCommand::EndDrawGlyphs => "end_draw_glyphs",
            DrawCommand::CreateBitmap { .. } => "create_bitmap",
            DrawCommand::PaintBitmap { .. } => "paint_bitmap",
            DrawCommand::DestroyBitmap { .. } => "destroy_bitmap",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Polygon { .. } => "polygon",
            DrawCommand::Polyline { .. } => "polyline",
            DrawCommand::Ellipse { .. } => "ellipse",
            DrawCommand::DstBlt { .. } => "dst_blt",
            DrawCommand::PatBlt { .. } => "pat_blt",
            DrawCommand::ScrBlt { .. } => "scr_blt",
            DrawCommand::MemBlt { .. } => "mem_blt",
            DrawCommand::Mem3Blt { .. } => "mem3_blt",
            DrawCommand::CreatePalette { .. } => "create_palette",
            DrawCommand::SetPalette { .. } => "set_palette",
            DrawCommand::SetClip { .. } => "set_clip",
            DrawCommand::ResetClip => "reset_clip",
            DrawCommand::CreateSurface { .. } => "create_surface",
            DrawCommand::SwitchSurface { .. } => "switch_surface",
            DrawCommand::DestroySurface { .. } => "destroy_surface",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("command {index} ({op}): no {kind} in slot {slot}")]
    UnknownSlot {
        index: usize,
        op: &'static str,
        kind: &'static str,
        slot: u32,
    },

    #[error("command {index} ({op}): binary raster operation opcode {opcode} out of range")]
    InvalidOpcode { index: usize, op: &'static str, opcode: u8 },

    #[error("command {index} ({op}) failed")]
    Gdi {
        index: usize,
        op: &'static str,
        #[source]
        source: GdiError,
    },
}

/// Drives a `DrawingPrimitives` implementation from script commands
pub struct Replayer<P: DrawingPrimitives> {
    target: P,
    surfaces: HashMap<u32, SurfaceHandle>,
    bitmaps: HashMap<u32, SurfaceHandle>,
    glyphs: HashMap<u32, Glyph>,
    palettes: HashMap<u32, Palette>,
}

/// Context of the command being applied, for error reporting
#[derive(Clone, Copy)]
struct At {
    index: usize,
    op: &'static str,
}

impl At {
    fn missing(self, kind: &'static str, slot: u32) -> ReplayError {
        ReplayError::UnknownSlot {
            index: self.index,
            op: self.op,
            kind,
            slot,
        }
    }

    fn gdi(self, source: GdiError) -> ReplayError {
        ReplayError::Gdi {
            index: self.index,
            op: self.op,
            source,
        }
    }

    fn rop2(self, opcode: u8) -> Result<u8, ReplayError> {
        if opcode < 16 {
            Ok(opcode)
        } else {
            Err(ReplayError::InvalidOpcode {
                index: self.index,
                op: self.op,
                opcode,
            })
        }
    }
}

fn lookup<T: Copy>(map: &HashMap<u32, T>, at: At, kind: &'static str, slot: u32) -> Result<T, ReplayError> {
    map.get(&slot).copied().ok_or(at.missing(kind, slot))
}

impl<P: DrawingPrimitives> Replayer<P> {
    pub fn new(target: P) -> Self {
        Self {
            target,
            surfaces: HashMap::new(),
            bitmaps: HashMap::new(),
            glyphs: HashMap::new(),
            palettes: HashMap::new(),
        }
    }

    pub fn target(&self) -> &P {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut P {
        &mut self.target
    }

    pub fn into_inner(self) -> P {
        self.target
    }

    /// Apply every command in order, stopping at the first failure.
    ///
    /// Returns the number of commands applied.
    pub fn run(&mut self, commands: &[DrawCommand]) -> Result<usize, ReplayError> {
        for (index, command) in commands.iter().enumerate() {
            self.apply(index, command)?;
        }
        log::debug!("replayed {} commands", commands.len());
        Ok(commands.len())
    }

    /// Apply one command; `index` only labels errors
    pub fn apply(&mut self, index: usize, command: &DrawCommand) -> Result<(), ReplayError> {
        let at = At {
            index,
            op: command.name(),
        };
        let target = &mut self.target;

        match command {
            DrawCommand::DesktopSave { offset, rect } => target.desktop_save(*offset, *rect).map_err(|e| at.gdi(e))?,
            DrawCommand::DesktopRestore { offset, rect } => {
                target.desktop_restore(*offset, *rect).map_err(|e| at.gdi(e))?
            }
            DrawCommand::CreateGlyph {
                slot,
                width,
                height,
                data,
            } => {
                let glyph = target.create_glyph(*width, *height, data).map_err(|e| at.gdi(e))?;
                self.glyphs.insert(*slot, glyph);
            }
            DrawCommand::DestroyGlyph { slot } => {
                self.glyphs.remove(slot).ok_or(at.missing("glyph", *slot))?;
            }
            DrawCommand::StartDrawGlyphs { bg, fg } => target.start_draw_glyphs(*bg, *fg),
            DrawCommand::DrawGlyph { rect, glyph } => {
                let glyph = self.glyphs.get(glyph).ok_or(at.missing("glyph", *glyph))?;
                target.draw_glyph(*rect, glyph);
            }
            DrawCommand::EndDrawGlyphs => target.end_draw_glyphs(),
            DrawCommand::CreateBitmap {
                slot,
                width,
                height,
                data,
            } => {
                let handle = target.create_bitmap(*width, *height, data).map_err(|e| at.gdi(e))?;
                if let Some(previous) = self.bitmaps.insert(*slot, handle) {
                    target.destroy_bitmap(previous);
                }
            }
            DrawCommand::PaintBitmap {
                rect,
                width,
                height,
                data,
            } => target
                .paint_bitmap(*rect, *width, *height, data)
                .map_err(|e| at.gdi(e))?,
            DrawCommand::DestroyBitmap { slot } => {
                let handle = self.bitmaps.remove(slot).ok_or(at.missing("bitmap", *slot))?;
                target.destroy_bitmap(handle);
            }
            DrawCommand::Line { opcode, start, end, pen } => target.line(at.rop2(*opcode)?, *start, *end, pen),
            DrawCommand::Rect { rect, color } => target.rect(*rect, *color),
            DrawCommand::Polygon {
                opcode,
                fill_mode,
                points,
                brush,
                bg,
                fg,
            } => target
                .polygon(at.rop2(*opcode)?, *fill_mode, points, brush, *bg, *fg)
                .map_err(|e| at.gdi(e))?,
            DrawCommand::Polyline { opcode, points, pen } => target.polyline(at.rop2(*opcode)?, points, pen),
            DrawCommand::Ellipse {
                opcode,
                fill_mode,
                rect,
                brush,
                bg,
                fg,
            } => target
                .ellipse(at.rop2(*opcode)?, *fill_mode, *rect, brush, *bg, *fg)
                .map_err(|e| at.gdi(e))?,
            DrawCommand::DstBlt { opcode, rect } => target.dst_blt(*opcode, *rect),
            DrawCommand::PatBlt {
                opcode,
                rect,
                brush,
                bg,
                fg,
            } => target
                .pat_blt(*opcode, *rect, brush, *bg, *fg)
                .map_err(|e| at.gdi(e))?,
            DrawCommand::ScrBlt { opcode, rect, src } => target.scr_blt(*opcode, *rect, *src),
            DrawCommand::MemBlt {
                opcode,
                rect,
                bitmap,
                src,
            } => {
                let handle = lookup(&self.bitmaps, at, "bitmap", *bitmap)?;
                target.mem_blt(*opcode, *rect, handle, *src);
            }
            DrawCommand::Mem3Blt {
                opcode,
                rect,
                bitmap,
                src,
                brush,
                bg,
                fg,
            } => {
                let handle = lookup(&self.bitmaps, at, "bitmap", *bitmap)?;
                target
                    .mem3_blt(*opcode, *rect, handle, *src, brush, *bg, *fg)
                    .map_err(|e| at.gdi(e))?;
            }
            DrawCommand::CreatePalette { slot, colors } => {
                let palette = target.create_palette(colors);
                self.palettes.insert(*slot, palette);
            }
            DrawCommand::SetPalette { slot } => {
                let palette = self.palettes.get(slot).ok_or(at.missing("palette", *slot))?;
                target.set_palette(palette.clone());
            }
            DrawCommand::SetClip { rect } => target.set_clip(*rect),
            DrawCommand::ResetClip => target.reset_clip(),
            DrawCommand::CreateSurface {
                slot,
                width,
                height,
                replace,
            } => {
                let old = match replace {
                    Some(old) => Some(lookup(&self.surfaces, at, "surface", *old)?),
                    None => None,
                };
                let handle = target.create_surface(*width, *height, old).map_err(|e| at.gdi(e))?;
                if let Some(old) = replace {
                    self.surfaces.remove(old);
                }
                if let Some(previous) = self.surfaces.insert(*slot, handle) {
                    target.destroy_surface(previous);
                }
            }
            DrawCommand::SwitchSurface { slot } => {
                let handle = match slot {
                    Some(slot) => Some(lookup(&self.surfaces, at, "surface", *slot)?),
                    None => None,
                };
                target.switch_surface(handle);
            }
            DrawCommand::DestroySurface { slot } => {
                let handle = self.surfaces.remove(slot).ok_or(at.missing("surface", *slot))?;
                target.destroy_surface(handle);
            }
        }
        Ok(())
    }
}
