pub mod blit;
pub mod brush;
pub mod clip;
pub mod dirty;
pub mod glyph;
pub mod palette;
pub mod pixel_buffer;
pub mod rop;
pub mod shapes;
pub mod surface;

pub use blit::{composite, draw_line, Operand};
pub use brush::{Brush, HatchStyle, Pattern, Pen, PenStyle, RemoteBrush, BRUSH_SIZE};
pub use clip::{clip_source, clip_to, ClipRegion, Clipped};
pub use dirty::DirtyRegion;
pub use glyph::Glyph;
pub use palette::{Palette, PaletteEntry, PALETTE_SIZE};
pub use pixel_buffer::{bytes_per_pixel, PixelBuffer};
pub use rop::{Rop2, Rop3, Shortcut, ROP3_TABLE};
pub use shapes::{ellipse_spans, polygon_spans, FillMode};
pub use surface::{SurfaceHandle, SurfaceManager};
