mod color;
mod rect;

pub use color::{depth_mask, expand5, expand6, pack_argb, unpack_rgb};
pub use rect::Rect;
