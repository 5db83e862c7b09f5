use glam::IVec2;

use crate::math::Rect;

/// A destination rectangle after clipping, with its paired source offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clipped {
    pub rect: Rect,
    pub src: Option<IVec2>,
}

/// Truncate `rect` to `bounds`, shifting `src` by the same amount as the
/// left/top edge.
///
/// Returns `None` when nothing of the rectangle remains visible, or when the
/// shifted source offset leaves the `i32` coordinate space.
pub fn clip_to(bounds: &Rect, rect: Rect, src: Option<IVec2>) -> Option<Clipped> {
    let (x, y) = (rect.x as i64, rect.y as i64);
    let dx = (bounds.x as i64 - x).max(0);
    let dy = (bounds.y as i64 - y).max(0);

    let right = (x + rect.width as i64).min(bounds.right() as i64);
    let bottom = (y + rect.height as i64).min(bounds.bottom() as i64);
    let width = right - (x + dx);
    let height = bottom - (y + dy);

    if width <= 0 || height <= 0 {
        return None;
    }

    let src = match src {
        Some(s) => Some(IVec2::new(shifted(s.x, dx)?, shifted(s.y, dy)?)),
        None => None,
    };
    Some(Clipped {
        rect: Rect::new(shifted(rect.x, dx)?, shifted(rect.y, dy)?, width as i32, height as i32),
        src,
    })
}

fn shifted(value: i32, by: i64) -> Option<i32> {
    i32::try_from(value as i64 + by).ok()
}

/// The clip rectangle of a rendering context.
///
/// While unset, clipping leaves every request unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRegion {
    bounds: Rect,
    active: bool,
}

impl ClipRegion {
    /// Unset region spanning the given full extent
    pub fn new(extent: Rect) -> Self {
        Self {
            bounds: extent,
            active: false,
        }
    }

    pub fn set(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.active = true;
    }

    /// Restore the full extent and unset the region
    pub fn reset(&mut self, extent: Rect) {
        self.bounds = extent;
        self.active = false;
    }

    pub fn is_set(&self) -> bool {
        self.active
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Clip a destination rectangle and its optional source offset
    pub fn clip(&self, rect: Rect, src: Option<IVec2>) -> Option<Clipped> {
        if !self.active {
            return Some(Clipped { rect, src });
        }
        clip_to(&self.bounds, rect, src)
    }
}

/// Truncate a source rectangle at `src` to `src_bounds`, moving the paired
/// destination rectangle by the same shift.
pub fn clip_source(dst: Rect, src: IVec2, src_bounds: &Rect) -> Option<Clipped> {
    let src_rect = Rect::new(src.x, src.y, dst.width, dst.height);
    let clipped = clip_to(src_bounds, src_rect, Some(dst.origin()))?;
    let origin = clipped.src?;
    Some(Clipped {
        rect: Rect::new(origin.x, origin.y, clipped.rect.width, clipped.rect.height),
        src: Some(clipped.rect.origin()),
    })
}
