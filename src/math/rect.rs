use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin, e.g. the full extent of a surface
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest rectangle containing both corner points (inclusive)
    pub fn spanning(a: IVec2, b: IVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(
            min.x,
            min.y,
            extent(min.x, max.x).saturating_add(1),
            extent(min.y, max.y).saturating_add(1),
        )
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Bounding box of both rectangles, computed from the edge extremes
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, extent(left, right), extent(top, bottom))
    }

    /// Overlap of both rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, extent(left, right), extent(top, bottom)))
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn translate(&self, offset: IVec2) -> Rect {
        Rect::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.width,
            self.height,
        )
    }
}

/// Distance from `lo` to `hi`, saturated to the `i32` range
fn extent(lo: i32, hi: i32) -> i32 {
    (hi as i64 - lo as i64).clamp(0, i32::MAX as i64) as i32
}
