use crate::math::Rect;

/// Bounding rectangle of everything written to the primary surface since
/// the last presentation.
///
/// The region only grows until [`DirtyRegion::clear`] is called by whoever
/// presents it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyRegion {
    bounds: Option<Rect>,
}

impl DirtyRegion {
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Extend the region to cover `rect`; empty rectangles are ignored
    pub fn invalidate(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.bounds = Some(match self.bounds {
            None => rect,
            Some(current) => current.union(&rect),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Return the accumulated region and reset to empty
    pub fn take(&mut self) -> Option<Rect> {
        self.bounds.take()
    }

    pub fn clear(&mut self) {
        self.bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_invalidate_is_exact() {
        let mut dirty = DirtyRegion::new();
        assert!(dirty.is_empty());
        dirty.invalidate(Rect::new(10, 20, 30, 40));
        assert_eq!(dirty.bounds(), Some(Rect::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_grows_left_and_up() {
        let mut dirty = DirtyRegion::new();
        dirty.invalidate(Rect::new(50, 50, 10, 10));
        dirty.invalidate(Rect::new(20, 30, 5, 5));
        assert_eq!(dirty.bounds(), Some(Rect::new(20, 30, 40, 30)));
    }

    #[test]
    fn test_grows_right_and_down() {
        let mut dirty = DirtyRegion::new();
        dirty.invalidate(Rect::new(0, 0, 10, 10));
        dirty.invalidate(Rect::new(90, 40, 10, 10));
        assert_eq!(dirty.bounds(), Some(Rect::new(0, 0, 100, 50)));
    }

    #[test]
    fn test_never_shrinks() {
        let mut dirty = DirtyRegion::new();
        dirty.invalidate(Rect::new(0, 0, 100, 100));
        dirty.invalidate(Rect::new(10, 10, 1, 1));
        assert_eq!(dirty.bounds(), Some(Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn test_empty_rect_ignored() {
        let mut dirty = DirtyRegion::new();
        dirty.invalidate(Rect::new(5, 5, 0, 3));
        assert!(dirty.is_empty());
    }

    #[test]
    fn test_take_resets() {
        let mut dirty = DirtyRegion::new();
        dirty.invalidate(Rect::new(1, 1, 1, 1));
        assert_eq!(dirty.take(), Some(Rect::new(1, 1, 1, 1)));
        assert!(dirty.is_empty());
        assert_eq!(dirty.take(), None);
    }
}
