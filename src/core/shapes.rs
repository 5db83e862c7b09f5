//! Scan conversion of filled shapes into horizontal spans.
//!
//! Pixels are sampled at their centres, and spans of one shape never
//! overlap, so XOR-style raster operations touch every pixel once. Only
//! rows and columns inside the `limit` rectangle are produced, so the work
//! is bounded by the drawing area rather than by the shape.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// Polygon interior rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Even-odd rule
    #[default]
    Alternate,
    /// Non-zero winding rule
    Winding,
}

impl FillMode {
    /// Remote encoding: 1 = alternate, 2 = winding
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(FillMode::Alternate),
            2 => Some(FillMode::Winding),
            _ => None,
        }
    }
}

/// Horizontal spans (height 1) covering the interior of a closed polygon
/// within `limit`
pub fn polygon_spans(points: &[IVec2], mode: FillMode, limit: Rect) -> Vec<Rect> {
    if points.len() < 3 || limit.is_empty() {
        return Vec::new();
    }
    let top = points.iter().map(|p| p.y).min().unwrap_or(0).max(limit.y);
    let bottom = points.iter().map(|p| p.y).max().unwrap_or(0).min(limit.bottom());

    let edges: Vec<(IVec2, IVec2)> = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .filter(|(a, b)| a.y != b.y)
        .collect();

    let mut spans = Vec::new();
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for y in top..bottom {
        let yc = y as f64 + 0.5;
        crossings.clear();
        for (a, b) in &edges {
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if yc < lo.y as f64 || yc >= hi.y as f64 {
                continue;
            }
            let t = (yc - a.y as f64) / (b.y as f64 - a.y as f64);
            let x = a.x as f64 + t * (b.x as f64 - a.x as f64);
            let direction = if b.y > a.y { 1 } else { -1 };
            crossings.push((x, direction));
        }
        crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

        let mut winding = 0;
        for (i, (x, direction)) in crossings.iter().enumerate() {
            let inside = match mode {
                FillMode::Alternate => i % 2 == 0,
                FillMode::Winding => {
                    winding += direction;
                    winding != 0
                }
            };
            if !inside {
                continue;
            }
            if let Some((next, _)) = crossings.get(i + 1) {
                push_span(&mut spans, &limit, y, *x, *next);
            }
        }
    }
    spans
}

/// Horizontal spans covering the ellipse inscribed in `bounds`, within `limit`
pub fn ellipse_spans(bounds: Rect, limit: Rect) -> Vec<Rect> {
    if bounds.is_empty() || limit.is_empty() {
        return Vec::new();
    }
    let a = bounds.width as f64 / 2.0;
    let b = bounds.height as f64 / 2.0;
    let cx = bounds.x as f64 + a;
    let cy = bounds.y as f64 + b;

    let top = bounds.y.max(limit.y);
    let bottom = bounds.bottom().min(limit.bottom());
    (top..bottom)
        .filter_map(|y| {
            let t = (y as f64 + 0.5 - cy) / b;
            let half = a * (1.0 - t * t).max(0.0).sqrt();
            let mut spans = Vec::with_capacity(1);
            push_span(&mut spans, &limit, y, cx - half, cx + half);
            spans.pop()
        })
        .collect()
}

/// Span of the pixels on row `y` whose centres fall in `[left, right)`,
/// truncated to the columns of `limit`
fn push_span(spans: &mut Vec<Rect>, limit: &Rect, y: i32, left: f64, right: f64) {
    let x0 = ((left - 0.5).ceil() as i64).max(limit.x as i64);
    let x1 = ((right - 0.5).ceil() as i64).min(limit.right() as i64);
    if x1 > x0 {
        spans.push(Rect::new(x0 as i32, y, (x1 - x0) as i32, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::from_size(1024, 768);

    fn area(spans: &[Rect]) -> i64 {
        spans.iter().map(Rect::area).sum()
    }

    #[test]
    fn test_axis_aligned_square() {
        let square = [IVec2::new(2, 2), IVec2::new(6, 2), IVec2::new(6, 6), IVec2::new(2, 6)];
        let spans = polygon_spans(&square, FillMode::Alternate, SCREEN);
        assert_eq!(spans.len(), 4);
        assert!(spans.iter().all(|s| s.x == 2 && s.width == 4));
        assert_eq!(area(&spans), 16);
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(polygon_spans(&[IVec2::ZERO, IVec2::new(5, 5)], FillMode::Winding, SCREEN).is_empty());
        let flat = [IVec2::new(0, 3), IVec2::new(5, 3), IVec2::new(9, 3)];
        assert!(polygon_spans(&flat, FillMode::Alternate, SCREEN).is_empty());
    }

    #[test]
    fn test_fill_modes_differ_on_self_overlap() {
        // Outer square traversed twice in the same direction
        let twice = [
            IVec2::new(0, 0),
            IVec2::new(8, 0),
            IVec2::new(8, 8),
            IVec2::new(0, 8),
            IVec2::new(0, 0),
            IVec2::new(8, 0),
            IVec2::new(8, 8),
            IVec2::new(0, 8),
        ];
        assert_eq!(area(&polygon_spans(&twice, FillMode::Winding, SCREEN)), 64);
        assert_eq!(area(&polygon_spans(&twice, FillMode::Alternate, SCREEN)), 0);
    }

    #[test]
    fn test_spans_do_not_overlap() {
        let star = [
            IVec2::new(10, 0),
            IVec2::new(16, 20),
            IVec2::new(0, 7),
            IVec2::new(20, 7),
            IVec2::new(4, 20),
        ];
        for mode in [FillMode::Alternate, FillMode::Winding] {
            let spans = polygon_spans(&star, mode, SCREEN);
            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    assert!(a.intersection(b).is_none(), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_ellipse_stays_in_bounds() {
        let bounds = Rect::new(10, 20, 31, 17);
        let spans = ellipse_spans(bounds, SCREEN);
        assert!(!spans.is_empty());
        for span in &spans {
            assert!(bounds.contains_rect(span), "{span:?}");
        }
        let widest = spans.iter().map(|s| s.width).max().unwrap();
        assert!(widest >= 29);
    }

    #[test]
    fn test_ellipse_area_close_to_analytic() {
        let spans = ellipse_spans(Rect::new(0, 0, 100, 60), SCREEN);
        let analytic = std::f64::consts::PI * 50.0 * 30.0;
        let actual = area(&spans) as f64;
        assert!((actual - analytic).abs() / analytic < 0.03);
    }

    #[test]
    fn test_tall_ellipse_only_scans_limit_rows() {
        let limit = Rect::from_size(64, 64);
        let spans = ellipse_spans(Rect::new(0, 0, 4, 5_000_000), limit);
        assert!(spans.len() <= 64);
        assert!(spans.iter().all(|s| limit.contains_rect(s)));
    }

    #[test]
    fn test_polygon_truncated_to_limit() {
        let limit = Rect::new(10, 10, 20, 20);
        let huge = [IVec2::new(i32::MIN, i32::MIN), IVec2::new(i32::MAX, i32::MIN), IVec2::new(0, i32::MAX)];
        let spans = polygon_spans(&huge, FillMode::Winding, limit);
        assert_eq!(area(&spans), 400);
        assert!(spans.iter().all(|s| limit.contains_rect(s)));

        let square = [IVec2::new(0, 0), IVec2::new(8, 0), IVec2::new(8, 8), IVec2::new(0, 8)];
        assert!(polygon_spans(&square, FillMode::Alternate, limit).is_empty());
    }

    #[test]
    fn test_fill_mode_indices() {
        assert_eq!(FillMode::from_index(1), Some(FillMode::Alternate));
        assert_eq!(FillMode::from_index(2), Some(FillMode::Winding));
        assert_eq!(FillMode::from_index(0), None);
    }
}
