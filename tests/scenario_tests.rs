use gdi_compositor::core::{FillMode, HatchStyle, PaletteEntry, Pen, PenStyle, RemoteBrush, Rop3};
use gdi_compositor::math::{pack_argb, Rect};
use gdi_compositor::{BlitSource, DrawingPrimitives, GdiConfig, GdiContext, GdiError};
use glam::IVec2;

const WHITE: u32 = 0xFFFF_FFFF;

fn context(width: u32, height: u32, server_depth: u32) -> GdiContext {
    GdiContext::new(GdiConfig {
        width,
        height,
        server_depth,
    })
    .unwrap()
}

fn assert_rect_filled(ctx: &GdiContext, rect: Rect, expected: u32) {
    let pixels = ctx.surfaces().primary().read_rect(rect);
    assert!(
        pixels.iter().all(|p| *p == expected),
        "{rect:?} not filled with {expected:#010x}"
    );
}

// ============================================================================
// Pattern Brush Round Trip
// ============================================================================

#[test]
fn test_surface_as_pattern_brush_round_trip() {
    let color = pack_argb(0x33, 0x66, 0x99);
    let mut ctx = context(64, 64, 24);

    let surface = ctx.create_surface(8, 8, None).unwrap();
    ctx.switch_surface(Some(surface));
    ctx.fill(Rect::new(0, 0, 8, 8), color);
    ctx.switch_surface(None);
    assert!(ctx.dirty_region().is_empty());

    let brush = ctx.pattern_brush_from_surface(surface);
    let target = Rect::new(10, 10, 16, 16);
    ctx.with_brush(brush, |ctx| ctx.bit_blt(target, BlitSource::None, Rop3::PATCOPY));

    assert_eq!(ctx.dirty_region().bounds(), Some(target));
    assert_rect_filled(&ctx, target, color);
    assert_eq!(ctx.surfaces().primary().pixel(9, 10), Some(0));
}

#[test]
fn test_remote_pattern_brush_round_trip() {
    let mut ctx = context(64, 64, 24);
    // 8x8 at 24 bpp, B G R
    let data: Vec<u8> = std::iter::repeat([0x99, 0x66, 0x33]).take(64).flatten().collect();
    let target = Rect::new(10, 10, 16, 16);
    ctx.pat_blt(0xF0, target, &RemoteBrush::Pattern { data }, 0, 0).unwrap();
    assert_eq!(ctx.dirty_region().bounds(), Some(target));
    assert_rect_filled(&ctx, target, pack_argb(0x33, 0x66, 0x99));
}

#[test]
fn test_short_pattern_data_is_an_error() {
    let mut ctx = context(16, 16, 24);
    let err = ctx
        .pat_blt(0xF0, Rect::new(0, 0, 4, 4), &RemoteBrush::Pattern { data: vec![0; 10] }, 0, 0)
        .unwrap_err();
    assert_eq!(err, GdiError::InvalidImageData { expected: 192, actual: 10 });
    assert!(ctx.dirty_region().is_empty());
}

#[test]
fn test_hatched_brush_draws_lines_in_foreground() {
    let mut ctx = context(16, 16, 24);
    let brush = RemoteBrush::Hatched {
        hatch: HatchStyle::Horizontal,
    };
    ctx.pat_blt(0xF0, Rect::new(0, 0, 16, 16), &brush, 0x00FF_FFFF, 0x0000_00FF)
        .unwrap();
    let red = pack_argb(0xFF, 0, 0);
    assert_eq!(ctx.surfaces().primary().pixel(5, 3), Some(red));
    assert_eq!(ctx.surfaces().primary().pixel(5, 11), Some(red));
    assert_eq!(ctx.surfaces().primary().pixel(5, 4), Some(WHITE));
}

// ============================================================================
// Destination Blits
// ============================================================================

#[test]
fn test_destblt_blackout() {
    let mut ctx = context(128, 128, 16);
    ctx.surfaces_mut().primary_mut().fill(WHITE);

    ctx.dst_blt(0x00, Rect::new(0, 0, 100, 100));

    assert_rect_filled(&ctx, Rect::new(0, 0, 100, 100), 0);
    assert_eq!(ctx.surfaces().primary().pixel(100, 0), Some(WHITE));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(0, 0, 100, 100)));
}

#[test]
fn test_destblt_invert_twice_restores() {
    let mut ctx = context(32, 32, 16);
    ctx.surfaces_mut().primary_mut().fill(0xFF12_3456);
    ctx.dst_blt(0x55, Rect::new(4, 4, 8, 8));
    assert_eq!(ctx.surfaces().primary().pixel(4, 4), Some(!0xFF12_3456));
    ctx.dst_blt(0x55, Rect::new(4, 4, 8, 8));
    assert_rect_filled(&ctx, Rect::from_size(32, 32), 0xFF12_3456);
}

// ============================================================================
// Lines
// ============================================================================

#[test]
fn test_line_ignores_clip_geometry() {
    let mut ctx = context(200, 200, 24);
    ctx.set_clip(Rect::new(0, 0, 4, 4));
    ctx.line(12, IVec2::new(5, 5), IVec2::new(5, 105), &Pen::solid(0x00FF_FFFF));

    for y in 5..105 {
        assert_eq!(ctx.surfaces().primary().pixel(5, y), Some(WHITE), "y = {y}");
    }
    assert_eq!(ctx.surfaces().primary().pixel(5, 105), Some(0));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(5, 5, 1, 101)));
}

#[test]
fn test_line_footprint_limited_to_surface() {
    let mut ctx = context(50, 50, 24);
    ctx.line(12, IVec2::new(-10, 20), IVec2::new(80, 20), &Pen::solid(0x00FF_FFFF));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(0, 20, 50, 1)));
    assert_eq!(ctx.surfaces().primary().pixel(0, 20), Some(WHITE));
    assert_eq!(ctx.surfaces().primary().pixel(49, 20), Some(WHITE));
}

#[test]
fn test_polyline_draws_shared_vertices_once() {
    let mut ctx = context(20, 20, 24);
    let points = [IVec2::new(2, 2), IVec2::new(10, 2), IVec2::new(10, 10)];
    // XOR pen: a vertex painted twice would cancel out
    ctx.polyline(6, &points, &Pen::solid(0x00FF_FFFF));
    assert_eq!(ctx.surfaces().primary().pixel(10, 2), Some(WHITE));
    assert_eq!(ctx.surfaces().primary().pixel(2, 2), Some(WHITE));
    assert_eq!(ctx.surfaces().primary().pixel(10, 10), Some(0));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(2, 2, 9, 9)));
}

#[test]
fn test_null_pen_leaves_everything_untouched() {
    let mut ctx = context(20, 20, 24);
    let pen = Pen {
        style: PenStyle::Null,
        width: 1,
        color: 0x00FF_FFFF,
    };
    ctx.line(12, IVec2::new(0, 0), IVec2::new(10, 10), &pen);
    ctx.polyline(12, &[IVec2::new(0, 0), IVec2::new(5, 0)], &pen);
    assert!(ctx.dirty_region().is_empty());
}

// ============================================================================
// Glyphs
// ============================================================================

#[test]
fn test_glyph_clipped_on_left_edge() {
    let mut ctx = context(16, 4, 24);
    let glyph = ctx.create_glyph(8, 1, &[0b0011_0000]).unwrap();
    ctx.start_draw_glyphs(0, 0x0000_FF00);
    // Two columns hang off the left edge
    ctx.draw_glyph(Rect::new(-2, 0, 8, 1), &glyph);
    ctx.end_draw_glyphs();

    let green = pack_argb(0, 0xFF, 0);
    let row = ctx.surfaces().primary().read_rect(Rect::new(0, 0, 6, 1));
    assert_eq!(row, vec![green, green, 0, 0, 0, 0]);
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(0, 0, 6, 1)));
}

#[test]
fn test_glyph_preserves_background() {
    let mut ctx = context(8, 1, 24);
    ctx.surfaces_mut().primary_mut().fill(WHITE);
    let glyph = ctx.create_glyph(8, 1, &[0b1000_0001]).unwrap();
    ctx.start_draw_glyphs(0x00FF_FFFF, 0);
    ctx.draw_glyph(Rect::new(0, 0, 8, 1), &glyph);
    ctx.end_draw_glyphs();
    let black = pack_argb(0, 0, 0);
    let row = ctx.surfaces().primary().read_rect(Rect::new(0, 0, 8, 1));
    assert_eq!(row, vec![black, WHITE, WHITE, WHITE, WHITE, WHITE, WHITE, black]);
}

// ============================================================================
// Memory Blits
// ============================================================================

#[test]
fn test_memblt_source_follows_clip_shift() {
    let mut ctx = context(32, 32, 32);
    // 4x4 bitmap whose blue channel encodes the pixel index (BGRX)
    let data: Vec<u8> = (0..16u8).flat_map(|i| [i, 0, 0, 0]).collect();
    let bitmap = ctx.create_bitmap(4, 4, &data).unwrap();

    ctx.set_clip(Rect::new(10, 10, 10, 10));
    ctx.mem_blt(0xCC, Rect::new(8, 9, 4, 4), bitmap, IVec2::ZERO);

    // Destination shifted by (2, 1), so (10, 10) shows source (2, 1)
    assert_eq!(ctx.surfaces().primary().pixel(10, 10), Some(pack_argb(0, 0, 6)));
    assert_eq!(ctx.surfaces().primary().pixel(11, 12), Some(pack_argb(0, 0, 15)));
    assert_eq!(ctx.surfaces().primary().pixel(9, 10), Some(0));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(10, 10, 2, 3)));
}

#[test]
fn test_memblt_source_truncated_to_bitmap() {
    let mut ctx = context(32, 32, 32);
    let data: Vec<u8> = std::iter::repeat([0xFF, 0xFF, 0xFF, 0]).take(4).flatten().collect();
    let bitmap = ctx.create_bitmap(2, 2, &data).unwrap();
    ctx.mem_blt(0xCC, Rect::new(0, 0, 10, 10), bitmap, IVec2::new(1, 1));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(0, 0, 1, 1)));
    assert_eq!(ctx.surfaces().primary().pixel(0, 0), Some(WHITE));
    assert_eq!(ctx.surfaces().primary().pixel(1, 0), Some(0));
}

#[test]
fn test_mem3blt_combines_source_and_brush() {
    let mut ctx = context(16, 16, 24);
    let yellow: Vec<u8> = std::iter::repeat([0x00, 0xFF, 0xFF]).take(4).flatten().collect();
    let bitmap = ctx.create_bitmap(2, 2, &yellow).unwrap();
    // MERGECOPY: source AND pattern
    ctx.mem3_blt(
        0xC0,
        Rect::new(3, 3, 2, 2),
        bitmap,
        IVec2::ZERO,
        &RemoteBrush::Solid,
        0,
        0x0000_00FF,
    )
    .unwrap();
    assert_rect_filled(&ctx, Rect::new(3, 3, 2, 2), pack_argb(0xFF, 0, 0));
}

#[test]
fn test_screen_copy_overlapping_downwards() {
    let mut ctx = context(4, 8, 24);
    for y in 0..8 {
        ctx.surfaces_mut().primary_mut().fill_rect(Rect::new(0, y, 4, 1), y as u32);
    }
    ctx.scr_blt(0xCC, Rect::new(0, 2, 4, 6), IVec2::new(0, 0));
    let column: Vec<u32> = (0..8).map(|y| ctx.surfaces().primary().pixel(0, y).unwrap()).collect();
    assert_eq!(column, vec![0, 1, 0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_paint_bitmap_shifts_source_with_clip() {
    let mut ctx = context(32, 32, 32);
    let data: Vec<u8> = (0..16u8).flat_map(|i| [i, 0, 0, 0]).collect();
    ctx.set_clip(Rect::new(10, 10, 20, 20));
    ctx.paint_bitmap(Rect::new(8, 8, 4, 4), 4, 4, &data).unwrap();
    assert_eq!(ctx.surfaces().primary().pixel(10, 10), Some(pack_argb(0, 0, 10)));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(10, 10, 2, 2)));
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_polygon_fill_through_rop2() {
    let mut ctx = context(32, 32, 24);
    let square = [
        IVec2::new(4, 4),
        IVec2::new(12, 4),
        IVec2::new(12, 12),
        IVec2::new(4, 12),
    ];
    ctx.polygon(12, FillMode::Alternate, &square, &RemoteBrush::Solid, 0, 0x00FF_FFFF)
        .unwrap();
    assert_rect_filled(&ctx, Rect::new(4, 4, 8, 8), WHITE);
    assert_eq!(ctx.surfaces().primary().pixel(12, 12), Some(0));
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(4, 4, 8, 8)));

    // XOR pen over the same area cancels out
    ctx.polygon(6, FillMode::Winding, &square, &RemoteBrush::Solid, 0, 0x00FF_FFFF)
        .unwrap();
    assert_rect_filled(&ctx, Rect::new(4, 4, 8, 8), 0);
}

#[test]
fn test_ellipse_inside_bounding_rect() {
    let mut ctx = context(64, 64, 24);
    let bounds = Rect::new(10, 20, 30, 16);
    ctx.ellipse(12, FillMode::Alternate, bounds, &RemoteBrush::Solid, 0, 0x00FF_FFFF)
        .unwrap();
    let dirty = ctx.dirty_region().bounds().unwrap();
    assert!(bounds.contains_rect(&dirty));
    // Centre filled, corners untouched
    assert_eq!(ctx.surfaces().primary().pixel(25, 28), Some(WHITE));
    assert_eq!(ctx.surfaces().primary().pixel(10, 20), Some(0));
    assert_eq!(ctx.surfaces().primary().pixel(39, 35), Some(0));
}

#[test]
fn test_rect_is_clipped_solid_fill() {
    let mut ctx = context(32, 32, 24);
    ctx.set_clip(Rect::new(0, 0, 10, 10));
    ctx.rect(Rect::new(5, 5, 10, 10), 0x0000_FF00);
    assert_rect_filled(&ctx, Rect::new(5, 5, 5, 5), pack_argb(0, 0xFF, 0));
    assert_eq!(ctx.surfaces().primary().pixel(10, 10), Some(0));
    ctx.reset_clip();
    assert!(!ctx.clip_region().is_set());
}

// ============================================================================
// Extreme Coordinates
// ============================================================================

#[test]
fn test_blits_at_i32_edges_are_skipped() {
    let mut ctx = context(64, 64, 32);
    ctx.dst_blt(0x00, Rect::new(i32::MIN, 0, 10, 10));
    ctx.scr_blt(0xCC, Rect::new(-5, 0, 10, 10), IVec2::new(i32::MAX - 2, 0));

    let bitmap = ctx.create_bitmap(2, 2, &[0xFF; 16]).unwrap();
    ctx.mem_blt(0xCC, Rect::new(0, 0, 2, 2), bitmap, IVec2::new(i32::MIN, 0));
    ctx.mem_blt(0xCC, Rect::new(i32::MAX - 1, i32::MAX - 1, 2, 2), bitmap, IVec2::ZERO);

    assert!(ctx.dirty_region().is_empty());
    assert_rect_filled(&ctx, Rect::from_size(64, 64), 0);
}

#[test]
fn test_huge_shapes_fill_only_the_surface() {
    let mut ctx = context(64, 64, 24);
    let huge = Rect::new(-5_000_000, -5_000_000, 10_000_000, 10_000_000);
    ctx.ellipse(12, FillMode::Alternate, huge, &RemoteBrush::Solid, 0, 0x00FF_FFFF)
        .unwrap();
    assert_rect_filled(&ctx, Rect::from_size(64, 64), WHITE);
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::from_size(64, 64)));

    let triangle = [
        IVec2::new(i32::MIN, i32::MIN),
        IVec2::new(i32::MAX, i32::MIN),
        IVec2::new(0, i32::MAX),
    ];
    ctx.set_clip(Rect::new(8, 8, 4, 4));
    ctx.polygon(6, FillMode::Winding, &triangle, &RemoteBrush::Solid, 0, 0x00FF_FFFF)
        .unwrap();
    assert_rect_filled(&ctx, Rect::new(8, 8, 4, 4), 0);
    assert_eq!(ctx.surfaces().primary().pixel(7, 8), Some(WHITE));
}

#[test]
fn test_line_with_far_endpoints() {
    let mut ctx = context(64, 64, 24);
    ctx.line(12, IVec2::new(i32::MIN, 5), IVec2::new(i32::MAX, 5), &Pen::solid(0x00FF_FFFF));
    assert_rect_filled(&ctx, Rect::new(0, 5, 64, 1), WHITE);
    assert_eq!(ctx.dirty_region().bounds(), Some(Rect::new(0, 5, 64, 1)));
}

// ============================================================================
// Palettes and Desktop Save
// ============================================================================

#[test]
fn test_palette_drives_8bpp_colours() {
    let mut ctx = context(8, 8, 8);
    let palette = ctx.create_palette(&[PaletteEntry::new(0, 0, 0), PaletteEntry::new(0x10, 0x20, 0x30)]);
    ctx.set_palette(palette);
    ctx.rect(Rect::new(0, 0, 2, 2), 1);
    assert_eq!(ctx.surfaces().primary().pixel(1, 1), Some(pack_argb(0x10, 0x20, 0x30)));

    let bitmap = ctx.create_bitmap(2, 1, &[1, 0]).unwrap();
    ctx.mem_blt(0xCC, Rect::new(4, 4, 2, 1), bitmap, IVec2::ZERO);
    assert_eq!(ctx.surfaces().primary().pixel(4, 4), Some(pack_argb(0x10, 0x20, 0x30)));
    assert_eq!(ctx.surfaces().primary().pixel(5, 4), Some(pack_argb(0, 0, 0)));
}

#[test]
fn test_desktop_save_and_restore() {
    let mut ctx = context(32, 32, 24);
    let area = Rect::new(4, 4, 6, 3);
    ctx.rect(area, 0x0000_00FF);
    ctx.desktop_save(100, area).unwrap();

    ctx.dst_blt(0x00, Rect::from_size(32, 32));
    assert_rect_filled(&ctx, area, 0);

    ctx.present(|_, _| {});
    ctx.desktop_restore(100, area).unwrap();
    assert_rect_filled(&ctx, area, pack_argb(0xFF, 0, 0));
    assert_eq!(ctx.dirty_region().bounds(), Some(area));
}

#[test]
fn test_desktop_restore_elsewhere() {
    let mut ctx = context(32, 32, 24);
    ctx.rect(Rect::new(0, 0, 2, 2), 0x00FF_FFFF);
    ctx.desktop_save(0, Rect::new(0, 0, 2, 2)).unwrap();
    ctx.desktop_restore(0, Rect::new(20, 20, 2, 2)).unwrap();
    assert_rect_filled(&ctx, Rect::new(20, 20, 2, 2), WHITE);
}
