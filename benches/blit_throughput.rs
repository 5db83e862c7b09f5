use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gdi_compositor::core::{composite, Brush, Operand, Pattern, PixelBuffer, Rop3};
use gdi_compositor::math::Rect;
use gdi_compositor::{BlitSource, DrawingPrimitives, GdiConfig, GdiContext};
use glam::IVec2;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn screen() -> PixelBuffer {
    let mut buffer = PixelBuffer::new(WIDTH, HEIGHT, 32).unwrap();
    buffer.fill(0xFF20_4060);
    buffer
}

fn checker() -> Brush {
    let pixels = (0..64).map(|i| if (i / 8 + i % 8) % 2 == 0 { 0xFFFF_FFFF } else { 0xFF00_0000 }).collect();
    Brush::Pattern(Pattern::new(8, 8, pixels))
}

/// Benchmark: fast paths against the general per-pixel evaluator
fn bench_full_screen_rops(c: &mut Criterion) {
    let rect = Rect::from_size(WIDTH as i32, HEIGHT as i32);
    let source: Vec<u32> = (0..WIDTH * HEIGHT).collect();
    let operand = Operand::Pixels {
        data: &source,
        stride: WIDTH as usize,
    };
    let brush = checker();

    let mut group = c.benchmark_group("full_screen");
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

    for rop in [Rop3::BLACKNESS, Rop3::SRCCOPY, Rop3::PATCOPY, Rop3::DSTINVERT, Rop3::SRCINVERT, Rop3::GLYPH] {
        let mut dst = screen();
        group.bench_with_input(BenchmarkId::new("composite", rop.name()), &rop, |b, rop| {
            b.iter(|| composite(&mut dst, black_box(rect), *rop, Some(&operand), Some(&brush)))
        });
    }
    group.finish();
}

/// Benchmark: small blits dominated by clipping and dirty tracking
fn bench_context_blits(c: &mut Criterion) {
    let config = GdiConfig {
        width: WIDTH,
        height: HEIGHT,
        server_depth: 16,
    };
    let mut group = c.benchmark_group("context");

    for size in [8, 32, 128] {
        let mut ctx = GdiContext::new(config).unwrap();
        ctx.set_clip(Rect::new(16, 16, 512, 512));
        group.bench_with_input(BenchmarkId::new("scr_blt", size), &size, |b, &size| {
            b.iter(|| {
                ctx.scr_blt(0xCC, black_box(Rect::new(10, 10, size, size)), IVec2::new(200, 200));
                ctx.present(|_, _| {})
            })
        });

        let mut ctx = GdiContext::new(config).unwrap();
        group.bench_with_input(BenchmarkId::new("patcopy", size), &size, |b, &size| {
            b.iter(|| {
                ctx.with_brush(checker(), |ctx| {
                    ctx.bit_blt(black_box(Rect::new(3, 5, size, size)), BlitSource::None, Rop3::PATCOPY)
                })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_screen_rops, bench_context_blits);
criterion_main!(benches);
