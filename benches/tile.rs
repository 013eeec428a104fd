#[macro_use]
extern crate criterion;
extern crate juliaseq;
extern crate num;

use criterion::Criterion;
use juliaseq::colors::Palette;
use juliaseq::planes::{TileCoord, Viewport};
use juliaseq::tile::{render_tile, RenderParams};
use juliaseq::TilePool;
use num::Complex;

fn params(pixels: usize) -> RenderParams {
    RenderParams {
        constant: Complex::new(-0.8, 0.156),
        power: 2.0,
        viewport: Viewport::new(Complex::new(0.0, 0.0), 1.5, 4),
        iterations: 150,
        pixels,
        palette: Palette::default(),
    }
}

fn probe_tile(c: &mut Criterion) {
    let p = params(64);
    c.bench_function("probe one 64px tile", move |b| {
        b.iter(|| render_tile(&p, TileCoord::new(1, 1), None).unwrap())
    });
}

fn probe_frame(c: &mut Criterion) {
    let p = params(10);
    let tiles = p.viewport.tiles();
    let pool = TilePool::default();
    c.bench_function("probe a 4x4 frame at 10px", move |b| {
        b.iter(|| pool.probe(&p, &tiles).unwrap())
    });
}

criterion_group!(benches, probe_tile, probe_frame);
criterion_main!(benches);
