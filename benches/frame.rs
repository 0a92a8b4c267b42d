//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use orbitfield::config::{GlobeConfig, StarfieldConfig};
use orbitfield::connections::connections;
use orbitfield::context::FrameContext;
use orbitfield::globe::GlobeScene;
use orbitfield::raster::Canvas;
use orbitfield::starfield::ParticleField;
use orbitfield::surface::{Recorder, SurfaceSize};
use orbitfield::visuals::palette;
use orbitfield::Backdrop;

const SIZES: [(u32, u32); 3] = [(800, 600), (1920, 1080), (3840, 2160)];

fn bench_starfield_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("starfield_update");
    let config = StarfieldConfig::default();

    for (w, h) in SIZES {
        let size = SurfaceSize::new(w, h);
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ParticleField::initialize(&config, size, &mut rng);
        let ctx = FrameContext::tick(size).with_pointer(size.center());
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &ctx, |b, ctx| {
            b.iter(|| field.update(black_box(ctx)))
        });
    }

    group.finish();
}

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");
    let config = StarfieldConfig::default();

    for (w, h) in SIZES {
        let size = SurfaceSize::new(w, h);
        let mut rng = StdRng::seed_from_u64(2);
        let field = ParticleField::initialize(&config, size, &mut rng);
        group.bench_with_input(BenchmarkId::new("particles", field.len()), &field, |b, field| {
            b.iter(|| connections(black_box(field.particles()), 120.0).count())
        });
    }

    group.finish();
}

fn bench_globe_frame(c: &mut Criterion) {
    let size = SurfaceSize::new(1280, 720);
    let mut rng = StdRng::seed_from_u64(3);
    let mut globe = GlobeScene::new(&GlobeConfig::default(), size, &mut rng);
    let ctx = FrameContext::tick(size).with_pointer(Vec2::new(900.0, 200.0));
    let mut recorder = Recorder::new(size);

    c.bench_function("globe_frame", |b| {
        b.iter(|| {
            globe.update(black_box(&ctx));
            recorder.take();
            globe.draw(&mut recorder);
        })
    });
}

fn bench_raster(c: &mut Criterion) {
    let size = SurfaceSize::new(1280, 720);
    let backdrop = Backdrop::new().with_seed(4);
    let mut group = c.benchmark_group("raster");
    group.sample_size(10);
    group.bench_function("snapshot_10_frames", |b| {
        b.iter(|| backdrop.snapshot(black_box(size), 10))
    });
    group.bench_function("canvas_clear", |b| {
        let mut canvas = Canvas::new(size, palette::NIGHT);
        b.iter(|| orbitfield::Surface::clear(&mut canvas))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_starfield_update,
    bench_connections,
    bench_globe_frame,
    bench_raster
);
criterion_main!(benches);
