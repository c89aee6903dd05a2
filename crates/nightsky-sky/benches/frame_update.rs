use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use nightsky_sky::*;

fn bench_scene_tick(c: &mut Criterion) {
    let mut scene = Scene::init(42, SceneConfig::default());
    c.bench_function("scene_tick_5000_stars", |bencher| {
        bencher.iter(|| black_box(scene.tick(black_box(1.0 / 60.0), false)))
    });
}

fn bench_starfield_update(c: &mut Criterion) {
    let stars = StarfieldGenerator::new(42, 5000).generate();
    let mut field = StarField::new(stars, TwinkleRange::default());
    let mut time = 0.0f32;
    c.bench_function("starfield_update_5000", |bencher| {
        bencher.iter(|| {
            time += 1.0 / 60.0;
            field.update(black_box(time));
        })
    });
}

fn bench_layout_zodiac(c: &mut Criterion) {
    let params = LayoutParams::default();
    c.bench_function("layout_zodiac", |bencher| {
        bencher.iter(|| black_box(layout(&ZODIAC, &params, black_box(42))))
    });
}

fn bench_band_shade(c: &mut Criterion) {
    c.bench_function("band_shade_64x64", |bencher| {
        bencher.iter(|| {
            let mut alpha = 0.0;
            for i in 0..64 {
                for j in 0..64 {
                    let uv = Vec2::new(i as f32 / 63.0, j as f32 / 63.0);
                    alpha += GalacticBand::shade(uv, black_box(10.0))[3];
                }
            }
            black_box(alpha)
        })
    });
}

criterion_group!(
    benches,
    bench_scene_tick,
    bench_starfield_update,
    bench_layout_zodiac,
    bench_band_shade
);
criterion_main!(benches);
