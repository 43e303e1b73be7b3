use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skyline::clipping::{ClipPath, ProjectedPolygon};
use skyline::config::SceneConfig;
use skyline::math::vec2::Point2;
use skyline::pen::StrokeLog;
use skyline::runner::Runner;
use skyline::scene::Scene;

fn quad(x: f32, y: f32, size: f32) -> Vec<Point2> {
    vec![
        Point2::new(x, y),
        Point2::new(x + size, y),
        Point2::new(x + size, y + size),
        Point2::new(x, y + size),
    ]
}

/// `n * n` overlapping quads covering roughly [-80, 80]².
fn quad_grid(n: usize) -> Vec<ClipPath> {
    let step = 160.0 / n as f32;
    (0..n)
        .flat_map(|row| {
            (0..n).map(move |col| {
                let x = -80.0 + col as f32 * step;
                let y = -80.0 + row as f32 * step;
                ClipPath::new(quad(x, y, step * 1.5))
            })
        })
        .collect()
}

fn benchmark_boolean(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");

    for n in [4usize, 10, 20] {
        let occluders = quad_grid(n);
        group.bench_with_input(
            BenchmarkId::new("quad_against_grid", n * n),
            &occluders,
            |b, occluders| {
                b.iter(|| {
                    let mut polygon = ProjectedPolygon::outlined(quad(-90.0, -90.0, 180.0));
                    for occluder in occluders {
                        if !polygon.boolean(black_box(occluder), true) {
                            break;
                        }
                    }
                    polygon
                });
            },
        );
    }

    let far_away = ClipPath::new(quad(500.0, 500.0, 10.0));
    group.bench_function("disjoint_broad_phase", |b| {
        b.iter(|| {
            let mut polygon = ProjectedPolygon::outlined(quad(0.0, 0.0, 10.0));
            polygon.boolean(black_box(&far_away), true)
        });
    });

    group.finish();
}

fn benchmark_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    group.sample_size(20);

    for depth in [4usize, 12] {
        group.bench_with_input(BenchmarkId::new("rows", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut config = SceneConfig::default();
                config.depth = depth;
                let scene = Scene::new(config, StrokeLog::new()).unwrap();
                let mut runner = Runner::new(scene);
                runner.run();
                runner.into_walker().stats().segments
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_boolean, benchmark_scene);
criterion_main!(benches);
