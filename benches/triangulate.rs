use cdt_core::point::Point2;
use cdt_core::PointTriangulator;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_points(n: usize, seed: u64) -> Vec<Point2> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n).map(|_| Point2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0))).collect()
}

fn bench_triangulate(c: &mut Criterion) {
  let mut group = c.benchmark_group("triangulate");
  for &n in &[100usize, 1_000, 10_000] {
    let points = random_points(n, 42);
    group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
      b.iter(|| {
        let triangulator = PointTriangulator::new(points.clone());
        black_box(triangulator.triangulate().expect("triangulation should succeed"))
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_triangulate);
criterion_main!(benches);
