//! Benchmarks for the analysis algorithms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use stratus_algorithms::neighbourhood::calc_neighbourhood;
use stratus_algorithms::oi::optimal_interpolation;
use stratus_algorithms::structure::BarnesStructure;
use stratus_core::{Field, Grid, Points};

fn make_grid(size: usize) -> Grid {
    let step = 4.0 / size as f32;
    let lats = Array2::from_shape_fn((size, size), |(y, _)| 58.0 + y as f32 * step);
    let lons = Array2::from_shape_fn((size, size), |(_, x)| 8.0 + x as f32 * step);
    Grid::new(lats, lons).unwrap()
}

fn make_points(n: usize) -> Points {
    // Deterministic pseudo-random scatter inside the grid
    let mut rng: u64 = 0x2545F4914F6CDD1D;
    let mut next = || {
        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (rng >> 33) as f32 / (1u64 << 31) as f32
    };
    let mut lats = Vec::with_capacity(n);
    let mut lons = Vec::with_capacity(n);
    for _ in 0..n {
        lats.push(58.0 + next() * 4.0);
        lons.push(8.0 + next() * 4.0);
    }
    Points::new(lats, lons).unwrap()
}

fn bench_oi(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_interpolation");
    group.sample_size(10);

    for size in [32, 64, 128].iter() {
        let grid = make_grid(*size);
        let background = Field::filled(*size, *size, 10.0);
        let points = make_points(500);
        let pobs = vec![11.0; 500];
        let pratios = vec![0.5; 500];
        let pbackground = vec![10.0; 500];
        let structure = BarnesStructure::new(50_000.0, 0.0, 0.0, None).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                optimal_interpolation(
                    black_box(&grid),
                    black_box(&background),
                    &points,
                    &pobs,
                    &pratios,
                    &pbackground,
                    &structure,
                    20,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_neighbourhood(c: &mut Criterion) {
    let mut group = c.benchmark_group("calc_neighbourhood");

    for size in [256, 512].iter() {
        let array = Field::from_vec(
            (0..size * size).map(|i| (i % 97) as f32).collect(),
            *size,
            *size,
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                calc_neighbourhood(
                    black_box(&array),
                    black_box(&array),
                    3,
                    0.0,
                    100.0,
                    0.0,
                    100.0,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_oi, bench_neighbourhood);
criterion_main!(benches);
