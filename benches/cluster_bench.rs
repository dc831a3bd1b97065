use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use haplosort::cluster::{greedy_solve, nearest_neighbor_solve, refine_two_opt, DistanceMatrix};
use haplosort::{Haplosome, MutationTable, NoProgress};

fn generate_population(count: usize, site_count: usize) -> (Vec<Haplosome>, MutationTable) {
    let mut table = MutationTable::new();
    let ids: Vec<_> = (0..site_count)
        .map(|s| table.push(s as i64 * 10, s % 3 != 0))
        .collect();

    let run_width = (site_count as i64 * 10).max(1);
    let haplosomes = (0..count)
        .map(|h| {
            // deterministic pseudo-random carriage pattern
            let carried = ids
                .iter()
                .copied()
                .filter(|&id| (id as usize * 31 + h * 17) % 7 < 3)
                .collect();
            Haplosome::single_run(carried, run_width)
        })
        .collect();

    (haplosomes, table)
}

fn bench_distance_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster/distances");

    for count in [50, 100, 250].iter() {
        let (haplosomes, table) = generate_population(*count, 200);

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                DistanceMatrix::build(
                    black_box(&haplosomes),
                    black_box(&table),
                    None,
                    false,
                    &mut NoProgress,
                )
            });
        });
    }

    group.finish();
}

fn bench_nearest_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster/nearest_neighbor");

    for count in [50, 100, 250].iter() {
        let (haplosomes, table) = generate_population(*count, 200);
        let distances =
            DistanceMatrix::build(&haplosomes, &table, None, false, &mut NoProgress).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| nearest_neighbor_solve(black_box(&distances), &mut NoProgress));
        });
    }

    group.finish();
}

fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster/greedy");
    group.sample_size(20);

    for count in [50, 100, 250].iter() {
        let (haplosomes, table) = generate_population(*count, 200);
        let distances =
            DistanceMatrix::build(&haplosomes, &table, None, false, &mut NoProgress).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| greedy_solve(black_box(&distances), &mut NoProgress));
        });
    }

    group.finish();
}

fn bench_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster/two_opt");
    group.sample_size(10); // 2-opt convergence dominates at larger sizes

    for count in [50, 100].iter() {
        let (haplosomes, table) = generate_population(*count, 200);
        let distances =
            DistanceMatrix::build(&haplosomes, &table, None, false, &mut NoProgress).unwrap();
        let initial = nearest_neighbor_solve(&distances, &mut NoProgress).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                let mut path = initial.clone();
                refine_two_opt(black_box(&mut path), black_box(&distances), &mut NoProgress);
                path
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_distance_build,
    bench_nearest_neighbor,
    bench_greedy,
    bench_two_opt
);
criterion_main!(benches);
