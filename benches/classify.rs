use codspeed_criterion_compat::{
    black_box, criterion_group, criterion_main, measurement::WallTime, AxisScale, BatchSize,
    BenchmarkGroup, BenchmarkId, Criterion, PlotConfiguration, Throughput,
};
use kerb::test_utils::{build_populated_index_and_query_points, rand_points};
use kerb::{LinearScan, RoadIndex, RoadTree, SpatialIndex};
use rand::SeedableRng;

const QUERY_POINTS_PER_LOOP: usize = 1000;
const THRESHOLD: f64 = 0.4;

fn bench_classify<I: SpatialIndex>(
    group: &mut BenchmarkGroup<WallTime>,
    road_size: usize,
    subtype: &str,
) {
    group.bench_with_input(
        BenchmarkId::new(subtype, road_size),
        &road_size,
        |b, &size| {
            b.iter_batched(
                || build_populated_index_and_query_points::<I>(size, QUERY_POINTS_PER_LOOP),
                |(index, query_points): (RoadIndex<I>, Vec<[f64; 3]>)| {
                    black_box(index.classify(&query_points, THRESHOLD))
                },
                BatchSize::SmallInput,
            );
        },
    );
}

pub fn classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classify");
    group.throughput(Throughput::Elements(QUERY_POINTS_PER_LOOP as u64));

    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    group.plot_config(plot_config);

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        bench_classify::<RoadTree>(&mut group, size, "k-d tree");
    }
    for size in [1_000, 10_000] {
        bench_classify::<LinearScan>(&mut group, size, "linear scan");
    }

    group.finish();
}

pub fn build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build road index");

    for size in [1_000, 100_000, 1_000_000] {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(size as u64);
        let points = rand_points(&mut rng, size, 100.0);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| black_box(RoadTree::build(points)))
        });
    }

    group.finish();
}

criterion_group!(benches, classify, build);
criterion_main!(benches);
