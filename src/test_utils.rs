use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::classify::RoadIndex;
use crate::record::Record;
use crate::spatial_index::SpatialIndex;

pub fn rand_point(rng: &mut impl Rng, extent: f64) -> [f64; 3] {
    [
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    ]
}

pub fn rand_points(rng: &mut impl Rng, qty: usize, extent: f64) -> Vec<[f64; 3]> {
    (0..qty).map(|_| rand_point(rng, extent)).collect()
}

/// A road-like cloud: a noisy strip along the x axis, one point per `spacing`.
pub fn rand_road_strip(rng: &mut impl Rng, length: f64, spacing: f64) -> Vec<[f64; 3]> {
    let qty = (length / spacing) as usize;
    (0..qty)
        .map(|i| {
            [
                i as f64 * spacing,
                rng.random_range(-0.05..0.05),
                rng.random_range(-0.02..0.02),
            ]
        })
        .collect()
}

/// Raw, unstandardized records at random positions. Roughly one in ten has a
/// non-positive range or a timestamp past the sensor cutoff.
pub fn rand_raw_records(rng: &mut impl Rng, qty: usize, extent: f64) -> Vec<Record> {
    (0..qty)
        .map(|i| {
            let [x, y, z] = rand_point(rng, extent);
            let range = if rng.random_range(0..20) == 0 {
                -rng.random_range(0.0..500.0)
            } else {
                rng.random_range(1.0..50_000.0)
            };
            let t = if rng.random_range(0..20) == 0 {
                rng.random_range(1.2e9..2e9)
            } else {
                rng.random_range(0.0..1.1e9)
            };
            Record::new(range, t, x, y, z).with_passthrough("id", i.to_string())
        })
        .collect()
}

/// Exhaustive nearest distance, written independently of any index.
pub fn brute_force_nearest(points: &[[f64; 3]], query: &[f64; 3]) -> f64 {
    points
        .iter()
        .map(|p| {
            ((p[0] - query[0]).powi(2) + (p[1] - query[1]).powi(2) + (p[2] - query[2]).powi(2))
                .sqrt()
        })
        .fold(f64::INFINITY, f64::min)
}

pub fn build_populated_index_and_query_points<I: SpatialIndex>(
    size: usize,
    query_point_qty: usize,
) -> (RoadIndex<I>, Vec<[f64; 3]>) {
    let mut rng = ChaCha8Rng::seed_from_u64(size as u64);
    let extent = (size as f64).cbrt();

    let points = rand_points(&mut rng, size, extent);
    let index = match RoadIndex::<I>::build(&points) {
        Ok(index) => index,
        Err(err) => panic!("could not index {size} points: {err}"),
    };

    (index, rand_points(&mut rng, query_point_qty, extent))
}
