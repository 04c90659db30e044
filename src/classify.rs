//! Road proximity classification.
//!
//! A query point is "near the road" when the Euclidean distance to the nearest road
//! point is strictly less than a threshold. The road points are indexed once per
//! call (or once per [`RoadIndex`]) and every query point is then answered with a
//! single exact nearest-neighbour search.

use crate::error::{Error, Result};
use crate::record::{positions, Record};
use crate::spatial_index::{RoadTree, SpatialIndex};
#[cfg(feature = "tracing")]
use tracing::{event, span, Level};

/// Distance, in the units of the co-ordinates (kilometres after standardization),
/// below which a point counts as near the road when no threshold is given
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Labels each query point with whether it lies within `threshold` of any road point.
///
/// `mask[i]` is `true` exactly when the distance from `query_points[i]` to its nearest
/// road point is `< threshold`; a point exactly `threshold` away is not near. The mask
/// has one entry per query point, in query order. A query point with a NaN
/// co-ordinate is never near. Distances too large to square in `f64` come out as
/// `+inf`, so such a point is not near even under an infinite threshold.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] if `threshold` is negative or NaN.
/// * [`Error::EmptyReferenceSet`] if `road_points` is empty, even when there are no
///   query points.
///
/// # Examples
///
/// ```rust
/// use kerb::classify_near_road;
///
/// let road = [[0.0, 0.0, 0.0], [10.0, 10.0, 10.0]];
/// let query = [[0.0, 0.0, 0.3], [5.0, 5.0, 5.0]];
///
/// let mask = classify_near_road(&road, &query, 0.4).unwrap();
///
/// assert_eq!(mask, vec![true, false]);
/// ```
pub fn classify_near_road(
    road_points: &[[f64; 3]],
    query_points: &[[f64; 3]],
    threshold: f64,
) -> Result<Vec<bool>> {
    classify_with::<RoadTree>(road_points, query_points, threshold)
}

/// [`classify_near_road`], backed by any [`SpatialIndex`] implementation.
pub fn classify_with<I: SpatialIndex>(
    road_points: &[[f64; 3]],
    query_points: &[[f64; 3]],
    threshold: f64,
) -> Result<Vec<bool>> {
    validate_threshold(threshold)?;

    RoadIndex::<I>::build(road_points)?.classify(query_points, threshold)
}

/// [`classify_near_road`] over records, using each record's `(x, y, z)`.
pub fn classify_records(road: &[Record], query: &[Record], threshold: f64) -> Result<Vec<bool>> {
    classify_near_road(&positions(road), &positions(query), threshold)
}

/// Returns, for each query point, the Euclidean distance to its nearest road point.
///
/// # Errors
///
/// [`Error::EmptyReferenceSet`] if `road_points` is empty.
pub fn nearest_road_distances(
    road_points: &[[f64; 3]],
    query_points: &[[f64; 3]],
) -> Result<Vec<f64>> {
    Ok(RoadIndex::<RoadTree>::build(road_points)?.nearest_distances(query_points))
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(Error::InvalidThreshold(threshold));
    }
    Ok(())
}

/// A road point set, indexed and ready to classify any number of query batches.
///
/// The index is never modified after [`RoadIndex::build`], so a `RoadIndex` over the
/// default tree is `Send + Sync` and can be shared read-only.
#[derive(Clone, Debug)]
pub struct RoadIndex<I = RoadTree> {
    index: I,
}

impl<I: SpatialIndex> RoadIndex<I> {
    /// Indexes `road_points`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyReferenceSet`] if `road_points` is empty.
    pub fn build(road_points: &[[f64; 3]]) -> Result<Self> {
        #[cfg(feature = "tracing")]
        let span = span!(Level::DEBUG, "road_index", road_points = road_points.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let index = I::build(road_points)?;

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, indexed = index.len(), "road index built");

        Ok(RoadIndex { index })
    }

    /// Indexes the `(x, y, z)` positions of `road`.
    pub fn from_records(road: &[Record]) -> Result<Self> {
        Self::build(&positions(road))
    }

    /// Number of indexed road points
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: an index can not be built over an empty road set
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Euclidean distance from `point` to the nearest road point
    #[inline]
    pub fn nearest_distance(&self, point: &[f64; 3]) -> f64 {
        self.index.nearest(point)
    }

    /// Euclidean distance from each query point to its nearest road point, in query order
    pub fn nearest_distances(&self, query_points: &[[f64; 3]]) -> Vec<f64> {
        query_points
            .iter()
            .map(|point| self.index.nearest(point))
            .collect()
    }

    /// Labels each query point with whether it is strictly within `threshold` of the road.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidThreshold`] if `threshold` is negative or NaN.
    pub fn classify(&self, query_points: &[[f64; 3]], threshold: f64) -> Result<Vec<bool>> {
        validate_threshold(threshold)?;

        let mask: Vec<bool> = query_points
            .iter()
            .map(|point| self.index.nearest(point) < threshold)
            .collect();

        #[cfg(feature = "tracing")]
        event!(
            Level::DEBUG,
            queried = mask.len(),
            near = mask.iter().filter(|&&near| near).count(),
            threshold,
            "classified query points"
        );

        Ok(mask)
    }

    /// [`RoadIndex::classify`] over records, using each record's `(x, y, z)`.
    pub fn classify_records(&self, query: &[Record], threshold: f64) -> Result<Vec<bool>> {
        self.classify(&positions(query), threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::spatial_index::LinearScan;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn random_cloud(rng: &mut impl Rng, n: usize, extent: f64) -> Vec<[f64; 3]> {
        (0..n)
            .map(|_| {
                [
                    rng.random_range(-extent..extent),
                    rng.random_range(-extent..extent),
                    rng.random_range(-extent..extent),
                ]
            })
            .collect()
    }

    #[test]
    fn two_point_road_example() {
        let road = [[0.0, 0.0, 0.0], [10.0, 10.0, 10.0]];
        let query = [[0.0, 0.0, 0.3], [5.0, 5.0, 5.0]];

        assert_eq!(
            classify_near_road(&road, &query, DEFAULT_THRESHOLD).unwrap(),
            vec![true, false]
        );

        let distances = nearest_road_distances(&road, &query).unwrap();
        assert!((distances[0] - 0.3).abs() < 1e-12);
        assert!((distances[1] - 75f64.sqrt()).abs() < 1e-12);
    }

    #[rstest]
    #[case::positive_threshold(0.4, true)]
    #[case::tiny_threshold(f64::MIN_POSITIVE, true)]
    #[case::zero_threshold(0.0, false)]
    fn coincident_point_is_near_for_any_positive_threshold(
        #[case] threshold: f64,
        #[case] expected: bool,
    ) {
        let road = [[1.5, -2.5, 0.25]];

        let mask = classify_near_road(&road, &road, threshold).unwrap();

        assert_eq!(mask, vec![expected]);
    }

    #[test]
    fn point_exactly_at_threshold_is_not_near() {
        let road = [[0.0, 0.0, 0.0]];
        let query = [[3.0, 4.0, 0.0], [2.9, 4.0, 0.0]];

        assert_eq!(
            classify_near_road(&road, &query, 5.0).unwrap(),
            vec![false, true]
        );
    }

    #[test]
    fn empty_query_gives_empty_mask() {
        let road = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

        assert!(classify_near_road(&road, &[], 0.4).unwrap().is_empty());
    }

    #[test]
    fn empty_road_is_invalid_input() {
        let err = classify_near_road(&[], &[[0.0, 0.0, 0.0]], 0.4).unwrap_err();
        assert!(matches!(err, Error::EmptyReferenceSet));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // no query points does not make an empty road acceptable
        assert!(classify_near_road(&[], &[], 0.4).is_err());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn bad_thresholds_are_invalid_parameters(#[case] threshold: f64) {
        let err = classify_near_road(&[[0.0; 3]], &[[0.0; 3]], threshold).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn infinite_threshold_marks_everything_near() {
        let road = [[0.0; 3]];
        let query = [[1e9, -1e9, 1e9], [0.5, 0.5, 0.5]];

        assert_eq!(
            classify_near_road(&road, &query, f64::INFINITY).unwrap(),
            vec![true, true]
        );
    }

    #[test]
    fn nan_query_point_is_never_near() {
        let road = [[0.0; 3], [1.0; 3]];
        let query = [[f64::NAN, 0.0, 0.0]];

        assert_eq!(
            classify_near_road(&road, &query, 1e6).unwrap(),
            vec![false]
        );
        assert_eq!(
            classify_near_road(&road, &query, f64::INFINITY).unwrap(),
            vec![false]
        );
    }

    #[test]
    fn overflowing_distance_is_not_near() {
        let road = [[0.0; 3]];

        let distances = nearest_road_distances(&road, &[[1e200, 0.0, 0.0]]).unwrap();
        assert!(distances[0] > 1e160);

        assert_eq!(
            classify_near_road(&road, &[[1e200, 0.0, 0.0]], 1e160).unwrap(),
            vec![false]
        );
        assert_eq!(
            classify_near_road(&road, &[[f64::INFINITY, 0.0, 0.0]], f64::INFINITY).unwrap(),
            vec![false]
        );
        assert_eq!(
            classify_with::<LinearScan>(&road, &[[1e200, 0.0, 0.0]], 1e160).unwrap(),
            vec![false]
        );
    }

    #[test]
    fn mask_is_monotone_in_threshold() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2024);
        let road = random_cloud(&mut rng, 400, 5.0);
        let query = random_cloud(&mut rng, 400, 6.0);
        let index: RoadIndex = RoadIndex::build(&road).unwrap();

        let thresholds = [0.0, 0.05, 0.1, 0.2, 0.4, 0.8, 1.6, 3.2];
        let masks: Vec<Vec<bool>> = thresholds
            .iter()
            .map(|&threshold| index.classify(&query, threshold).unwrap())
            .collect();

        for pair in masks.windows(2) {
            for (lower, higher) in pair[0].iter().zip(pair[1].iter()) {
                assert!(!lower || *higher);
            }
        }
        assert!(masks[0].iter().all(|near| !near));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(7, 40)]
    #[case(49, 49)]
    fn matches_brute_force_on_small_sets(#[case] road_size: usize, #[case] query_size: usize) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64((road_size * 1000 + query_size) as u64);
        let road = random_cloud(&mut rng, road_size, 2.0);
        let query = random_cloud(&mut rng, query_size, 2.5);

        let distances = nearest_road_distances(&road, &query).unwrap();

        for (point, distance) in query.iter().zip(distances.iter()) {
            let brute = road
                .iter()
                .map(|r| {
                    ((point[0] - r[0]).powi(2) + (point[1] - r[1]).powi(2) + (point[2] - r[2]).powi(2))
                        .sqrt()
                })
                .fold(f64::INFINITY, f64::min);
            assert!((brute - distance).abs() < 1e-12);
        }

        assert_eq!(
            classify_near_road(&road, &query, 0.5).unwrap(),
            classify_with::<LinearScan>(&road, &query, 0.5).unwrap()
        );
    }

    #[test]
    fn road_index_is_reusable_across_batches() {
        let road = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let index: RoadIndex = RoadIndex::build(&road).unwrap();

        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
        assert_eq!(
            index.classify(&[[0.5, 0.1, 0.0]], 0.6).unwrap(),
            vec![true]
        );
        assert_eq!(
            index.classify(&[[5.0, 0.0, 0.0], [2.0, 0.0, 0.35]], 0.4).unwrap(),
            vec![false, true]
        );
        assert_eq!(index.nearest_distance(&[2.0, 0.0, 3.0]), 3.0);
    }

    #[test]
    fn road_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RoadIndex>();
    }

    #[test]
    fn classifies_records_by_position() {
        let road = vec![Record::new(1.0, 1.0, 0.0, 0.0, 0.0)];
        let query = vec![
            Record::new(1.0, 1.0, 0.1, 0.1, 0.1),
            Record::new(1.0, 1.0, 3.0, 3.0, 3.0),
        ];

        assert_eq!(
            classify_records(&road, &query, 0.4).unwrap(),
            vec![true, false]
        );
        assert_eq!(
            RoadIndex::<LinearScan>::from_records(&road)
                .unwrap()
                .classify_records(&query, 0.4)
                .unwrap(),
            vec![true, false]
        );
    }
}
