//! The `SpatialIndex` abstraction the proximity classifier is written against.
//!
//! Any structure that can be built once from a set of 3D points and then answer
//! "how far is the nearest indexed point?" can back the classifier. Two are provided:
//! the balanced k-d tree ([`RoadTree`]), used by default, and an exhaustive
//! [`LinearScan`], which is the reference the tree is tested against.

use crate::distance::SquaredEuclidean;
use crate::error::{Error, Result};
use crate::immutable::kdtree::{ImmutableKdTree, MAX_POINTS};
use crate::traits::DistanceMetric;

/// Leaf bucket size of the default road index
pub const ROAD_BUCKET_SIZE: usize = 32;

/// The k-d tree used to index road points by default
pub type RoadTree = ImmutableKdTree<f64, u32, 3, ROAD_BUCKET_SIZE>;

/// An immutable index over a set of 3D points answering nearest-distance queries.
pub trait SpatialIndex: Sized {
    /// Builds the index over `points`.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyReferenceSet`] if `points` is empty, since the nearest distance
    ///   is undefined without at least one indexed point.
    /// * [`Error::TooManyPoints`] if the index can not address every point.
    fn build(points: &[[f64; 3]]) -> Result<Self>;

    /// Returns the Euclidean distance from `point` to the nearest indexed point,
    /// or NaN if any co-ordinate of `point` is NaN. A distance too large to square
    /// in `f64` is reported as `+inf`.
    fn nearest(&self, point: &[f64; 3]) -> f64;

    /// Returns the number of indexed points.
    fn len(&self) -> usize;

    /// Returns true if no points are indexed. Never true for a successfully built index.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const B: usize> SpatialIndex for ImmutableKdTree<f64, u32, 3, B> {
    fn build(points: &[[f64; 3]]) -> Result<Self> {
        check_point_count(points.len())?;

        Ok(ImmutableKdTree::new_from_slice(points))
    }

    #[inline]
    fn nearest(&self, point: &[f64; 3]) -> f64 {
        if has_nan(point) {
            return f64::NAN;
        }
        self.nearest_one::<SquaredEuclidean>(point).distance.sqrt()
    }

    fn len(&self) -> usize {
        self.size()
    }
}

fn check_point_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::EmptyReferenceSet);
    }
    if count > MAX_POINTS {
        return Err(Error::TooManyPoints(count));
    }
    Ok(())
}

#[inline]
fn has_nan(point: &[f64; 3]) -> bool {
    point.iter().any(|c| c.is_nan())
}

/// Exhaustive nearest-distance search over every point.
///
/// `O(n)` per query, with no construction cost beyond copying the points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScan {
    points: Vec<[f64; 3]>,
}

impl SpatialIndex for LinearScan {
    fn build(points: &[[f64; 3]]) -> Result<Self> {
        check_point_count(points.len())?;

        Ok(LinearScan {
            points: points.to_vec(),
        })
    }

    fn nearest(&self, point: &[f64; 3]) -> f64 {
        if has_nan(point) {
            return f64::NAN;
        }
        self.points
            .iter()
            .map(|p| SquaredEuclidean::dist(point, p))
            .fold(f64::INFINITY, |best, dist| if dist < best { dist } else { best })
            .sqrt()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
