use crate::traits::{Axis, Content, DistanceMetric};

/// Borrowed, column-wise view over the points of a single leaf.
#[derive(Debug)]
pub(crate) struct LeafSlice<'a, A: Axis, T: Content, const K: usize> {
    pub(crate) content_points: [&'a [A]; K],
    pub(crate) content_items: &'a [T],
}

impl<'a, A: Axis, T: Content, const K: usize> LeafSlice<'a, A, T, K> {
    pub(crate) fn new(content_points: [&'a [A]; K], content_items: &'a [T]) -> Self {
        for arr in content_points {
            debug_assert_eq!(arr.len(), content_items.len());
        }

        LeafSlice {
            content_points,
            content_items,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.content_items.len()
    }

    /// Updates `best_dist` / `best_item` if any point in this leaf is strictly closer
    /// to `query` than the current best.
    #[inline]
    pub(crate) fn nearest_one<D>(&self, query: &[A; K], best_dist: &mut A, best_item: &mut T)
    where
        D: DistanceMetric<A, K>,
    {
        for idx in 0..self.len() {
            let mut dist = A::zero();
            (0..K).for_each(|dim| {
                dist += D::dist1(self.content_points[dim][idx], query[dim]);
            });

            if dist < *best_dist {
                *best_dist = dist;
                *best_item = self.content_items[idx];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LeafSlice;
    use crate::distance::SquaredEuclidean;

    #[test]
    fn finds_closest_point_in_leaf() {
        let xs = [0.0f64, 5.0, 1.0];
        let ys = [0.0f64, 5.0, 1.0];
        let zs = [0.0f64, 5.0, 1.0];
        let items = [10u32, 11, 12];
        let leaf = LeafSlice::new([&xs[..], &ys[..], &zs[..]], &items[..]);

        let mut best_dist = f64::INFINITY;
        let mut best_item = 0u32;
        leaf.nearest_one::<SquaredEuclidean>(&[1.0, 1.0, 1.5], &mut best_dist, &mut best_item);

        assert_eq!(best_item, 12);
        assert_eq!(best_dist, 0.25);
    }

    #[test]
    fn keeps_existing_best_when_leaf_is_further() {
        let xs = [9.0f64];
        let ys = [9.0f64];
        let zs = [9.0f64];
        let items = [3u32];
        let leaf = LeafSlice::new([&xs[..], &ys[..], &zs[..]], &items[..]);

        let mut best_dist = 1.0f64;
        let mut best_item = 99u32;
        leaf.nearest_one::<SquaredEuclidean>(&[0.0, 0.0, 0.0], &mut best_dist, &mut best_item);

        assert_eq!(best_item, 99);
        assert_eq!(best_dist, 1.0);
    }
}
