use crate::immutable::kdtree::ImmutableKdTree;
use crate::nearest_neighbour::NearestNeighbour;
use crate::traits::{Axis, Content, DistanceMetric};
use az::Cast;
use cmov::Cmov;

impl<A, T, const K: usize, const B: usize> ImmutableKdTree<A, T, K, B>
where
    A: Axis,
    T: Content,
    usize: Cast<T>,
{
    /// Queries the tree to find the nearest item to the `query` point.
    ///
    /// The search is exact: a branch is only skipped when the lower bound on the
    /// distance to anything inside it is already greater than the best distance found.
    /// When several points are equally near, which of them is returned is unspecified,
    /// but the distance is always the minimum.
    ///
    /// Querying an empty tree, or a query whose distance to every point overflows,
    /// returns a result with `distance == A::infinity()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kerb::distance::SquaredEuclidean;
    /// use kerb::immutable::kdtree::ImmutableKdTree;
    ///
    /// let content: Vec<[f64; 3]> = vec!(
    ///     [1.0, 2.0, 5.0],
    ///     [2.0, 3.0, 6.0]
    /// );
    ///
    /// let tree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(&content);
    ///
    /// let nearest = tree.nearest_one::<SquaredEuclidean>(&[1.0, 2.0, 5.1]);
    ///
    /// assert!((nearest.distance - 0.01f64).abs() < f64::EPSILON);
    /// assert_eq!(nearest.item, 0);
    /// ```
    #[inline]
    pub fn nearest_one<D>(&self, query: &[A; K]) -> NearestNeighbour<A, T>
    where
        D: DistanceMetric<A, K>,
    {
        let mut off = [A::zero(); K];
        let mut result = NearestNeighbour {
            distance: A::infinity(),
            item: T::default(),
        };

        if self.stems.is_empty() {
            self.search_leaf_for_nearest_one::<D>(query, &mut result, 0);
            return result;
        }

        self.nearest_one_recurse::<D>(query, 1, 0, &mut result, &mut off, A::zero());

        result
    }

    fn nearest_one_recurse<D>(
        &self,
        query: &[A; K],
        stem_idx: usize,
        split_dim: u64,
        nearest: &mut NearestNeighbour<A, T>,
        off: &mut [A; K],
        rd: A,
    ) where
        D: DistanceMetric<A, K>,
    {
        if stem_idx >= self.stems.len() {
            self.search_leaf_for_nearest_one::<D>(query, nearest, stem_idx - self.stems.len());
            return;
        }

        let left_child_idx = stem_idx << 1;
        let dim = split_dim as usize;

        let val = self.stems[stem_idx];
        let is_right_child = usize::from(query[dim] >= val);

        let closer_node_idx = left_child_idx + is_right_child;
        let further_node_idx = left_child_idx + 1 - is_right_child;

        let mut rd = rd;
        let old_off = off[dim];
        let new_off = query[dim].saturating_dist(val);

        let mut next_split_dim = split_dim + 1;
        next_split_dim.cmovnz(&0, u8::from(next_split_dim == K as u64));

        self.nearest_one_recurse::<D>(query, closer_node_idx, next_split_dim, nearest, off, rd);

        // new_off >= old_off on the far side of a split, so this stays a lower bound
        rd = Axis::rd_update(rd, D::dist1(new_off, old_off));

        if rd <= nearest.distance {
            off[dim] = new_off;
            self.nearest_one_recurse::<D>(
                query,
                further_node_idx,
                next_split_dim,
                nearest,
                off,
                rd,
            );
            off[dim] = old_off;
        }
    }

    #[inline]
    fn search_leaf_for_nearest_one<D>(
        &self,
        query: &[A; K],
        nearest: &mut NearestNeighbour<A, T>,
        leaf_idx: usize,
    ) where
        D: DistanceMetric<A, K>,
    {
        self.get_leaf_slice(leaf_idx)
            .nearest_one::<D>(query, &mut nearest.distance, &mut nearest.item);
    }
}
