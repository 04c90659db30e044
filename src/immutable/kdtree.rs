//! Immutable floating point k-d tree.
//!
//! [`ImmutableKdTree`] is populated once, from a slice of points, and can not be modified
//! afterwards. In exchange it is optimally balanced: every stem splits its points at the
//! median along the current axis, so construction is `O(n log n)` and queries descend
//! `log2(n / B)` levels before reaching a leaf.
//!
//! Stems are stored implicitly in a cache-aligned vec (root at index 1, children of stem `i`
//! at `2i` and `2i + 1`). Leaves store their points column-wise, one `Vec` per axis, with the
//! per-leaf start / end offsets kept in `leaf_extents`.

use crate::immutable::leaf_slice::LeafSlice;
use crate::traits::{Axis, Content};
use aligned_vec::{avec, AVec, ConstAlign, CACHELINE_ALIGN};
use array_init::array_init;
use az::{Az, Cast};
use ordered_float::OrderedFloat;
#[cfg(feature = "tracing")]
use tracing::{event, span, Level};

/// Largest number of points an [`ImmutableKdTree`] can hold
pub const MAX_POINTS: usize = u32::MAX as usize;

/// Immutable floating point k-d tree
///
/// `A` is the co-ordinate type ([`f64`] or [`f32`]), `T` the item type stored against
/// each point (the point's position in the source slice), `K` the number of dimensions
/// and `B` the target bucket size of each leaf.
///
/// Leaves may hold more than `B` items when many points share the same value on a
/// split axis; queries remain exact in that case.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableKdTree<A: Copy + Default, T: Copy + Default, const K: usize, const B: usize> {
    pub(crate) stems: AVec<A, ConstAlign<CACHELINE_ALIGN>>,
    pub(crate) leaf_points: [Vec<A>; K],
    pub(crate) leaf_items: Vec<T>,
    pub(crate) leaf_extents: Vec<(u32, u32)>,
    pub(crate) max_stem_level: i32,
}

/// Leaf storage accumulated while the stems are being populated.
struct LeafStore<A, T, const K: usize> {
    points: [Vec<A>; K],
    items: Vec<T>,
    extents: Vec<(u32, u32)>,
}

impl<A: Axis, T: Content, const K: usize> LeafStore<A, T, K>
where
    usize: Cast<T>,
{
    fn with_capacity(item_count: usize, leaf_count: usize) -> Self {
        LeafStore {
            points: array_init(|_| Vec::with_capacity(item_count)),
            items: Vec::with_capacity(item_count),
            extents: Vec::with_capacity(leaf_count),
        }
    }

    /// Writes the points referenced by `sort_index` out as the next leaf
    fn push_leaf(&mut self, source: &[[A; K]], sort_index: &[usize]) {
        let start = self.items.len();
        self.extents
            .push((start as u32, (start + sort_index.len()) as u32));

        sort_index.iter().for_each(|&idx| {
            (0..K).for_each(|dim| self.points[dim].push(source[idx][dim]));
            self.items.push(idx.az::<T>());
        });
    }
}

impl<A: Axis, T: Content, const K: usize, const B: usize> From<&[[A; K]]>
    for ImmutableKdTree<A, T, K, B>
where
    usize: Cast<T>,
{
    /// Creates an `ImmutableKdTree`, balanced and optimized, populated
    /// with items from `source`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kerb::immutable::kdtree::ImmutableKdTree;
    ///
    /// let points: Vec<[f64; 3]> = vec!([1.0f64, 2.0f64, 3.0f64]);
    /// let tree: ImmutableKdTree<f64, u32, 3, 32> = (&*points).into();
    ///
    /// assert_eq!(tree.size(), 1);
    /// ```
    fn from(slice: &[[A; K]]) -> Self {
        ImmutableKdTree::new_from_slice(slice)
    }
}

impl<A, T, const K: usize, const B: usize> ImmutableKdTree<A, T, K, B>
where
    A: Axis,
    T: Content,
    usize: Cast<T>,
{
    /// Creates an `ImmutableKdTree`, balanced and optimized, populated
    /// with items from `source`. The item stored against each point is its
    /// index within `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source` holds more than [`MAX_POINTS`] points.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kerb::immutable::kdtree::ImmutableKdTree;
    ///
    /// let points: Vec<[f64; 3]> = vec!([1.0f64, 2.0f64, 3.0f64], [4.0, 5.0, 6.0]);
    /// let tree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(&points);
    ///
    /// assert_eq!(tree.size(), 2);
    /// ```
    #[inline]
    pub fn new_from_slice(source: &[[A; K]]) -> Self {
        let item_count = source.len();
        assert!(
            item_count <= MAX_POINTS,
            "ImmutableKdTree can hold at most u32::MAX points"
        );

        let leaf_node_count = item_count.div_ceil(B);
        let stem_node_count = if leaf_node_count < 2 {
            0
        } else {
            leaf_node_count.next_power_of_two()
        };
        let max_stem_level: i32 = leaf_node_count.next_power_of_two().ilog2() as i32 - 1;

        #[cfg(feature = "tracing")]
        let span = span!(
            Level::DEBUG,
            "kdtree_build",
            items = item_count,
            stems = stem_node_count
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut stems = avec![A::infinity(); stem_node_count];
        let mut leaves = LeafStore::with_capacity(item_count, stem_node_count.max(1));
        let mut sort_index = Vec::from_iter(0..item_count);

        if stem_node_count == 0 {
            leaves.push_leaf(source, &sort_index);
        } else {
            Self::populate_recursive(
                &mut stems,
                0,
                source,
                &mut sort_index,
                1,
                0,
                max_stem_level,
                &mut leaves,
            );
        }

        #[cfg(feature = "tracing")]
        event!(
            Level::TRACE,
            leaves = leaves.extents.len(),
            max_stem_level,
            "kdtree populated"
        );

        let LeafStore {
            points,
            items,
            extents,
        } = leaves;

        Self {
            stems,
            leaf_points: points,
            leaf_items: items,
            leaf_extents: extents,
            max_stem_level,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn populate_recursive(
        stems: &mut AVec<A, ConstAlign<CACHELINE_ALIGN>>,
        dim: usize,
        source: &[[A; K]],
        sort_index: &mut [usize],
        stem_index: usize,
        level: i32,
        max_stem_level: i32,
        leaves: &mut LeafStore<A, T, K>,
    ) {
        if level > max_stem_level {
            leaves.push_leaf(source, sort_index);
            return;
        }

        let chunk_length = sort_index.len();
        let mut pivot = chunk_length >> 1;

        // an empty chunk leaves its stem at +inf, sending every query to the (empty) left child
        if pivot < chunk_length {
            pivot = Self::update_pivot(source, sort_index, dim, pivot);

            debug_assert!(pivot > 0 || chunk_length == 1);
            debug_assert!(
                stems[stem_index].is_infinite(),
                "Wrote to stem #{stem_index:?} for a second time",
            );

            stems[stem_index] = source[sort_index[pivot]][dim];
        }

        let left_child_idx = stem_index << 1;
        let right_child_idx = left_child_idx + 1;
        let next_dim = (dim + 1) % K;

        let (lower_sort_index, upper_sort_index) = sort_index.split_at_mut(pivot);

        Self::populate_recursive(
            stems,
            next_dim,
            source,
            lower_sort_index,
            left_child_idx,
            level + 1,
            max_stem_level,
            leaves,
        );

        Self::populate_recursive(
            stems,
            next_dim,
            source,
            upper_sort_index,
            right_child_idx,
            level + 1,
            max_stem_level,
            leaves,
        );
    }

    /// Moves the median item along `dim` into slot `pivot`, then nudges the pivot left past
    /// any items equal to it. Afterwards everything left of the pivot is `<=` the split
    /// value and everything from the pivot onwards is `>=` it.
    #[inline]
    fn update_pivot(
        source: &[[A; K]],
        sort_index: &mut [usize],
        dim: usize,
        mut pivot: usize,
    ) -> usize {
        sort_index.select_nth_unstable_by_key(pivot, |&i| OrderedFloat(source[i][dim]));

        if pivot == 0 {
            return pivot;
        }

        // each step only moves onto an item equal to the split value, so the
        // partition stays valid even if equal items are not all adjacent
        while pivot > 1 && source[sort_index[pivot]][dim] == source[sort_index[pivot - 1]][dim] {
            pivot -= 1;

            #[cfg(feature = "tracing")]
            event!(
                Level::TRACE,
                pivot,
                chunk_len = sort_index.len(),
                "pivot shifted past duplicate"
            );
        }

        pivot
    }

    /// Returns the number of points stored in the tree
    ///
    /// # Examples
    ///
    /// ```
    /// use kerb::immutable::kdtree::ImmutableKdTree;
    ///
    /// let points: Vec<[f64; 3]> = vec!([1.0f64, 2.0f64, 3.0f64]);
    /// let tree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(&points);
    ///
    /// assert_eq!(tree.size(), 1);
    /// ```
    #[inline]
    pub fn size(&self) -> usize {
        self.leaf_items.len()
    }

    /// Returns the number of leaves, including any that ended up empty
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaf_extents.len()
    }

    /// Returns a LeafSlice for a given leaf index
    #[inline]
    pub(crate) fn get_leaf_slice(&self, leaf_idx: usize) -> LeafSlice<'_, A, T, K> {
        let (start, end) = self.leaf_extents[leaf_idx];
        let (start, end) = (start as usize, end as usize);

        LeafSlice::new(
            array_init(|i| &self.leaf_points[i][start..end]),
            &self.leaf_items[start..end],
        )
    }
}
