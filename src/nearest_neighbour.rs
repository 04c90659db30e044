//! A result item returned by a query
use crate::traits::Content;
use std::cmp::Ordering;

/// Represents the result of a nearest neighbour query, with `distance` being the distance of
/// the found item from the query point, and `item` being the stored index of that item.
#[derive(Debug, Copy, Clone)]
pub struct NearestNeighbour<A, T> {
    /// the distance of the found item from the query point according to the supplied distance metric
    pub distance: A,
    /// the stored index of an item that was found in the query
    pub item: T,
}

impl<A: PartialOrd, T: Content> PartialOrd for NearestNeighbour<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

impl<A: PartialEq, T: Content> PartialEq for NearestNeighbour<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.item == other.item
    }
}

impl<A, T: Content> From<NearestNeighbour<A, T>> for (A, T) {
    fn from(elem: NearestNeighbour<A, T>) -> Self {
        (elem.distance, elem.item)
    }
}

#[cfg(test)]
mod tests {
    use crate::nearest_neighbour::NearestNeighbour;

    #[test]
    fn converts_into_distance_item_pair() {
        let (distance, item): (f64, u32) = NearestNeighbour {
            distance: 0.09f64,
            item: 7u32,
        }
        .into();

        assert_eq!(distance, 0.09);
        assert_eq!(item, 7);
    }

    #[test]
    fn orders_by_distance_only() {
        let near = NearestNeighbour {
            distance: 0.1f64,
            item: 40u32,
        };
        let far = NearestNeighbour {
            distance: 2.5f64,
            item: 3u32,
        };

        assert!(near < far);
        assert_ne!(near, far);
    }
}
