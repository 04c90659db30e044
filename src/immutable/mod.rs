//! Immutable k-d tree, used as the spatial index over a road point set.
//!
//! The tree does not provide the capability to modify its contents after it has
//! been constructed: the co-ordinates of the points to be stored must all be known
//! in advance. This matches how a road set is used: built once per classification
//! batch, queried for every point of the batch, then dropped.
//!
//! Points being stored in the tree must be floats ([`f64`] or [`f32`]).
pub mod kdtree;
pub(crate) mod leaf_slice;
mod query;
