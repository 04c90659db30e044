#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # Kerb
//!
//! Labels sensor point observations as near to, or away from, a road.
//!
//! Raw records are first standardized (range to kilometres, timestamps scaled, invalid
//! observations dropped), optionally have their positions rounded, and are then
//! classified against a set of road points: a point is near the road when the
//! Euclidean distance to the closest road point is strictly below a threshold.
//! Nearest-neighbour lookups are answered by a balanced, immutable k-d tree built once
//! over the road points.
//!
//! ## Usage
//! ```rust
//! use kerb::{classify_near_road, round_coordinates, standardize, Record};
//!
//! let road = standardize(vec![
//!     Record::new(1000.0, 10.0, 0.0, 0.0, 0.0),
//!     Record::new(1000.0, 10.0, 10.0, 10.0, 10.0),
//! ]);
//! let query = standardize(vec![
//!     Record::new(2000.0, 20.0, 0.0, 0.0, 0.3),
//!     Record::new(2000.0, 20.0, 5.0, 5.0, 5.0),
//!     Record::new(-1.0, 20.0, 0.0, 0.0, 0.0), // invalid range, dropped
//! ]);
//! let query = round_coordinates(query, 2).unwrap();
//!
//! let road_points: Vec<[f64; 3]> = road.iter().map(Record::position).collect();
//! let query_points: Vec<[f64; 3]> = query.iter().map(Record::position).collect();
//!
//! assert_eq!(
//!     classify_near_road(&road_points, &query_points, 0.4).unwrap(),
//!     vec![true, false]
//! );
//! ```
//!
//! [`label_road_points`] runs the whole chain over two record sets in one call, and
//! [`RoadIndex`] keeps an indexed road around for classifying many query batches.
//!
//! ## Optional features
//!
//! * `tracing` (default): emits `tracing` events for index construction, filtering and
//!   classification.
//! * `csv`: reading records and points from CSV, and writing labelled records.
//! * `serde`: `Serialize` / `Deserialize` for [`Record`], [`Calibration`] and
//!   [`PipelineSettings`].

pub mod classify;
pub mod distance;
pub mod error;
pub mod immutable;
#[cfg(feature = "csv")]
pub mod io;
pub mod nearest_neighbour;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod spatial_index;
#[doc(hidden)]
#[cfg(feature = "test_utils")]
pub mod test_utils;
pub mod traits;

pub use crate::classify::{
    classify_near_road, classify_records, classify_with, nearest_road_distances, RoadIndex,
    DEFAULT_THRESHOLD,
};
pub use crate::distance::SquaredEuclidean;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::immutable::kdtree::ImmutableKdTree;
pub use crate::normalize::{
    round_coordinates, standardize, standardize_with, Calibration, DEFAULT_PRECISION,
};
pub use crate::pipeline::{label_road_points, LabelledBatch, PipelineSettings};
pub use crate::record::Record;
pub use crate::spatial_index::{LinearScan, RoadTree, SpatialIndex};
